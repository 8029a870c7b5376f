use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crewdex_domain::{ProfileId, SearchFilterSet, expand_positions};

use crate::{SearchService, ServiceResult, validate};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidatesRequest {
	#[serde(flatten)]
	pub filter: SearchFilterSet,
	/// Restricts results to a pool the caller already holds, e.g. from a
	/// prior query.
	pub allowed_authors: Option<Vec<ProfileId>>,
	/// The profile performing the search. Always explicit; there is no
	/// ambient current-user context.
	pub acting_profile_id: Option<ProfileId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesResponse {
	pub search_id: Uuid,
	/// Eligible candidates in unspecified order.
	pub candidate_ids: Vec<ProfileId>,
}

impl SearchService {
	pub fn candidates(&self, request: CandidatesRequest) -> ServiceResult<CandidatesResponse> {
		let search_id = Uuid::new_v4();
		let allowed_authors: Option<BTreeSet<ProfileId>> =
			request.allowed_authors.map(|allowed| allowed.into_iter().collect());

		tracing::info!(
			%search_id,
			acting_profile = request.acting_profile_id.as_ref().map(ProfileId::as_str),
			allowed_authors = allowed_authors.as_ref().map(BTreeSet::len),
			"Resolving candidates."
		);

		let candidate_ids = self.resolve_candidates(&request.filter, allowed_authors.as_ref())?;

		tracing::info!(
			%search_id,
			candidates = candidate_ids.len(),
			"Candidate resolution complete."
		);

		Ok(CandidatesResponse { search_id, candidate_ids })
	}

	/// The filter pipeline. Resolves the filter set to the deduplicated pool
	/// of eligible candidate profiles: expand the position selection through
	/// its related-term links, run the AND-of-ORs credit query, intersect with
	/// each active profile-attribute category, then keep only visible,
	/// complete crew members.
	pub fn resolve_candidates(
		&self,
		filter: &SearchFilterSet,
		allowed_authors: Option<&BTreeSet<ProfileId>>,
	) -> ServiceResult<Vec<ProfileId>> {
		validate::validate_filter(self.stores().terms.as_ref(), filter)?;

		// Related-term expansion broadens recall on the credit query only.
		// The scoring pass works from the literal selection; see `score`.
		let expanded_positions =
			expand_positions(&filter.positions, |term| self.stores().terms.related_terms(term))?;

		let credit_authors = if filter.has_credit_criteria() {
			let credits =
				self.stores().records.credits_matching(&expanded_positions, &filter.skills)?;

			if credits.is_empty() {
				// A credit miss ends the search; profile-attribute categories
				// cannot rescue it.
				tracing::debug!("No credits match the position/skill selection.");

				return Ok(Vec::new());
			}

			let authors: BTreeSet<ProfileId> =
				credits.into_iter().map(|credit| credit.author_id).collect();
			let mut complete = BTreeSet::new();

			for author in authors {
				// A profile deleted mid-query is a non-match, never an error.
				match self.stores().records.profile_by_id(&author)? {
					Some(profile) if profile.is_complete() => {
						complete.insert(author);
					},
					_ => {},
				}
			}

			Some(complete)
		} else {
			None
		};

		let mut attribute_matched: Option<BTreeSet<ProfileId>> = None;

		for (taxonomy, terms) in filter.active_attribute_categories() {
			let matched = self.stores().records.profiles_with_terms(taxonomy, terms)?;

			tracing::debug!(
				taxonomy = taxonomy.name(),
				matched = matched.len(),
				"Attribute category resolved."
			);

			// The first active category seeds the accumulator; the rest
			// intersect against it.
			attribute_matched = Some(match attribute_matched {
				None => matched,
				Some(accumulated) => accumulated.intersection(&matched).cloned().collect(),
			});
		}

		let mut randomize = false;
		let pool: Vec<ProfileId> = match (credit_authors, attribute_matched) {
			(Some(authors), Some(attributes)) => {
				authors.intersection(&attributes).cloned().collect()
			},
			(Some(authors), None) => authors.into_iter().collect(),
			(None, Some(attributes)) => attributes.into_iter().collect(),
			(None, None) => {
				// No filter at all: the whole eligible pool, in randomized
				// order so an unfiltered browse does not favor insertion
				// order.
				randomize = true;

				match allowed_authors {
					Some(allowed) => allowed.iter().cloned().collect(),
					None => self.stores().records.all_profile_ids()?,
				}
			},
		};

		let mut eligible = Vec::with_capacity(pool.len());
		let mut seen = BTreeSet::new();

		for id in pool {
			if !seen.insert(id.clone()) {
				continue;
			}
			if let Some(allowed) = allowed_authors
				&& !allowed.contains(&id)
			{
				continue;
			}

			let Some(profile) = self.stores().records.profile_by_id(&id)? else {
				continue;
			};

			if !profile.is_searchable() {
				continue;
			}

			eligible.push(id);
		}

		if randomize {
			eligible.shuffle(&mut rand::thread_rng());
		}

		Ok(eligible)
	}
}
