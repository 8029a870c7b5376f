use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crewdex_domain::{ProfileId, SearchFilterSet, partition_by_level, scoring};

use crate::{SearchService, ServiceResult, validate};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreRequest {
	#[serde(flatten)]
	pub filter: SearchFilterSet,
	/// Normally the output of the candidates operation for the same filter
	/// set; scoring a pool drawn from a different filter set is undefined.
	pub candidate_ids: Vec<ProfileId>,
	pub acting_profile_id: Option<ProfileId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
	pub profile_id: ProfileId,
	pub score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
	pub search_id: Uuid,
	/// One entry per requested candidate, preserving request order. Zero is a
	/// valid score and is included, not dropped.
	pub results: Vec<ScoredCandidate>,
}

impl SearchService {
	pub fn score_candidates(&self, request: ScoreRequest) -> ServiceResult<ScoreResponse> {
		let search_id = Uuid::new_v4();

		tracing::info!(
			%search_id,
			acting_profile = request.acting_profile_id.as_ref().map(ProfileId::as_str),
			candidates = request.candidate_ids.len(),
			"Scoring candidates."
		);

		let results = self.score(&request.filter, &request.candidate_ids)?;

		Ok(ScoreResponse { search_id, results })
	}

	/// The scoring engine. Counts filter-criteria matches per candidate:
	/// one point per selected position or skill term on each of the
	/// candidate's credits, then one point per selected term the candidate
	/// holds in each flat profile taxonomy. Unlike candidate resolution, the
	/// position selection is used literally here; related-term links never
	/// add points. Ranking is the caller's job; output order follows input
	/// order.
	pub fn score(
		&self,
		filter: &SearchFilterSet,
		candidate_ids: &[ProfileId],
	) -> ServiceResult<Vec<ScoredCandidate>> {
		validate::validate_filter(self.stores().terms.as_ref(), filter)?;
		validate::validate_candidate_ids(candidate_ids)?;

		// Jobs supersede departments when both were selected; terms the store
		// no longer knows drop out as non-matches.
		let partitioned = partition_by_level(&filter.positions, |term| {
			self.stores().terms.position_level(term)
		})?;
		let effective_positions = partitioned.effective();
		let effective_skills = filter.skills.as_slice();
		// Positions and skills are consumed above; only the flat profile
		// taxonomies remain for the membership pass.
		let attribute_categories = filter.active_attribute_categories();

		let results = self.scoring_pool().install(|| {
			candidate_ids
				.par_iter()
				.map(|candidate| {
					let mut score = 0_u32;

					for credit in self.stores().records.credits_by_author(candidate)? {
						score += scoring::credit_points(
							&credit,
							effective_positions,
							effective_skills,
						);
					}
					for (taxonomy, terms) in &attribute_categories {
						let memberships =
							self.stores().records.profile_terms(candidate, *taxonomy)?;

						score += scoring::membership_points(&memberships, terms);
					}

					Ok(ScoredCandidate { profile_id: candidate.clone(), score })
				})
				.collect::<ServiceResult<Vec<_>>>()
		})?;

		Ok(results)
	}
}
