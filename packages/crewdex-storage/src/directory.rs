use std::{
	collections::{BTreeSet, HashMap},
	path::Path,
};

use time::OffsetDateTime;

use crewdex_domain::{Credit, PositionLevel, Profile, ProfileId, ProfileTaxonomy, TermId};

use crate::{Result, snapshot::Snapshot};

/// Indexed, read-only view over a directory snapshot. All pipeline queries run
/// against these indexes; nothing here mutates after construction.
pub struct DirectoryStore {
	generated_at: Option<OffsetDateTime>,
	profiles: HashMap<ProfileId, Profile>,
	profile_order: Vec<ProfileId>,
	credits: Vec<Credit>,
	credits_by_author: HashMap<ProfileId, Vec<Credit>>,
	position_levels: HashMap<TermId, PositionLevel>,
	related: HashMap<TermId, BTreeSet<TermId>>,
	skill_terms: BTreeSet<TermId>,
	attribute_inventory: HashMap<ProfileTaxonomy, BTreeSet<TermId>>,
	attribute_index: HashMap<ProfileTaxonomy, HashMap<TermId, BTreeSet<ProfileId>>>,
	profile_memberships: HashMap<ProfileId, HashMap<ProfileTaxonomy, BTreeSet<TermId>>>,
}
impl DirectoryStore {
	pub fn load(path: &Path) -> Result<Self> {
		Ok(Self::from_snapshot(Snapshot::load(path)?))
	}

	/// The snapshot must already be validated; `Snapshot::load` does so, and
	/// test fixtures go through the same check.
	pub fn from_snapshot(snapshot: Snapshot) -> Self {
		let mut position_levels = HashMap::new();
		let mut related = HashMap::new();

		for term in snapshot.position_terms {
			let level = match term.parent {
				None => PositionLevel::Department,
				Some(parent) => PositionLevel::Job { department: parent },
			};

			position_levels.insert(term.id.clone(), level);

			if !term.related.is_empty() {
				related.insert(term.id, term.related);
			}
		}

		let mut attribute_inventory: HashMap<ProfileTaxonomy, BTreeSet<TermId>> = HashMap::new();

		for (taxonomy, terms) in snapshot.attribute_terms {
			if let Some(taxonomy) = ProfileTaxonomy::from_name(&taxonomy) {
				attribute_inventory.entry(taxonomy).or_default().extend(terms);
			}
		}

		let mut profiles = HashMap::new();
		let mut profile_order = Vec::new();
		let mut attribute_index: HashMap<ProfileTaxonomy, HashMap<TermId, BTreeSet<ProfileId>>> =
			HashMap::new();
		let mut profile_memberships: HashMap<ProfileId, HashMap<ProfileTaxonomy, BTreeSet<TermId>>> =
			HashMap::new();

		for record in snapshot.profiles {
			let id = record.profile.id.clone();

			for (taxonomy, terms) in record.memberships {
				let Some(taxonomy) = ProfileTaxonomy::from_name(&taxonomy) else {
					continue;
				};

				for term in &terms {
					attribute_inventory.entry(taxonomy).or_default().insert(term.clone());
					attribute_index
						.entry(taxonomy)
						.or_default()
						.entry(term.clone())
						.or_default()
						.insert(id.clone());
				}

				profile_memberships.entry(id.clone()).or_default().insert(taxonomy, terms);
			}

			profile_order.push(id.clone());
			profiles.insert(id, record.profile);
		}

		let mut credits_by_author: HashMap<ProfileId, Vec<Credit>> = HashMap::new();

		for credit in &snapshot.credits {
			credits_by_author.entry(credit.author_id.clone()).or_default().push(credit.clone());
		}

		Self {
			generated_at: snapshot.generated_at,
			profiles,
			profile_order,
			credits: snapshot.credits,
			credits_by_author,
			position_levels,
			related,
			skill_terms: snapshot.skill_terms,
			attribute_inventory,
			attribute_index,
			profile_memberships,
		}
	}

	pub fn generated_at(&self) -> Option<OffsetDateTime> {
		self.generated_at
	}

	pub fn profile_count(&self) -> usize {
		self.profiles.len()
	}

	pub fn credit_count(&self) -> usize {
		self.credits.len()
	}

	pub fn position_level(&self, term: &TermId) -> Option<&PositionLevel> {
		self.position_levels.get(term)
	}

	pub fn related_terms(&self, term: &TermId) -> BTreeSet<TermId> {
		self.related.get(term).cloned().unwrap_or_default()
	}

	/// Term inventory for one taxonomy by its wire name. `position` and
	/// `skill` cover the credit taxonomies; the rest are the flat profile
	/// taxonomies. Unknown names yield nothing.
	pub fn terms_by_taxonomy(&self, taxonomy: &str) -> Option<BTreeSet<TermId>> {
		match taxonomy {
			"position" => Some(self.position_levels.keys().cloned().collect()),
			"skill" => Some(self.skill_terms.clone()),
			other => ProfileTaxonomy::from_name(other)
				.map(|taxonomy| self.attribute_inventory.get(&taxonomy).cloned().unwrap_or_default()),
		}
	}

	/// Scan the credit pool with the AND-of-ORs predicate. Empty categories
	/// impose no constraint; callers skip the scan when both are empty.
	pub fn credits_matching(&self, positions: &[TermId], skills: &[TermId]) -> Vec<&Credit> {
		self.credits.iter().filter(|credit| credit.matches(positions, skills)).collect()
	}

	pub fn credits_by_author(&self, profile: &ProfileId) -> &[Credit] {
		self.credits_by_author.get(profile).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Every profile holding at least one of the selected terms in the given
	/// taxonomy. OR within the category; intersection across categories is the
	/// caller's job.
	pub fn profiles_with_terms(
		&self,
		taxonomy: ProfileTaxonomy,
		terms: &[TermId],
	) -> BTreeSet<ProfileId> {
		let Some(index) = self.attribute_index.get(&taxonomy) else {
			return BTreeSet::new();
		};
		let mut matched = BTreeSet::new();

		for term in terms {
			if let Some(profiles) = index.get(term) {
				matched.extend(profiles.iter().cloned());
			}
		}

		matched
	}

	pub fn profile_terms(&self, profile: &ProfileId, taxonomy: ProfileTaxonomy) -> BTreeSet<TermId> {
		self.profile_memberships
			.get(profile)
			.and_then(|memberships| memberships.get(&taxonomy))
			.cloned()
			.unwrap_or_default()
	}

	pub fn profile_by_id(&self, profile: &ProfileId) -> Option<&Profile> {
		self.profiles.get(profile)
	}

	/// Snapshot insertion order; the pipeline randomizes it where the search
	/// contract asks for an unbiased pool.
	pub fn all_profile_ids(&self) -> Vec<ProfileId> {
		self.profile_order.clone()
	}
}
