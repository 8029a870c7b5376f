use serde::{Deserialize, Serialize};

use crate::ids::TermId;

/// Flat taxonomies attached directly to a profile. Positions and skills live
/// on credits and follow a different query path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProfileTaxonomy {
	Union,
	Location,
	ExperienceLevel,
	GenderIdentity,
	RacialIdentity,
	PersonalIdentity,
}
impl ProfileTaxonomy {
	pub const ALL: [Self; 6] = [
		Self::Union,
		Self::Location,
		Self::ExperienceLevel,
		Self::GenderIdentity,
		Self::RacialIdentity,
		Self::PersonalIdentity,
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::Union => "union",
			Self::Location => "location",
			Self::ExperienceLevel => "experience_level",
			Self::GenderIdentity => "gender_identity",
			Self::RacialIdentity => "racial_identity",
			Self::PersonalIdentity => "personal_identity",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|taxonomy| taxonomy.name() == name)
	}
}

/// The caller's selection across every searchable category. Every field is
/// optional; an absent category imposes no constraint.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilterSet {
	/// Job-level term ids, or department-level ids where no job under that
	/// department was selected.
	pub positions: Vec<TermId>,
	pub skills: Vec<TermId>,
	pub unions: Vec<TermId>,
	pub locations: Vec<TermId>,
	pub experience_levels: Vec<TermId>,
	pub gender_identities: Vec<TermId>,
	pub racial_identities: Vec<TermId>,
	pub personal_identities: Vec<TermId>,
}
impl SearchFilterSet {
	pub fn attribute_terms(&self, taxonomy: ProfileTaxonomy) -> &[TermId] {
		match taxonomy {
			ProfileTaxonomy::Union => &self.unions,
			ProfileTaxonomy::Location => &self.locations,
			ProfileTaxonomy::ExperienceLevel => &self.experience_levels,
			ProfileTaxonomy::GenderIdentity => &self.gender_identities,
			ProfileTaxonomy::RacialIdentity => &self.racial_identities,
			ProfileTaxonomy::PersonalIdentity => &self.personal_identities,
		}
	}

	/// Categories that constrain profiles directly, in their fixed order,
	/// skipping the empty ones.
	pub fn active_attribute_categories(&self) -> Vec<(ProfileTaxonomy, &[TermId])> {
		ProfileTaxonomy::ALL
			.into_iter()
			.map(|taxonomy| (taxonomy, self.attribute_terms(taxonomy)))
			.filter(|(_, terms)| !terms.is_empty())
			.collect()
	}

	pub fn has_credit_criteria(&self) -> bool {
		!self.positions.is_empty() || !self.skills.is_empty()
	}

	pub fn has_attribute_criteria(&self) -> bool {
		ProfileTaxonomy::ALL
			.into_iter()
			.any(|taxonomy| !self.attribute_terms(taxonomy).is_empty())
	}

	pub fn is_empty(&self) -> bool {
		!self.has_credit_criteria() && !self.has_attribute_criteria()
	}
}
