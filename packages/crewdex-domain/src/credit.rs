use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{CreditId, ProfileId, TermId};

/// A work-history record. Each credit belongs to exactly one profile and may
/// carry any mix of department- and job-level position terms plus skills.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Credit {
	pub id: CreditId,
	pub author_id: ProfileId,
	#[serde(default)]
	pub position_terms: BTreeSet<TermId>,
	#[serde(default)]
	pub skill_terms: BTreeSet<TermId>,
}
impl Credit {
	pub fn has_any_position(&self, terms: &[TermId]) -> bool {
		terms.iter().any(|term| self.position_terms.contains(term))
	}

	pub fn has_any_skill(&self, terms: &[TermId]) -> bool {
		terms.iter().any(|term| self.skill_terms.contains(term))
	}

	/// Every active category must match; within a category any selected term
	/// is enough. An empty category imposes no constraint.
	pub fn matches(&self, positions: &[TermId], skills: &[TermId]) -> bool {
		if !positions.is_empty() && !self.has_any_position(positions) {
			return false;
		}
		if !skills.is_empty() && !self.has_any_skill(skills) {
			return false;
		}

		true
	}
}
