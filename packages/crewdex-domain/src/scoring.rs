use std::collections::BTreeSet;

use crate::{credit::Credit, ids::TermId};

/// One point per selected term the credit carries, positions and skills alike.
/// The term lists here are the literal selection; filtering-time related-term
/// expansion never reaches this path.
pub fn credit_points(credit: &Credit, positions: &[TermId], skills: &[TermId]) -> u32 {
	let position_hits = positions.iter().filter(|term| credit.position_terms.contains(*term)).count();
	let skill_hits = skills.iter().filter(|term| credit.skill_terms.contains(*term)).count();

	(position_hits + skill_hits) as u32
}

/// One point per selected term present in a profile's membership set for one
/// flat taxonomy. Uncapped; every matching term counts.
pub fn membership_points(memberships: &BTreeSet<TermId>, selected: &[TermId]) -> u32 {
	selected.iter().filter(|term| memberships.contains(*term)).count() as u32
}
