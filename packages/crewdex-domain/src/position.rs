use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::TermId;

/// The position taxonomy is exactly two levels deep: departments at the top,
/// jobs beneath them. The directory never produces deeper nesting, so the
/// level is a tagged variant rather than a general tree.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "level")]
pub enum PositionLevel {
	Department,
	Job { department: TermId },
}

/// A position selection split by hierarchy level. Terms whose level could not
/// be resolved are dropped as non-matches.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PartitionedPositions {
	pub departments: Vec<TermId>,
	pub jobs: Vec<TermId>,
}
impl PartitionedPositions {
	/// A job selection is the more specific one and supersedes departments
	/// whenever any job is present.
	pub fn effective(&self) -> &[TermId] {
		if self.jobs.is_empty() { &self.departments } else { &self.jobs }
	}
}

pub fn partition_by_level<E>(
	selected: &[TermId],
	mut level_of: impl FnMut(&TermId) -> Result<Option<PositionLevel>, E>,
) -> Result<PartitionedPositions, E> {
	let mut partitioned = PartitionedPositions::default();

	for term in selected {
		match level_of(term)? {
			Some(PositionLevel::Department) => partitioned.departments.push(term.clone()),
			Some(PositionLevel::Job { .. }) => partitioned.jobs.push(term.clone()),
			None => {},
		}
	}

	Ok(partitioned)
}

/// Broadens a position selection with its curated related terms. The caller's
/// selection keeps its order, related additions follow in lookup order, and
/// duplicates collapse. Filtering is the only consumer; scoring works from the
/// literal selection.
pub fn expand_positions<E>(
	selected: &[TermId],
	mut related_of: impl FnMut(&TermId) -> Result<BTreeSet<TermId>, E>,
) -> Result<Vec<TermId>, E> {
	let mut seen = BTreeSet::new();
	let mut expanded = Vec::with_capacity(selected.len());

	for term in selected {
		if seen.insert(term.clone()) {
			expanded.push(term.clone());
		}
	}
	for term in selected {
		for related in related_of(term)? {
			if seen.insert(related.clone()) {
				expanded.push(related);
			}
		}
	}

	Ok(expanded)
}
