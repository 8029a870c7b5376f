use std::{
	collections::{BTreeMap, BTreeSet},
	fs,
	path::Path,
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crewdex_domain::{Credit, Profile, ProfileTaxonomy, TermId};

use crate::{Error, Result};

/// A read-only export of the directory produced by the content platform.
/// Crewdex loads it once at startup; record CRUD stays on the platform side.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Snapshot {
	#[serde(with = "time::serde::rfc3339::option")]
	pub generated_at: Option<OffsetDateTime>,
	pub position_terms: Vec<PositionTermRecord>,
	pub skill_terms: BTreeSet<TermId>,
	/// Term inventory per flat profile taxonomy, keyed by taxonomy name.
	pub attribute_terms: BTreeMap<String, BTreeSet<TermId>>,
	pub profiles: Vec<ProfileRecord>,
	pub credits: Vec<Credit>,
}
impl Snapshot {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|err| Error::ReadSnapshot { path: path.to_path_buf(), source: err })?;
		let snapshot: Self = serde_json::from_str(&raw)
			.map_err(|err| Error::ParseSnapshot { path: path.to_path_buf(), source: err })?;

		snapshot.validate()?;

		Ok(snapshot)
	}

	/// Integrity rules the platform export is expected to hold. A job's parent
	/// must be a department; departments carry no parent; credits and
	/// memberships must reference known records.
	pub fn validate(&self) -> Result<()> {
		let mut departments = BTreeSet::new();
		let mut position_ids = BTreeSet::new();

		for term in &self.position_terms {
			if term.id.is_blank() {
				return Err(Error::InvalidSnapshot {
					message: "Position term ids must be non-empty.".to_string(),
				});
			}
			if !position_ids.insert(&term.id) {
				return Err(Error::InvalidSnapshot {
					message: format!("Duplicate position term {}.", term.id),
				});
			}
			if term.parent.is_none() {
				departments.insert(&term.id);
			}
		}
		for term in &self.position_terms {
			if let Some(parent) = term.parent.as_ref()
				&& !departments.contains(parent)
			{
				return Err(Error::InvalidSnapshot {
					message: format!("Job {} must point at a department, got {parent}.", term.id),
				});
			}
		}
		for taxonomy in self.attribute_terms.keys() {
			if ProfileTaxonomy::from_name(taxonomy).is_none() {
				return Err(Error::InvalidSnapshot {
					message: format!("Unknown profile taxonomy {taxonomy}."),
				});
			}
		}

		let mut profile_ids = BTreeSet::new();

		for record in &self.profiles {
			if !profile_ids.insert(&record.profile.id) {
				return Err(Error::InvalidSnapshot {
					message: format!("Duplicate profile {}.", record.profile.id),
				});
			}
			for taxonomy in record.memberships.keys() {
				if ProfileTaxonomy::from_name(taxonomy).is_none() {
					return Err(Error::InvalidSnapshot {
						message: format!(
							"Profile {} has memberships in unknown taxonomy {taxonomy}.",
							record.profile.id
						),
					});
				}
			}
		}
		for credit in &self.credits {
			if !profile_ids.contains(&credit.author_id) {
				return Err(Error::InvalidSnapshot {
					message: format!(
						"Credit {} references unknown author {}.",
						credit.id, credit.author_id
					),
				});
			}
		}

		Ok(())
	}
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PositionTermRecord {
	pub id: TermId,
	/// Absent for departments; names the owning department for jobs.
	#[serde(default)]
	pub parent: Option<TermId>,
	/// Curated links used to broaden filter recall. Typically sibling jobs or
	/// skills; never consumed by scoring.
	#[serde(default)]
	pub related: BTreeSet<TermId>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileRecord {
	#[serde(flatten)]
	pub profile: Profile,
	/// Flat-taxonomy term memberships, keyed by taxonomy name.
	#[serde(default)]
	pub memberships: BTreeMap<String, BTreeSet<TermId>>,
}
