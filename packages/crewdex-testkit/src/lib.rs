use std::collections::BTreeSet;

use crewdex_domain::{Credit, CreditId, Profile, ProfileId, SEARCHABLE_ROLE, TermId};
use crewdex_storage::{DirectoryStore, PositionTermRecord, ProfileRecord, Snapshot};

/// Assembles small in-memory directories for tests. Methods chain; `store()`
/// validates the snapshot the same way production loading does and panics on a
/// broken fixture.
#[derive(Default)]
pub struct DirectoryFixture {
	snapshot: Snapshot,
}
impl DirectoryFixture {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn department(mut self, id: &str) -> Self {
		self.snapshot.position_terms.push(PositionTermRecord {
			id: TermId::from(id),
			parent: None,
			related: BTreeSet::new(),
		});

		self
	}

	pub fn job(self, id: &str, department: &str) -> Self {
		self.job_with_related(id, department, &[])
	}

	pub fn job_with_related(mut self, id: &str, department: &str, related: &[&str]) -> Self {
		self.snapshot.position_terms.push(PositionTermRecord {
			id: TermId::from(id),
			parent: Some(TermId::from(department)),
			related: related.iter().copied().map(TermId::from).collect(),
		});

		self
	}

	pub fn skill(mut self, id: &str) -> Self {
		self.snapshot.skill_terms.insert(TermId::from(id));

		self
	}

	/// Declares a term in a flat profile taxonomy's inventory without any
	/// profile holding it yet.
	pub fn attribute_term(mut self, taxonomy: &str, id: &str) -> Self {
		self.snapshot
			.attribute_terms
			.entry(taxonomy.to_string())
			.or_default()
			.insert(TermId::from(id));

		self
	}

	/// A visible, complete crew member; the common case.
	pub fn crew_member(self, id: &str, first_name: &str, last_name: &str) -> Self {
		self.profile(id, SEARCHABLE_ROLE, true, first_name, last_name)
	}

	pub fn hidden_crew_member(self, id: &str, first_name: &str, last_name: &str) -> Self {
		self.profile(id, SEARCHABLE_ROLE, false, first_name, last_name)
	}

	/// A crew member with both name fields empty, which search must skip.
	pub fn incomplete_crew_member(self, id: &str) -> Self {
		self.profile(id, SEARCHABLE_ROLE, true, "", "")
	}

	pub fn profile(
		mut self,
		id: &str,
		role: &str,
		visible: bool,
		first_name: &str,
		last_name: &str,
	) -> Self {
		self.snapshot.profiles.push(ProfileRecord {
			profile: Profile {
				id: ProfileId::from(id),
				role: role.to_string(),
				visible,
				first_name: first_name.to_string(),
				last_name: last_name.to_string(),
			},
			memberships: Default::default(),
		});

		self
	}

	/// Attaches flat-taxonomy terms to an already declared profile.
	pub fn membership(mut self, profile: &str, taxonomy: &str, terms: &[&str]) -> Self {
		let record = self
			.snapshot
			.profiles
			.iter_mut()
			.find(|record| record.profile.id.as_str() == profile)
			.unwrap_or_else(|| panic!("Fixture profile {profile} must be declared first."));

		record
			.memberships
			.entry(taxonomy.to_string())
			.or_default()
			.extend(terms.iter().copied().map(TermId::from));

		self
	}

	pub fn credit(mut self, id: &str, author: &str, positions: &[&str], skills: &[&str]) -> Self {
		self.snapshot.credits.push(Credit {
			id: CreditId::from(id),
			author_id: ProfileId::from(author),
			position_terms: positions.iter().copied().map(TermId::from).collect(),
			skill_terms: skills.iter().copied().map(TermId::from).collect(),
		});

		self
	}

	pub fn snapshot(self) -> Snapshot {
		self.snapshot.validate().expect("Fixture snapshot must validate.");

		self.snapshot
	}

	pub fn store(self) -> DirectoryStore {
		DirectoryStore::from_snapshot(self.snapshot())
	}
}

#[cfg(test)]
mod tests {
	use super::DirectoryFixture;
	use crewdex_domain::{ProfileTaxonomy, TermId};

	#[test]
	fn fixture_round_trips_through_the_store() {
		let store = DirectoryFixture::new()
			.department("electric")
			.job("gaffer", "electric")
			.skill("rigging")
			.crew_member("p1", "Maya", "Deren")
			.membership("p1", "union", &["local-600"])
			.credit("c1", "p1", &["gaffer"], &["rigging"])
			.store();

		assert_eq!(store.profile_count(), 1);
		assert_eq!(store.credit_count(), 1);
		assert_eq!(store.credits_by_author(&"p1".into()).len(), 1);
		assert!(
			store
				.profiles_with_terms(ProfileTaxonomy::Union, &[TermId::from("local-600")])
				.contains(&"p1".into())
		);
	}

	#[test]
	#[should_panic(expected = "must be declared first")]
	fn membership_requires_a_declared_profile() {
		let _ = DirectoryFixture::new().membership("ghost", "union", &["local-600"]);
	}
}
