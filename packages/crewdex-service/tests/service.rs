use std::{
	collections::BTreeSet,
	sync::Arc,
};

use crewdex_config::{Config, Search, Security, Service, Storage};
use crewdex_domain::{
	Credit, PositionLevel, Profile, ProfileId, ProfileTaxonomy, SearchFilterSet, TermId,
};
use crewdex_service::{RecordStore, SearchService, ServiceError, Stores, TermStore};
use crewdex_testkit::DirectoryFixture;

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { snapshot_path: "directory.json".into() },
		search: Search { scoring_workers: 2 },
		security: Security::default(),
	}
}

fn service(fixture: DirectoryFixture) -> SearchService {
	SearchService::new(test_config(), Arc::new(fixture.store()))
		.expect("Failed to build search service.")
}

fn terms(raw: &[&str]) -> Vec<TermId> {
	raw.iter().copied().map(TermId::from).collect()
}

fn ids(raw: &[&str]) -> Vec<ProfileId> {
	raw.iter().copied().map(ProfileId::from).collect()
}

fn id_set(raw: &[&str]) -> BTreeSet<ProfileId> {
	raw.iter().copied().map(ProfileId::from).collect()
}

/// Departments, jobs, and skills shared by most scenarios below.
fn base_fixture() -> DirectoryFixture {
	DirectoryFixture::new()
		.department("electric")
		.department("camera")
		.job_with_related("gaffer", "electric", &["best-boy"])
		.job("best-boy", "electric")
		.job("first-ac", "camera")
		.skill("rigging")
		.skill("steadicam")
}

#[test]
fn no_filter_returns_exactly_the_eligible_pool() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.crew_member("p2", "Sergei", "")
			.hidden_crew_member("p3", "Greta", "Gerwig")
			.incomplete_crew_member("p4")
			.profile("p5", "producer", true, "Dino", "De Laurentiis"),
	);
	let found = service
		.resolve_candidates(&SearchFilterSet::default(), None)
		.expect("No-filter search should succeed.");

	// Order is unconstrained (and randomized here), so compare as a set.
	assert_eq!(found.iter().cloned().collect::<BTreeSet<_>>(), id_set(&["p1", "p2"]));
}

#[test]
fn no_filter_respects_allowed_authors() {
	let service = service(
		base_fixture().crew_member("p1", "Maya", "Deren").crew_member("p2", "Agnes", "Varda"),
	);
	let allowed = id_set(&["p2", "p9"]);
	let found = service
		.resolve_candidates(&SearchFilterSet::default(), Some(&allowed))
		.expect("Narrowed search should succeed.");

	assert_eq!(found, ids(&["p2"]));
}

#[test]
fn credit_miss_short_circuits_before_attribute_filters() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.membership("p1", "union", &["local-600"])
			.credit("c1", "p1", &["first-ac"], &[]),
	);
	let filter = SearchFilterSet {
		positions: terms(&["gaffer"]),
		unions: terms(&["local-600"]),
		..SearchFilterSet::default()
	};
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	// p1 matches the union category, but the credit miss already decided the
	// outcome.
	assert!(found.is_empty());
}

#[test]
fn credit_categories_and_together_and_or_within() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.crew_member("p2", "Agnes", "Varda")
			.crew_member("p3", "Sergei", "Urusevsky")
			// p1 holds the position only, p2 the skill only.
			.credit("c1", "p1", &["first-ac"], &[])
			.credit("c2", "p2", &[], &["steadicam"])
			// p3 holds both, but split across two credits.
			.credit("c3", "p3", &["first-ac"], &[])
			.credit("c4", "p3", &[], &["steadicam"]),
	);
	let filter = SearchFilterSet {
		positions: terms(&["first-ac"]),
		skills: terms(&["steadicam"]),
		..SearchFilterSet::default()
	};
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	// The predicate is per credit: no single credit satisfies both categories.
	assert!(found.is_empty());

	let service = service_with_combined_credit();
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	assert_eq!(found, ids(&["p4"]));
}

fn service_with_combined_credit() -> SearchService {
	service(
		base_fixture()
			.crew_member("p4", "Vilmos", "Zsigmond")
			.credit("c5", "p4", &["first-ac"], &["steadicam"]),
	)
}

#[test]
fn in_category_or_accepts_any_selected_term() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.credit("c1", "p1", &["best-boy"], &[]),
	);
	let filter = SearchFilterSet {
		positions: terms(&["gaffer", "best-boy"]),
		..SearchFilterSet::default()
	};
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	assert_eq!(found, ids(&["p1"]));
}

#[test]
fn expansion_includes_related_term_credits_but_scoring_ignores_them() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			// Tagged only with the related term, never the selected one.
			.credit("c1", "p1", &["best-boy"], &[]),
	);
	let filter = SearchFilterSet { positions: terms(&["gaffer"]), ..SearchFilterSet::default() };
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	assert_eq!(found, ids(&["p1"]));

	let scored = service.score(&filter, &found).expect("Scoring should succeed.");

	assert_eq!(scored.len(), 1);
	assert_eq!(scored[0].score, 0);
}

#[test]
fn scores_accumulate_one_point_per_credit_match_without_cap() {
	let mut fixture = base_fixture().crew_member("p1", "Maya", "Deren");

	for index in 0..5 {
		fixture = fixture.credit(&format!("c{index}"), "p1", &["gaffer"], &[]);
	}

	let service = service(fixture);
	let filter = SearchFilterSet { positions: terms(&["gaffer"]), ..SearchFilterSet::default() };
	let scored = service.score(&filter, &ids(&["p1"])).expect("Scoring should succeed.");

	assert_eq!(scored[0].score, 5);
}

#[test]
fn scoring_preserves_input_order_including_zero_scores() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.crew_member("p2", "Agnes", "Varda")
			.crew_member("p3", "Sergei", "Urusevsky")
			.credit("c1", "p1", &["gaffer"], &[])
			.credit("c2", "p3", &["gaffer"], &["rigging"]),
	);
	let filter = SearchFilterSet {
		positions: terms(&["gaffer"]),
		skills: terms(&["rigging"]),
		..SearchFilterSet::default()
	};
	let scored = service
		.score(&filter, &ids(&["p3", "p2", "p1"]))
		.expect("Scoring should succeed.");
	let order: Vec<&str> = scored.iter().map(|entry| entry.profile_id.as_str()).collect();

	assert_eq!(order, ["p3", "p2", "p1"]);
	assert_eq!(scored[0].score, 2);
	assert_eq!(scored[1].score, 0);
	assert_eq!(scored[2].score, 1);
}

#[test]
fn job_selection_supersedes_department_in_scoring() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			// One credit at department level, one at job level.
			.credit("c1", "p1", &["electric"], &[])
			.credit("c2", "p1", &["gaffer"], &[]),
	);
	let mixed = SearchFilterSet {
		positions: terms(&["electric", "gaffer"]),
		..SearchFilterSet::default()
	};
	let scored = service.score(&mixed, &ids(&["p1"])).expect("Scoring should succeed.");

	// Only the job term counts once any job is selected.
	assert_eq!(scored[0].score, 1);

	let departments_only =
		SearchFilterSet { positions: terms(&["electric"]), ..SearchFilterSet::default() };
	let scored = service
		.score(&departments_only, &ids(&["p1"]))
		.expect("Scoring should succeed.");

	assert_eq!(scored[0].score, 1);
}

#[test]
fn attribute_memberships_score_one_point_per_matching_term() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.membership("p1", "union", &["local-600", "local-52"])
			.membership("p1", "location", &["nyc"]),
	);
	let filter = SearchFilterSet {
		unions: terms(&["local-600", "local-52"]),
		locations: terms(&["nyc"]),
		..SearchFilterSet::default()
	};
	let scored = service.score(&filter, &ids(&["p1"])).expect("Scoring should succeed.");

	assert_eq!(scored[0].score, 3);
}

#[test]
fn hidden_profiles_never_surface() {
	let service = service(
		base_fixture()
			.hidden_crew_member("p1", "Maya", "Deren")
			.membership("p1", "union", &["local-600"])
			.credit("c1", "p1", &["gaffer"], &["rigging"]),
	);
	let filter = SearchFilterSet {
		positions: terms(&["gaffer"]),
		skills: terms(&["rigging"]),
		unions: terms(&["local-600"]),
		..SearchFilterSet::default()
	};
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	assert!(found.is_empty());
}

#[test]
fn attribute_only_filter_intersects_categories() {
	let service = service(
		base_fixture()
			.crew_member("p1", "Maya", "Deren")
			.membership("p1", "union", &["u1"])
			.membership("p1", "location", &["l1"])
			.crew_member("p2", "Agnes", "Varda")
			.membership("p2", "union", &["u1"])
			.crew_member("p3", "Sergei", "Urusevsky")
			.membership("p3", "location", &["l1"]),
	);
	let filter = SearchFilterSet {
		unions: terms(&["u1"]),
		locations: terms(&["l1"]),
		..SearchFilterSet::default()
	};
	let found = service.resolve_candidates(&filter, None).expect("Search should succeed.");

	assert_eq!(found, ids(&["p1"]));
}

#[test]
fn unknown_term_ids_are_rejected_before_any_query() {
	let service = service(base_fixture().crew_member("p1", "Maya", "Deren"));
	let filter = SearchFilterSet {
		positions: terms(&["gaffer", "wormhole-operator"]),
		..SearchFilterSet::default()
	};
	let err = service
		.resolve_candidates(&filter, None)
		.expect_err("Unknown term must be rejected.");

	match err {
		ServiceError::InvalidFilter { fields } => {
			assert_eq!(fields, vec!["$.positions[1]".to_string()]);
		},
		other => panic!("Expected InvalidFilter, got {other:?}."),
	}
}

#[test]
fn blank_candidate_ids_are_rejected() {
	let service = service(base_fixture().crew_member("p1", "Maya", "Deren"));
	let err = service
		.score(&SearchFilterSet::default(), &[ProfileId::from("p1"), ProfileId::from("  ")])
		.expect_err("Blank candidate id must be rejected.");

	match err {
		ServiceError::InvalidFilter { fields } => {
			assert_eq!(fields, vec!["$.candidateIds[1]".to_string()]);
		},
		other => panic!("Expected InvalidFilter, got {other:?}."),
	}
}

#[test]
fn unknown_candidates_score_zero_rather_than_failing() {
	let service = service(base_fixture().crew_member("p1", "Maya", "Deren"));
	let scored = service
		.score(&SearchFilterSet::default(), &ids(&["ghost"]))
		.expect("Unknown candidates are silent non-matches.");

	assert_eq!(scored, vec![crewdex_service::ScoredCandidate {
		profile_id: ProfileId::from("ghost"),
		score: 0,
	}]);
}

/// A store whose every call fails, standing in for an unreachable platform.
struct OfflineStore;
impl TermStore for OfflineStore {
	fn position_level(
		&self,
		_: &TermId,
	) -> color_eyre::Result<Option<PositionLevel>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn related_terms(&self, _: &TermId) -> color_eyre::Result<BTreeSet<TermId>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn terms_by_taxonomy(&self, _: &str) -> color_eyre::Result<Option<BTreeSet<TermId>>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}
}
impl RecordStore for OfflineStore {
	fn credits_matching(
		&self,
		_: &[TermId],
		_: &[TermId],
	) -> color_eyre::Result<Vec<Credit>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn credits_by_author(&self, _: &ProfileId) -> color_eyre::Result<Vec<Credit>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn profiles_with_terms(
		&self,
		_: ProfileTaxonomy,
		_: &[TermId],
	) -> color_eyre::Result<BTreeSet<ProfileId>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn profile_terms(
		&self,
		_: &ProfileId,
		_: ProfileTaxonomy,
	) -> color_eyre::Result<BTreeSet<TermId>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn profile_by_id(&self, _: &ProfileId) -> color_eyre::Result<Option<Profile>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}

	fn all_profile_ids(&self) -> color_eyre::Result<Vec<ProfileId>> {
		Err(color_eyre::eyre::eyre!("store offline"))
	}
}

#[test]
fn unreachable_store_surfaces_as_collaborator_error() {
	let offline = Arc::new(OfflineStore);
	let service = SearchService::with_stores(
		test_config(),
		Stores::new(offline.clone(), offline),
	)
	.expect("Failed to build search service.");
	let filter = SearchFilterSet { positions: terms(&["gaffer"]), ..SearchFilterSet::default() };
	let err = service
		.resolve_candidates(&filter, None)
		.expect_err("An unreachable store must fail the request.");

	assert!(matches!(err, ServiceError::Collaborator { .. }));
}
