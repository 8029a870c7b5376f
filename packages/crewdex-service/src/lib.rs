pub mod admin;
pub mod candidates;
pub mod score;

mod validate;

use std::{collections::BTreeSet, sync::Arc};

use crewdex_config::Config;
use crewdex_domain::{Credit, PositionLevel, Profile, ProfileId, ProfileTaxonomy, TermId};
use crewdex_storage::DirectoryStore;

pub use admin::TaxonomyReport;
pub use candidates::{CandidatesRequest, CandidatesResponse};
pub use score::{ScoreRequest, ScoreResponse, ScoredCandidate};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Term-taxonomy side of the directory platform: hierarchy metadata, curated
/// related-term links, and per-taxonomy term inventories.
pub trait TermStore
where
	Self: Send + Sync,
{
	fn position_level(&self, term: &TermId) -> color_eyre::Result<Option<PositionLevel>>;
	fn related_terms(&self, term: &TermId) -> color_eyre::Result<BTreeSet<TermId>>;
	fn terms_by_taxonomy(&self, taxonomy: &str) -> color_eyre::Result<Option<BTreeSet<TermId>>>;
}

/// Record side of the directory platform: profiles, credits, and taxonomy
/// membership queries. A lookup that finds nothing is an empty result, not an
/// error; errors mean the collaborator itself is unreachable.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn credits_matching(
		&self,
		positions: &[TermId],
		skills: &[TermId],
	) -> color_eyre::Result<Vec<Credit>>;
	fn credits_by_author(&self, profile: &ProfileId) -> color_eyre::Result<Vec<Credit>>;
	fn profiles_with_terms(
		&self,
		taxonomy: ProfileTaxonomy,
		terms: &[TermId],
	) -> color_eyre::Result<BTreeSet<ProfileId>>;
	fn profile_terms(
		&self,
		profile: &ProfileId,
		taxonomy: ProfileTaxonomy,
	) -> color_eyre::Result<BTreeSet<TermId>>;
	fn profile_by_id(&self, profile: &ProfileId) -> color_eyre::Result<Option<Profile>>;
	fn all_profile_ids(&self) -> color_eyre::Result<Vec<ProfileId>>;
}

#[derive(Clone)]
pub struct Stores {
	pub terms: Arc<dyn TermStore>,
	pub records: Arc<dyn RecordStore>,
}
impl Stores {
	pub fn new(terms: Arc<dyn TermStore>, records: Arc<dyn RecordStore>) -> Self {
		Self { terms, records }
	}
}
impl From<Arc<DirectoryStore>> for Stores {
	fn from(store: Arc<DirectoryStore>) -> Self {
		Self { terms: store.clone(), records: store }
	}
}

#[derive(Debug)]
pub enum ServiceError {
	/// Unknown or malformed term ids in the request, rejected before any
	/// store query runs. `fields` holds the offending JSON paths.
	InvalidFilter { fields: Vec<String> },
	/// The term or record store itself is unreachable. Never retried here;
	/// retry policy belongs to the caller.
	Collaborator { message: String },
}
impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidFilter { fields } => {
				write!(f, "Unknown or malformed term ids at {}.", fields.join(", "))
			},
			Self::Collaborator { message } => {
				write!(f, "Directory store unavailable: {message}")
			},
		}
	}
}
impl std::error::Error for ServiceError {}
impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Collaborator { message: err.to_string() }
	}
}

/// The search core. Stateless between calls: every invocation is a pure
/// function of the request and the current store contents, so instances are
/// freely shared behind an `Arc`.
pub struct SearchService {
	pub cfg: Config,
	stores: Stores,
	scoring_pool: rayon::ThreadPool,
}
impl SearchService {
	pub fn new(cfg: Config, store: Arc<DirectoryStore>) -> color_eyre::Result<Self> {
		Self::with_stores(cfg, Stores::from(store))
	}

	pub fn with_stores(cfg: Config, stores: Stores) -> color_eyre::Result<Self> {
		// The pool bounds concurrent per-candidate scoring work to what the
		// collaborator store can serve, independent of the host CPU count.
		let scoring_pool = rayon::ThreadPoolBuilder::new()
			.num_threads(cfg.search.scoring_workers)
			.thread_name(|index| format!("crewdex-score-{index}"))
			.build()
			.map_err(|err| color_eyre::eyre::eyre!("Failed to build scoring pool: {err}."))?;

		Ok(Self { cfg, stores, scoring_pool })
	}

	pub(crate) fn stores(&self) -> &Stores {
		&self.stores
	}

	pub(crate) fn scoring_pool(&self) -> &rayon::ThreadPool {
		&self.scoring_pool
	}
}

impl TermStore for DirectoryStore {
	fn position_level(&self, term: &TermId) -> color_eyre::Result<Option<PositionLevel>> {
		Ok(DirectoryStore::position_level(self, term).cloned())
	}

	fn related_terms(&self, term: &TermId) -> color_eyre::Result<BTreeSet<TermId>> {
		Ok(DirectoryStore::related_terms(self, term))
	}

	fn terms_by_taxonomy(&self, taxonomy: &str) -> color_eyre::Result<Option<BTreeSet<TermId>>> {
		Ok(DirectoryStore::terms_by_taxonomy(self, taxonomy))
	}
}

impl RecordStore for DirectoryStore {
	fn credits_matching(
		&self,
		positions: &[TermId],
		skills: &[TermId],
	) -> color_eyre::Result<Vec<Credit>> {
		let matched = DirectoryStore::credits_matching(self, positions, skills);

		Ok(matched.into_iter().cloned().collect())
	}

	fn credits_by_author(&self, profile: &ProfileId) -> color_eyre::Result<Vec<Credit>> {
		Ok(DirectoryStore::credits_by_author(self, profile).to_vec())
	}

	fn profiles_with_terms(
		&self,
		taxonomy: ProfileTaxonomy,
		terms: &[TermId],
	) -> color_eyre::Result<BTreeSet<ProfileId>> {
		Ok(DirectoryStore::profiles_with_terms(self, taxonomy, terms))
	}

	fn profile_terms(
		&self,
		profile: &ProfileId,
		taxonomy: ProfileTaxonomy,
	) -> color_eyre::Result<BTreeSet<TermId>> {
		Ok(DirectoryStore::profile_terms(self, profile, taxonomy))
	}

	fn profile_by_id(&self, profile: &ProfileId) -> color_eyre::Result<Option<Profile>> {
		Ok(DirectoryStore::profile_by_id(self, profile).cloned())
	}

	fn all_profile_ids(&self) -> color_eyre::Result<Vec<ProfileId>> {
		Ok(DirectoryStore::all_profile_ids(self))
	}
}
