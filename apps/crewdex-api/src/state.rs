use std::sync::Arc;

use crewdex_service::SearchService;
use crewdex_storage::DirectoryStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
	pub store: Arc<DirectoryStore>,
}
impl AppState {
	pub fn new(config: crewdex_config::Config) -> color_eyre::Result<Self> {
		let store = Arc::new(DirectoryStore::load(&config.storage.snapshot_path)?);

		tracing::info!(
			profiles = store.profile_count(),
			credits = store.credit_count(),
			"Directory snapshot loaded."
		);

		Self::from_parts(config, store)
	}

	/// Wires an already-built store, letting tests skip the snapshot file.
	pub fn from_parts(
		config: crewdex_config::Config,
		store: Arc<DirectoryStore>,
	) -> color_eyre::Result<Self> {
		let service = SearchService::new(config, store.clone())?;

		Ok(Self { service: Arc::new(service), store })
	}
}
