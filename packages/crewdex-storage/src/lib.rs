pub mod directory;
pub mod snapshot;

mod error;

pub use directory::DirectoryStore;
pub use error::Error;
pub use snapshot::{PositionTermRecord, ProfileRecord, Snapshot};

pub type Result<T, E = Error> = std::result::Result<T, E>;
