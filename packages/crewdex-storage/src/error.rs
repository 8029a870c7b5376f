pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read snapshot file at {path:?}.")]
	ReadSnapshot { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse snapshot file at {path:?}.")]
	ParseSnapshot { path: std::path::PathBuf, source: serde_json::Error },
	#[error("{message}")]
	InvalidSnapshot { message: String },
}
