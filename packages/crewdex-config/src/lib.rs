mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Search, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, bind) in
		[("service.http_bind", &cfg.service.http_bind), ("service.admin_bind", &cfg.service.admin_bind)]
	{
		if bind.parse::<std::net::SocketAddr>().is_err() {
			return Err(Error::Validation {
				message: format!("{label} must be a valid socket address."),
			});
		}
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.snapshot_path.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.snapshot_path must be non-empty.".to_string(),
		});
	}
	if cfg.search.scoring_workers == 0 {
		return Err(Error::Validation {
			message: "search.scoring_workers must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
