//! Configuration loading and validation.
//!
//! The exporter reads a single YAML (or JSON) document listing networks and
//! their wallets, plus a handful of runtime settings taken from the
//! environment.

use std::path::Path;

mod error;
mod exporter_config;
mod settings;

pub use error::ConfigError;
pub use exporter_config::ExporterConfig;
pub use settings::ExporterSettings;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), String>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
