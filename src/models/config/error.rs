//! Configuration error types.
//!
//! Errors raised while loading the exporter configuration file or reading
//! runtime settings from the environment. All of them are fatal at startup.

use log::error;
use std::{
	error::Error,
	fmt,
	path::{Path, PathBuf},
};

/// Errors that can occur while loading configuration or settings
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// The document parsed but does not describe a usable set of networks
	ValidationError(String),

	/// The document or an environment setting could not be parsed
	ParseError(String),

	/// The configuration file could not be read
	FileError { path: PathBuf, message: String },
}

impl ConfigError {
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError(msg) => format!("Invalid configuration: {}", msg),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
			Self::FileError { path, message } => {
				format!("Cannot read {}: {}", path.display(), message)
			}
		}
	}

	/// Create a new validation error and log it
	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a new parse error and log it
	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a parse error for an environment setting and log it
	///
	/// # Arguments
	/// * `key` - Environment variable name
	/// * `raw` - Value found in the environment
	/// * `reason` - Why the value was rejected
	pub fn invalid_setting(key: &str, raw: &str, reason: impl fmt::Display) -> Self {
		Self::parse_error(format!("{}='{}': {}", key, raw, reason))
	}

	/// Create a new file error for `path` and log it
	pub fn file_error(path: &Path, err: std::io::Error) -> Self {
		let error = Self::FileError {
			path: path.to_path_buf(),
			message: err.to_string(),
		};
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string())
	}
}

impl From<serde_yaml::Error> for ConfigError {
	fn from(err: serde_yaml::Error) -> Self {
		match err.location() {
			Some(location) => Self::parse_error(format!(
				"{} (line {}, column {})",
				err,
				location.line(),
				location.column()
			)),
			None => Self::parse_error(err.to_string()),
		}
	}
}
