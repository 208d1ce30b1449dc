//! Logging utilities for the application
//!
//! This module sets up `tracing_subscriber` for the exporter. Output goes to
//! stdout either as compact text (`txt`) or as one JSON object per line
//! (`json`). `RUST_LOG`, when set, takes precedence over the CLI level.

use std::{fmt, str::FromStr};
use tracing_subscriber::{filter::EnvFilter, fmt as tracing_fmt, prelude::*, Layer, Registry};

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
	/// Compact human readable lines
	#[default]
	Text,
	/// One JSON object per line
	Json,
}

impl FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"txt" | "text" => Ok(Self::Text),
			"json" => Ok(Self::Json),
			other => Err(format!("unknown log format '{}', expected 'json' or 'txt'", other)),
		}
	}
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text => f.write_str("txt"),
			Self::Json => f.write_str("json"),
		}
	}
}

/// Maps a CLI level name (DEBUG, INFO, WARNING, ERROR, CRITICAL) to a filter directive
///
/// Unknown names fall back to `info`.
pub fn level_directive(level: &str) -> &'static str {
	match level.to_ascii_uppercase().as_str() {
		"TRACE" => "trace",
		"DEBUG" => "debug",
		"INFO" => "info",
		"WARNING" | "WARN" => "warn",
		"ERROR" | "CRITICAL" => "error",
		_ => "info",
	}
}

/// Setup logging for the application
///
/// # Arguments
/// * `format` - Output format
/// * `level` - CLI level name, ignored when `RUST_LOG` is set
pub fn setup_logging(
	format: LogFormat,
	level: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	setup_logging_with_writer(std::io::stdout, format, level)
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(
	writer: W,
	format: LogFormat,
	level: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(level_directive(level)));

	let output: Box<dyn Layer<Registry> + Send + Sync> = match format {
		LogFormat::Json => tracing_fmt::layer()
			.with_writer(writer)
			.json()
			.with_current_span(true)
			.boxed(),
		LogFormat::Text => tracing_fmt::layer()
			.with_writer(writer)
			.event_format(
				tracing_fmt::format()
					.with_level(true)
					.with_target(true)
					.with_thread_ids(false)
					.with_thread_names(false)
					.with_ansi(true)
					.compact(),
			)
			.boxed(),
	};

	tracing_subscriber::registry()
		.with(output)
		.with(filter)
		.try_init()?;
	Ok(())
}
