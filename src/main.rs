//! Wallets exporter entry point.
//!
//! This binary loads the network and wallet configuration, resolves the chain
//! registry, starts the Prometheus metrics server and runs the polling loop
//! until interrupted.
//!
//! # Flow
//! 1. Parses the command line and loads `.env`
//! 2. Sets up logging with the requested format and level
//! 3. Loads and validates the configuration, exiting with status 1 on error
//! 4. Builds the exporter and serves `/metrics`
//! 5. Handles graceful shutdown on Ctrl+C

use anyhow::{anyhow, Context};
use clap::{Arg, Command};
use dotenvy::dotenv;
use std::{path::Path, sync::Arc};
use tokio::sync::watch;
use tracing::{error, info};

use wallets_exporter::{
	bootstrap::initialize_exporter,
	models::{ConfigLoader, ExporterConfig, ExporterSettings},
	utils::{
		constants::DEFAULT_CONFIG_PATH,
		logging::{setup_logging, LogFormat},
		metrics::{server::create_metrics_server, PrometheusMetrics},
	},
};

fn cli() -> Command {
	Command::new("wallets-exporter")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Exports wallet balances of several blockchain networks as Prometheus metrics.")
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.help("Path to the configuration file")
				.value_name("PATH")
				.default_value(DEFAULT_CONFIG_PATH),
		)
		.arg(
			Arg::new("format")
				.long("format")
				.alias("lf")
				.help("Log format")
				.value_parser(["json", "txt"])
				.default_value("txt"),
		)
		.arg(
			Arg::new("level")
				.long("level")
				.help("Log level")
				.value_parser(["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])
				.default_value("INFO"),
		)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let matches = cli().get_matches();

	dotenv().ok();

	let format: LogFormat = matches
		.get_one::<String>("format")
		.map(|format| format.parse())
		.transpose()
		.map_err(|e: String| anyhow!(e))?
		.unwrap_or_default();
	let level = matches
		.get_one::<String>("level")
		.map(String::as_str)
		.unwrap_or("INFO");

	if let Err(e) = setup_logging(format, level) {
		eprintln!("Failed to setup logging: {}", e);
	}

	let config_path = matches
		.get_one::<String>("config")
		.map(String::as_str)
		.unwrap_or(DEFAULT_CONFIG_PATH);

	let config = match ExporterConfig::load_from_path(Path::new(config_path)) {
		Ok(config) => config,
		// ConfigError constructors log the diagnostic
		Err(_) => std::process::exit(1),
	};

	let settings = match ExporterSettings::from_env() {
		Ok(settings) => settings,
		Err(_) => std::process::exit(1),
	};

	info!(
		networks = config.networks.len(),
		wallets = config.wallet_count(),
		"Configuration loaded"
	);

	let metrics = Arc::new(PrometheusMetrics::new().context("Failed to create metrics registry")?);

	let exporter = initialize_exporter(config, &settings, metrics.clone(), metrics.clone())
		.await
		.map_err(|e| anyhow!("Failed to initialize exporter: {}", e))?;

	let server = create_metrics_server(format!("0.0.0.0:{}", settings.exporter_port), metrics)
		.context("Failed to create metrics server")?;
	let server_handle = server.handle();

	let (shutdown_tx, shutdown_rx) = watch::channel(false);

	info!("Service started. Press Ctrl+C to shutdown");

	tokio::select! {
		result = tokio::signal::ctrl_c() => {
			if let Err(e) = result {
				error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping services...");
		}
		result = server => {
			if let Err(e) = result {
				error!("Metrics server error: {}", e);
			}
			info!("Metrics server stopped, shutting down services...");
		}
		_ = exporter.run(shutdown_rx) => {
			info!("Exporter loop ended");
		}
	}

	let _ = shutdown_tx.send(true);
	server_handle.stop(true).await;

	info!("Shutdown complete");
	Ok(())
}
