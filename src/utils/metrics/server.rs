//! Metrics server module
//!
//! This module provides an HTTP server to expose Prometheus metrics for scraping.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::sync::Arc;
use tracing::{error, info};

use crate::utils::metrics::PrometheusMetrics;

pub type MetricsData = web::Data<Arc<PrometheusMetrics>>;

/// Metrics endpoint handler
async fn metrics_handler(metrics: MetricsData) -> impl Responder {
	match metrics.gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Create metrics server
///
/// # Arguments
/// * `bind_address` - `host:port` to listen on
/// * `metrics` - Registry to expose
///
/// # Returns
/// * `std::io::Result<Server>` - Server future, or the bind error
pub fn create_metrics_server(
	bind_address: String,
	metrics: Arc<PrometheusMetrics>,
) -> std::io::Result<actix_web::dev::Server> {
	info!("Starting metrics server on {}", bind_address);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(web::Data::new(metrics.clone()))
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(2)
	.bind(bind_address)?
	.shutdown_timeout(5)
	.disable_signals()
	.run())
}
