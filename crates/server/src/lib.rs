//! fhir-docstore-server library crate
//!
//! Exposes `build_app`, the store backends and the building blocks of the
//! router for integration tests. The binary entrypoint is in `main.rs`.

pub mod config;
pub mod db;
mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::DocumentStore;

pub use error::AppError;

/// Build the full application router with all routes and middleware.
///
/// The store handle is created once by the caller and shared by every
/// request, so tests can pass an in-memory or instrumented store.
pub fn build_app(store: Arc<dyn DocumentStore>, config: &Config) -> Router {
    // Install Prometheus metrics recorder.
    // Repeated calls (e.g. in integration tests) keep the first global
    // recorder; the fresh handle still renders for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    // Resource routes publish into the request context, which the audit
    // middleware reads before the context middleware clears it.
    let resource_routes = routes::fhir_routes(store.clone(), config.base_url.as_deref())
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_context_middleware));

    let public_routes = Router::new()
        .route("/metadata", get(routes::metadata::get))
        .route("/health", get(routes::health::check))
        .with_state(store)
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any)
    };

    Router::new()
        .merge(public_routes)
        .merge(resource_routes)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
