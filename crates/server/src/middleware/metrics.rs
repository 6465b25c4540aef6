//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use fhir_docstore_core::ObjectId;
use std::time::Instant;

/// Normalize request paths to avoid high-cardinality labels.
/// Replaces identifier segments with `:id` so all per-resource requests share one label.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| if ObjectId::is_valid(seg) { ":id" } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn identifier_segments_collapse() {
        assert_eq!(
            normalize_path("/Alert/5f0c1b2a3d4e5f6a7b8c9d0e"),
            "/Alert/:id"
        );
        assert_eq!(normalize_path("/Alert"), "/Alert");
        assert_eq!(normalize_path("/Alert/not-an-id"), "/Alert/not-an-id");
    }
}
