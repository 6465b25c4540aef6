//! Audit logging driven by the request context

use axum::{body::Body, extract::Request, http::Method, middleware::Next, response::Response};
use serde_json::Value as JsonValue;

use super::context::RequestContext;
use super::request_id::RequestId;

/// Middleware that logs what each resource handler did.
///
/// Must run inside `request_context_middleware` so the context is still
/// populated when the handler returns. Failed mutations, which record no
/// context, are logged from the request line alone.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let context = request.extensions().get::<RequestContext>().cloned();

    let response = next.run(request).await;
    let status = response.status().as_u16();

    let recorded = context.as_ref().and_then(|ctx| {
        let resource = ctx.resource()?;
        let action = ctx.action()?;
        Some((resource, action, ctx.subject()))
    });

    match recorded {
        Some((resource, action, subject)) => {
            tracing::info!(
                target: "audit",
                request_id = %request_id,
                resource = %resource,
                action = %action,
                subject = %describe_subject(subject.as_ref()),
                status = %status,
                "Resource request"
            );
        }
        None if matches!(method, Method::POST | Method::PUT | Method::DELETE) => {
            tracing::info!(
                target: "audit",
                request_id = %request_id,
                method = %method,
                path = %uri,
                status = %status,
                "Mutation request"
            );
        }
        None => {}
    }

    response
}

/// Short description of a recorded subject: an id, or a result count.
fn describe_subject(subject: Option<&JsonValue>) -> String {
    match subject {
        Some(JsonValue::String(id)) => id.clone(),
        Some(JsonValue::Array(items)) => format!("{} results", items.len()),
        Some(JsonValue::Object(map)) => map
            .get("id")
            .and_then(JsonValue::as_str)
            .unwrap_or("-")
            .to_string(),
        _ => "-".to_string(),
    }
}
