//! HTTP middleware

pub mod audit;
pub mod context;
pub mod metrics;
pub mod request_id;

pub use audit::audit_middleware;
pub use context::{Action, RequestContext, request_context_middleware};
pub use self::metrics::metrics_middleware;
pub use request_id::{RequestId, request_id_middleware};
