//! Request-scoped context shared between handlers and outer middleware
//!
//! A fresh [`RequestContext`] is placed in the request extensions for every
//! inbound request. Handlers publish which resource, action and entity they
//! handled; outer layers such as the audit log read it once the handler has
//! returned. The values are cleared as soon as the response is produced.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::Value as JsonValue;

/// Key holding the resource type name.
pub const RESOURCE_KEY: &str = "Resource";
/// Key holding the action verb.
pub const ACTION_KEY: &str = "Action";

/// Verb a resource handler performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Search,
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Search => "search",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value side channel scoped to a single request
#[derive(Clone, Default)]
pub struct RequestContext {
    values: Arc<Mutex<HashMap<String, JsonValue>>>,
}

impl RequestContext {
    fn values(&self) -> MutexGuard<'_, HashMap<String, JsonValue>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set(&self, key: impl Into<String>, value: JsonValue) {
        self.values().insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.values().get(key).cloned()
    }

    /// Publish the resource type, action and subject a handler processed.
    ///
    /// The subject is stored under the resource type name.
    pub fn record(&self, resource_type: &str, action: Action, subject: JsonValue) {
        let mut values = self.values();
        values.insert(resource_type.to_string(), subject);
        values.insert(
            RESOURCE_KEY.to_string(),
            JsonValue::String(resource_type.to_string()),
        );
        values.insert(
            ACTION_KEY.to_string(),
            JsonValue::String(action.as_str().to_string()),
        );
    }

    pub fn resource(&self) -> Option<String> {
        self.get_str(RESOURCE_KEY)
    }

    pub fn action(&self) -> Option<String> {
        self.get_str(ACTION_KEY)
    }

    /// The entity recorded for the current resource type, if any.
    pub fn subject(&self) -> Option<JsonValue> {
        let resource = self.resource()?;
        self.get(&resource)
    }

    pub fn clear(&self) {
        self.values().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    fn get_str(&self, key: &str) -> Option<String> {
        match self.values().get(key) {
            Some(JsonValue::String(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("resource", &self.resource())
            .field("action", &self.action())
            .finish()
    }
}

/// Install a fresh context for the request and clear it once handled
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let context = RequestContext::default();
    request.extensions_mut().insert(context.clone());

    let response = next.run(request).await;

    context.clear();
    response
}
