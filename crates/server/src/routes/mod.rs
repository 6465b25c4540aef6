pub mod health;
pub mod metadata;
pub mod metrics;
pub mod resource;

use std::sync::Arc;

use axum::Router;
use fhir_docstore_core::{CATALOG, Document};

use crate::db::DocumentStore;

pub use resource::{ResourceHandler, resource_routes};

/// Build the resource routes for every type in the catalog
pub fn fhir_routes(store: Arc<dyn DocumentStore>, base_url: Option<&str>) -> Router {
    CATALOG.iter().fold(Router::new(), |router, resource_type| {
        let handler = ResourceHandler::<Document>::new(*resource_type, store.clone(), base_url);
        router.merge(resource_routes(handler))
    })
}
