//! Generic resource handlers
//!
//! Every resource type shares the same five operations. A router is built
//! per type from its [`ResourceType`] descriptor and schema type `R`.

use std::sync::Arc;

use axum::{
    Extension, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use fhir_docstore_core::{Bundle, INDEX_PAGE_SIZE, ObjectId, Resource, ResourceType};
use serde::Serialize;

use crate::db::{Collection, DocumentStore};
use crate::error::AppError;
use crate::middleware::{Action, RequestContext};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Shared state of one resource type's handlers
pub struct ResourceHandler<R> {
    collection: Collection<R>,
    base_url: Option<Arc<str>>,
}

impl<R> Clone for ResourceHandler<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<R: Resource> ResourceHandler<R> {
    pub fn new(
        resource_type: ResourceType,
        store: Arc<dyn DocumentStore>,
        base_url: Option<&str>,
    ) -> Self {
        Self {
            collection: Collection::new(resource_type, store),
            base_url: base_url.map(Arc::from),
        }
    }

    fn resource_type(&self) -> &ResourceType {
        self.collection.resource_type()
    }

    fn location(&self, id: &ObjectId) -> String {
        let path = self.resource_type().instance_path(&id.to_hex());
        match &self.base_url {
            Some(base) => format!("{}{}", base, path),
            None => path,
        }
    }
}

/// Build the `/{Type}` and `/{Type}/{id}` routes for one resource type
pub fn resource_routes<R: Resource>(handler: ResourceHandler<R>) -> Router {
    let resource_type = *handler.resource_type();
    Router::new()
        .route(&resource_type.path(), get(index::<R>).post(create::<R>))
        .route(
            &format!("/{}/{{id}}", resource_type.name),
            get(show::<R>).put(update::<R>).delete(delete::<R>),
        )
        .with_state(handler)
}

fn json_response<T: Serialize>(body: &T) -> Result<Response, AppError> {
    let bytes = serde_json::to_vec(body).map_err(|e| AppError::Store(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        bytes,
    )
        .into_response())
}

fn to_subject<T: Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Store(e.to_string()))
}

/// GET /{Type} - First page of the collection wrapped in a Bundle
pub async fn index<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    Extension(context): Extension<RequestContext>,
) -> Result<Response, AppError> {
    let resources = handler.collection.find_all(INDEX_PAGE_SIZE).await?;
    let subject = to_subject(&resources)?;
    let bundle = Bundle::build(handler.resource_type(), resources);
    let response = json_response(&bundle)?;

    let name = handler.resource_type().name;
    tracing::debug!(resource = name, total = bundle.total_results, "Setting search context");
    context.record(name, Action::Search, subject);

    Ok(response)
}

/// GET /{Type}/{id} - Read one resource
pub async fn show<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let resource = handler.collection.find_by_id(&id).await?;
    let response = json_response(&resource)?;

    let name = handler.resource_type().name;
    tracing::debug!(resource = name, id = %id, "Setting read context");
    context.record(name, Action::Read, to_subject(&resource)?);

    Ok(response)
}

/// POST /{Type} - Create a resource under a freshly minted id
///
/// Any `id` in the body is replaced.
pub async fn create<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    Extension(context): Extension<RequestContext>,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut resource = R::decode(&body)?;
    let id = ObjectId::new();
    resource.set_id(id);

    handler.collection.insert(&resource).await?;

    let location = HeaderValue::from_str(&handler.location(&id))
        .map_err(|e| AppError::Store(format!("Invalid Location header: {}", e)))?;

    let name = handler.resource_type().name;
    tracing::debug!(resource = name, id = %id, "Setting create context");
    context.record(name, Action::Create, to_subject(&resource)?);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// PUT /{Type}/{id} - Replace a resource; the path id wins over the body
pub async fn update<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = ObjectId::parse(&id)?;
    let mut resource = R::decode(&body)?;
    resource.set_id(id);

    handler
        .collection
        .replace_by_id(&id.to_hex(), &resource)
        .await?;

    let name = handler.resource_type().name;
    tracing::debug!(resource = name, id = %id, "Setting update context");
    context.record(name, Action::Update, to_subject(&resource)?);

    Ok(StatusCode::OK.into_response())
}

/// DELETE /{Type}/{id} - Remove a resource
pub async fn delete<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = ObjectId::parse(&id)?;
    handler.collection.remove_by_id(&id.to_hex()).await?;

    let name = handler.resource_type().name;
    tracing::debug!(resource = name, id = %id, "Setting delete context");
    context.record(name, Action::Delete, serde_json::Value::String(id.to_hex()));

    Ok(StatusCode::NO_CONTENT.into_response())
}
