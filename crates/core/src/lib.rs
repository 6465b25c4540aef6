//! fhir-docstore-core: shared types for the clinical-record document server
//!
//! Identifiers, the opaque resource schema and type catalog, the Bundle
//! envelope and the error taxonomy used by the HTTP layer.

pub mod bundle;
pub mod capability;
pub mod error;
pub mod id;
pub mod resource;

pub use bundle::{Bundle, BundleEntry, Category, INDEX_PAGE_SIZE, RESOURCE_TYPE_SCHEME};
pub use capability::{CapabilityResource, CapabilityRest, CapabilityStatement, Interaction};
pub use error::ResourceError;
pub use id::ObjectId;
pub use resource::{CATALOG, Document, Resource, ResourceType};
