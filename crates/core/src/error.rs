use thiserror::Error;

/// Failures a resource operation can report.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A path identifier is not a well-formed identifier.
    #[error("Invalid id")]
    InvalidIdentifier(String),

    #[error("{resource_type}/{id} not found")]
    NotFound { resource_type: String, id: String },

    /// The request body does not parse as the expected resource schema.
    #[error("Invalid resource body: {0}")]
    DecodeFailure(String),

    /// I/O, serialization or driver-level fault in the document store.
    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl ResourceError {
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
