//! Application error handling

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use fhir_docstore_core::ResourceError;

/// Application error type
///
/// Rendered as a plain-text message. Only a malformed identifier is a client
/// error; everything else surfaces as a server error.
#[derive(Debug)]
pub enum AppError {
    InvalidIdentifier,
    NotFound(String),
    Decode(String),
    Store(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::Decode(_) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidIdentifier => "Invalid id".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Decode(msg) => msg.clone(),
            AppError::Store(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), "{}", message);
        } else {
            tracing::warn!(status = %status.as_u16(), "{}", message);
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::InvalidIdentifier(_) => AppError::InvalidIdentifier,
            e @ ResourceError::NotFound { .. } => AppError::NotFound(e.to_string()),
            e @ ResourceError::DecodeFailure(_) => AppError::Decode(e.to_string()),
            e @ ResourceError::StoreFailure(_) => AppError::Store(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_identifiers_are_client_errors() {
        let cases = [
            (ResourceError::InvalidIdentifier("x".into()), StatusCode::BAD_REQUEST),
            (
                ResourceError::not_found("Alert", "abc"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ResourceError::DecodeFailure("eof".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ResourceError::StoreFailure("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn invalid_identifier_message_is_fixed() {
        let err = AppError::from(ResourceError::InvalidIdentifier("bad".into()));
        assert_eq!(err.message(), "Invalid id");
    }
}
