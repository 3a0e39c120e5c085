//! Request pipeline errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Every way a non-exempt request can fail.
///
/// The error is attached to the response as an extension so the access
/// logger can report it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("host {host:?} is not served under {domain}")]
    DomainMismatch { host: String, domain: String },

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("object store unavailable: {0}")]
    StoreTransient(String),

    #[error("object store timed out: {0}")]
    StoreTimeout(String),

    #[error("object store failure: {0}")]
    StoreFatal(String),

    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::DomainMismatch { .. } | GatewayError::ObjectNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            GatewayError::StoreTransient(_) => StatusCode::BAD_GATEWAY,
            GatewayError::StoreTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::StoreFatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::MalformedPath(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::DomainMismatch { .. } => "domain_mismatch",
            GatewayError::ObjectNotFound(_) => "object_not_found",
            GatewayError::StoreTransient(_) => "store_transient",
            GatewayError::StoreTimeout(_) => "store_timeout",
            GatewayError::StoreFatal(_) => "store_fatal",
            GatewayError::MalformedPath(_) => "malformed_path",
            GatewayError::MethodNotAllowed(_) => "method_not_allowed",
        }
    }

    /// Failures of the store itself, as opposed to bad or unmatched requests.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            GatewayError::StoreTransient(_)
                | GatewayError::StoreTimeout(_)
                | GatewayError::StoreFatal(_)
        )
    }
}

impl From<StorageError> for GatewayError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => GatewayError::ObjectNotFound(key),
            StorageError::Transient(msg) => GatewayError::StoreTransient(msg),
            StorageError::Timeout(msg) => GatewayError::StoreTimeout(msg),
            StorageError::Fatal(msg) => GatewayError::StoreFatal(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            message: status.canonical_reason().unwrap_or("Error"),
        };
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let mismatch = GatewayError::DomainMismatch {
            host: "evil.com".into(),
            domain: "example.com".into(),
        };
        assert_eq!(mismatch.status(), StatusCode::NOT_FOUND);
        assert_eq!(GatewayError::MalformedPath("..".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::StoreTransient("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            GatewayError::StoreTimeout("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GatewayError::StoreFatal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_storage_error() {
        let err: GatewayError = StorageError::NotFound("a/b".into()).into();
        assert_eq!(err, GatewayError::ObjectNotFound("a/b".into()));
        assert!(!err.is_store_failure());

        let err: GatewayError = StorageError::Timeout("slow".into()).into();
        assert!(err.is_store_failure());
    }

    #[test]
    fn test_response_carries_error_extension() {
        let response = GatewayError::StoreFatal("denied".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let attached = response.extensions().get::<GatewayError>().unwrap();
        assert_eq!(attached.kind(), "store_fatal");
    }
}
