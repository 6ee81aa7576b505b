//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, ApiError>`. Validation problems never reach the store;
//! store problems keep their taxonomy on the way out:
//!
//! | Error | Status |
//! |---|---|
//! | `MalformedRequest` | 422 |
//! | `UnreadableBody` | status of the body rejection, e.g. 413 |
//! | `StoreUnavailable` | 503 |
//! | `WriteFailure` and anything else from the store | 500 |

use axum::{
    Json,
    extract::rejection::{BytesRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keepsake::error::DocumentStoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or query string does not match the record shape.
    #[error("{0}")]
    MalformedRequest(String),
    /// The body could not be read at all, e.g. it exceeds the size limit.
    #[error("{detail}")]
    UnreadableBody { status: StatusCode, detail: String },
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnreadableBody { status, .. } => *status,
            ApiError::Store(DocumentStoreError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::UnreadableBody { .. } => "unreadable_body",
            ApiError::Store(DocumentStoreError::StoreUnavailable(_)) => "store_unavailable",
            ApiError::Store(DocumentStoreError::WriteFailure(..)) => "write_failure",
            ApiError::Store(_) => "store_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(inner) => inner.into(),
            other => ApiError::MalformedRequest(other.body_text()),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::UnreadableBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::MalformedRequest(detail) => warn!(%detail, "rejected malformed request"),
            ApiError::UnreadableBody { status, detail } => warn!(%status, %detail, "rejected request body"),
            ApiError::Store(err) if err.is_unavailable() => warn!(error = %err, "store unavailable"),
            ApiError::Store(err) => error!(error = %err, "store operation failed"),
        }

        let body = ErrorBody {
            error: self.code(),
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MalformedRequest("missing field `title`".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(DocumentStoreError::StoreUnavailable("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DocumentStoreError::WriteFailure("song".into(), "duplicate key".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::MalformedRequest(String::new()).code(), "malformed_request");
        assert_eq!(
            ApiError::from(DocumentStoreError::WriteFailure("song".into(), "x".into())).code(),
            "write_failure"
        );
        assert_eq!(ApiError::from(DocumentStoreError::Backend("x".into())).code(), "store_error");
    }
}
