//! Mapping of catalog failures onto HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use cadenza_core::Error as CatalogError;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The path, query string or JSON body could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// The shared catalog lock was poisoned by a panicking request.
    #[error("catalog unavailable")]
    Unavailable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Catalog(
                CatalogError::MissingReference
                | CatalogError::InvalidComposition(_)
                | CatalogError::InvalidFilter(_),
            ) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::ReferenceNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Catalog(CatalogError::Database(_) | CatalogError::InvalidData(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        } else {
            tracing::debug!("Request rejected ({status}): {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
