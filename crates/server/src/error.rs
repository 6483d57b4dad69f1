//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the `IntoResponse` impl maps each kind to a
//! status code and the uniform JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::response::ApiResponse;
use crate::validation::FieldError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// No sweet with the requested id.
    #[error("Sweet not found")]
    NotFound,

    /// Purchase or restock amount below 1 (or missing).
    #[error("Please provide a valid quantity")]
    InvalidAmount,

    /// Purchase exceeds available stock.
    #[error("Only {available} items available in stock")]
    InsufficientStock { available: i64 },

    /// Field-level validation failures on create or update.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Malformed request (body or query parameters).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No or invalid credential on a role-gated operation.
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid credential, wrong role.
    #[error("Not authorized to perform this action")]
    Forbidden,

    /// Storage failure; details are hidden from the client.
    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => Self::NotFound,
            CatalogError::InsufficientStock { available } => Self::InsufficientStock { available },
            other => Self::Catalog(other),
        }
    }
}

impl AppError {
    /// Status code for this error kind.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidAmount
            | Self::InsufficientStock { .. }
            | Self::Validation(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Catalog(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        let body = match self {
            Self::Validation(errors) => ApiResponse::<()>::validation(errors),
            // Don't expose internal error details to clients
            Self::Catalog(_) => ApiResponse::<()>::error("Internal server error".to_owned()),
            other => ApiResponse::<()>::error(other.to_string()),
        };

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
