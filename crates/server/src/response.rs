//! Uniform JSON response envelope.
//!
//! Every response, success or failure, is wrapped in
//! `{ success, data?, message?, count?, errors? }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::validation::FieldError;

/// The response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful single-item response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
            errors: None,
        }
    }

    /// Successful response with a human-readable message.
    pub fn ok_with_message(message: &str, data: T) -> Self {
        Self {
            message: Some(message.to_owned()),
            ..Self::ok(data)
        }
    }

    /// Failure with a single message.
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            count: None,
            data: None,
            errors: None,
        }
    }

    /// Failure with field-level validation errors.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: None,
            count: None,
            data: None,
            errors: Some(errors),
        }
    }

    /// Respond with a non-200 success status (e.g. 201 Created).
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Successful list response; `count` mirrors the data length.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
            errors: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
