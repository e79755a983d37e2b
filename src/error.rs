//! Error types for the dictionary core

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, DictError>;

/// A single field rejected by record validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        FieldError::new(field, format!("Path `{field}` is required."))
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum DictError {
    #[error("{0}")]
    InvalidSubmission(String),

    #[error("No user found")]
    UserNotFound,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {}", join_fields(.0))]
    StorageValidation(Vec<FieldError>),

    #[error("Storage failure: {0}")]
    Infrastructure(String),
}

impl From<std::io::Error> for DictError {
    fn from(e: std::io::Error) -> Self {
        DictError::Infrastructure(e.to_string())
    }
}

impl From<serde_json::Error> for DictError {
    fn from(e: serde_json::Error) -> Self {
        DictError::Infrastructure(e.to_string())
    }
}

/// Malformed, mistyped or wrongly labelled request bodies.
impl From<JsonRejection> for DictError {
    fn from(rejection: JsonRejection) -> Self {
        DictError::InvalidSubmission(rejection.body_text())
    }
}

impl DictError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DictError::InvalidSubmission(message.into())
    }

    /// Error code for response bodies
    pub fn code(&self) -> &'static str {
        match self {
            DictError::InvalidSubmission(_) => "INVALID_SUBMISSION",
            DictError::UserNotFound => "USER_NOT_FOUND",
            DictError::NotFound(_) => "NOT_FOUND",
            DictError::StorageValidation(_) => "VALIDATION_FAILED",
            DictError::Infrastructure(_) => "INFRASTRUCTURE_FAILURE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DictError::InvalidSubmission(_) | DictError::StorageValidation(_) => {
                StatusCode::BAD_REQUEST
            }
            DictError::UserNotFound => StatusCode::UNAUTHORIZED,
            DictError::NotFound(_) => StatusCode::NOT_FOUND,
            DictError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DictError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            DictError::StorageValidation(details) => {
                warn!(error = %self, "record rejected");
                json!({
                    "success": false,
                    "error": self.code(),
                    "message": "Validation failed",
                    "details": details,
                })
            }
            // detail stays in the log
            DictError::Infrastructure(detail) => {
                error!(%detail, "storage failure");
                json!({
                    "success": false,
                    "error": self.code(),
                    "message": "Something went wrong.",
                })
            }
            _ => json!({
                "success": false,
                "error": self.code(),
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
