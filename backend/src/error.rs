//! Error handling for the FarmGuard server
//!
//! Engine failures are mapped onto consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::AgronomyError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Unknown nutrient: {0}")]
    UnknownNutrient(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid reference data: {0}")]
    ReferenceData(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<AgronomyError> for AppError {
    fn from(err: AgronomyError) -> Self {
        match err {
            AgronomyError::UnknownCrop(crop) => AppError::UnknownCrop(crop),
            AgronomyError::UnknownNutrient(name) => AppError::UnknownNutrient(name),
            AgronomyError::InvalidSoilInput { field, message }
            | AgronomyError::InvalidParameter { field, message } => AppError::Validation { field, message },
            AgronomyError::InvalidReferenceData(msg) => AppError::ReferenceData(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().copied().collect();
        fields.sort_unstable();
        let first = fields
            .first()
            .and_then(|field| field_errors.get(field).and_then(|e| e.first()).map(|e| (*field, e)));
        match first {
            Some((field, error)) => AppError::Validation {
                field: field.to_string(),
                message: describe_violation(field, error),
            },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Human-readable message for one validator failure
fn describe_violation(field: &str, error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &*error.code {
        "length" => format!("{} has an invalid length", field),
        "range" => format!("{} is out of range", field),
        _ => format!("{} is invalid", field),
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::UnknownCrop(crop) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "UNKNOWN_CROP".to_string(),
                    message: format!("Crop '{}' not found in database", crop),
                    field: None,
                },
            ),
            AppError::UnknownNutrient(name) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNKNOWN_NUTRIENT".to_string(),
                    message: format!("Unknown nutrient '{}'", name),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::ReferenceData(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "REFERENCE_DATA_ERROR".to_string(),
                    message: format!("Reference data error: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
