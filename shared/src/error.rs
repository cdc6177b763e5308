//! Error types for the agronomy engine

use thiserror::Error;

/// Failures raised by the scoring and calculator operations.
///
/// All of them are local and synchronous; callers decide how to surface them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgronomyError {
    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Invalid soil input for {field}: {message}")]
    InvalidSoilInput { field: String, message: String },

    #[error("Unknown nutrient: {0}")]
    UnknownNutrient(String),

    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("Invalid reference data: {0}")]
    InvalidReferenceData(String),
}

impl AgronomyError {
    pub(crate) fn soil_input(field: &str, message: impl Into<String>) -> Self {
        AgronomyError::InvalidSoilInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn parameter(field: &str, message: impl Into<String>) -> Self {
        AgronomyError::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations
pub type AgronomyResult<T> = Result<T, AgronomyError>;
