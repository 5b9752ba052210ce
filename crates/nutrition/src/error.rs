//! Error types for the nutrition crate.

use thiserror::Error;

/// Result type alias for serving operations.
pub type Result<T> = std::result::Result<T, ServingError>;

/// Errors that can occur while building or resolving a serving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServingError {
    /// Gram amount is zero or negative
    #[error("Serving must weigh more than 0 g, got {0}")]
    NonPositiveGrams(f64),

    /// Gram amount is NaN or infinite
    #[error("Serving weight is not a finite number")]
    NonFiniteGrams,

    /// Named serving does not exist on the food
    #[error("Food '{food}' has no serving named '{label}'")]
    UnknownServing {
        /// Food name
        food: String,
        /// Requested label
        label: String,
    },
}

/// Error code for integration with nutrilog-core error handling.
/// Range: 11xxx for nutrition errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingErrorCode {
    /// Gram amount is zero or negative
    NonPositiveGrams = 11001,
    /// Gram amount is NaN or infinite
    NonFiniteGrams = 11002,
    /// Named serving does not exist
    UnknownServing = 11003,
}

impl ServingError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ServingErrorCode {
        match self {
            ServingError::NonPositiveGrams(_) => ServingErrorCode::NonPositiveGrams,
            ServingError::NonFiniteGrams => ServingErrorCode::NonFiniteGrams,
            ServingError::UnknownServing { .. } => ServingErrorCode::UnknownServing,
        }
    }
}

impl From<ServingError> for nutrilog_core::Error {
    fn from(err: ServingError) -> Self {
        nutrilog_core::Error::new(nutrilog_core::ErrorCode::InvalidInput, err.to_string())
            .with_suggestion("Choose one of the food's servings or enter a positive gram amount")
            .with_source(err)
    }
}
