//! Token-specific error types

use thiserror::Error;

/// Token identifier, type and query errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token id format: {value:?}")]
    InvalidTokenFormat { value: String },

    #[error("Invalid token type: {value:?}")]
    InvalidTokenType { value: String },

    #[error("Unknown token field: {field:?}")]
    UnknownField { field: String },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidFilterValue { field: String, value: String },

    #[error("No cryptographically strong entropy source available")]
    EntropyUnavailable,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidTokenFormat { .. } => "INVALID_TOKEN_FORMAT",
            TokenError::InvalidTokenType { .. } => "INVALID_TOKEN_TYPE",
            TokenError::UnknownField { .. } => "UNKNOWN_FIELD",
            TokenError::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
            TokenError::EntropyUnavailable => "ENTROPY_UNAVAILABLE",
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, TokenError::EntropyUnavailable)
    }
}
