//! Domain error types and error handling.

mod types;

pub use types::TokenError;

use thiserror::Error;

/// Core domain errors
///
/// Lookups that find nothing return `Ok(None)`; `NotFound` is reserved for
/// reloading a record that vanished from the store.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Stable machine-readable code for the error category
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            DomainError::Conflict { .. } => "CONFLICT",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            DomainError::Internal { .. } => "INTERNAL",
            DomainError::Token(e) => e.code(),
        }
    }

    /// Malformed caller input, rejected before reaching the store
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            DomainError::InvalidArgument { .. } => true,
            DomainError::Token(e) => e.is_invalid_argument(),
            _ => false,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict { .. })
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
