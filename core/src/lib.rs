//! # TokenVault Core
//!
//! Domain layer for opaque bearer tokens: identifier generation from an
//! ordered entropy chain, token records split into access and refresh
//! partitions, the [`TokenStore`](repositories::TokenStore) boundary, and the
//! [`TokenRepository`](repositories::TokenRepository) that enforces
//! one-record-per-identifier on top of it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    FilterValue, NewToken, SortDirection, TokenData, TokenField, TokenFilter, TokenId,
    TokenQuery, TokenRecord, TokenType, TOKEN_ID_BYTES, TOKEN_ID_LENGTH,
};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{InMemoryTokenStore, TokenRepository, TokenStore};
pub use services::{EntropyDraw, EntropySource, TokenIdGenerator};
