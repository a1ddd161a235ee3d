//! Mock store that fails every call, for error propagation tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::entities::token::{TokenId, TokenRecord, TokenType};
use crate::domain::value_objects::TokenQuery;
use crate::errors::DomainError;

use super::r#trait::TokenStore;

/// Store whose backend is unreachable
#[derive(Clone, Default)]
pub struct UnavailableTokenStore {
    calls: Arc<AtomicUsize>,
}

impl UnavailableTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::StoreUnavailable {
            message: "connection refused".to_string(),
        })
    }
}

#[async_trait]
impl TokenStore for UnavailableTokenStore {
    async fn find_by_key(
        &self,
        _token_type: TokenType,
        _token_id: &TokenId,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.fail()
    }

    async fn query(&self, _query: &TokenQuery) -> Result<Vec<TokenRecord>, DomainError> {
        self.fail()
    }

    async fn insert(&self, _record: &TokenRecord) -> Result<(), DomainError> {
        self.fail()
    }

    async fn commit(&self, _record: &TokenRecord) -> Result<(), DomainError> {
        self.fail()
    }
}
