//! Store boundary for token records.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::token::{TokenId, TokenRecord, TokenType};
use crate::domain::value_objects::TokenQuery;
use crate::errors::DomainError;

/// Transactional key/value view over the two token partitions
///
/// Implementations own the store-applied fields of [`TokenRecord`]:
/// `version` starts at 1 on insert and is incremented by every commit;
/// `created_at` and `updated_at` are stamped by the store.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Find the record with `token_id` in the partition for `token_type`
    ///
    /// # Returns
    /// * `Ok(Some(TokenRecord))` - Record found
    /// * `Ok(None)` - No record with this identifier
    /// * `Err(DomainError)` - Store failure
    async fn find_by_key(
        &self,
        token_type: TokenType,
        token_id: &TokenId,
    ) -> Result<Option<TokenRecord>, DomainError>;

    /// Records of `query.token_type` matching every filter condition,
    /// ordered as requested and truncated to `query.limit`
    async fn query(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, DomainError>;

    /// Insert a new record
    ///
    /// # Errors
    /// `DomainError::Conflict` if the identifier already exists in the partition.
    async fn insert(&self, record: &TokenRecord) -> Result<(), DomainError>;

    /// Write the mutable fields of an existing record
    ///
    /// `record.version` must equal the stored version.
    ///
    /// # Errors
    /// `DomainError::Conflict` when the stored version has moved on or the
    /// record no longer exists.
    async fn commit(&self, record: &TokenRecord) -> Result<(), DomainError>;

    /// Reload `record` from its committed state
    async fn refresh(&self, record: &mut TokenRecord) -> Result<(), DomainError> {
        match self.find_by_key(record.token_type, &record.token_id).await? {
            Some(current) => {
                *record = current;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("{} token {}", record.token_type, record.token_id),
            }),
        }
    }
}

#[async_trait]
impl<S: TokenStore + ?Sized> TokenStore for Arc<S> {
    async fn find_by_key(
        &self,
        token_type: TokenType,
        token_id: &TokenId,
    ) -> Result<Option<TokenRecord>, DomainError> {
        (**self).find_by_key(token_type, token_id).await
    }

    async fn query(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, DomainError> {
        (**self).query(query).await
    }

    async fn insert(&self, record: &TokenRecord) -> Result<(), DomainError> {
        (**self).insert(record).await
    }

    async fn commit(&self, record: &TokenRecord) -> Result<(), DomainError> {
        (**self).commit(record).await
    }

    async fn refresh(&self, record: &mut TokenRecord) -> Result<(), DomainError> {
        (**self).refresh(record).await
    }
}
