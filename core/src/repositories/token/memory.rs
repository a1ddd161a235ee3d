//! In-memory implementation of [`TokenStore`].

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::{TokenId, TokenRecord, TokenType};
use crate::domain::value_objects::TokenQuery;
use crate::errors::DomainError;

use super::r#trait::TokenStore;

type Key = (TokenType, TokenId);

/// Token store backed by a shared map
///
/// Clones share the same records. Keys include the token type, so access
/// and refresh partitions never see each other's records.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    records: Arc<RwLock<HashMap<Key, TokenRecord>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in one partition
    pub async fn len(&self, token_type: TokenType) -> usize {
        let records = self.records.read().await;
        records.keys().filter(|(t, _)| *t == token_type).count()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn find_by_key(
        &self,
        token_type: TokenType,
        token_id: &TokenId,
    ) -> Result<Option<TokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&(token_type, token_id.clone())).cloned())
    }

    async fn query(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, DomainError> {
        let records = self.records.read().await;
        let mut matches: Vec<TokenRecord> = records
            .iter()
            .filter(|((t, _), record)| *t == query.token_type && query.filter.matches(record))
            .map(|(_, record)| record.clone())
            .collect();

        matches.sort_by(|a, b| query.compare(a, b));
        matches.truncate(query.limit);
        Ok(matches)
    }

    async fn insert(&self, record: &TokenRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let key = (record.token_type, record.token_id.clone());

        if records.contains_key(&key) {
            return Err(DomainError::Conflict {
                message: format!(
                    "{} token {} already exists",
                    record.token_type, record.token_id
                ),
            });
        }

        let now = Utc::now();
        let mut stored = record.clone();
        stored.version = 1;
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        records.insert(key, stored);
        Ok(())
    }

    async fn commit(&self, record: &TokenRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(&(record.token_type, record.token_id.clone()))
            .ok_or_else(|| DomainError::Conflict {
                message: format!(
                    "{} token {} no longer exists",
                    record.token_type, record.token_id
                ),
            })?;

        if stored.version != record.version {
            return Err(DomainError::Conflict {
                message: format!(
                    "{} token {} was modified concurrently (expected version {}, found {})",
                    record.token_type, record.token_id, record.version, stored.version
                ),
            });
        }

        stored.client_id = record.client_id.clone();
        stored.user_id = record.user_id.clone();
        stored.expires = record.expires;
        stored.scope = record.scope.clone();
        stored.version += 1;
        stored.updated_at = Some(Utc::now());
        Ok(())
    }
}
