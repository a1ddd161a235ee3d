//! Token repository: lookup and upsert of token records over a [`TokenStore`].

use crate::domain::entities::token::{NewToken, TokenData, TokenId, TokenRecord, TokenType};
use crate::domain::value_objects::{TokenField, TokenFilter, TokenQuery};
use crate::errors::DomainError;
use crate::services::token_id::TokenIdGenerator;

use super::r#trait::TokenStore;

/// Issues identifiers and persists token records
///
/// Every call is one unit of work against the store. Conflicts reported by
/// the store are returned to the caller as-is; nothing is retried here.
pub struct TokenRepository<S: TokenStore> {
    store: S,
    generator: TokenIdGenerator,
}

impl<S: TokenStore> TokenRepository<S> {
    pub fn new(store: S, generator: TokenIdGenerator) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fresh identifier from the entropy chain
    pub fn generate_token_id(&self, token_type: TokenType) -> Result<TokenId, DomainError> {
        self.generator.generate_token_id(token_type)
    }

    /// Load the record for `token_id` within the `token_type` partition
    ///
    /// # Returns
    /// * `Ok(Some(TokenRecord))` - Token found
    /// * `Ok(None)` - No such token
    /// * `Err(DomainError)` - Store failure
    pub async fn load_token(
        &self,
        token_id: &TokenId,
        token_type: TokenType,
    ) -> Result<Option<TokenRecord>, DomainError> {
        let filter = TokenFilter::new().where_eq(TokenField::TokenId, token_id);
        self.find_best_match(token_type, filter).await
    }

    /// Load the furthest-expiring record issued to `user_id`
    pub async fn load_token_by_user_id(
        &self,
        user_id: &str,
        token_type: TokenType,
    ) -> Result<Option<TokenRecord>, DomainError> {
        let filter = TokenFilter::new().where_eq(TokenField::UserId, user_id);
        self.find_best_match(token_type, filter).await
    }

    /// Insert `data` as a new record, or update the record that already
    /// holds `data.token_id`
    ///
    /// Returns the record as read back from the store.
    ///
    /// # Errors
    /// * `DomainError::Conflict` - a concurrent writer inserted or updated the
    ///   same identifier first
    /// * any store failure, before the read-back is attempted
    pub async fn save_token(&self, data: &TokenData) -> Result<TokenRecord, DomainError> {
        if let Some(existing) = self
            .store
            .find_by_key(data.token_type, &data.token_id)
            .await?
        {
            return self.update_token(existing, data).await;
        }

        let mut record = TokenRecord::from_data(data);
        self.store.insert(&record).await?;
        self.store.refresh(&mut record).await?;

        tracing::info!(
            token_type = %record.token_type,
            client_id = %record.client_id,
            user_id = %record.user_id,
            "Stored new token"
        );
        Ok(record)
    }

    /// Overwrite `client_id`, `expires`, `user_id` and `scope` of `existing`,
    /// commit, and return the refreshed record
    ///
    /// `token_id` and `token_type` are kept even when `data` names another token.
    pub async fn update_token(
        &self,
        mut existing: TokenRecord,
        data: &TokenData,
    ) -> Result<TokenRecord, DomainError> {
        if !existing.is_same_token(data) {
            tracing::warn!(
                token_type = %existing.token_type,
                requested_type = %data.token_type,
                "Update data names a different token; identifier and type left unchanged"
            );
        }

        existing.apply(data);
        self.store.commit(&existing).await?;
        self.store.refresh(&mut existing).await?;

        tracing::debug!(
            token_type = %existing.token_type,
            version = existing.version,
            "Updated token"
        );
        Ok(existing)
    }

    /// Best match for untyped field-name/value pairs
    ///
    /// Field names are checked before the store is contacted.
    ///
    /// # Errors
    /// `TokenError::UnknownField` or `TokenError::InvalidFilterValue` for
    /// malformed parameters.
    pub async fn get_token_by_parameters<I, K, V>(
        &self,
        params: I,
        token_type: TokenType,
    ) -> Result<Option<TokenRecord>, DomainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filter = TokenFilter::from_params(params)?;
        self.find_best_match(token_type, filter).await
    }

    /// The single record matching `filter` with the greatest `expires`
    pub async fn find_best_match(
        &self,
        token_type: TokenType,
        filter: TokenFilter,
    ) -> Result<Option<TokenRecord>, DomainError> {
        if filter.is_empty() {
            tracing::debug!(
                %token_type,
                "Token lookup without filters returns an arbitrary record"
            );
        }

        let query = TokenQuery::best_match(token_type, filter);
        let found = self.store.query(&query).await?.into_iter().next();

        tracing::debug!(%token_type, found = found.is_some(), "Token lookup");
        Ok(found)
    }

    /// Generate an identifier for `new_token` and save it
    pub async fn create_token(&self, new_token: NewToken) -> Result<TokenRecord, DomainError> {
        let token_id = self.generate_token_id(new_token.token_type)?;
        self.save_token(&new_token.with_id(token_id)).await
    }
}
