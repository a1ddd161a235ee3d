//! Unit tests for the token repository

use chrono::{TimeZone, Utc};
use std::collections::HashMap;

use crate::domain::entities::token::{NewToken, TokenData, TokenId, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::token::{InMemoryTokenStore, TokenRepository, UnavailableTokenStore};
use crate::services::token_id::TokenIdGenerator;

fn repository() -> TokenRepository<InMemoryTokenStore> {
    TokenRepository::new(InMemoryTokenStore::new(), TokenIdGenerator::default())
}

fn token_id(c: char) -> TokenId {
    TokenId::parse(c.to_string().repeat(40)).unwrap()
}

fn data(id: char, token_type: TokenType, user: &str, expires: i64, scope: &str) -> TokenData {
    NewToken::new(
        token_type,
        "c1",
        user,
        Utc.timestamp_opt(expires, 0).unwrap(),
        scope,
    )
    .with_id(token_id(id))
}

#[tokio::test]
async fn test_save_then_load_returns_saved_fields() {
    let repo = repository();
    let saved = repo
        .save_token(&data('a', TokenType::Access, "u1", 1000, "read"))
        .await
        .unwrap();
    assert_eq!(saved.version, 1);

    let loaded = repo
        .load_token(&token_id('a'), TokenType::Access)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.client_id, "c1");
    assert_eq!(loaded.user_id, "u1");
    assert_eq!(loaded.expires, Utc.timestamp_opt(1000, 0).unwrap());
    assert_eq!(loaded.scope, "read");
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn test_second_save_updates_in_place() {
    let repo = repository();
    repo.save_token(&data('a', TokenType::Access, "u1", 1000, "read"))
        .await
        .unwrap();
    let updated = repo
        .save_token(&data('a', TokenType::Access, "u1", 2000, "read write"))
        .await
        .unwrap();

    assert_eq!(repo.store().len(TokenType::Access).await, 1);
    assert_eq!(updated.version, 2);
    assert_eq!(updated.expires, Utc.timestamp_opt(2000, 0).unwrap());
    assert_eq!(updated.scope, "read write");

    let loaded = repo
        .load_token(&token_id('a'), TokenType::Access)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.expires.timestamp(), 2000);
    assert_eq!(loaded.scope, "read write");
}

#[tokio::test]
async fn test_load_missing_token_is_none() {
    let repo = repository();
    repo.save_token(&data('a', TokenType::Access, "u1", 1000, "read"))
        .await
        .unwrap();

    assert!(repo
        .load_token(&token_id('b'), TokenType::Access)
        .await
        .unwrap()
        .is_none());
    // Same identifier, other partition
    assert!(repo
        .load_token(&token_id('a'), TokenType::Refresh)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_load_by_user_prefers_latest_expiry() {
    let repo = repository();
    repo.save_token(&data('1', TokenType::Refresh, "u1", 1000, "read"))
        .await
        .unwrap();
    repo.save_token(&data('2', TokenType::Refresh, "u1", 5000, "read"))
        .await
        .unwrap();
    repo.save_token(&data('3', TokenType::Access, "u1", 9000, "read"))
        .await
        .unwrap();

    let found = repo
        .load_token_by_user_id("u1", TokenType::Refresh)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.token_id, token_id('2'));

    assert!(repo
        .load_token_by_user_id("nobody", TokenType::Refresh)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_never_changes_identity() {
    let repo = repository();
    let existing = repo
        .save_token(&data('a', TokenType::Access, "u1", 1000, "read"))
        .await
        .unwrap();

    let foreign = data('b', TokenType::Refresh, "u9", 4000, "admin");
    let updated = repo.update_token(existing, &foreign).await.unwrap();

    assert_eq!(updated.token_id, token_id('a'));
    assert_eq!(updated.token_type, TokenType::Access);
    assert_eq!(updated.user_id, "u9");
    assert_eq!(updated.scope, "admin");
    assert!(repo
        .load_token(&token_id('b'), TokenType::Refresh)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_stale_update_conflicts() {
    let repo = repository();
    let first = repo
        .save_token(&data('a', TokenType::Access, "u1", 1000, "read"))
        .await
        .unwrap();
    let second = first.clone();

    repo.update_token(first, &data('a', TokenType::Access, "u1", 2000, "read"))
        .await
        .unwrap();
    let result = repo
        .update_token(second, &data('a', TokenType::Access, "u1", 3000, "write"))
        .await;

    assert!(matches!(result, Err(DomainError::Conflict { .. })));
    let current = repo
        .load_token(&token_id('a'), TokenType::Access)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.expires.timestamp(), 2000);
}

#[tokio::test]
async fn test_get_token_by_parameters() {
    let repo = repository();
    repo.save_token(&data('1', TokenType::Access, "u1", 1000, "read"))
        .await
        .unwrap();
    repo.save_token(&data('2', TokenType::Access, "u1", 2000, "write"))
        .await
        .unwrap();

    let mut params = HashMap::new();
    params.insert("userId", "u1");
    params.insert("scope", "read");
    let found = repo
        .get_token_by_parameters(params, TokenType::Access)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.token_id, token_id('1'));

    let by_token = repo
        .get_token_by_parameters([("token", "2".repeat(40))], TokenType::Access)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_token.scope, "write");

    // No filters: some record, best by expiry
    let any = repo
        .get_token_by_parameters(Vec::<(&str, &str)>::new(), TokenType::Access)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(any.token_id, token_id('2'));
}

#[tokio::test]
async fn test_unknown_parameter_rejected_before_store() {
    let store = UnavailableTokenStore::new();
    let repo = TokenRepository::new(store.clone(), TokenIdGenerator::default());

    let result = repo
        .get_token_by_parameters([("password", "hunter2")], TokenType::Access)
        .await;

    match result {
        Err(err) => {
            assert!(err.is_invalid_argument());
            assert!(matches!(
                err,
                DomainError::Token(TokenError::UnknownField { .. })
            ));
        }
        Ok(_) => panic!("unknown field accepted"),
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let store = UnavailableTokenStore::new();
    let repo = TokenRepository::new(store.clone(), TokenIdGenerator::default());

    let load = repo.load_token(&token_id('a'), TokenType::Access).await;
    assert!(matches!(load, Err(DomainError::StoreUnavailable { .. })));

    let save = repo
        .save_token(&data('a', TokenType::Access, "u1", 1000, "read"))
        .await;
    assert!(matches!(save, Err(DomainError::StoreUnavailable { .. })));

    // One failed query, one failed existence check; no insert attempted
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_create_token_generates_identifier() {
    let repo = repository();
    let new_token = NewToken::new(
        TokenType::Refresh,
        "c1",
        "u1",
        Utc.timestamp_opt(1000, 0).unwrap(),
        "offline_access",
    );

    let created = repo.create_token(new_token).await.unwrap();
    assert_eq!(created.token_id.as_str().len(), 40);
    assert_eq!(created.version, 1);

    let loaded = repo
        .load_token(&created.token_id, TokenType::Refresh)
        .await
        .unwrap();
    assert_eq!(loaded, Some(created));
}
