//! Unit tests for MySQL query construction and error mapping

use chrono::{TimeZone, Utc};
use tv_core::domain::value_objects::{SortDirection, TokenField, TokenFilter, TokenQuery};
use tv_core::errors::DomainError;
use tv_core::TokenType;

use crate::database::mysql::token_store_impl::{map_database_error, map_sqlx_error, MySqlTokenStore};

#[test]
fn test_best_match_without_filter() {
    let query = TokenQuery::best_match(TokenType::Access, TokenFilter::new());
    let builder = MySqlTokenStore::build_select(&query);

    assert_eq!(
        builder.sql(),
        "SELECT token_id, client_id, user_id, expires, scope, version, created_at, updated_at \
         FROM access_tokens ORDER BY expires DESC LIMIT 1"
    );
}

#[test]
fn test_filters_are_bound_not_inlined() {
    let filter = TokenFilter::new()
        .where_eq(TokenField::UserId, "u1' OR '1'='1")
        .where_eq(TokenField::Expires, Utc.timestamp_opt(1000, 0).unwrap());
    let query = TokenQuery::best_match(TokenType::Refresh, filter);
    let builder = MySqlTokenStore::build_select(&query);
    let sql = builder.sql();

    assert!(sql.contains("FROM refresh_tokens WHERE user_id = ? AND expires = ?"));
    assert!(!sql.contains("u1"));
}

#[test]
fn test_custom_order_and_limit() {
    let query = TokenQuery::best_match(TokenType::Access, TokenFilter::new())
        .with_order(TokenField::ClientId, SortDirection::Ascending)
        .with_limit(25);
    let builder = MySqlTokenStore::build_select(&query);

    assert!(builder.sql().ends_with("ORDER BY client_id ASC LIMIT 25"));
}

#[test]
fn test_unique_violation_is_conflict() {
    let err = map_database_error("insert token", true, Some("23000"), "Duplicate entry");
    assert!(err.is_conflict());
}

#[test]
fn test_unknown_column_is_invalid_argument() {
    let err = map_database_error("query tokens", false, Some("42S22"), "Unknown column 'x'");
    assert!(err.is_invalid_argument());
}

#[test]
fn test_other_server_errors_are_internal() {
    let err = map_database_error("query tokens", false, Some("HY000"), "Lock wait timeout");
    assert!(matches!(err, DomainError::Internal { .. }));
}

#[test]
fn test_transport_errors_are_store_unavailable() {
    assert!(map_sqlx_error("find token", sqlx::Error::PoolTimedOut).is_store_unavailable());
    assert!(map_sqlx_error("find token", sqlx::Error::PoolClosed).is_store_unavailable());

    let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
    assert!(map_sqlx_error("find token", sqlx::Error::Io(io)).is_store_unavailable());
}

#[test]
fn test_decode_errors_are_internal() {
    let err = map_sqlx_error("find token", sqlx::Error::RowNotFound);
    assert!(matches!(err, DomainError::Internal { .. }));
    assert_eq!(err.code(), "INTERNAL");
}
