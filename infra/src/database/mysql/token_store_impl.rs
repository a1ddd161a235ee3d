//! MySQL implementation of the TokenStore trait.
//!
//! Each token type lives in its own table (`access_tokens`,
//! `refresh_tokens`). Commits are guarded by the `version` column so that a
//! writer holding a stale record is rejected instead of overwriting a newer one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

use tv_core::domain::value_objects::{FilterValue, TokenQuery};
use tv_core::errors::DomainError;
use tv_core::repositories::TokenStore;
use tv_core::{TokenId, TokenRecord, TokenType};

const COLUMNS: &str =
    "token_id, client_id, user_id, expires, scope, version, created_at, updated_at";

/// SQLSTATE reported by MySQL for a reference to an unknown column
const UNKNOWN_COLUMN_STATE: &str = "42S22";

/// MySQL implementation of TokenStore
#[derive(Clone)]
pub struct MySqlTokenStore {
    pool: MySqlPool,
}

impl MySqlTokenStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Build the SELECT for `query`
    ///
    /// Table and column names come from closed enums; filter values are
    /// always bound as parameters.
    pub fn build_select(query: &TokenQuery) -> QueryBuilder<'static, MySql> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder
            .push(COLUMNS)
            .push(" FROM ")
            .push(query.token_type.partition());

        for (i, (field, value)) in query.filter.conditions().iter().enumerate() {
            builder
                .push(if i == 0 { " WHERE " } else { " AND " })
                .push(field.column())
                .push(" = ");
            match value {
                FilterValue::Text(text) => builder.push_bind(text.clone()),
                FilterValue::Timestamp(ts) => builder.push_bind(*ts),
            };
        }

        builder
            .push(" ORDER BY ")
            .push(query.order_by.column())
            .push(" ")
            .push(query.direction.as_sql())
            .push(" LIMIT ")
            .push(query.limit);

        builder
    }

    /// Convert a database row into a TokenRecord of `token_type`
    fn row_to_record(row: &MySqlRow, token_type: TokenType) -> Result<TokenRecord, DomainError> {
        let token_id: String = column(row, "token_id")?;

        Ok(TokenRecord {
            token_id: TokenId::parse(token_id).map_err(|e| DomainError::Internal {
                message: format!("Stored token id is malformed: {}", e),
            })?,
            token_type,
            client_id: column(row, "client_id")?,
            user_id: column(row, "user_id")?,
            expires: column::<DateTime<Utc>>(row, "expires")?,
            scope: column(row, "scope")?,
            version: column(row, "version")?,
            created_at: Some(column::<DateTime<Utc>>(row, "created_at")?),
            updated_at: Some(column::<DateTime<Utc>>(row, "updated_at")?),
        })
    }
}

fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

/// Map a driver error to the domain error taxonomy
pub fn map_sqlx_error(operation: &str, error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::Database(db) => map_database_error(
            operation,
            db.is_unique_violation(),
            db.code().as_deref(),
            db.message(),
        ),
        e @ (sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed) => {
            tracing::error!(operation, error = %e, "Token store unreachable");
            DomainError::StoreUnavailable {
                message: format!("Failed to {}: {}", operation, e),
            }
        }
        e => DomainError::Internal {
            message: format!("Failed to {}: {}", operation, e),
        },
    }
}

/// Classify an error returned by the MySQL server itself
pub fn map_database_error(
    operation: &str,
    unique_violation: bool,
    sql_state: Option<&str>,
    message: &str,
) -> DomainError {
    if unique_violation {
        DomainError::Conflict {
            message: format!("Failed to {}: {}", operation, message),
        }
    } else if sql_state == Some(UNKNOWN_COLUMN_STATE) {
        DomainError::InvalidArgument {
            message: format!("Failed to {}: {}", operation, message),
        }
    } else {
        DomainError::Internal {
            message: format!("Failed to {}: {}", operation, message),
        }
    }
}

#[async_trait]
impl TokenStore for MySqlTokenStore {
    async fn find_by_key(
        &self,
        token_type: TokenType,
        token_id: &TokenId,
    ) -> Result<Option<TokenRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE token_id = ? LIMIT 1",
            COLUMNS,
            token_type.partition()
        );

        let result = sqlx::query(&query)
            .bind(token_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find token", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row, token_type)?)),
            None => Ok(None),
        }
    }

    async fn query(&self, query: &TokenQuery) -> Result<Vec<TokenRecord>, DomainError> {
        let mut builder = Self::build_select(query);
        tracing::debug!(sql = builder.sql(), "Querying tokens");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("query tokens", e))?;

        rows.iter()
            .map(|row| Self::row_to_record(row, query.token_type))
            .collect()
    }

    async fn insert(&self, record: &TokenRecord) -> Result<(), DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (
                token_id, client_id, user_id, expires, scope, version
            ) VALUES (?, ?, ?, ?, ?, 1)
            "#,
            record.token_type.partition()
        );

        sqlx::query(&query)
            .bind(record.token_id.as_str())
            .bind(&record.client_id)
            .bind(&record.user_id)
            .bind(record.expires)
            .bind(&record.scope)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert token", e))?;

        tracing::info!(
            token_type = %record.token_type,
            user_id = %record.user_id,
            "Inserted token"
        );
        Ok(())
    }

    async fn commit(&self, record: &TokenRecord) -> Result<(), DomainError> {
        let query = format!(
            r#"
            UPDATE {}
            SET client_id = ?, user_id = ?, expires = ?, scope = ?, version = version + 1
            WHERE token_id = ? AND version = ?
            "#,
            record.token_type.partition()
        );

        let result = sqlx::query(&query)
            .bind(&record.client_id)
            .bind(&record.user_id)
            .bind(record.expires)
            .bind(&record.scope)
            .bind(record.token_id.as_str())
            .bind(record.version)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update token", e))?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                token_type = %record.token_type,
                version = record.version,
                "Token commit lost to a concurrent writer"
            );
            return Err(DomainError::Conflict {
                message: format!(
                    "{} token {} changed since version {}",
                    record.token_type, record.token_id, record.version
                ),
            });
        }

        Ok(())
    }
}
