//! Token entities: identifiers, types and persisted records.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TokenError;

/// Raw entropy drawn for one identifier (160 bits)
pub const TOKEN_ID_BYTES: usize = 20;

/// Length of the hex-encoded identifier
pub const TOKEN_ID_LENGTH: usize = TOKEN_ID_BYTES * 2;

static TOKEN_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{40}$").unwrap()
});

/// Kind of bearer token; selects the storage partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }

    /// Name of the storage partition (table) holding this kind of token
    pub fn partition(&self) -> &'static str {
        match self {
            TokenType::Access => "access_tokens",
            TokenType::Refresh => "refresh_tokens",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "access" | "access_token" => Ok(TokenType::Access),
            "refresh" | "refresh_token" => Ok(TokenType::Refresh),
            _ => Err(TokenError::InvalidTokenType { value: s.to_string() }),
        }
    }
}

/// Opaque token identifier: 40 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

impl TokenId {
    /// Parse and validate an identifier
    pub fn parse(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        if TOKEN_ID_REGEX.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(TokenError::InvalidTokenFormat { value })
        }
    }

    /// Hex-encode raw entropy into an identifier
    pub fn from_bytes(bytes: &[u8; TOKEN_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TokenId {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Full set of token fields supplied by a caller when saving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub token_id: TokenId,
    pub token_type: TokenType,
    pub client_id: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
    pub scope: String,
}

/// Token fields before an identifier has been generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewToken {
    pub token_type: TokenType,
    pub client_id: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
    pub scope: String,
}

impl NewToken {
    pub fn new(
        token_type: TokenType,
        client_id: impl Into<String>,
        user_id: impl Into<String>,
        expires: DateTime<Utc>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            token_type,
            client_id: client_id.into(),
            user_id: user_id.into(),
            expires,
            scope: scope.into(),
        }
    }

    /// Attach a generated identifier
    pub fn with_id(self, token_id: TokenId) -> TokenData {
        TokenData {
            token_id,
            token_type: self.token_type,
            client_id: self.client_id,
            user_id: self.user_id,
            expires: self.expires,
            scope: self.scope,
        }
    }
}

/// Persisted token record
///
/// `token_id` and `token_type` never change after creation. `version`,
/// `created_at` and `updated_at` are owned by the store and only become
/// meaningful after the record has been read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_id: TokenId,
    pub token_type: TokenType,
    pub client_id: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
    pub scope: String,

    /// Optimistic-concurrency counter; 0 until inserted
    pub version: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TokenRecord {
    /// Build an unsaved record from caller data
    pub fn from_data(data: &TokenData) -> Self {
        Self {
            token_id: data.token_id.clone(),
            token_type: data.token_type,
            client_id: data.client_id.clone(),
            user_id: data.user_id.clone(),
            expires: data.expires,
            scope: data.scope.clone(),
            version: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Overwrite the mutable fields from `data`
    pub fn apply(&mut self, data: &TokenData) {
        self.client_id = data.client_id.clone();
        self.expires = data.expires;
        self.user_id = data.user_id.clone();
        self.scope = data.scope.clone();
    }

    /// Whether `data` names this record (same identifier and type)
    pub fn is_same_token(&self, data: &TokenData) -> bool {
        self.token_id == data.token_id && self.token_type == data.token_type
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Individual scopes; the scope string may be space- or comma-delimited
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope
            .split(|c: char| c == ' ' || c == ',')
            .filter(|s| !s.is_empty())
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|s| s == scope)
    }
}
