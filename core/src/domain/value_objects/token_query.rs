//! Conjunctive filters and ordered queries over token records.

use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::token::{TokenId, TokenRecord, TokenType};
use crate::errors::TokenError;

/// Queryable columns of a token record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenField {
    TokenId,
    ClientId,
    UserId,
    Expires,
    Scope,
}

impl TokenField {
    /// Column name in the store
    pub fn column(&self) -> &'static str {
        match self {
            TokenField::TokenId => "token_id",
            TokenField::ClientId => "client_id",
            TokenField::UserId => "user_id",
            TokenField::Expires => "expires",
            TokenField::Scope => "scope",
        }
    }

    /// Order two records by this field
    pub fn compare(&self, a: &TokenRecord, b: &TokenRecord) -> Ordering {
        match self {
            TokenField::TokenId => a.token_id.cmp(&b.token_id),
            TokenField::ClientId => a.client_id.cmp(&b.client_id),
            TokenField::UserId => a.user_id.cmp(&b.user_id),
            TokenField::Expires => a.expires.cmp(&b.expires),
            TokenField::Scope => a.scope.cmp(&b.scope),
        }
    }
}

impl fmt::Display for TokenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for TokenField {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token_id" | "tokenId" | "token" => Ok(TokenField::TokenId),
            "client_id" | "clientId" => Ok(TokenField::ClientId),
            "user_id" | "userId" => Ok(TokenField::UserId),
            "expires" => Ok(TokenField::Expires),
            "scope" => Ok(TokenField::Scope),
            _ => Err(TokenError::UnknownField { field: s.to_string() }),
        }
    }
}

/// Right-hand side of an equality condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    /// Parse a raw parameter for `field`
    ///
    /// `expires` accepts Unix seconds (`1700000000`, or `1700000000.25` with
    /// up to nine fractional digits) or RFC 3339; every other field is text.
    /// Matching is exact, so a whole-second value never matches a record
    /// whose `expires` carries a sub-second part.
    pub fn parse(field: TokenField, raw: &str) -> Result<Self, TokenError> {
        match field {
            TokenField::Expires => parse_timestamp(raw)
                .map(FilterValue::Timestamp)
                .ok_or_else(|| TokenError::InvalidFilterValue {
                    field: field.column().to_string(),
                    value: raw.to_string(),
                }),
            _ => Ok(FilterValue::Text(raw.to_string())),
        }
    }

    fn matches(&self, field: TokenField, record: &TokenRecord) -> bool {
        match (field, self) {
            (TokenField::TokenId, FilterValue::Text(v)) => record.token_id.as_str() == v,
            (TokenField::ClientId, FilterValue::Text(v)) => &record.client_id == v,
            (TokenField::UserId, FilterValue::Text(v)) => &record.user_id == v,
            (TokenField::Scope, FilterValue::Text(v)) => &record.scope == v,
            (TokenField::Expires, FilterValue::Timestamp(t)) => &record.expires == t,
            _ => false,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    if let Some(ts) = parse_fractional_seconds(raw) {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// `<secs>.<fraction>` with a non-negative integer part
fn parse_fractional_seconds(raw: &str) -> Option<DateTime<Utc>> {
    let (secs, fraction) = raw.split_once('.')?;
    if secs.is_empty()
        || fraction.is_empty()
        || fraction.len() > 9
        || !secs.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let secs: i64 = secs.parse().ok()?;
    let nanos = fraction.parse::<u32>().ok()? * 10u32.pow(9 - fraction.len() as u32);
    Utc.timestamp_opt(secs, nanos).single()
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&TokenId> for FilterValue {
    fn from(value: &TokenId) -> Self {
        FilterValue::Text(value.as_str().to_string())
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        FilterValue::Timestamp(value)
    }
}

/// AND-combined equality conditions, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFilter {
    conditions: Vec<(TokenField, FilterValue)>,
}

impl TokenFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`, replacing any earlier condition on `field`
    pub fn where_eq(mut self, field: TokenField, value: impl Into<FilterValue>) -> Self {
        let value = value.into();
        match self.conditions.iter_mut().find(|(f, _)| *f == field) {
            Some(existing) => existing.1 = value,
            None => self.conditions.push((field, value)),
        }
        self
    }

    /// Build a filter from untyped name/value pairs
    ///
    /// Fails on the first unknown field name or unparsable value.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, TokenError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        params.into_iter().try_fold(Self::new(), |filter, (key, value)| {
            let field: TokenField = key.as_ref().parse()?;
            let value = FilterValue::parse(field, value.as_ref())?;
            Ok(filter.where_eq(field, value))
        })
    }

    pub fn conditions(&self) -> &[(TokenField, FilterValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &TokenRecord) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| value.matches(*field, record))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A filtered, ordered and limited lookup within one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenQuery {
    pub token_type: TokenType,
    pub filter: TokenFilter,
    pub order_by: TokenField,
    pub direction: SortDirection,
    pub limit: usize,
}

impl TokenQuery {
    /// Single best match: furthest-expiring record first
    pub fn best_match(token_type: TokenType, filter: TokenFilter) -> Self {
        Self {
            token_type,
            filter,
            order_by: TokenField::Expires,
            direction: SortDirection::Descending,
            limit: 1,
        }
    }

    pub fn with_order(mut self, order_by: TokenField, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Order two records according to this query
    pub fn compare(&self, a: &TokenRecord, b: &TokenRecord) -> Ordering {
        let ordering = self.order_by.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}
