//! Identifier generator walking the entropy chain

use tv_shared::config::TokenIdConfig;

use crate::domain::entities::token::{TokenId, TokenType, TOKEN_ID_BYTES};
use crate::errors::{DomainError, TokenError};

use super::entropy::{default_sources, weak_token_id, EntropyDraw, EntropySource};

/// Produces token identifiers from the first acceptable entropy source
pub struct TokenIdGenerator {
    sources: Vec<Box<dyn EntropySource>>,
    allow_weak_fallback: bool,
}

impl TokenIdGenerator {
    /// Standard chain configured from `config`
    pub fn new(config: &TokenIdConfig) -> Self {
        Self::with_sources(
            default_sources(config.entropy_device.clone()),
            config.allow_weak_fallback,
        )
    }

    /// Custom chain, tried in order
    pub fn with_sources(sources: Vec<Box<dyn EntropySource>>, allow_weak_fallback: bool) -> Self {
        Self {
            sources,
            allow_weak_fallback,
        }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn allows_weak_fallback(&self) -> bool {
        self.allow_weak_fallback
    }

    /// Generate a fresh identifier
    ///
    /// `token_type` does not influence the value; access and refresh
    /// identifiers share one space and uniqueness is enforced per partition
    /// by the store.
    ///
    /// # Errors
    /// `TokenError::EntropyUnavailable` when no strong source succeeds and the
    /// weak fallback is disabled.
    pub fn generate_token_id(&self, token_type: TokenType) -> Result<TokenId, DomainError> {
        for source in &self.sources {
            match source.draw(TOKEN_ID_BYTES) {
                Ok(draw) => match accept(draw) {
                    Some(bytes) => {
                        tracing::trace!(source = source.name(), %token_type, "Generated token id");
                        return Ok(TokenId::from_bytes(&bytes));
                    }
                    None => {
                        tracing::debug!(
                            source = source.name(),
                            "Entropy source returned short or weak data"
                        );
                    }
                },
                Err(e) => {
                    tracing::debug!(
                        source = source.name(),
                        error = %e,
                        "Entropy source unavailable"
                    );
                }
            }
        }

        if self.allow_weak_fallback {
            tracing::warn!(
                %token_type,
                "All strong entropy sources failed, using weak hash fallback"
            );
            return Ok(weak_token_id()?);
        }

        tracing::error!(
            %token_type,
            sources = ?self.source_names(),
            "No strong entropy source available"
        );
        Err(TokenError::EntropyUnavailable.into())
    }
}

impl Default for TokenIdGenerator {
    fn default() -> Self {
        Self::new(&TokenIdConfig::default())
    }
}

fn accept(draw: EntropyDraw) -> Option<[u8; TOKEN_ID_BYTES]> {
    if !draw.strong {
        return None;
    }
    draw.bytes.as_slice().try_into().ok()
}
