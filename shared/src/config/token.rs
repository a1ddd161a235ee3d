//! Token identifier generation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the token identifier entropy chain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenIdConfig {
    /// Platform entropy device read when the in-process generators fail
    #[serde(default = "default_entropy_device")]
    pub entropy_device: PathBuf,

    /// Permit the non-cryptographic hash fallback when no strong source succeeds.
    /// Identifiers produced this way are guessable.
    #[serde(default)]
    pub allow_weak_fallback: bool,
}

impl Default for TokenIdConfig {
    fn default() -> Self {
        Self {
            entropy_device: default_entropy_device(),
            allow_weak_fallback: false,
        }
    }
}

impl TokenIdConfig {
    /// Create from environment variables
    ///
    /// - `TOKEN_ENTROPY_DEVICE`: path of the entropy device
    /// - `TOKEN_ALLOW_WEAK_FALLBACK`: `true`/`1`/`yes` to enable the weak fallback
    pub fn from_env() -> Self {
        let entropy_device = std::env::var("TOKEN_ENTROPY_DEVICE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_entropy_device());
        let allow_weak_fallback = std::env::var("TOKEN_ALLOW_WEAK_FALLBACK")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Self {
            entropy_device,
            allow_weak_fallback,
        }
    }

    /// Enable or disable the weak fallback
    pub fn with_weak_fallback(mut self, allow: bool) -> Self {
        self.allow_weak_fallback = allow;
        self
    }

    /// Use a different entropy device
    pub fn with_entropy_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.entropy_device = path.into();
        self
    }
}

fn default_entropy_device() -> PathBuf {
    PathBuf::from("/dev/urandom")
}
