//! Shared configuration and logging for TokenVault
//!
//! This crate provides functionality used across the core and infrastructure crates:
//! - Configuration types (environment, database, token identifiers, logging)
//! - Tracing subscriber setup

pub mod config;
pub mod logging;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, TokenIdConfig};
pub use logging::init_tracing;
