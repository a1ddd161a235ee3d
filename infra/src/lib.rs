//! # Infrastructure Layer
//!
//! Concrete storage for TokenVault:
//! - **Database**: MySQL connection pool and migrations using SQLx
//! - **Token store**: [`database::MySqlTokenStore`], the MySQL implementation
//!   of [`tv_core::TokenStore`]

// Re-export core types for convenience
pub use tv_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Configuration types consumed by the infrastructure layer
pub mod config {
    pub use tv_shared::config::{AppConfig, DatabaseConfig, TokenIdConfig};
}

use tv_core::{TokenIdGenerator, TokenRepository};

use crate::config::AppConfig;
use crate::database::{DatabasePool, MySqlTokenStore};

/// Token repository backed by MySQL
pub type MySqlTokenRepository = TokenRepository<MySqlTokenStore>;

/// Connect to MySQL and assemble a token repository
///
/// Fails before migrations run if the pool cannot answer a health check.
pub async fn initialize(
    config: &AppConfig,
    run_migrations: bool,
) -> Result<(DatabasePool, MySqlTokenRepository), InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing infrastructure services");

    let pool = DatabasePool::new(config.database.clone()).await?;
    pool.health_check().await?;
    if run_migrations {
        pool.run_migrations().await?;
    }

    let store = MySqlTokenStore::new(pool.get_pool().clone());
    let generator = TokenIdGenerator::new(&config.token_id);
    let repository = TokenRepository::new(store, generator);

    tracing::info!("Infrastructure services initialized successfully");
    Ok((pool, repository))
}

/// Load configuration from `.env`, config files and the environment
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();
    AppConfig::load().map_err(|e| InfrastructureError::Config(e.to_string()))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
