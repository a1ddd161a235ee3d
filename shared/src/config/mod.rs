//! Configuration module
//!
//! - `database` - MySQL connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `token` - Token identifier generation configuration

pub mod database;
pub mod environment;
pub mod token;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use token::TokenIdConfig;

/// Prefix for layered environment overrides, e.g. `TOKENVAULT__DATABASE__URL`
pub const ENV_PREFIX: &str = "TOKENVAULT";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token identifier generation
    #[serde(default)]
    pub token_id: TokenIdConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Defaults for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            database: DatabaseConfig::default(),
            token_id: TokenIdConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration from process environment variables
    ///
    /// A `.env` file is read first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self {
            environment,
            database: DatabaseConfig::from_env(),
            token_id: TokenIdConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load layered configuration
    ///
    /// Sources, lowest priority first:
    /// 1. [`AppConfig::from_env`]
    /// 2. the environment's `config.<env>.toml` file, if present
    /// 3. `TOKENVAULT__SECTION__KEY` variables
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let base = Self::from_env();
        let file = base.environment.config_file().to_string();

        ::config::Config::builder()
            .add_source(::config::Config::try_from(&base)?)
            .add_source(::config::File::with_name(&file).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
