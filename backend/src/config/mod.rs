//! Configuration management for the bid queue backend
//!
//! Configuration comes from environment variables (optionally seeded from a
//! `.env` file), with defaults aimed at the Stellar testnet.

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC URL used for `getEvents`
    pub soroban_rpc_url: String,

    /// Bid queue contract to index
    pub contract_id: String,

    /// Ledger to start from when no cursor has been recorded yet
    pub start_ledger: u64,

    /// Delay between polls, in seconds
    pub poll_interval_secs: u64,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// CORS allowed origins (comma separated)
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value.parse::<Environment>()?,
            None => Environment::default(),
        };

        let soroban_rpc_url = lookup("SOROBAN_RPC_URL")
            .unwrap_or_else(|| "https://soroban-testnet.stellar.org".to_string());

        let contract_id = lookup("BID_QUEUE_CONTRACT_ID")
            .ok_or_else(|| ConfigError::MissingEnvVar("BID_QUEUE_CONTRACT_ID".to_string()))?;

        let start_ledger = match lookup("START_LEDGER") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(format!("START_LEDGER must be a ledger number: {}", value))
            })?,
            None => 1,
        };

        let poll_interval_secs = lookup("POLL_INTERVAL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(5);

        let port = lookup("PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").filter(|s| !s.trim().is_empty());

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            soroban_rpc_url,
            contract_id,
            start_ledger,
            poll_interval_secs,
            environment,
            port,
            cors_allowed_origins,
            log_level,
        })
    }
}
