//! Configuration management for LendLens
//!
//! This module handles loading and validating configuration from environment
//! variables, with support for different environments (development, staging,
//! production).

use std::env;
use thiserror::Error;

/// Default Kiva marketplace GraphQL endpoint
pub const DEFAULT_KIVA_API_URL: &str = "https://marketplace-api.k1.kiva.org/graphql";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Invalid page size: {0}")]
    InvalidPerPage(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
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

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
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
    /// Kiva marketplace GraphQL endpoint
    pub kiva_api_url: String,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Loans shown per page
    pub per_page: u32,

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

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let kiva_api_url =
            env::var("KIVA_API_URL").unwrap_or_else(|_| DEFAULT_KIVA_API_URL.to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let per_page = parse_per_page(env::var("PER_PAGE").ok())?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            kiva_api_url,
            environment,
            port,
            per_page,
            cors_allowed_origins,
            log_level,
        })
    }
}

fn parse_per_page(raw: Option<String>) -> Result<u32, ConfigError> {
    let per_page = raw
        .unwrap_or_else(|| "12".to_string())
        .parse::<u32>()
        .map_err(|_| {
            ConfigError::InvalidPerPage("PER_PAGE must be a valid number".to_string())
        })?;

    if per_page == 0 {
        return Err(ConfigError::InvalidPerPage(
            "PER_PAGE must be at least 1".to_string(),
        ));
    }

    Ok(per_page)
}
