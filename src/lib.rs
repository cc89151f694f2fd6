//! Stock-Scout: a retail catalogue crawler
//!
//! This crate walks a shop's category menu, records every in-stock product
//! into a table file, and re-visits product pages later to refresh stock
//! counts for a range of rows.

pub mod command;
pub mod config;
pub mod crawler;
pub mod output;
pub mod reconcile;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Stock-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Command error: {0}")]
    Command(#[from] command::CommandError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Site root {url} could not be fetched")]
    RootUnavailable { url: String },

    #[error("No category menu found on {url}")]
    MenuMissing { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector `{name}`: {selector}")]
    InvalidSelector { name: &'static str, selector: String },
}

/// Result type alias for Stock-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CategoryNode, ResultList, Stock, StockRow};
