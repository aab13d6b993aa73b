//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Blacklist error: {0}")]
    Blacklist(#[from] blacklist_store::BlacklistError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetchers::FetchError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] discord_gateway::GatewayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
