use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for the order terminal
#[derive(Error, Debug)]
pub enum DeskError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Request validation errors (detected before any network call)
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    // Venue-side rejection, carrying the exchange's own code and message
    #[error("Exchange rejected request: code={code} msg={message}")]
    Exchange { code: i64, message: String },

    // Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for DeskError
pub type Result<T> = std::result::Result<T, DeskError>;

impl DeskError {
    /// True when the error originated in input validation, i.e. the request
    /// never reached the exchange.
    pub fn is_validation(&self) -> bool {
        matches!(self, DeskError::Validation(_))
    }
}
