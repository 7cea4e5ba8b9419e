//! Error types for the console session core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persisted session corrupt: {0}")]
    PersistenceCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConsoleError {
    /// True for the 401 case; callers must not retry with the same token.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ConsoleError::SessionExpired)
    }

    /// Whether a caller may reasonably try the same operation again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ConsoleError::Network(_) => true,
            ConsoleError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
