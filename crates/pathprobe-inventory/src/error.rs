//! Error types for NetBrain client operations

use pathprobe_core::InventoryError;
use thiserror::Error;

/// Result type alias for NetBrain client operations
pub type Result<T> = std::result::Result<T, NetBrainError>;

/// Errors that can occur while talking to NetBrain
#[derive(Error, Debug)]
pub enum NetBrainError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server returned an error response
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Login rejected or token refused
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Configured tenant is not visible to the user
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    /// Configured domain does not exist in the tenant
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl NetBrainError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }
}

impl From<NetBrainError> for InventoryError {
    fn from(err: NetBrainError) -> Self {
        match err {
            NetBrainError::HttpError(e) => InventoryError::Transport(e.to_string()),
            NetBrainError::InvalidUrl(e) => InventoryError::Transport(e.to_string()),
            NetBrainError::ServerError { status, message } => {
                InventoryError::Server { status, message }
            }
            NetBrainError::ParseError(msg) => InventoryError::Parse(msg),
            NetBrainError::Authentication(msg) => InventoryError::Authentication(msg),
            e @ (NetBrainError::TenantNotFound(_) | NetBrainError::DomainNotFound(_)) => {
                InventoryError::Authentication(e.to_string())
            }
            NetBrainError::NotFound(msg) => InventoryError::NotFound(msg),
        }
    }
}
