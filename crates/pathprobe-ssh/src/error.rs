//! SSH executor errors

use pathprobe_core::{ExecutionError, Vendor};
use thiserror::Error;

/// SSH-specific execution errors
#[derive(Debug, Error)]
pub enum SshError {
    /// TCP connect or SSH handshake failed
    #[error("Connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    /// Device rejected the credentials
    #[error("Authentication to {host} as {username} failed")]
    Authentication { host: String, username: String },

    /// No credentials configured for the vendor
    #[error("No credentials configured for {0}")]
    MissingCredentials(Vendor),

    /// Channel could not be opened or the command could not be started
    #[error("Command '{command}' failed: {reason}")]
    Channel { command: String, reason: String },

    /// Connect or command did not complete in time
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl From<SshError> for ExecutionError {
    fn from(err: SshError) -> Self {
        match err {
            SshError::Connection { host, reason } => ExecutionError::Connection { host, reason },
            SshError::Authentication { host, username } => ExecutionError::Authentication {
                host,
                reason: format!("credentials for user '{}' rejected", username),
            },
            SshError::MissingCredentials(vendor) => ExecutionError::MissingCredentials(vendor),
            SshError::Channel { command, reason } => ExecutionError::Command { command, reason },
            SshError::Timeout(what) => ExecutionError::Timeout(what),
        }
    }
}
