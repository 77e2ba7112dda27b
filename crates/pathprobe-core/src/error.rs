//! Error types shared by the resolver, the executors and the orchestrator

use std::fmt;

use thiserror::Error;

use crate::models::Direction;
use crate::vendor::Vendor;

/// Result type for inventory queries
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Result type for command execution
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Errors surfaced by an inventory (CMDB) collaborator
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// Transport/communication error (connection refused, TLS, timeout...)
    #[error("Inventory communication error: {0}")]
    Transport(String),

    /// Inventory answered with a non-success status
    #[error("Inventory server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Failed to parse inventory response: {0}")]
    Parse(String),

    /// Session could not be established or was rejected
    #[error("Inventory authentication failed: {0}")]
    Authentication(String),

    /// Requested object does not exist in the inventory
    #[error("Not found in inventory: {0}")]
    NotFound(String),
}

/// Errors raised while resolving the active gateway for a source IP.
///
/// "No eligible gateway" is not an error; resolvers report it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    /// Inventory query failed
    #[error("Inventory query failed while resolving {source_ip}: {error}")]
    Inventory {
        source_ip: String,
        #[source]
        error: InventoryError,
    },

    /// A gateway candidate payload could not be decoded
    #[error("Malformed gateway candidate for {source_ip}: {reason}")]
    MalformedPayload { source_ip: String, reason: String },
}

impl ResolutionError {
    pub fn inventory(source_ip: impl Into<String>, error: InventoryError) -> Self {
        Self::Inventory {
            source_ip: source_ip.into(),
            error,
        }
    }

    /// The source IP whose resolution failed
    pub fn source_ip(&self) -> &str {
        match self {
            ResolutionError::Inventory { source_ip, .. } => source_ip,
            ResolutionError::MalformedPayload { source_ip, .. } => source_ip,
        }
    }
}

/// Errors raised by a command executor (device session or command run)
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    /// Could not reach the device
    #[error("Connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    /// Device rejected the configured credentials
    #[error("Authentication to {host} failed: {reason}")]
    Authentication { host: String, reason: String },

    /// No credentials configured for this vendor
    #[error("No credentials configured for vendor {0}")]
    MissingCredentials(Vendor),

    /// Command could not be run or its output could not be read
    #[error("Command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    /// Command did not finish within the configured timeout
    #[error("Command '{0}' timed out")]
    Timeout(String),
}

/// Why a single direction did not complete
#[derive(Debug, Clone, Error)]
pub enum DirectionFailure {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("No active gateway found for {0}")]
    GatewayNotFound(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Every requested direction failed
#[derive(Debug, Clone)]
pub struct AggregateError {
    pub failures: Vec<(Direction, String)>,
}

impl AggregateError {
    /// Directions named by this error, in the order they failed
    pub fn directions(&self) -> Vec<Direction> {
        self.failures.iter().map(|(d, _)| *d).collect()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All diagnostic directions failed")?;
        for (direction, reason) in &self.failures {
            write!(f, "; {}: {}", direction, reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// Errors returned by a diagnostic run as a whole
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The run was interrupted before all directions completed
    #[error("Diagnostic run cancelled")]
    Cancelled,

    /// No direction was requested
    #[error("No diagnostic direction requested")]
    NoDirections,
}
