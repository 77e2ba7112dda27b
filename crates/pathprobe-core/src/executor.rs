//! Command executor traits - device sessions that run diagnostic commands

use async_trait::async_trait;

use crate::error::ExecutionResult;
use crate::models::ResolvedGateway;
use crate::vendor::Vendor;

/// Where and how to open a device session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    /// Device name (for logging)
    pub device: String,
    /// Management address of the device
    pub host: String,
    /// Selects credentials and command dialect
    pub vendor: Vendor,
}

impl From<&ResolvedGateway> for ConnectionSpec {
    fn from(gateway: &ResolvedGateway) -> Self {
        Self {
            device: gateway.name.clone(),
            host: gateway.management_ip.clone(),
            vendor: gateway.vendor,
        }
    }
}

/// Opens sessions to managed devices
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Open a session scoped to one device
    async fn open(&self, spec: &ConnectionSpec) -> ExecutionResult<Box<dyn CommandSession>>;
}

/// An open device session
#[async_trait]
pub trait CommandSession: Send {
    /// Run one command and return its raw text output
    async fn execute(&mut self, command: &str) -> ExecutionResult<String>;

    /// Close the session. Dropping it also releases the connection.
    async fn close(&mut self) -> ExecutionResult<()> {
        Ok(())
    }
}
