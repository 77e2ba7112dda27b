//! pathprobe-core - Core types and traits for active-gateway path diagnostics
//!
//! This crate holds the data model shared by the resolver, the
//! orchestrator and the collaborator implementations (inventory client,
//! device command executors), plus the traits those collaborators
//! implement.

pub mod device_ref;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod models;
pub mod vendor;

pub use error::{
    AggregateError, DiagnosticError, DirectionFailure, ExecutionError, ExecutionResult,
    InventoryError, InventoryResult, ResolutionError,
};
pub use executor::{CommandExecutor, CommandSession, ConnectionSpec};
pub use inventory::Inventory;
pub use models::*;
pub use vendor::{DiagnosticCommand, Vendor};
