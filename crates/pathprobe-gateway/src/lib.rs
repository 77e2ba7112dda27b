//! pathprobe-gateway - Active-gateway resolution and path diagnostics
//!
//! This crate holds the decision logic of pathprobe:
//!
//! - [`GatewayResolver`] walks the inventory's gateway candidates for a
//!   source IP and picks the single active gateway device.
//! - [`DiagnosticOrchestrator`] runs resolution plus device diagnostics for
//!   the forward and/or reverse direction concurrently and merges the
//!   results into one [`DiagnosticReport`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   DiagnosticOrchestrator                     │
//! │                                                              │
//! │     forward task                      reverse task           │
//! │  ┌──────────────────┐             ┌──────────────────┐       │
//! │  │ GatewayResolver  │             │ GatewayResolver  │       │
//! │  │        │         │             │        │         │       │
//! │  │        ▼         │             │        ▼         │       │
//! │  │ CommandExecutor  │             │ CommandExecutor  │       │
//! │  └────────┬─────────┘             └────────┬─────────┘       │
//! │           └──────────► ReportCollector ◄───┘                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pathprobe_gateway::DiagnosticOrchestrator;
//! use pathprobe_core::Direction;
//!
//! let orchestrator = DiagnosticOrchestrator::new(inventory, executor);
//! let report = orchestrator
//!     .run("10.10.1.50", "10.20.1.60", &Direction::BOTH)
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod orchestrator;
mod resolver;

#[cfg(test)]
mod test_support;

pub use orchestrator::{DiagnosticOrchestrator, ReportCollector};
pub use resolver::GatewayResolver;

// Re-export core types for convenience
pub use pathprobe_core::{
    DiagnosticError, DiagnosticReport, Direction, DirectionOutcome, ResolutionError,
    ResolvedGateway,
};
