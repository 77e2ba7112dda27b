//! pathprobe-ssh - SSH command executor for gateway devices
//!
//! This crate provides the [`CommandExecutor`] implementation that runs
//! diagnostic commands on resolved gateways over SSH, plus a scripted
//! [`mock::MockExecutor`] for tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SshExecutor                            │
//! │  Implements CommandExecutor trait                           │
//! │                                                             │
//! │  ┌─────────────┐  ┌──────────────────┐                      │
//! │  │ SshConfig   │  │VendorCredentials │                      │
//! │  │ (timeouts)  │  │ (per vendor)     │                      │
//! │  └─────────────┘  └──────────────────┘                      │
//! │                          │                                  │
//! │                    ┌─────┴─────┐                            │
//! │                    │SshSession │  one connection per device │
//! │                    │(russh)    │  one channel per command   │
//! │                    └───────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mock;

pub use client::{SshExecutor, SshSession};
pub use config::{Credentials, SshConfig, VendorCredentials};
pub use error::SshError;

// Re-export for convenience
pub use pathprobe_core::{CommandExecutor, CommandSession, ConnectionSpec, ExecutionError};
