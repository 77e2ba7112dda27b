//! End-to-end tests for pathprobe
//!
//! These tests exercise the full stack in-process:
//! - NetBrain REST client against a loopback mock server
//! - Gateway resolution with HA and vsys handling
//! - Concurrent direction tasks with a scripted command executor
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pathprobe-tests
//! ```
//!
//! # Test Structure
//!
//! - `diagnostics_e2e_test.rs` - Full trace runs, partial and total failure, cancellation

// This crate only contains tests, no library code
