//! Shared data models for gateway resolution and path diagnostics

mod direction;
mod gateway;
mod report;

pub use direction::*;
pub use gateway::*;
pub use report::*;
