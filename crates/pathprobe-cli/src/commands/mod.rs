//! Command implementations for pathprobe

pub mod gateway;
pub mod trace;

pub use gateway::gateway;
pub use trace::trace;
