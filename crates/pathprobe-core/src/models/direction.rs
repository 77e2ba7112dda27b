//! Diagnostic directions and the per-direction task lifecycle

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which way a diagnostic run tests the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// source → destination
    Forward,
    /// destination → source
    Reverse,
}

impl Direction {
    /// Both directions, forward first
    pub const BOTH: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    /// The `(src, dst)` pair tested by this direction
    pub fn endpoints<'a>(self, source: &'a str, destination: &'a str) -> (&'a str, &'a str) {
        match self {
            Direction::Forward => (source, destination),
            Direction::Reverse => (destination, source),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Direction::Forward),
            "reverse" => Ok(Direction::Reverse),
            _ => Err(format!("Unknown direction: '{}'", s)),
        }
    }
}

/// State of one direction task.
///
/// # Lifecycle
///
/// ```text
/// Pending → Resolving → Resolved → Executing → Completed
///                │                     │
///                ▼                     ▼
///        ResolutionFailed       ExecutionFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Resolving,
    Resolved,
    /// Gateway lookup failed or found no active gateway. Terminal.
    ResolutionFailed,
    Executing,
    /// All commands ran. Terminal.
    Completed,
    /// Device session or a command failed. Terminal.
    ExecutionFailed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::ResolutionFailed | TaskState::Completed | TaskState::ExecutionFailed
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Pending => "pending",
            TaskState::Resolving => "resolving",
            TaskState::Resolved => "resolved",
            TaskState::ResolutionFailed => "resolution_failed",
            TaskState::Executing => "executing",
            TaskState::Completed => "completed",
            TaskState::ExecutionFailed => "execution_failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_swap_for_reverse() {
        assert_eq!(
            Direction::Forward.endpoints("10.0.0.5", "172.16.1.9"),
            ("10.0.0.5", "172.16.1.9")
        );
        assert_eq!(
            Direction::Reverse.endpoints("10.0.0.5", "172.16.1.9"),
            ("172.16.1.9", "10.0.0.5")
        );
    }

    #[test]
    fn parse_direction() {
        assert_eq!("reverse".parse::<Direction>(), Ok(Direction::Reverse));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::ResolutionFailed.is_terminal());
        assert!(TaskState::ExecutionFailed.is_terminal());
        assert!(!TaskState::Resolved.is_terminal());
        assert!(!TaskState::Executing.is_terminal());
    }
}
