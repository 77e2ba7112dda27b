//! Diagnostic report types

use indexmap::IndexMap;
use serde::Serialize;

use super::{Direction, TaskState};

/// Raw command output keyed by command label, in execution order
pub type CommandOutputs = IndexMap<String, String>;

/// Final outcome of one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DirectionOutcome {
    /// Every command ran; label → raw output
    Completed(CommandOutputs),
    /// Failure marker
    Failed {
        error: String,
        /// Terminal state the task ended in
        state: TaskState,
    },
}

impl DirectionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DirectionOutcome::Completed(_))
    }

    /// Command outputs, if the direction completed
    pub fn outputs(&self) -> Option<&CommandOutputs> {
        match self {
            DirectionOutcome::Completed(outputs) => Some(outputs),
            DirectionOutcome::Failed { .. } => None,
        }
    }

    /// Failure reason, if the direction failed
    pub fn error(&self) -> Option<&str> {
        match self {
            DirectionOutcome::Completed(_) => None,
            DirectionOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Results of a diagnostic run, keyed by direction in completion order.
///
/// Serializes as `{ "<direction>": { "<label>": "<output>", ... }, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiagnosticReport {
    entries: IndexMap<Direction, DirectionOutcome>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a direction. A later insert for the same
    /// direction replaces the earlier one and keeps its position.
    pub fn insert(&mut self, direction: Direction, outcome: DirectionOutcome) {
        self.entries.insert(direction, outcome);
    }

    pub fn get(&self, direction: Direction) -> Option<&DirectionOutcome> {
        self.entries.get(&direction)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in completion order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &DirectionOutcome)> {
        self.entries.iter().map(|(d, o)| (*d, o))
    }

    /// Directions present, in completion order
    pub fn directions(&self) -> Vec<Direction> {
        self.entries.keys().copied().collect()
    }

    pub fn succeeded(&self) -> Vec<Direction> {
        self.iter()
            .filter(|(_, o)| o.is_completed())
            .map(|(d, _)| d)
            .collect()
    }

    pub fn failed(&self) -> Vec<Direction> {
        self.iter()
            .filter(|(_, o)| !o.is_completed())
            .map(|(d, _)| d)
            .collect()
    }

    /// Some, but not all, directions failed
    pub fn is_partial(&self) -> bool {
        let failed = self.failed().len();
        failed > 0 && failed < self.len()
    }
}
