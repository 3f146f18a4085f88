//! Presentation seam. The workflow hands finished documents and progress
//! updates to named targets and never assumes anything about markup.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::workflow::WorkflowOutcome;

pub mod memory;
pub mod terminal;

pub use memory::MemoryDisplay;
pub use terminal::TerminalDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Running,
    Completed,
    Stopped,
}

/// A progress indicator update: a whole percentage plus the session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub status: ProgressStatus,
}

impl ProgressUpdate {
    pub fn running(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
            status: ProgressStatus::Running,
        }
    }

    pub fn completed() -> Self {
        Self {
            percent: 100,
            status: ProgressStatus::Completed,
        }
    }

    pub fn stopped() -> Self {
        Self {
            percent: 0,
            status: ProgressStatus::Stopped,
        }
    }

    /// Text for a status label next to the indicator.
    pub fn label(&self) -> String {
        match self.status {
            ProgressStatus::Running => format!("{}%", self.percent),
            ProgressStatus::Completed => "Completed".to_string(),
            ProgressStatus::Stopped => "Stopped".to_string(),
        }
    }
}

/// Sink for rendered outcomes and progress updates, addressed by target name.
pub trait DisplaySurface: Send + Sync {
    /// Whether a target with this name is wired up.
    fn has_target(&self, target: &str) -> bool;

    fn publish_progress(&self, target: &str, update: ProgressUpdate);

    fn render(&self, target: &str, outcome: &WorkflowOutcome);
}

/// Locks a display-side mutex. Display state is append-only bookkeeping, so a
/// poisoned lock still holds usable data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ProgressUpdate::running(42).label(), "42%");
        assert_eq!(ProgressUpdate::completed().label(), "Completed");
        assert_eq!(ProgressUpdate::stopped().label(), "Stopped");
    }

    #[test]
    fn test_running_percent_is_capped() {
        assert_eq!(ProgressUpdate::running(180).percent, 100);
    }
}
