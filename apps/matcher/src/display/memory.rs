use std::collections::HashSet;
use std::sync::Mutex;

use tracing::warn;

use super::{lock, DisplaySurface, ProgressUpdate};
use crate::progress::Action;
use crate::workflow::WorkflowOutcome;

/// Records every update and rendered outcome per target. Useful for embedding
/// the workflow behind another UI, and for tests.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    targets: HashSet<String>,
    progress: Mutex<Vec<(String, ProgressUpdate)>>,
    rendered: Mutex<Vec<(String, WorkflowOutcome)>>,
}

impl MemoryDisplay {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A display with the progress and result target of every action.
    pub fn for_workflow() -> Self {
        Self::new(
            Action::ALL
                .iter()
                .flat_map(|a| [a.progress_target(), a.result_target()]),
        )
    }

    pub fn progress_for(&self, target: &str) -> Vec<ProgressUpdate> {
        lock(&self.progress)
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, u)| *u)
            .collect()
    }

    pub fn last_progress(&self, target: &str) -> Option<ProgressUpdate> {
        self.progress_for(target).last().copied()
    }

    pub fn rendered_for(&self, target: &str) -> Vec<WorkflowOutcome> {
        lock(&self.rendered)
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, o)| o.clone())
            .collect()
    }

    pub fn last_rendered(&self, target: &str) -> Option<WorkflowOutcome> {
        self.rendered_for(target).pop()
    }
}

impl DisplaySurface for MemoryDisplay {
    fn has_target(&self, target: &str) -> bool {
        self.targets.contains(target)
    }

    fn publish_progress(&self, target: &str, update: ProgressUpdate) {
        if !self.has_target(target) {
            warn!("dropping progress for unknown target '{target}'");
            return;
        }
        lock(&self.progress).push((target.to_string(), update));
    }

    fn render(&self, target: &str, outcome: &WorkflowOutcome) {
        if !self.has_target(target) {
            warn!("dropping render for unknown target '{target}'");
            return;
        }
        lock(&self.rendered).push((target.to_string(), outcome.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, Outcome};

    #[test]
    fn test_workflow_display_has_all_targets() {
        let display = MemoryDisplay::for_workflow();
        for action in Action::ALL {
            assert!(display.has_target(action.progress_target()));
            assert!(display.has_target(action.result_target()));
        }
        assert!(!display.has_target("sidebar"));
    }

    #[test]
    fn test_updates_are_kept_per_target() {
        let display = MemoryDisplay::new(["a", "b"]);
        display.publish_progress("a", ProgressUpdate::running(10));
        display.publish_progress("b", ProgressUpdate::running(20));
        display.publish_progress("a", ProgressUpdate::completed());
        display.publish_progress("nowhere", ProgressUpdate::running(1));

        assert_eq!(
            display.progress_for("a"),
            vec![ProgressUpdate::running(10), ProgressUpdate::completed()]
        );
        assert_eq!(display.last_progress("b"), Some(ProgressUpdate::running(20)));
        assert!(display.progress_for("nowhere").is_empty());
    }

    #[test]
    fn test_last_rendered() {
        let display = MemoryDisplay::new(["match-result"]);
        assert!(display.last_rendered("match-result").is_none());
        display.render(
            "match-result",
            &Outcome::Failure {
                kind: ErrorKind::Precondition,
                message: "missing".into(),
            },
        );
        let last = display.last_rendered("match-result").unwrap();
        assert_eq!(last.error_kind(), Some(ErrorKind::Precondition));
    }
}
