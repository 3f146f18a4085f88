use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use super::{lock, DisplaySurface, ProgressStatus, ProgressUpdate};
use crate::errors::Outcome;
use crate::progress::Action;
use crate::workflow::WorkflowOutcome;

const RESET: &str = "\x1b[0m";
/// Progress is printed once per this many percent, plus on settle.
const PROGRESS_STEP: u8 = 25;

/// Prints documents and coarse progress to stdout.
pub struct TerminalDisplay {
    color: bool,
    json: bool,
    last_printed: Mutex<HashMap<String, u8>>,
}

impl TerminalDisplay {
    pub fn new(color: bool, json: bool) -> Self {
        Self {
            color,
            json,
            last_printed: Mutex::new(HashMap::new()),
        }
    }

    fn print(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // stdout going away (closed pipe) is not worth failing a workflow over
        let _ = writeln!(out, "{text}");
    }

    /// Whether a progress update crosses into a new bucket since the last print.
    fn should_print(&self, target: &str, update: &ProgressUpdate) -> bool {
        if update.status != ProgressStatus::Running {
            lock(&self.last_printed).remove(target);
            return true;
        }
        let bucket = update.percent / PROGRESS_STEP;
        let mut printed = lock(&self.last_printed);
        match printed.get(target) {
            Some(last) if *last >= bucket => false,
            _ => {
                printed.insert(target.to_string(), bucket);
                true
            }
        }
    }

    fn format_outcome(&self, target: &str, outcome: &WorkflowOutcome) -> String {
        if self.json {
            return serde_json::to_string_pretty(outcome)
                .unwrap_or_else(|e| format!("{{\"ok\":false,\"message\":\"{e}\"}}"));
        }

        match outcome {
            Outcome::Success(doc) => doc
                .render()
                .into_iter()
                .map(|line| match (self.color, line.color) {
                    (true, Some(color)) => format!("{}{}{RESET}", color.ansi(), line.text),
                    _ => line.text,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Outcome::Failure { kind, message } => {
                format!("[{target}] {kind:?} error: {message}")
            }
        }
    }
}

impl DisplaySurface for TerminalDisplay {
    fn has_target(&self, target: &str) -> bool {
        Action::ALL
            .iter()
            .any(|a| a.progress_target() == target || a.result_target() == target)
    }

    fn publish_progress(&self, target: &str, update: ProgressUpdate) {
        if self.json || !self.should_print(target, &update) {
            return;
        }
        self.print(&format!("[{target}] {}", update.label()));
    }

    fn render(&self, target: &str, outcome: &WorkflowOutcome) {
        let text = self.format_outcome(target, outcome);
        self.print(&text);
        if !self.json {
            self.print("");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::format::DisplayDocument;
    use crate::scoring::Color;

    #[test]
    fn test_progress_printed_once_per_bucket() {
        let display = TerminalDisplay::new(false, false);
        let t = "match";
        assert!(display.should_print(t, &ProgressUpdate::running(0)));
        assert!(!display.should_print(t, &ProgressUpdate::running(10)));
        assert!(display.should_print(t, &ProgressUpdate::running(26)));
        assert!(!display.should_print(t, &ProgressUpdate::running(49)));
        assert!(display.should_print(t, &ProgressUpdate::completed()));
        // a fresh session starts printing again from zero
        assert!(display.should_print(t, &ProgressUpdate::running(0)));
    }

    #[test]
    fn test_failure_text_names_target_and_kind() {
        let display = TerminalDisplay::new(false, false);
        let outcome = Outcome::Failure {
            kind: ErrorKind::Validation,
            message: "Job URL is required".into(),
        };
        assert_eq!(
            display.format_outcome("job-result", &outcome),
            "[job-result] Validation error: Job URL is required"
        );
    }

    #[test]
    fn test_colored_headline() {
        let display = TerminalDisplay::new(true, false);
        let mut doc = DisplayDocument::new("Compatibility Match");
        doc.headline = Some(crate::format::Headline {
            label: "Overall Compatibility Score".into(),
            value: "91%".into(),
            color: Color("#000000"),
        });
        let text = display.format_outcome("match-result", &Outcome::Success(doc));
        assert!(text.contains("\x1b[38;2;0;0;0mOverall Compatibility Score: 91%\x1b[0m"));
    }

    #[test]
    fn test_json_mode_prints_uniform_outcome() {
        let display = TerminalDisplay::new(false, true);
        let outcome: WorkflowOutcome = Outcome::Failure {
            kind: ErrorKind::Precondition,
            message: "missing profile or job analysis".into(),
        };
        let text = display.format_outcome("match-result", &outcome);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["errorKind"], "precondition");
    }
}
