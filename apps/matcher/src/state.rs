use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// An analysis result kept for the match step, with the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub document: Value,
    pub stored_at: DateTime<Utc>,
}

impl StoredAnalysis {
    fn now(document: Value) -> Self {
        Self {
            document,
            stored_at: Utc::now(),
        }
    }
}

/// Session-scoped store of the most recent profile and job analyses.
/// Each slot is overwritten, never appended. One owner (the workflow) mutates it.
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    profile: Option<StoredAnalysis>,
    job: Option<StoredAnalysis>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_profile(&mut self, result: Value) {
        self.profile = Some(StoredAnalysis::now(result));
    }

    pub fn set_job(&mut self, result: Value) {
        self.job = Some(StoredAnalysis::now(result));
    }

    pub fn profile(&self) -> Option<&Value> {
        self.profile.as_ref().map(|s| &s.document)
    }

    pub fn job(&self) -> Option<&Value> {
        self.job.as_ref().map(|s| &s.document)
    }

    pub fn profile_entry(&self) -> Option<&StoredAnalysis> {
        self.profile.as_ref()
    }

    pub fn job_entry(&self) -> Option<&StoredAnalysis> {
        self.job.as_ref()
    }

    /// Both analyses, cloned, if and only if both are present.
    pub fn match_inputs(&self) -> Option<(Value, Value)> {
        Some((self.profile()?.clone(), self.job()?.clone()))
    }
}
