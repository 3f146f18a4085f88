//! The three user-triggered operations: profile analysis, job analysis and
//! matching. Each one validates, starts simulated progress, calls the remote
//! service, stores the result (profile/job only), formats it, settles progress
//! and renders the outcome into the action's result target.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::display::DisplaySurface;
use crate::errors::{Outcome, WorkflowError};
use crate::format::{format_job, format_match, format_profile, DisplayDocument};
use crate::progress::{Action, ProgressConfig, ProgressSimulator, ProgressTicket};
use crate::service::{AnalysisService, ResumeDocument, ServiceError};
use crate::state::WorkflowState;

pub type WorkflowOutcome = Outcome<DisplayDocument>;

/// Where a profile analysis starts from.
#[derive(Debug, Clone)]
pub enum ProfileSource {
    /// A public profile URL.
    Url(String),
    /// An uploaded resume. `None` means nothing was selected.
    Document(Option<ResumeDocument>),
}

pub struct Workflow {
    service: Arc<dyn AnalysisService>,
    display: Arc<dyn DisplaySurface>,
    state: RwLock<WorkflowState>,
    progress: Mutex<ProgressSimulator>,
}

impl Workflow {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        display: Arc<dyn DisplaySurface>,
        progress: ProgressConfig,
    ) -> Self {
        Self {
            progress: Mutex::new(ProgressSimulator::new(progress, Arc::clone(&display))),
            service,
            display,
            state: RwLock::new(WorkflowState::new()),
        }
    }

    pub async fn analyze_profile(&self, source: ProfileSource) -> WorkflowOutcome {
        let action = Action::ProfileAnalysis;
        let result = self.run_profile(source).await;
        self.finish(action, result)
    }

    pub async fn analyze_job(&self, job_url: &str) -> WorkflowOutcome {
        let action = Action::JobAnalysis;
        let result = self.run_job(job_url).await;
        self.finish(action, result)
    }

    pub async fn match_profiles(&self) -> WorkflowOutcome {
        let action = Action::Match;
        let result = self.run_match().await;
        self.finish(action, result)
    }

    /// A snapshot of the stored analyses.
    pub async fn state(&self) -> WorkflowState {
        self.state.read().await.clone()
    }

    async fn run_profile(&self, source: ProfileSource) -> Result<DisplayDocument, WorkflowError> {
        let action = Action::ProfileAnalysis;
        let request = ProfileRequest::try_from(source)?;

        let ticket = self.progress.lock().await.start(action)?;
        let response = match &request {
            ProfileRequest::Url(url) => {
                info!("{action}: analyzing profile URL {url}");
                self.service.analyze_profile_url(url).await
            }
            ProfileRequest::Resume(resume) => {
                info!(
                    "{action}: uploading resume {} ({} bytes)",
                    resume.file_name,
                    resume.bytes.len()
                );
                self.service.analyze_resume(resume).await
            }
        };

        self.settle(ticket, response, WorkflowError::Extraction, |state, doc| {
            state.set_profile(doc.clone());
            format_profile(doc)
        })
        .await
    }

    async fn run_job(&self, job_url: &str) -> Result<DisplayDocument, WorkflowError> {
        let action = Action::JobAnalysis;
        let job_url = require_url(job_url, MISSING_JOB_URL)?;

        let ticket = self.progress.lock().await.start(action)?;
        info!("{action}: analyzing job URL {job_url}");
        let response = self.service.analyze_job_url(job_url).await;

        self.settle(ticket, response, WorkflowError::Extraction, |state, doc| {
            state.set_job(doc.clone());
            format_job(doc)
        })
        .await
    }

    async fn run_match(&self) -> Result<DisplayDocument, WorkflowError> {
        let action = Action::Match;
        // read once; later profile/job updates do not affect this request
        let (profile, job) = self
            .state
            .read()
            .await
            .match_inputs()
            .ok_or(WorkflowError::Precondition)?;

        let ticket = self.progress.lock().await.start(action)?;
        info!("{action}: matching stored profile against stored job");
        let response = self.service.match_profiles(&profile, &job).await;

        self.settle(ticket, response, WorkflowError::Match, |_, doc| format_match(doc))
            .await
    }

    /// Applies a remote response to a progress session. A response for a
    /// session that has since been replaced is dropped untouched. Otherwise
    /// success runs `apply` (store, then format) and completes progress, and
    /// failure stops progress.
    async fn settle<F>(
        &self,
        ticket: ProgressTicket,
        response: Result<Value, ServiceError>,
        on_error: fn(ServiceError) -> WorkflowError,
        apply: F,
    ) -> Result<DisplayDocument, WorkflowError>
    where
        F: FnOnce(&mut WorkflowState, &Value) -> DisplayDocument,
    {
        let mut progress = self.progress.lock().await;
        if !progress.is_current(&ticket) {
            return Err(WorkflowError::Superseded(ticket.action));
        }

        match response {
            Ok(doc) => {
                let document = {
                    let mut state = self.state.write().await;
                    apply(&mut state, &doc)
                };
                progress.force_complete(&ticket);
                debug!("{}: response applied", ticket.action);
                Ok(document)
            }
            Err(e) => {
                progress.stop(&ticket);
                Err(on_error(e))
            }
        }
    }

    /// Logs and renders the result. Superseded results are not rendered: the
    /// result area belongs to the newer request.
    fn finish(
        &self,
        action: Action,
        result: Result<DisplayDocument, WorkflowError>,
    ) -> WorkflowOutcome {
        if let Err(e) = &result {
            e.log(action);
        }
        let skip_render = matches!(result, Err(WorkflowError::Superseded(_)));
        let outcome = WorkflowOutcome::from(result);
        if !skip_render {
            self.display.render(action.result_target(), &outcome);
        }
        outcome
    }
}

const MISSING_PROFILE_URL: &str = "Please enter a LinkedIn profile URL.";
const MISSING_JOB_URL: &str = "Please enter a job posting URL.";
const MISSING_RESUME: &str = "Please select a resume file to upload.";

fn require_url<'a>(url: &'a str, message: &str) -> Result<&'a str, WorkflowError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(WorkflowError::Validation(message.to_string()));
    }
    Ok(url)
}

/// A validated profile source.
enum ProfileRequest {
    Url(String),
    Resume(ResumeDocument),
}

impl TryFrom<ProfileSource> for ProfileRequest {
    type Error = WorkflowError;

    fn try_from(source: ProfileSource) -> Result<Self, Self::Error> {
        match source {
            ProfileSource::Url(url) => {
                let url = require_url(&url, MISSING_PROFILE_URL)?;
                Ok(ProfileRequest::Url(url.to_string()))
            }
            ProfileSource::Document(Some(resume)) if !resume.is_empty() => {
                Ok(ProfileRequest::Resume(resume))
            }
            ProfileSource::Document(_) => {
                Err(WorkflowError::Validation(MISSING_RESUME.to_string()))
            }
        }
    }
}
