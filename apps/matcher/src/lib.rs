//! Profile-to-job matching workflow: analyze a profile and a job posting with a
//! remote analysis service, then score how well they fit.

pub mod config;
pub mod display;
pub mod errors;
pub mod format;
pub mod progress;
pub mod scoring;
pub mod service;
pub mod state;
pub mod workflow;

pub use errors::{ErrorKind, Outcome, WorkflowError};
pub use workflow::{ProfileSource, Workflow, WorkflowOutcome};
