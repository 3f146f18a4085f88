use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::progress::Action;
use crate::service::ServiceError;

/// Workflow-level error type.
/// Every variant is user-visible: the orchestrator renders it into the
/// action's result area and returns it inside a failed `Outcome`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("missing profile or job analysis")]
    Precondition,

    #[error("Extraction failed: {0}")]
    Extraction(ServiceError),

    #[error("Match failed: {0}")]
    Match(ServiceError),

    #[error("Display target '{0}' is not configured")]
    Configuration(String),

    #[error("Superseded by a newer {0} request")]
    Superseded(Action),
}

/// Stable classification of a `WorkflowError`, serialized as `errorKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Precondition,
    Extraction,
    Match,
    Configuration,
    Superseded,
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::Precondition => ErrorKind::Precondition,
            WorkflowError::Extraction(_) => ErrorKind::Extraction,
            WorkflowError::Match(_) => ErrorKind::Match,
            WorkflowError::Configuration(_) => ErrorKind::Configuration,
            WorkflowError::Superseded(_) => ErrorKind::Superseded,
        }
    }

    /// Logs the error at a level matching its origin. Local input problems are
    /// warnings; upstream and wiring failures are errors.
    pub(crate) fn log(&self, action: Action) {
        match self {
            WorkflowError::Validation(msg) => {
                tracing::warn!("{action}: validation error: {msg}");
            }
            WorkflowError::Precondition => {
                tracing::warn!("{action}: {self}");
            }
            WorkflowError::Superseded(_) => {
                tracing::info!("{action}: discarding stale response");
            }
            WorkflowError::Extraction(e) | WorkflowError::Match(e) => {
                tracing::error!("{action}: upstream error: {e}");
            }
            WorkflowError::Configuration(target) => {
                tracing::error!("{action}: display target '{target}' missing");
            }
        }
    }
}

/// Uniform result of a workflow operation, serialized as
/// `{ "ok": true, "document": ... }` or `{ "ok": false, "errorKind": ..., "message": ... }`.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Success(T),
    Failure { kind: ErrorKind, message: String },
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn document(&self) -> Option<&T> {
        match self {
            Outcome::Success(doc) => Some(doc),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { message, .. } => Some(message),
        }
    }
}

impl<T> From<Result<T, WorkflowError>> for Outcome<T> {
    fn from(result: Result<T, WorkflowError>) -> Self {
        match result {
            Ok(doc) => Outcome::Success(doc),
            Err(e) => Outcome::Failure {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        match self {
            Outcome::Success(doc) => {
                let mut s = serializer.serialize_struct("Outcome", 2)?;
                s.serialize_field("ok", &true)?;
                s.serialize_field("document", doc)?;
                s.end()
            }
            Outcome::Failure { kind, message } => {
                let mut s = serializer.serialize_struct("Outcome", 3)?;
                s.serialize_field("ok", &false)?;
                s.serialize_field("errorKind", kind)?;
                s.serialize_field("message", message)?;
                s.end()
            }
        }
    }
}
