//! Remote analysis service. This is the only way the workflow reaches extraction,
//! analysis, and matching. The service itself is opaque: it accepts a URL or a
//! resume document and answers with loosely-shaped analysis JSON.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

pub mod http;

pub use http::HttpAnalysisService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A resume file selected for upload.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: content_type_for(&file_name),
            file_name,
            bytes: bytes.into(),
        }
    }

    /// Reads a resume from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read resume: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else {
        "application/octet-stream"
    }
}

/// The remote operations the workflow depends on. Implement this to point the
/// workflow at a different backend (or a fake, in tests).
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// extract-analyze-profile: `{profile_url}` → profile analysis.
    async fn analyze_profile_url(&self, profile_url: &str) -> Result<Value, ServiceError>;

    /// upload-analyze-resume: multipart document → profile analysis.
    async fn analyze_resume(&self, resume: &ResumeDocument) -> Result<Value, ServiceError>;

    /// extract-analyze-job: `{job_url}` → job analysis.
    async fn analyze_job_url(&self, job_url: &str) -> Result<Value, ServiceError>;

    /// match-profiles: `{profile_data, job_data}` → match result.
    async fn match_profiles(&self, profile: &Value, job: &Value) -> Result<Value, ServiceError>;
}
