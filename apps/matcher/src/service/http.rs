use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{AnalysisService, ResumeDocument, ServiceError};

const PROFILE_ENDPOINT: &str = "/extract_analyze_profile";
const JOB_ENDPOINT: &str = "/extract_analyze_job";
const RESUME_ENDPOINT: &str = "/upload_analyze_resume";
const MATCH_ENDPOINT: &str = "/match_profiles";

/// Multipart field the service reads the resume from.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
struct ProfileRequest<'a> {
    profile_url: &'a str,
}

#[derive(Debug, Serialize)]
struct JobRequest<'a> {
    job_url: &'a str,
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    profile_data: &'a Value,
    job_data: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// reqwest-backed client for the analysis service.
/// No request timeout is set: analysis calls can legitimately take minutes.
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Value, ServiceError> {
        let url = self.url(endpoint);
        info!("POST {url}");
        let response = self.client.post(&url).json(body).send().await?;
        read_analysis(response).await
    }
}

/// Turns a service response into analysis JSON, or into `ServiceError::Api`
/// carrying the service's own error message when the status is not 2xx.
async fn read_analysis(response: reqwest::Response) -> Result<Value, ServiceError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ServiceErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    debug!("service answered {status} ({} bytes)", body.len());
    Ok(serde_json::from_str(&body)?)
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze_profile_url(&self, profile_url: &str) -> Result<Value, ServiceError> {
        self.post_json(PROFILE_ENDPOINT, &ProfileRequest { profile_url })
            .await
    }

    async fn analyze_resume(&self, resume: &ResumeDocument) -> Result<Value, ServiceError> {
        let part = Part::bytes(resume.bytes.to_vec())
            .file_name(resume.file_name.clone())
            .mime_str(resume.content_type)?;
        let form = Form::new().part(RESUME_FIELD, part);

        let url = self.url(RESUME_ENDPOINT);
        info!("POST {url} ({}, {} bytes)", resume.file_name, resume.bytes.len());
        let response = self.client.post(&url).multipart(form).send().await?;
        read_analysis(response).await
    }

    async fn analyze_job_url(&self, job_url: &str) -> Result<Value, ServiceError> {
        self.post_json(JOB_ENDPOINT, &JobRequest { job_url }).await
    }

    async fn match_profiles(&self, profile: &Value, job: &Value) -> Result<Value, ServiceError> {
        self.post_json(
            MATCH_ENDPOINT,
            &MatchRequest {
                profile_data: profile,
                job_data: job,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    /// Serves a stand-in for the analysis service on an ephemeral port.
    async fn spawn_stub() -> String {
        let app = Router::new()
            .route(
                PROFILE_ENDPOINT,
                post(|Json(body): Json<Value>| async move {
                    match body["profile_url"].as_str() {
                        Some(url) if !url.is_empty() => (
                            StatusCode::OK,
                            Json(json!({ "fullName": "Alice", "source": url })),
                        ),
                        _ => (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": "Profile URL is required" })),
                        ),
                    }
                }),
            )
            .route(
                JOB_ENDPOINT,
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
            )
            .route(
                RESUME_ENDPOINT,
                post(|mut multipart: Multipart| async move {
                    let mut seen = Vec::new();
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        let file = field.file_name().unwrap_or_default().to_string();
                        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
                        seen.push(json!({ "field": name, "file": file, "len": len }));
                    }
                    Json(json!({ "parts": seen }))
                }),
            )
            .route(
                MATCH_ENDPOINT,
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "Overall Compatibility Score": 70,
                        "echo": body,
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_profile_request_sends_url_and_returns_json() {
        let service = HttpAnalysisService::new(spawn_stub().await).unwrap();
        let result = service
            .analyze_profile_url("https://example.com/in/alice")
            .await
            .unwrap();
        assert_eq!(result["fullName"], "Alice");
        assert_eq!(result["source"], "https://example.com/in/alice");
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let service = HttpAnalysisService::new(spawn_stub().await).unwrap();
        let err = service.analyze_profile_url("").await.unwrap_err();
        match err {
            ServiceError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Profile URL is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_falls_back_to_raw_text() {
        let service = HttpAnalysisService::new(spawn_stub().await).unwrap();
        let err = service
            .analyze_job_url("https://example.com/jobs/view/1")
            .await
            .unwrap_err();
        match err {
            ServiceError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resume_is_sent_as_multipart_resume_field() {
        let service = HttpAnalysisService::new(spawn_stub().await).unwrap();
        let doc = ResumeDocument::new("alice.pdf", b"%PDF-1.4".to_vec());
        let result = service.analyze_resume(&doc).await.unwrap();
        assert_eq!(
            result["parts"],
            json!([{ "field": "resume", "file": "alice.pdf", "len": 8 }])
        );
    }

    #[tokio::test]
    async fn test_match_payload_wraps_both_analyses() {
        let service = HttpAnalysisService::new(spawn_stub().await).unwrap();
        let profile = json!({ "fullName": "Alice" });
        let job = json!({ "jobTitle": "Engineer" });
        let result = service.match_profiles(&profile, &job).await.unwrap();
        assert_eq!(result["echo"]["profile_data"], profile);
        assert_eq!(result["echo"]["job_data"], job);
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let service = HttpAnalysisService::new("http://127.0.0.1:9").unwrap();
        let err = service.analyze_job_url("https://x").await.unwrap_err();
        assert!(matches!(err, ServiceError::Http(_)));
    }
}
