use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use matcher::config::Config;
use matcher::display::{DisplaySurface, TerminalDisplay};
use matcher::service::{AnalysisService, HttpAnalysisService, ResumeDocument};
use matcher::{ProfileSource, Workflow};

/// Analyze a profile and a job posting, then score the match.
#[derive(Debug, Parser)]
#[command(name = "matcher", version)]
#[command(group(ArgGroup::new("profile").required(true).args(["profile_url", "resume"])))]
struct Cli {
    /// Public profile URL to analyze
    #[arg(long)]
    profile_url: Option<String>,

    /// Resume file (PDF or DOCX) to upload instead of a profile URL
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Job posting URL to analyze
    #[arg(long)]
    job_url: String,

    /// Print each outcome as JSON
    #[arg(long)]
    json: bool,

    /// Base URL of the analysis service
    #[arg(long, env = "MATCHER_SERVICE_URL")]
    service_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // .env is loaded first so clap sees MATCHER_SERVICE_URL from it too
    let config = Config::from_env()?;
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the rendered documents
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let service_url = cli.service_url.unwrap_or_else(|| config.service_url.clone());
    info!("Starting matcher v{} against {service_url}", env!("CARGO_PKG_VERSION"));

    let service: Arc<dyn AnalysisService> = Arc::new(HttpAnalysisService::new(&service_url)?);
    let color = !cli.json && std::io::stdout().is_terminal();
    let display: Arc<dyn DisplaySurface> = Arc::new(TerminalDisplay::new(color, cli.json));
    let workflow = Workflow::new(service, display, config.progress()?);

    let profile = profile_source(cli.profile_url, cli.resume).await?;

    let (profile, job) = tokio::join!(
        workflow.analyze_profile(profile),
        workflow.analyze_job(&cli.job_url)
    );
    if !(profile.is_ok() && job.is_ok()) {
        return Ok(ExitCode::FAILURE);
    }

    if !workflow.match_profiles().await.is_ok() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// `--profile-url` wins; otherwise the resume at `--resume` is read from disk.
async fn profile_source(profile_url: Option<String>, resume: Option<PathBuf>) -> Result<ProfileSource> {
    if let Some(url) = profile_url {
        return Ok(ProfileSource::Url(url));
    }
    let resume = match resume {
        Some(path) => Some(ResumeDocument::from_path(&path).await?),
        None => None,
    };
    Ok(ProfileSource::Document(resume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_requires_exactly_one_profile_input() {
        assert!(Cli::try_parse_from(["matcher", "--job-url", "j"]).is_err());
        assert!(Cli::try_parse_from([
            "matcher", "--job-url", "j", "--profile-url", "p", "--resume", "cv.pdf"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["matcher", "--job-url", "j", "--resume", "cv.pdf"]).unwrap();
        assert_eq!(cli.resume, Some(PathBuf::from("cv.pdf")));
        assert!(cli.profile_url.is_none());
    }

    #[tokio::test]
    async fn test_profile_url_becomes_url_source() {
        let source = profile_source(Some("https://example.com/in/alice".into()), None)
            .await
            .unwrap();
        assert!(matches!(source, ProfileSource::Url(ref u) if u == "https://example.com/in/alice"));
    }

    #[tokio::test]
    async fn test_resume_path_is_read_into_document_source() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"resume bytes").unwrap();

        let source = profile_source(None, Some(file.path().to_path_buf())).await.unwrap();
        match source {
            ProfileSource::Document(Some(doc)) => {
                assert_eq!(doc.bytes.as_ref(), b"resume bytes");
                assert!(doc.content_type.contains("wordprocessingml"));
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }
}
