//! Coveralls HTTP client — the production `CoverageService`.
//!
//! POST {endpoint}/api/v1/jobs
//! Body (form-encoded):
//!   json={job}

mod ci;
mod git;
mod job;

pub use ci::{detect_ci, CiContext};
pub use git::get_git_info;
pub use job::{build_job, CoverallsJob, SourceFile};

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::trace::MergedTrace;
use crate::upload::{CoverageService, SendResponse, SubmissionOptions};

pub const DEFAULT_ENDPOINT: &str = "https://coveralls.io";

const JOBS_PATH: &str = "/api/v1/jobs";

/// Talks to the Coveralls jobs API.
#[derive(Clone)]
pub struct CoverallsClient {
    client: reqwest::Client,
    endpoint: String,
    cwd: PathBuf,
    /// Environment snapshot used for CI detection.
    env: HashMap<String, String>,
}

impl CoverallsClient {
    /// Client for the current process environment and working directory.
    ///
    /// `COVERALLS_ENDPOINT` overrides the API host.
    pub fn new() -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        let endpoint = env
            .get("COVERALLS_ENDPOINT")
            .filter(|e| !e.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint,
            cwd,
            env,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Replace the environment snapshot.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn jobs_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), JOBS_PATH)
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

impl Default for CoverallsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverageService for CoverallsClient {
    type Payload = CoverallsJob;

    async fn base_options(&self) -> Result<SubmissionOptions, String> {
        let ci = detect_ci(&self.env);

        let cwd = self.cwd.clone();
        let commit = ci.git_commit.clone();
        let branch = ci.git_branch.clone();
        let git = tokio::task::spawn_blocking(move || {
            get_git_info(&cwd, commit.as_deref(), branch.as_deref())
        })
        .await
        .map_err(|e| format!("Failed to read git metadata: {}", e))?;

        let run_at = self
            .env_var("COVERALLS_RUN_AT")
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let parallel = self
            .env_var("COVERALLS_PARALLEL")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(false);

        Ok(SubmissionOptions {
            filepath: None,
            repo_token: self.env_var("COVERALLS_REPO_TOKEN"),
            service_name: ci.service_name,
            service_job_id: ci.service_job_id,
            service_number: ci.service_number,
            service_pull_request: ci.service_pull_request,
            run_at: Some(run_at),
            parallel,
            flag_name: self.env_var("COVERALLS_FLAG_NAME"),
            git,
        })
    }

    async fn convert_trace(
        &self,
        trace: &MergedTrace,
        options: &SubmissionOptions,
    ) -> Result<CoverallsJob, String> {
        let text = trace.as_str().to_string();
        let options = options.clone();
        let cwd = self.cwd.clone();

        tokio::task::spawn_blocking(move || build_job(&text, &options, &cwd))
            .await
            .map_err(|e| format!("Failed to build Coveralls job: {}", e))
    }

    async fn send(&self, job: CoverallsJob) -> Result<SendResponse, String> {
        let json = serde_json::to_string(&job)
            .map_err(|e| format!("Failed to serialize Coveralls job: {}", e))?;

        let url = self.jobs_url();
        tracing::debug!(
            "[Coveralls] POST {} ({} source files)",
            url,
            job.source_files.len()
        );

        let response = self
            .client
            .post(&url)
            .form(&[("json", json)])
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        Ok(SendResponse::new(status, body))
    }
}
