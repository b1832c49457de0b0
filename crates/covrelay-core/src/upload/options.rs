use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `filepath` value that tells the service not to rewrite source paths.
pub const FILEPATH_SENTINEL: &str = ".";

/// Submission metadata for one upload attempt. Built fresh each time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOptions {
    /// Root that source file names are made relative to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_job_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_pull_request: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_at: Option<DateTime<Utc>>,

    /// Part of a parallel build; the service waits for a finish webhook.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parallel: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitInfo>,
}

/// Git metadata attached to a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    pub head: GitHead,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub remotes: Vec<GitRemote>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHead {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRemote {
    pub name: String,
    pub url: String,
}
