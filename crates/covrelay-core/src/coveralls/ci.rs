//! CI service detection from environment variables.
//!
//! Known services: Travis CI, GitHub Actions, CircleCI, Jenkins, GitLab CI.
//! `COVERALLS_*` variables override whatever was detected.

use std::collections::HashMap;

/// CI facts relevant to a Coveralls job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiContext {
    pub service_name: Option<String>,
    pub service_job_id: Option<String>,
    pub service_number: Option<String>,
    pub service_pull_request: Option<String>,
    pub git_commit: Option<String>,
    pub git_branch: Option<String>,
}

/// Detect the CI service from an environment snapshot.
pub fn detect_ci(env: &HashMap<String, String>) -> CiContext {
    let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    let mut ctx = if env.contains_key("TRAVIS") {
        CiContext {
            service_name: Some("travis-ci".to_string()),
            service_job_id: get("TRAVIS_JOB_ID"),
            service_number: get("TRAVIS_BUILD_NUMBER"),
            service_pull_request: get("TRAVIS_PULL_REQUEST").filter(|pr| pr != "false"),
            git_commit: get("TRAVIS_COMMIT"),
            git_branch: get("TRAVIS_BRANCH"),
        }
    } else if env.contains_key("GITHUB_ACTIONS") {
        let git_ref = get("GITHUB_REF").unwrap_or_default();
        CiContext {
            service_name: Some("github".to_string()),
            service_job_id: get("GITHUB_RUN_ID"),
            service_number: get("GITHUB_RUN_NUMBER"),
            service_pull_request: pull_request_from_ref(&git_ref),
            git_commit: get("GITHUB_SHA"),
            git_branch: get("GITHUB_HEAD_REF").or_else(|| {
                git_ref.strip_prefix("refs/heads/").map(str::to_string)
            }),
        }
    } else if env.contains_key("CIRCLECI") {
        CiContext {
            service_name: Some("circleci".to_string()),
            service_job_id: get("CIRCLE_BUILD_NUM"),
            service_number: get("CIRCLE_WORKFLOW_ID"),
            service_pull_request: get("CI_PULL_REQUEST")
                .and_then(|url| url.rsplit('/').next().map(str::to_string)),
            git_commit: get("CIRCLE_SHA1"),
            git_branch: get("CIRCLE_BRANCH"),
        }
    } else if env.contains_key("JENKINS_URL") {
        CiContext {
            service_name: Some("jenkins".to_string()),
            service_job_id: get("BUILD_ID"),
            service_number: get("BUILD_NUMBER"),
            service_pull_request: get("ghprbPullId").or_else(|| get("CHANGE_ID")),
            git_commit: get("GIT_COMMIT"),
            git_branch: get("GIT_BRANCH").or_else(|| get("BRANCH_NAME")),
        }
    } else if env.contains_key("GITLAB_CI") {
        CiContext {
            service_name: Some("gitlab-ci".to_string()),
            service_job_id: get("CI_JOB_ID"),
            service_number: get("CI_PIPELINE_IID"),
            service_pull_request: get("CI_MERGE_REQUEST_IID"),
            git_commit: get("CI_COMMIT_SHA"),
            git_branch: get("CI_COMMIT_REF_NAME"),
        }
    } else {
        CiContext::default()
    };

    if let Some(name) = get("COVERALLS_SERVICE_NAME") {
        ctx.service_name = Some(name);
    }
    if let Some(job_id) = get("COVERALLS_SERVICE_JOB_ID") {
        ctx.service_job_id = Some(job_id);
    }
    if let Some(commit) = get("COVERALLS_GIT_COMMIT") {
        ctx.git_commit = Some(commit);
    }
    if let Some(branch) = get("COVERALLS_GIT_BRANCH") {
        ctx.git_branch = Some(branch);
    }

    ctx
}

/// `refs/pull/<n>/merge` → `<n>`.
fn pull_request_from_ref(git_ref: &str) -> Option<String> {
    git_ref
        .strip_prefix("refs/pull/")
        .and_then(|rest| rest.split('/').next())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
