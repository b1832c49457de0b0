//! Resolve the per-run `ReporterConfig` from the host configuration.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use super::host::HostConfig;
use crate::error::ConfigError;

/// Identifier this reporter is registered under in the host.
pub const REPORTER_ID: &str = "coveralls";

/// Reporter identifiers that write lcov traces before the exit hook runs.
pub const COVERAGE_REPORTER_IDS: &[&str] = &["coverage", "coverage-istanbul"];

/// Directory name coverage reporters write to when no `dir` is given.
const DEFAULT_COVERAGE_DIR: &str = "coverage";

/// Immutable configuration for one test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterConfig {
    /// Absolute directory scanned for trace files.
    pub search_root: PathBuf,
    /// Credential forwarded to Coveralls as `repo_token`.
    #[serde(skip_serializing)]
    pub repository_token: Option<String>,
    /// Set in auto-watch mode; the exit hook does nothing.
    pub suppress_upload: bool,
}

impl ReporterConfig {
    /// Build the reporter configuration.
    ///
    /// `cwd` anchors a relative (or missing) `basePath`. Fails before touching
    /// the filesystem when the reporter order is wrong or no coverage output
    /// directory can be determined.
    pub fn resolve(host: &HostConfig, cwd: &Path) -> Result<Self, ConfigError> {
        validate_reporter_order(&host.reporters)?;

        let base = normalize(&cwd.join(host.base_path.as_deref().unwrap_or("")));
        let search_root = resolve_search_root(host, &base, cwd)?;

        Ok(Self {
            search_root,
            repository_token: host.repo_token().map(str::to_string),
            suppress_upload: host.auto_watch,
        })
    }
}

/// A coverage-producing reporter must be listed, and listed before `coveralls`.
pub fn validate_reporter_order(reporters: &[String]) -> Result<(), ConfigError> {
    let coverage_index = reporters
        .iter()
        .position(|r| COVERAGE_REPORTER_IDS.contains(&r.as_str()));
    let own_index = reporters.iter().position(|r| r == REPORTER_ID);

    match (coverage_index, own_index) {
        (Some(coverage), Some(own)) if coverage < own => Ok(()),
        _ => Err(ConfigError::ReporterOrder),
    }
}

/// Report types that leave an `lcov.info` behind.
fn is_lcov_capable(report_type: &str) -> bool {
    matches!(report_type, "html" | "lcov" | "lcovonly")
}

/// `{type, dir}` descriptors and istanbul settings are relative to `base`;
/// the section-level `coverageReporter.dir` and the default are relative to
/// `cwd`.
fn resolve_search_root(host: &HostConfig, base: &Path, cwd: &Path) -> Result<PathBuf, ConfigError> {
    // First lcov-capable descriptor with an explicit dir
    let from_descriptor = host.coverage_sub_reporters().into_iter().find_map(|sub| {
        match (sub.report_type.as_deref(), sub.dir) {
            (Some(kind), Some(dir)) if is_lcov_capable(kind) => Some(dir),
            _ => None,
        }
    });
    if let Some(dir) = from_descriptor {
        return Ok(normalize(&base.join(dir)));
    }

    if let Some(istanbul) = &host.coverage_istanbul_reporter {
        // istanbul emits html by default
        let writes_lcov = istanbul.reports.is_empty()
            || istanbul.reports.iter().any(|r| is_lcov_capable(r));
        if writes_lcov {
            let dir = istanbul.dir.as_deref().unwrap_or(DEFAULT_COVERAGE_DIR);
            return Ok(normalize(&base.join(dir)));
        }
    }

    match &host.coverage_reporter {
        Some(settings) => {
            let dir = settings.dir.as_deref().unwrap_or(DEFAULT_COVERAGE_DIR);
            Ok(normalize(&cwd.join(dir)))
        }
        None => Err(ConfigError::NoCoverageDir),
    }
}

/// Lexically collapse `.` and `..` segments.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
