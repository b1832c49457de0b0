//! TraceLocator — find and merge `lcov.info` files under a search root.
//!
//! Search pattern: `<search_root>/**/lcov.info`
//!
//! The coverage reporter that produces the files may still be flushing when
//! the exit hook runs, so an empty scan is retried a fixed number of times
//! with a fixed delay before giving up. A file caught mid-write is read as-is.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LocateError;

/// Name of the trace file written by lcov-capable coverage reporters.
pub const TRACE_FILE_NAME: &str = "lcov.info";

/// Retries after the initial scan (6 attempts total).
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Delay between two scans.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Discovery tuning.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Exact file name to match at any depth.
    pub file_name: String,
    /// Rescans after the first empty one.
    pub max_retries: u32,
    /// Suspension between scans.
    pub retry_delay: Duration,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            file_name: TRACE_FILE_NAME.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// A discovered trace file and its raw contents.
#[derive(Debug, Clone)]
pub struct TraceFile {
    pub path: PathBuf,
    pub contents: String,
}

/// All trace files of one run, concatenated in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTrace {
    text: String,
    sources: Vec<PathBuf>,
}

impl MergedTrace {
    /// Merge trace files. Returns `None` for an empty list.
    ///
    /// Contents are kept byte for byte. A newline is inserted between two
    /// files only when the earlier one does not end with one, so records of
    /// adjacent files never share a line.
    pub fn from_files(files: Vec<TraceFile>) -> Option<Self> {
        if files.is_empty() {
            return None;
        }

        let mut text = String::new();
        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&file.contents);
            sources.push(file.path);
        }

        Some(Self { text, sources })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Paths the trace was merged from, in discovery order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

impl fmt::Display for MergedTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Polls a search root for trace files and merges them.
#[derive(Debug, Clone)]
pub struct TraceLocator {
    search_root: PathBuf,
    config: LocatorConfig,
}

impl TraceLocator {
    /// Locator with the default file name and retry policy.
    pub fn new(search_root: impl AsRef<Path>) -> Self {
        Self::with_config(search_root, LocatorConfig::default())
    }

    pub fn with_config(search_root: impl AsRef<Path>, config: LocatorConfig) -> Self {
        Self {
            search_root: search_root.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    /// Wait for at least one trace file and return the merged trace.
    ///
    /// A search root that does not exist is treated like an empty one.
    pub async fn locate(&self) -> Result<MergedTrace, LocateError> {
        let max_retries = self.config.max_retries;

        for attempt in 0..=max_retries {
            let paths = self.scan().await?;

            if !paths.is_empty() {
                tracing::debug!(
                    "[TraceLocator] Found {} {} file(s) on attempt {}",
                    paths.len(),
                    self.config.file_name,
                    attempt + 1
                );
                let files = read_trace_files(paths).await?;
                if let Some(merged) = MergedTrace::from_files(files) {
                    return Ok(merged);
                }
            }

            if attempt < max_retries {
                tracing::debug!(
                    "[TraceLocator] No {} under {} yet, retrying in {:?}",
                    self.config.file_name,
                    self.search_root.display(),
                    self.config.retry_delay
                );
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        Err(LocateError::NotFound {
            root: self.search_root.clone(),
            file_name: self.config.file_name.clone(),
            attempts: max_retries + 1,
        })
    }

    /// One discovery pass. Runs the directory walk on the blocking pool.
    pub async fn scan(&self) -> Result<Vec<PathBuf>, LocateError> {
        let root = self.search_root.to_string_lossy();
        let pattern = format!(
            "{}/**/{}",
            glob::Pattern::escape(root.trim_end_matches('/')),
            glob::Pattern::escape(&self.config.file_name)
        );

        tokio::task::spawn_blocking(move || discover(&pattern))
            .await
            .map_err(|e| LocateError::Scan(format!("Discovery task failed: {}", e)))?
    }
}

fn discover(pattern: &str) -> Result<Vec<PathBuf>, LocateError> {
    let entries = glob::glob(pattern)
        .map_err(|e| LocateError::Scan(format!("Invalid pattern '{}': {}", pattern, e)))?;

    // Unreadable directories are skipped rather than failing the pass
    Ok(entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect())
}

async fn read_trace_files(paths: Vec<PathBuf>) -> Result<Vec<TraceFile>, LocateError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(&path).await.map_err(|e| LocateError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        files.push(TraceFile {
            contents: String::from_utf8_lossy(&bytes).into_owned(),
            path,
        });
    }
    Ok(files)
}
