//! Core error types for the covrelay reporter.
//!
//! `ReporterError` is what the host sees, either thrown from the reporter
//! constructor (configuration problems) or handed to the exit-hook completion
//! callback (discovery and upload problems). Each stage keeps its own error
//! enum so callers can tell them apart.

use std::path::PathBuf;

/// Problems detected while building the reporter from host configuration.
///
/// These abort construction; no file I/O has happened when they are raised.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("coverage reporter should precede coveralls")]
    ReporterOrder,

    #[error("no coverage output directory configured (set coverageReporter.dir or a {{type, dir}} sub-reporter)")]
    NoCoverageDir,

    #[error("Failed to read host config '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse host config '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Trace discovery failures.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("No {file_name} found under {} after {attempts} attempts", root.display())]
    NotFound {
        root: PathBuf,
        file_name: String,
        attempts: u32,
    },

    #[error("IO error reading {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Trace scan failed: {0}")]
    Scan(String),
}

/// Failures of the options → convert → send pipeline.
///
/// Remote-side application failures are not errors; they are an
/// [`UploadOutcome`](crate::upload::UploadOutcome) that is logged only.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to build submission options: {0}")]
    Options(String),

    #[error("Failed to convert trace to payload: {0}")]
    Convert(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Umbrella error surfaced to the host.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}
