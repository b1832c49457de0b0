//! CoverallsReporter — the host-facing reporter plugin.
//!
//! The host constructs the reporter once per test run and calls `on_exit`
//! once after the run. Construction validates the configuration synchronously;
//! everything that touches the filesystem or network happens in the exit hook.

use std::path::{Path, PathBuf};

use tracing::Instrument;

use crate::config::{HostConfig, ReporterConfig, REPORTER_ID};
use crate::error::{ConfigError, ReporterError};
use crate::trace::{LocatorConfig, TraceLocator};
use crate::upload::{CoverageService, UploadCoordinator, UploadOutcome};

/// Key the reporter is registered under in the host's plugin table.
pub const PLUGIN_KEY: &str = "reporter:coveralls";

/// What an exit sequence did.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitReport {
    /// Auto-watch mode; nothing was located or uploaded.
    Suppressed,
    /// One upload attempt was made.
    Uploaded {
        /// Trace files that were merged, in discovery order.
        sources: Vec<PathBuf>,
        outcome: UploadOutcome,
    },
}

pub struct CoverallsReporter<S: CoverageService> {
    config: ReporterConfig,
    locator_config: LocatorConfig,
    service: S,
}

impl<S: CoverageService> CoverallsReporter<S> {
    /// Build the reporter from the host configuration, resolving relative
    /// paths against the process working directory.
    pub fn new(root_config: &HostConfig, service: S) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_cwd(root_config, &cwd, service)
    }

    pub fn with_cwd(root_config: &HostConfig, cwd: &Path, service: S) -> Result<Self, ConfigError> {
        let config = ReporterConfig::resolve(root_config, cwd)?;

        if config.suppress_upload {
            tracing::info!("[Coveralls] disabled due to --auto-watch");
        } else {
            tracing::debug!(
                "[Coveralls] use lcov.info in {}",
                config.search_root.display()
            );
        }

        Ok(Self::from_config(config, service))
    }

    /// Wrap an already resolved configuration.
    pub fn from_config(config: ReporterConfig, service: S) -> Self {
        Self {
            config,
            locator_config: LocatorConfig::default(),
            service,
        }
    }

    /// Override the discovery policy (file name, retries, delay).
    pub fn with_locator_config(mut self, locator_config: LocatorConfig) -> Self {
        self.locator_config = locator_config;
        self
    }

    pub fn id(&self) -> &'static str {
        REPORTER_ID
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Locate, merge and upload the run's coverage.
    ///
    /// Remote-side failures are reported in the returned `ExitReport`, not
    /// as errors.
    pub async fn run_exit_sequence(&self) -> Result<ExitReport, ReporterError> {
        let span = tracing::info_span!("coveralls.io", search_root = %self.config.search_root.display());
        self.exit_sequence().instrument(span).await
    }

    async fn exit_sequence(&self) -> Result<ExitReport, ReporterError> {
        if self.config.suppress_upload {
            tracing::debug!("[Coveralls] upload skipped (auto-watch)");
            return Ok(ExitReport::Suppressed);
        }

        let locator = TraceLocator::with_config(&self.config.search_root, self.locator_config.clone());
        let trace = locator.locate().await.map_err(|e| {
            tracing::error!("[Coveralls] {}", e);
            e
        })?;

        let outcome = UploadCoordinator::new(&self.service)
            .submit(&trace, &self.config)
            .await?;

        Ok(ExitReport::Uploaded {
            sources: trace.sources().to_vec(),
            outcome,
        })
    }

    /// Host exit hook. `done` is invoked exactly once, after the sequence
    /// finishes, with the error if there was one.
    pub async fn on_exit<F>(&self, done: F)
    where
        F: FnOnce(Result<(), ReporterError>),
    {
        let result = self.run_exit_sequence().await.map(|_| ());
        done(result);
    }
}
