//! UploadCoordinator — one options → convert → send → classify pass.
//!
//! Each step awaits the previous one and has its own error variant. Only
//! collaborator failures and transport errors are returned as `Err`; whatever
//! the service itself answered is an `UploadOutcome`, logged once and
//! returned as `Ok`.

use super::classifier::UploadOutcome;
use super::options::{SubmissionOptions, FILEPATH_SENTINEL};
use super::service::CoverageService;
use crate::config::ReporterConfig;
use crate::error::UploadError;
use crate::trace::MergedTrace;

/// Drives a single upload attempt against a `CoverageService`.
pub struct UploadCoordinator<'a, S: CoverageService> {
    service: &'a S,
}

impl<'a, S: CoverageService> UploadCoordinator<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Upload a merged trace. Attempted once, never retried.
    pub async fn submit(
        &self,
        trace: &MergedTrace,
        config: &ReporterConfig,
    ) -> Result<UploadOutcome, UploadError> {
        let options = self.prepare_options(config).await?;
        tracing::debug!(
            "[Coveralls] Options ready (service: {})",
            options.service_name.as_deref().unwrap_or("none")
        );

        let payload = self
            .service
            .convert_trace(trace, &options)
            .await
            .map_err(UploadError::Convert)?;

        tracing::info!("[Coveralls] uploading...");
        let sent = self.service.send(payload).await;

        let outcome = UploadOutcome::classify(sent);
        outcome.log();

        match outcome {
            UploadOutcome::TransportError(error) => Err(UploadError::Transport(error)),
            other => Ok(other),
        }
    }

    async fn prepare_options(&self, config: &ReporterConfig) -> Result<SubmissionOptions, UploadError> {
        let mut options = self
            .service
            .base_options()
            .await
            .map_err(UploadError::Options)?;

        options.filepath = Some(FILEPATH_SENTINEL.to_string());
        if let Some(token) = &config.repository_token {
            options.repo_token = Some(token.clone());
        }

        Ok(options)
    }
}
