use std::future::Future;

use super::options::SubmissionOptions;
use crate::trace::MergedTrace;

/// What the transport handed back for a sent payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    /// HTTP status; `None` when the transport reported success without a
    /// response object.
    pub status: Option<u16>,
    pub body: String,
}

impl SendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }
}

/// The remote coverage service.
///
/// Each call completes exactly once with either a value or an error message.
/// `CoverallsClient` is the HTTP implementation; tests provide fakes.
pub trait CoverageService {
    /// Submission payload produced by `convert_trace`.
    type Payload: Send;

    /// Default submission options (CI service, git metadata, env token).
    fn base_options(&self) -> impl Future<Output = Result<SubmissionOptions, String>> + Send;

    /// Convert a merged lcov trace into the service's payload.
    fn convert_trace(
        &self,
        trace: &MergedTrace,
        options: &SubmissionOptions,
    ) -> impl Future<Output = Result<Self::Payload, String>> + Send;

    /// Send the payload. `Err` is a transport failure only; any HTTP status
    /// comes back as `Ok`.
    fn send(
        &self,
        payload: Self::Payload,
    ) -> impl Future<Output = Result<SendResponse, String>> + Send;
}
