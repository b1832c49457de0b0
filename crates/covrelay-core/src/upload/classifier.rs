//! Upload outcome classification.
//!
//! Coveralls answers HTTP 200 with an HTML maintenance page during its own
//! outages, so a 2xx status alone is not treated as delivery: the body must
//! also parse as JSON.

use std::fmt;

use serde_json::Value;

use super::service::SendResponse;

/// A response body, parsed once.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteBody {
    /// JSON object carrying a `message` (and usually the job `url`).
    StructuredSuccess { message: String, url: Option<String> },
    /// Any other JSON value.
    StructuredOther(Value),
    /// Not JSON at all.
    Unparseable(String),
}

impl RemoteBody {
    pub fn parse(body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return RemoteBody::Unparseable(body.to_string()),
        };

        match value.get("message").and_then(Value::as_str) {
            Some(message) => RemoteBody::StructuredSuccess {
                message: message.to_string(),
                url: value.get("url").and_then(Value::as_str).map(str::to_string),
            },
            None => RemoteBody::StructuredOther(value),
        }
    }

    pub fn is_structured(&self) -> bool {
        !matches!(self, RemoteBody::Unparseable(_))
    }
}

/// Result of one upload attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// 2xx with a JSON body.
    Delivered { status: u16, confirmation: String },
    /// 2xx whose body is not JSON; the service is most likely down.
    DeliveredUnparsed { status: u16, body: String },
    /// Non-2xx status.
    RemoteFailure { status: u16, body: String },
    /// The payload never reached the service.
    TransportError(String),
}

impl UploadOutcome {
    /// Classify the transport result of `CoverageService::send`.
    pub fn classify(result: Result<SendResponse, String>) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(error) => return UploadOutcome::TransportError(error),
        };

        let status = response.status.unwrap_or(0);
        let success = (200..300).contains(&status);

        match (RemoteBody::parse(&response.body), success) {
            (RemoteBody::Unparseable(body), true) => {
                UploadOutcome::DeliveredUnparsed { status, body }
            }
            (RemoteBody::StructuredSuccess { message, url }, true) => {
                let confirmation = match url {
                    Some(url) => format!("{} ({})", message, url),
                    None => message,
                };
                UploadOutcome::Delivered { status, confirmation }
            }
            (RemoteBody::StructuredOther(_), true) => UploadOutcome::Delivered {
                status,
                confirmation: "OK".to_string(),
            },
            (_, false) => UploadOutcome::RemoteFailure {
                status,
                body: response.body,
            },
        }
    }

    /// Whether the outcome should be reported as a problem.
    pub fn is_problem(&self) -> bool {
        !matches!(self, UploadOutcome::Delivered { .. })
    }

    /// Emit the single log line describing this outcome.
    pub fn log(&self) {
        if self.is_problem() {
            tracing::error!("[Coveralls] {}", self);
        } else {
            tracing::info!("[Coveralls] {}", self);
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Delivered { status, confirmation } => {
                write!(f, "{} --- {}", status, confirmation)
            }
            UploadOutcome::DeliveredUnparsed { status, body } => {
                write!(f, "{} --- unexpected non-JSON response: {}", status, body)
            }
            UploadOutcome::RemoteFailure { status, body } => {
                write!(f, "{} --- upload rejected: {}", status, body)
            }
            UploadOutcome::TransportError(error) => write!(f, "upload failed: {}", error),
        }
    }
}
