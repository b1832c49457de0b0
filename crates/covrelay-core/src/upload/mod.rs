//! Upload pipeline: base options → convert → send → classify.
//!
//! - `CoverageService` — the remote collaborator seam (options, convert, send)
//! - `SubmissionOptions` — per-attempt submission metadata
//! - `UploadOutcome` / `RemoteBody` — classification of what the remote said
//! - `UploadCoordinator` — drives one upload attempt

mod classifier;
mod coordinator;
mod options;
mod service;

pub use classifier::*;
pub use coordinator::*;
pub use options::*;
pub use service::*;
