//! covrelay core — publish lcov coverage to Coveralls from a test host.
//!
//! This crate holds everything the reporter does and has no dependency on a
//! particular test host or CLI, making it suitable for use in:
//!
//! - the `covrelay` CLI (via `covrelay-cli`)
//! - test hosts that embed the reporter directly
//!
//! # Flow
//!
//! 1. `CoverallsReporter::new` resolves a `ReporterConfig` from the host config
//! 2. `on_exit` runs `TraceLocator` (poll + merge `lcov.info` files)
//! 3. `UploadCoordinator` builds options, converts, sends and classifies

pub mod config;
pub mod coveralls;
pub mod error;
pub mod reporter;
pub mod trace;
pub mod upload;

// Convenience re-exports
pub use config::{HostConfig, ReporterConfig};
pub use coveralls::CoverallsClient;
pub use error::{ConfigError, LocateError, ReporterError, UploadError};
pub use reporter::{CoverallsReporter, ExitReport};
pub use trace::{MergedTrace, TraceLocator};
pub use upload::{CoverageService, UploadOutcome};
