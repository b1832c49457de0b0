//! Host configuration model and reporter configuration resolution.
//!
//! - `HostConfig` — the subset of the test host's configuration this reporter
//!   reads (`reporters`, `basePath`, `autoWatch`, coverage reporter settings).
//! - `ReporterConfig` — the immutable per-run configuration resolved from it.

mod host;
mod resolver;

pub use host::*;
pub use resolver::*;
