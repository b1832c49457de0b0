//! LCOV trace discovery, merging and parsing.
//!
//! - `TraceLocator` — polls a search root for `lcov.info` files (bounded retries)
//! - `MergedTrace` — the concatenation of every discovered trace file
//! - `parse_lcov` — per-source-file line and branch hits, used when building
//!   the Coveralls payload

mod lcov;
mod locator;

pub use lcov::*;
pub use locator::*;
