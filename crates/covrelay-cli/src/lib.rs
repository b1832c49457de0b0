//! covrelay CLI library — command implementations shared by the `covrelay`
//! binary and its integration tests.

pub mod commands;
