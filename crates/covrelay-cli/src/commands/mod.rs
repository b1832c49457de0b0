//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and drives the
//! covrelay-core reporter the way a test host would.

pub mod locate;
pub mod publish;
pub mod resolve;

use covrelay_core::HostConfig;

/// Load the host configuration file (JSON or YAML).
pub fn load_host_config(path: &str) -> Result<HostConfig, String> {
    HostConfig::from_file(path).map_err(|e| e.to_string())
}

/// Write `value` to stdout as indented JSON.
pub fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to format output: {}", e))?;
    println!("{}", text);
    Ok(())
}
