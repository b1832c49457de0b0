//! `covrelay resolve` — show the reporter configuration for a host config.

use std::path::PathBuf;

use covrelay_core::ReporterConfig;

use super::{load_host_config, print_json};

/// Resolve and print the `ReporterConfig` (the repo token is never printed).
pub async fn run(config_path: &str) -> Result<(), String> {
    let host = load_host_config(config_path)?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let config = ReporterConfig::resolve(&host, &cwd).map_err(|e| e.to_string())?;
    let mut value = serde_json::to_value(&config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    value["hasRepositoryToken"] = serde_json::json!(config.repository_token.is_some());

    print_json(&value)
}
