//! `covrelay publish` — run the reporter's exit hook against Coveralls.

use covrelay_core::{CoverallsClient, CoverallsReporter};

use super::load_host_config;

/// Locate, merge and upload coverage as configured by the host config file.
pub async fn run(config_path: &str, endpoint: Option<&str>) -> Result<(), String> {
    let host = load_host_config(config_path)?;

    let mut client = CoverallsClient::new();
    if let Some(endpoint) = endpoint {
        client = client.with_endpoint(endpoint);
    }
    tracing::debug!("Coveralls endpoint: {}", client.jobs_url());

    let reporter = CoverallsReporter::new(&host, client).map_err(|e| e.to_string())?;

    let mut completion = None;
    reporter.on_exit(|result| completion = Some(result)).await;

    match completion {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("exit hook finished without completing".to_string()),
    }
}
