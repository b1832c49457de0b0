//! `covrelay locate` — print the merged lcov trace found under a directory.

use covrelay_core::trace::{LocatorConfig, TraceLocator};

/// Poll `dir` for trace files (default retry policy) and write the merged
/// trace to stdout.
pub async fn run(dir: &str, file_name: &str) -> Result<(), String> {
    let locator = TraceLocator::with_config(
        dir,
        LocatorConfig {
            file_name: file_name.to_string(),
            ..LocatorConfig::default()
        },
    );

    let trace = locator.locate().await.map_err(|e| e.to_string())?;
    for source in trace.sources() {
        tracing::info!("merged {}", source.display());
    }

    print!("{}", trace);
    Ok(())
}
