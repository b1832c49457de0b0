//! covrelay CLI — publish lcov coverage to Coveralls after a test run.
//!
//! Acts as the test host: reads the host configuration, constructs the
//! Coveralls reporter (covrelay-core) and runs its exit hook.

use clap::{Parser, Subcommand};

use covrelay_cli::commands;

/// covrelay — lcov coverage publisher for Coveralls
#[derive(Parser)]
#[command(name = "covrelay", version, about = "covrelay — lcov coverage publisher for Coveralls")]
pub struct Cli {
    /// Path to the host configuration file (JSON or YAML)
    #[arg(long, short = 'c', global = true, env = "COVRELAY_CONFIG", default_value = "covrelay.yaml")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate, merge and upload coverage to Coveralls
    Publish {
        /// Coveralls API host (defaults to https://coveralls.io)
        #[arg(long, env = "COVERALLS_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// Print the merged lcov trace found under a directory
    Locate {
        /// Directory searched recursively
        #[arg(long)]
        dir: String,
        /// Trace file name to match at any depth
        #[arg(long, default_value = "lcov.info")]
        file_name: String,
    },

    /// Print the reporter configuration resolved from the host config
    Resolve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing (logs go to stderr; stdout carries command output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covrelay_core=info,covrelay_cli=info".into()),
        )
        .init();

    let result = match cli.command {
        Some(Commands::Publish { endpoint }) => {
            commands::publish::run(&cli.config, endpoint.as_deref()).await
        }
        Some(Commands::Locate { dir, file_name }) => {
            commands::locate::run(&dir, &file_name).await
        }
        Some(Commands::Resolve) => commands::resolve::run(&cli.config).await,
        None => {
            // No subcommand — show help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
