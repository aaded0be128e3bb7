//! Jobwatch CLI
//!
//! Command-line interface for waiting on and controlling jobs of a backup server.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(about = "Wait on and control backup server jobs", long_about = None)]
struct Cli {
    /// Job-control API URL
    #[arg(long, env = "JOBWATCH_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "JOBWATCH_REQUEST_TIMEOUT", default_value_t = 60)]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobwatch=info,jobwatch_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.server_url, cli.request_timeout)?;

    handle_command(cli.command, &config).await
}
