//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod client;
mod job;
mod server;

pub use client::ClientCommands;
pub use job::JobCommands;
pub use server::ServerCommands;

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use jobwatch_core::domain::action::Action;
use jobwatch_poller::PollError;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Wait on and control a single job
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Find and control the jobs of a client
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Server-wide operations
    Server {
        #[command(subcommand)]
        command: ServerCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Client { command } => client::handle_client_command(command, config).await,
        Commands::Server { command } => server::handle_server_command(command, config).await,
    }
}

/// Parses an action name, rejecting anything but suspend, resume and kill
pub(crate) fn parse_action(action: &str) -> Result<Action> {
    Ok(Action::from_str(action).map_err(PollError::from)?)
}

pub(crate) fn seconds(secs: Option<u64>) -> Option<Duration> {
    secs.map(Duration::from_secs)
}

/// Turns an unmet soft wait into a failing exit
pub(crate) fn report_outcome(reached: bool, what: &str) -> Result<()> {
    if reached {
        println!("{} {}", "✓".green(), what);
        Ok(())
    } else {
        println!("{} {}", "✗".red(), what);
        anyhow::bail!("condition not met: {}", what)
    }
}
