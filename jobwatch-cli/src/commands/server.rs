//! Server command handlers

use anyhow::Result;
use clap::Subcommand;

use super::{parse_action, report_outcome};
use crate::config::Config;

/// Server subcommands
#[derive(Subcommand)]
pub enum ServerCommands {
    /// Suspend, resume or kill every job on the server
    ModifyAll {
        /// One of suspend, resume, kill
        action: String,
    },
}

/// Handle server commands
pub async fn handle_server_command(command: ServerCommands, config: &Config) -> Result<()> {
    match command {
        ServerCommands::ModifyAll { action } => {
            let action = parse_action(&action)?;
            config.detached_poller()?.modify_all_jobs(action).await?;
            report_outcome(true, &format!("all jobs {}", action.past()))
        }
    }
}
