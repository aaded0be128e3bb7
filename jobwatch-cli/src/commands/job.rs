//! Job command handlers
//!
//! Waits on and mutates a single job.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use jobwatch_client::JobControlClient;
use jobwatch_core::domain::job::{JobId, StateSet};

use super::{parse_action, report_outcome, seconds};
use crate::config::Config;
use crate::output::print_job_details;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Show job details
    Show {
        /// Job ID
        id: String,

        /// Print the raw JSON snapshot
        #[arg(long)]
        json: bool,
    },
    /// Wait for a job to reach one of the given states
    Wait {
        /// Job ID
        id: String,

        /// Expected state (repeatable)
        #[arg(short, long = "state", required = true)]
        states: Vec<String>,

        /// Seconds between polls
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Seconds to wait before giving up
        #[arg(long)]
        time_limit: Option<u64>,

        /// Report a miss instead of failing with details
        #[arg(long)]
        soft: bool,

        /// Report the last polled state on failure instead of re-fetching it
        #[arg(long)]
        no_refetch: bool,
    },
    /// Wait for a job to enter a phase
    Phase {
        /// Job ID
        id: String,

        /// Phase name, case-insensitive
        phase: String,

        /// Number of checks before giving up
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        attempts: Option<u32>,

        /// Seconds between checks
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        frequency: Option<u64>,
    },
    /// Suspend, resume or kill a job
    Modify {
        /// Job ID
        id: String,

        /// One of suspend, resume, kill
        action: String,

        /// Return as soon as the server accepted the request
        #[arg(long)]
        no_wait: bool,

        /// Report a miss instead of failing with details
        #[arg(long)]
        soft: bool,
    },
    /// Wait for a job to report some progress
    Progress {
        /// Job ID
        id: String,

        /// Percentage to wait for
        #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,

        /// Seconds to wait before giving up
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Check that every error of a job matches an expected pattern
    ValidateErrors {
        /// Job ID
        id: String,

        /// Regular expressions, each matched against a whole error line
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Check how a job reacted to its client's activity setting
    Activity {
        /// Job ID
        id: String,

        /// Delay reason expected while activity is disabled; omit when enabled
        #[arg(long)]
        disabled_reason: Option<String>,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    match command {
        JobCommands::Show { id, json } => show_job(&*config.client()?, &id, json).await,
        JobCommands::Wait {
            id,
            states,
            interval,
            time_limit,
            soft,
            no_refetch,
        } => {
            let poller = config.job_poller(&id).await?;
            let mut request = poller
                .config()
                .poll_request(StateSet::from(states))
                .hardcheck(!soft)
                .fetch_state_in_validate(!no_refetch);
            if let Some(interval) = seconds(interval) {
                request = request.retry_interval(interval);
            }
            if let Some(limit) = seconds(time_limit) {
                request = request.time_limit(limit);
            }

            let reached = poller.wait_for_state(&request).await?;
            report_outcome(
                reached,
                &format!("job {} reached {}", id, request.expected_states),
            )
        }
        JobCommands::Phase {
            id,
            phase,
            attempts,
            frequency,
        } => {
            let poller = config.job_poller(&id).await?;
            let mut request = poller.config().phase_wait(phase);
            if let Some(attempts) = attempts {
                request = request.total_attempts(attempts);
            }
            if let Some(frequency) = seconds(frequency) {
                request = request.check_frequency(frequency);
            }

            poller.wait_for_phase(&request).await?;
            report_outcome(true, &format!("job {} entered phase [{}]", id, request.phase))
        }
        JobCommands::Modify {
            id,
            action,
            no_wait,
            soft,
        } => {
            let action = parse_action(&action)?;
            let poller = config.job_poller(&id).await?;

            let done = poller.modify_job(action, !no_wait, !soft).await?;
            report_outcome(done, &format!("job {} {}", id, action.past()))
        }
        JobCommands::Progress {
            id,
            percent,
            timeout,
        } => {
            let poller = config.job_poller(&id).await?;
            let mut request = poller.config().progress_wait(percent);
            if let Some(timeout) = seconds(timeout) {
                request = request.timeout(timeout);
            }

            let reached = poller.wait_for_job_progress(&request).await?;
            report_outcome(reached, &format!("job {} reached {}%", id, percent))
        }
        JobCommands::ValidateErrors { id, patterns } => {
            let poller = config.job_poller(&id).await?;

            let expected = poller.validate_job_errors(&patterns).await?;
            report_outcome(expected, &format!("job {} reported only expected errors", id))
        }
        JobCommands::Activity {
            id,
            disabled_reason,
        } => {
            let poller = config.job_poller(&id).await?;

            poller.check_activity_block(disabled_reason.as_deref()).await?;
            let what = match disabled_reason {
                Some(_) => format!("job {} is blocked by disabled activity", id),
                None => format!("job {} is not blocked", id),
            };
            report_outcome(true, &what)
        }
    }
}

/// Get and display a single job
async fn show_job(client: &JobControlClient, id: &str, json: bool) -> Result<()> {
    let job = client.get_job(&JobId::from(id)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        print_job_details(&job);
        if job.is_finished() {
            println!("\n{}", "Job is finished.".dimmed());
        }
    }

    Ok(())
}
