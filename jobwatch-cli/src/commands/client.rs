//! Client command handlers
//!
//! Lists, waits on and kills the jobs of one client.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use jobwatch_core::domain::job::StateSet;
use jobwatch_core::dto::job::ListingOptions;
use jobwatch_poller::{FilteredJobs, JobResource};

use super::{report_outcome, seconds};
use crate::config::Config;
use crate::output::{print_job_details, print_job_summary};

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Kill every active backup job of a client
    KillActive {
        /// Client name
        client: String,
    },
    /// List a client's jobs and wait for the matching ones
    Filtered(FilteredArgs),
    /// Wait for the client's first active job and show it
    Active {
        /// Client name
        client: String,

        /// Job type filter
        #[arg(long, default_value = jobwatch_poller::poller::ACTIVE_JOB_FILTER)]
        job_type: String,

        /// Seconds to wait before giving up
        #[arg(long)]
        time_limit: Option<u64>,

        /// Seconds between listings
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[derive(Args)]
pub struct FilteredArgs {
    /// Client name
    client: String,

    /// State a listed job must be in to be waited on (repeatable)
    #[arg(long = "current-state")]
    current_states: Vec<String>,

    /// State the matching jobs must reach (repeatable)
    #[arg(long = "expected-state")]
    expected_states: Vec<String>,

    /// Only list the jobs, do not wait on any
    #[arg(long, conflicts_with = "expected_states")]
    discover_only: bool,

    /// How many hours back to look
    #[arg(long)]
    lookup_hours: Option<u32>,

    /// Job type filter
    #[arg(long)]
    job_type: Option<String>,

    /// Keep only jobs at this backup level
    #[arg(long)]
    backup_level: Option<String>,

    /// Maximum number of jobs listed
    #[arg(long, default_value_t = ListingOptions::DEFAULT_LIMIT)]
    limit: u32,

    /// Include aged jobs in the listing
    #[arg(long)]
    show_aged: bool,

    /// Restrict the listing to these clients (repeatable)
    #[arg(long = "listing-client")]
    listing_clients: Vec<String>,

    /// Restrict the listing to these job types (repeatable)
    #[arg(long = "listing-job-type")]
    listing_job_types: Vec<String>,

    /// Seconds to wait before giving up
    #[arg(long)]
    time_limit: Option<u64>,

    /// Seconds between listings and polls
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Report a miss instead of failing with details
    #[arg(long)]
    soft: bool,
}

/// Handle client commands
pub async fn handle_client_command(command: ClientCommands, config: &Config) -> Result<()> {
    let poller = config.detached_poller()?;

    match command {
        ClientCommands::KillActive { client } => {
            let done = poller.kill_active_jobs(&client).await?;
            report_outcome(done, &format!("active jobs of client {} killed", client))
        }
        ClientCommands::Filtered(args) => {
            let mut request = poller
                .config()
                .filtered_jobs(args.client.clone())
                .hardcheck(!args.soft)
                .options(ListingOptions {
                    limit: args.limit,
                    show_aged_jobs: args.show_aged,
                    clients: args.listing_clients,
                    job_types: args.listing_job_types,
                });
            if !args.current_states.is_empty() {
                request = request.current_states(StateSet::from(args.current_states));
            }
            if args.discover_only {
                request = request.discover_only();
            } else if !args.expected_states.is_empty() {
                request = request.expected_states(StateSet::from(args.expected_states));
            }
            if let Some(hours) = args.lookup_hours {
                request = request.lookup_window_hours(hours);
            }
            if let Some(job_type) = args.job_type {
                request = request.job_type_filter(job_type);
            }
            if let Some(level) = args.backup_level {
                request = request.backup_level(level);
            }
            if let Some(limit) = seconds(args.time_limit) {
                request = request.time_limit(limit);
            }
            if let Some(interval) = seconds(args.interval) {
                request = request.retry_interval(interval);
            }

            let (reached, jobs) = poller.get_filtered_jobs(&request).await?;
            print_filtered(&jobs);
            report_outcome(
                reached,
                &format!("jobs of client {} filtered", request.client),
            )
        }
        ClientCommands::Active {
            client,
            job_type,
            time_limit,
            interval,
        } => {
            let mut request = poller.config().active_job_wait(client.clone());
            request.job_type_filter = job_type;
            if let Some(limit) = seconds(time_limit) {
                request = request.time_limit(limit);
            }
            if let Some(interval) = seconds(interval) {
                request = request.retry_interval(interval);
            }

            let job = poller.get_active_job_object(&request).await?;
            let snapshot = job.fetch().await?;
            println!(
                "{}",
                format!("Active job for client {}:", client).bold()
            );
            print_job_details(&snapshot);
            Ok(())
        }
    }
}

fn print_filtered(jobs: &FilteredJobs) {
    match jobs {
        FilteredJobs::Listing(jobs) if jobs.is_empty() => {
            println!("{}", "No jobs found.".yellow());
        }
        FilteredJobs::Listing(jobs) => {
            println!("{}", format!("Found {} job(s):", jobs.len()).bold());
            println!();
            for job in jobs {
                print_job_summary(job);
            }
        }
        FilteredJobs::Matched(ids) => {
            println!("{}", format!("Waited on {} job(s):", ids.len()).bold());
            for id in ids {
                println!("  {} Job {}", "▸".cyan(), id.to_string().bold());
            }
        }
    }
}
