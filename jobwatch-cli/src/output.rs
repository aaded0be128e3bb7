//! Terminal rendering of jobs

use colored::*;
use jobwatch_core::domain::job::{JobSnapshot, JobStatus, JobSummary};

/// Print a job summary line from a listing
pub fn print_job_summary(job: &JobSummary) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().bold());
    println!("    Status:   {}", colorize_status(&job.status));
    if let Some(client) = &job.client {
        println!("    Client:   {}", client.dimmed());
    }
    if let Some(level) = &job.backup_level {
        println!("    Level:    {}", level);
    }
    if let Some(started) = job.started_at {
        println!(
            "    Started:  {}",
            started
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
    }
    println!();
}

/// Print detailed job information
pub fn print_job_details(job: &JobSnapshot) {
    println!("{}", "Job Details:".bold());
    println!("  ID:        {}", job.id.to_string().cyan());
    println!("  Status:    {}", colorize_status(&job.status));
    println!("  Phase:     {}", job.phase);
    println!("  Progress:  {}%", job.progress_percent);

    if let Some(job_type) = &job.job_type {
        println!("  Type:      {}", job_type);
    }
    if let Some(client) = &job.client {
        println!("  Client:    {}", client);
    }
    if let Some(reason) = &job.delay_reason {
        println!("  Delayed:   {}", reason.yellow());
    }
    if let Some(reason) = &job.pending_reason {
        println!("  Pending:   {}", reason.yellow());
    }

    if !job.failure_reasons.is_empty() {
        println!("\n{}", "Errors:".bold());
        for reason in &job.failure_reasons {
            println!("  {}", reason.red());
        }
    }
}

/// Colorize job status for display
pub fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        JobStatus::Queued | JobStatus::Pending | JobStatus::Waiting => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed | JobStatus::CompletedWithErrors => status_str.red(),
        JobStatus::Suspended | JobStatus::Killed => status_str.dimmed(),
        JobStatus::Other(_) => status_str.normal(),
    }
}
