//! One-shot checks on a job's diagnostics

use jobwatch_core::domain::job::JobStatus;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{PollError, Result};
use crate::poller::JobPoller;

impl JobPoller {
    /// Checks that every error reported by the job is an expected one
    ///
    /// Each failure reason is split into lines; blank lines are ignored and every
    /// other line must fully match at least one pattern. Only a trailing `\r` is
    /// stripped from a line before matching.
    pub async fn validate_job_errors<S: AsRef<str>>(&self, expected_patterns: &[S]) -> Result<bool> {
        let patterns = expected_patterns
            .iter()
            .map(|pattern| compile_full_match(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let job = self.require_job()?;
        let snapshot = job.fetch().await?;

        let errors = snapshot
            .failure_reasons
            .iter()
            .flat_map(|reason| reason.split('\n'))
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty());

        for error in errors {
            if !patterns.iter().any(|pattern| pattern.is_match(error)) {
                warn!("Job [{}] reported unexpected error: [{}]", job.id(), error);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Checks how the job reacted to the client's activity setting
    ///
    /// With `expected_reason`, activity is disabled: the job must sit in the queue
    /// and the first segment of its delay reason must mention the reason. Without
    /// it, activity is enabled and the job must not be queued.
    pub async fn check_activity_block(&self, expected_reason: Option<&str>) -> Result<()> {
        let job = self.require_job()?;
        let snapshot = job.fetch().await?;

        let Some(reason) = expected_reason else {
            if snapshot.status == JobStatus::Queued {
                return Err(PollError::ActivityCheck {
                    job_id: job.id().clone(),
                    detail: "job is queued although activity is enabled".to_string(),
                });
            }
            info!("Job [{}] is not queued; activity is enabled", job.id());
            return Ok(());
        };

        if snapshot.status != JobStatus::Queued {
            return Err(PollError::ActivityCheck {
                job_id: job.id().clone(),
                detail: format!(
                    "job is [{}] although activity is disabled, expected queued",
                    snapshot.status
                ),
            });
        }

        let delay_reason = snapshot.delay_reason.unwrap_or_default();
        let first_segment = delay_reason.split("<br>").next().unwrap_or_default();
        if !first_segment.contains(reason) {
            return Err(PollError::ActivityCheck {
                job_id: job.id().clone(),
                detail: format!(
                    "delay reason [{}] does not mention [{}]",
                    delay_reason, reason
                ),
            });
        }

        info!(
            "Job [{}] is queued with the expected delay reason: [{}]",
            job.id(),
            delay_reason
        );
        Ok(())
    }
}

fn compile_full_match(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| PollError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
