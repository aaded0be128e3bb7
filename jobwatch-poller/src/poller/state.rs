//! Waiting on status, phase and progress

use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use crate::error::{HardcheckExt, PollError, Result};
use crate::poller::{JobPoller, deadline_after, is_past};
use crate::poller::request::{PhaseWait, PollRequest, ProgressWait};

impl JobPoller {
    /// Waits for the job to reach one of the expected statuses
    ///
    /// Returns `Ok(true)` once the job is in an expected status. When the job
    /// finishes elsewhere (killed, failed, ...) or the time limit passes, returns
    /// `Ok(false)` without `hardcheck` and `ValidationFailure` with it.
    pub async fn wait_for_state(&self, request: &PollRequest) -> Result<bool> {
        match self.converge_on_state(request).await {
            Err(PollError::ValidationFailure {
                job_id, expected, ..
            }) if request.hardcheck && request.fetch_state_in_validate => {
                let actual = self.require_job()?.fetch().await?.status;
                Err(PollError::ValidationFailure {
                    job_id,
                    expected,
                    actual,
                })
            }
            outcome => outcome.or_false(request.hardcheck),
        }
    }

    /// Poll loop behind `wait_for_state`, independent of `hardcheck`
    async fn converge_on_state(&self, request: &PollRequest) -> Result<bool> {
        let job = self.require_job()?;
        let expected = &request.expected_states;
        let deadline = deadline_after(request.time_limit);

        info!("Waiting for job [{}] to go into state {}", job.id(), expected);

        let status = loop {
            let snapshot = job.fetch().await?;

            if expected.contains(&snapshot.status)
                || snapshot.is_finished()
                || is_past(deadline)
            {
                break snapshot.status;
            }

            info!(
                "Sleep [{:?}]. Job [{}] state: [{}], phase [{}], progress: [{}%], delay reason: [{}]",
                request.retry_interval,
                job.id(),
                snapshot.status,
                snapshot.phase,
                snapshot.progress_percent,
                snapshot.delay_reason.as_deref().unwrap_or_default()
            );
            sleep(request.retry_interval).await;
        };

        if !expected.contains(&status) {
            warn!(
                "Job [{}] stopped at state [{}], expected {}",
                job.id(),
                status,
                expected
            );
            return Err(PollError::ValidationFailure {
                job_id: job.id().clone(),
                expected: expected.clone(),
                actual: status,
            });
        }

        info!("Job [{}] status = [{}]", job.id(), status);
        Ok(true)
    }

    /// Waits for the job to enter an execution phase
    ///
    /// A job that is already finished cannot enter any phase; that is treated as
    /// nothing to wait for.
    pub async fn wait_for_phase(&self, request: &PhaseWait) -> Result<()> {
        let job = self.require_job()?;
        let phase = request.phase.to_lowercase();

        let mut snapshot = job.fetch().await?;
        if snapshot.is_finished() {
            info!(
                "Job [{}] already finished before waiting for phase",
                job.id()
            );
            return Ok(());
        }

        let mut attempt = 1;
        while snapshot.phase.to_lowercase() != phase {
            if attempt >= request.total_attempts {
                return Err(PollError::Timeout {
                    subject: format!("job [{}]", job.id()),
                    target: format!(
                        "phase [{}]; attempts exhausted ({})",
                        phase, request.total_attempts
                    ),
                    observed: format!("phase [{}]", snapshot.phase),
                });
            }

            info!(
                "Waiting for job [{}] to come to [{}] phase. Current phase [{}]. Attempt [{}/{}]",
                job.id(),
                phase,
                snapshot.phase,
                attempt,
                request.total_attempts
            );
            sleep(request.check_frequency).await;

            snapshot = job.fetch().await?;
            if snapshot.is_finished() {
                return Err(PollError::PrematureFinish {
                    job_id: job.id().clone(),
                    phase,
                    status: snapshot.status,
                });
            }
            attempt += 1;
        }

        info!("Job [{}] is in phase [{}]", job.id(), snapshot.phase);
        Ok(())
    }

    /// Waits for the job's progress to exceed `percent_complete`
    ///
    /// A finished job has nothing left to progress; the wait ends as soon as the
    /// job is seen finished.
    pub async fn wait_for_job_progress(&self, request: &ProgressWait) -> Result<bool> {
        let job = self.require_job()?;

        let mut snapshot = job.fetch().await?;
        if snapshot.is_finished() {
            info!(
                "Job [{}] already finished before waiting for job progress",
                job.id()
            );
            return Ok(true);
        }

        let started = Instant::now();
        while snapshot.progress_percent <= request.percent_complete {
            if started.elapsed() >= request.timeout {
                return Err(PollError::Timeout {
                    subject: format!("job [{}] progress", job.id()),
                    target: format!("[{}%]", request.percent_complete),
                    observed: format!(
                        "[{}%], pending reason [{}]",
                        snapshot.progress_percent,
                        snapshot.pending_reason.as_deref().unwrap_or_default()
                    ),
                });
            }

            info!(
                "Waiting {:?} for job [{}] progress to update. Percent complete [{}%]",
                self.config.progress_check_interval,
                job.id(),
                snapshot.progress_percent
            );
            sleep(self.config.progress_check_interval).await;

            snapshot = job.fetch().await?;
            if snapshot.is_finished() {
                info!(
                    "Job [{}] finished with status [{}] at [{}%]",
                    job.id(),
                    snapshot.status,
                    snapshot.progress_percent
                );
                return Ok(true);
            }
        }

        info!(
            "Job [{}] percent complete [{}%]",
            job.id(),
            snapshot.progress_percent
        );
        Ok(true)
    }
}
