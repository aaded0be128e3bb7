//! Suspend, resume and kill

use jobwatch_core::domain::action::Action;
use jobwatch_core::domain::job::StateSet;
use tracing::{info, warn};

use crate::error::{HardcheckExt, PollError, Result};
use crate::poller::JobPoller;
use crate::poller::request::ACTIVE_JOB_FILTER;

impl JobPoller {
    /// Suspends, resumes or kills the watched job
    ///
    /// # Arguments
    /// * `action` - The mutation to apply
    /// * `wait_for_completion` - Have the mutation call return only once it took effect
    /// * `hardcheck` - Raise instead of returning `false` when the status does not follow
    pub async fn modify_job(
        &self,
        action: Action,
        wait_for_completion: bool,
        hardcheck: bool,
    ) -> Result<bool> {
        let job = self.require_job()?;

        info!("{} job [{}]", action.progressive(), job.id());

        match action {
            Action::Suspend => job.suspend(wait_for_completion).await?,
            Action::Resume => job.resume(wait_for_completion).await?,
            Action::Kill => job.kill(wait_for_completion).await?,
        }

        let status = job.fetch().await?.status;
        info!("Job [{}] status after {}: [{}]", job.id(), action, status);

        let expected = action.expected_status();
        if status != expected {
            return Err::<bool, _>(PollError::ValidationFailure {
                job_id: job.id().clone(),
                expected: StateSet::from(expected),
                actual: status,
            })
            .or_false(hardcheck);
        }

        Ok(true)
    }

    /// Suspends, resumes or kills every job on the server
    pub async fn modify_all_jobs(&self, action: Action) -> Result<()> {
        let directory = self.require_directory()?;

        info!("{} all jobs", action.progressive());

        match action {
            Action::Suspend => directory.suspend_all().await?,
            Action::Resume => directory.resume_all().await?,
            Action::Kill => directory.kill_all().await?,
        }

        info!("Successfully {} all jobs", action.past());
        Ok(())
    }

    /// Kills the active backup jobs of a client
    ///
    /// An unknown client has nothing to kill and succeeds. Jobs the server
    /// refuses to kill because they are past that point are skipped; any other
    /// failure stops the remaining kills.
    pub async fn kill_active_jobs(&self, client: &str) -> Result<bool> {
        let clients = self.require_clients()?;
        let directory = self.require_directory()?;

        if !clients.has_client(client).await? {
            info!("No such client [{}] exists on the server", client);
            return Ok(true);
        }

        let active = directory.active_jobs(client, ACTIVE_JOB_FILTER).await?;
        info!(
            "Active jobs for client [{}]: {:?}",
            client,
            active.iter().map(|job| job.id.as_str()).collect::<Vec<_>>()
        );

        for summary in &active {
            let poller = self.for_job(&summary.id).await?;
            match poller.modify_job(Action::Kill, true, true).await {
                Ok(_) => {}
                Err(PollError::Remote(e)) if e.is_job_not_modifiable() => {
                    warn!("Skipping job [{}]: {}", summary.id, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(true)
    }
}
