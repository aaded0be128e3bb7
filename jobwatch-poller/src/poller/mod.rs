//! Job poller
//!
//! Converges on remote job state by polling. A poller watches at most one job
//! and may additionally hold the job and client directories for listing and
//! bulk operations. Collaborators are injected; the poller owns no session.

mod actions;
mod diagnostics;
mod discovery;
mod request;
mod state;

pub use request::{
    ACTIVE_JOB_FILTER, ActiveJobWait, FilteredJobs, FilteredJobsRequest, PhaseWait, PollRequest,
    ProgressWait,
};

use std::sync::Arc;
use std::time::Duration;

use jobwatch_core::domain::job::{JobId, JobStatus, StateSet};
use tokio::time::Instant;
use tracing::info;

use crate::config::PollerConfig;
use crate::error::{PollError, Result};
use crate::repository::{ClientDirectory, JobDirectory, JobResource};

/// Polls remote jobs until they reach a target state, phase or progress
#[derive(Clone)]
pub struct JobPoller {
    job: Option<Arc<dyn JobResource>>,
    directory: Option<Arc<dyn JobDirectory>>,
    clients: Option<Arc<dyn ClientDirectory>>,
    config: PollerConfig,
}

impl JobPoller {
    /// Creates a poller watching one job
    pub fn new(job: Arc<dyn JobResource>) -> Self {
        Self {
            job: Some(job),
            ..Self::detached()
        }
    }

    /// Creates a poller without a watched job, for listing and bulk operations
    pub fn detached() -> Self {
        Self {
            job: None,
            directory: None,
            clients: None,
            config: PollerConfig::default(),
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn JobDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_clients(mut self, clients: Arc<dyn ClientDirectory>) -> Self {
        self.clients = Some(clients);
        self
    }

    pub fn with_config(mut self, config: PollerConfig) -> Self {
        self.config = config;
        self
    }

    /// The watched job, if any
    pub fn job(&self) -> Option<&Arc<dyn JobResource>> {
        self.job.as_ref()
    }

    /// Replaces the watched job
    pub fn set_job(&mut self, job: Arc<dyn JobResource>) {
        self.job = Some(job);
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Sibling poller on another job, sharing collaborators and configuration
    pub async fn for_job(&self, job_id: &JobId) -> Result<JobPoller> {
        let job = self.require_directory()?.get(job_id).await?;
        Ok(JobPoller {
            job: Some(job),
            ..self.clone()
        })
    }

    /// Checks a status against an expected set
    ///
    /// Uses `known_status` when given, otherwise fetches the status from the job.
    /// Without `hardcheck` a mismatch is only logged.
    pub async fn validate_job_state(
        &self,
        expected: &StateSet,
        known_status: Option<JobStatus>,
        hardcheck: bool,
    ) -> Result<()> {
        let job = self.require_job()?;
        let status = match known_status {
            Some(status) => status,
            None => job.fetch().await?.status,
        };

        info!(
            "Validation: current job [{}] state: [{}], expected: {}",
            job.id(),
            status,
            expected
        );

        if hardcheck && !expected.contains(&status) {
            return Err(PollError::ValidationFailure {
                job_id: job.id().clone(),
                expected: expected.clone(),
                actual: status,
            });
        }

        Ok(())
    }

    fn require_job(&self) -> Result<&Arc<dyn JobResource>> {
        self.job
            .as_ref()
            .ok_or(PollError::MissingCollaborator("job"))
    }

    fn require_directory(&self) -> Result<&Arc<dyn JobDirectory>> {
        self.directory
            .as_ref()
            .ok_or(PollError::MissingCollaborator("job directory"))
    }

    fn require_clients(&self) -> Result<&Arc<dyn ClientDirectory>> {
        self.clients
            .as_ref()
            .ok_or(PollError::MissingCollaborator("client directory"))
    }
}

/// Deadline `limit` from now; `None` when it lies beyond what the clock can represent
fn deadline_after(limit: Duration) -> Option<Instant> {
    Instant::now().checked_add(limit)
}

fn is_past(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryDirectory, ScriptedJob};

    #[tokio::test]
    async fn test_validate_job_state_uses_known_status() {
        let job = Arc::new(ScriptedJob::new("7", &["running"]));
        let poller = JobPoller::new(job.clone());

        poller
            .validate_job_state(&StateSet::from("running"), Some(JobStatus::Running), true)
            .await
            .unwrap();
        assert_eq!(job.fetch_count(), 0);

        let err = poller
            .validate_job_state(&StateSet::from("completed"), None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::ValidationFailure { .. }));
        assert_eq!(job.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_soft_validation_only_logs() {
        let job = Arc::new(ScriptedJob::new("7", &["failed"]));
        let poller = JobPoller::new(job);

        assert!(
            poller
                .validate_job_state(&StateSet::from("completed"), None, false)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_missing_collaborators_are_reported() {
        let poller = JobPoller::detached();

        let err = poller
            .validate_job_state(&StateSet::from("completed"), None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::MissingCollaborator("job")));

        let err = poller.for_job(&JobId::from("1")).await.err().unwrap();
        assert!(matches!(err, PollError::MissingCollaborator("job directory")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_beyond_clock_never_passes() {
        assert!(deadline_after(Duration::MAX).is_none());
        assert!(!is_past(deadline_after(Duration::MAX)));
        assert!(is_past(deadline_after(Duration::ZERO)));
    }

    #[tokio::test]
    async fn test_for_job_shares_collaborators() {
        let directory = Arc::new(
            MemoryDirectory::new().with_job(Arc::new(ScriptedJob::new("11", &["running"]))),
        );
        let poller = JobPoller::detached().with_directory(directory);

        let sibling = poller.for_job(&JobId::from("11")).await.unwrap();
        assert_eq!(sibling.job().map(|job| job.id().as_str()), Some("11"));
        assert!(sibling.require_directory().is_ok());
    }
}
