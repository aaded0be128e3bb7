//! Single job repository
//!
//! Reads and mutates one remote job:
//! - Fetching a snapshot of status, phase and progress
//! - Suspending, resuming and killing

use std::sync::Arc;

use async_trait::async_trait;
use jobwatch_client::{JobControlClient, Result};
use jobwatch_core::domain::action::Action;
use jobwatch_core::domain::job::{JobId, JobSnapshot};

/// Repository trait for one remote job
#[async_trait]
pub trait JobResource: Send + Sync {
    /// Identifier of the job, stable for its lifetime
    fn id(&self) -> &JobId;

    /// Fetches the current state of the job in a single round trip
    async fn fetch(&self) -> Result<JobSnapshot>;

    /// Requests suspension of the job
    ///
    /// # Arguments
    /// * `wait_for_completion` - Return only once the server reports the job suspended
    async fn suspend(&self, wait_for_completion: bool) -> Result<()>;

    /// Requests resumption of a suspended job
    async fn resume(&self, wait_for_completion: bool) -> Result<()>;

    /// Requests the job be killed
    async fn kill(&self, wait_for_completion: bool) -> Result<()>;
}

/// HTTP implementation of JobResource
pub struct HttpJob {
    id: JobId,
    client: Arc<JobControlClient>,
}

impl HttpJob {
    /// Creates a handle on a remote job
    ///
    /// No request is made until the job is fetched or mutated.
    pub fn new(id: JobId, client: Arc<JobControlClient>) -> Self {
        Self { id, client }
    }
}

#[async_trait]
impl JobResource for HttpJob {
    fn id(&self) -> &JobId {
        &self.id
    }

    async fn fetch(&self) -> Result<JobSnapshot> {
        self.client.get_job(&self.id).await
    }

    async fn suspend(&self, wait_for_completion: bool) -> Result<()> {
        self.client
            .modify_job(&self.id, Action::Suspend, wait_for_completion)
            .await
    }

    async fn resume(&self, wait_for_completion: bool) -> Result<()> {
        self.client
            .modify_job(&self.id, Action::Resume, wait_for_completion)
            .await
    }

    async fn kill(&self, wait_for_completion: bool) -> Result<()> {
        self.client
            .modify_job(&self.id, Action::Kill, wait_for_completion)
            .await
    }
}
