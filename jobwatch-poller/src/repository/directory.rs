//! Job directory repository
//!
//! Lists and filters jobs, hands out handles on individual jobs and applies
//! bulk mutations to every job of the server.

use std::sync::Arc;

use async_trait::async_trait;
use jobwatch_client::{JobControlClient, Result};
use jobwatch_core::domain::action::Action;
use jobwatch_core::domain::job::{JobId, JobSummary};
use jobwatch_core::dto::job::JobListQuery;

use crate::repository::jobs::{HttpJob, JobResource};

/// Repository trait for listing and bulk-mutating jobs
#[async_trait]
pub trait JobDirectory: Send + Sync {
    /// Returns a handle on the job with this id
    async fn get(&self, job_id: &JobId) -> Result<Arc<dyn JobResource>>;

    /// Lists active jobs of a client, in server order
    ///
    /// # Arguments
    /// * `client` - Client name
    /// * `job_type_filter` - Job type filter, e.g. "Backup"
    async fn active_jobs(&self, client: &str, job_type_filter: &str) -> Result<Vec<JobSummary>>;

    /// Lists jobs of a client within a lookup window, in server order
    async fn all_jobs(&self, query: &JobListQuery) -> Result<Vec<JobSummary>>;

    /// Suspends every job on the server
    async fn suspend_all(&self) -> Result<()>;

    /// Resumes every suspended job on the server
    async fn resume_all(&self) -> Result<()>;

    /// Kills every job on the server
    async fn kill_all(&self) -> Result<()>;
}

/// HTTP implementation of JobDirectory
pub struct HttpJobDirectory {
    client: Arc<JobControlClient>,
}

impl HttpJobDirectory {
    pub fn new(client: Arc<JobControlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobDirectory for HttpJobDirectory {
    async fn get(&self, job_id: &JobId) -> Result<Arc<dyn JobResource>> {
        Ok(Arc::new(HttpJob::new(
            job_id.clone(),
            Arc::clone(&self.client),
        )))
    }

    async fn active_jobs(&self, client: &str, job_type_filter: &str) -> Result<Vec<JobSummary>> {
        self.client.list_active_jobs(client, job_type_filter).await
    }

    async fn all_jobs(&self, query: &JobListQuery) -> Result<Vec<JobSummary>> {
        self.client.list_jobs(query).await
    }

    async fn suspend_all(&self) -> Result<()> {
        self.client.modify_all_jobs(Action::Suspend).await
    }

    async fn resume_all(&self) -> Result<()> {
        self.client.modify_all_jobs(Action::Resume).await
    }

    async fn kill_all(&self) -> Result<()> {
        self.client.modify_all_jobs(Action::Kill).await
    }
}
