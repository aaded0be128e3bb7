//! Job-related API endpoints

use jobwatch_core::domain::action::Action;
use jobwatch_core::domain::job::{JobId, JobSnapshot, JobSummary};
use jobwatch_core::dto::job::{JobListQuery, ModifyJobRequest};
use tracing::debug;

use crate::error::Result;
use crate::{JobControlClient, check_status, read_json};

impl JobControlClient {
    // =============================================================================
    // Single Job
    // =============================================================================

    /// Snapshot of status, phase, progress and diagnostics taken in one round trip
    pub async fn get_job(&self, job_id: &JobId) -> Result<JobSnapshot> {
        let url = self.url(&format!("jobs/{}", job_id));
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        read_json(response, || format!("job {}", job_id)).await
    }

    /// Suspend, resume or kill a single job
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    /// * `action` - The mutation to apply
    /// * `wait_for_completion` - Ask the server to answer only once the job reflects the action
    pub async fn modify_job(
        &self,
        job_id: &JobId,
        action: Action,
        wait_for_completion: bool,
    ) -> Result<()> {
        let url = self.url(&format!("jobs/{}/{}", job_id, action));
        debug!("POST {} (wait_for_completion: {})", url, wait_for_completion);
        let response = self
            .client
            .post(&url)
            .json(&ModifyJobRequest {
                wait_for_completion,
            })
            .send()
            .await?;

        check_status(response, || format!("job {}", job_id)).await?;
        Ok(())
    }

    // =============================================================================
    // Listings
    // =============================================================================

    /// List the active jobs of a client
    ///
    /// # Arguments
    /// * `client` - Client name
    /// * `job_type_filter` - Job type filter, e.g. "Backup"
    pub async fn list_active_jobs(
        &self,
        client: &str,
        job_type_filter: &str,
    ) -> Result<Vec<JobSummary>> {
        let url = self.url("jobs/active");
        debug!("GET {} (client: {}, filter: {})", url, client, job_type_filter);
        let response = self
            .client
            .get(&url)
            .query(&[("client", client), ("job_filter", job_type_filter)])
            .send()
            .await?;

        read_json(response, || format!("active jobs of client {}", client)).await
    }

    /// List the jobs of a client within a lookup window
    pub async fn list_jobs(&self, query: &JobListQuery) -> Result<Vec<JobSummary>> {
        let url = self.url("jobs");
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await?;

        read_json(response, || format!("jobs of client {}", query.client)).await
    }

    // =============================================================================
    // Bulk Mutations
    // =============================================================================

    /// Suspend, resume or kill every job on the server
    pub async fn modify_all_jobs(&self, action: Action) -> Result<()> {
        let url = self.url(&format!("jobs/{}_all", action));
        debug!("POST {}", url);
        let response = self.client.post(&url).send().await?;

        check_status(response, || format!("{}_all endpoint", action)).await?;
        Ok(())
    }
}
