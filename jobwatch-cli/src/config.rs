//! Configuration module
//!
//! Connection settings from the command line plus poller defaults from the
//! environment.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use jobwatch_client::JobControlClient;
use jobwatch_core::domain::job::JobId;
use jobwatch_poller::repository::{HttpClientDirectory, HttpJobDirectory};
use jobwatch_poller::{JobPoller, PollerConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the job-control API
    pub server_url: String,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,

    /// Default intervals and limits for waits
    pub poller: PollerConfig,
}

impl Config {
    /// Builds the configuration and validates it
    pub fn load(server_url: String, request_timeout_secs: u64) -> Result<Self> {
        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            anyhow::bail!("server_url must start with http:// or https://");
        }

        if request_timeout_secs == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        let poller = PollerConfig::from_env().context("Invalid JOBWATCH_* poller settings")?;

        Ok(Self {
            server_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            poller,
        })
    }

    /// HTTP client for the job-control API
    pub fn client(&self) -> Result<Arc<JobControlClient>> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Arc::new(JobControlClient::with_client(
            self.server_url.clone(),
            http_client,
        )))
    }

    /// Poller with job and client directories but no watched job
    pub fn detached_poller(&self) -> Result<JobPoller> {
        let client = self.client()?;

        Ok(JobPoller::detached()
            .with_directory(Arc::new(HttpJobDirectory::new(Arc::clone(&client))))
            .with_clients(Arc::new(HttpClientDirectory::new(client)))
            .with_config(self.poller.clone()))
    }

    /// Poller watching one job
    pub async fn job_poller(&self, job_id: &str) -> Result<JobPoller> {
        let poller = self.detached_poller()?;
        poller
            .for_job(&JobId::from(job_id))
            .await
            .with_context(|| format!("Failed to attach to job {}", job_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_url() {
        assert!(Config::load("localhost:8080".to_string(), 60).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(Config::load("http://localhost:8080".to_string(), 0).is_err());
    }
}
