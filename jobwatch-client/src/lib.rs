//! Jobwatch HTTP Client
//!
//! Typed access to the job-control API of the backup server: single job reads
//! and mutations, job listings, bulk mutations and client lookups.
//!
//! # Example
//!
//! ```no_run
//! use jobwatch_client::JobControlClient;
//! use jobwatch_core::domain::job::JobId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), jobwatch_client::ClientError> {
//!     let client = JobControlClient::new("http://localhost:8080");
//!
//!     let job = client.get_job(&JobId::from("4127")).await?;
//!     println!("Job {} is {}", job.id, job.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod clients;
mod jobs;

pub use error::{ClientError, Result};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// HTTP client for the job-control API
#[derive(Debug, Clone)]
pub struct JobControlClient {
    /// Server root without trailing slash, e.g. "http://localhost:8080"
    base_url: String,
    client: Client,
}

impl JobControlClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Uses a preconfigured reqwest client, e.g. one with a request timeout
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

/// Passes a successful response through and turns any other status into an error
///
/// `resource` names what the request addressed, for the `NotFound` case.
async fn check_status(response: Response, resource: impl FnOnce() -> String) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ClientError::from_status(status.as_u16(), message, resource()))
}

/// Checks the status, then decodes the JSON body
async fn read_json<T: DeserializeOwned>(
    response: Response,
    resource: impl FnOnce() -> String,
) -> Result<T> {
    check_status(response, resource)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls_ignore_trailing_slash() {
        let client = JobControlClient::new("http://cs.example.com:8080//");
        assert_eq!(client.base_url(), "http://cs.example.com:8080");
        assert_eq!(
            client.url("jobs/4127/kill"),
            "http://cs.example.com:8080/api/jobs/4127/kill"
        );
    }
}
