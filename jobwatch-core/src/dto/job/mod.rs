//! Job DTOs for the job-control API

use serde::{Deserialize, Serialize};

/// Body of a single-job mutation request (suspend, resume, kill)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyJobRequest {
    /// Ask the server to hold the response until the mutation has taken effect
    pub wait_for_completion: bool,
}

/// Extra listing options accepted by the job listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingOptions {
    /// Maximum number of jobs returned
    pub limit: u32,
    /// Include jobs that have been aged out of the active history
    pub show_aged_jobs: bool,
    /// Additional clients to return jobs for
    pub clients: Vec<String>,
    /// Job operation types to include
    pub job_types: Vec<String>,
}

impl ListingOptions {
    pub const DEFAULT_LIMIT: u32 = 20;
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            show_aged_jobs: false,
            clients: Vec::new(),
            job_types: Vec::new(),
        }
    }
}

/// Query for jobs of one client finished or started within a time window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListQuery {
    pub client: String,
    /// Look back this many hours from now
    pub lookup_window_hours: u32,
    /// Comma separated job type filter, e.g. "Backup" or "Backup,Restore"
    pub job_type_filter: String,
    pub options: ListingOptions,
}

impl JobListQuery {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            lookup_window_hours: 1,
            job_type_filter: "backup".to_string(),
            options: ListingOptions::default(),
        }
    }

    /// Flattened query string pairs for the listing endpoint
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("client", self.client.clone()),
            ("lookup_hours", self.lookup_window_hours.to_string()),
            ("job_filter", self.job_type_filter.clone()),
            ("limit", self.options.limit.to_string()),
            ("show_aged_jobs", self.options.show_aged_jobs.to_string()),
        ];

        if !self.options.clients.is_empty() {
            pairs.push(("clients", self.options.clients.join(",")));
        }
        if !self.options.job_types.is_empty() {
            pairs.push(("job_types", self.options.job_types.join(",")));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_empty_lists() {
        let query = JobListQuery::new("fs-client-01");
        let pairs = query.query_pairs();

        assert_eq!(pairs.len(), 5);
        assert!(pairs.contains(&("limit", "20".to_string())));
        assert!(pairs.contains(&("job_filter", "backup".to_string())));
    }

    #[test]
    fn test_query_pairs_join_lists() {
        let mut query = JobListQuery::new("fs-client-01");
        query.options.clients = vec!["a".to_string(), "b".to_string()];
        query.options.job_types = vec!["Backup".to_string()];

        let pairs = query.query_pairs();
        assert!(pairs.contains(&("clients", "a,b".to_string())));
        assert!(pairs.contains(&("job_types", "Backup".to_string())));
    }
}
