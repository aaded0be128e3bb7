//! Wait requests
//!
//! Each request is built per call, owned by the caller, and carries the
//! defaults of the matching operation until a builder method overrides them.

use std::time::Duration;

use jobwatch_core::domain::job::{JobId, JobStatus, JobSummary, StateSet};
use jobwatch_core::dto::job::{JobListQuery, ListingOptions};

/// Job type filter used when looking for a client's active jobs
pub const ACTIVE_JOB_FILTER: &str = "Backup";

/// Wait for a job to reach one of a set of statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRequest {
    pub expected_states: StateSet,
    /// Sleep between polls
    pub retry_interval: Duration,
    /// Deadline measured from the start of the call
    pub time_limit: Duration,
    /// Raise instead of returning `false` when the job does not converge
    pub hardcheck: bool,
    /// Re-read the status for the failure report instead of reusing the last poll
    pub fetch_state_in_validate: bool,
}

impl PollRequest {
    pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(75 * 60);

    pub fn new(expected: impl Into<StateSet>) -> Self {
        Self {
            expected_states: expected.into(),
            retry_interval: Self::DEFAULT_RETRY_INTERVAL,
            time_limit: Self::DEFAULT_TIME_LIMIT,
            hardcheck: true,
            fetch_state_in_validate: true,
        }
    }

    pub fn retry_interval(self, retry_interval: Duration) -> Self {
        Self {
            retry_interval,
            ..self
        }
    }

    pub fn time_limit(self, time_limit: Duration) -> Self {
        Self { time_limit, ..self }
    }

    pub fn hardcheck(self, hardcheck: bool) -> Self {
        Self { hardcheck, ..self }
    }

    pub fn fetch_state_in_validate(self, fetch_state_in_validate: bool) -> Self {
        Self {
            fetch_state_in_validate,
            ..self
        }
    }
}

impl Default for PollRequest {
    fn default() -> Self {
        Self::new(JobStatus::Completed)
    }
}

/// Wait for a running job to enter an execution phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseWait {
    pub phase: String,
    pub total_attempts: u32,
    pub check_frequency: Duration,
}

impl PhaseWait {
    pub const DEFAULT_TOTAL_ATTEMPTS: u32 = 50;
    pub const DEFAULT_CHECK_FREQUENCY: Duration = Duration::from_secs(5);

    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            total_attempts: Self::DEFAULT_TOTAL_ATTEMPTS,
            check_frequency: Self::DEFAULT_CHECK_FREQUENCY,
        }
    }

    pub fn total_attempts(self, total_attempts: u32) -> Self {
        Self {
            total_attempts,
            ..self
        }
    }

    pub fn check_frequency(self, check_frequency: Duration) -> Self {
        Self {
            check_frequency,
            ..self
        }
    }
}

/// Wait for a job's progress to exceed a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressWait {
    pub percent_complete: u8,
    pub timeout: Duration,
}

impl ProgressWait {
    pub const DEFAULT_PERCENT_COMPLETE: u8 = 20;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

    pub fn new(percent_complete: u8) -> Self {
        Self {
            percent_complete,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

impl Default for ProgressWait {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERCENT_COMPLETE)
    }
}

/// Wait for a client's first active job to appear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveJobWait {
    pub client: String,
    pub job_type_filter: String,
    pub time_limit: Duration,
    pub retry_interval: Duration,
}

impl ActiveJobWait {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            job_type_filter: ACTIVE_JOB_FILTER.to_string(),
            time_limit: Self::DEFAULT_TIME_LIMIT,
            retry_interval: Self::DEFAULT_RETRY_INTERVAL,
        }
    }

    pub fn time_limit(self, time_limit: Duration) -> Self {
        Self { time_limit, ..self }
    }

    pub fn retry_interval(self, retry_interval: Duration) -> Self {
        Self {
            retry_interval,
            ..self
        }
    }
}

/// Discover a client's jobs and optionally wait for them to settle
///
/// Jobs listed in one of `current_states` are the ones waited on; each of them
/// must then reach one of `expected_states`. Without `expected_states` the
/// listing is returned as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredJobsRequest {
    pub client: String,
    pub current_states: StateSet,
    pub expected_states: Option<StateSet>,
    pub lookup_window_hours: u32,
    pub job_type_filter: String,
    pub hardcheck: bool,
    pub time_limit: Duration,
    pub retry_interval: Duration,
    /// Exact, case-insensitive backup level such as "Full" or "Incremental"
    pub backup_level: Option<String>,
    pub options: ListingOptions,
}

impl FilteredJobsRequest {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(10);

    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            current_states: StateSet::new([JobStatus::Running, JobStatus::Waiting]),
            expected_states: Some(StateSet::from(JobStatus::Completed)),
            lookup_window_hours: 1,
            job_type_filter: "backup".to_string(),
            hardcheck: true,
            time_limit: Self::DEFAULT_TIME_LIMIT,
            retry_interval: Self::DEFAULT_RETRY_INTERVAL,
            backup_level: None,
            options: ListingOptions::default(),
        }
    }

    pub fn current_states(self, current_states: impl Into<StateSet>) -> Self {
        Self {
            current_states: current_states.into(),
            ..self
        }
    }

    pub fn expected_states(self, expected_states: impl Into<StateSet>) -> Self {
        Self {
            expected_states: Some(expected_states.into()),
            ..self
        }
    }

    /// Return the listing without waiting on any job
    pub fn discover_only(self) -> Self {
        Self {
            expected_states: None,
            ..self
        }
    }

    pub fn lookup_window_hours(self, lookup_window_hours: u32) -> Self {
        Self {
            lookup_window_hours,
            ..self
        }
    }

    pub fn job_type_filter(self, job_type_filter: impl Into<String>) -> Self {
        Self {
            job_type_filter: job_type_filter.into(),
            ..self
        }
    }

    pub fn hardcheck(self, hardcheck: bool) -> Self {
        Self { hardcheck, ..self }
    }

    pub fn time_limit(self, time_limit: Duration) -> Self {
        Self { time_limit, ..self }
    }

    pub fn retry_interval(self, retry_interval: Duration) -> Self {
        Self {
            retry_interval,
            ..self
        }
    }

    pub fn backup_level(self, backup_level: impl Into<String>) -> Self {
        Self {
            backup_level: Some(backup_level.into()),
            ..self
        }
    }

    pub fn options(self, options: ListingOptions) -> Self {
        Self { options, ..self }
    }

    /// Listing query sent to the job directory
    pub fn list_query(&self) -> JobListQuery {
        JobListQuery {
            client: self.client.clone(),
            lookup_window_hours: self.lookup_window_hours,
            job_type_filter: self.job_type_filter.clone(),
            options: self.options.clone(),
        }
    }
}

/// Result payload of [`JobPoller::get_filtered_jobs`](crate::JobPoller::get_filtered_jobs)
#[derive(Debug, Clone)]
pub enum FilteredJobs {
    /// The listing itself, returned in discovery mode or when nothing matched in time
    Listing(Vec<JobSummary>),
    /// Ids of the jobs that were waited on
    Matched(Vec<JobId>),
}

impl FilteredJobs {
    pub fn len(&self) -> usize {
        match self {
            FilteredJobs::Listing(jobs) => jobs.len(),
            FilteredJobs::Matched(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_request_defaults() {
        let request = PollRequest::new("completed");
        assert_eq!(request.retry_interval, Duration::from_secs(10));
        assert_eq!(request.time_limit, Duration::from_secs(75 * 60));
        assert!(request.hardcheck);
        assert!(request.fetch_state_in_validate);
    }

    #[test]
    fn test_filtered_request_defaults() {
        let request = FilteredJobsRequest::new("fs-client-01");
        assert!(request.current_states.contains(&JobStatus::Running));
        assert!(request.current_states.contains(&JobStatus::Waiting));
        assert_eq!(
            request.expected_states,
            Some(StateSet::from(JobStatus::Completed))
        );
        assert_eq!(request.list_query().options.limit, 20);
        assert!(request.discover_only().expected_states.is_none());
    }
}
