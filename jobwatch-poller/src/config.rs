//! Poller configuration
//!
//! Default intervals and limits used when callers build wait requests from
//! configuration rather than spelling every value out.

use std::time::Duration;

use jobwatch_core::domain::job::StateSet;

use crate::poller::{ActiveJobWait, FilteredJobsRequest, PhaseWait, PollRequest, ProgressWait};

/// Poller configuration
///
/// Defaults for every wait. Each field can be overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Sleep between status polls
    pub retry_interval: Duration,

    /// Deadline for converging on a status
    pub state_time_limit: Duration,

    /// Number of phase checks before giving up
    pub phase_attempts: u32,

    /// Sleep between phase checks
    pub phase_check_frequency: Duration,

    /// Sleep between progress checks
    pub progress_check_interval: Duration,

    /// Deadline for reaching a progress percentage
    pub progress_timeout: Duration,

    /// Deadline for discovering jobs that match a listing filter
    pub discovery_time_limit: Duration,

    /// Sleep between listing queries while discovering jobs
    pub discovery_retry_interval: Duration,

    /// Deadline for an active job to show up for a client
    pub active_job_time_limit: Duration,

    /// Sleep between active job listings
    pub active_job_retry_interval: Duration,
}

impl PollerConfig {
    /// Creates a configuration with the stock defaults
    pub fn new() -> Self {
        Self {
            retry_interval: Duration::from_secs(10),
            state_time_limit: Duration::from_secs(75 * 60),
            phase_attempts: 50,
            phase_check_frequency: Duration::from_secs(5),
            progress_check_interval: Duration::from_secs(15),
            progress_timeout: Duration::from_secs(3600),
            discovery_time_limit: Duration::from_secs(30 * 60),
            discovery_retry_interval: Duration::from_secs(10),
            active_job_time_limit: Duration::from_secs(5 * 60),
            active_job_retry_interval: Duration::from_secs(1),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Every variable is optional; unset or unparsable values keep the default.
    /// - JOBWATCH_RETRY_INTERVAL (seconds, default: 10)
    /// - JOBWATCH_STATE_TIME_LIMIT (minutes, default: 75)
    /// - JOBWATCH_PHASE_ATTEMPTS (default: 50)
    /// - JOBWATCH_PHASE_CHECK_FREQUENCY (seconds, default: 5)
    /// - JOBWATCH_PROGRESS_CHECK_INTERVAL (seconds, default: 15)
    /// - JOBWATCH_PROGRESS_TIMEOUT (seconds, default: 3600)
    /// - JOBWATCH_DISCOVERY_TIME_LIMIT (minutes, default: 30)
    /// - JOBWATCH_DISCOVERY_RETRY_INTERVAL (seconds, default: 10)
    /// - JOBWATCH_ACTIVE_JOB_TIME_LIMIT (minutes, default: 5)
    /// - JOBWATCH_ACTIVE_JOB_RETRY_INTERVAL (seconds, default: 1)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::new();

        let config = Self {
            retry_interval: env_secs("JOBWATCH_RETRY_INTERVAL").unwrap_or(defaults.retry_interval),
            state_time_limit: env_minutes("JOBWATCH_STATE_TIME_LIMIT")
                .unwrap_or(defaults.state_time_limit),
            phase_attempts: env_parse("JOBWATCH_PHASE_ATTEMPTS").unwrap_or(defaults.phase_attempts),
            phase_check_frequency: env_secs("JOBWATCH_PHASE_CHECK_FREQUENCY")
                .unwrap_or(defaults.phase_check_frequency),
            progress_check_interval: env_secs("JOBWATCH_PROGRESS_CHECK_INTERVAL")
                .unwrap_or(defaults.progress_check_interval),
            progress_timeout: env_secs("JOBWATCH_PROGRESS_TIMEOUT")
                .unwrap_or(defaults.progress_timeout),
            discovery_time_limit: env_minutes("JOBWATCH_DISCOVERY_TIME_LIMIT")
                .unwrap_or(defaults.discovery_time_limit),
            discovery_retry_interval: env_secs("JOBWATCH_DISCOVERY_RETRY_INTERVAL")
                .unwrap_or(defaults.discovery_retry_interval),
            active_job_time_limit: env_minutes("JOBWATCH_ACTIVE_JOB_TIME_LIMIT")
                .unwrap_or(defaults.active_job_time_limit),
            active_job_retry_interval: env_secs("JOBWATCH_ACTIVE_JOB_RETRY_INTERVAL")
                .unwrap_or(defaults.active_job_retry_interval),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.retry_interval.is_zero() {
            anyhow::bail!("retry_interval must be greater than 0");
        }

        if self.phase_check_frequency.is_zero() {
            anyhow::bail!("phase_check_frequency must be greater than 0");
        }

        if self.progress_check_interval.is_zero() {
            anyhow::bail!("progress_check_interval must be greater than 0");
        }

        if self.discovery_retry_interval.is_zero() || self.active_job_retry_interval.is_zero() {
            anyhow::bail!("listing retry intervals must be greater than 0");
        }

        if self.phase_attempts == 0 {
            anyhow::bail!("phase_attempts must be greater than 0");
        }

        Ok(())
    }

    /// Status wait using the configured interval and limit
    pub fn poll_request(&self, expected: impl Into<StateSet>) -> PollRequest {
        PollRequest::new(expected)
            .retry_interval(self.retry_interval)
            .time_limit(self.state_time_limit)
    }

    /// Phase wait using the configured attempt budget and frequency
    pub fn phase_wait(&self, phase: impl Into<String>) -> PhaseWait {
        PhaseWait::new(phase)
            .total_attempts(self.phase_attempts)
            .check_frequency(self.phase_check_frequency)
    }

    /// Progress wait using the configured timeout
    pub fn progress_wait(&self, percent_complete: u8) -> ProgressWait {
        ProgressWait::new(percent_complete).timeout(self.progress_timeout)
    }

    /// Filtered job discovery using the configured limits
    pub fn filtered_jobs(&self, client: impl Into<String>) -> FilteredJobsRequest {
        FilteredJobsRequest::new(client)
            .time_limit(self.discovery_time_limit)
            .retry_interval(self.discovery_retry_interval)
    }

    /// Active job lookup using the configured limits
    pub fn active_job_wait(&self, client: impl Into<String>) -> ActiveJobWait {
        ActiveJobWait::new(client)
            .time_limit(self.active_job_time_limit)
            .retry_interval(self.active_job_retry_interval)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}

fn env_secs(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_secs)
}

fn env_minutes(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(|minutes| Duration::from_secs(minutes * 60))
}
