//! Error types for polling operations

use jobwatch_client::ClientError;
use jobwatch_core::domain::action::UnsupportedAction;
use jobwatch_core::domain::job::{JobId, JobStatus, StateSet};
use thiserror::Error;

/// Result type alias for poller operations
pub type Result<T> = std::result::Result<T, PollError>;

/// Errors raised while waiting on or modifying jobs
#[derive(Debug, Error)]
pub enum PollError {
    /// Action text outside suspend/resume/kill
    #[error(transparent)]
    UnsupportedAction(#[from] UnsupportedAction),

    /// The observed status is not one of the expected ones
    #[error("Job [{job_id}] validation failed: expected state {expected}, current state [{actual}]")]
    ValidationFailure {
        job_id: JobId,
        expected: StateSet,
        actual: JobStatus,
    },

    /// A wall-clock or attempt budget ran out
    #[error("Timed out waiting for {subject} to reach {target} (observed: {observed})")]
    Timeout {
        subject: String,
        target: String,
        observed: String,
    },

    /// The job finished while a phase was still awaited
    #[error("Job [{job_id}] finished with status [{status}] while waiting for phase [{phase}]")]
    PrematureFinish {
        job_id: JobId,
        phase: String,
        status: JobStatus,
    },

    /// The job is (or is not) held in the queue contrary to the client's activity setting
    #[error("Job [{job_id}] activity check failed: {detail}")]
    ActivityCheck { job_id: JobId, detail: String },

    /// The operation needs a collaborator the poller was built without
    #[error("No {0} configured for this poller")]
    MissingCollaborator(&'static str),

    /// An expected-error pattern is not a valid regular expression
    #[error("Invalid error pattern [{pattern}]: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The job-control API failed; never retried
    #[error("Remote call failed: {0}")]
    Remote(#[from] ClientError),
}

impl PollError {
    /// True for the "did not converge" family that `hardcheck = false` turns into `false`
    pub fn is_unmet(&self) -> bool {
        matches!(self, Self::ValidationFailure { .. } | Self::Timeout { .. })
    }

    /// Job id carried by the error, if any
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Self::ValidationFailure { job_id, .. }
            | Self::PrematureFinish { job_id, .. }
            | Self::ActivityCheck { job_id, .. } => Some(job_id),
            _ => None,
        }
    }
}

/// Adapter that applies a `hardcheck` flag to an outcome
///
/// With `hardcheck` set the outcome is returned unchanged. Without it, a
/// non-converged outcome becomes `Ok(false)`; every other error still propagates.
pub trait HardcheckExt {
    fn or_false(self, hardcheck: bool) -> Result<bool>;
}

impl HardcheckExt for Result<bool> {
    fn or_false(self, hardcheck: bool) -> Result<bool> {
        match self {
            Err(e) if !hardcheck && e.is_unmet() => Ok(false),
            other => other,
        }
    }
}
