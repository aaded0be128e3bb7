//! Job domain types

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque job identifier assigned by the server
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Job status as reported by the server
///
/// The wire carries free text; parsing is case-insensitive and never fails.
/// Values outside the known set are kept verbatim (lower-cased) in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Running,
    Waiting,
    Suspended,
    Completed,
    Killed,
    Failed,
    CompletedWithErrors,
    Queued,
    Pending,
    Other(String),
}

impl JobStatus {
    /// Canonical lower-case wire form
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Waiting => "waiting",
            JobStatus::Suspended => "suspended",
            JobStatus::Completed => "completed",
            JobStatus::Killed => "killed",
            JobStatus::Failed => "failed",
            JobStatus::CompletedWithErrors => "completed w/ one or more errors",
            JobStatus::Queued => "queued",
            JobStatus::Pending => "pending",
            JobStatus::Other(other) => other,
        }
    }

    /// True once the job cannot transition any further
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed
                | JobStatus::Killed
                | JobStatus::Failed
                | JobStatus::CompletedWithErrors
        )
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "running" => JobStatus::Running,
            "waiting" => JobStatus::Waiting,
            "suspended" => JobStatus::Suspended,
            "completed" => JobStatus::Completed,
            "killed" => JobStatus::Killed,
            "failed" => JobStatus::Failed,
            "completed w/ one or more errors" => JobStatus::CompletedWithErrors,
            "queued" => JobStatus::Queued,
            "pending" => JobStatus::Pending,
            _ => JobStatus::Other(normalized),
        }
    }
}

impl FromStr for JobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JobStatus::from(s))
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        JobStatus::from(value.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of acceptable statuses, compared case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSet(BTreeSet<JobStatus>);

impl StateSet {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<JobStatus>,
    {
        Self(states.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, status: &JobStatus) -> bool {
        self.0.contains(status)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<JobStatus> for StateSet {
    fn from(value: JobStatus) -> Self {
        Self::new([value])
    }
}

impl From<&str> for StateSet {
    fn from(value: &str) -> Self {
        Self::new([value])
    }
}

impl<const N: usize> From<[&str; N]> for StateSet {
    fn from(value: [&str; N]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<String>> for StateSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<&str> = self.0.iter().map(JobStatus::as_str).collect();
        write!(f, "[{}]", states.join(", "))
    }
}

/// Point-in-time view of a single job
///
/// One `GET` of the job yields one snapshot; the poller never combines fields
/// from different round trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub progress_percent: u8,
    #[serde(default)]
    pub delay_reason: Option<String>,
    #[serde(default)]
    pub pending_reason: Option<String>,
    /// Per-item failure reasons, each possibly holding several newline separated errors
    #[serde(default)]
    pub failure_reasons: Vec<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
}

impl JobSnapshot {
    pub fn new(id: impl Into<JobId>, status: impl Into<JobStatus>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            phase: String::new(),
            progress_percent: 0,
            delay_reason: None,
            pending_reason: None,
            failure_reasons: Vec::new(),
            job_type: None,
            client: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    pub fn with_progress(mut self, percent: u8) -> Self {
        self.progress_percent = percent.min(100);
        self
    }

    pub fn with_delay_reason(mut self, reason: impl Into<String>) -> Self {
        self.delay_reason = Some(reason.into());
        self
    }

    pub fn with_pending_reason(mut self, reason: impl Into<String>) -> Self {
        self.pending_reason = Some(reason.into());
        self
    }

    pub fn with_failure_reasons<I, S>(mut self, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failure_reasons = reasons.into_iter().map(Into::into).collect();
        self
    }
}

/// One entry of a job listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub backup_level: Option<String>,
    #[serde(default)]
    pub progress_percent: u8,
    #[serde(default)]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl JobSummary {
    pub fn new(id: impl Into<JobId>, status: impl Into<JobStatus>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            job_type: None,
            client: None,
            backup_level: None,
            progress_percent: 0,
            started_at: None,
        }
    }

    pub fn with_backup_level(mut self, level: impl Into<String>) -> Self {
        self.backup_level = Some(level.into());
        self
    }

    /// Case-insensitive exact match on the backup level
    pub fn has_backup_level(&self, level: &str) -> bool {
        self.backup_level
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(JobStatus::from("Running"), JobStatus::Running);
        assert_eq!(JobStatus::from("KILLED"), JobStatus::Killed);
        assert_eq!(
            JobStatus::from("Completed w/ one or more errors"),
            JobStatus::CompletedWithErrors
        );
        assert_eq!(
            JobStatus::from("Interrupt Pending"),
            JobStatus::Other("interrupt pending".to_string())
        );
    }

    #[test]
    fn test_terminal_classification() {
        assert!(JobStatus::Completed.is_finished());
        assert!(JobStatus::Failed.is_finished());
        assert!(JobStatus::CompletedWithErrors.is_finished());
        assert!(!JobStatus::Suspended.is_finished());
        assert!(!JobStatus::Other("committed".into()).is_finished());
    }

    #[test]
    fn test_state_set_normalizes() {
        let set = StateSet::from(["Waiting", "RUNNING"]);
        assert!(set.contains(&JobStatus::Running));
        assert!(set.contains(&JobStatus::Waiting));
        assert!(!set.contains(&JobStatus::Completed));
        assert_eq!(set.to_string(), "[running, waiting]");
    }

    #[test]
    fn test_snapshot_deserializes_wire_status() {
        let snapshot: JobSnapshot = serde_json::from_value(serde_json::json!({
            "id": "4127",
            "status": "Completed w/ one or more errors",
            "phase": "Restore",
            "progress_percent": 100
        }))
        .unwrap();

        assert_eq!(snapshot.id, JobId::from("4127"));
        assert_eq!(snapshot.status, JobStatus::CompletedWithErrors);
        assert!(snapshot.is_finished());
        assert!(snapshot.failure_reasons.is_empty());
    }

    #[test]
    fn test_backup_level_match() {
        let summary = JobSummary::new("1", "running").with_backup_level("Incremental");
        assert!(summary.has_backup_level("incremental"));
        assert!(!summary.has_backup_level("full"));
        assert!(!JobSummary::new("2", "running").has_backup_level("full"));
    }
}
