//! State-changing actions a caller can request on a job

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::job::JobStatus;

/// Mutation requested on one job or on every job of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Suspend,
    Resume,
    Kill,
}

/// Text that does not name a supported [`Action`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported action [{0}], supported values: suspend, resume, kill")]
pub struct UnsupportedAction(pub String);

impl Action {
    /// Status the job reports once the action has taken effect
    pub fn expected_status(self) -> JobStatus {
        match self {
            Action::Suspend => JobStatus::Suspended,
            Action::Resume => JobStatus::Running,
            Action::Kill => JobStatus::Killed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Suspend => "suspend",
            Action::Resume => "resume",
            Action::Kill => "kill",
        }
    }

    /// Progressive form used in log lines ("Killing job ...")
    pub fn progressive(self) -> &'static str {
        match self {
            Action::Suspend => "Suspending",
            Action::Resume => "Resuming",
            Action::Kill => "Killing",
        }
    }

    /// Past participle used in log lines ("killed all jobs")
    pub fn past(self) -> &'static str {
        match self {
            Action::Suspend => "suspended",
            Action::Resume => "resumed",
            Action::Kill => "killed",
        }
    }
}

impl FromStr for Action {
    type Err = UnsupportedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suspend" => Ok(Action::Suspend),
            "resume" => Ok(Action::Resume),
            "kill" => Ok(Action::Kill),
            _ => Err(UnsupportedAction(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
