//! Jobwatch Poller
//!
//! Blocking, retryable convergence on the state of remote jobs.
//!
//! Architecture:
//! - Repositories: traits for the remote job, job directory and client directory,
//!   with HTTP implementations backed by [`jobwatch_client::JobControlClient`]
//! - Poller: [`JobPoller`], which polls those collaborators until a job reaches a
//!   target state, phase or progress, or a deadline expires
//! - Configuration: default intervals and limits, loadable from the environment
//!
//! Every wait sleeps on the calling task between polls; nothing is spawned.

pub mod config;
pub mod error;
pub mod poller;
pub mod repository;

#[cfg(test)]
mod testing;

pub use config::PollerConfig;
pub use error::{HardcheckExt, PollError, Result};
pub use poller::{
    ActiveJobWait, FilteredJobs, FilteredJobsRequest, JobPoller, PhaseWait, PollRequest,
    ProgressWait,
};
pub use repository::{ClientDirectory, JobDirectory, JobResource};
