//! Core domain types
//!
//! These types describe jobs owned by the remote server. Nothing here mutates a job;
//! they are read-only views deserialized from the job-control API.

pub mod action;
pub mod job;
