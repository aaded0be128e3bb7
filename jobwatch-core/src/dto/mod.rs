//! Data Transfer Objects for the job-control API
//!
//! Lightweight request and query shapes sent to the server. Responses are
//! deserialized straight into domain types.

pub mod job;
