//! Jobwatch Core
//!
//! Core types shared by the jobwatch client, poller and CLI.
//!
//! This crate contains:
//! - Domain types: remote job state as observed by the poller (status, snapshots, actions)
//! - DTOs: request and query shapes sent to the job-control API

pub mod domain;
pub mod dto;
