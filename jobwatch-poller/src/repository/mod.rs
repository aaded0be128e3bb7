//! Repository layer
//!
//! Repositories abstract the remote collaborators the poller depends on:
//! one job, the directory of jobs, and the directory of clients. They carry no
//! polling logic of their own.
//!
//! All repositories are trait-based so pollers can be driven by scripted
//! collaborators in tests.

mod clients;
mod directory;
mod jobs;

// Re-export traits
pub use clients::ClientDirectory;
pub use directory::JobDirectory;
pub use jobs::JobResource;

// Re-export implementations
pub use clients::HttpClientDirectory;
pub use directory::HttpJobDirectory;
pub use jobs::HttpJob;
