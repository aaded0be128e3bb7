//! Client directory repository

use std::sync::Arc;

use async_trait::async_trait;
use jobwatch_client::{JobControlClient, Result};

/// Repository trait for client lookups
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Whether a client with this name exists on the server
    async fn has_client(&self, name: &str) -> Result<bool>;
}

/// HTTP implementation of ClientDirectory
pub struct HttpClientDirectory {
    client: Arc<JobControlClient>,
}

impl HttpClientDirectory {
    pub fn new(client: Arc<JobControlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClientDirectory for HttpClientDirectory {
    async fn has_client(&self, name: &str) -> Result<bool> {
        self.client.has_client(name).await
    }
}
