//! Client (protected machine) lookups

use tracing::debug;

use crate::error::Result;
use crate::{JobControlClient, check_status};

impl JobControlClient {
    /// Check whether a client with this name is registered on the server
    ///
    /// A 404 answer means the client does not exist; any other failure is an error.
    pub async fn has_client(&self, name: &str) -> Result<bool> {
        let url = self.url(&format!("clients/{}", name));
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        match check_status(response, || format!("client {}", name)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
