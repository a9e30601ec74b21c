use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument};

use crate::core::{HttpResponse, HttpTransport};
use crate::error::FetchError;

/// `HttpTransport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self), fields(timeout_secs = timeout.as_secs()))]
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        debug!("Sending GET request");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                FetchError::Network(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, status, "Failed to read response body");
            FetchError::Network(e.to_string())
        })?;

        debug!(status, body_len = body.len(), "Received HTTP response");
        Ok(HttpResponse { status, body })
    }
}
