use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, instrument, warn};

use crate::config::{ApiEndpoint, QuizConfig};
use crate::core::HttpTransport;

/// Known-good passage used as a liveness check.
pub const PROBE_PATH: &str = "John+3:16";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Error,
    NoConnection,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Error => write!(f, "Error"),
            ConnectionStatus::NoConnection => write!(f, "No connection"),
        }
    }
}

/// Probe the verse API. Only the Bible API is checked; the result map is
/// keyed by API name.
#[instrument(skip(transport, config), fields(api_base_url = %config.api_base_url))]
pub async fn check_api_status<T: HttpTransport>(
    transport: &T,
    config: &QuizConfig,
) -> BTreeMap<String, ConnectionStatus> {
    let url = format!("{}{}", config.api_base_url, PROBE_PATH);

    let status = match transport.get(&url, config.probe_timeout).await {
        Ok(response) if response.status == 200 => ConnectionStatus::Connected,
        Ok(response) => {
            warn!(status = response.status, "API probe returned an error status");
            ConnectionStatus::Error
        }
        Err(e) => {
            warn!(error = %e, "API probe could not connect");
            ConnectionStatus::NoConnection
        }
    };

    info!(api = ApiEndpoint::BibleApi.name(), %status, "API status checked");
    let mut result = BTreeMap::new();
    result.insert(ApiEndpoint::BibleApi.name().to_string(), status);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{MockResponse, MockTransport};
    use std::time::Duration;

    async fn probe(response: MockResponse) -> (BTreeMap<String, ConnectionStatus>, Vec<crate::clients::RecordedRequest>) {
        let (transport, handle) = MockTransport::with_responses(vec![response]);
        let status = check_api_status(&transport, &QuizConfig::default()).await;
        (status, handle.requests())
    }

    #[tokio::test]
    async fn test_probe_connected() {
        let (status, requests) = probe(MockResponse::json(200, "{}")).await;
        assert_eq!(status.get("Bible API"), Some(&ConnectionStatus::Connected));
        assert_eq!(status.len(), 1);
        assert_eq!(requests[0].url, "https://bible-api.com/John+3:16");
        assert_eq!(requests[0].timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_probe_error_status() {
        let (status, _) = probe(MockResponse::json(503, "")).await;
        assert_eq!(status.get("Bible API"), Some(&ConnectionStatus::Error));
    }

    #[tokio::test]
    async fn test_probe_no_connection() {
        let (status, _) = probe(MockResponse::NetworkError("dns failure".to_string())).await;
        assert_eq!(status.get("Bible API"), Some(&ConnectionStatus::NoConnection));
        assert!(status.get("Open Bible API").is_none());
    }
}
