use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::{HttpResponse, HttpTransport};
use crate::error::FetchError;

/// Canned answer for one request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Http(HttpResponse),
    NetworkError(String),
}

impl MockResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        MockResponse::Http(HttpResponse::new(status, body))
    }
}

/// A request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub timeout: Duration,
}

/// Shared control side of a `MockTransport`: queue responses, inspect requests.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHandle {
    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        self.responses.lock().unwrap().extend(responses);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    fn next(&self, url: &str, timeout: Duration) -> Option<MockResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            timeout,
        });
        self.responses.lock().unwrap().pop_front()
    }
}

/// In-memory transport for tests. Responses are served in FIFO order; an
/// empty queue behaves like an unreachable host.
#[derive(Debug, Clone)]
pub struct MockTransport {
    handle: Arc<MockHandle>,
}

impl MockTransport {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (transport, handle) = Self::new();
        handle.add_responses(responses);
        (transport, handle)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        match self.handle.next(url, timeout) {
            Some(MockResponse::Http(response)) => Ok(response),
            Some(MockResponse::NetworkError(message)) => Err(FetchError::Network(message)),
            None => Err(FetchError::Network("mock response queue is empty".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_served_in_order_and_recorded() {
        let (transport, handle) = MockTransport::with_responses(vec![
            MockResponse::json(200, "first"),
            MockResponse::NetworkError("down".to_string()),
        ]);

        let first = transport.get("http://a/", Duration::from_secs(1)).await;
        let second = transport.get("http://b/", Duration::from_secs(2)).await;
        let third = transport.get("http://c/", Duration::from_secs(3)).await;

        assert_eq!(first, Ok(HttpResponse::new(200, "first")));
        assert_eq!(second, Err(FetchError::Network("down".to_string())));
        assert!(third.is_err());
        assert_eq!(handle.remaining(), 0);

        let urls: Vec<String> = handle.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["http://a/", "http://b/", "http://c/"]);
    }
}
