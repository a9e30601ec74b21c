//! Verse fetching: the single I/O boundary of the quiz.
//!
//! - `HttpTransport` performs a raw GET and reports status + body
//! - `VerseFetcher` builds bible-api.com URLs, parses the JSON body and folds
//!   every failure into a `VerseRecord` instead of propagating it

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::{QuizConfig, Translation};
use crate::error::FetchError;

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Low-level HTTP abstraction.
///
/// Implementors perform one GET and return whatever the server answered.
/// Transport faults (DNS, connect, timeout) are reported as
/// `FetchError::Network`; non-2xx statuses are NOT errors at this level.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

#[derive(Debug, Deserialize)]
struct PassageResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    reference: String,
}

/// Normalized result of a verse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord {
    pub text: String,
    pub reference: String,
    pub version: Translation,
    pub success: bool,
    pub error: Option<FetchError>,
}

impl VerseRecord {
    fn found(text: String, reference: String, version: Translation) -> Self {
        Self {
            text,
            reference,
            version,
            success: true,
            error: None,
        }
    }

    fn failed(version: Translation, error: FetchError) -> Self {
        Self {
            text: String::new(),
            reference: String::new(),
            version,
            success: false,
            error: Some(error),
        }
    }
}

/// Fetches single verses from a bible-api.com compatible endpoint.
#[derive(Debug, Clone)]
pub struct VerseFetcher<T: HttpTransport> {
    transport: T,
    config: QuizConfig,
}

impl<T: HttpTransport> VerseFetcher<T> {
    pub fn new(transport: T, config: QuizConfig) -> Self {
        info!(api_base_url = %config.api_base_url, "Creating verse fetcher");
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// URL of a single verse, e.g. `https://bible-api.com/Juan+3:16?translation=rv1960`.
    pub fn verse_url(&self, book: &str, chapter: u32, verse: u32, translation: Translation) -> String {
        format!(
            "{}{}+{}:{}?translation={}",
            self.config.api_base_url,
            book,
            chapter,
            verse,
            translation.query_code()
        )
    }

    /// Look up one verse. Never fails: errors are carried in the record.
    #[instrument(skip(self, translation), fields(translation = %translation))]
    pub async fn fetch_verse(
        &self,
        book: &str,
        chapter: u32,
        verse: u32,
        translation: Translation,
    ) -> VerseRecord {
        let url = self.verse_url(book, chapter, verse, translation);
        debug!(url = %url, "Requesting verse");

        match self.try_fetch(&url).await {
            Ok(passage) => {
                info!(reference = %passage.reference, text_len = passage.text.len(), "Verse fetched");
                VerseRecord::found(passage.text.replace('\n', " "), passage.reference, translation)
            }
            Err(e) => {
                warn!(error = %e, url = %url, "Verse lookup failed");
                VerseRecord::failed(translation, e)
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<PassageResponse, FetchError> {
        let response = self.transport.get(url, self.config.fetch_timeout).await?;
        debug!(status = response.status, body_len = response.body.len(), "Received verse response");

        if response.status != 200 {
            return Err(FetchError::Status(response.status));
        }

        let value: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| FetchError::Decode(e.to_string()))?;
        if !value.is_object() {
            return Err(FetchError::Decode("expected a JSON object".to_string()));
        }

        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{MockResponse, MockTransport};

    fn fetcher() -> (VerseFetcher<MockTransport>, std::sync::Arc<crate::clients::mock::MockHandle>) {
        let (transport, handle) = MockTransport::new();
        (VerseFetcher::new(transport, QuizConfig::default()), handle)
    }

    #[test]
    fn test_verse_url_format() {
        let (fetcher, _) = fetcher();
        assert_eq!(
            fetcher.verse_url("Juan", 3, 16, Translation::Rv1960),
            "https://bible-api.com/Juan+3:16?translation=rv1960"
        );
        assert_eq!(
            fetcher.verse_url("1 Corintios", 13, 4, Translation::Kjv),
            "https://bible-api.com/1 Corintios+13:4?translation=kjv"
        );
    }

    #[tokio::test]
    async fn test_successful_fetch_collapses_newlines() {
        let (fetcher, handle) = fetcher();
        handle.add_response(MockResponse::json(
            200,
            r#"{"text": "Jehová es mi pastor;\nnada me faltará.\n", "reference": "Salmos 23:1", "translation_id": "rv1960"}"#,
        ));

        let record = fetcher.fetch_verse("Salmos", 23, 1, Translation::Rv1960).await;

        assert!(record.success);
        assert_eq!(record.error, None);
        assert_eq!(record.text, "Jehová es mi pastor; nada me faltará. ");
        assert_eq!(record.reference, "Salmos 23:1");
        assert_eq!(record.version, Translation::Rv1960);
        assert_eq!(handle.requests()[0].timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_empty() {
        let (fetcher, handle) = fetcher();
        handle.add_response(MockResponse::json(200, "{}"));

        let record = fetcher.fetch_verse("Juan", 3, 16, Translation::Rv1960).await;
        assert!(record.success);
        assert_eq!(record.text, "");
        assert_eq!(record.reference, "");
    }

    #[tokio::test]
    async fn test_non_200_is_generic_failure() {
        let (fetcher, handle) = fetcher();
        handle.add_response(MockResponse::json(404, r#"{"error": "not found"}"#));

        let record = fetcher.fetch_verse("Juan", 3, 16, Translation::Rv1960).await;
        assert!(!record.success);
        assert_eq!(record.error, Some(FetchError::Status(404)));
        assert!(record.text.is_empty());
    }

    #[tokio::test]
    async fn test_network_error_carries_message() {
        let (fetcher, handle) = fetcher();
        handle.add_response(MockResponse::NetworkError("operation timed out".to_string()));

        let record = fetcher.fetch_verse("Juan", 3, 16, Translation::Rv1960).await;
        assert!(!record.success);
        assert_eq!(
            record.error.map(|e| e.to_string()),
            Some("operation timed out".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_failure() {
        let (fetcher, handle) = fetcher();
        handle.add_response(MockResponse::json(200, "<html>oops</html>"));

        let record = fetcher.fetch_verse("Juan", 3, 16, Translation::Rv1960).await;
        assert!(matches!(record.error, Some(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_non_object_body_is_decode_failure() {
        let (fetcher, handle) = fetcher();
        handle.add_responses([
            MockResponse::json(200, "[]"),
            MockResponse::json(200, r#"["x", "y"]"#),
            MockResponse::json(200, r#""just a string""#),
        ]);

        for _ in 0..3 {
            let record = fetcher.fetch_verse("Juan", 3, 16, Translation::Rv1960).await;
            assert!(!record.success);
            assert!(record.text.is_empty());
            assert!(matches!(record.error, Some(FetchError::Decode(_))));
        }
    }

    #[tokio::test]
    async fn test_non_string_text_is_decode_failure() {
        let (fetcher, handle) = fetcher();
        handle.add_response(MockResponse::json(200, r#"{"text": 42, "reference": "Juan 3:16"}"#));

        let record = fetcher.fetch_verse("Juan", 3, 16, Translation::Rv1960).await;
        assert!(matches!(record.error, Some(FetchError::Decode(_))));
    }
}
