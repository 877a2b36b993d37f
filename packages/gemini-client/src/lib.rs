//! Pure Google Gemini REST API client
//!
//! A clean, minimal client for the Gemini `generateContent` API with no
//! domain-specific logic. Supports system instructions, decoding parameters
//! and schema-constrained JSON output.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use gemini_client::{GeminiClient, GenerateContentRequest, GenerationConfig, StructuredOutput};
//!
//! let client = GeminiClient::new(api_key).with_timeout(Duration::from_secs(60));
//!
//! let request = GenerateContentRequest::new("List three soups as JSON")
//!     .system_instruction("You are a menu assistant")
//!     .generation_config(GenerationConfig::default().json_schema(Soups::gemini_schema()));
//!
//! let response = client.generate_content("gemini-2.5-flash", &request).await?;
//! let text = response.text();
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{GeminiError, Result};
pub use schema::{schema_depth, StructuredOutput};
pub use types::*;

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout. Generation latency is unpredictable, so this is long.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom base URL (for proxies, regional endpoints, test stubs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Call `generateContent` on `model`.
    ///
    /// Returns the decoded response envelope; use [`GenerateContentResponse::text`]
    /// to get the generated text.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&error_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_text);
            warn!(status = %status, error = %message, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let decoded: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to decode response: {}", e)))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis(),
            finish_reason = ?decoded.finish_reason(),
            total_tokens = decoded.usage_metadata.as_ref().map(|u| u.total_token_count),
            "Gemini generateContent"
        );

        Ok(decoded)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GeminiError {
        if e.is_timeout() {
            warn!(timeout_secs = self.timeout.as_secs(), "Gemini request timed out");
            GeminiError::Timeout(self.timeout.as_secs())
        } else {
            warn!(error = %e, "Gemini request failed");
            GeminiError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key")
            .with_base_url("https://custom.api.com/v1beta/")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(client.api_key(), "test-key");
        assert_eq!(client.base_url(), "https://custom.api.com/v1beta");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_defaults() {
        let client = GeminiClient::new("k");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = GeminiClient::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(5));

        let result = client
            .generate_content("any-model", &GenerateContentRequest::new("hi"))
            .await;

        assert!(matches!(
            result,
            Err(GeminiError::Network(_)) | Err(GeminiError::Timeout(_))
        ));
    }
}
