// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{BaseAI, BasePageFetcher, ServerDeps, StructuredPrompt};
use crate::common::{ExtractionError, FetchError};
use crate::config::Config;

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Canned outcome for one URL
#[derive(Debug, Clone)]
pub enum MockPage {
    Html(String),
    /// Sleep, then return the HTML
    Delayed(Duration, String),
    Status(u16),
    Timeout,
    /// Panic inside the fetch, as a buggy dependency would
    Panic,
}

pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, MockPage>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `html` for `url`
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.with_outcome(url, MockPage::Html(html.to_string()))
    }

    pub fn with_outcome(self, url: &str, outcome: MockPage) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), outcome);
        self
    }

    /// Get all URLs that were fetched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let outcome = self.pages.lock().unwrap().get(url).cloned();
        match outcome {
            Some(MockPage::Html(html)) => Ok(html),
            Some(MockPage::Delayed(delay, html)) => {
                tokio::time::sleep(delay).await;
                Ok(html)
            }
            Some(MockPage::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MockPage::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout_secs: 10,
            }),
            Some(MockPage::Panic) => panic!("mock fetcher panicked for {}", url),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

// =============================================================================
// Mock AI
// =============================================================================

/// Canned model outcome
#[derive(Debug, Clone)]
pub enum MockAIResponse {
    Text(String),
    Empty,
    Timeout,
    MissingCredential,
}

pub struct MockAI {
    /// (needle, response): first entry whose needle appears in the user prompt wins
    routed: Arc<Mutex<Vec<(String, MockAIResponse)>>>,
    fallback: Arc<Mutex<Option<MockAIResponse>>>,
    calls: Arc<Mutex<Vec<StructuredPrompt>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            routed: Arc::new(Mutex::new(Vec::new())),
            fallback: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Response for every prompt not matched by `with_response_for`
    pub fn with_response(self, response: impl Into<String>) -> Self {
        *self.fallback.lock().unwrap() = Some(MockAIResponse::Text(response.into()));
        self
    }

    /// Respond with `response` when the user prompt contains `needle`
    pub fn with_response_for(self, needle: &str, response: impl Into<String>) -> Self {
        self.with_outcome_for(needle, MockAIResponse::Text(response.into()))
    }

    pub fn with_outcome_for(self, needle: &str, outcome: MockAIResponse) -> Self {
        self.routed
            .lock()
            .unwrap()
            .push((needle.to_string(), outcome));
        self
    }

    pub fn with_fallback_outcome(self, outcome: MockAIResponse) -> Self {
        *self.fallback.lock().unwrap() = Some(outcome);
        self
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<StructuredPrompt> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the last prompt sent to the AI
    pub fn last_prompt(&self) -> Option<StructuredPrompt> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Check if a user prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.user_prompt.contains(text))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn generate_structured(
        &self,
        prompt: &StructuredPrompt,
    ) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(prompt.clone());

        let routed = self
            .routed
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.user_prompt.contains(needle.as_str()))
            .map(|(_, outcome)| outcome.clone());
        let outcome = routed.or_else(|| self.fallback.lock().unwrap().clone());

        match outcome {
            Some(MockAIResponse::Text(text)) => Ok(text),
            Some(MockAIResponse::Empty) | None => Err(ExtractionError::EmptyResponse),
            Some(MockAIResponse::Timeout) => Err(ExtractionError::Timeout { timeout_secs: 300 }),
            Some(MockAIResponse::MissingCredential) => Err(ExtractionError::MissingCredential),
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub config: Config,
    pub fetcher: Arc<MockPageFetcher>,
    pub ai: Arc<MockAI>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            config: Config {
                gemini_api_key: Some("test-key".to_string()),
                log_level_raw: Some("error".to_string()),
                ..Config::default()
            },
            fetcher: Arc::new(MockPageFetcher::new()),
            ai: Arc::new(MockAI::new()),
        }
    }

    /// Set a mock page fetcher
    pub fn mock_fetcher(mut self, fetcher: MockPageFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Replace the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(Arc::new(self.config), self.fetcher, self.ai)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
