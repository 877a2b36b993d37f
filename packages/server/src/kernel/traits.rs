// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no menu logic.
// What to prompt for and how to read the answer lives in domains/menus.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BasePageFetcher)

use async_trait::async_trait;

use crate::common::{ExtractionError, FetchError};

// =============================================================================
// Page Fetcher Trait (Infrastructure - HTTP GET)
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch a page and return its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

// =============================================================================
// AI Trait (Infrastructure - schema-constrained generation)
// =============================================================================

/// Everything the model needs for one schema-constrained call.
#[derive(Debug, Clone)]
pub struct StructuredPrompt {
    pub system_instruction: String,
    pub user_prompt: String,
    /// Response schema in the model's schema dialect
    pub response_schema: serde_json::Value,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Generate JSON text for the prompt. Returns the raw text; parsing is the caller's job.
    async fn generate_structured(
        &self,
        prompt: &StructuredPrompt,
    ) -> Result<String, ExtractionError>;
}
