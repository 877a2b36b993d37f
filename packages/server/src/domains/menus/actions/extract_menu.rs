//! Ask the model for the flat menu shape.

use std::time::Instant;

use gemini_client::StructuredOutput;
use lazy_static::lazy_static;
use tracing::{debug, info};

use super::ReducedContent;
use crate::common::ExtractionError;
use crate::domains::menus::models::FlatMenuResponse;
use crate::domains::menus::prompts::{build_user_prompt, MENU_EXTRACTION_INSTRUCTION};
use crate::kernel::{BaseAI, StructuredPrompt};

/// Near-deterministic sampling for extraction
pub const TEMPERATURE: f32 = 0.1;
pub const TOP_K: u32 = 1;
pub const TOP_P: f32 = 1.0;
pub const MAX_OUTPUT_TOKENS: u32 = 16_384;

lazy_static! {
    static ref FLAT_RESPONSE_SCHEMA: serde_json::Value = FlatMenuResponse::gemini_schema();
}

/// Assemble the model call for one page.
pub fn build_extraction_prompt(content: &ReducedContent) -> StructuredPrompt {
    StructuredPrompt {
        system_instruction: MENU_EXTRACTION_INSTRUCTION.to_string(),
        user_prompt: build_user_prompt(content),
        response_schema: FLAT_RESPONSE_SCHEMA.clone(),
        temperature: TEMPERATURE,
        top_k: TOP_K,
        top_p: TOP_P,
        max_output_tokens: MAX_OUTPUT_TOKENS,
    }
}

/// Run the extraction call and return the model's raw text.
pub async fn request_menu_extraction(
    ai: &dyn BaseAI,
    content: &ReducedContent,
    url: &str,
) -> Result<String, ExtractionError> {
    let prompt = build_extraction_prompt(content);
    debug!(
        url = %url,
        content_kind = content.kind(),
        prompt_len = prompt.user_prompt.len(),
        "Sending page to model"
    );

    let start = Instant::now();
    let raw = ai.generate_structured(&prompt).await?;

    info!(
        url = %url,
        response_len = raw.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Model response received"
    );
    Ok(raw)
}
