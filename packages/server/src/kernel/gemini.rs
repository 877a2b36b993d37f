// AI implementation using Gemini
//
// This is the infrastructure implementation of BaseAI.
// Menu prompts and the flat schema live in domains/menus.

use async_trait::async_trait;
use gemini_client::{
    truncate_to_char_boundary, GeminiClient, GeminiError, GenerateContentRequest, GenerationConfig,
};
use tracing::{error, info};

use super::{BaseAI, StructuredPrompt};
use crate::common::ExtractionError;
use crate::config::Config;

/// Gemini implementation of AI capabilities
#[derive(Clone)]
pub struct GeminiAI {
    /// `None` when no credential is configured; every call then fails fast.
    client: Option<GeminiClient>,
    model: String,
}

impl GeminiAI {
    pub fn new(client: Option<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = config.gemini_api_key.as_ref().map(|key| {
            GeminiClient::new(key.clone())
                .with_base_url(config.gemini_base_url.clone())
                .with_timeout(config.model_timeout)
        });
        Self::new(client, config.gemini_model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl From<GeminiError> for ExtractionError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::Timeout(timeout_secs) => ExtractionError::Timeout { timeout_secs },
            other => ExtractionError::Remote(other.to_string()),
        }
    }
}

#[async_trait]
impl BaseAI for GeminiAI {
    async fn generate_structured(
        &self,
        prompt: &StructuredPrompt,
    ) -> Result<String, ExtractionError> {
        let Some(client) = self.client.as_ref() else {
            error!("GEMINI_API_KEY is missing");
            return Err(ExtractionError::MissingCredential);
        };

        let request = GenerateContentRequest::new(prompt.user_prompt.clone())
            .system_instruction(prompt.system_instruction.clone())
            .generation_config(
                GenerationConfig {
                    temperature: Some(prompt.temperature),
                    top_k: Some(prompt.top_k),
                    top_p: Some(prompt.top_p),
                    max_output_tokens: Some(prompt.max_output_tokens),
                    ..Default::default()
                }
                .json_schema(prompt.response_schema.clone()),
            );

        info!(
            model = %self.model,
            prompt_length = prompt.user_prompt.len(),
            "Calling Gemini API"
        );

        let response = client
            .generate_content(&self.model, &request)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    model = %self.model,
                    prompt_preview = %truncate_to_char_boundary(&prompt.user_prompt, 200),
                    "Gemini API call failed"
                );
                ExtractionError::from(e)
            })?;

        let text = response.text().ok_or(ExtractionError::EmptyResponse)?;

        info!(
            response_length = text.len(),
            finish_reason = ?response.finish_reason(),
            model = %self.model,
            "Gemini API response received"
        );

        Ok(text)
    }
}
