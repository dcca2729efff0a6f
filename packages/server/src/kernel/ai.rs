// AI implementation using an OpenAI-compatible endpoint
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, StructuredRequest};

use super::BaseAI;

/// Default chat model for impact analysis.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for analysis; low for consistent scoring.
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// OpenAI-backed model bound to one chat model.
#[derive(Clone, Debug)]
pub struct OpenAIModel {
    client: OpenAIClient,
    model: String,
}

impl OpenAIModel {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for OpenAIModel {
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            prompt_length = user_prompt.len(),
            "Calling structured output"
        );

        let request = StructuredRequest::new(&self.model, system_prompt, user_prompt, schema)
            .schema_name("impact_assessment")
            .temperature(ANALYSIS_TEMPERATURE);

        // OpenAIError is kept as the source so callers can downcast for the kind
        let json = self.client.structured_output(request).await?;
        Ok(json)
    }

    async fn summarize_document(
        &self,
        instructions: &str,
        filename: &str,
        pdf: &[u8],
    ) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            filename = %filename,
            document_bytes = pdf.len(),
            "Calling document summary"
        );

        let request = ChatRequest::new(&self.model)
            .message(Message::user_with_pdf(instructions, filename, pdf))
            .temperature(ANALYSIS_TEMPERATURE);

        let summary = self.client.chat_completion(request).await?;
        Ok(summary.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name() {
        let model = OpenAIModel::new(OpenAIClient::new("sk-test"), DEFAULT_MODEL);
        assert_eq!(model.model_name(), "gpt-4o-mini");
    }
}
