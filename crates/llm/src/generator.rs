use crate::client::{extract_generated_text, GenOverrides, HfClient, LlmError};
use crate::prompts;
use async_trait::async_trait;

/// Capability seam between the pipelines and the hosted inference service:
/// submit a prompt, receive text or an error. Pipelines only ever see this
/// trait, so tests swap in a scripted generator without touching HTTP.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, overrides: &GenOverrides) -> Result<String, LlmError>;

    async fn generate_documentation(
        &self,
        code: &str,
        doc_type: &str,
    ) -> Result<String, LlmError> {
        self.generate(
            &prompts::documentation(code, doc_type),
            &GenOverrides::max_length(800),
        )
        .await
    }

    async fn explain_concept(&self, concept: &str, context: &str) -> Result<String, LlmError> {
        self.generate(
            &prompts::explain_concept(concept, context),
            &GenOverrides::max_length(600),
        )
        .await
    }

    async fn generate_calculation_report(
        &self,
        params_json: &str,
        results_json: &str,
        code_standard: &str,
    ) -> Result<String, LlmError> {
        self.generate(
            &prompts::calculation_report(params_json, results_json, code_standard),
            &GenOverrides::max_length(1000),
        )
        .await
    }

    async fn answer_technical_question(
        &self,
        question: &str,
        context: &str,
    ) -> Result<String, LlmError> {
        self.generate(
            &prompts::technical_question(question, context),
            &GenOverrides::max_length(800),
        )
        .await
    }
}

#[async_trait]
impl TextGenerator for HfClient {
    async fn generate(&self, prompt: &str, overrides: &GenOverrides) -> Result<String, LlmError> {
        let value = self.query(prompt, overrides).await?;
        Ok(extract_generated_text(&value))
    }
}
