//! LanguageGenerator -- "generate text given a prompt".
//!
//! The healing loop only ever sends a single prompt and reads back the
//! text. `LanguageGenerator` pins a provider to a model, temperature and
//! output budget so the primary and fallback variants can be configured
//! independently.

use tracing::{Instrument, debug, field, info_span};

use mendr_types::llm::{CompletionRequest, LlmError};

use super::box_provider::BoxLlmProvider;

/// A provider bound to fixed sampling settings.
pub struct LanguageGenerator {
    provider: BoxLlmProvider,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl LanguageGenerator {
    /// Create a generator. An empty `model` lets the provider use its default.
    ///
    /// `max_tokens` is capped at the provider's output limit.
    pub fn new(
        provider: BoxLlmProvider,
        model: impl Into<String>,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        let limit = provider.capabilities().max_output_tokens;
        if max_tokens > limit {
            debug!(
                provider = provider.name(),
                requested = max_tokens,
                limit,
                "Capping max_tokens at provider limit"
            );
        }
        Self {
            max_tokens: max_tokens.min(limit),
            provider,
            model: model.into(),
            temperature,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn build_request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        }
    }

    /// Send `prompt` and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = self.build_request(prompt);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.response.finish_reason = field::Empty,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
        );

        let response = self
            .provider
            .complete(&request)
            .instrument(span.clone())
            .await?;

        span.record("gen_ai.response.finish_reason", field::display(&response.stop_reason));
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
        Ok(response.content)
    }
}
