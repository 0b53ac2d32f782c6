//! Language model backed by an OpenAI-compatible chat-completions endpoint.

use super::LanguageModel;
use crate::error::{EkkoError, Result};
use crate::openai::HostedApi;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Sends each prompt as a single user message, no history.
pub struct ChatCompletionModel {
    api: HostedApi,
    model: String,
    temperature: Option<f32>,
}

impl ChatCompletionModel {
    pub fn new(api: HostedApi, model: &str) -> Self {
        Self {
            api,
            model: model.to_string(),
            temperature: None,
        }
    }

    /// Override the provider's default sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionModel {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| EkkoError::InvalidArgument(e.to_string()))?
                .into(),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        let request = builder
            .build()
            .map_err(|e| EkkoError::InvalidArgument(e.to_string()))?;

        let response = self.api.client().chat().create(request).await.map_err(|e| {
            EkkoError::ModelUnavailable(format!("chat completion failed: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| EkkoError::ModelUnavailable("empty response from LLM".to_string()))?
            .clone();

        debug!("Completion received ({} characters)", answer.len());
        Ok(answer)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
