//! Integration with Large Language Model services.
//!
//! This module provides a thin wrapper around any OpenAI-compatible chat
//! completions endpoint, used to answer questions the FAQ does not cover
//! and to summarize announcements.

use std::sync::Arc;

use crate::base::{config::Config, types::Res};
use anyhow::anyhow;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse},
};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone()).with_api_base(config.openai_api_base.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build the chat completion request for a prompt.
    ///
    /// Prompts are self-contained, so the request holds a single user message.
    fn build_request(&self, prompt: &str) -> Res<CreateChatCompletionRequest> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.openai_model)
            .temperature(self.config.openai_temperature)
            .max_completion_tokens(self.config.openai_max_tokens)
            .messages([ChatCompletionRequestUserMessageArgs::default().content(prompt).build()?.into()])
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    /// Single attempt; the caller bounds the call with a timeout and reports failures.
    #[instrument(name = "OpenAiLlmClient::complete", skip_all)]
    async fn complete(&self, prompt: &str) -> Res<String> {
        let request = self.build_request(prompt)?;

        let response = self.client.chat().create(request).await.map_err(|e| anyhow!("OpenAI API call failed: {e}"))?;

        parse_openai_response(&response)
    }
}

/// Extract the text of the first choice.
#[instrument(skip_all)]
pub fn parse_openai_response(response: &CreateChatCompletionResponse) -> Res<String> {
    info!("LLM response has {} choices.", response.choices.len());

    let content = response.choices.first().and_then(|choice| choice.message.content.as_deref()).map(str::trim).unwrap_or_default();

    if content.is_empty() {
        warn!("LLM response has no text content.");
        return Err(anyhow!("LLM returned an empty response"));
    }

    Ok(content.to_string())
}

// Tests.
