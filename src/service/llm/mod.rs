pub mod openai;

use crate::base::types::Res;
use async_trait::async_trait;
use std::{ops::Deref, sync::Arc};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// The bot only needs single-shot text completions: the prompt already
/// carries the FAQ context and conversation history.
/// Implementing this trait allows different LLM providers to be used with the marong-bot.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Complete a prompt, returning the generated text.
    async fn complete(&self, prompt: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
