//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for various services used by the marong-bot:
//! - Chat services (e.g., Discord)
//! - Database services (e.g., SurrealDB)
//! - LLM services (e.g., any OpenAI-compatible endpoint)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod db;
pub mod llm;

use std::{future::Future, time::Duration};

use tokio::time::timeout;

use crate::base::types::{BotError, Res};

/// Bound an external call, converting an elapsed wait into [`BotError::Timeout`].
pub async fn with_timeout<T, F>(label: &'static str, after: Duration, future: F) -> Res<T>
where
    F: Future<Output = Res<T>>,
{
    match timeout(after, future).await {
        Ok(result) => result,
        Err(_) => Err(BotError::Timeout { label, after }.into()),
    }
}
