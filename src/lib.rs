//! Library root for `marong-bot`.
//!
//! Marong-bot is a community-support assistant for Discord servers designed to:
//! - Answer frequently-asked questions exactly or by fuzzy match
//! - Open private inquiry channels with the bot or the operators
//! - Filter abusive and prompt-injection input before anything else runs
//! - Look up weekly gift-exchange pairings and summarize announcements
//! - Fall back to a language model, with short per-user history, for everything else
//!
//! The bot integrates with Discord for chat, SurrealDB for pairings,
//! and any OpenAI-compatible endpoint for completions. The architecture is built
//! around extensible traits that allow for different implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;
pub mod state;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::{info, warn};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the marong-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with database, LLM, and chat clients
/// - Starts the idle reaper and the main event loop
pub async fn start(config: Config) -> Void {
    info!("Starting marong-bot ...");

    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        warn!("A crypto provider was already installed.");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
