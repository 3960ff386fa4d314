//! Event handling and user interactions for marong-bot.
//!
//! This module provides functionality for handling chat and member events:
//! - Classifying and routing incoming messages to a single handler
//! - Answering from the FAQ, the pairing store, or the completion service
//! - Managing private inquiry channels and reaping idle ones
//! - Greeting new members and keeping inquiry transcripts

pub mod chat_event;
pub mod classifier;
pub mod faq;
pub mod handlers;
pub mod help;
pub mod inquiry;
pub mod reaper;
pub mod router;
pub mod transcript;
pub mod week;
pub mod welcome;
