//! Core components, types, and utilities for the marong-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Built-in word lists, FAQ tables, and canned replies.
//! - Prompt templates for completion service calls.
//! - Common types and result handling.

pub mod config;
pub mod constants;
pub mod prompts;
pub mod types;
