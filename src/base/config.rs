//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::PathBuf, sync::Arc, time::Duration};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::base::constants;

use super::types::Res;

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn to_entries(items: &[(&str, &str)]) -> Vec<FaqEntry> {
    items
        .iter()
        .map(|(question, answer)| FaqEntry {
            question: question.to_string(),
            answer: answer.to_string(),
        })
        .collect()
}

/// Default OpenAI-compatible endpoint (Gemini's compatibility layer).
fn default_openai_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

/// Default completion model.
fn default_openai_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Default sampling temperature for the completion model.
fn default_openai_temperature() -> f32 {
    0.7
}

/// Default max output tokens for the completion model.
fn default_openai_max_tokens() -> u32 {
    2048
}

/// Default database endpoint (in-memory).
fn default_db_endpoint() -> String {
    "mem://".to_string()
}

fn default_db_namespace() -> String {
    "marong".to_string()
}

fn default_db_database() -> String {
    "bot".to_string()
}

fn default_blocked_words() -> Vec<String> {
    to_strings(constants::BLOCKED_WORDS)
}

fn default_injection_keywords() -> Vec<String> {
    to_strings(constants::INJECTION_KEYWORDS)
}

fn default_gratitude_words() -> Vec<String> {
    to_strings(constants::GRATITUDE_WORDS)
}

fn default_help_aliases() -> Vec<String> {
    to_strings(constants::HELP_ALIASES)
}

fn default_pairing_keywords() -> Vec<String> {
    to_strings(constants::PAIRING_KEYWORDS)
}

fn default_notice_keywords() -> Vec<String> {
    to_strings(constants::NOTICE_KEYWORDS)
}

fn default_pause_keywords() -> Vec<String> {
    to_strings(constants::PAUSE_KEYWORDS)
}

fn default_faq() -> Vec<FaqEntry> {
    to_entries(constants::FAQ)
}

fn default_help_faq() -> Vec<FaqEntry> {
    to_entries(constants::HELP_FAQ)
}

fn default_inquiry_command() -> String {
    constants::INQUIRY_COMMAND.to_string()
}

fn default_operator_inquiry_command() -> String {
    constants::OPERATOR_INQUIRY_COMMAND.to_string()
}

fn default_inquiry_channel_prefix() -> String {
    constants::INQUIRY_CHANNEL_PREFIX.to_string()
}

fn default_operator_role_name() -> String {
    constants::OPERATOR_ROLE_NAME.to_string()
}

fn default_notice_fetch_limit() -> u8 {
    5
}

/// Week 1 of the gift exchange starts on this date.
fn default_pairing_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap_or_default()
}

/// Twelve hours.
fn default_idle_channel_timeout_secs() -> u64 {
    12 * 60 * 60
}

/// Five minutes.
fn default_reaper_interval_secs() -> u64 {
    5 * 60
}

fn default_history_window() -> usize {
    10
}

fn default_fuzzy_match_threshold() -> f64 {
    0.6
}

fn default_help_page_size() -> usize {
    25
}

fn default_help_field_max_len() -> usize {
    1024
}

fn default_pause_default_minutes() -> u64 {
    1
}

fn default_external_call_timeout_secs() -> u64 {
    30
}

/// One question/answer pair; order in the config file is preserved.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Configuration for the marong-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Discord bot token (`DISCORD_TOKEN`).
    pub discord_token: String,
    /// API key for the completion service (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible completion API (`OPENAI_API_BASE`).
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
    /// Completion model to use (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Sampling temperature for the completion model (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens for the completion model (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Database endpoint URL (`DB_ENDPOINT`), e.g. `mem://` or `ws://localhost:8000`.
    #[serde(default = "default_db_endpoint")]
    pub db_endpoint: String,
    /// Database username (`DB_USERNAME`).
    pub db_username: Option<String>,
    /// Database password (`DB_PASSWORD`).
    pub db_password: Option<String>,
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    #[serde(default = "default_db_database")]
    pub db_database: String,
    /// Channels the bot answers in at startup (`ALLOWED_CHANNEL_IDS`, comma separated).
    #[serde(default)]
    pub allowed_channel_ids: Vec<u64>,
    #[serde(default = "default_blocked_words")]
    pub blocked_words: Vec<String>,
    #[serde(default = "default_injection_keywords")]
    pub injection_keywords: Vec<String>,
    #[serde(default = "default_gratitude_words")]
    pub gratitude_words: Vec<String>,
    #[serde(default = "default_help_aliases")]
    pub help_aliases: Vec<String>,
    #[serde(default = "default_pairing_keywords")]
    pub pairing_keywords: Vec<String>,
    #[serde(default = "default_notice_keywords")]
    pub notice_keywords: Vec<String>,
    #[serde(default = "default_pause_keywords")]
    pub pause_keywords: Vec<String>,
    /// Short-form FAQ.
    #[serde(default = "default_faq")]
    pub faq: Vec<FaqEntry>,
    /// Extended help guide.
    #[serde(default = "default_help_faq")]
    pub help_faq: Vec<FaqEntry>,
    #[serde(default = "default_inquiry_command")]
    pub inquiry_command: String,
    #[serde(default = "default_operator_inquiry_command")]
    pub operator_inquiry_command: String,
    #[serde(default = "default_inquiry_channel_prefix")]
    pub inquiry_channel_prefix: String,
    /// Operator role id; takes precedence over `operator_role_name` (`OPERATOR_ROLE_ID`).
    pub operator_role_id: Option<u64>,
    #[serde(default = "default_operator_role_name")]
    pub operator_role_name: String,
    /// Channel whose recent messages are summarized (`NOTICE_CHANNEL_ID`).
    pub notice_channel_id: Option<u64>,
    #[serde(default = "default_notice_fetch_limit")]
    pub notice_fetch_limit: u8,
    /// Gift-exchange group queried for pairings (`PAIRING_GROUP_ID`).
    #[serde(default)]
    pub pairing_group_id: u64,
    #[serde(default = "default_pairing_base_date")]
    pub pairing_base_date: NaiveDate,
    /// Channel where new members are greeted (`WELCOME_CHANNEL_ID`).
    pub welcome_channel_id: Option<u64>,
    /// Directory for inquiry channel transcripts; disabled when unset (`TRANSCRIPT_DIR`).
    pub transcript_dir: Option<PathBuf>,
    #[serde(default = "default_idle_channel_timeout_secs")]
    pub idle_channel_timeout_secs: u64,
    #[serde(default = "default_reaper_interval_secs")]
    pub reaper_interval_secs: u64,
    /// Exchanges (user + assistant turn pairs) kept per user.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_fuzzy_match_threshold")]
    pub fuzzy_match_threshold: f64,
    #[serde(default = "default_help_page_size")]
    pub help_page_size: usize,
    #[serde(default = "default_help_field_max_len")]
    pub help_field_max_len: usize,
    #[serde(default = "default_pause_default_minutes")]
    pub pause_default_minutes: u64,
    #[serde(default = "default_external_call_timeout_secs")]
    pub external_call_timeout_secs: u64,
}

impl ConfigInner {
    pub fn idle_channel_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_channel_timeout_secs)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }

    pub fn external_call_timeout(&self) -> Duration {
        Duration::from_secs(self.external_call_timeout_secs)
    }

    /// The short-form FAQ as ordered `(question, answer)` pairs.
    pub fn faq_pairs(&self) -> Vec<(String, String)> {
        self.faq.iter().map(|e| (e.question.clone(), e.answer.clone())).collect()
    }
}

const LIST_KEYS: &[&str] = &[
    "allowed_channel_ids",
    "blocked_words",
    "injection_keywords",
    "gratitude_words",
    "help_aliases",
    "pairing_keywords",
    "notice_keywords",
    "pause_keywords",
];

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Later sources win: the environment overrides the file.
        let mut env = config::Environment::default().prefix("MARONG_BOT").try_parsing(true).list_separator(",");
        for key in LIST_KEYS {
            env = env.with_list_parse_key(key);
        }

        Self::validated(cfg.add_source(env).build()?.try_deserialize()?)
    }

    /// Parse a configuration from TOML text only (no environment).
    pub fn parse(toml: &str) -> Res<Self> {
        let cfg = config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml)).build()?;

        Self::validated(cfg.try_deserialize()?)
    }

    fn validated(inner: ConfigInner) -> Res<Self> {
        let result = Config { inner: Arc::new(inner) };

        if result.openai_temperature < 0.0 || result.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("Completion temperature must be between 0 and 2."));
        }

        if result.openai_max_tokens < 1 || result.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("Completion max tokens must be between 1 and 128000."));
        }

        if !(0.0..=1.0).contains(&result.fuzzy_match_threshold) {
            return Err(anyhow::anyhow!("Fuzzy match threshold must be between 0 and 1."));
        }

        if result.history_window < 1 {
            return Err(anyhow::anyhow!("History window must keep at least one exchange."));
        }

        if result.help_page_size < 1 || result.help_page_size > 25 {
            return Err(anyhow::anyhow!("Help page size must be between 1 and 25."));
        }

        if result.help_field_max_len < 4 || result.help_field_max_len > 1024 {
            return Err(anyhow::anyhow!("Help field max length must be between 4 and 1024."));
        }

        if result.notice_fetch_limit < 1 || result.notice_fetch_limit > 100 {
            return Err(anyhow::anyhow!("Notice fetch limit must be between 1 and 100."));
        }

        if result.external_call_timeout_secs < 1 {
            return Err(anyhow::anyhow!("External call timeout must be at least one second."));
        }

        Ok(result)
    }
}
