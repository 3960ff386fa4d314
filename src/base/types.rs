use std::time::Duration;

use chrono::{DateTime, Utc};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Errors.

/// Failures that handlers need to tell apart when turning them into replies.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// A guild, role, or channel could not be resolved by the gateway.
    #[error("could not resolve {0}")]
    Resolution(String),
    /// An external call did not finish within its bounded wait.
    #[error("`{label}` timed out after {}s", .after.as_secs())]
    Timeout { label: &'static str, after: Duration },
    /// The completion service or pairing store reported a failure.
    #[error("{0}")]
    Service(String),
}

// Inbound.

/// A single inbound chat message, detached from the platform types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub channel_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub text: String,
    pub guild_id: Option<u64>,
    pub received_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Platform mention markup for the author.
    pub fn author_mention(&self) -> String {
        user_mention(self.author_id)
    }
}

/// A guild member that just joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedMember {
    pub user_id: u64,
    pub name: String,
}

pub fn user_mention(user_id: u64) -> String {
    format!("<@{user_id}>")
}

pub fn channel_mention(channel_id: u64) -> String {
    format!("<#{channel_id}>")
}

// Outbound.

/// A labeled, structured reply (rendered as an embed on Discord).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<(String, String)>,
}

/// Content the bot sends to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Embed(Embed),
}

impl Outbound {
    pub fn text(text: impl Into<String>) -> Self {
        Outbound::Text(text.into())
    }

    /// The plain text, if this is a text reply.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Outbound::Text(text) => Some(text),
            Outbound::Embed(_) => None,
        }
    }
}

// Channels.

/// Minimal channel description returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: u64,
    pub name: String,
}

/// Who a permission overwrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteTarget {
    /// The guild's default (`@everyone`) role.
    Everyone,
    Role(u64),
    Member(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelAccess {
    Hidden,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOverwrite {
    pub target: OverwriteTarget,
    pub access: ChannelAccess,
}

/// A message fetched back from channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub author_name: String,
    pub content: String,
    pub has_attachments: bool,
}

// Conversation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of a user's conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

// Routing.

/// Why a message produced no response at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    SelfAuthored,
    ChannelNotAllowed,
    Paused,
}

/// The single handler selected for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Ignore(IgnoreReason),
    Inquiry { include_operator: bool },
    Blocked,
    Injection,
    Gratitude,
    Help,
    PairingLookup,
    NoticeSummary,
    Pause { minutes: u64 },
    Faq { answer: String },
    Fallback,
}

impl Intent {
    /// Short label for spans and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Ignore(_) => "ignore",
            Intent::Inquiry { include_operator: true } => "operator_inquiry",
            Intent::Inquiry { include_operator: false } => "inquiry",
            Intent::Blocked => "blocked",
            Intent::Injection => "injection",
            Intent::Gratitude => "gratitude",
            Intent::Help => "help",
            Intent::PairingLookup => "pairing_lookup",
            Intent::NoticeSummary => "notice_summary",
            Intent::Pause { .. } => "pause",
            Intent::Faq { .. } => "faq",
            Intent::Fallback => "fallback",
        }
    }
}
