pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{ChannelInfo, ChannelOverwrite, HistoryMessage, Outbound, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the messaging gateway the bot talks through: sending
/// replies, managing private inquiry channels, and reading channel history.
/// Implementing this trait allows different chat services to be used with
/// the marong-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Used to ignore messages the bot authored itself.
    fn bot_user_id(&self) -> u64;

    /// Start the chat client listener.
    ///
    /// This connects to the chat platform and begins processing incoming
    /// messages and member events.
    async fn start(&self) -> Void;

    /// Send a text or structured message to a channel.
    async fn send_message(&self, channel_id: u64, content: &Outbound) -> Void;

    /// Send a direct message to a user.
    async fn send_direct_message(&self, user_id: u64, text: &str) -> Void;

    /// Create a private text channel with the given permission overwrites.
    async fn create_private_channel(&self, guild_id: u64, name: &str, overwrites: &[ChannelOverwrite]) -> Res<ChannelInfo>;

    /// List the channels of a guild.
    async fn list_channels(&self, guild_id: u64) -> Res<Vec<ChannelInfo>>;

    /// Delete a channel.
    async fn delete_channel(&self, channel_id: u64) -> Void;

    /// Fetch up to `limit` recent messages of a channel, oldest first.
    async fn fetch_recent_messages(&self, channel_id: u64, limit: u8) -> Res<Vec<HistoryMessage>>;

    /// Resolve a guild role by its display name.
    async fn resolve_role(&self, guild_id: u64, name: &str) -> Res<Option<u64>>;

    /// Resolve a channel of a guild by its ID.
    async fn resolve_channel(&self, guild_id: u64, channel_id: u64) -> Res<Option<ChannelInfo>>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
