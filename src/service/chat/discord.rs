//! Chat service integration for marong-bot.
//!
//! This module provides the Discord implementation of the messaging gateway:
//! - Receiving messages and member join events
//! - Sending messages, embeds, and direct messages
//! - Creating, listing, and deleting private inquiry channels
//! - Reading recent channel history

use crate::{
    base::{
        config::Config,
        types::{ChannelAccess, ChannelInfo, ChannelOverwrite, ChatMessage, Embed, HistoryMessage, JoinedMember, Outbound, OverwriteTarget, Res, Void},
    },
    interaction::{self, router::Router},
    runtime::Runtime,
    service::{db::DbClient, llm::LlmClient},
    state::SessionState,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use serenity::all::{
    ChannelId, ChannelType, Client, Context, CreateChannel, CreateEmbed, CreateMessage, EventHandler, GatewayIntents, GetMessages, GuildChannel, GuildId, Http, Member, Message,
    PermissionOverwrite, PermissionOverwriteType, Permissions, Ready, RoleId, UserId,
};
use tracing::{info, instrument};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub async fn discord(config: &Config, db: DbClient, llm: LlmClient, state: SessionState, router: Arc<Router>) -> Res<Self> {
        let client = DiscordChatClient::new(config, db, llm, state, router).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<DiscordChatClient> for ChatClient {
    fn from(client: DiscordChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Discord client implementation.
#[derive(Clone)]
pub struct DiscordChatClient {
    pub bot_user_id: u64,
    pub http: Arc<Http>,
    pub config: Config,
    pub db: DbClient,
    pub llm: LlmClient,
    pub state: SessionState,
    pub router: Arc<Router>,
}

impl DiscordChatClient {
    /// Create a new Discord chat client.
    #[instrument(name = "DiscordChatClient::new", skip_all)]
    pub async fn new(config: &Config, db: DbClient, llm: LlmClient, state: SessionState, router: Arc<Router>) -> Res<Self> {
        let http = Arc::new(Http::new(&config.discord_token));

        // Get the bot's user ID.

        let bot_user = http.get_current_user().await?;
        let bot_user_id = bot_user.id.get();

        info!("Discord bot user ID: {}", bot_user_id);

        Ok(Self {
            bot_user_id,
            http,
            config: config.clone(),
            db,
            llm,
            state,
            router,
        })
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }

    async fn start(&self) -> Void {
        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::GUILD_MEMBERS | GatewayIntents::MESSAGE_CONTENT;

        let handler = DiscordEventHandler {
            runtime: Runtime {
                config: self.config.clone(),
                db: self.db.clone(),
                llm: self.llm.clone(),
                chat: ChatClient::from(self.clone()),
                state: self.state.clone(),
                router: self.router.clone(),
            },
        };

        let mut client = Client::builder(&self.config.discord_token, intents).event_handler(handler).await?;

        // Runs until the gateway connection is closed for good.
        client.start().await?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn send_message(&self, channel_id: u64, content: &Outbound) -> Void {
        let message = match content {
            Outbound::Text(text) => CreateMessage::new().content(text),
            Outbound::Embed(embed) => CreateMessage::new().embed(to_discord_embed(embed)),
        };

        channel(channel_id)?
            .send_message(&*self.http, message)
            .await
            .map_err(|e| anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_direct_message(&self, user_id: u64, text: &str) -> Void {
        let dm = user(user_id)?.create_dm_channel(&*self.http).await?;

        dm.id.say(&*self.http, text).await.map_err(|e| anyhow!("Failed to send direct message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, overwrites))]
    async fn create_private_channel(&self, guild_id: u64, name: &str, overwrites: &[ChannelOverwrite]) -> Res<ChannelInfo> {
        let permissions = overwrites.iter().map(|o| to_permission_overwrite(guild_id, o)).collect::<Res<Vec<_>>>()?;

        let builder = CreateChannel::new(name)
            .kind(ChannelType::Text)
            .permissions(permissions)
            .audit_log_reason("유저 1:1 문의 채널 생성");

        let channel = guild(guild_id)?
            .create_channel(&*self.http, builder)
            .await
            .map_err(|e| anyhow!("Failed to create channel `{}`: {}", name, e))?;

        Ok(ChannelInfo {
            id: channel.id.get(),
            name: channel.name,
        })
    }

    #[instrument(skip(self))]
    async fn list_channels(&self, guild_id: u64) -> Res<Vec<ChannelInfo>> {
        let channels = guild(guild_id)?.channels(&*self.http).await?;

        Ok(channels.into_values().map(|c| ChannelInfo { id: c.id.get(), name: c.name }).collect())
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel_id: u64) -> Void {
        channel(channel_id)?.delete(&*self.http).await.map_err(|e| anyhow!("Failed to delete channel: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_recent_messages(&self, channel_id: u64, limit: u8) -> Res<Vec<HistoryMessage>> {
        let messages = channel(channel_id)?.messages(&*self.http, GetMessages::new().limit(limit)).await?;

        // Discord returns the newest message first.
        Ok(messages
            .into_iter()
            .rev()
            .map(|m| HistoryMessage {
                has_attachments: !m.attachments.is_empty() || !m.embeds.is_empty(),
                author_name: m.author.name,
                content: m.content,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn resolve_role(&self, guild_id: u64, name: &str) -> Res<Option<u64>> {
        let roles = guild(guild_id)?.roles(&*self.http).await?;

        Ok(roles.values().find(|r| r.name == name).map(|r| r.id.get()))
    }

    #[instrument(skip(self))]
    async fn resolve_channel(&self, guild_id: u64, channel_id: u64) -> Res<Option<ChannelInfo>> {
        let channels = guild(guild_id)?.channels(&*self.http).await?;

        Ok(channels.get(&channel(channel_id)?).map(|c| ChannelInfo { id: c.id.get(), name: c.name.clone() }))
    }
}

// Id conversions; Discord ids are never zero.

fn channel(id: u64) -> Res<ChannelId> {
    if id == 0 {
        return Err(anyhow!("Invalid channel ID 0"));
    }
    Ok(ChannelId::new(id))
}

fn guild(id: u64) -> Res<GuildId> {
    if id == 0 {
        return Err(anyhow!("Invalid guild ID 0"));
    }
    Ok(GuildId::new(id))
}

fn user(id: u64) -> Res<UserId> {
    if id == 0 {
        return Err(anyhow!("Invalid user ID 0"));
    }
    Ok(UserId::new(id))
}

fn role(id: u64) -> Res<RoleId> {
    if id == 0 {
        return Err(anyhow!("Invalid role ID 0"));
    }
    Ok(RoleId::new(id))
}

fn to_permission_overwrite(guild_id: u64, overwrite: &ChannelOverwrite) -> Res<PermissionOverwrite> {
    let kind = match overwrite.target {
        // The `@everyone` role shares the guild's ID.
        OverwriteTarget::Everyone => PermissionOverwriteType::Role(role(guild_id)?),
        OverwriteTarget::Role(id) => PermissionOverwriteType::Role(role(id)?),
        OverwriteTarget::Member(id) => PermissionOverwriteType::Member(user(id)?),
    };

    let read_write = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;

    let (allow, deny) = match overwrite.access {
        ChannelAccess::Hidden => (Permissions::empty(), Permissions::VIEW_CHANNEL),
        ChannelAccess::ReadWrite => (read_write, Permissions::empty()),
    };

    Ok(PermissionOverwrite { allow, deny, kind })
}

fn to_discord_embed(embed: &Embed) -> CreateEmbed {
    CreateEmbed::new()
        .title(&embed.title)
        .description(&embed.description)
        .colour(embed.color)
        .fields(embed.fields.iter().map(|(name, value)| (name.clone(), value.clone(), false)))
}

// Gateway event callbacks for Discord.

/// Forwards gateway events into the interaction handlers.
struct DiscordEventHandler {
    runtime: Runtime,
}

#[async_trait]
impl EventHandler for DiscordEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {} in {} guild(s).", ready.user.name, ready.guilds.len());
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let message = ChatMessage {
            channel_id: msg.channel_id.get(),
            author_id: msg.author.id.get(),
            author_name: msg.author.name.clone(),
            text: msg.content.clone(),
            guild_id: msg.guild_id.map(|g| g.get()),
            received_at: Utc::now(),
        };

        interaction::chat_event::handle_chat_event(message, self.runtime.clone());
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        let member = JoinedMember {
            user_id: new_member.user.id.get(),
            name: new_member.user.name.clone(),
        };

        interaction::welcome::handle_member_join(member, self.runtime.clone());
    }

    async fn channel_delete(&self, _ctx: Context, channel: GuildChannel, _messages: Option<Vec<Message>>) {
        interaction::inquiry::forget_deleted_channel(&self.runtime, channel.id.get());
    }
}

// Tests.
