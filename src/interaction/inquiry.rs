//! Private inquiry channels.

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::{
    base::types::{BotError, ChannelAccess, ChannelInfo, ChannelOverwrite, OverwriteTarget, Res},
    runtime::Runtime,
};

/// Channel name for a requester.
///
/// Names follow the platform's text-channel form (lowercase, no whitespace).
/// Operator channels carry the requester id so they never collide with a
/// plain channel of the same display name.
pub fn channel_name(prefix: &str, requester_id: u64, requester_name: &str, include_operator: bool) -> String {
    let base = format!("{}-{}", prefix.trim(), requester_name.trim());
    let mut name = base.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();

    if include_operator {
        name.push_str(&format!("-{requester_id}"));
    }

    name
}

/// Return the requester's inquiry channel, creating it when missing.
///
/// The boolean is `true` when the channel was created by this call. Creation
/// registers the channel in the allow-list and the activity tracker.
#[instrument(skip(runtime, requester_name))]
pub async fn ensure_channel(runtime: &Runtime, guild_id: u64, requester_id: u64, requester_name: &str, include_operator: bool) -> Res<(ChannelInfo, bool)> {
    let name = channel_name(&runtime.config.inquiry_channel_prefix, requester_id, requester_name, include_operator);

    // Check-then-create must not interleave for the same name.
    let lock = runtime.state.creation_lock(&name);
    let result = {
        let _guard = lock.lock().await;
        ensure_locked(runtime, guild_id, requester_id, &name, include_operator).await
    };

    runtime.state.release_creation_lock(&name, lock);

    result
}

async fn ensure_locked(runtime: &Runtime, guild_id: u64, requester_id: u64, name: &str, include_operator: bool) -> Res<(ChannelInfo, bool)> {
    let channels = runtime.bounded("list_channels", runtime.chat.list_channels(guild_id)).await?;

    if let Some(existing) = channels.into_iter().find(|c| c.name == name) {
        // Channels left over from a previous process are picked up again.
        if !runtime.state.activity.contains(existing.id) {
            runtime.state.allowed.allow(existing.id);
            runtime.state.activity.register(existing.id, &existing.name, Utc::now());
        }

        return Ok((existing, false));
    }

    let responder = if include_operator {
        OverwriteTarget::Role(resolve_operator_role(runtime, guild_id).await?)
    } else {
        OverwriteTarget::Member(runtime.chat.bot_user_id())
    };

    let overwrites = [
        ChannelOverwrite { target: OverwriteTarget::Everyone, access: ChannelAccess::Hidden },
        ChannelOverwrite { target: OverwriteTarget::Member(requester_id), access: ChannelAccess::ReadWrite },
        ChannelOverwrite { target: responder, access: ChannelAccess::ReadWrite },
    ];

    let channel = runtime.bounded("create_private_channel", runtime.chat.create_private_channel(guild_id, name, &overwrites)).await?;

    runtime.state.allowed.allow(channel.id);
    runtime.state.activity.register(channel.id, &channel.name, Utc::now());

    info!("Created inquiry channel `{}` ({}).", channel.name, channel.id);

    Ok((channel, true))
}

/// Drop every reference to a channel removed outside the reaper.
#[instrument(skip(runtime))]
pub fn forget_deleted_channel(runtime: &Runtime, channel_id: u64) {
    if runtime.state.activity.contains(channel_id) {
        debug!("Inquiry channel was deleted externally.");
    }

    runtime.state.forget_channel(channel_id);
}

/// The configured operator role id, else the role found by name.
async fn resolve_operator_role(runtime: &Runtime, guild_id: u64) -> Res<u64> {
    if let Some(role_id) = runtime.config.operator_role_id {
        return Ok(role_id);
    }

    let role_name = &runtime.config.operator_role_name;

    runtime
        .bounded("resolve_role", runtime.chat.resolve_role(guild_id, role_name))
        .await?
        .ok_or_else(|| BotError::Resolution(format!("운영진 역할(`{role_name}`)")).into())
}
