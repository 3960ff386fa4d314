//! Intent handlers.
//!
//! Each handler produces exactly one response (the help guide may span several
//! embeds). External failures become short diagnostic replies; only a failure
//! to deliver the reply itself is returned as an error.

use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{info, instrument, warn};

use crate::{
    base::{
        constants::{
            BLOCKED_REPLY, GRATITUDE_REPLY, INJECTION_REPLY, INQUIRY_NO_GUILD_REPLY, NOTICE_ATTACHMENT_PLACEHOLDER, NOTICE_EMPTY_REPLY, NOTICE_NO_CHANNEL_REPLY,
            NOTICE_NO_GUILD_REPLY,
        },
        prompts::{fallback_prompt, notice_summary_prompt},
        types::{BotError, ChatMessage, Err, HistoryMessage, Intent, Outbound, Res, Void, channel_mention},
    },
    runtime::Runtime,
};

use super::{help::paginate, inquiry::ensure_channel, week::week_index};

/// Execute the handler selected for `message`.
#[instrument(skip_all, fields(intent = intent.name()))]
pub async fn execute(runtime: &Runtime, message: &ChatMessage, intent: Intent) -> Void {
    match intent {
        Intent::Ignore(_) => Ok(()),
        Intent::Inquiry { include_operator } => handle_inquiry(runtime, message, include_operator).await,
        Intent::Blocked => reply(runtime, message.channel_id, BLOCKED_REPLY).await,
        Intent::Injection => {
            warn!("Refusing a prompt-injection attempt from {}.", message.author_id);
            reply(runtime, message.channel_id, INJECTION_REPLY).await
        }
        Intent::Gratitude => reply(runtime, message.channel_id, GRATITUDE_REPLY).await,
        Intent::Help => handle_help(runtime, message).await,
        Intent::PairingLookup => handle_pairing(runtime, message).await,
        Intent::NoticeSummary => handle_notice(runtime, message).await,
        Intent::Pause { minutes } => handle_pause(runtime, message, minutes).await,
        Intent::Faq { answer } => reply(runtime, message.channel_id, answer).await,
        Intent::Fallback => handle_fallback(runtime, message).await,
    }
}

/// User-facing text for a failed external call.
pub fn diagnostic(err: &Err) -> String {
    match err.downcast_ref::<BotError>() {
        Some(BotError::Timeout { .. }) => "⏱️ 응답이 너무 오래 걸리고 있어요. 잠시 후 다시 시도해주세요.".to_string(),
        Some(BotError::Resolution(what)) => format!("📛 {what}을(를) 찾을 수 없습니다."),
        Some(BotError::Service(reason)) => format!("❗️ 오류가 발생했어요: {reason}"),
        None => format!("❗️ 오류가 발생했어요: {err}"),
    }
}

/// Tag a completion or pairing store failure.
fn service_error(err: Err) -> Err {
    BotError::Service(err.to_string()).into()
}

async fn reply(runtime: &Runtime, channel_id: u64, text: impl Into<String>) -> Void {
    send(runtime, channel_id, Outbound::text(text)).await
}

async fn send(runtime: &Runtime, channel_id: u64, content: Outbound) -> Void {
    runtime.bounded("send_message", runtime.chat.send_message(channel_id, &content)).await
}

// Inquiry.

#[instrument(skip_all)]
async fn handle_inquiry(runtime: &Runtime, message: &ChatMessage, include_operator: bool) -> Void {
    let mention = message.author_mention();

    let Some(guild_id) = message.guild_id else {
        return reply(runtime, message.channel_id, INQUIRY_NO_GUILD_REPLY).await;
    };

    let (channel, created) = match ensure_channel(runtime, guild_id, message.author_id, &message.author_name, include_operator).await {
        Ok(result) => result,
        Err(err) => {
            warn!("Inquiry channel for {} failed: {}", message.author_id, err);
            return reply(runtime, message.channel_id, diagnostic(&err)).await;
        }
    };

    if !created {
        return reply(runtime, message.channel_id, format!("{mention} 이미 문의 채널이 있어요: {}", channel_mention(channel.id))).await;
    }

    if include_operator {
        if let Err(err) = reply(runtime, channel.id, format!("{mention}님 안녕하세요! 운영진이 곧 응답할 예정입니다.")).await {
            warn!("Greeting in inquiry channel {} failed: {}", channel.id, err);
        }

        reply(runtime, message.channel_id, format!("{mention} 운영진에게 연결되었습니다.")).await
    } else {
        reply(runtime, channel.id, format!("{mention} 문의 채널이 생성되었습니다. 여기에 자유롭게 남겨주세요 🙇‍♂️")).await
    }
}

// Help.

#[instrument(skip_all)]
async fn handle_help(runtime: &Runtime, message: &ChatMessage) -> Void {
    let entries = runtime.config.help_faq.iter().map(|e| (e.question.clone(), e.answer.clone())).collect::<Vec<_>>();

    for page in paginate(&entries, runtime.config.help_page_size, runtime.config.help_field_max_len) {
        send(runtime, message.channel_id, Outbound::Embed(page)).await?;
    }

    Ok(())
}

// Pairing lookup.

#[instrument(skip_all)]
async fn handle_pairing(runtime: &Runtime, message: &ChatMessage) -> Void {
    let today = message.received_at.with_timezone(&Local).date_naive();
    let week = week_index(today, runtime.config.pairing_base_date);

    let lookup = runtime.db.lookup_pairing(message.author_id, runtime.config.pairing_group_id, week);

    let text = match runtime.bounded("lookup_pairing", async { lookup.await.map_err(service_error) }).await {
        Ok(Some(nickname)) => format!("이번 주({week}) 당신의 마니띠는 **{nickname}** 님입니다!"),
        Ok(None) => format!("이번 주({week}) 마니띠 매칭이 없습니다."),
        Err(err) => {
            warn!("Pairing lookup failed: {}", err);
            diagnostic(&err)
        }
    };

    reply(runtime, message.channel_id, text).await
}

// Notice summary.

#[instrument(skip_all)]
async fn handle_notice(runtime: &Runtime, message: &ChatMessage) -> Void {
    let text = match notice_summary(runtime, message).await {
        Ok(text) => text,
        Err(err) => {
            warn!("Notice summary failed: {}", err);
            match err.downcast_ref::<BotError>() {
                Some(BotError::Timeout { .. }) => diagnostic(&err),
                _ => format!("📛 공지 분석 중 오류: {err}"),
            }
        }
    };

    reply(runtime, message.channel_id, text).await
}

/// The summary, or the canned reply for a missing guild, channel, or empty channel.
async fn notice_summary(runtime: &Runtime, message: &ChatMessage) -> Res<String> {
    let Some(guild_id) = message.guild_id else {
        return Ok(NOTICE_NO_GUILD_REPLY.to_string());
    };

    let Some(notice_channel_id) = runtime.config.notice_channel_id else {
        return Ok(NOTICE_NO_CHANNEL_REPLY.to_string());
    };

    let Some(channel) = runtime.bounded("resolve_channel", runtime.chat.resolve_channel(guild_id, notice_channel_id)).await? else {
        return Ok(NOTICE_NO_CHANNEL_REPLY.to_string());
    };

    let history = runtime.bounded("fetch_recent_messages", runtime.chat.fetch_recent_messages(channel.id, runtime.config.notice_fetch_limit)).await?;

    if history.is_empty() {
        return Ok(NOTICE_EMPTY_REPLY.to_string());
    }

    let prompt = notice_summary_prompt(&notice_lines(&history));

    runtime.bounded("complete", async { runtime.llm.complete(&prompt).await.map_err(service_error) }).await
}

/// `author: content` lines, oldest first.
pub fn notice_lines(history: &[HistoryMessage]) -> String {
    history
        .iter()
        .map(|m| {
            let content = if m.content.trim().is_empty() && m.has_attachments { NOTICE_ATTACHMENT_PLACEHOLDER } else { m.content.as_str() };
            format!("{}: {}", m.author_name, content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Pause.

#[instrument(skip_all)]
async fn handle_pause(runtime: &Runtime, message: &ChatMessage, minutes: u64) -> Void {
    runtime.state.pauses.pause(message.channel_id, Duration::from_secs(minutes * 60), Instant::now());

    info!("Paused channel {} for {} minute(s).", message.channel_id, minutes);

    reply(runtime, message.channel_id, format!("{minutes}분 동안 응답을 멈춥니다.")).await
}

// Fallback.

#[instrument(skip_all)]
async fn handle_fallback(runtime: &Runtime, message: &ChatMessage) -> Void {
    let question = message.text.trim();
    let history = runtime.state.history.get_history(message.author_id);
    let prompt = fallback_prompt(&runtime.config.faq_pairs(), &history, question);

    let completion = runtime.bounded("complete", async { runtime.llm.complete(&prompt).await.map_err(service_error) }).await;

    let text = match completion {
        Ok(answer) => {
            runtime.state.history.append_exchange(message.author_id, question, answer.as_str());
            answer
        }
        Err(err) => {
            warn!("Completion failed: {}", err);
            diagnostic(&err)
        }
    };

    reply(runtime, message.channel_id, text).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn diagnostics_by_error_kind() {
        let timeout: Err = BotError::Timeout { label: "complete", after: Duration::from_secs(30) }.into();
        assert!(diagnostic(&timeout).starts_with("⏱️"));

        let missing: Err = BotError::Resolution("운영진 역할".to_string()).into();
        assert_eq!(diagnostic(&missing), "📛 운영진 역할을(를) 찾을 수 없습니다.");

        let service: Err = BotError::Service("quota exceeded".to_string()).into();
        assert_eq!(diagnostic(&service), "❗️ 오류가 발생했어요: quota exceeded");

        let other = anyhow::anyhow!("boom");
        assert_eq!(diagnostic(&other), "❗️ 오류가 발생했어요: boom");
    }

    #[test]
    fn notice_lines_render_attachments() {
        let history = vec![
            HistoryMessage { author_name: "운영자".to_string(), content: "이번 주 점검 안내".to_string(), has_attachments: false },
            HistoryMessage { author_name: "운영자".to_string(), content: String::new(), has_attachments: true },
        ];

        assert_eq!(notice_lines(&history), "운영자: 이번 주 점검 안내\n운영자: [첨부파일/임베드 포함]");
    }
}
