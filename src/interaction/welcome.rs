//! Greeting for members joining a guild.

use tracing::{Instrument, error, instrument, warn};

use crate::{
    base::{
        constants::WELCOME_GUIDE_HEADER,
        types::{JoinedMember, Outbound, Void, user_mention},
    },
    runtime::Runtime,
};

#[instrument(skip_all)]
pub fn handle_member_join(member: JoinedMember, runtime: Runtime) {
    tokio::spawn(
        async move {
            let result = greet_member(&runtime, &member).await;

            if let Err(err) = &result {
                error!("Error while greeting {}: {}", member.name, err);
            }
        }
        .in_current_span(),
    );
}

/// DM the FAQ guide, then post in the welcome channel when one is configured.
///
/// A refused DM (members may block them) is logged and does not stop the greeting.
#[instrument(skip_all, fields(user_id = member.user_id))]
pub async fn greet_member(runtime: &Runtime, member: &JoinedMember) -> Void {
    let guide = faq_guide(&runtime.config.faq_pairs());

    if let Err(err) = runtime.bounded("send_direct_message", runtime.chat.send_direct_message(member.user_id, &guide)).await {
        warn!("Could not DM the guide to {}: {}", member.name, err);
    }

    if let Some(channel_id) = runtime.config.welcome_channel_id {
        let text = welcome_message(member.user_id, &runtime.config.inquiry_command, &runtime.config.operator_inquiry_command);
        runtime.bounded("send_message", runtime.chat.send_message(channel_id, &Outbound::text(text))).await?;
    }

    Ok(())
}

pub fn faq_guide(faq: &[(String, String)]) -> String {
    let entries = faq.iter().map(|(k, v)| format!("**{k}**: {v}")).collect::<Vec<_>>().join("\n\n");
    format!("{WELCOME_GUIDE_HEADER}\n\n{entries}")
}

pub fn welcome_message(user_id: u64, inquiry_command: &str, operator_inquiry_command: &str) -> String {
    format!(
        "👋 {}님이 서버에 들어오셨어요!\n서비스 이용 중 궁금한 점이 있다면 언제든지 말씀해주세요 🙇‍♂️\n`{inquiry_command}` 라고 입력하시면 마롱이 챗봇과 1:1 문의 채널이 생성돼요!\n`{operator_inquiry_command}` 라고 입력하시면 운영진과 비밀 문의 채널이 생성돼요!",
        user_mention(user_id)
    )
}
