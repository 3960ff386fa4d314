//! Idle inquiry channel reaper.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::{base::types::Outbound, runtime::Runtime};

/// Notice posted before an idle channel is deleted.
pub fn idle_notice(timeout: Duration) -> String {
    let secs = timeout.as_secs();

    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}시간 동안 활동이 없어 자동으로 삭제됩니다.", secs / 3600)
    } else {
        format!("{}분 동안 활동이 없어 자동으로 삭제됩니다.", secs.div_ceil(60))
    }
}

/// Close every tracked channel idle longer than the configured timeout.
///
/// Channels are forgotten even when the notice or the deletion fails.
/// Returns the number of channels swept.
#[instrument(skip_all)]
pub async fn sweep(runtime: &Runtime, now: DateTime<Utc>) -> usize {
    let timeout = runtime.config.idle_channel_timeout();
    let idle = runtime.state.activity.idle_channels(now, timeout);

    if idle.is_empty() {
        return 0;
    }

    info!("Reaping {} idle channel(s).", idle.len());

    let notice = Outbound::text(idle_notice(timeout));
    let count = idle.len();

    join_all(idle.into_iter().map(|(channel_id, name)| close_channel(runtime, channel_id, name, &notice))).await;

    count
}

async fn close_channel(runtime: &Runtime, channel_id: u64, name: String, notice: &Outbound) {
    if let Err(err) = runtime.bounded("send_message", runtime.chat.send_message(channel_id, notice)).await {
        warn!("Failed to post the idle notice in `{}`: {}", name, err);
    }

    match runtime.bounded("delete_channel", runtime.chat.delete_channel(channel_id)).await {
        Ok(()) => info!("Deleted idle channel `{}`.", name),
        Err(err) => error!("Failed to delete idle channel `{}`: {}", name, err),
    }

    runtime.state.forget_channel(channel_id);
}

/// Sweep on the configured interval until the task is aborted.
pub async fn run_reaper(runtime: Runtime) {
    let mut interval = tokio::time::interval(runtime.config.reaper_interval());

    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        sweep(&runtime, Utc::now()).await;
    }
}
