//! Append-only transcripts of inquiry channels.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{instrument, warn};

use crate::{
    base::types::{ChatMessage, Void},
    runtime::Runtime,
};

/// `[YYYY-mm-dd HH:MM:SS] author: content`
pub fn format_line(at: DateTime<Utc>, author: &str, content: &str) -> String {
    format!("[{}] {}: {}\n", at.format("%Y-%m-%d %H:%M:%S"), author, content)
}

/// Transcript file for a channel; path separators in the name are replaced.
pub fn transcript_path(dir: &Path, channel_name: &str) -> PathBuf {
    let file_name = channel_name.replace(['/', '\\'], "_");
    dir.join(format!("{file_name}.txt"))
}

/// Append one line to the channel's transcript, creating the directory if needed.
pub async fn append(dir: &Path, channel_name: &str, at: DateTime<Utc>, author: &str, content: &str) -> Void {
    fs::create_dir_all(dir).await?;

    let mut file = fs::OpenOptions::new().create(true).append(true).open(transcript_path(dir, channel_name)).await?;
    file.write_all(format_line(at, author, content).as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

/// Record a message when transcripts are enabled and the channel is an inquiry channel.
///
/// Failures are logged only.
#[instrument(skip_all)]
pub async fn record(runtime: &Runtime, message: &ChatMessage) {
    let Some(dir) = &runtime.config.transcript_dir else {
        return;
    };

    let Some(channel_name) = runtime.state.activity.name(message.channel_id) else {
        return;
    };

    if let Err(err) = append(dir, &channel_name, message.received_at, &message.author_name, &message.text).await {
        warn!("Failed to write transcript for `{}`: {}", channel_name, err);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn line_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(format_line(at, "kim", "안녕하세요"), "[2025-03-01 09:05:07] kim: 안녕하세요\n");
    }

    #[test]
    fn path_separators_are_replaced() {
        let path = transcript_path(Path::new("/tmp/logs"), "문의-a/b");
        assert_eq!(path, PathBuf::from("/tmp/logs/문의-a_b.txt"));
    }

    #[tokio::test]
    async fn appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("transcripts");
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        append(&nested, "문의-kim", at, "kim", "첫 번째").await.unwrap();
        append(&nested, "문의-kim", at, "마롱", "두 번째").await.unwrap();

        let written = tokio::fs::read_to_string(nested.join("문의-kim.txt")).await.unwrap();
        assert_eq!(written, "[2025-03-01 09:00:00] kim: 첫 번째\n[2025-03-01 09:00:00] 마롱: 두 번째\n");
    }
}
