//! Last-activity tracking for expiring channels.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Tracking entry for one expiring channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelActivity {
    pub name: String,
    pub last_active: DateTime<Utc>,
}

/// Map of `channel_id -> last activity` for channels that expire when idle.
///
/// Only registered channels are tracked; touching an unknown channel is a no-op,
/// so long-lived seed channels never become reaping candidates.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    entries: DashMap<u64, ChannelActivity>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a channel (or reset an existing entry).
    pub fn register(&self, channel_id: u64, name: impl Into<String>, now: DateTime<Utc>) {
        self.entries.insert(channel_id, ChannelActivity { name: name.into(), last_active: now });
    }

    /// Mark a tracked channel as active. Returns `false` if the channel is untracked.
    pub fn touch(&self, channel_id: u64, now: DateTime<Utc>) -> bool {
        match self.entries.get_mut(&channel_id) {
            Some(mut entry) => {
                entry.last_active = now;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, channel_id: u64) -> bool {
        self.entries.contains_key(&channel_id)
    }

    pub fn get(&self, channel_id: u64) -> Option<ChannelActivity> {
        self.entries.get(&channel_id).map(|e| e.clone())
    }

    pub fn name(&self, channel_id: u64) -> Option<String> {
        self.entries.get(&channel_id).map(|e| e.name.clone())
    }

    pub fn remove(&self, channel_id: u64) -> Option<ChannelActivity> {
        self.entries.remove(&channel_id).map(|(_, entry)| entry)
    }

    /// Channels whose inactivity strictly exceeds `timeout` at `now`.
    pub fn idle_channels(&self, now: DateTime<Utc>, timeout: Duration) -> Vec<(u64, String)> {
        let mut idle = self
            .entries
            .iter()
            .filter(|entry| (now - entry.last_active).to_std().map(|elapsed| elapsed > timeout).unwrap_or(false))
            .map(|entry| (*entry.key(), entry.name.clone()))
            .collect::<Vec<_>>();

        idle.sort_unstable_by_key(|(id, _)| *id);
        idle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
