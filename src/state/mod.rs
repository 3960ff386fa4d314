//! Process-wide session state shared by the router and the reaper.
//!
//! Nothing here is persisted: every map starts empty (apart from the seeded
//! allow-list) and is lost on restart.

pub mod activity;
pub mod history;
pub mod pause;

use std::{ops::Deref, sync::Arc};

use dashmap::{DashMap, DashSet};
use tokio::sync::Mutex;

use crate::base::config::Config;

use self::{activity::ActivityTracker, history::HistoryStore, pause::PauseRegistry};

/// Set of channel ids the bot is allowed to respond in.
#[derive(Debug, Default)]
pub struct AllowedChannels {
    ids: DashSet<u64>,
}

impl AllowedChannels {
    pub fn new(seed: impl IntoIterator<Item = u64>) -> Self {
        Self { ids: seed.into_iter().collect() }
    }

    pub fn allow(&self, channel_id: u64) {
        self.ids.insert(channel_id);
    }

    pub fn revoke(&self, channel_id: u64) {
        self.ids.remove(&channel_id);
    }

    pub fn contains(&self, channel_id: u64) -> bool {
        self.ids.contains(&channel_id)
    }
}

/// Session state context.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionStateInner>,
}

impl Deref for SessionState {
    type Target = SessionStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct SessionStateInner {
    pub allowed: AllowedChannels,
    pub activity: ActivityTracker,
    pub pauses: PauseRegistry,
    pub history: HistoryStore,
    creation_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionState {
    pub fn new(allowed: impl IntoIterator<Item = u64>, history_window: usize) -> Self {
        Self {
            inner: Arc::new(SessionStateInner {
                allowed: AllowedChannels::new(allowed),
                activity: ActivityTracker::new(),
                pauses: PauseRegistry::new(),
                history: HistoryStore::new(history_window),
                creation_locks: DashMap::new(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allowed_channel_ids.iter().copied(), config.history_window)
    }
}

impl SessionStateInner {
    /// Lock serializing the check-then-create sequence for one channel name.
    pub fn creation_lock(&self, channel_name: &str) -> Arc<Mutex<()>> {
        self.creation_locks.entry(channel_name.to_string()).or_default().clone()
    }

    /// Give back a lock from [`Self::creation_lock`]; the entry is dropped once nobody else holds it.
    pub fn release_creation_lock(&self, channel_name: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.creation_locks.remove_if(channel_name, |_, held| Arc::strong_count(held) == 1);
    }

    #[cfg(test)]
    fn creation_lock_count(&self) -> usize {
        self.creation_locks.len()
    }

    /// Forget a channel everywhere it can be referenced.
    pub fn forget_channel(&self, channel_id: u64) {
        self.activity.remove(channel_id);
        self.allowed.revoke(channel_id);
        self.pauses.clear(channel_id);
    }
}
