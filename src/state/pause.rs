//! Per-channel response suppression with lazy expiry.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Map of `channel_id -> resume instant` (monotonic clock).
///
/// Expired entries are removed on read; there are no timers to cancel.
#[derive(Debug, Default)]
pub struct PauseRegistry {
    resume_at: DashMap<u64, Instant>,
}

impl PauseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause a channel until `now + duration`, replacing any earlier deadline.
    pub fn pause(&self, channel_id: u64, duration: Duration, now: Instant) -> Instant {
        let resume_at = now + duration;
        self.resume_at.insert(channel_id, resume_at);
        resume_at
    }

    /// Whether the channel is still paused at `now`; drops the entry once expired.
    pub fn is_paused(&self, channel_id: u64, now: Instant) -> bool {
        let resume_at = match self.resume_at.get(&channel_id) {
            Some(entry) => *entry,
            None => return false,
        };

        if now < resume_at {
            return true;
        }

        // A concurrent `pause` may have pushed the deadline out; only drop expired entries.
        self.resume_at.remove_if(&channel_id, |_, deadline| now >= *deadline);
        false
    }

    /// Drop any pause for the channel.
    pub fn clear(&self, channel_id: u64) {
        self.resume_at.remove(&channel_id);
    }

    pub fn resume_at(&self, channel_id: u64) -> Option<Instant> {
        self.resume_at.get(&channel_id).map(|e| *e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_until_deadline() {
        let registry = PauseRegistry::new();
        let t = Instant::now();
        registry.pause(42, Duration::from_secs(60), t);

        assert!(registry.is_paused(42, t + Duration::from_secs(30)));
        assert!(!registry.is_paused(42, t + Duration::from_secs(61)));
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let registry = PauseRegistry::new();
        let t = Instant::now();
        registry.pause(42, Duration::from_secs(1), t);

        assert!(!registry.is_paused(42, t + Duration::from_secs(2)));
        assert_eq!(registry.resume_at(42), None);
    }

    #[test]
    fn last_pause_wins() {
        let registry = PauseRegistry::new();
        let t = Instant::now();
        registry.pause(42, Duration::from_secs(600), t);
        registry.pause(42, Duration::from_secs(60), t);

        assert_eq!(registry.resume_at(42), Some(t + Duration::from_secs(60)));
        assert!(!registry.is_paused(42, t + Duration::from_secs(120)));
    }

    #[test]
    fn other_channels_unaffected() {
        let registry = PauseRegistry::new();
        let t = Instant::now();
        registry.pause(1, Duration::from_secs(60), t);

        assert!(!registry.is_paused(2, t));
    }

    #[test]
    fn clear_lifts_a_live_pause() {
        let registry = PauseRegistry::new();
        let t = Instant::now();
        registry.pause(42, Duration::from_secs(600), t);
        registry.clear(42);

        assert!(!registry.is_paused(42, t));
    }
}
