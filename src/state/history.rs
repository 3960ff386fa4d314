//! Bounded per-user conversation history.

use std::collections::VecDeque;

use dashmap::DashMap;

use crate::base::types::{Role, Turn};

/// Per-user FIFO of turns, capped at `window` exchanges (`2 * window` turns).
#[derive(Debug)]
pub struct HistoryStore {
    window: usize,
    turns: DashMap<u64, VecDeque<Turn>>,
}

impl HistoryStore {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            turns: DashMap::new(),
        }
    }

    pub fn append_turn(&self, user_id: u64, role: Role, content: impl Into<String>) {
        let mut turns = self.turns.entry(user_id).or_default();
        turns.push_back(Turn { role, content: content.into() });
        Self::evict(&mut turns, self.window * 2);
    }

    /// Append a user turn and its assistant answer under one lock.
    pub fn append_exchange(&self, user_id: u64, question: impl Into<String>, answer: impl Into<String>) {
        let mut turns = self.turns.entry(user_id).or_default();
        turns.push_back(Turn { role: Role::User, content: question.into() });
        turns.push_back(Turn { role: Role::Assistant, content: answer.into() });
        Self::evict(&mut turns, self.window * 2);
    }

    /// Turns for a user, oldest first; empty for unseen users.
    pub fn get_history(&self, user_id: u64) -> Vec<Turn> {
        self.turns.get(&user_id).map(|turns| turns.iter().cloned().collect()).unwrap_or_default()
    }

    fn evict(turns: &mut VecDeque<Turn>, cap: usize) {
        while turns.len() > cap {
            turns.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_user_has_empty_history() {
        let store = HistoryStore::new(10);
        assert!(store.get_history(1).is_empty());
    }

    #[test]
    fn keeps_last_exchanges_in_order() {
        let store = HistoryStore::new(10);

        for i in 0..12 {
            store.append_exchange(1, format!("q{i}"), format!("a{i}"));
        }

        let history = store.get_history(1);
        assert_eq!(history.len(), 20);
        assert_eq!(history.first().unwrap(), &Turn { role: Role::User, content: "q2".to_string() });
        assert_eq!(history.last().unwrap(), &Turn { role: Role::Assistant, content: "a11".to_string() });

        let questions = history.iter().filter(|t| t.role == Role::User).map(|t| t.content.as_str()).collect::<Vec<_>>();
        assert_eq!(questions, (2..12).map(|i| format!("q{i}")).collect::<Vec<_>>());
    }

    #[test]
    fn single_turns_evict_oldest_first() {
        let store = HistoryStore::new(1);
        store.append_turn(1, Role::User, "a");
        store.append_turn(1, Role::Assistant, "b");
        store.append_turn(1, Role::User, "c");

        let contents = store.get_history(1).into_iter().map(|t| t.content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[test]
    fn users_are_isolated() {
        let store = HistoryStore::new(10);
        store.append_exchange(1, "q", "a");

        assert!(store.get_history(2).is_empty());
        assert_eq!(store.get_history(1).len(), 2);
    }
}
