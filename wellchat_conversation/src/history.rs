//! Token-budget eviction policy and history statistics.

use wellchat_core::{ChatMessage, Role};

/// When and how much history to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Reported total tokens above which eviction runs
    pub token_limit: u32,
    /// User/assistant pairs removed per eviction
    pub clear_pairs: usize,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            token_limit: 3000,
            clear_pairs: 10,
        }
    }
}

impl EvictionPolicy {
    #[must_use]
    pub const fn new(token_limit: u32, clear_pairs: usize) -> Self {
        Self {
            token_limit,
            clear_pairs,
        }
    }

    /// Whether a request that consumed `total_tokens` should trigger eviction.
    #[must_use]
    pub const fn should_evict(&self, total_tokens: u32) -> bool {
        total_tokens > self.token_limit
    }
}

/// Statistics about conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_characters: usize,
}

impl HistoryStats {
    #[must_use]
    pub fn from_messages(history: &[ChatMessage]) -> Self {
        let count = |role: Role| history.iter().filter(|m| m.role == role).count();

        Self {
            total_messages: history.len(),
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            total_characters: history.iter().map(|m| m.content.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_exclusive() {
        let policy = EvictionPolicy::default();
        assert!(!policy.should_evict(0));
        assert!(!policy.should_evict(3000));
        assert!(policy.should_evict(3001));
    }

    #[test]
    fn test_history_stats() {
        let messages = vec![
            ChatMessage::system("sys"),
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi"),
            ChatMessage::user("bye"),
        ];

        let stats = HistoryStats::from_messages(&messages);

        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.assistant_messages, 1);
        assert_eq!(stats.total_characters, 13);
    }
}
