//! Message history for a single session.
//!
//! The history always starts with the priming prefix (one system message
//! and one user message). Nothing in this module can remove it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use wellchat_core::{ChatMessage, Role};

/// Number of leading messages that are never evicted.
pub const PRIMING_PREFIX_LEN: usize = 2;

/// A conversation session with full message history.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    /// Session identifier
    pub id: Uuid,
    messages: Vec<ChatMessage>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Start a session holding only the priming prefix.
    pub fn primed(system_prompt: impl Into<String>, priming_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(priming_prompt),
            ],
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Add a message to the end of the history.
    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn prefix(&self) -> &[ChatMessage] {
        &self.messages[..PRIMING_PREFIX_LEN.min(self.messages.len())]
    }

    /// Messages after the priming prefix.
    #[must_use]
    pub fn turns(&self) -> &[ChatMessage] {
        &self.messages[PRIMING_PREFIX_LEN.min(self.messages.len())..]
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Remove up to `pair_count` user/assistant pairs right after the prefix.
    ///
    /// Stops at the end of the history when fewer messages exist. Returns the
    /// number of messages removed.
    pub fn evict_pairs(&mut self, pair_count: usize) -> usize {
        let len = self.messages.len();
        let start = PRIMING_PREFIX_LEN.min(len);
        let end = start.saturating_add(pair_count.saturating_mul(2)).min(len);

        self.messages.drain(start..end);
        if end > start {
            self.updated_at = Utc::now();
        }
        end - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_pairs(pairs: usize) -> ConversationSession {
        let mut session = ConversationSession::primed("system", "priming");
        for i in 0..pairs {
            session.add_message(Role::User, format!("question {i}"));
            session.add_message(Role::Assistant, format!("answer {i}"));
        }
        session
    }

    #[test]
    fn test_primed_session() {
        let session = ConversationSession::primed("be kind", "hello");

        assert_eq!(session.message_count(), 2);
        assert_eq!(session.prefix()[0], ChatMessage::system("be kind"));
        assert_eq!(session.prefix()[1], ChatMessage::user("hello"));
        assert!(session.turns().is_empty());
    }

    #[test]
    fn test_evict_oldest_pairs() {
        let mut session = session_with_pairs(5);

        let removed = session.evict_pairs(2);

        assert_eq!(removed, 4);
        assert_eq!(session.message_count(), 8);
        assert_eq!(session.prefix()[0].content, "system");
        assert_eq!(session.prefix()[1].content, "priming");
        assert_eq!(session.turns()[0].content, "question 2");
        assert_eq!(session.turns()[5].content, "answer 4");
    }

    #[test]
    fn test_evict_is_bounded_by_available_turns() {
        let mut session = session_with_pairs(3);
        session.add_message(Role::User, "dangling");

        let removed = session.evict_pairs(10);

        assert_eq!(removed, 7);
        assert_eq!(session.messages(), session.prefix());
        assert_eq!(session.message_count(), PRIMING_PREFIX_LEN);
    }

    #[test]
    fn test_evict_on_bare_prefix_is_noop() {
        let mut session = ConversationSession::primed("system", "priming");
        let before = session.updated_at;

        assert_eq!(session.evict_pairs(10), 0);
        assert_eq!(session.evict_pairs(0), 0);
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.updated_at, before);
    }

    #[test]
    fn test_evict_huge_pair_count_does_not_overflow() {
        let mut session = session_with_pairs(2);
        assert_eq!(session.evict_pairs(usize::MAX), 4);
        assert_eq!(session.message_count(), 2);
    }
}
