// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed event log over the open message thread.
//!
//! The optimistic local append and its change-feed echo both land here as
//! events keyed by message id, so the de-duplication that keeps the thread
//! race-free is explicit and testable on its own.

use mercato_core::{Message, MessageId, UserId};

/// An event applied to the open thread.
#[derive(Debug, Clone)]
pub enum ThreadEvent {
    /// The session user sent a message and the insert succeeded; append it
    /// without waiting for the change feed to echo it back.
    LocalSend(Message),
    /// The change feed delivered a message insert for this conversation.
    RemoteInsert(Message),
    /// All unread messages addressed to `reader` were marked read upstream.
    MarkRead { reader: UserId },
}

/// Reducer state for one open thread: messages in arrival order, with
/// append de-duplicated by message id.
#[derive(Debug, Clone, Default)]
pub struct ThreadState {
    messages: Vec<Message>,
}

impl ThreadState {
    /// Seed the state from a history fetch (already ascending by creation).
    pub fn from_history(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// Fold one event into the state. Returns `true` if anything changed.
    pub fn apply(&mut self, event: ThreadEvent) -> bool {
        match event {
            ThreadEvent::LocalSend(message) | ThreadEvent::RemoteInsert(message) => {
                if self.contains(&message.id) {
                    return false;
                }
                self.messages.push(message);
                true
            }
            ThreadEvent::MarkRead { reader } => {
                let mut changed = false;
                for msg in self
                    .messages
                    .iter_mut()
                    .filter(|m| m.receiver_id == reader && !m.is_read)
                {
                    msg.is_read = true;
                    changed = true;
                }
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mercato_core::ConversationId;

    fn msg(id: &str, from: &str, to: &str, text: &str) -> Message {
        Message {
            id: MessageId(id.into()),
            conversation_id: ConversationId::Persisted("c1".into()),
            sender_id: UserId(from.into()),
            receiver_id: UserId(to.into()),
            content: text.into(),
            is_read: false,
            related_booking: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn local_send_then_remote_echo_appends_once() {
        let mut state = ThreadState::default();
        let m = msg("m1", "u1", "u2", "hello");

        assert!(state.apply(ThreadEvent::LocalSend(m.clone())));
        assert!(!state.apply(ThreadEvent::RemoteInsert(m)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn remote_echo_then_local_send_also_appends_once() {
        let mut state = ThreadState::default();
        let m = msg("m1", "u1", "u2", "hello");

        assert!(state.apply(ThreadEvent::RemoteInsert(m.clone())));
        assert!(!state.apply(ThreadEvent::LocalSend(m)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn distinct_ids_both_append() {
        let mut state = ThreadState::from_history(vec![msg("m1", "u1", "u2", "a")]);
        assert!(state.apply(ThreadEvent::RemoteInsert(msg("m2", "u2", "u1", "b"))));
        assert_eq!(state.len(), 2);
        assert_eq!(state.messages()[1].content, "b");
    }

    #[test]
    fn mark_read_flips_only_reader_rows() {
        let mut state = ThreadState::from_history(vec![
            msg("m1", "u1", "u2", "to u2"),
            msg("m2", "u2", "u1", "to u1"),
        ]);

        assert!(state.apply(ThreadEvent::MarkRead {
            reader: UserId("u2".into()),
        }));
        assert!(state.messages()[0].is_read);
        assert!(!state.messages()[1].is_read);

        // Nothing left to flip for u2.
        assert!(!state.apply(ThreadEvent::MarkRead {
            reader: UserId("u2".into()),
        }));
    }
}
