// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the backend traits and the chat components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a platform user (customer or provider account).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a registered service provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

/// Unique identifier for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

/// Unique identifier for a persisted message row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a conversation.
///
/// A `Provisional` id exists only client-side: it names a placeholder thread
/// opened before the first message is sent. The first successful send
/// promotes it to a `Persisted` row in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationId {
    Persisted(String),
    Provisional(String),
}

impl ConversationId {
    /// Mint a fresh client-only provisional id.
    pub fn new_provisional() -> Self {
        ConversationId::Provisional(format!("temp-{}", uuid::Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, ConversationId::Provisional(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConversationId::Persisted(s) | ConversationId::Provisional(s) => s,
        }
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical unordered participant pair.
///
/// The lexicographically smaller user id is always stored first, so two
/// users map to exactly one pair regardless of who initiates. The invariant
/// is enforced at construction; the fields are private for that reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantPair {
    first: UserId,
    second: UserId,
}

impl ParticipantPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &UserId {
        &self.first
    }

    pub fn second(&self) -> &UserId {
        &self.second
    }

    pub fn contains(&self, user: &UserId) -> bool {
        &self.first == user || &self.second == user
    }

    /// The counterpart of `user`, or `None` if `user` is not a participant.
    pub fn other(&self, user: &UserId) -> Option<&UserId> {
        if &self.first == user {
            Some(&self.second)
        } else if &self.second == user {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// A conversation between two users, optionally tied to a booking.
///
/// `last_message` / `last_message_at` are denormalized snapshots kept for
/// list display; the store updates them on every message insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: ParticipantPair,
    pub related_booking: Option<BookingId>,
    pub last_message: Option<String>,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Build the client-only placeholder used before the first send.
    pub fn provisional(
        participants: ParticipantPair,
        related_booking: Option<BookingId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ConversationId::new_provisional(),
            participants,
            related_booking,
            last_message: None,
            last_message_at: now,
            created_at: now,
        }
    }

    pub fn counterpart(&self, user: &UserId) -> Option<&UserId> {
        self.participants.other(user)
    }
}

/// Insert payload for a new conversation row.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub participants: ParticipantPair,
    pub related_booking: Option<BookingId>,
    /// Seed for the denormalized last-message snapshot (the text that
    /// triggered the promotion from provisional).
    pub last_message: Option<String>,
}

/// A message row. Immutable once created except for the read flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub is_read: bool,
    pub related_booking: Option<BookingId>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new message row.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Must be a persisted id; stores reject provisional ids.
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub related_booking: Option<BookingId>,
}

/// A registered service provider, joined read-only for name resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: ProviderId,
    pub user_id: UserId,
    pub name: String,
}

/// A booking, joined read-only for name resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub client_user_id: UserId,
    pub client_name: String,
    pub provider_id: ProviderId,
}

/// Ephemeral "user is typing" broadcast. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingSignal {
    pub user_id: UserId,
    pub user_name: String,
    pub sent_at: DateTime<Utc>,
}

/// Expiry policy for typing-roster entries.
///
/// `FixedWindow` reproduces the source behavior: a repeat signal from the
/// same user does not extend the deadline, so rapid typists flicker the
/// indicator off between keystrokes beyond the window. Surfaced as a
/// policy so product can flip it rather than the code silently fixing it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryPolicy {
    #[default]
    FixedWindow,
    ResetOnRepeat,
}

/// A change-notification event pushed by the backend.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// A message row was inserted.
    MessageInserted(Message),
    /// A conversation row was inserted or updated.
    ConversationUpserted(Conversation),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pair_is_canonical_regardless_of_argument_order() {
        let a = ParticipantPair::new(UserId("u1".into()), UserId("u2".into()));
        let b = ParticipantPair::new(UserId("u2".into()), UserId("u1".into()));
        assert_eq!(a, b);
        assert_eq!(a.first(), &UserId("u1".into()));
        assert_eq!(a.second(), &UserId("u2".into()));
    }

    #[test]
    fn pair_other_resolves_counterpart() {
        let pair = ParticipantPair::new(UserId("u1".into()), UserId("u2".into()));
        assert_eq!(pair.other(&UserId("u1".into())), Some(&UserId("u2".into())));
        assert_eq!(pair.other(&UserId("u2".into())), Some(&UserId("u1".into())));
        assert_eq!(pair.other(&UserId("u3".into())), None);
    }

    #[test]
    fn provisional_ids_are_marked_and_prefixed() {
        let id = ConversationId::new_provisional();
        assert!(id.is_provisional());
        assert!(id.as_str().starts_with("temp-"));

        let persisted = ConversationId::Persisted("c-1".into());
        assert!(!persisted.is_provisional());
    }

    #[test]
    fn provisional_conversation_has_no_last_message() {
        let now = Utc::now();
        let conv = Conversation::provisional(
            ParticipantPair::new(UserId("u1".into()), UserId("u2".into())),
            Some(BookingId("b1".into())),
            now,
        );
        assert!(conv.id.is_provisional());
        assert_eq!(conv.last_message, None);
        assert_eq!(conv.last_message_at, now);
        assert_eq!(conv.related_booking, Some(BookingId("b1".into())));
    }

    #[test]
    fn conversation_serializes_round_trip() {
        let conv = Conversation::provisional(
            ParticipantPair::new(UserId("u1".into()), UserId("u2".into())),
            None,
            Utc::now(),
        );
        let json = serde_json::to_string(&conv).expect("serialize");
        let parsed: Conversation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(conv, parsed);
    }

    #[test]
    fn expiry_policy_parses_kebab_case() {
        use std::str::FromStr;

        assert_eq!(
            ExpiryPolicy::from_str("fixed-window").unwrap(),
            ExpiryPolicy::FixedWindow
        );
        assert_eq!(
            ExpiryPolicy::from_str("reset-on-repeat").unwrap(),
            ExpiryPolicy::ResetOnRepeat
        );
        assert!(ExpiryPolicy::from_str("sliding").is_err());
        assert_eq!(ExpiryPolicy::FixedWindow.to_string(), "fixed-window");
    }

    proptest! {
        #[test]
        fn pair_first_never_exceeds_second(a in "[a-z0-9]{1,12}", b in "[a-z0-9]{1,12}") {
            let pair = ParticipantPair::new(UserId(a), UserId(b));
            prop_assert!(pair.first() <= pair.second());
        }
    }
}
