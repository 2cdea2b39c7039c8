// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query/insert/update surface of the hosted relational store.

use async_trait::async_trait;

use crate::error::MercatoError;
use crate::types::{
    BookingId, BookingRecord, Conversation, ConversationId, Message, NewConversation, NewMessage,
    ParticipantPair, ProviderId, ProviderRecord, UserId,
};

/// The query surface the chat components are written against.
///
/// Implementations wrap the hosted backend's tables (`conversations`,
/// `messages`, plus read-only joins against `providers` and `bookings`).
/// Row-level authorization is the store's concern; callers never check it.
#[async_trait]
pub trait MarketStore: Send + Sync + 'static {
    /// All conversations where `user` is either participant, newest-first
    /// by last-message time.
    async fn conversations_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Conversation>, MercatoError>;

    /// Existing persisted conversation for the canonical pair, scoped to an
    /// optional booking. The idempotent-lookup primitive: this is checked
    /// before any conversation insert.
    async fn find_conversation(
        &self,
        participants: &ParticipantPair,
        booking: Option<&BookingId>,
    ) -> Result<Option<Conversation>, MercatoError>;

    /// Insert a conversation row, assigning its id and timestamps.
    async fn insert_conversation(
        &self,
        new: NewConversation,
    ) -> Result<Conversation, MercatoError>;

    /// All messages in a conversation, ascending by creation time.
    async fn messages_for_conversation(
        &self,
        conversation: &ConversationId,
    ) -> Result<Vec<Message>, MercatoError>;

    /// Insert a message row, assigning its id and timestamp. The
    /// conversation id must be persisted.
    async fn insert_message(&self, new: NewMessage) -> Result<Message, MercatoError>;

    /// Flip the read flag on every unread message in `conversation`
    /// addressed to `receiver`. Returns the number of rows updated.
    async fn mark_messages_read(
        &self,
        conversation: &ConversationId,
        receiver: &UserId,
    ) -> Result<u64, MercatoError>;

    /// Count of unread messages in `conversation` addressed to `receiver`.
    async fn unread_count(
        &self,
        conversation: &ConversationId,
        receiver: &UserId,
    ) -> Result<u64, MercatoError>;

    /// Provider profile registered under `user`, if any.
    async fn provider_for_user(
        &self,
        user: &UserId,
    ) -> Result<Option<ProviderRecord>, MercatoError>;

    /// Provider profile by provider id.
    async fn provider_by_id(
        &self,
        provider: &ProviderId,
    ) -> Result<Option<ProviderRecord>, MercatoError>;

    /// Booking row by id.
    async fn booking_by_id(
        &self,
        booking: &BookingId,
    ) -> Result<Option<BookingRecord>, MercatoError>;
}
