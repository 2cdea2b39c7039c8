// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publish/subscribe change-notification surface of the hosted backend.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::MercatoError;
use crate::types::{ChangeEvent, ConversationId, TypingSignal};

/// Push notifications for table changes plus the ephemeral typing channel.
///
/// Receivers are `tokio::sync::broadcast` ends: every subscriber sees every
/// event from its subscription point onward. Reconnection and lag policy
/// are whatever the transport provides; this layer adds none.
#[async_trait]
pub trait ChangeFeed: Send + Sync + 'static {
    /// Insert events on the `messages` table.
    async fn subscribe_messages(&self)
    -> Result<broadcast::Receiver<ChangeEvent>, MercatoError>;

    /// Any insert/update on the `conversations` table.
    async fn subscribe_conversations(
        &self,
    ) -> Result<broadcast::Receiver<ChangeEvent>, MercatoError>;

    /// Fire an ephemeral typing signal on the per-conversation channel.
    /// Nothing is persisted; subscribers that joined later never see it.
    async fn broadcast_typing(
        &self,
        conversation: &ConversationId,
        signal: TypingSignal,
    ) -> Result<(), MercatoError>;

    /// Typing signals for one conversation, including the caller's own.
    /// Filtering out the local user happens at the consumer.
    async fn subscribe_typing(
        &self,
        conversation: &ConversationId,
    ) -> Result<broadcast::Receiver<TypingSignal>, MercatoError>;
}
