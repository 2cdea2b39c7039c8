// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `MemoryBackend` implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, broadcast};

use mercato_core::{
    BookingId, BookingRecord, ChangeEvent, ChangeFeed, Conversation, ConversationId, MarketStore,
    MercatoError, Message, MessageId, NewConversation, NewMessage, ParticipantPair, ProviderId,
    ProviderRecord, TypingSignal, UserId,
};

/// Broadcast channel depth for change feeds and typing channels.
const FEED_CAPACITY: usize = 64;

#[derive(Default)]
struct Tables {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    providers: Vec<ProviderRecord>,
    bookings: Vec<BookingRecord>,
}

/// In-memory implementation of the backend traits.
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    message_events: broadcast::Sender<ChangeEvent>,
    conversation_events: broadcast::Sender<ChangeEvent>,
    /// Typing channels keyed by conversation id string, created lazily on
    /// first broadcast or subscribe. Provisional ids get channels too.
    typing: Mutex<HashMap<String, broadcast::Sender<TypingSignal>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (message_events, _) = broadcast::channel(FEED_CAPACITY);
        let (conversation_events, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tables: Mutex::new(Tables::default()),
            message_events,
            conversation_events,
            typing: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a provider record for name resolution.
    pub async fn seed_provider(&self, provider: ProviderRecord) {
        self.tables.lock().await.providers.push(provider);
    }

    /// Seed a booking record for name resolution.
    pub async fn seed_booking(&self, booking: BookingRecord) {
        self.tables.lock().await.bookings.push(booking);
    }

    async fn typing_sender(&self, conversation: &ConversationId) -> broadcast::Sender<TypingSignal> {
        self.typing
            .lock()
            .await
            .entry(conversation.as_str().to_string())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .clone()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for MemoryBackend {
    async fn conversations_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Conversation>, MercatoError> {
        let tables = self.tables.lock().await;
        let mut out: Vec<Conversation> = tables
            .conversations
            .iter()
            .filter(|c| c.participants.contains(user))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(out)
    }

    async fn find_conversation(
        &self,
        participants: &ParticipantPair,
        booking: Option<&BookingId>,
    ) -> Result<Option<Conversation>, MercatoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .conversations
            .iter()
            .find(|c| &c.participants == participants && c.related_booking.as_ref() == booking)
            .cloned())
    }

    async fn insert_conversation(
        &self,
        new: NewConversation,
    ) -> Result<Conversation, MercatoError> {
        let now = Utc::now();
        let conversation = Conversation {
            id: ConversationId::Persisted(uuid::Uuid::new_v4().to_string()),
            participants: new.participants,
            related_booking: new.related_booking,
            last_message: new.last_message,
            last_message_at: now,
            created_at: now,
        };
        self.tables
            .lock()
            .await
            .conversations
            .push(conversation.clone());
        // No receivers is fine; the feed is fire-and-forget.
        let _ = self
            .conversation_events
            .send(ChangeEvent::ConversationUpserted(conversation.clone()));
        Ok(conversation)
    }

    async fn messages_for_conversation(
        &self,
        conversation: &ConversationId,
    ) -> Result<Vec<Message>, MercatoError> {
        let tables = self.tables.lock().await;
        let mut out: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| &m.conversation_id == conversation)
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order.
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(out)
    }

    async fn insert_message(&self, new: NewMessage) -> Result<Message, MercatoError> {
        if new.conversation_id.is_provisional() {
            return Err(MercatoError::Validation(format!(
                "cannot insert a message into provisional conversation {}",
                new.conversation_id
            )));
        }

        let mut tables = self.tables.lock().await;
        let Some(conv_idx) = tables
            .conversations
            .iter()
            .position(|c| c.id == new.conversation_id)
        else {
            return Err(MercatoError::NotFound {
                entity: "conversation",
                id: new.conversation_id.to_string(),
            });
        };

        let now = Utc::now();
        let message = Message {
            id: MessageId(uuid::Uuid::new_v4().to_string()),
            conversation_id: new.conversation_id,
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            content: new.content,
            is_read: false,
            related_booking: new.related_booking,
            created_at: now,
        };
        tables.messages.push(message.clone());

        // Refresh the denormalized last-message snapshot.
        let conv = &mut tables.conversations[conv_idx];
        conv.last_message = Some(message.content.clone());
        conv.last_message_at = now;
        let updated = conv.clone();
        drop(tables);

        let _ = self
            .message_events
            .send(ChangeEvent::MessageInserted(message.clone()));
        let _ = self
            .conversation_events
            .send(ChangeEvent::ConversationUpserted(updated));
        Ok(message)
    }

    async fn mark_messages_read(
        &self,
        conversation: &ConversationId,
        receiver: &UserId,
    ) -> Result<u64, MercatoError> {
        let mut tables = self.tables.lock().await;
        let mut updated = 0u64;
        for msg in tables
            .messages
            .iter_mut()
            .filter(|m| &m.conversation_id == conversation && &m.receiver_id == receiver)
        {
            if !msg.is_read {
                msg.is_read = true;
                updated += 1;
            }
        }
        let changed = tables
            .conversations
            .iter()
            .find(|c| &c.id == conversation)
            .cloned();
        drop(tables);

        if updated > 0
            && let Some(conv) = changed
        {
            let _ = self
                .conversation_events
                .send(ChangeEvent::ConversationUpserted(conv));
        }
        Ok(updated)
    }

    async fn unread_count(
        &self,
        conversation: &ConversationId,
        receiver: &UserId,
    ) -> Result<u64, MercatoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .messages
            .iter()
            .filter(|m| {
                &m.conversation_id == conversation && &m.receiver_id == receiver && !m.is_read
            })
            .count() as u64)
    }

    async fn provider_for_user(
        &self,
        user: &UserId,
    ) -> Result<Option<ProviderRecord>, MercatoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .providers
            .iter()
            .find(|p| &p.user_id == user)
            .cloned())
    }

    async fn provider_by_id(
        &self,
        provider: &ProviderId,
    ) -> Result<Option<ProviderRecord>, MercatoError> {
        let tables = self.tables.lock().await;
        Ok(tables.providers.iter().find(|p| &p.id == provider).cloned())
    }

    async fn booking_by_id(
        &self,
        booking: &BookingId,
    ) -> Result<Option<BookingRecord>, MercatoError> {
        let tables = self.tables.lock().await;
        Ok(tables.bookings.iter().find(|b| &b.id == booking).cloned())
    }
}

#[async_trait]
impl ChangeFeed for MemoryBackend {
    async fn subscribe_messages(
        &self,
    ) -> Result<broadcast::Receiver<ChangeEvent>, MercatoError> {
        Ok(self.message_events.subscribe())
    }

    async fn subscribe_conversations(
        &self,
    ) -> Result<broadcast::Receiver<ChangeEvent>, MercatoError> {
        Ok(self.conversation_events.subscribe())
    }

    async fn broadcast_typing(
        &self,
        conversation: &ConversationId,
        signal: TypingSignal,
    ) -> Result<(), MercatoError> {
        let sender = self.typing_sender(conversation).await;
        let _ = sender.send(signal);
        Ok(())
    }

    async fn subscribe_typing(
        &self,
        conversation: &ConversationId,
    ) -> Result<broadcast::Receiver<TypingSignal>, MercatoError> {
        Ok(self.typing_sender(conversation).await.subscribe())
    }
}
