// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation directory: list, counterpart name resolution, unread counts.

use tracing::debug;

use mercato_core::{Conversation, MarketStore, MercatoError, UserId};

/// Fallback display name when neither a provider profile nor a booking
/// resolves the counterpart.
const FALLBACK_NAME: &str = "User";

/// One directory row: the conversation plus display-ready fields.
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    pub conversation: Conversation,
    pub counterpart_name: String,
    pub unread_count: u64,
}

/// Fetch the full directory for `user`: all conversations where the user is
/// either participant, newest-first, each with a resolved counterpart name
/// and unread count.
///
/// Any query error aborts the whole fetch; the caller keeps its prior
/// entries untouched.
pub async fn fetch_directory<S>(
    store: &S,
    user: &UserId,
) -> Result<Vec<ConversationEntry>, MercatoError>
where
    S: MarketStore + ?Sized,
{
    let conversations = store.conversations_for_user(user).await?;
    debug!(user = %user, count = conversations.len(), "fetched conversations");

    let mut entries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let counterpart_name = resolve_counterpart_name(store, user, &conversation).await?;
        let unread_count = store.unread_count(&conversation.id, user).await?;
        entries.push(ConversationEntry {
            conversation,
            counterpart_name,
            unread_count,
        });
    }
    Ok(entries)
}

/// Resolve a display name for the other participant.
///
/// Order: (a) the counterpart's registered provider profile; (b) the related
/// booking — the provider's name when `user` is the booking's client, the
/// client's name otherwise; (c) a generic placeholder.
async fn resolve_counterpart_name<S>(
    store: &S,
    user: &UserId,
    conversation: &Conversation,
) -> Result<String, MercatoError>
where
    S: MarketStore + ?Sized,
{
    let Some(other) = conversation.counterpart(user) else {
        return Ok(FALLBACK_NAME.to_string());
    };

    if let Some(provider) = store.provider_for_user(other).await? {
        return Ok(provider.name);
    }

    if let Some(booking_id) = &conversation.related_booking
        && let Some(booking) = store.booking_by_id(booking_id).await?
    {
        if &booking.client_user_id == user {
            if let Some(provider) = store.provider_by_id(&booking.provider_id).await? {
                return Ok(provider.name);
            }
        } else {
            return Ok(booking.client_name);
        }
    }

    Ok(FALLBACK_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercato_core::{
        BookingId, BookingRecord, NewConversation, NewMessage, ParticipantPair, ProviderId,
        ProviderRecord,
    };
    use mercato_memstore::MemoryBackend;

    fn pair(a: &str, b: &str) -> ParticipantPair {
        ParticipantPair::new(UserId(a.into()), UserId(b.into()))
    }

    async fn conversation_with_booking(
        backend: &MemoryBackend,
        a: &str,
        b: &str,
        booking: Option<&str>,
    ) -> Conversation {
        backend
            .insert_conversation(NewConversation {
                participants: pair(a, b),
                related_booking: booking.map(|id| BookingId(id.into())),
                last_message: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn provider_profile_wins_name_resolution() {
        let backend = MemoryBackend::new();
        backend
            .seed_provider(ProviderRecord {
                id: ProviderId("p1".into()),
                user_id: UserId("u2".into()),
                name: "Ace Plumbing".into(),
            })
            .await;
        conversation_with_booking(&backend, "u1", "u2", None).await;

        let entries = fetch_directory(&backend, &UserId("u1".into())).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].counterpart_name, "Ace Plumbing");
    }

    #[tokio::test]
    async fn booking_client_sees_provider_name() {
        let backend = MemoryBackend::new();
        // Counterpart has no provider profile under their login user id; the
        // booking join resolves the provider's display name instead.
        backend
            .seed_provider(ProviderRecord {
                id: ProviderId("p1".into()),
                user_id: UserId("u9".into()),
                name: "Spark Electric".into(),
            })
            .await;
        backend
            .seed_booking(BookingRecord {
                id: BookingId("b1".into()),
                client_user_id: UserId("u1".into()),
                client_name: "Dana".into(),
                provider_id: ProviderId("p1".into()),
            })
            .await;
        conversation_with_booking(&backend, "u1", "u2", Some("b1")).await;

        let entries = fetch_directory(&backend, &UserId("u1".into())).await.unwrap();
        assert_eq!(entries[0].counterpart_name, "Spark Electric");
    }

    #[tokio::test]
    async fn booking_provider_sees_client_name() {
        let backend = MemoryBackend::new();
        backend
            .seed_booking(BookingRecord {
                id: BookingId("b1".into()),
                client_user_id: UserId("u1".into()),
                client_name: "Dana".into(),
                provider_id: ProviderId("p1".into()),
            })
            .await;
        conversation_with_booking(&backend, "u1", "u2", Some("b1")).await;

        // u2 is the provider side of the booking; they see the client's name.
        let entries = fetch_directory(&backend, &UserId("u2".into())).await.unwrap();
        assert_eq!(entries[0].counterpart_name, "Dana");
    }

    #[tokio::test]
    async fn unresolvable_counterpart_falls_back() {
        let backend = MemoryBackend::new();
        conversation_with_booking(&backend, "u1", "u2", None).await;

        let entries = fetch_directory(&backend, &UserId("u1".into())).await.unwrap();
        assert_eq!(entries[0].counterpart_name, "User");
    }

    #[tokio::test]
    async fn unread_counts_are_per_conversation() {
        let backend = MemoryBackend::new();
        let conv = conversation_with_booking(&backend, "u1", "u2", None).await;
        for _ in 0..2 {
            backend
                .insert_message(NewMessage {
                    conversation_id: conv.id.clone(),
                    sender_id: UserId("u2".into()),
                    receiver_id: UserId("u1".into()),
                    content: "ping".into(),
                    related_booking: None,
                })
                .await
                .unwrap();
        }

        let for_u1 = fetch_directory(&backend, &UserId("u1".into())).await.unwrap();
        assert_eq!(for_u1[0].unread_count, 2);

        let for_u2 = fetch_directory(&backend, &UserId("u2".into())).await.unwrap();
        assert_eq!(for_u2[0].unread_count, 0);
    }
}
