// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted two-user conversation over the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use mercato_chat::{ChatPolicies, ChatSession, SessionUser, StartConversation, spawn_listener};
use mercato_config::MercatoConfig;
use mercato_core::{
    BookingId, BookingRecord, MercatoError, ProviderId, ProviderRecord, UserId,
};
use mercato_memstore::MemoryBackend;

/// Seed a backend with a client, a provider, and one booking, then run a
/// short conversation between them with both change-feed listeners live.
pub async fn run(config: &MercatoConfig) -> Result<(), MercatoError> {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed_provider(ProviderRecord {
            id: ProviderId("prov-1".into()),
            user_id: UserId("user-pat".into()),
            name: "Ace Plumbing".into(),
        })
        .await;
    backend
        .seed_booking(BookingRecord {
            id: BookingId("booking-1".into()),
            client_user_id: UserId("user-dana".into()),
            client_name: "Dana".into(),
            provider_id: ProviderId("prov-1".into()),
        })
        .await;

    let policies = ChatPolicies::from_config(&config.chat);
    let dana = Arc::new(ChatSession::new(
        backend.clone(),
        SessionUser {
            id: UserId("user-dana".into()),
            display_name: "Dana".into(),
        },
        policies.clone(),
    ));
    let pat = Arc::new(ChatSession::new(
        backend.clone(),
        SessionUser {
            id: UserId("user-pat".into()),
            display_name: "Ace Plumbing".into(),
        },
        policies,
    ));

    let dana_listener = spawn_listener(dana.clone()).await?;
    let pat_listener = spawn_listener(pat.clone()).await?;

    // Dana opens a thread with the provider, scoped to her booking.
    dana.start_conversation_with(StartConversation {
        user_id: UserId("user-pat".into()),
        user_name: Some("Ace Plumbing".into()),
        booking_id: Some(BookingId("booking-1".into())),
    })
    .await?;
    dana.send_message("Hi, does Thursday morning still work?")
        .await?;
    info!("dana sent the opening message");

    // Give the change feed a beat to reach Pat's session.
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("== Pat's inbox ==");
    for entry in pat.directory().await {
        println!(
            "  {} ({} unread) last: {}",
            entry.counterpart_name,
            entry.unread_count,
            entry.conversation.last_message.as_deref().unwrap_or("-"),
        );
    }
    println!(
        "  badge: {}",
        pat.badge_label().await.unwrap_or_else(|| "(hidden)".into())
    );

    // Pat opens the thread (marking it read) and replies.
    let entry = pat
        .directory()
        .await
        .into_iter()
        .next()
        .ok_or_else(|| MercatoError::Internal("pat has no conversations".into()))?;
    pat.select_conversation(entry.conversation).await?;
    pat.broadcast_typing().await?;
    pat.send_message("Thursday 9am works. See you then!").await?;

    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("== Thread (Dana's view) ==");
    for message in dana.thread_messages().await {
        let read = if message.is_read { "read" } else { "unread" };
        println!("  [{}] {}: {}", read, message.sender_id, message.content);
    }
    println!(
        "  dana badge: {}",
        dana.badge_label()
            .await
            .unwrap_or_else(|| "(hidden)".into())
    );

    dana_listener.abort();
    pat_listener.abort();
    Ok(())
}
