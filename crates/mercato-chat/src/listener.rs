// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-feed listener tasks.
//!
//! One task keeps the session fresh from the message/conversation feeds;
//! a second, swapped per selected conversation, drives the typing roster.
//! No reconnection or backoff beyond what the transport provides: a closed
//! receiver ends the task.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use mercato_core::{Backend, ChangeEvent, ConversationId, MercatoError};

use crate::session::ChatSession;

/// Subscribe to the message and conversation feeds and spawn the task that
/// applies them to `session`.
pub async fn spawn_listener<B: Backend>(
    session: Arc<ChatSession<B>>,
) -> Result<JoinHandle<()>, MercatoError> {
    let mut messages = session.backend().subscribe_messages().await?;
    let mut conversations = session.backend().subscribe_conversations().await?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                event = messages.recv() => match event {
                    Ok(ChangeEvent::MessageInserted(message)) => {
                        if let Err(err) = session.handle_remote_message(message).await {
                            warn!(error = %err, "failed to apply remote message");
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "message feed lagged, refetching");
                        let _ = session.refresh_directory().await;
                    }
                    Err(RecvError::Closed) => break,
                },
                event = conversations.recv() => match event {
                    Ok(_) => {
                        if let Err(err) = session.refresh_directory().await {
                            warn!(error = %err, "directory refresh failed");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "conversation feed lagged, refetching");
                        let _ = session.refresh_directory().await;
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        debug!("change feed listener stopped");
    }))
}

/// Subscribe to one conversation's typing channel and spawn the task that
/// feeds the session's roster and expires lapsed entries.
///
/// Callers swap this task when the selected conversation changes: abort the
/// old handle and spawn a new one for the new id.
pub async fn spawn_typing_listener<B: Backend>(
    session: Arc<ChatSession<B>>,
    conversation: &ConversationId,
) -> Result<JoinHandle<()>, MercatoError> {
    let mut signals = session.backend().subscribe_typing(conversation).await?;

    Ok(tokio::spawn(async move {
        loop {
            let deadline = session.next_typing_deadline().await;
            tokio::select! {
                signal = signals.recv() => match signal {
                    Ok(signal) => session.observe_typing(signal).await,
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
                _ = sleep_until_or_pending(deadline) => {
                    session.expire_typing().await;
                }
            }
        }
        debug!("typing listener stopped");
    }))
}

async fn sleep_until_or_pending(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
