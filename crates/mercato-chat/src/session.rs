// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session: the explicit context object tying directory, thread,
//! typing roster, and unread badge together over an injected backend.
//!
//! Every history fetch is tagged with a generation counter; a fetch that
//! completes after a newer `select_conversation` superseded it is
//! discarded instead of overwriting fresher state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error};

use mercato_config::ChatConfig;
use mercato_core::{
    Backend, BookingId, Conversation, ConversationId, ExpiryPolicy, MercatoError, Message,
    NewConversation, NewMessage, ParticipantPair, TypingSignal, UserId,
};

use crate::badge::format_badge;
use crate::directory::{self, ConversationEntry};
use crate::events::{ThreadEvent, ThreadState};
use crate::typing::TypingRoster;

/// The authenticated user this session acts for.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: UserId,
    pub display_name: String,
}

/// Policies governing typing expiry and badge display.
#[derive(Debug, Clone)]
pub struct ChatPolicies {
    pub typing_expiry: Duration,
    pub typing_policy: ExpiryPolicy,
    pub unread_badge_cap: u64,
}

impl Default for ChatPolicies {
    fn default() -> Self {
        Self {
            typing_expiry: Duration::from_millis(3000),
            typing_policy: ExpiryPolicy::FixedWindow,
            unread_badge_cap: 9,
        }
    }
}

impl ChatPolicies {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            typing_expiry: config.typing_expiry(),
            typing_policy: config.expiry_policy(),
            unread_badge_cap: u64::from(config.unread_badge_cap),
        }
    }
}

/// Request to open (or create a placeholder for) a conversation with
/// another user, optionally scoped to a booking.
#[derive(Debug, Clone)]
pub struct StartConversation {
    pub user_id: UserId,
    /// Display-name hint for the counterpart, used until the directory can
    /// resolve one (a provisional thread is not in the directory yet).
    pub user_name: Option<String>,
    pub booking_id: Option<BookingId>,
}

/// Result of a send attempt.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    Sent(Message),
    /// Validation short-circuit: empty text or no active conversation.
    /// Silent by design; no notification is surfaced.
    Ignored,
}

struct SessionState {
    directory: Vec<ConversationEntry>,
    selected: Option<Conversation>,
    selected_name: Option<String>,
    thread: ThreadState,
    roster: TypingRoster,
}

/// One user's chat session over an injected backend.
pub struct ChatSession<B: Backend> {
    backend: Arc<B>,
    user: SessionUser,
    policies: ChatPolicies,
    state: Mutex<SessionState>,
    select_generation: AtomicU64,
}

impl<B: Backend> ChatSession<B> {
    pub fn new(backend: Arc<B>, user: SessionUser, policies: ChatPolicies) -> Self {
        let roster = TypingRoster::new(policies.typing_expiry, policies.typing_policy);
        Self {
            backend,
            user,
            policies,
            state: Mutex::new(SessionState {
                directory: Vec::new(),
                selected: None,
                selected_name: None,
                thread: ThreadState::default(),
                roster,
            }),
            select_generation: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn policies(&self) -> &ChatPolicies {
        &self.policies
    }

    /// Refetch the directory. On failure the prior entries stay untouched
    /// and the error propagates for the caller to surface.
    pub async fn refresh_directory(&self) -> Result<(), MercatoError> {
        let entries = match directory::fetch_directory(self.backend.as_ref(), &self.user.id).await
        {
            Ok(entries) => entries,
            Err(err) => {
                error!(error = %err, "directory fetch failed");
                return Err(err);
            }
        };
        self.state.lock().await.directory = entries;
        Ok(())
    }

    pub async fn directory(&self) -> Vec<ConversationEntry> {
        self.state.lock().await.directory.clone()
    }

    pub async fn selected_conversation(&self) -> Option<Conversation> {
        self.state.lock().await.selected.clone()
    }

    /// Display name for the selected counterpart: the start hint if one was
    /// given, else whatever the directory resolved.
    pub async fn selected_counterpart_name(&self) -> Option<String> {
        let state = self.state.lock().await;
        if let Some(name) = &state.selected_name {
            return Some(name.clone());
        }
        let selected = state.selected.as_ref()?;
        state
            .directory
            .iter()
            .find(|e| e.conversation.id == selected.id)
            .map(|e| e.counterpart_name.clone())
    }

    pub async fn thread_messages(&self) -> Vec<Message> {
        self.state.lock().await.thread.messages().to_vec()
    }

    /// Open a conversation: load its history ascending, then mark unread
    /// messages addressed to this user as read. A provisional conversation
    /// has nothing stored; its thread starts empty with no backend call.
    pub async fn select_conversation(
        &self,
        conversation: Conversation,
    ) -> Result<(), MercatoError> {
        let generation = self.select_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().await;
            state.selected = Some(conversation.clone());
            // Any name hint belonged to the previous selection.
            state.selected_name = None;
            state.thread = ThreadState::default();
            state.roster.clear();
        }
        if conversation.id.is_provisional() {
            return Ok(());
        }

        let history = self
            .backend
            .messages_for_conversation(&conversation.id)
            .await?;
        {
            let mut state = self.state.lock().await;
            if self.select_generation.load(Ordering::SeqCst) != generation {
                debug!(conversation = %conversation.id, "discarding stale history fetch");
                return Ok(());
            }
            state.thread = ThreadState::from_history(history);
        }
        self.mark_read(&conversation.id, generation).await
    }

    /// Mark the active conversation's messages to this user as read.
    pub async fn mark_active_read(&self) -> Result<(), MercatoError> {
        let Some(selected) = self.selected_conversation().await else {
            return Ok(());
        };
        if selected.id.is_provisional() {
            return Ok(());
        }
        let generation = self.select_generation.load(Ordering::SeqCst);
        self.mark_read(&selected.id, generation).await
    }

    async fn mark_read(
        &self,
        conversation: &ConversationId,
        generation: u64,
    ) -> Result<(), MercatoError> {
        let updated = self
            .backend
            .mark_messages_read(conversation, &self.user.id)
            .await?;
        debug!(conversation = %conversation, updated, "marked messages read");

        let mut state = self.state.lock().await;
        if self.select_generation.load(Ordering::SeqCst) == generation {
            state.thread.apply(ThreadEvent::MarkRead {
                reader: self.user.id.clone(),
            });
        }
        if let Some(entry) = state
            .directory
            .iter_mut()
            .find(|e| &e.conversation.id == conversation)
        {
            entry.unread_count = 0;
        }
        Ok(())
    }

    /// Open the conversation with another user scoped to an optional
    /// booking. An existing persisted conversation is reopened (idempotent,
    /// never duplicated); otherwise a provisional placeholder is installed
    /// with no network write.
    pub async fn start_conversation_with(
        &self,
        start: StartConversation,
    ) -> Result<(), MercatoError> {
        let pair = ParticipantPair::new(self.user.id.clone(), start.user_id.clone());
        let existing = self
            .backend
            .find_conversation(&pair, start.booking_id.as_ref())
            .await?;

        match existing {
            Some(conversation) => {
                // Install the hint after the select, which clears any
                // hint left over from the previous selection.
                self.select_conversation(conversation).await?;
                if start.user_name.is_some() {
                    self.state.lock().await.selected_name = start.user_name;
                }
                Ok(())
            }
            None => {
                let conversation =
                    Conversation::provisional(pair, start.booking_id.clone(), Utc::now());
                debug!(conversation = %conversation.id, "opening provisional conversation");
                // Invalidate any in-flight history fetch for the previous
                // selection before installing the placeholder.
                self.select_generation.fetch_add(1, Ordering::SeqCst);
                let mut state = self.state.lock().await;
                state.selected = Some(conversation);
                state.selected_name = start.user_name;
                state.thread = ThreadState::default();
                state.roster.clear();
                Ok(())
            }
        }
    }

    /// Send a message in the active conversation.
    ///
    /// Empty trimmed text or no active conversation is a silent no-op. A
    /// provisional conversation is first promoted to a persisted row seeded
    /// with this text, then the message row is inserted and appended
    /// locally (optimistic; there is no rollback path), then the directory
    /// is refreshed.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, MercatoError> {
        let content = text.trim();
        if content.is_empty() {
            debug!("ignoring empty message");
            return Ok(SendOutcome::Ignored);
        }
        let Some(selected) = self.selected_conversation().await else {
            debug!("no active conversation, ignoring send");
            return Ok(SendOutcome::Ignored);
        };
        let receiver = selected
            .counterpart(&self.user.id)
            .cloned()
            .ok_or_else(|| {
                MercatoError::Internal(format!(
                    "session user {} is not a participant of {}",
                    self.user.id, selected.id
                ))
            })?;

        let conversation = if selected.id.is_provisional() {
            let persisted = self
                .backend
                .insert_conversation(NewConversation {
                    participants: selected.participants.clone(),
                    related_booking: selected.related_booking.clone(),
                    last_message: Some(content.to_string()),
                })
                .await?;
            debug!(provisional = %selected.id, persisted = %persisted.id, "promoted conversation");
            let mut state = self.state.lock().await;
            if state.selected.as_ref().is_some_and(|c| c.id == selected.id) {
                state.selected = Some(persisted.clone());
            }
            persisted
        } else {
            selected
        };

        let message = self
            .backend
            .insert_message(NewMessage {
                conversation_id: conversation.id.clone(),
                sender_id: self.user.id.clone(),
                receiver_id: receiver,
                content: content.to_string(),
                related_booking: conversation.related_booking.clone(),
            })
            .await?;

        self.state
            .lock()
            .await
            .thread
            .apply(ThreadEvent::LocalSend(message.clone()));

        self.refresh_directory().await?;
        Ok(SendOutcome::Sent(message))
    }

    /// Fire a typing signal on the active conversation's channel.
    pub async fn broadcast_typing(&self) -> Result<(), MercatoError> {
        let Some(selected) = self.selected_conversation().await else {
            return Ok(());
        };
        let signal = TypingSignal {
            user_id: self.user.id.clone(),
            user_name: self.user.display_name.clone(),
            sent_at: Utc::now(),
        };
        self.backend.broadcast_typing(&selected.id, signal).await
    }

    /// Fold a received typing signal into the roster. Signals from the
    /// session user are dropped; the roster never contains the local user.
    pub async fn observe_typing(&self, signal: TypingSignal) {
        if signal.user_id == self.user.id {
            return;
        }
        self.state
            .lock()
            .await
            .roster
            .observe(signal, Instant::now());
    }

    /// Drop lapsed roster entries.
    pub async fn expire_typing(&self) {
        self.state.lock().await.roster.expire(Instant::now());
    }

    /// Earliest pending roster deadline, for scheduling the next wake.
    pub async fn next_typing_deadline(&self) -> Option<Instant> {
        self.state.lock().await.roster.next_deadline()
    }

    /// Names of users currently typing, after lazy expiry.
    pub async fn typing_names(&self) -> Vec<String> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        state.roster.expire(now);
        state.roster.names()
    }

    /// Aggregate unread count across the directory.
    pub async fn total_unread(&self) -> u64 {
        self.state
            .lock()
            .await
            .directory
            .iter()
            .map(|e| e.unread_count)
            .sum()
    }

    /// Badge label for the aggregate count; `None` when there is nothing
    /// unread.
    pub async fn badge_label(&self) -> Option<String> {
        format_badge(self.total_unread().await, self.policies.unread_badge_cap)
    }

    /// Apply a remote message insert from the change feed.
    ///
    /// Messages not involving this user are ignored. A message for the open
    /// conversation is appended (de-duplicated by id) and, when this user
    /// is the receiver, immediately marked read. The directory is refreshed
    /// in every involving case.
    pub async fn handle_remote_message(&self, message: Message) -> Result<(), MercatoError> {
        if message.sender_id != self.user.id && message.receiver_id != self.user.id {
            return Ok(());
        }

        let selected = self.selected_conversation().await;
        if let Some(conversation) = selected
            && conversation.id == message.conversation_id
        {
            let is_receiver = message.receiver_id == self.user.id;
            self.state
                .lock()
                .await
                .thread
                .apply(ThreadEvent::RemoteInsert(message));
            if is_receiver {
                let generation = self.select_generation.load(Ordering::SeqCst);
                self.mark_read(&conversation.id, generation).await?;
            }
        }

        self.refresh_directory().await
    }
}
