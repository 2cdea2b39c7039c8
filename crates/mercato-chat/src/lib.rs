// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat orchestration for the Mercato marketplace.
//!
//! Pure client-side composition over the backend traits in `mercato-core`:
//! the conversation directory, the message thread as a typed event reducer,
//! the timer-indexed typing roster, the unread badge, and the change-feed
//! listener that keeps them fresh without polling. All state is held by an
//! explicit [`ChatSession`]; substituting an in-memory backend makes every
//! path testable without a network.

pub mod badge;
pub mod directory;
pub mod events;
pub mod listener;
pub mod session;
pub mod typing;

pub use badge::format_badge;
pub use directory::{ConversationEntry, fetch_directory};
pub use events::{ThreadEvent, ThreadState};
pub use listener::{spawn_listener, spawn_typing_listener};
pub use session::{ChatPolicies, ChatSession, SendOutcome, SessionUser, StartConversation};
pub use typing::{TypingEntry, TypingRoster};
