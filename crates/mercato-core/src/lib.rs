// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mercato messaging slice.
//!
//! This crate provides the domain types, error type, and backend trait
//! definitions used throughout the Mercato workspace. The chat components
//! in `mercato-chat` are written entirely against the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MercatoError;
pub use traits::{Backend, ChangeFeed, MarketStore};
pub use types::{
    BookingId, BookingRecord, ChangeEvent, Conversation, ConversationId, ExpiryPolicy, Message,
    MessageId, NewConversation, NewMessage, ParticipantPair, ProviderId, ProviderRecord,
    TypingSignal, UserId,
};
