// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory backend for the Mercato messaging slice.
//!
//! `MemoryBackend` implements both `MarketStore` and `ChangeFeed` over
//! plain tables behind a single async mutex, with tokio broadcast channels
//! standing in for the hosted platform's change notifications. It is the
//! substitutable fake backend used by tests and the demo binary.
//!
//! Consistency matches the hosted store it imitates: the pair+booking
//! uniqueness check is a read immediately before insert, not an atomic
//! constraint, so concurrent first-sends from both participants can still
//! produce a duplicate.

mod backend;

pub use backend::MemoryBackend;
