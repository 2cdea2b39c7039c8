// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait definitions.
//!
//! The chat components are pure orchestration over these two seams: the
//! request/response store and the push change feed. Production backends
//! wrap the hosted platform's client; tests inject an in-memory fake.

pub mod feed;
pub mod store;

pub use feed::ChangeFeed;
pub use store::MarketStore;

/// Convenience bound for backends implementing both surfaces.
pub trait Backend: MarketStore + ChangeFeed {}

impl<T: MarketStore + ChangeFeed> Backend for T {}
