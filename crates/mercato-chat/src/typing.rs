// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timer-indexed typing roster.
//!
//! Each entry carries an explicit deadline instead of an ad hoc timeout, so
//! the expiry policy is a stated choice: `FixedWindow` keeps the original
//! deadline on repeat signals (the source behavior, flicker included),
//! `ResetOnRepeat` extends it. Deadlines use `tokio::time::Instant` so the
//! paused test clock drives them.

use std::time::Duration;

use tokio::time::Instant;

use mercato_core::{ExpiryPolicy, TypingSignal, UserId};

/// One roster entry: who is typing and when the indicator lapses.
#[derive(Debug, Clone)]
pub struct TypingEntry {
    pub user_id: UserId,
    pub user_name: String,
    pub deadline: Instant,
}

/// Roster of users currently typing in the selected conversation.
///
/// The local user is filtered out before signals reach the roster.
#[derive(Debug)]
pub struct TypingRoster {
    window: Duration,
    policy: ExpiryPolicy,
    entries: Vec<TypingEntry>,
}

impl TypingRoster {
    pub fn new(window: Duration, policy: ExpiryPolicy) -> Self {
        Self {
            window,
            policy,
            entries: Vec::new(),
        }
    }

    /// Insert or replace the entry for the signal's user.
    ///
    /// Under `FixedWindow` a replace keeps the original deadline; under
    /// `ResetOnRepeat` the deadline moves to `now + window`.
    pub fn observe(&mut self, signal: TypingSignal, now: Instant) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.user_id == signal.user_id)
        {
            Some(entry) => {
                entry.user_name = signal.user_name;
                if self.policy == ExpiryPolicy::ResetOnRepeat {
                    entry.deadline = now + self.window;
                }
            }
            None => self.entries.push(TypingEntry {
                user_id: signal.user_id,
                user_name: signal.user_name,
                deadline: now + self.window,
            }),
        }
    }

    /// Drop every entry whose deadline has passed. Returns how many lapsed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.deadline > now);
        before - self.entries.len()
    }

    /// The earliest pending deadline, for scheduling the next expiry wake.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Display names of everyone currently typing.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.user_name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
