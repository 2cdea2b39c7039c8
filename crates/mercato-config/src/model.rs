// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mercato_core::ExpiryPolicy;

/// Top-level Mercato configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to the
/// shipped behavior.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MercatoConfig {
    /// Chat policy settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Chat policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Typing-indicator expiry window in milliseconds.
    #[serde(default = "default_typing_expiry_ms")]
    pub typing_expiry_ms: u64,

    /// Typing expiry policy: `fixed-window` (repeat signals do not extend
    /// the deadline) or `reset-on-repeat`.
    #[serde(default = "default_typing_expiry_policy")]
    pub typing_expiry_policy: String,

    /// Unread-badge cap; counts above it render as `"{cap}+"`.
    #[serde(default = "default_unread_badge_cap")]
    pub unread_badge_cap: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_expiry_ms: default_typing_expiry_ms(),
            typing_expiry_policy: default_typing_expiry_policy(),
            unread_badge_cap: default_unread_badge_cap(),
        }
    }
}

impl ChatConfig {
    pub fn typing_expiry(&self) -> Duration {
        Duration::from_millis(self.typing_expiry_ms)
    }

    /// Parsed policy. Defaults to `FixedWindow` if the string is invalid;
    /// validation rejects invalid strings before this is ever reached.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::from_str(&self.typing_expiry_policy).unwrap_or_default()
    }
}

fn default_typing_expiry_ms() -> u64 {
    3000
}

fn default_typing_expiry_policy() -> String {
    ExpiryPolicy::FixedWindow.to_string()
}

fn default_unread_badge_cap() -> u32 {
    9
}
