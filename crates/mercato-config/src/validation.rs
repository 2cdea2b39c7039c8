// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects all errors rather than failing fast.

use std::str::FromStr;

use mercato_core::ExpiryPolicy;

use crate::diagnostic::ConfigError;
use crate::model::MercatoConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &MercatoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.chat.typing_expiry_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.typing_expiry_ms must be greater than zero".to_string(),
        });
    }

    if ExpiryPolicy::from_str(&config.chat.typing_expiry_policy).is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "chat.typing_expiry_policy `{}` is not recognized (expected `fixed-window` or `reset-on-repeat`)",
                config.chat.typing_expiry_policy
            ),
        });
    }

    if config.chat.unread_badge_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.unread_badge_cap must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
