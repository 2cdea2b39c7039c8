// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mercato.toml` > `~/.config/mercato/mercato.toml`
//! > `/etc/mercato/mercato.toml` with environment variable overrides via the
//! `MERCATO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MercatoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mercato/mercato.toml` (system-wide)
/// 3. `~/.config/mercato/mercato.toml` (user XDG config)
/// 4. `./mercato.toml` (local directory)
/// 5. `MERCATO_*` environment variables
pub fn load_config() -> Result<MercatoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MercatoConfig::default()))
        .merge(Toml::file("/etc/mercato/mercato.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mercato/mercato.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mercato.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MercatoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MercatoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MercatoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MercatoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping. `MERCATO_CHAT_TYPING_EXPIRY_MS` must map to
/// `chat.typing_expiry_ms`, not `chat.typing.expiry.ms`, so only the
/// section prefix is converted.
fn env_provider() -> Env {
    Env::prefixed("MERCATO_").map(|key| {
        let key_str = key.as_str();
        key_str.replacen("chat_", "chat.", 1).into()
    })
}
