// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mercato messaging slice.

use thiserror::Error;

/// The primary error type used across the backend traits and chat operations.
#[derive(Debug, Error)]
pub enum MercatoError {
    /// Backend store errors (query failure, insert failure, connection loss).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input rejected before any backend call (empty message text,
    /// provisional id where a persisted one is required).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MercatoError {
    /// Wrap an arbitrary backend failure, preserving it as the source.
    pub fn backend(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        MercatoError::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
