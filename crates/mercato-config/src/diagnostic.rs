// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration errors.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error rendered as a miette diagnostic.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to parse or merge the configuration sources.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(mercato::config::parse),
        help("check mercato.toml against the documented [chat] keys")
    )]
    Parse {
        /// The underlying figment error text.
        message: String,
    },

    /// A loaded value failed a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(mercato::config::validation))]
    Validation { message: String },
}

/// Render collected config errors to stderr via miette's fancy reporter.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!(
            "{:?}",
            miette::Report::msg(err.to_string()).context("invalid configuration")
        );
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}
