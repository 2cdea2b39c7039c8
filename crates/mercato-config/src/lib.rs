// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Mercato messaging slice.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and miette diagnostic rendering.
//!
//! # Usage
//!
//! ```no_run
//! use mercato_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("typing window: {:?}", config.chat.typing_expiry());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ChatConfig, MercatoConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `MercatoConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<MercatoConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![err.into()]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<MercatoConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![err.into()]),
    }
}

/// Load configuration from a specific file path and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<MercatoConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![err.into()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_surfaces_as_validation_error() {
        let errors = load_and_validate_str("[chat]\ntyping_expiry_ms = 0\n").unwrap_err();
        assert!(matches!(errors[0], ConfigError::Validation { .. }));
    }

    #[test]
    fn parse_failure_surfaces_as_parse_error() {
        let errors = load_and_validate_str("[chat]\nbogus_key = 1\n").unwrap_err();
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
    }
}
