// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the capstone meeting scheduler.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, miette diagnostics
//! with typo suggestions, and tracing subscriber setup.
//!
//! # Usage
//!
//! ```no_run
//! use capstone_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("portal: {}", config.portal.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod logging;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use logging::init_tracing;
pub use model::{CapstoneConfig, LoggingConfig, PortalConfig, ScheduleConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment failures are converted to diagnostics with source spans; a config
/// that deserializes is then checked by [`validation::validate_config`].
pub fn load_and_validate() -> Result<CapstoneConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<CapstoneConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Contents of every config file in the hierarchy that exists, for span lookup.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from(loader::SYSTEM_CONFIG)];
    candidates.extend(loader::user_config_path());
    if let Ok(dir) = std::env::current_dir() {
        candidates.push(dir.join(loader::LOCAL_CONFIG));
    }

    candidates
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
