// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express: URL shape,
//! non-zero limits, and that day aliases point at real days.

use crate::diagnostic::ConfigError;
use crate::model::CapstoneConfig;

const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CapstoneConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.portal.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "portal.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("portal.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.portal.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "portal.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.schedule.suggestion_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "schedule.suggestion_limit must be at least 1".to_string(),
        });
    }

    // A slot chosen by a single member is never a consensus.
    if config.schedule.min_support < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.min_support must be at least 2, got {}",
                config.schedule.min_support
            ),
        });
    }

    for (alias, target) in &config.schedule.day_aliases {
        if alias.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "schedule.day_aliases contains an empty alias".to_string(),
            });
        }
        if !DAY_NAMES.contains(&target.trim().to_lowercase().as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "schedule.day_aliases `{alias}` points at `{target}`, expected an English day name"
                ),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.logging.level.trim().to_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
