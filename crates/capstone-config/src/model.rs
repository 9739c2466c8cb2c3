// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the capstone meeting scheduler.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level scheduler configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CapstoneConfig {
    /// Remote portal API settings.
    #[serde(default)]
    pub portal: PortalConfig,

    /// Slot catalog and consensus settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote portal API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortalConfig {
    /// Base URL of the portal REST API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How many times a transient failure (429/5xx) is retried.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// Slot catalog and consensus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Maximum number of suggestions returned per day.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Minimum number of distinct members that must share a slot before it is
    /// suggested. Values below 2 are rejected by validation.
    #[serde(default = "default_min_support")]
    pub min_support: usize,

    /// Extra day-name aliases, e.g. `lunes = "monday"`.
    /// Targets must be English day names.
    #[serde(default)]
    pub day_aliases: BTreeMap<String, String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
            min_support: default_min_support(),
            day_aliases: BTreeMap::new(),
        }
    }
}

fn default_suggestion_limit() -> usize {
    4
}

fn default_min_support() -> usize {
    2
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit the event target (module path) with each line.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            with_target: default_with_target(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_with_target() -> bool {
    true
}
