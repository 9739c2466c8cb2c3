// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./capstone.toml` > `~/.config/capstone/capstone.toml` > `/etc/capstone/capstone.toml`
//! with environment variable overrides via `CAPSTONE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CapstoneConfig;

pub(crate) const LOCAL_CONFIG: &str = "capstone.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/capstone/capstone.toml";

/// Path of the per-user config file, if the platform has a config directory.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("capstone").join(LOCAL_CONFIG))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/capstone/capstone.toml` (system-wide)
/// 3. `~/.config/capstone/capstone.toml` (user XDG config)
/// 4. `./capstone.toml` (local directory)
/// 5. `CAPSTONE_*` environment variables
pub fn load_config() -> Result<CapstoneConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env vars).
///
/// Used for testing and embedded configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CapstoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CapstoneConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CapstoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CapstoneConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CapstoneConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `CAPSTONE_SCHEDULE_MIN_SUPPORT` must map to
/// `schedule.min_support`, not `schedule.min.support`.
fn env_provider() -> Env {
    Env::prefixed("CAPSTONE_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("portal_", "portal.", 1)
            .replacen("schedule_", "schedule.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}
