// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup for hosts embedding the scheduler.

use tracing_subscriber::EnvFilter;

use crate::model::LoggingConfig;

/// Filter directive for the scheduler crates at `level`, other crates at `warn`.
pub fn filter_directive(config: &LoggingConfig) -> String {
    let level = config.level.trim().to_lowercase();
    format!("capstone_schedule={level},capstone_remote={level},capstone_config={level},warn")
}

/// Installs a global fmt subscriber. `RUST_LOG` overrides `logging.level`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_scopes_level_to_scheduler_crates() {
        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            with_target: true,
        };
        let directive = filter_directive(&config);
        assert!(directive.starts_with("capstone_schedule=debug,"));
        assert!(directive.ends_with(",warn"));
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
