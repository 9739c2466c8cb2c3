// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the scheduler configuration system.

use capstone_config::diagnostic::ConfigError;
use capstone_config::model::CapstoneConfig;
use capstone_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_capstone_config() {
    let toml = r#"
[portal]
base_url = "https://capstone.example.edu/api"
request_timeout_secs = 10
max_retries = 3

[schedule]
suggestion_limit = 6
min_support = 3

[schedule.day_aliases]
lunes = "monday"

[logging]
level = "debug"
with_target = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.portal.base_url, "https://capstone.example.edu/api");
    assert_eq!(config.portal.request_timeout_secs, 10);
    assert_eq!(config.portal.max_retries, 3);
    assert_eq!(config.schedule.suggestion_limit, 6);
    assert_eq!(config.schedule.min_support, 3);
    assert_eq!(
        config.schedule.day_aliases.get("lunes").map(String::as_str),
        Some("monday")
    );
    assert_eq!(config.logging.level, "debug");
    assert!(!config.logging.with_target);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.portal.base_url, "http://localhost:8080/api");
    assert_eq!(config.portal.request_timeout_secs, 30);
    assert_eq!(config.portal.max_retries, 1);
    assert_eq!(config.schedule.suggestion_limit, 4);
    assert_eq!(config.schedule.min_support, 2);
    assert!(config.schedule.day_aliases.is_empty());
    assert_eq!(config.logging.level, "info");
}

/// Unknown field in [schedule] is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_schedule_produces_error() {
    let toml = r#"
[schedule]
min_suport = 3
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("min_suport"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[storage]
database_path = "x.db"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Dotted keys merged after the file win, the way env overrides do.
#[test]
fn later_provider_overrides_file_value() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[portal]
base_url = "https://from-toml.example.edu"
"#;

    let config: CapstoneConfig = Figment::new()
        .merge(Serialized::defaults(CapstoneConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("portal.base_url", "https://from-env.example.edu"))
        .merge(("schedule.min_support", 3))
        .extract()
        .expect("should merge override");

    assert_eq!(config.portal.base_url, "https://from-env.example.edu");
    assert_eq!(config.schedule.min_support, 3);
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    let config = capstone_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/path/capstone.toml",
    ))
    .expect("missing file should be silently skipped");
    assert_eq!(config.schedule.suggestion_limit, 4);
}

/// The model round-trips through plain toml as well.
#[test]
fn model_parses_with_toml_crate() {
    let config: CapstoneConfig = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.portal.max_retries, 1);
}

/// Unknown key produces a diagnostic carrying a suggestion and the valid keys.
#[test]
fn diagnostic_error_includes_suggestion_and_valid_keys() {
    let toml = r#"
[portal]
base_ulr = "https://x"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "base_ulr"
                && suggestion.as_deref() == Some("base_url")
                && valid_keys.contains("request_timeout_secs")
        })
    });
    assert!(found, "expected UnknownKey for base_ulr, got: {errors:?}");
}

/// Wrong value types surface as InvalidType diagnostics.
#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[schedule]
suggestion_limit = "four"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("suggestion_limit"))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_rejects_min_support_below_two() {
    let toml = r#"
[schedule]
min_support = 1
"#;

    let errors = load_and_validate_str(toml).expect_err("min_support 1 is invalid");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("min_support"))
    ));
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "base_ulr".to_string(),
        suggestion: Some("base_url".to_string()),
        valid_keys: "base_url, request_timeout_secs, max_retries".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `base_url`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("base_ulr"));
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let config = load_and_validate_str("[schedule]\nsuggestion_limit = 2\n")
        .expect("valid TOML should validate");
    assert_eq!(config.schedule.suggestion_limit, 2);
}
