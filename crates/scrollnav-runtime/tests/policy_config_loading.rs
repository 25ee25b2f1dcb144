#![forbid(unsafe_code)]

//! Loading [`NavPolicyConfig`] from TOML and JSON, on disk and in memory.
//!
//! Run:
//!   cargo test -p scrollnav-runtime --features policy-config --test policy_config_loading

use std::io::Write;

use pretty_assertions::assert_eq;
use scrollnav_core::{MarginLength, RootMargin};
use scrollnav_runtime::{ConfigError, NavPolicyConfig};

#[test]
fn empty_toml_is_default() {
    let policy = NavPolicyConfig::from_toml_str("").unwrap();
    assert_eq!(policy, NavPolicyConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let policy = NavPolicyConfig::from_toml_str(
        r#"
        [tracker]
        threshold = 0.5

        [style]
        scroll_end = 240.0
        "#,
    )
    .unwrap();
    assert_eq!(policy.tracker.threshold, 0.5);
    assert_eq!(policy.tracker.root_margin, "0px");
    assert_eq!(policy.style.scroll_start, 0.0);
    assert_eq!(policy.style.scroll_end, 240.0);
    assert_eq!(policy.dispatcher.hero_id, "product-section-0");
    assert!(policy.validate().is_empty());
}

#[test]
fn json_dispatcher_section_builds_config() {
    let policy = NavPolicyConfig::from_json_str(
        r#"{ "dispatcher": { "root_margin": "-10% 0px -30% 0px", "hero_id": "intro" } }"#,
    )
    .unwrap();
    let config = policy.to_dispatcher_config().unwrap();
    assert_eq!(config.hero_id, "intro");
    assert_eq!(
        config.root_margin,
        RootMargin {
            top: MarginLength::Percent(-10.0),
            right: MarginLength::Px(0.0),
            bottom: MarginLength::Percent(-30.0),
            left: MarginLength::Px(0.0),
        }
    );
}

#[test]
fn toml_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dispatcher]\nnav_height = 64.0\nsection_suffix = \"-block\"").unwrap();
    let policy = NavPolicyConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(policy.dispatcher.nav_height, 64.0);
    assert_eq!(policy.dispatcher.section_suffix, "-block");
}

#[test]
fn json_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"tracker": {{"threshold": 0.1}}}}"#).unwrap();
    let policy = NavPolicyConfig::from_json_file(file.path()).unwrap();
    assert_eq!(policy.tracker.threshold, 0.1);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = NavPolicyConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}

#[test]
fn malformed_inputs_report_their_format() {
    let toml_err = NavPolicyConfig::from_toml_str("[tracker\nthreshold = 1").unwrap_err();
    assert!(matches!(toml_err, ConfigError::Toml(_)));
    assert!(toml_err.to_string().starts_with("TOML parse error"));

    let json_err = NavPolicyConfig::from_json_str("{ \"style\": 3 }").unwrap_err();
    assert!(matches!(json_err, ConfigError::Json(_)));
    assert!(std::error::Error::source(&json_err).is_some());
}

#[test]
fn loaded_but_invalid_policy_is_rejected_by_validated() {
    let policy = NavPolicyConfig::from_toml_str("[style]\nscroll_start = 50.0\nscroll_end = 10.0")
        .unwrap();
    let err = policy.validated().unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("start < end"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
