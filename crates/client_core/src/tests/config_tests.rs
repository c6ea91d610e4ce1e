use super::{apply_env_overrides, load_settings, parse_settings, Settings, DEFAULT_API_BASE_URL};
use crate::controller::{OverlapPolicy, ValidationMode};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn defaults_target_local_service_with_source_behavior() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(settings.validation, ValidationMode::Lenient);
    assert_eq!(settings.overlap, OverlapPolicy::Allow);
}

#[test]
fn settings_file_fields_are_optional() {
    let settings = parse_settings("api_base_url = \"http://10.0.0.5:9000\"").expect("parse");
    assert_eq!(settings.api_base_url, "http://10.0.0.5:9000");
    assert_eq!(settings.validation, ValidationMode::Lenient);

    let settings =
        parse_settings("validation = \"strict\"\noverlap = \"single_flight\"").expect("parse");
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(settings.validation, ValidationMode::Strict);
    assert_eq!(settings.overlap, OverlapPolicy::SingleFlight);
}

#[test]
fn settings_file_rejects_unknown_modes() {
    assert!(parse_settings("validation = \"paranoid\"").is_err());
}

#[test]
fn env_overrides_file_values() {
    let mut settings = parse_settings("api_base_url = \"http://file:1\"").expect("parse");
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("PREDICTION_API_URL", "http://env:2"),
            ("APP__VALIDATION", "Strict"),
            ("APP__OVERLAP", "single-flight"),
        ]),
    )
    .expect("overrides");

    assert_eq!(settings.api_base_url, "http://env:2");
    assert_eq!(settings.validation, ValidationMode::Strict);
    assert_eq!(settings.overlap, OverlapPolicy::SingleFlight);
}

#[test]
fn app_prefixed_url_wins_and_empty_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("PREDICTION_API_URL", "http://env:2"),
            ("APP__API_BASE_URL", "http://app:3"),
            ("APP__VALIDATION", "  "),
        ]),
    )
    .expect("overrides");

    assert_eq!(settings.api_base_url, "http://app:3");
    assert_eq!(settings.validation, ValidationMode::Lenient);
}

#[test]
fn invalid_env_mode_is_reported() {
    let mut settings = Settings::default();
    let err = apply_env_overrides(&mut settings, lookup_from(&[("APP__OVERLAP", "sometimes")]))
        .expect_err("must fail");
    assert!(err.to_string().contains("APP__OVERLAP"), "unexpected error: {err}");
}

#[test]
fn explicit_settings_path_is_read_and_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("fraud_check_settings_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("custom.toml");
    fs::write(&path, "overlap = \"single_flight\"\n").expect("write settings");

    let settings = load_settings(Some(path.as_path())).expect("load");
    assert_eq!(settings.overlap, OverlapPolicy::SingleFlight);

    assert!(load_settings(Some(temp_root.join("missing.toml").as_path())).is_err());

    fs::remove_dir_all(temp_root).expect("cleanup");
}
