use colander_admin::config::{Config, ConfigError};

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from(&dir.path().join("nope.toml")).expect("defaults");
    assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.ui.debounce_ms, 300);
}

#[test]
fn partial_file_overrides_only_named_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[api]
base_url = "http://catalog.internal:8080"

[ui]
debounce_ms = 150
"#,
    )
    .expect("write config");

    let config = Config::load_from(&path).expect("parses");
    assert_eq!(config.api.base_url, "http://catalog.internal:8080");
    assert_eq!(config.ui.debounce_ms, 150);
    // Untouched keys keep their defaults.
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.ui.tick_ms, 250);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "api = not toml").expect("write config");

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn zero_timeout_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\ntimeout_seconds = 0\n").expect("write config");

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}
