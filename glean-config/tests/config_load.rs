use glean_config::{GleanConfigLoader, SettleMode};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
logging:
  format: json
  file: false
headlines:
  url: "http://127.0.0.1:8080/politics"
  timeout_secs: 4
flights:
  webdriver_url: "http://127.0.0.1:4444"
  settle: document_ready
  "#;
    let p = write_yaml(&tmp, "glean.yaml", file_yaml);

    let config = GleanConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load config");

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.logging.format, "json");
    assert!(!config.logging.file);
    assert_eq!(config.headlines.url, "http://127.0.0.1:8080/politics");
    assert_eq!(config.headlines.timeout_secs, 4);
    assert_eq!(config.headlines.container, "div.PagePromo");
    assert_eq!(config.flights.webdriver_url, "http://127.0.0.1:4444");
    assert_eq!(config.flights.settle, SettleMode::DocumentReady);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = GleanConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");

    assert_eq!(config.spots.data_path, "data.spots");
    assert_eq!(config.flights.poll_interval_ms, 500);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = GleanConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "glean.yaml",
        "spots:\n  timeout_secs: 5\nflights:\n  headless: false\n",
    );

    temp_env::with_vars(
        [
            ("GLEAN__SPOTS__TIMEOUT_SECS", Some("9")),
            ("GLEAN__FLIGHTS__HEADLESS", Some("true")),
        ],
        || {
            let config = GleanConfigLoader::new().with_file(&p).load().expect("load");
            assert_eq!(config.spots.timeout_secs, 9);
            assert!(config.flights.headless);
        },
    );
}
