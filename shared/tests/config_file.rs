use clockveil_shared::config::{load_config_from, save_config_to, AppConfig};
use clockveil_shared::{ConfigError, ReentryPolicy};
use tempfile::tempdir;

#[test]
fn saved_config_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let cfg = AppConfig {
        start_opacity: 200,
        fade_duration_ms: 1200,
        live_hands: false,
        reentry: ReentryPolicy::Ignore,
        ..AppConfig::default()
    };
    save_config_to(&path, &cfg).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn loading_sanitizes_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "fade_interval_ms": 0, "clock_scale": -2.0 }"#).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.fade_interval_ms, 1);
    assert_eq!(loaded.clock_scale, 0.8);
    assert_eq!(loaded.fade_duration_ms, 3000);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(matches!(load_config_from(&path), Err(ConfigError::Io(_))));
}
