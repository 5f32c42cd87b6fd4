//! Configuration loading tests

use std::fs;

use tempfile::TempDir;

use chatcaster::config::StaticConfig;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = StaticConfig::try_load_from(path.to_str().unwrap()).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.messenger.backend, "tdjson_bridge");
    assert_eq!(config.storage.settings_file, "settings.json");
}

#[test]
fn test_partial_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9090

[messenger]
backend = "memory"
chat_limit = 20

[storage]
data_dir = "/tmp/chatcaster"
"#,
    )
    .unwrap();

    let config = StaticConfig::try_load_from(path.to_str().unwrap()).unwrap();
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.messenger.backend, "memory");
    assert_eq!(config.messenger.chat_limit, 20);
    assert_eq!(
        config.storage.settings_path(),
        std::path::PathBuf::from("/tmp/chatcaster/settings.json")
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_generated_sample_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("generated.toml");

    StaticConfig::default().save_to_file(&path).unwrap();
    let loaded = StaticConfig::try_load_from(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded.server.port, StaticConfig::default().server.port);
    assert!(StaticConfig::generate_sample_config().contains("[messenger]"));
}

#[test]
fn test_invalid_backend_fails_validation() {
    let mut config = StaticConfig::default();
    config.messenger.backend = "carrier-pigeon".to_string();
    assert!(config.validate().is_err());
}
