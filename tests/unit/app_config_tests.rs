/*!
 * Tests for application configuration functionality
 */

use std::collections::HashMap;

use glossator::app_config::{Config, LogLevel, ENV_API_KEY, ENV_API_URL, ENV_MODEL, ENV_PORT};

use crate::common;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.upstream.api_key = "sk-test".to_string();
    config
}

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.max_text_length, 5000);
    assert_eq!(config.upstream.endpoint, "https://api.deepseek.com/chat/completions");
    assert_eq!(config.upstream.model, "deepseek-chat");
    assert_eq!(config.upstream.max_tokens, 3000);
    assert_eq!(config.upstream.timeout_secs, 240);
    assert!(config.upstream.api_key.is_empty());
    assert_eq!(config.translation.separator, "==Terms==");
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    // Missing API key
    assert!(Config::default().validate().is_err());

    let mut config = valid_config();
    assert!(config.validate().is_ok());

    config.upstream.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.upstream.endpoint = "http://localhost:8080/v1/chat/completions".to_string();
    assert!(config.validate().is_ok());

    config.upstream.temperature = 3.5;
    assert!(config.validate().is_err());
    config.upstream.temperature = 0.1;

    config.translation.separator = "  ".to_string();
    assert!(config.validate().is_err());
    config.translation.separator = "==SEP==".to_string();

    config.server.max_text_length = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_overrides_withAllVariablesSet_shouldReplaceFileValues() {
    let vars: HashMap<&str, &str> = HashMap::from([
        (ENV_API_KEY, "sk-from-env"),
        (ENV_API_URL, "http://127.0.0.1:9000/chat/completions"),
        (ENV_MODEL, "deepseek-reasoner"),
        (ENV_PORT, "8080"),
    ]);

    let mut config = Config::default();
    config
        .apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.upstream.api_key, "sk-from-env");
    assert_eq!(config.upstream.endpoint, "http://127.0.0.1:9000/chat/completions");
    assert_eq!(config.upstream.model, "deepseek-reasoner");
    assert_eq!(config.server.port, 8080);
    assert!(config.validate().is_ok());
}

#[test]
fn test_overrides_withEmptyValues_shouldKeepExisting() {
    let mut config = valid_config();
    config.apply_overrides_from(|_| Some(String::new())).unwrap();

    assert_eq!(config.upstream.api_key, "sk-test");
    assert_eq!(config.server.port, 5000);
}

#[test]
fn test_overrides_withInvalidPort_shouldFail() {
    let mut config = Config::default();
    let result = config.apply_overrides_from(|key| (key == ENV_PORT).then(|| "eighty".to_string()));

    assert!(result.is_err());
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path).unwrap();
    assert!(created);
    assert!(path.exists());
    assert_eq!(config.server.port, 5000);

    let (reloaded, created_again) = Config::load_or_create(&path).unwrap();
    assert!(!created_again);
    assert_eq!(reloaded.translation.separator, config.translation.separator);
}

#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{"server": {"port": 6000}, "upstream": {"api_key": "sk-file"}, "log_level": "debug"}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.server.port, 6000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.upstream.api_key, "sk-file");
    assert_eq!(config.upstream.model, "deepseek-chat");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_from_file_withMalformedJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::from_file(&path).is_err());
}
