use repodeck::config::Config;
use repodeck::utils::datetime;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.github.api_base_url, "https://api.github.com");
    assert_eq!(config.github.token_env, "GITHUB_TOKEN");
    assert_eq!(config.github.timeout_secs, 5);
    assert_eq!(config.display.page_size, 10);
    assert_eq!(config.display.date_format, datetime::DEFAULT_DATE_FORMAT);
    assert!(!config.logging.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    config.display.page_size = 0;
    assert!(config.validate().is_err());

    config.display.page_size = 25;
    config.github.timeout_secs = 0;
    assert!(config.validate().is_err());

    config.github.timeout_secs = 10;
    config.github.api_base_url = "ftp://example.com".to_string();
    assert!(config.validate().is_err());

    config.github.api_base_url = "https://ghe.example.com/api/v3".to_string();
    config.github.user = "  ".to_string();
    assert!(config.validate().is_err());

    config.github.user = "octocat".to_string();
    config.display.date_format = "%Q".to_string();
    assert!(config.validate().is_err());

    config.display.date_format = "%d/%m/%Y".to_string();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());

    config.logging.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("page_size = 10"));
    assert!(toml_str.contains("token_env = \"GITHUB_TOKEN\""));
}

#[test]
fn test_partial_config_deserialization() {
    let partial_toml = r#"
[github]
user = "octocat"

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    assert_eq!(config.github.user, "octocat");
    assert!(config.logging.enabled);

    // Unspecified values use defaults
    assert_eq!(config.github.api_base_url, "https://api.github.com");
    assert_eq!(config.github.max_list_pages, 10);
    assert_eq!(config.display.page_size, 10);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_token_is_read_from_configured_variable() {
    let mut config = Config::default();
    config.github.token_env = "REPODECK_TEST_TOKEN_UNSET".to_string();
    assert_eq!(config.github.token(), None);

    config.github.token_env = "REPODECK_TEST_TOKEN_SET".to_string();
    std::env::set_var("REPODECK_TEST_TOKEN_SET", "abc123");
    assert_eq!(config.github.token().as_deref(), Some("abc123"));

    std::env::set_var("REPODECK_TEST_TOKEN_SET", "   ");
    assert_eq!(config.github.token(), None);
}

#[test]
fn test_generate_and_load_round_trip() {
    let dir = std::env::temp_dir().join(format!("repodeck-config-test-{}", std::process::id()));
    let path = dir.join("config.toml");

    Config::generate_default_config(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# repodeck configuration file"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.display.page_size, 10);

    std::fs::write(&path, "[display]\npage_size = 500\n").unwrap();
    assert!(Config::load_from_file(&path).is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_logging_level_accepts_only_level_names() {
    let mut config = Config::default();
    for level in ["error", "warn", "info", "debug", "trace"] {
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "{level}");
    }
    for level in ["off", "INFO", "Debug", ""] {
        config.logging.level = level.to_string();
        assert!(config.validate().is_err(), "{level}");
    }
    config.logging.level = "warn".to_string();
    assert_eq!(config.logging.level_filter().unwrap(), log::LevelFilter::Warn);
}

#[test]
fn test_default_config_path_is_per_user() {
    // Some sandboxes have no config directory at all.
    if let Ok(path) = Config::get_default_config_path() {
        assert!(path.ends_with("repodeck/config.toml"));
    }
}
