use serial_test::serial;

use users_api::config::AppConfig;

// ─── Defaults & YAML ───

#[test]
fn defaults_are_sensible() {
    let config = AppConfig::default();
    assert_eq!(config.server.bind, "0.0.0.0:3001");
    assert_eq!(config.database.url, "sqlite:users.db?mode=rwc");
}

#[test]
fn parses_a_full_yaml_document() {
    let yaml = r#"
server:
  bind: "127.0.0.1:8080"
database:
  url: "sqlite:test.db"
"#;
    let config = AppConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert_eq!(config.database.url, "sqlite:test.db");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let yaml = r#"
server:
  bind: "127.0.0.1:9999"
"#;
    let config = AppConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:9999");
    assert_eq!(config.database.url, "sqlite:users.db?mode=rwc");
}

#[test]
fn empty_yaml_is_all_defaults() {
    let config = AppConfig::from_yaml_str("").unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:3001");

    let config = AppConfig::from_yaml_str("   \n").unwrap();
    assert_eq!(config.database.url, "sqlite:users.db?mode=rwc");
}

#[test]
fn broken_yaml_is_an_error() {
    let err = AppConfig::from_yaml_str("server: [not: a map").unwrap_err();
    assert!(err.to_string().starts_with("Config load error"));
}

// ─── Environment overlay ───

#[test]
#[serial]
fn env_vars_override_loaded_values() {
    std::env::set_var("APP_SERVER_BIND", "0.0.0.0:4000");
    std::env::set_var("APP_DATABASE_URL", "sqlite:from-env.db");

    let mut config = AppConfig::from_yaml_str("server:\n  bind: \"127.0.0.1:8080\"\n").unwrap();
    config.overlay_env();

    assert_eq!(config.server.bind, "0.0.0.0:4000");
    assert_eq!(config.database.url, "sqlite:from-env.db");

    std::env::remove_var("APP_SERVER_BIND");
    std::env::remove_var("APP_DATABASE_URL");
}

#[test]
#[serial]
fn absent_env_vars_change_nothing() {
    std::env::remove_var("APP_SERVER_BIND");
    std::env::remove_var("APP_DATABASE_URL");

    let mut config = AppConfig::default();
    config.overlay_env();

    assert_eq!(config.server.bind, "0.0.0.0:3001");
    assert_eq!(config.database.url, "sqlite:users.db?mode=rwc");
}
