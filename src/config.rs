use std::path::Path;

use serde::Deserialize;

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration.
///
/// Resolution order (lowest to highest priority):
/// 1. Built-in defaults
/// 2. `application.yaml` in the current working directory
/// 3. `.env` file (loaded into the process environment, never overwriting
///    already-set variables)
/// 4. Environment variables, following the `server.bind` <-> `APP_SERVER_BIND`
///    naming convention
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            // mode=rwc creates the database file on first run
            url: "sqlite:users.db?mode=rwc".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `application.yaml` (when present), `.env`,
    /// and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new("application.yaml");
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
            Self::from_yaml_str(&content)?
        } else {
            Self::default()
        };

        let _ = dotenvy::dotenv();
        config.overlay_env();
        Ok(config)
    }

    /// Create a config from a YAML string (useful for testing). Missing
    /// sections fall back to their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Overlay environment variables onto the loaded values.
    pub fn overlay_env(&mut self) {
        if let Ok(bind) = std::env::var("APP_SERVER_BIND") {
            self.server.bind = bind;
        }
        if let Ok(url) = std::env::var("APP_DATABASE_URL") {
            self.database.url = url;
        }
    }
}
