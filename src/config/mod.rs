use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify credential tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Lifetime of an issued credential token in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Path of the durable token file
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            token_path: default_token_path(),
        }
    }
}

fn default_token_secret() -> String {
    // Generate a random secret if not provided
    uuid::Uuid::new_v4().to_string()
}

fn default_token_ttl_hours() -> i64 {
    24 * 7
}

fn default_token_path() -> PathBuf {
    PathBuf::from("./data/session_token.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Simulated fetch latency in milliseconds (stands in for network I/O)
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// First bookable hour of the day (24h clock)
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,
    /// Hour the clinic closes; slots run up to but not including this hour
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
    /// Probability that a generated slot is available (0.0 - 1.0)
    #[serde(default = "default_slot_availability")]
    pub slot_availability: f64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay_ms(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            slot_availability: default_slot_availability(),
        }
    }
}

fn default_fetch_delay_ms() -> u64 {
    500
}

fn default_open_hour() -> u32 {
    9
}

fn default_close_hour() -> u32 {
    17
}

fn default_slot_availability() -> f64 {
    0.7
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            directory: DirectoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.auth.token_ttl_hours, 24 * 7);
        assert!(!config.auth.token_secret.is_empty());
        assert_eq!(config.directory.open_hour, 9);
        assert_eq!(config.directory.close_hour, 17);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            token_secret = "fixed-secret"
            token_ttl_hours = 1

            [directory]
            fetch_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.token_secret, "fixed-secret");
        assert_eq!(config.auth.token_ttl_hours, 1);
        assert_eq!(config.directory.fetch_delay_ms, 0);
        // untouched sections fall back to defaults
        assert_eq!(config.directory.slot_availability, 0.7);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/portal.toml")).unwrap();
        assert_eq!(config.directory.fetch_delay_ms, 500);
    }
}
