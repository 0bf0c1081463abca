use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_default_backup_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the upstream match API. Should include https:// prefix.
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// API key sent in the X-Auth-Token header. Without it no upstream call is made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// How long a fetched match list stays in the cache.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Minimum spacing between two upstream calls.
    #[serde(default = "default_min_call_spacing")]
    pub min_call_spacing_seconds: u64,
    /// Upstream calls allowed inside one rolling window.
    #[serde(default = "default_max_calls_per_window")]
    pub max_calls_per_window: u32,
    /// Length of the rolling rate limit window.
    #[serde(default = "default_rate_window")]
    pub rate_window_seconds: u64,
    /// Local backup file with pre-normalized matches. Defaults to the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_file_path: Option<String>,
    /// Write every successful upstream listing back to the backup file.
    #[serde(default)]
    pub refresh_backup: bool,
    /// WebSocket URL of the live update server. Live updates are disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_server_url: Option<String>,
    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,
    #[serde(default = "default_reconnect_cap_ms")]
    pub reconnect_cap_ms: u64,
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
    /// Interval between periodic refreshes in watch mode.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

fn default_api_domain() -> String {
    constants::DEFAULT_API_DOMAIN.to_string()
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_cache_ttl() -> u64 {
    constants::cache_ttl::MATCHES_SECONDS
}

fn default_min_call_spacing() -> u64 {
    constants::rate_limit::MIN_CALL_SPACING_SECONDS
}

fn default_max_calls_per_window() -> u32 {
    constants::rate_limit::MAX_CALLS_PER_WINDOW
}

fn default_rate_window() -> u64 {
    constants::rate_limit::WINDOW_SECONDS
}

fn default_reconnect_base_ms() -> u64 {
    constants::reconnect::BASE_DELAY_MS
}

fn default_reconnect_cap_ms() -> u64 {
    constants::reconnect::MAX_DELAY_MS
}

fn default_reconnect_max_attempts() -> u32 {
    constants::reconnect::MAX_ATTEMPTS
}

fn default_refresh_interval() -> u64 {
    constants::DEFAULT_REFRESH_INTERVAL_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: default_api_domain(),
            api_key: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            cache_ttl_seconds: default_cache_ttl(),
            min_call_spacing_seconds: default_min_call_spacing(),
            max_calls_per_window: default_max_calls_per_window(),
            rate_window_seconds: default_rate_window(),
            backup_file_path: None,
            refresh_backup: false,
            live_server_url: None,
            reconnect_base_ms: default_reconnect_base_ms(),
            reconnect_cap_ms: default_reconnect_cap_ms(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
            refresh_interval_seconds: default_refresh_interval(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file is not an error: defaults are used instead.
    /// Environment variables override config file values.
    ///
    /// # Environment Variables
    /// - `MATCHDAY_API_DOMAIN` - Override API domain
    /// - `MATCHDAY_API_KEY` - Override API key
    /// - `MATCHDAY_LOG_FILE` - Override log file path
    /// - `MATCHDAY_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `MATCHDAY_LIVE_URL` - Override live server URL
    /// - `MATCHDAY_BACKUP_FILE` - Override backup file path
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            tracing::debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `MATCHDAY_*` environment variable overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }

        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            self.api_key = Some(api_key);
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(live_url) = std::env::var(env_vars::LIVE_URL) {
            self.live_server_url = Some(live_url);
        }

        if let Ok(backup) = std::env::var(env_vars::BACKUP_FILE) {
            self.backup_file_path = Some(backup);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Default TTL for cached match listings
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Resolved backup file location (configured path or the default one)
    pub fn backup_path(&self) -> String {
        self.backup_file_path
            .clone()
            .unwrap_or_else(get_default_backup_path)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    /// The API key is never printed, only whether one is set.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path} (not created yet, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Domain:");
        println!("{}", config.api_domain);
        println!("API Key:");
        println!(
            "{}",
            if config.api_key.is_some() { "set" } else { "not set" }
        );
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("Cache TTL:");
        println!("{} seconds", config.cache_ttl_seconds);
        println!("Rate Limit:");
        println!(
            "{} calls / {}s, {}s spacing",
            config.max_calls_per_window,
            config.rate_window_seconds,
            config.min_call_spacing_seconds
        );
        println!("────────────────────────────────────");
        println!("Backup File:");
        println!("{}", config.backup_path());
        println!("Live Server:");
        println!(
            "{}",
            config.live_server_url.as_deref().unwrap_or("(disabled)")
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/matchday_feed.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist. An API domain
    /// without a scheme is stored with an https:// prefix; an explicit
    /// http:// or https:// domain is kept as given.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let api_domain = if self.api_domain.contains("://") {
            self.api_domain.clone()
        } else {
            format!("https://{}", self.api_domain)
        };
        let content = toml::to_string_pretty(&Config {
            api_domain,
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
api_domain = "https://api.example.com/v4"
api_key = "secret"
log_file_path = "/custom/log/path"
cache_ttl_seconds = 120
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.api_domain, "https://api.example.com/v4");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.cache_ttl(), Duration::from_secs(120));
        // Unspecified fields fall back to defaults
        assert_eq!(config.max_calls_per_window, 9);
        assert_eq!(config.min_call_spacing_seconds, 6);
        assert_eq!(config.reconnect_max_attempts, 5);
    }

    #[tokio::test]
    async fn test_config_load_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();

        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_config_save_without_https_prefix() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let config = Config {
            api_domain: "api.example.com".to_string(),
            ..Config::default()
        };
        config.save_to_path(&config_path_str).await.unwrap();

        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded_config.api_domain, "https://api.example.com");
    }

    #[tokio::test]
    async fn test_config_save_keeps_http_scheme() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let config = Config {
            api_domain: "http://localhost:8080".to_string(),
            ..Config::default()
        };
        config.save_to_path(&config_path_str).await.unwrap();

        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded_config.api_domain, "http://localhost:8080");
        assert!(loaded_config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_config_save_creates_directory() {
        let temp_dir = tempdir().unwrap();
        let config_dir = temp_dir.path().join("matchday_feed");
        let config_path = config_dir.join("config.toml");
        Config::default()
            .save_to_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert!(config_dir.exists());
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original_config = Config {
            api_domain: "https://api.example.com".to_string(),
            api_key: Some("key".to_string()),
            live_server_url: Some("wss://live.example.com".to_string()),
            refresh_backup: true,
            ..Config::default()
        };
        original_config.save_to_path(&config_path_str).await.unwrap();
        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(original_config, loaded_config);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        // SAFETY: serialized test, no other thread reads these variables
        unsafe {
            std::env::set_var(env_vars::API_KEY, "from-env");
            std::env::set_var(env_vars::HTTP_TIMEOUT, "3");
            std::env::set_var(env_vars::LIVE_URL, "ws://localhost:9000");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var(env_vars::API_KEY);
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
            std::env::remove_var(env_vars::LIVE_URL);
        }

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.http_timeout_seconds, 3);
        assert_eq!(
            config.live_server_url.as_deref(),
            Some("ws://localhost:9000")
        );
    }

    #[test]
    #[serial]
    fn test_unparseable_timeout_env_is_ignored() {
        unsafe {
            std::env::set_var(env_vars::HTTP_TIMEOUT, "soon");
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
        }

        assert_eq!(config.http_timeout_seconds, default_http_timeout());
    }

    #[test]
    fn test_backup_path_defaults_to_config_dir() {
        let config = Config::default();
        assert!(config.backup_path().ends_with("backup-matches.json"));

        let custom = Config {
            backup_file_path: Some("/data/backup.json".to_string()),
            ..Config::default()
        };
        assert_eq!(custom.backup_path(), "/data/backup.json");
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("matchday_feed"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains("matchday_feed"));
        assert!(log_dir_path.ends_with("logs"));
    }
}
