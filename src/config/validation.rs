use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty and must look like a URL or domain name
/// - Timeouts, TTLs and rate limit thresholds must be non-zero
/// - Reconnect base delay cannot exceed the cap
/// - Live server URL, when given, must use a ws:// or wss:// scheme
/// - If log file path is provided, it cannot be empty and its parent must be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let api_domain = config.api_domain.as_str();
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://") && !api_domain.starts_with("https://") {
        // If it doesn't start with protocol, it should at least look like a domain
        if !api_domain.contains('.') && !api_domain.starts_with("localhost") {
            return Err(AppError::config_error(
                "API domain must be a valid URL or domain name",
            ));
        }
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }
    if config.cache_ttl_seconds == 0 {
        return Err(AppError::config_error("Cache TTL must be at least 1 second"));
    }
    if config.max_calls_per_window == 0 || config.rate_window_seconds == 0 {
        return Err(AppError::config_error(
            "Rate limit window and call cap must be non-zero",
        ));
    }
    if config.reconnect_base_ms == 0 || config.reconnect_base_ms > config.reconnect_cap_ms {
        return Err(AppError::config_error(
            "Reconnect base delay must be non-zero and not exceed the cap",
        ));
    }

    if let Some(url) = &config.live_server_url
        && !url.starts_with("ws://")
        && !url.starts_with("wss://")
    {
        return Err(AppError::config_error(format!(
            "Live server URL must start with ws:// or wss:// (got '{url}')"
        )));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_domain_rejected() {
        let config = Config {
            api_domain: String::new(),
            ..Config::default()
        };
        assert!(matches!(validate_config(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_bare_word_domain_rejected() {
        let config = Config {
            api_domain: "footballdata".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());

        let localhost = Config {
            api_domain: "localhost:8080".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&localhost).is_ok());
    }

    #[test]
    fn test_live_url_scheme_checked() {
        let config = Config {
            live_server_url: Some("https://live.example.com".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            live_server_url: Some("wss://live.example.com/socket".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_reconnect_base_above_cap_rejected() {
        let config = Config {
            reconnect_base_ms: 60_000,
            reconnect_cap_ms: 30_000,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_rate_cap_rejected() {
        let config = Config {
            max_calls_per_window: 0,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
