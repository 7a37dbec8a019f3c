//! Application configuration settings
//!
//! Process-level settings loaded from environment variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream call configuration
    pub upstream: UpstreamConfig,
    /// Search defaults
    pub search: SearchConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Upstream call configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Request timeout in seconds
    pub timeout: u64,
    /// Soft ceiling shown next to the request counter
    pub request_limit: u64,
    /// Provider id overriding the provider table default
    pub default_provider: Option<String>,
}

/// Defaults applied to searches that omit them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// ISO 4217 currency code
    pub currency: String,
    pub market: String,
    pub locale: String,
    pub country_code: String,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let settings = Self {
            server: ServerConfig {
                host: get("SERVER_HOST", "0.0.0.0"),
                port: get("SERVER_PORT", "3000")
                    .parse()
                    .context("Invalid port number")?,
            },
            upstream: UpstreamConfig {
                timeout: get("UPSTREAM_TIMEOUT", "30")
                    .parse()
                    .context("Invalid upstream timeout")?,
                request_limit: get("REQUEST_LIMIT", "100")
                    .parse()
                    .context("Invalid request limit")?,
                default_provider: lookup("FLIGHT_PROVIDER")
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
            },
            search: SearchConfig {
                currency: get("DEFAULT_CURRENCY", "USD").to_uppercase(),
                market: get("DEFAULT_MARKET", "en-US"),
                locale: get("DEFAULT_LOCALE", "en-US"),
                country_code: get("DEFAULT_COUNTRY", "US").to_uppercase(),
            },
            request: RequestConfig {
                max_request_size: get("MAX_REQUEST_SIZE", "65536")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            security: SecurityConfig {
                allowed_origins: get("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                cors_enabled: get("CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
            },
            logging: LoggingConfig {
                level: get("RUST_LOG", "info"),
                format: get("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if self.upstream.timeout == 0 {
            anyhow::bail!("Upstream timeout cannot be 0");
        }

        if self.upstream.request_limit == 0 {
            anyhow::bail!("Request limit cannot be 0");
        }

        let currency = &self.search.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("Invalid default currency: {}", currency);
        }

        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        // Plain levels are checked; filter directives such as "flightproxy=debug" pass through
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !self.logging.level.contains('=') && !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Check if in development mode
    pub fn is_dev_mode(&self) -> bool {
        self.logging.level == "debug" || self.logging.level == "trace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.upstream.request_limit, 100);
        assert_eq!(settings.search.currency, "USD");
        assert!(settings.upstream.default_provider.is_none());
        assert!(settings.security.cors_enabled);
    }

    #[test]
    fn test_currency_is_uppercased() {
        let settings = settings_from(&[("DEFAULT_CURRENCY", "gbp")]).unwrap();
        assert_eq!(settings.search.currency, "GBP");
    }

    #[test]
    fn test_log_directive_accepted() {
        let settings = settings_from(&[("RUST_LOG", "flightproxy=debug,tower_http=info")]);
        assert!(settings.is_ok());
    }
}
