use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::adapters::binance_rest::{MAINNET_API_BASE, TESTNET_API_BASE};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// REST API endpoint for order execution
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Milliseconds the exchange may consider a signed request fresh
    #[serde(default = "default_recv_window")]
    pub recv_window_ms: u64,
}

fn default_base_url() -> String {
    TESTNET_API_BASE.to_string()
}

fn default_recv_window() -> u64 {
    5_000
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recv_window_ms: default_recv_window(),
        }
    }
}

impl ExchangeConfig {
    /// Point this config at the production venue instead of the testnet.
    pub fn mainnet(mut self) -> Self {
        self.base_url = MAINNET_API_BASE.to_string();
        self
    }

    pub fn is_testnet(&self) -> bool {
        self.base_url.contains("testnet")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://orderdesk.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the web API
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for the rolling log file; empty disables file logging
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("database.max_connections", 5)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Override with environment variables (ORDERDESK_EXCHANGE__BASE_URL, etc.)
            .add_source(
                Environment::with_prefix("ORDERDESK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.exchange.base_url.trim().is_empty() {
            errors.push("exchange.base_url must not be empty".to_string());
        } else if !self.exchange.base_url.starts_with("http") {
            errors.push(format!(
                "exchange.base_url must be an http(s) URL, got {:?}",
                self.exchange.base_url
            ));
        }

        if self.exchange.recv_window_ms == 0 || self.exchange.recv_window_ms > 60_000 {
            errors.push("exchange.recv_window_ms must be between 1 and 60000".to_string());
        }

        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be positive".to_string());
        }

        if self.server.port == 0 {
            errors.push("server.port must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exchange: ExchangeConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_testnet() {
        let config = AppConfig::default();
        assert!(config.exchange.is_testnet());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn mainnet_switch_changes_base_url() {
        let exchange = ExchangeConfig::default().mainnet();
        assert!(!exchange.is_testnet());
        assert_eq!(exchange.base_url, MAINNET_API_BASE);
    }

    #[test]
    fn validate_collects_bad_values() {
        let mut config = AppConfig::default();
        config.exchange.base_url = "ftp://nowhere".to_string();
        config.exchange.recv_window_ms = 0;
        config.database.max_connections = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
