//! Configuration management for spendboard
//!
//! This module handles loading, validation, and management of
//! spendboard configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Upstream data sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Paginated spending feed swept by the CSV export
    #[serde(default = "default_export_url")]
    pub export_url: String,
    /// Table feed backing the interactive spending table
    #[serde(default = "default_table_url")]
    pub table_url: String,
    /// Timeout for a single page request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            export_url: default_export_url(),
            table_url: default_table_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_export_url() -> String {
    "http://localhost:8080/spending/index".to_string()
}

fn default_table_url() -> String {
    "http://localhost:8080/spending/index".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// CSV export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Upper bound for a whole aggregation sweep, in seconds
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
    /// Attachment filename of the full export
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline(),
            filename: default_filename(),
        }
    }
}

fn default_deadline() -> u64 {
    300
}

fn default_filename() -> String {
    "spending-data.csv".to_string()
}

/// Pagination settings for the spending table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows per page when the request does not ask for a size
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Largest page size a client may request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    25
}

fn default_max_page_size() -> usize {
    10000
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
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

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream source settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError,
        })?;

        Self::from_yaml(&content)
    }

    /// Load the file if present; `None` when it does not exist.
    ///
    /// A file that exists but fails to read, parse or validate is still an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::FileNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        for (field, url) in [
            ("upstream.export_url", &self.upstream.export_url),
            ("upstream.table_url", &self.upstream.table_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("Expected an http(s) URL, got '{}'", url),
                });
            }
        }

        if self.upstream.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upstream.request_timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.export.deadline_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "export.deadline_secs".to_string(),
                reason: "Deadline must be greater than 0".to_string(),
            });
        }

        if self.export.filename.trim().is_empty() || self.export.filename.contains('"') {
            return Err(ConfigError::InvalidValue {
                field: "export.filename".to_string(),
                reason: "Filename must be non-empty and must not contain quotes".to_string(),
            });
        }

        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_page_size".to_string(),
                reason: format!(
                    "Page size must be between 1 and {}",
                    self.pagination.max_page_size
                ),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Listen address for the HTTP server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================
