//! Configuration loading for drop-relay.
//!
//! Configuration is loaded from an optional TOML file. Every section and
//! field has a default, so an empty file (or no file) is a valid setup.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for drop-relay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Offer lifecycle and streaming configuration.
    #[serde(default)]
    pub offers: OffersConfig,
    /// Rate limiting configuration.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Auxiliary HTTP endpoints configuration.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener (default: 0.0.0.0:8080).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// PEM certificate chain. Set together with `tls_key` to serve HTTPS.
    #[serde(default)]
    pub tls_cert: Option<PathBuf>,
    /// PEM private key for `tls_cert`.
    #[serde(default)]
    pub tls_key: Option<PathBuf>,
}

/// Offer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OffersConfig {
    /// Seconds an offer waits for a receiver before it expires (default: 600).
    #[serde(default = "default_offer_timeout_secs")]
    pub timeout_secs: u64,
    /// Require the streaming `PUT` to come from the IP that created the offer
    /// (default: true).
    #[serde(default = "default_require_same_origin")]
    pub require_same_origin: bool,
    /// Bytes moved per copy step between sender and receiver (default: 32KB).
    #[serde(default = "default_copy_buffer_size")]
    pub copy_buffer_size: usize,
    /// Bytes the in-memory pipe to a receiver may hold (default: 64KB).
    #[serde(default = "default_pipe_capacity")]
    pub pipe_capacity: usize,
    /// Longest accepted filename hint in bytes (default: 255).
    #[serde(default = "default_max_filename_len")]
    pub max_filename_len: usize,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Offers one client IP may create per minute (default: 30).
    #[serde(default = "default_offers_per_minute")]
    pub offers_per_minute: u32,
    /// Send or receive attempts one client IP may make per minute
    /// (default: 60). Bounds how fast a client can guess secrets.
    #[serde(default = "default_fulfills_per_minute")]
    pub fulfills_per_minute: u32,
    /// Seconds between evictions of idle limiter entries (default: 300).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// HTTP endpoints configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Enable metrics endpoint (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_offer_timeout_secs() -> u64 {
    10 * 60 // 10 minutes
}

fn default_require_same_origin() -> bool {
    true
}

fn default_copy_buffer_size() -> usize {
    32 * 1024 // 32KB
}

fn default_pipe_capacity() -> usize {
    64 * 1024 // 64KB
}

fn default_max_filename_len() -> usize {
    255
}

fn default_offers_per_minute() -> u32 {
    30
}

fn default_fulfills_per_minute() -> u32 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_offer_timeout_secs(),
            require_same_origin: default_require_same_origin(),
            copy_buffer_size: default_copy_buffer_size(),
            pipe_capacity: default_pipe_capacity(),
            max_filename_len: default_max_filename_len(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            offers_per_minute: default_offers_per_minute(),
            fulfills_per_minute: default_fulfills_per_minute(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Certificate and key paths, when TLS is configured.
    pub fn tls(&self) -> Option<(&std::path::Path, &std::path::Path)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }
}

impl OffersConfig {
    /// How long an unmatched offer lives.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value
    /// is out of range.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the relay cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.server.tls_cert, &self.server.tls_key) {
            (Some(_), None) => {
                return Err(ConfigError::Invalid {
                    field: "server.tls_key".to_string(),
                    reason: "required when server.tls_cert is set".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid {
                    field: "server.tls_cert".to_string(),
                    reason: "required when server.tls_key is set".to_string(),
                })
            }
            _ => {}
        }

        let checks = [
            ("offers.timeout_secs", self.offers.timeout_secs == 0),
            ("offers.copy_buffer_size", self.offers.copy_buffer_size == 0),
            ("offers.pipe_capacity", self.offers.pipe_capacity == 0),
            ("limits.offers_per_minute", self.limits.offers_per_minute == 0),
            ("limits.fulfills_per_minute", self.limits.fulfills_per_minute == 0),
            ("limits.sweep_interval_secs", self.limits.sweep_interval_secs == 0),
        ];

        match checks.iter().find(|(_, is_zero)| *is_zero) {
            Some((field, _)) => Err(ConfigError::Invalid {
                field: (*field).to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// A value is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}
