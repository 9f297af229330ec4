//! Application configuration.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use validator::Validate;

use crate::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    /// Worker pool sizing.
    #[serde(default)]
    pub workers: WorkersConfig,
    /// Media storage and cache retention.
    #[serde(default)]
    #[validate(nested)]
    pub media: MediaConfig,
    /// Federation configuration.
    #[serde(default)]
    #[validate(nested)]
    pub federation: FederationConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// API access configuration.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
    /// Public URL of this instance.
    #[serde(default = "default_url")]
    #[validate(url)]
    pub url: String,
}

/// Worker pool sizing.
///
/// A non-positive value derives the size at startup: worker counts from the
/// available parallelism, queue sizes proportionally to the worker count.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersConfig {
    /// Workers processing messages from the client API.
    #[serde(default = "default_derived")]
    pub client_api_workers: isize,
    /// Queue capacity of the client API pool.
    #[serde(default = "default_derived")]
    pub client_api_queue_size: isize,
    /// Workers processing federation messages.
    #[serde(default = "default_derived")]
    pub federator_workers: isize,
    /// Queue capacity of the federator pool.
    #[serde(default = "default_derived")]
    pub federator_queue_size: isize,
}

/// Media configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaConfig {
    /// Directory where media files are stored.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Base URL media files are served from.
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
    /// Days remote media stays cached before the prune job evicts it.
    #[serde(default = "default_remote_cache_days")]
    pub remote_cache_days: u32,
    /// Days a local upload may stay unattached before it is removed.
    #[serde(default = "default_unused_local_attachment_days")]
    #[validate(range(min = 1))]
    pub unused_local_attachment_days: u32,
}

/// Federation configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FederationConfig {
    /// Whether federation is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// User agent sent with outbound deliveries.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout for a single outbound delivery.
    #[serde(default = "default_delivery_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub delivery_timeout_secs: u64,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// API access configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Static bearer tokens mapped to the local account ID they authenticate.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_derived() -> isize {
    -1
}

fn default_storage_path() -> String {
    "./files".to_string()
}

fn default_media_base_url() -> String {
    "/files".to_string()
}

const fn default_remote_cache_days() -> u32 {
    30
}

const fn default_unused_local_attachment_days() -> u32 {
    2
}

const fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("murmur/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_delivery_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            url: default_url(),
        }
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            client_api_workers: default_derived(),
            client_api_queue_size: default_derived(),
            federator_workers: default_derived(),
            federator_queue_size: default_derived(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            base_url: default_media_base_url(),
            remote_cache_days: default_remote_cache_days(),
            unused_local_attachment_days: default_unused_local_attachment_days(),
        }
    }
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            user_agent: default_user_agent(),
            delivery_timeout_secs: default_delivery_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `MURMUR_ENV`)
    /// 4. Environment variables such as `MURMUR__SERVER__PORT`
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let env = std::env::var("MURMUR_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MURMUR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("MURMUR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workers.client_api_workers, -1);
        assert_eq!(config.media.remote_cache_days, 30);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
url = "https://murmur.example"

[workers]
federator_workers = 4
federator_queue_size = 64

[logging]
format = "json"

[api.tokens]
secret = "01admin"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.url, "https://murmur.example");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.workers.federator_workers, 4);
        assert_eq!(config.workers.federator_queue_size, 64);
        assert_eq!(config.workers.client_api_workers, -1);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.api.tokens.get("secret").unwrap(), "01admin");
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nurl = \"not a url\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::AppError::Validation(_)));
    }
}
