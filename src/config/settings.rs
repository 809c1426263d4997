//! Application settings and configuration management

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Inference backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the tensor-inference backend
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    /// Per-call HTTP timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Model name used by the translation endpoint
    #[serde(default = "default_translate_model")]
    pub translate_model: String,
}

fn default_backend_url() -> String {
    "http://triton:8081".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

fn default_translate_model() -> String {
    "translator".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_ms: default_timeout(),
            translate_model: default_translate_model(),
        }
    }
}

/// Startup readiness poll configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_attempt_timeout")]
    pub per_attempt_timeout_ms: u64,
}

fn default_max_attempts() -> u32 {
    60
}

fn default_poll_interval() -> u64 {
    100
}

fn default_attempt_timeout() -> u64 {
    1_000
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            poll_interval_ms: default_poll_interval(),
            per_attempt_timeout_ms: default_attempt_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/gateway")
    }

    /// Load settings: defaults, then an optional config file, then
    /// `ML_GATEWAY__*` environment overrides, then `BACKEND_HTTP`.
    pub fn load_from_path(path: &str) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("backend.base_url", default_backend_url())?
            .set_default("backend.timeout_ms", default_timeout())?
            .set_default("backend.translate_model", default_translate_model())?
            .set_default("readiness.max_attempts", default_max_attempts() as u64)?
            .set_default("readiness.poll_interval_ms", default_poll_interval())?
            .set_default(
                "readiness.per_attempt_timeout_ms",
                default_attempt_timeout(),
            )?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("ML_GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        // BACKEND_HTTP wins over everything else for the backend address
        if let Ok(base_url) = std::env::var("BACKEND_HTTP") {
            if !base_url.is_empty() {
                settings.backend.base_url = base_url;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }
        if self.backend.base_url.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Backend base URL cannot be empty".to_string(),
            )));
        }
        if self.readiness.max_attempts == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Readiness poll needs at least one attempt".to_string(),
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            readiness: ReadinessConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_point_at_triton() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.backend.base_url, "http://triton:8081");
        assert_eq!(settings.readiness.max_attempts, 60);
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_readiness_attempts_fail_validation() {
        let mut settings = Settings::default();
        settings.readiness.max_attempts = 0;
        assert!(settings.validate().is_err());
    }

    // Mutates the process environment; the only test in this crate that
    // touches BACKEND_HTTP, so it cannot race with other tests.
    #[test]
    fn backend_http_env_overrides_base_url() {
        std::env::set_var("BACKEND_HTTP", "http://triton-staging:9000");
        let settings = Settings::load_from_path("config/does-not-exist").unwrap();
        std::env::remove_var("BACKEND_HTTP");

        assert_eq!(settings.backend.base_url, "http://triton-staging:9000");

        let settings = Settings::load_from_path("config/does-not-exist").unwrap();
        assert_eq!(settings.backend.base_url, "http://triton:8081");
    }
}
