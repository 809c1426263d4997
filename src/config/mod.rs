//! Configuration module

pub mod settings;

pub use settings::{BackendConfig, LoggingConfig, ReadinessConfig, ServerConfig, Settings};
