//! ML Gateway
//!
//! A readiness-gated HTTP gateway that accepts JSON embed, rerank,
//! translate, and language-identification requests and forwards them as
//! Triton v2 named-tensor inference calls to a separate serving backend.

pub mod adapters;
pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod langid;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::client::InferenceBackend;
use backend::readiness::ReadinessState;

/// Application state shared across all handlers.
///
/// Everything here is immutable after startup; concurrent requests share
/// it read-only, each issuing its own backend call.
pub struct AppState {
    pub settings: config::Settings,
    pub backend: Arc<dyn InferenceBackend>,
    pub readiness: ReadinessState,
}
