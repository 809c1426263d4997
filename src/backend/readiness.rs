//! Startup readiness gate for the inference backend
//!
//! Runs exactly once before the listener is bound. There is no periodic
//! re-check afterwards; a backend that dies later surfaces per request as
//! `BackendUnreachable`.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::backend::client::InferenceBackend;
use crate::config::ReadinessConfig;
use crate::error::{AppError, Result};

/// Process-wide readiness, set once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Unknown,
    Ready,
    Failed,
}

impl ReadinessState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessState::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessState::Unknown => "unknown",
            ReadinessState::Ready => "ready",
            ReadinessState::Failed => "failed",
        }
    }
}

/// Block until the backend reports ready, or fail the startup.
///
/// Polls the readiness endpoint up to `max_attempts` times, bounding each
/// probe by `per_attempt_timeout_ms` and sleeping `poll_interval_ms`
/// between failed attempts. Returns `StartupFailed` once the budget is
/// exhausted; the caller must not begin serving in that case.
pub async fn await_ready(backend: &dyn InferenceBackend, config: &ReadinessConfig) -> Result<()> {
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let per_attempt_timeout = Duration::from_millis(config.per_attempt_timeout_ms);

    for attempt in 1..=config.max_attempts {
        let ready = tokio::time::timeout(per_attempt_timeout, backend.check_ready())
            .await
            .unwrap_or(false);

        if ready {
            info!(attempt, "Backend is ready");
            return Ok(());
        }

        debug!(
            attempt,
            max_attempts = config.max_attempts,
            "Backend not ready yet"
        );

        if attempt < config.max_attempts {
            tokio::time::sleep(poll_interval).await;
        }
    }

    warn!(
        attempts = config.max_attempts,
        "Backend never became ready, refusing to serve"
    );
    Err(AppError::StartupFailed {
        attempts: config.max_attempts,
    })
}
