//! HTTP client for the tensor-inference backend (Triton v2 protocol)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::tensor::{InferenceRequest, InferenceResponse, OutputRequest, Tensor};
use crate::config::BackendConfig;
use crate::error::{AppError, Result};

/// Trait for inference backends
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one inference call. The returned tensors are ordered
    /// positionally against `requested_outputs`.
    async fn infer(
        &self,
        model: &str,
        inputs: Vec<Tensor>,
        requested_outputs: &[&str],
    ) -> Result<Vec<Tensor>>;

    /// Probe the backend readiness endpoint once
    async fn check_ready(&self) -> bool;
}

/// Client for a single Triton-protocol backend over HTTP.
///
/// Holds one connection-pooled `reqwest::Client` built at startup; the
/// client is shared read-only across concurrent requests.
pub struct TritonClient {
    base_url: String,
    client: Client,
}

impl TritonClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Backend base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl InferenceBackend for TritonClient {
    async fn infer(
        &self,
        model: &str,
        inputs: Vec<Tensor>,
        requested_outputs: &[&str],
    ) -> Result<Vec<Tensor>> {
        let request_id = Uuid::new_v4();
        let url = format!("{}/v2/models/{}/infer", self.base_url, model);

        debug!(
            %request_id,
            model = %model,
            inputs = inputs.len(),
            outputs = requested_outputs.len(),
            "Sending inference request"
        );

        let body = InferenceRequest {
            inputs,
            outputs: requested_outputs
                .iter()
                .map(|name| OutputRequest::named(name))
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(%request_id, model = %model, error = %e, "Backend call failed");
                AppError::BackendUnreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%request_id, model = %model, status = %status, "Backend rejected request");
            return Err(AppError::BackendRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InferenceResponse = response.json().await.map_err(|e| {
            AppError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        if parsed.outputs.len() != requested_outputs.len() {
            return Err(AppError::MalformedResponse(format!(
                "requested {} outputs, backend returned {}",
                requested_outputs.len(),
                parsed.outputs.len()
            )));
        }
        for tensor in &parsed.outputs {
            tensor.check_shape()?;
        }

        debug!(%request_id, model = %model, "Inference request completed");
        Ok(parsed.outputs)
    }

    async fn check_ready(&self) -> bool {
        let url = format!("{}/v2/health/ready", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                debug!(error = %e, "Readiness probe failed");
                false
            }
        }
    }
}
