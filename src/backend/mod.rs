//! Backend module - tensor wire model, HTTP client, and readiness gate

pub mod client;
pub mod readiness;
pub mod tensor;

pub use client::{InferenceBackend, TritonClient};
pub use readiness::{await_ready, ReadinessState};
pub use tensor::{DataType, InferenceRequest, InferenceResponse, OutputRequest, Tensor};
