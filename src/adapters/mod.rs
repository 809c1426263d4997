//! Payload adapters - per-endpoint translation between client JSON shapes
//! and the backend's named-tensor schema
//!
//! Every adapter is a pure, stateless transformation: it builds the input
//! tensors and output-name list for one call and decodes the positionally
//! ordered output tensors back into the client response shape.

pub mod embed;
pub mod rerank;
pub mod translate;
