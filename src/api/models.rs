//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, Result};

/// One text or a batch of texts.
///
/// The scalar-or-batch distinction is resolved here, once, at the request
/// boundary; response shapes mirror it (scalar in, scalar out).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl TextInput {
    /// Normalize to a batch for tensor construction
    pub fn to_batch(&self) -> Vec<String> {
        match self {
            TextInput::Single(text) => vec![text.clone()],
            TextInput::Batch(texts) => texts.clone(),
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, TextInput::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            TextInput::Single(_) => 1,
            TextInput::Batch(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject empty strings and empty batches
    pub fn validate(&self, field: &str) -> Result<()> {
        match self {
            TextInput::Single(text) if text.is_empty() => Err(AppError::Validation(format!(
                "{field} must not be empty"
            ))),
            TextInput::Batch(texts) if texts.is_empty() => Err(AppError::Validation(format!(
                "{field} must contain at least one text"
            ))),
            TextInput::Batch(texts) if texts.iter().any(|t| t.is_empty()) => Err(
                AppError::Validation(format!("{field} must not contain empty texts")),
            ),
            _ => Ok(()),
        }
    }
}

/// Flat vector for a scalar request, one row per text for a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FloatMatrix {
    Single(Vec<f64>),
    Batch(Vec<Vec<f64>>),
}

/// Integer counterpart of [`FloatMatrix`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IntMatrix {
    Single(Vec<i32>),
    Batch(Vec<Vec<i32>>),
}

/// One score for one document, a list for a document batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Scores {
    Single(f64),
    Batch(Vec<f64>),
}

/// Embedding request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct EmbedRequest {
    /// Text(s) to embed
    pub text: TextInput,
    /// Also request sparse embedding outputs
    #[serde(default)]
    pub sparse: bool,
}

/// Embedding response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmbedResponse {
    pub dense: FloatMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<FloatMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_indices: Option<IntMatrix>,
}

/// Rerank request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RerankRequest {
    pub query: String,
    /// Document(s) to score against the query
    pub doc: TextInput,
}

/// Rerank response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RerankResponse {
    pub score: Scores,
}

/// Translation request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TranslateRequest {
    pub text: String,
    /// Source language code; classified locally when omitted
    #[serde(default)]
    pub src_lang: Option<String>,
    /// Target language code
    pub tgt_lang: String,
}

/// Translation response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslateResponse {
    pub translation: String,
}

/// Query parameters of the language-identification endpoint
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct LangIdQuery {
    /// Text to classify
    pub q: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
}
