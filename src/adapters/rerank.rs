//! Rerank adapter: `QUERY` + `DOC` in, `SCORE` out

use crate::api::models::{RerankRequest, RerankResponse, Scores};
use crate::backend::tensor::Tensor;
use crate::error::{AppError, Result};

pub const INPUT_QUERY: &str = "QUERY";
pub const INPUT_DOC: &str = "DOC";
pub const OUTPUT_SCORE: &str = "SCORE";

pub const REQUESTED_OUTPUTS: [&str; 1] = [OUTPUT_SCORE];

/// Build the input tensors for one rerank call
pub fn build_inputs(request: &RerankRequest) -> Result<Vec<Tensor>> {
    if request.query.is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    request.doc.validate("doc")?;

    Ok(vec![
        Tensor::bytes(INPUT_QUERY, vec![request.query.clone()]),
        Tensor::bytes(INPUT_DOC, request.doc.to_batch()),
    ])
}

/// Decode the score tensor, one float per document
pub fn parse_outputs(request: &RerankRequest, outputs: &[Tensor]) -> Result<RerankResponse> {
    let score_tensor = outputs.first().ok_or_else(|| {
        AppError::MalformedResponse("rerank expected a SCORE tensor, got none".to_string())
    })?;

    let scores = score_tensor.as_f64_vec()?;
    if scores.len() != request.doc.len() {
        return Err(AppError::MalformedResponse(format!(
            "rerank sent {} documents but got {} scores",
            request.doc.len(),
            scores.len()
        )));
    }

    let score = if request.doc.is_batch() {
        Scores::Batch(scores)
    } else {
        Scores::Single(scores[0])
    };

    Ok(RerankResponse { score })
}
