//! Translation adapter: `TEXT` + `SRC_LANG` + `TGT_LANG` in,
//! `TRANSLATION` out
//!
//! Language codes are resolved through the fixed tag table before any
//! backend call; when the request omits the source language the local
//! classifier picks one.

use crate::api::models::{TranslateRequest, TranslateResponse};
use crate::backend::tensor::Tensor;
use crate::error::{AppError, Result};
use crate::langid;

pub const INPUT_TEXT: &str = "TEXT";
pub const INPUT_SRC_LANG: &str = "SRC_LANG";
pub const INPUT_TGT_LANG: &str = "TGT_LANG";
pub const OUTPUT_TRANSLATION: &str = "TRANSLATION";

pub const REQUESTED_OUTPUTS: [&str; 1] = [OUTPUT_TRANSLATION];

/// Source and target tags in the backend vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLanguages {
    pub src_tag: &'static str,
    pub tgt_tag: &'static str,
}

/// Resolve the language pair for a request, classifying the source
/// locally when it is not given
pub fn resolve_languages(request: &TranslateRequest) -> Result<ResolvedLanguages> {
    if request.text.is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let src_code = match &request.src_lang {
        Some(code) => code.clone(),
        None => {
            langid::identify(&request.text)
                .ok_or_else(|| {
                    AppError::Validation(
                        "could not identify the source language".to_string(),
                    )
                })?
                .lang
        }
    };

    Ok(ResolvedLanguages {
        src_tag: langid::resolve_tag(&src_code)?,
        tgt_tag: langid::resolve_tag(&request.tgt_lang)?,
    })
}

/// Build the input tensors for one translation call
pub fn build_inputs(request: &TranslateRequest, languages: ResolvedLanguages) -> Vec<Tensor> {
    vec![
        Tensor::bytes(INPUT_TEXT, vec![request.text.clone()]),
        Tensor::bytes(INPUT_SRC_LANG, vec![languages.src_tag.to_string()]),
        Tensor::bytes(INPUT_TGT_LANG, vec![languages.tgt_tag.to_string()]),
    ]
}

/// Decode the translation tensor
pub fn parse_outputs(outputs: &[Tensor]) -> Result<TranslateResponse> {
    let tensor = outputs.first().ok_or_else(|| {
        AppError::MalformedResponse(
            "translate expected a TRANSLATION tensor, got none".to_string(),
        )
    })?;

    let texts = tensor.as_text_vec()?;
    let translation = texts.into_iter().next().ok_or_else(|| {
        AppError::MalformedResponse("TRANSLATION tensor is empty".to_string())
    })?;

    Ok(TranslateResponse { translation })
}
