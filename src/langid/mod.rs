//! Local language identification and the backend language-tag table
//!
//! Classification never touches the backend: `whatlang` runs in-process and
//! its ISO-639-3 output is folded through a fixed table into the 2-letter
//! codes the API exposes and the tag vocabulary the translation model
//! expects. A code missing from the table is a client error, raised before
//! any backend call.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, Result};

/// One row of the language table
pub struct LangEntry {
    /// Client-facing 2-letter code
    pub code: &'static str,
    /// ISO-639-3 code as produced by the classifier
    pub alpha3: &'static str,
    /// Tag the translation model was trained with
    pub tag: &'static str,
}

/// Languages the gateway can translate between
pub const LANGUAGES: &[LangEntry] = &[
    LangEntry { code: "en", alpha3: "eng", tag: "en_XX" },
    LangEntry { code: "ru", alpha3: "rus", tag: "ru_Cyrl" },
    LangEntry { code: "uz", alpha3: "uzb", tag: "uz_Latn" },
    LangEntry { code: "kk", alpha3: "kaz", tag: "kk_Cyrl" },
    LangEntry { code: "tr", alpha3: "tur", tag: "tr_Latn" },
    LangEntry { code: "ar", alpha3: "ara", tag: "ar_Arab" },
    LangEntry { code: "de", alpha3: "deu", tag: "de_XX" },
    LangEntry { code: "fr", alpha3: "fra", tag: "fr_XX" },
    LangEntry { code: "es", alpha3: "spa", tag: "es_XX" },
    LangEntry { code: "hi", alpha3: "hin", tag: "hi_Deva" },
    LangEntry { code: "ja", alpha3: "jpn", tag: "ja_XX" },
];

/// Classification result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Detection {
    /// Detected language code (2-letter when the table knows it,
    /// ISO-639-3 otherwise)
    pub lang: String,
    /// Classifier confidence in `[0, 1]`
    pub prob: f64,
}

/// Classify free text locally. `None` when the classifier cannot commit
/// to any language (e.g. empty or symbol-only input).
pub fn identify(text: &str) -> Option<Detection> {
    let info = whatlang::detect(text)?;
    let alpha3 = info.lang().code();
    let lang = LANGUAGES
        .iter()
        .find(|entry| entry.alpha3 == alpha3)
        .map(|entry| entry.code)
        .unwrap_or(alpha3);

    Some(Detection {
        lang: lang.to_string(),
        prob: info.confidence(),
    })
}

/// Map a 2-letter code to the backend tag vocabulary
pub fn backend_tag(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.tag)
}

/// Like [`backend_tag`], but an unmapped code is a client error
pub fn resolve_tag(code: &str) -> Result<&'static str> {
    backend_tag(code).ok_or_else(|| AppError::UnsupportedLanguage(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_maps_spec_languages() {
        assert_eq!(backend_tag("uz"), Some("uz_Latn"));
        assert_eq!(backend_tag("ru"), Some("ru_Cyrl"));
        assert_eq!(backend_tag("en"), Some("en_XX"));
    }

    #[test]
    fn unmapped_code_is_a_client_error() {
        let err = resolve_tag("tlh").unwrap_err();
        match err {
            AppError::UnsupportedLanguage(code) => assert_eq!(code, "tlh"),
            other => panic!("expected UnsupportedLanguage, got {other}"),
        }
    }

    #[test]
    fn cyrillic_text_is_classified_as_russian() {
        let detection = identify("Привет, как у тебя дела сегодня?").unwrap();
        assert_eq!(detection.lang, "ru");
        assert!(detection.prob > 0.0);
    }

    #[test]
    fn english_text_is_classified_as_english() {
        let detection =
            identify("The quick brown fox jumps over the lazy dog every morning").unwrap();
        assert_eq!(detection.lang, "en");
    }

    #[test]
    fn empty_text_yields_no_detection() {
        assert!(identify("").is_none());
    }
}
