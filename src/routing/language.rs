//! Language detection and translation, used to normalise text before
//! classification.

use crate::utilities::errors::LanguageError;

/// Language detection and translation provider.
pub trait LanguageUtility: Send + Sync {
    /// Detect the language of `text`, returning a short code such as `"en"`.
    fn detect_language(&self, text: &str) -> Result<String, LanguageError>;

    /// Translate `text` from `from` into the classifiers' working language.
    fn translate(&self, text: &str, from: &str) -> Result<String, LanguageError>;
}

/// Assumes everything is already English.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLanguage;

impl LanguageUtility for PassthroughLanguage {
    fn detect_language(&self, _text: &str) -> Result<String, LanguageError> {
        Ok("en".to_string())
    }

    fn translate(&self, text: &str, _from: &str) -> Result<String, LanguageError> {
        Ok(text.to_string())
    }
}

/// Detect and translate, falling back to the original text on any failure.
///
/// Text in a language outside `supported` is not translated. An empty
/// `supported` list accepts every language.
pub fn normalize_text(language: &dyn LanguageUtility, text: &str, supported: &[String]) -> String {
    let lang = match language.detect_language(text) {
        Ok(lang) => lang,
        Err(e) => {
            log::warn!("Language detection failed, using untranslated text: {}", e);
            return text.to_string();
        }
    };
    if !supported.is_empty() && !supported.iter().any(|s| s.eq_ignore_ascii_case(&lang)) {
        log::warn!(
            "Unsupported language '{}' (supported: {:?}), using untranslated text",
            lang,
            supported
        );
        return text.to_string();
    }
    match language.translate(text, &lang) {
        Ok(translated) => translated,
        Err(e) => {
            log::warn!("Translation from '{}' failed, using untranslated text: {}", lang, e);
            text.to_string()
        }
    }
}

/// First non-empty line of `text`, trimmed; `text` itself if it has none.
pub fn first_sentence(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(text)
}
