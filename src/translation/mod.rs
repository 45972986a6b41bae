mod cache;
mod open_ai;
mod prompt;
pub mod sentences;

pub use cache::{Language, TranslationAction, TranslationCache};
pub use open_ai::OpenAiTranslator;
pub use prompt::build_translation_prompt;

use async_trait::async_trait;

use crate::error::CookscaleError;

/// Batch string translation backend
#[async_trait]
pub trait Translator: Send + Sync {
    /// Get the translator name (e.g., "openai")
    fn translator_name(&self) -> &str;

    /// Translate `sentences` from `source` to `target` language tags.
    ///
    /// The result is positional: element `i` is the translation of
    /// `sentences[i]`. An empty result means the translation failed.
    async fn translate_batch(
        &self,
        sentences: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, CookscaleError>;
}
