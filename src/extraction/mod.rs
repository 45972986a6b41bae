mod open_ai;
mod prompt;
mod spans;

pub use open_ai::OpenAiExtractor;
pub use prompt::EXTRACTION_PROMPT;

use async_trait::async_trait;

use crate::error::CookscaleError;
use crate::model::{ExtractedText, Recipe};

/// Long-running conversion of document text into a structured [`Recipe`]
#[async_trait]
pub trait RecipeExtractor: Send + Sync {
    /// Get the extractor name (e.g., "openai")
    fn extractor_name(&self) -> &str;

    /// Detection steps finished by the running extraction, in
    /// `[0, DETECTION_STEPS]`. Read concurrently while `extract` runs.
    fn progress(&self) -> u32;

    async fn extract(&self, text: &ExtractedText) -> Result<Recipe, CookscaleError>;
}
