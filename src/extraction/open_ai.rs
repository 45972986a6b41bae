use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use super::spans::LlmRecipe;
use super::{RecipeExtractor, EXTRACTION_PROMPT};
use crate::config::ProviderConfig;
use crate::error::CookscaleError;
use crate::llm::ChatClient;
use crate::model::{ExtractedText, Recipe};

/// Extractor backed by an OpenAI-compatible chat completion endpoint.
///
/// Progress moves through four steps: request sent, answer received, answer
/// parsed, text positions resolved.
pub struct OpenAiExtractor {
    client: ChatClient,
    progress: AtomicU32,
}

impl OpenAiExtractor {
    /// Create a new extractor from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, CookscaleError> {
        Ok(Self::with_client(ChatClient::new(config, timeout)?))
    }

    pub fn with_client(client: ChatClient) -> Self {
        OpenAiExtractor {
            client,
            progress: AtomicU32::new(0),
        }
    }

    fn advance(&self, step: u32) {
        self.progress.store(step, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecipeExtractor for OpenAiExtractor {
    fn extractor_name(&self) -> &str {
        "openai"
    }

    fn progress(&self) -> u32 {
        self.progress.load(Ordering::SeqCst)
    }

    async fn extract(&self, text: &ExtractedText) -> Result<Recipe, CookscaleError> {
        self.advance(0);
        let input = text.full_text();
        if input.trim().is_empty() {
            return Err(CookscaleError::Extraction(
                "Recipe text cannot be empty".to_string(),
            ));
        }

        info!(
            "Extracting recipe from {} characters with {}",
            input.len(),
            self.client.model()
        );
        self.advance(1);
        let content = self.client.complete(EXTRACTION_PROMPT, &input).await?;
        self.advance(2);

        let answer: LlmRecipe = serde_json::from_str(&content)?;
        self.advance(3);
        if let Some(error) = answer.error.as_deref().filter(|e| !e.trim().is_empty()) {
            return Err(CookscaleError::Extraction(error.to_string()));
        }
        if answer.steps.is_empty() {
            return Err(CookscaleError::Extraction(
                "No recipe steps found in text".to_string(),
            ));
        }

        let recipe = answer.into_recipe();
        self.advance(4);
        debug!(
            "Extracted {} steps, {} ingredients, servings {:?}",
            recipe.steps.len(),
            recipe.ingredients.len(),
            recipe.number_of_people
        );
        Ok(recipe)
    }
}
