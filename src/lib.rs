pub mod builder;
pub mod config;
pub mod error;
pub mod extraction;
pub mod format;
pub mod llm;
pub mod model;
pub mod observable;
pub mod orchestrator;
pub mod preferences;
pub mod render;
pub mod rescale;
pub mod segment;
pub mod translation;

pub use builder::RecipeOrchestratorBuilder;
pub use config::{CookscaleConfig, LanguageConfig, ProviderConfig};
pub use error::CookscaleError;
pub use extraction::{OpenAiExtractor, RecipeExtractor};
pub use model::{ExtractedText, Ingredient, Recipe, RecipeSource, RecipeStep, TextSpan, Timer};
pub use observable::Observable;
pub use orchestrator::{
    ProcessingState, RecipeObservables, RecipeOrchestrator, ServingsState,
    DEFAULT_SERVINGS_AMOUNT, DETECTION_STEPS, MAX_PEOPLE, MAX_WAIT_TIME, MILLIS_BETWEEN_UPDATES,
};
pub use preferences::{MemoryPreferences, Preferences, TRANSLATE_PREFERENCE_KEY};
pub use render::{IngredientLine, RenderedBlock, StepView};
pub use rescale::Servings;
pub use segment::{segment_step, Block, StepSegmentation, TextBlock, QUANTITY_PLACEHOLDER};
pub use translation::{Language, OpenAiTranslator, TranslationCache, Translator};

use log::debug;

/// Render every step of `recipe` for `servings`
pub fn render_recipe(recipe: &Recipe, servings: Servings) -> Vec<Vec<RenderedBlock>> {
    debug!(
        "Rendering {} steps for {} servings",
        recipe.steps.len(),
        servings.current
    );
    render::step_views(recipe)
        .iter()
        .map(|view| view.render(servings))
        .collect()
}
