use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::config::{CookscaleConfig, LanguageConfig};
use crate::error::CookscaleError;
use crate::extraction::{OpenAiExtractor, RecipeExtractor};
use crate::orchestrator::RecipeOrchestrator;
use crate::preferences::{MemoryPreferences, Preferences, TRANSLATE_PREFERENCE_KEY};
use crate::translation::{OpenAiTranslator, Translator};

/// Builder for wiring a [`RecipeOrchestrator`] to its collaborators
#[derive(Default)]
pub struct RecipeOrchestratorBuilder {
    extractor: Option<Arc<dyn RecipeExtractor>>,
    translator: Option<Arc<dyn Translator>>,
    preferences: Option<Arc<dyn Preferences>>,
    languages: Option<LanguageConfig>,
}

impl RecipeOrchestratorBuilder {
    /// Set the collaborator that turns text into a structured recipe
    pub fn extractor(mut self, extractor: Arc<dyn RecipeExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the collaborator that translates sentences
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Set the preference store. Defaults to an empty [`MemoryPreferences`].
    pub fn preferences(mut self, preferences: Arc<dyn Preferences>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Set the source and target language codes
    pub fn languages(mut self, languages: LanguageConfig) -> Self {
        self.languages = Some(languages);
        self
    }

    /// Use the OpenAI extractor and translator described by `config`, and
    /// seed the translate preference from it.
    ///
    /// # Example
    /// ```no_run
    /// # use cookscale::{CookscaleConfig, RecipeOrchestrator};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = CookscaleConfig::load()?;
    /// let orchestrator = RecipeOrchestrator::builder().config(&config)?.build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn config(self, config: &CookscaleConfig) -> Result<Self, CookscaleError> {
        let timeout = Duration::from_secs(config.timeout);
        let extractor = OpenAiExtractor::new(&config.provider, timeout)?;
        let translator = OpenAiTranslator::new(&config.provider, timeout)?;
        Ok(self
            .extractor(Arc::new(extractor))
            .translator(Arc::new(translator))
            .preferences(Arc::new(MemoryPreferences::with_value(
                TRANSLATE_PREFERENCE_KEY,
                config.translate_to_target,
            )))
            .languages(config.languages.clone()))
    }

    /// Build the orchestrator on the current tokio runtime
    ///
    /// # Errors
    /// Returns `CookscaleError` if:
    /// - No extractor or translator was set
    /// - Called outside a tokio runtime
    pub fn build(self) -> Result<RecipeOrchestrator, CookscaleError> {
        let extractor = self.extractor.ok_or_else(|| {
            CookscaleError::Builder("No extractor specified. Use .extractor()".to_string())
        })?;
        let translator = self.translator.ok_or_else(|| {
            CookscaleError::Builder("No translator specified. Use .translator()".to_string())
        })?;
        let runtime = Handle::try_current().map_err(|e| {
            CookscaleError::Runtime(format!("RecipeOrchestrator needs a tokio runtime: {}", e))
        })?;

        let preferences: Arc<dyn Preferences> = match self.preferences {
            Some(preferences) => preferences,
            None => Arc::new(MemoryPreferences::new()),
        };

        Ok(RecipeOrchestrator::new(
            extractor,
            translator,
            preferences,
            self.languages.unwrap_or_default(),
            runtime,
        ))
    }
}

impl RecipeOrchestrator {
    /// Creates a new builder
    pub fn builder() -> RecipeOrchestratorBuilder {
        RecipeOrchestratorBuilder::default()
    }
}
