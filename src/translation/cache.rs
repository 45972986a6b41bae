use std::sync::Arc;

use log::debug;

use crate::model::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Language the recipe was extracted in
    #[default]
    Source,
    /// Language the recipe can be translated into
    Target,
}

impl Language {
    pub fn from_target_flag(to_target: bool) -> Self {
        if to_target {
            Language::Target
        } else {
            Language::Source
        }
    }
}

/// What the caller has to do after a language switch request
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationAction {
    /// Nothing changes for the presentation layer
    Unchanged,
    /// Show this recipe
    Publish(Arc<Recipe>),
    /// Call the translator; the result goes to [`TranslationCache::complete`]
    Request,
}

/// The source recipe and its lazily translated variant.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    source: Arc<Recipe>,
    translated: Option<Arc<Recipe>>,
    active: Language,
    in_flight: bool,
}

impl TranslationCache {
    pub fn new(source: Arc<Recipe>) -> Self {
        TranslationCache {
            source,
            translated: None,
            active: Language::Source,
            in_flight: false,
        }
    }

    pub fn source(&self) -> &Arc<Recipe> {
        &self.source
    }

    pub fn translated(&self) -> Option<&Arc<Recipe>> {
        self.translated.as_ref()
    }

    pub fn active_language(&self) -> Language {
        self.active
    }

    pub fn active_recipe(&self) -> &Arc<Recipe> {
        match (self.active, &self.translated) {
            (Language::Target, Some(translated)) => translated,
            _ => &self.source,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Switch the active language. At most one translation is requested per cache.
    pub fn request(&mut self, language: Language) -> TranslationAction {
        if self.active == language {
            return TranslationAction::Unchanged;
        }
        self.active = language;

        match language {
            Language::Source => TranslationAction::Publish(self.source.clone()),
            Language::Target => match &self.translated {
                Some(translated) => TranslationAction::Publish(translated.clone()),
                None if self.in_flight => {
                    debug!("Translation already in flight, waiting for it");
                    TranslationAction::Unchanged
                }
                None => {
                    self.in_flight = true;
                    TranslationAction::Request
                }
            },
        }
    }

    /// Store a finished translation. Returns it when it should be shown now.
    pub fn complete(&mut self, translated: Recipe) -> Option<Arc<Recipe>> {
        self.in_flight = false;
        let translated = match &self.translated {
            Some(existing) => existing.clone(),
            None => {
                let translated = Arc::new(translated);
                self.translated = Some(translated.clone());
                translated
            }
        };
        (self.active == Language::Target).then_some(translated)
    }

    /// Record a failed translation and fall back to the source language.
    pub fn fail(&mut self) {
        self.in_flight = false;
        self.active = Language::Source;
    }
}
