//! The recipe state machine.
//!
//! [`RecipeOrchestrator`] runs one extraction attempt at a time, polls its
//! progress, owns the committed recipe with its servings, and switches
//! between the source recipe and its cached translation.
//!
//! ```text
//! NotStarted ──initialize──▶ Running ──extract ok──▶ Succeeded
//!                               │
//!                               └──extract err──▶ Failed ──initialize──▶ Running
//! ```
//!
//! Every mutation happens under one mutex, and observable values are
//! published while it is held, so subscribers see changes in the order they
//! were made.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::runtime::Handle;
use tokio::time::{sleep, Instant};

use crate::config::LanguageConfig;
use crate::error::CookscaleError;
use crate::extraction::RecipeExtractor;
use crate::model::{Recipe, RecipeSource};
use crate::observable::Observable;
use crate::preferences::{Preferences, TRANSLATE_PREFERENCE_KEY};
use crate::rescale::Servings;
use crate::translation::sentences::{apply_translation, collect_sentences};
use crate::translation::{Language, TranslationAction, TranslationCache, Translator};

/// Interval between two progress polls
pub const MILLIS_BETWEEN_UPDATES: u64 = 500;

/// Number of progress steps an extraction goes through
pub const DETECTION_STEPS: u32 = 4;

/// The maximum amount of people you can cook for
pub const MAX_PEOPLE: u32 = 80;

/// Stop polling progress after this many milliseconds
pub const MAX_WAIT_TIME: u64 = 15000;

/// Servings used when the recipe does not state them
pub const DEFAULT_SERVINGS_AMOUNT: u32 = 4;

const MAX_PERCENTAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingState {
    #[default]
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

/// Servings the recipe was written for and the servings the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServingsState {
    pub original: u32,
    pub current: u32,
}

impl ServingsState {
    pub fn new(original: u32) -> Self {
        let original = original.max(1);
        ServingsState {
            original,
            current: original.min(MAX_PEOPLE),
        }
    }

    /// Returns false when already at [`MAX_PEOPLE`]
    pub fn increment(&mut self) -> bool {
        if self.current >= MAX_PEOPLE {
            return false;
        }
        self.current += 1;
        true
    }

    /// Returns false when already at one person
    pub fn decrement(&mut self) -> bool {
        if self.current <= 1 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn servings(&self) -> Servings {
        Servings::new(self.original, self.current)
    }
}

/// State pushed to the presentation layer
#[derive(Debug)]
pub struct RecipeObservables {
    pub processing_state: Observable<ProcessingState>,
    /// Extraction progress in `[0, 100]`
    pub progress_percent: Observable<u32>,
    /// Zero until a recipe is committed
    pub current_servings: Observable<u32>,
    /// Recipe in the active language
    pub recipe: Observable<Option<Arc<Recipe>>>,
    pub processing_failed: Observable<bool>,
    pub failure_message: Observable<Option<String>>,
    pub default_servings_applied: Observable<bool>,
}

impl Default for RecipeObservables {
    fn default() -> Self {
        RecipeObservables {
            processing_state: Observable::new(ProcessingState::NotStarted),
            progress_percent: Observable::new(0),
            current_servings: Observable::new(0),
            recipe: Observable::new(None),
            processing_failed: Observable::new(false),
            failure_message: Observable::new(None),
            default_servings_applied: Observable::new(false),
        }
    }
}

#[derive(Debug, Default)]
struct OrchestratorState {
    processing: ProcessingState,
    progress_step: u32,
    /// Identifies the running extraction attempt
    attempt: u64,
    /// Identifies the committed recipe
    generation: u64,
    servings: Option<ServingsState>,
    cache: Option<TranslationCache>,
}

pub(crate) struct Shared {
    state: Mutex<OrchestratorState>,
    observables: RecipeObservables,
    extractor: Arc<dyn RecipeExtractor>,
    translator: Arc<dyn Translator>,
    preferences: Arc<dyn Preferences>,
    languages: LanguageConfig,
    runtime: Handle,
}

/// Cheap to clone handle to one recipe's state machine
#[derive(Clone)]
pub struct RecipeOrchestrator {
    shared: Arc<Shared>,
}

impl RecipeOrchestrator {
    pub(crate) fn new(
        extractor: Arc<dyn RecipeExtractor>,
        translator: Arc<dyn Translator>,
        preferences: Arc<dyn Preferences>,
        languages: LanguageConfig,
        runtime: Handle,
    ) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(OrchestratorState::default()),
            observables: RecipeObservables::default(),
            extractor,
            translator,
            preferences,
            languages,
            runtime,
        });

        let weak = Arc::downgrade(&shared);
        shared.preferences.observe(
            TRANSLATE_PREFERENCE_KEY,
            Arc::new(move |to_target: bool| {
                if let Some(shared) = weak.upgrade() {
                    RecipeOrchestrator { shared }.translate(to_target);
                }
            }),
        );

        RecipeOrchestrator { shared }
    }

    pub fn observables(&self) -> &RecipeObservables {
        &self.shared.observables
    }

    pub fn processing_state(&self) -> ProcessingState {
        self.shared.lock().processing
    }

    pub fn progress_percent(&self) -> u32 {
        progress_percent(self.shared.lock().progress_step)
    }

    pub fn is_being_processed(&self) -> bool {
        self.processing_state() == ProcessingState::Running
    }

    pub fn servings(&self) -> Option<ServingsState> {
        self.shared.lock().servings
    }

    /// Recipe in the active language
    pub fn recipe(&self) -> Option<Arc<Recipe>> {
        self.shared
            .lock()
            .cache
            .as_ref()
            .map(|cache| cache.active_recipe().clone())
    }

    /// The untranslated recipe
    pub fn source_recipe(&self) -> Option<Arc<Recipe>> {
        self.shared
            .lock()
            .cache
            .as_ref()
            .map(|cache| cache.source().clone())
    }

    pub fn active_language(&self) -> Language {
        self.shared
            .lock()
            .cache
            .as_ref()
            .map(TranslationCache::active_language)
            .unwrap_or_default()
    }

    /// Whether a translation request is still waiting for the translator
    pub fn is_translating(&self) -> bool {
        self.shared
            .lock()
            .cache
            .as_ref()
            .is_some_and(TranslationCache::is_in_flight)
    }

    /// Start extracting a recipe from `source`.
    ///
    /// Does nothing once a recipe is committed or while an attempt is running.
    pub fn initialize(&self, source: RecipeSource) {
        let attempt = {
            let mut state = self.shared.lock();
            match state.processing {
                ProcessingState::Succeeded => {
                    debug!("Recipe already initialised, ignoring initialize");
                    return;
                }
                ProcessingState::Running => {
                    debug!("Extraction already running, ignoring initialize");
                    return;
                }
                ProcessingState::NotStarted | ProcessingState::Failed => {}
            }

            state.attempt += 1;
            state.processing = ProcessingState::Running;
            state.progress_step = 0;
            let observables = &self.shared.observables;
            observables.processing_failed.set_if_changed(false);
            observables.progress_percent.set(0);
            observables
                .processing_state
                .set(ProcessingState::Running);
            state.attempt
        };

        info!(
            "Starting extraction attempt {} with {}",
            attempt,
            self.shared.extractor.extractor_name()
        );
        let text = source.into_extracted_text();

        let shared = self.shared.clone();
        self.shared
            .runtime
            .spawn(poll_progress(shared, attempt));

        let shared = self.shared.clone();
        self.shared.runtime.spawn(async move {
            let result = shared.extractor.extract(&text).await;
            shared.finish_extraction(attempt, result);
        });
    }

    /// Commit an already structured recipe, bypassing extraction
    pub fn commit_recipe(&self, recipe: Recipe) {
        {
            let mut state = self.shared.lock();
            self.shared.commit(&mut state, recipe);
        }
        self.translate_if_preferred();
    }

    /// Show the recipe in the target language (`true`) or the source language.
    pub fn translate(&self, to_target: bool) {
        let language = Language::from_target_flag(to_target);
        let mut state = self.shared.lock();
        let generation = state.generation;
        let Some(cache) = state.cache.as_mut() else {
            debug!("No recipe committed yet, ignoring language switch");
            return;
        };

        match cache.request(language) {
            TranslationAction::Unchanged => {}
            TranslationAction::Publish(recipe) => {
                debug!("Switching to {:?} recipe", language);
                self.shared.observables.recipe.set(Some(recipe));
            }
            TranslationAction::Request => {
                let source = cache.source().clone();
                let sentences = collect_sentences(&source);
                if sentences.is_empty() {
                    debug!("Nothing to translate, reusing source recipe");
                    if let Some(shown) = cache.complete(source.as_ref().clone()) {
                        self.shared.observables.recipe.set(Some(shown));
                    }
                    return;
                }
                drop(state);

                info!(
                    "Requesting translation of {} sentences from {} to {} with {}",
                    sentences.len(),
                    self.shared.languages.source,
                    self.shared.languages.target,
                    self.shared.translator.translator_name()
                );
                let shared = self.shared.clone();
                self.shared.runtime.spawn(async move {
                    let result = shared
                        .translator
                        .translate_batch(
                            &sentences,
                            &shared.languages.source,
                            &shared.languages.target,
                        )
                        .await;
                    shared.finish_translation(generation, &source, result);
                });
            }
        }
    }

    /// Cook for one more person, up to [`MAX_PEOPLE`]
    pub fn increment_servings(&self) {
        self.update_servings(ServingsState::increment);
    }

    /// Cook for one person less, down to one
    pub fn decrement_servings(&self) {
        self.update_servings(ServingsState::decrement);
    }

    fn update_servings(&self, update: fn(&mut ServingsState) -> bool) {
        let mut state = self.shared.lock();
        let Some(servings) = state.servings.as_mut() else {
            return;
        };
        if update(servings) {
            self.shared.observables.current_servings.set(servings.current);
        }
    }

    fn translate_if_preferred(&self) {
        if self.shared.preferences.get(TRANSLATE_PREFERENCE_KEY) {
            self.translate(true);
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, state: &mut OrchestratorState, mut recipe: Recipe) {
        let default_applied = recipe.servings().is_none();
        if default_applied {
            info!(
                "No servings found, defaulting to {}",
                DEFAULT_SERVINGS_AMOUNT
            );
            recipe.number_of_people = Some(DEFAULT_SERVINGS_AMOUNT);
        }
        let servings = ServingsState::new(recipe.servings().unwrap_or(DEFAULT_SERVINGS_AMOUNT));
        let recipe = Arc::new(recipe);

        state.generation += 1;
        state.servings = Some(servings);
        state.cache = Some(TranslationCache::new(recipe.clone()));
        state.processing = ProcessingState::Succeeded;
        state.progress_step = DETECTION_STEPS;

        let observables = &self.observables;
        observables.current_servings.set(servings.current);
        observables.recipe.set(Some(recipe));
        if default_applied {
            observables.default_servings_applied.set(true);
        } else {
            observables.default_servings_applied.set_if_changed(false);
        }
        observables.progress_percent.set(MAX_PERCENTAGE);
        observables
            .processing_state
            .set(ProcessingState::Succeeded);
        info!(
            "Recipe committed for {} servings (generation {})",
            servings.original, state.generation
        );
    }

    /// Store the newest progress of `attempt`. Returns whether polling should go on.
    fn record_progress(&self, attempt: u64, step: u32) -> bool {
        let mut state = self.lock();
        if state.attempt != attempt || state.processing != ProcessingState::Running {
            return false;
        }
        if step > state.progress_step {
            state.progress_step = step;
            self.observables
                .progress_percent
                .set(progress_percent(step));
        }
        state.progress_step < DETECTION_STEPS
    }

    fn finish_extraction(self: &Arc<Self>, attempt: u64, result: Result<Recipe, CookscaleError>) {
        {
            let mut state = self.lock();
            if state.attempt != attempt || state.processing != ProcessingState::Running {
                warn!("Discarding result of stale extraction attempt {}", attempt);
                return;
            }

            match result {
                Ok(recipe) => self.commit(&mut state, recipe),
                Err(e) => {
                    error!("Extraction attempt {} failed: {}", attempt, e);
                    state.processing = ProcessingState::Failed;
                    self.observables.failure_message.set(Some(e.to_string()));
                    self.observables.processing_failed.set(true);
                    self.observables
                        .processing_state
                        .set(ProcessingState::Failed);
                    return;
                }
            }
        }
        RecipeOrchestrator {
            shared: self.clone(),
        }
        .translate_if_preferred();
    }

    fn finish_translation(
        &self,
        generation: u64,
        source: &Recipe,
        result: Result<Vec<String>, CookscaleError>,
    ) {
        let mut state = self.lock();
        if state.generation != generation {
            warn!("Discarding translation of a replaced recipe");
            return;
        }
        let Some(cache) = state.cache.as_mut() else {
            return;
        };

        let translated = result.and_then(|sentences| {
            if sentences.is_empty() {
                return Err(CookscaleError::Translation(
                    "translator returned no sentences".to_string(),
                ));
            }
            apply_translation(source, &sentences)
        });

        match translated {
            Ok(recipe) => {
                info!("Translation to {} finished", self.languages.target);
                if let Some(shown) = cache.complete(recipe) {
                    self.observables.recipe.set(Some(shown));
                }
            }
            Err(e) => {
                warn!("Translation to {} failed: {}", self.languages.target, e);
                cache.fail();
                self.observables.failure_message.set(Some(e.to_string()));
            }
        }
    }
}

fn progress_percent(step: u32) -> u32 {
    step.min(DETECTION_STEPS) * MAX_PERCENTAGE / DETECTION_STEPS
}

/// Republish the extractor's progress until it completes, the attempt ends,
/// or [`MAX_WAIT_TIME`] has passed.
async fn poll_progress(shared: Arc<Shared>, attempt: u64) {
    let started = Instant::now();
    let max_wait = Duration::from_millis(MAX_WAIT_TIME);

    loop {
        sleep(Duration::from_millis(MILLIS_BETWEEN_UPDATES)).await;

        let step = shared.extractor.progress().min(DETECTION_STEPS);
        if !shared.record_progress(attempt, step) {
            break;
        }
        if started.elapsed() >= max_wait {
            debug!("Progress of attempt {} not complete after {:?}", attempt, max_wait);
            break;
        }
    }
    debug!("Stopped polling progress of attempt {}", attempt);
}
