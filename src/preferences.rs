use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

/// Key of the "show the recipe in the target language" toggle
pub const TRANSLATE_PREFERENCE_KEY: &str = "translate_to_target";

pub type PreferenceCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Boolean key-value settings that can be observed for changes
pub trait Preferences: Send + Sync {
    /// Current value, `false` when the key was never set
    fn get(&self, key: &str) -> bool;

    /// Register `callback` to run with the new value whenever `key` changes
    fn observe(&self, key: &str, callback: PreferenceCallback);
}

/// In-memory [`Preferences`] store
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, bool>>,
    observers: Mutex<HashMap<String, Vec<PreferenceCallback>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: bool) -> Self {
        let preferences = Self::new();
        lock(&preferences.values).insert(key.to_string(), value);
        preferences
    }

    /// Store `value` and notify observers when it changed.
    ///
    /// Callbacks run after the store's locks are released, so they may read
    /// or write preferences themselves.
    pub fn set(&self, key: &str, value: bool) {
        let previous = lock(&self.values).insert(key.to_string(), value);
        if previous == Some(value) {
            return;
        }

        let callbacks: Vec<PreferenceCallback> = lock(&self.observers)
            .get(key)
            .cloned()
            .unwrap_or_default();
        debug!(
            "Preference '{}' changed to {}, notifying {} observers",
            key,
            value,
            callbacks.len()
        );
        for callback in callbacks {
            callback(value);
        }
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> bool {
        lock(&self.values).get(key).copied().unwrap_or(false)
    }

    fn observe(&self, key: &str, callback: PreferenceCallback) {
        lock(&self.observers)
            .entry(key.to_string())
            .or_default()
            .push(callback);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
