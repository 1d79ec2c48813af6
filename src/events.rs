//! Editor event listeners
//!
//! Settings changes, selection changes and cache invalidation are broadcast
//! to registered callbacks. Validators registered per key are consulted
//! before a bag is sent to the backend.

use crate::sync::RwLockExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Called with (`key`, `old_value`, `new_value`)
pub type ChangeCallback = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;

/// Called with the new selection (`None` when cleared)
pub type SelectionCallback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Called when cached settings held elsewhere must be dropped
pub type InvalidateCallback = Arc<dyn Fn() + Send + Sync>;

/// Rejects a value with a message
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Registry of editor listeners
#[derive(Default)]
pub struct EventManager {
    global_listeners: RwLock<Vec<ChangeCallback>>,
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,
    selection_listeners: RwLock<Vec<SelectionCallback>>,
    invalidate_listeners: RwLock<Vec<InvalidateCallback>>,
    validators: RwLock<HashMap<String, Vec<Validator>>>,
}

impl EventManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every settings change
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.global_listeners.write_recovered().push(Arc::new(callback));
    }

    /// Register a listener for one settings key
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a listener for selection changes
    pub fn on_selection<F>(&self, callback: F)
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.selection_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener fired after a template switch replaced the settings
    pub fn on_invalidate<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.invalidate_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a validator for a settings key
    pub fn add_validator<F>(&self, key: &str, validator: F)
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    /// Run the validators for `key`, returning the first error
    pub fn validate(&self, key: &str, value: &Value) -> Result<(), String> {
        let guard = self.validators.read_recovered();
        if let Some(validators) = guard.get(key) {
            for validator in validators {
                validator(value)?;
            }
        }
        Ok(())
    }

    pub fn notify(&self, key: &str, old_value: &Value, new_value: &Value) {
        // Snapshot the callbacks so a listener can register another one
        let global: Vec<ChangeCallback> = self.global_listeners.read_recovered().clone();
        for callback in &global {
            callback(key, old_value, new_value);
        }

        let keyed: Vec<ChangeCallback> = self
            .key_listeners
            .read_recovered()
            .get(key)
            .cloned()
            .unwrap_or_default();
        for callback in &keyed {
            callback(key, old_value, new_value);
        }
    }

    pub fn notify_selection(&self, selected: Option<&str>) {
        let listeners: Vec<SelectionCallback> = self.selection_listeners.read_recovered().clone();
        for callback in &listeners {
            callback(selected);
        }
    }

    pub fn notify_invalidate(&self) {
        let listeners: Vec<InvalidateCallback> =
            self.invalidate_listeners.read_recovered().clone();
        for callback in &listeners {
            callback();
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write_recovered().remove(key);
    }

    /// Clear all listeners (validators are kept)
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
        self.selection_listeners.write_recovered().clear();
        self.invalidate_listeners.write_recovered().clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
