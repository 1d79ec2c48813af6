//! The flat settings bag persisted per store

use crate::contract::keys;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat mapping from settings key to value
///
/// Values are strings, numbers, `null`, or arrays (possibly JSON-encoded in a
/// string). A `null` template-scoped value means "use the template default",
/// which is different from an empty string ("explicitly blank").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsBag(Map<String, Value>);

/// One key whose value differs between two bags
#[derive(Debug, Clone, PartialEq)]
pub struct SettingChange {
    pub key: String,
    pub old: Value,
    pub new: Value,
}

impl SettingsBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Parse(format!(
                "settings must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw template id stored in the bag, if any
    pub fn template(&self) -> Option<&str> {
        self.get_str(keys::TEMPLATE)
    }

    /// Settings ready for a renderer
    ///
    /// Null-valued template-scoped keys are omitted so the renderer's own
    /// fallback applies. Every other key passes through unchanged.
    pub fn effective(&self) -> SettingsBag {
        SettingsBag(
            self.0
                .iter()
                .filter(|(k, v)| !(v.is_null() && keys::is_template_scoped(k)))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Copy keys from `other` that this bag does not have
    pub fn fill_missing_from(&mut self, other: &SettingsBag) {
        for (k, v) in other.iter() {
            if !self.0.contains_key(k) {
                self.0.insert(k.clone(), v.clone());
            }
        }
    }

    /// Keys whose values differ, treating absent keys as `null`
    pub fn diff(&self, newer: &SettingsBag) -> Vec<SettingChange> {
        let mut changes = Vec::new();
        for (key, new) in newer.iter() {
            let old = self.0.get(key).cloned().unwrap_or(Value::Null);
            if old != *new {
                changes.push(SettingChange {
                    key: key.clone(),
                    old,
                    new: new.clone(),
                });
            }
        }
        for (key, old) in self.0.iter() {
            if !newer.contains_key(key) && !old.is_null() {
                changes.push(SettingChange {
                    key: key.clone(),
                    old: old.clone(),
                    new: Value::Null,
                });
            }
        }
        changes
    }
}

impl From<Map<String, Value>> for SettingsBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for SettingsBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_drops_only_null_template_keys() {
        let bag = SettingsBag::from_value(json!({
            "template": "bags",
            "store_name": null,
            "template_hero_heading": null,
            "template_hero_subtitle": "",
            "template_grid_columns": "4",
        }))
        .unwrap();

        let effective = bag.effective();
        assert!(!effective.contains_key("template_hero_heading"));
        assert_eq!(effective.get("template_hero_subtitle"), Some(&json!("")));
        assert_eq!(effective.get("store_name"), Some(&Value::Null));
        assert_eq!(effective.get("template_grid_columns"), Some(&json!("4")));
        assert_eq!(effective.len(), 4);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(matches!(
            SettingsBag::from_value(json!([1, 2])),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_diff_reports_changed_added_and_removed() {
        let old = SettingsBag::new()
            .with("template", "bags")
            .with("store_name", "Acme")
            .with("template_text_color", "#000000");
        let new = SettingsBag::new()
            .with("template", "wedding")
            .with("store_name", "Acme")
            .with("template_hero_heading", "Hi");

        let mut keys: Vec<_> = old.diff(&new).into_iter().map(|c| c.key).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["template", "template_hero_heading", "template_text_color"]
        );
    }

    #[test]
    fn test_fill_missing_keeps_existing() {
        let mut bag = SettingsBag::new().with("store_name", "Acme");
        let defaults = SettingsBag::new()
            .with("store_name", "Default")
            .with("currency", "USD");
        bag.fill_missing_from(&defaults);
        assert_eq!(bag.get_str("store_name"), Some("Acme"));
        assert_eq!(bag.get_str("currency"), Some("USD"));
    }
}
