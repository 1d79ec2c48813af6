//! Settings schema and metadata types
//!
//! Every key of a store's settings bag is described once here: its type, its
//! default, its valid range and whether it is template-scoped. The settings
//! engine validates writes against this schema, and typed resolution reads the
//! numeric ranges from it, so no renderer has to coerce raw values itself.
//!
//! ```rust
//! use vitrine::{SettingMetadata, opt};
//!
//! let columns = SettingMetadata::number(4.0)
//!     .min(1.0)
//!     .max(6.0)
//!     .template_scoped()
//!     .meta_str("label", "Grid columns");
//!
//! assert!(columns.validate(&serde_json::json!(3)).is_ok());
//! assert!(columns.validate(&serde_json::json!("3")).is_ok());
//! assert!(columns.validate(&serde_json::json!(9)).is_err());
//!
//! let style = SettingMetadata::select("normal", vec![
//!     opt("normal", "Normal"),
//!     opt("italic", "Italic"),
//! ]);
//! assert!(style.validate_schema().is_ok());
//! ```

use crate::contract::keys;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Regex every color setting must match
pub const HEX_COLOR_PATTERN: &str = r"^#[0-9a-fA-F]{6}$";

// =============================================================================
// Setting Types
// =============================================================================

/// Type of setting, as shown in the editor side panel
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Free text (empty string means "explicitly blank")
    #[default]
    Text,
    /// `#rrggbb` color
    Color,
    /// Integer-valued number, stored as a number or numeric string
    Number,
    /// One of a fixed set of options
    Select,
    /// JSON array, or a string holding a JSON-encoded array
    List,
}

/// Who owns a setting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingScope {
    /// Store identity, shared by every template
    #[default]
    Store,
    /// Appearance owned by the active template; `null` means template default
    Template,
}

// =============================================================================
// Type-Specific Constraints
// =============================================================================

/// Constraints for Number type settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NumberConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Constraints for Text and Color type settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TextConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Type-specific constraints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SettingConstraints {
    /// Options for Select type (required for Select)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SettingOption>>,

    #[serde(flatten)]
    pub number: NumberConstraints,

    #[serde(flatten)]
    pub text: TextConstraints,
}

// =============================================================================
// Setting Metadata
// =============================================================================

/// Metadata for a single settings key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingMetadata {
    #[serde(rename = "type")]
    pub setting_type: SettingType,

    pub scope: SettingScope,

    /// Schema-level default. Template-scoped keys default to `null` so the
    /// template's own fallback applies.
    pub default: Value,

    #[serde(flatten)]
    pub constraints: SettingConstraints,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Default for SettingMetadata {
    fn default() -> Self {
        Self {
            setting_type: SettingType::Text,
            scope: SettingScope::Store,
            default: Value::Null,
            constraints: SettingConstraints::default(),
            metadata: HashMap::new(),
        }
    }
}

impl SettingMetadata {
    pub fn text(default: impl Into<String>) -> Self {
        Self {
            setting_type: SettingType::Text,
            default: Value::String(default.into()),
            ..Default::default()
        }
    }

    /// Create a color setting, validated against [`HEX_COLOR_PATTERN`]
    pub fn color(default: impl Into<String>) -> Self {
        Self {
            setting_type: SettingType::Color,
            default: Value::String(default.into()),
            constraints: SettingConstraints {
                text: TextConstraints {
                    pattern: Some(HEX_COLOR_PATTERN.to_string()),
                    max_length: None,
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn number(default: impl Into<f64>) -> Self {
        Self {
            setting_type: SettingType::Number,
            default: json!(default.into()),
            ..Default::default()
        }
    }

    /// Create a select setting. Options are required at construction.
    pub fn select(default: impl Into<String>, options: Vec<SettingOption>) -> Self {
        Self {
            setting_type: SettingType::Select,
            default: Value::String(default.into()),
            constraints: SettingConstraints {
                options: Some(options),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn list() -> Self {
        Self {
            setting_type: SettingType::List,
            default: json!([]),
            ..Default::default()
        }
    }

    /// Mark as template-scoped. The schema default becomes `null`, deferring
    /// to the template's fallback.
    #[must_use]
    pub fn template_scoped(mut self) -> Self {
        self.scope = SettingScope::Template;
        self.default = Value::Null;
        self
    }

    #[must_use]
    pub fn meta_str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata
            .insert(key.to_string(), Value::String(value.into()));
        self
    }

    pub fn get_meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    #[must_use]
    pub fn min(mut self, val: f64) -> Self {
        self.constraints.number.min = Some(val);
        self
    }

    #[must_use]
    pub fn max(mut self, val: f64) -> Self {
        self.constraints.number.max = Some(val);
        self
    }

    #[must_use]
    pub fn step(mut self, val: f64) -> Self {
        self.constraints.number.step = Some(val);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.text.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        self.constraints.text.max_length = Some(len);
        self
    }

    pub fn is_template_scoped(&self) -> bool {
        self.scope == SettingScope::Template
    }

    /// Integer range for the clamped resolver, if the setting has one
    pub fn int_range(&self) -> Option<(i64, i64)> {
        let n = &self.constraints.number;
        match (n.min, n.max) {
            (Some(min), Some(max)) => Some((min as i64, max as i64)),
            _ => None,
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a value about to be written under this key
    ///
    /// `null` is accepted for template-scoped keys (it means "use the
    /// template default"). Numbers may arrive as numeric strings.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return if self.is_template_scoped() {
                Ok(())
            } else {
                Err("Value cannot be null".to_string())
            };
        }

        match self.setting_type {
            SettingType::Text | SettingType::Color => {
                let text = value
                    .as_str()
                    .ok_or_else(|| "Value must be a string".to_string())?;
                if let Some(max) = self.constraints.text.max_length {
                    if text.chars().count() > max {
                        return Err(format!("Value must be at most {max} characters"));
                    }
                }
                if let Some(ref pattern) = self.constraints.text.pattern {
                    let re = regex::Regex::new(pattern)
                        .map_err(|e| format!("Invalid regex pattern: {e}"))?;
                    if !re.is_match(text) {
                        return Err(format!("Value does not match pattern: {pattern}"));
                    }
                }
            }
            SettingType::Number => {
                let num = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .filter(|n| n.is_finite())
                .ok_or_else(|| "Value must be a number".to_string())?;

                if let Some(min) = self.constraints.number.min {
                    if num < min {
                        return Err(format!("Value must be at least {min}"));
                    }
                }
                if let Some(max) = self.constraints.number.max {
                    if num > max {
                        return Err(format!("Value must be at most {max}"));
                    }
                }
            }
            SettingType::Select => {
                if let Some(ref options) = self.constraints.options {
                    if !options.iter().any(|opt| opt.value == *value) {
                        return Err("Value must be one of the available options".to_string());
                    }
                }
            }
            SettingType::List => {
                let is_list = match value {
                    Value::Array(_) => true,
                    Value::String(s) => matches!(
                        serde_json::from_str::<Value>(s),
                        Ok(Value::Array(_))
                    ),
                    _ => false,
                };
                if !is_list {
                    return Err("Value must be an array".to_string());
                }
            }
        }
        Ok(())
    }

    /// Validate the schema entry itself
    pub fn validate_schema(&self) -> Result<(), String> {
        if self.setting_type == SettingType::Select && self.constraints.options.is_none() {
            return Err("Select type must have options defined".to_string());
        }

        if let (Some(min), Some(max)) = (self.constraints.number.min, self.constraints.number.max) {
            if min > max {
                return Err(format!("min ({min}) cannot be greater than max ({max})"));
            }
        }

        if let Some(step) = self.constraints.number.step {
            if step <= 0.0 {
                return Err(format!("step must be positive, got {step}"));
            }
        }

        if let Some(ref pattern) = self.constraints.text.pattern {
            if pattern.is_empty() {
                return Err("Pattern cannot be empty string".to_string());
            }
            regex::Regex::new(pattern).map_err(|e| format!("Invalid regex pattern: {e}"))?;
        }

        self.validate(&self.default)
            .map_err(|e| format!("Default value is invalid: {e}"))
    }
}

// =============================================================================
// Setting Option
// =============================================================================

/// Option for Select type settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingOption {
    pub value: Value,
    pub label: String,
}

impl SettingOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Value::String(value.into()),
            label: label.into(),
        }
    }
}

/// Shorthand for creating a `SettingOption`
pub fn opt(value: impl Into<String>, label: impl Into<String>) -> SettingOption {
    SettingOption::new(value, label)
}

// =============================================================================
// Settings Schema Trait
// =============================================================================

/// Types that describe a settings bag
pub trait SettingsSchema {
    /// Metadata for every key, by key
    fn get_metadata() -> HashMap<String, SettingMetadata>;

    /// Groups in display order
    #[must_use]
    fn get_groups() -> Vec<String> {
        let mut groups: Vec<String> = Self::get_metadata()
            .values()
            .filter_map(|m| m.get_meta_str("group").map(String::from))
            .collect();
        groups.sort();
        groups.dedup();
        groups
    }
}

/// Macro for building settings metadata `HashMap` more cleanly
#[macro_export]
macro_rules! settings {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), $value);
        )*
        map
    }};
}

/// Schema for a store's settings bag
pub fn store_schema() -> HashMap<String, SettingMetadata> {
    let weights = vec![
        opt("300", "Light"),
        opt("400", "Regular"),
        opt("500", "Medium"),
        opt("600", "Semibold"),
        opt("700", "Bold"),
    ];
    let styles = vec![opt("normal", "Normal"), opt("italic", "Italic")];

    settings! {
        keys::TEMPLATE => SettingMetadata::text("classic")
            .meta_str("group", "identity")
            .meta_str("label", "Template"),

        keys::STORE_NAME => SettingMetadata::text("")
            .max_length(80)
            .meta_str("group", "identity")
            .meta_str("label", "Store name"),
        keys::LOGO_URL => SettingMetadata::text("")
            .meta_str("group", "identity")
            .meta_str("label", "Logo"),
        keys::CURRENCY => SettingMetadata::text("USD")
            .pattern(r"^[A-Z]{3}$")
            .meta_str("group", "identity")
            .meta_str("label", "Currency"),

        keys::BACKGROUND_COLOR => SettingMetadata::color("#ffffff")
            .template_scoped()
            .meta_str("group", "colors")
            .meta_str("label", "Background"),
        keys::TEXT_COLOR => SettingMetadata::color("#111111")
            .template_scoped()
            .meta_str("group", "colors")
            .meta_str("label", "Text"),
        keys::ACCENT_COLOR => SettingMetadata::color("#000000")
            .template_scoped()
            .meta_str("group", "colors")
            .meta_str("label", "Accent"),

        keys::HERO_HEADING => SettingMetadata::text("")
            .max_length(120)
            .template_scoped()
            .meta_str("group", "hero")
            .meta_str("label", "Headline"),
        keys::HERO_SUBTITLE => SettingMetadata::text("")
            .max_length(240)
            .template_scoped()
            .meta_str("group", "hero")
            .meta_str("label", "Subtitle"),
        keys::HERO_IMAGE => SettingMetadata::text("")
            .template_scoped()
            .meta_str("group", "hero")
            .meta_str("label", "Hero image"),
        keys::BUTTON_TEXT => SettingMetadata::text("")
            .max_length(40)
            .template_scoped()
            .meta_str("group", "hero")
            .meta_str("label", "Button text"),

        keys::DESCRIPTION_TEXT => SettingMetadata::text("")
            .max_length(2000)
            .template_scoped()
            .meta_str("group", "description")
            .meta_str("label", "Description"),
        keys::DESCRIPTION_COLOR => SettingMetadata::color("#333333")
            .template_scoped()
            .meta_str("group", "description")
            .meta_str("label", "Description color"),
        keys::DESCRIPTION_SIZE => SettingMetadata::number(16.0)
            .min(10.0).max(48.0).step(1.0)
            .template_scoped()
            .meta_str("group", "description")
            .meta_str("label", "Description size"),
        keys::DESCRIPTION_WEIGHT => SettingMetadata::select("400", weights)
            .template_scoped()
            .meta_str("group", "description")
            .meta_str("label", "Description weight"),
        keys::DESCRIPTION_STYLE => SettingMetadata::select("normal", styles)
            .template_scoped()
            .meta_str("group", "description")
            .meta_str("label", "Description style"),

        keys::PRODUCTS_HEADING => SettingMetadata::text("")
            .max_length(120)
            .template_scoped()
            .meta_str("group", "products")
            .meta_str("label", "Products heading"),
        keys::GRID_COLUMNS => SettingMetadata::number(4.0)
            .min(1.0).max(6.0).step(1.0)
            .template_scoped()
            .meta_str("group", "products")
            .meta_str("label", "Grid columns"),
        keys::SPACING => SettingMetadata::number(16.0)
            .min(0.0).max(64.0).step(2.0)
            .template_scoped()
            .meta_str("group", "layout")
            .meta_str("label", "Spacing"),
        keys::CORNER_RADIUS => SettingMetadata::number(8.0)
            .min(0.0).max(32.0).step(1.0)
            .template_scoped()
            .meta_str("group", "layout")
            .meta_str("label", "Corner radius"),
        keys::ANIMATION_SPEED => SettingMetadata::number(300.0)
            .min(0.0).max(2000.0).step(50.0)
            .template_scoped()
            .meta_str("group", "layout")
            .meta_str("label", "Animation speed (ms)"),
        keys::HOVER_SCALE => SettingMetadata::number(105.0)
            .min(100.0).max(130.0).step(1.0)
            .template_scoped()
            .meta_str("group", "layout")
            .meta_str("label", "Hover scale (%)"),

        keys::FOOTER_TEXT => SettingMetadata::text("")
            .max_length(240)
            .template_scoped()
            .meta_str("group", "footer")
            .meta_str("label", "Footer text"),
        keys::SOCIAL_LINKS => SettingMetadata::list()
            .template_scoped()
            .meta_str("group", "footer")
            .meta_str("label", "Social links"),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CONTRACT;

    #[test]
    fn test_schema_covers_contract_keys_exactly() {
        let schema = store_schema();
        for key in CONTRACT.setting_keys {
            assert!(schema.contains_key(*key), "schema lacks {key}");
        }
        assert_eq!(schema.len(), CONTRACT.setting_keys.len());
    }

    #[test]
    fn test_every_schema_entry_is_valid() {
        for (key, meta) in store_schema() {
            assert!(meta.validate_schema().is_ok(), "{key}: {:?}", meta.validate_schema());
        }
    }

    #[test]
    fn test_scope_follows_key_prefix() {
        for (key, meta) in store_schema() {
            assert_eq!(meta.is_template_scoped(), keys::is_template_scoped(&key), "{key}");
        }
    }

    #[test]
    fn test_null_only_for_template_scoped() {
        let scoped = SettingMetadata::text("").template_scoped();
        let identity = SettingMetadata::text("");
        assert!(scoped.validate(&Value::Null).is_ok());
        assert!(identity.validate(&Value::Null).is_err());
    }

    #[test]
    fn test_color_validation() {
        let color = SettingMetadata::color("#ffffff");
        assert!(color.validate(&json!("#A1b2C3")).is_ok());
        assert!(color.validate(&json!("red")).is_err());
        assert!(color.validate(&json!("#fff")).is_err());
        assert!(color.validate(&json!(12)).is_err());
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let n = SettingMetadata::number(4.0).min(1.0).max(6.0);
        assert!(n.validate(&json!("4")).is_ok());
        assert!(n.validate(&json!(" 5 ")).is_ok());
        assert!(n.validate(&json!("abc")).is_err());
        assert!(n.validate(&json!("12")).is_err());
        assert!(n.validate(&json!(0)).is_err());
    }

    #[test]
    fn test_list_accepts_encoded_array() {
        let list = SettingMetadata::list();
        assert!(list.validate(&json!(["https://a"])).is_ok());
        assert!(list.validate(&json!("[\"https://a\"]")).is_ok());
        assert!(list.validate(&json!("https://a")).is_err());
    }

    #[test]
    fn test_int_range() {
        let n = SettingMetadata::number(4.0).min(2.0).max(6.0);
        assert_eq!(n.int_range(), Some((2, 6)));
        assert_eq!(SettingMetadata::text("").int_range(), None);
    }

    #[test]
    fn test_schema_validation_rejects_bad_range() {
        let invalid = SettingMetadata::number(5.0).min(10.0).max(0.0);
        assert!(invalid.validate_schema().is_err());

        let mut invalid_select = SettingMetadata::text("x");
        invalid_select.setting_type = SettingType::Select;
        assert!(invalid_select.validate_schema().is_err());
    }

    #[test]
    fn test_metadata_serializes_with_type_tag() {
        let meta = SettingMetadata::number(4.0).min(1.0).max(6.0).template_scoped();
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["scope"], "template");
        assert_eq!(json["min"], 1.0);
        assert!(json["default"].is_null());
    }
}
