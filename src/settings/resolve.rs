//! Typed resolution of a settings bag
//!
//! Raw values are coerced exactly once, here. Renderers consume
//! [`StoreSettings`] and only decide what the template falls back to.

use crate::config::{SettingMetadata, SettingsSchema, store_schema};
use crate::contract::keys;
use crate::settings::SettingsBag;
use serde_json::Value;
use std::collections::HashMap;

/// Parse a stored value as a number, fall back when that fails, then clamp
///
/// Non-numeric strings, missing keys and non-finite numbers all degrade to
/// `fallback`; parsed values are rounded and clamped to `[min, max]`.
///
/// ```rust
/// use serde_json::json;
/// use vitrine::resolve_int;
///
/// assert_eq!(resolve_int(Some(&json!("999")), 4, 2, 6), 6);
/// assert_eq!(resolve_int(Some(&json!("abc")), 4, 2, 6), 4);
/// assert_eq!(resolve_int(Some(&json!(-1)), 4, 2, 6), 2);
/// assert_eq!(resolve_int(None, 4, 2, 6), 4);
/// ```
pub fn resolve_int(value: Option<&Value>, fallback: i64, min: i64, max: i64) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|n| n.is_finite()) {
        Some(n) => (n.round() as i64).clamp(min, max),
        None => fallback,
    }
}

/// String value of a setting; numbers are stringified, anything else is absent
pub fn resolve_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// List of non-empty strings from an array or a JSON-encoded array string
pub fn resolve_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = match value? {
        Value::Array(items) => items.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// A numeric setting with its schema range, resolved against a template fallback
#[derive(Debug, Clone, PartialEq)]
pub struct IntSetting {
    raw: Option<Value>,
    min: i64,
    max: i64,
}

impl IntSetting {
    pub fn new(raw: Option<Value>, min: i64, max: i64) -> Self {
        Self { raw, min, max }
    }

    /// Effective integer for a template whose own default is `fallback`
    pub fn get(&self, fallback: i64) -> i64 {
        resolve_int(self.raw.as_ref(), fallback, self.min, self.max)
    }

    pub fn range(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    pub fn is_set(&self) -> bool {
        self.raw.is_some()
    }
}

/// Typed view of a store's effective settings
///
/// `None` means "use the template default"; `Some("")` means explicitly blank.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub template: Option<String>,

    pub store_name: Option<String>,
    pub logo_url: Option<String>,
    pub currency: String,

    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub accent_color: Option<String>,

    pub hero_heading: Option<String>,
    pub hero_subtitle: Option<String>,
    pub hero_image: Option<String>,
    pub button_text: Option<String>,

    pub description_text: Option<String>,
    pub description_color: Option<String>,
    pub description_size: IntSetting,
    pub description_weight: Option<String>,
    pub description_style: Option<String>,

    pub products_heading: Option<String>,
    pub footer_text: Option<String>,
    pub social_links: Option<Vec<String>>,

    pub grid_columns: IntSetting,
    pub spacing: IntSetting,
    pub corner_radius: IntSetting,
    pub animation_speed: IntSetting,
    pub hover_scale: IntSetting,
}

impl SettingsSchema for StoreSettings {
    fn get_metadata() -> HashMap<String, SettingMetadata> {
        store_schema()
    }
}

impl StoreSettings {
    /// Resolve a bag (stored or draft) into typed settings
    ///
    /// Null template-scoped keys are stripped first. Values that fail their
    /// schema entry (bad colors, unknown select options) resolve as unset so
    /// the template default applies instead of a broken value.
    pub fn resolve(bag: &SettingsBag) -> Self {
        let effective = bag.effective();
        let schema = Self::get_metadata();
        let resolver = Resolver {
            bag: &effective,
            schema: &schema,
        };

        Self {
            template: resolver.string(keys::TEMPLATE),
            store_name: resolver.string(keys::STORE_NAME),
            logo_url: resolver.string(keys::LOGO_URL).filter(|s| !s.is_empty()),
            currency: resolver
                .checked_string(keys::CURRENCY)
                .unwrap_or_else(|| "USD".to_string()),
            background_color: resolver.checked_string(keys::BACKGROUND_COLOR),
            text_color: resolver.checked_string(keys::TEXT_COLOR),
            accent_color: resolver.checked_string(keys::ACCENT_COLOR),
            hero_heading: resolver.string(keys::HERO_HEADING),
            hero_subtitle: resolver.string(keys::HERO_SUBTITLE),
            hero_image: resolver.string(keys::HERO_IMAGE),
            button_text: resolver.string(keys::BUTTON_TEXT),
            description_text: resolver.string(keys::DESCRIPTION_TEXT),
            description_color: resolver.checked_string(keys::DESCRIPTION_COLOR),
            description_size: resolver.int(keys::DESCRIPTION_SIZE),
            description_weight: resolver.checked_string(keys::DESCRIPTION_WEIGHT),
            description_style: resolver.checked_string(keys::DESCRIPTION_STYLE),
            products_heading: resolver.string(keys::PRODUCTS_HEADING),
            footer_text: resolver.string(keys::FOOTER_TEXT),
            social_links: resolve_list(effective.get(keys::SOCIAL_LINKS)),
            grid_columns: resolver.int(keys::GRID_COLUMNS),
            spacing: resolver.int(keys::SPACING),
            corner_radius: resolver.int(keys::CORNER_RADIUS),
            animation_speed: resolver.int(keys::ANIMATION_SPEED),
            hover_scale: resolver.int(keys::HOVER_SCALE),
        }
    }
}

struct Resolver<'a> {
    bag: &'a SettingsBag,
    schema: &'a HashMap<String, SettingMetadata>,
}

impl Resolver<'_> {
    fn string(&self, key: &str) -> Option<String> {
        resolve_string(self.bag.get(key))
    }

    fn checked_string(&self, key: &str) -> Option<String> {
        let value = self.bag.get(key)?;
        match self.schema.get(key) {
            Some(meta) if meta.validate(value).is_err() => {
                log::debug!("Ignoring invalid value for {key}: {value}");
                None
            }
            _ => resolve_string(Some(value)),
        }
    }

    fn int(&self, key: &str) -> IntSetting {
        let (min, max) = self
            .schema
            .get(key)
            .and_then(SettingMetadata::int_range)
            .unwrap_or((i64::MIN, i64::MAX));
        IntSetting::new(self.bag.get(key).cloned(), min, max)
    }
}
