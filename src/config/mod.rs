//! Configuration types
//!
//! - `EditorConfig` - Configuration for an editor session
//! - `SettingMetadata` - Schema entry for one settings key (type, default, range, scope)
//! - `store_schema` - The schema of a store's settings bag

mod schema;
mod types;

pub use schema::{
    HEX_COLOR_PATTERN, NumberConstraints, SettingConstraints, SettingMetadata, SettingOption,
    SettingScope, SettingType, SettingsSchema, TextConstraints, opt, store_schema,
};

pub use types::{DEFAULT_PLACEHOLDER_IMAGE, EditorConfig, EditorConfigBuilder};
