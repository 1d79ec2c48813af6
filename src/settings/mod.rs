//! Store settings: the raw bag, its typed resolution and the mutation engine
//!
//! - [`SettingsBag`] - the flat key/value bag persisted per store
//! - [`StoreSettings`] - typed view consumed by renderers
//! - [`SettingsEngine`] - load, switch template, reset to defaults, save

mod bag;
mod engine;
mod resolve;

pub use bag::{SettingChange, SettingsBag};
pub use engine::{Mutation, MutationOutcome, PendingRequest, SettingsEngine};
pub use resolve::{IntSetting, StoreSettings, resolve_int, resolve_list, resolve_string};
