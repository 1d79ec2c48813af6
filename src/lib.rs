//! # vitrine - Storefront Template Edit Protocol
//!
//! A framework-agnostic library for editing multi-template storefronts in
//! place: templates tag their regions with edit paths, the merchant clicks a
//! region in a live preview, and edits flow back into a per-store settings bag.
//!
//! ## Features
//!
//! - **Edit-path contract**: A fixed catalog of region ids and settings keys every ready template implements
//! - **Template registry**: Lenient template-id normalization, default fallback and readiness checks
//! - **Settings resolution**: Null means "template default"; numbers and lists are coerced once, on read
//! - **Settings engine**: Fetch, save, switch and reset with a single in-flight gate
//! - **Preview**: Inline desktop rendering or an isolated, style-mirrored device surface
//! - **Snapshots**: An in-process backend that remembers each template's last settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitrine::{EditorConfig, EditorSession, SnapshotServer, TemplateRegistry};
//!
//! # fn example() -> vitrine::Result<()> {
//! let registry = Arc::new(TemplateRegistry::builtin());
//! let server = SnapshotServer::in_memory(registry.clone());
//!
//! let config = EditorConfig::builder("acme").build();
//! let mut editor = EditorSession::open(config, &server)?;
//!
//! editor.select("layout.hero.title");
//! editor.update_setting("template_hero_heading", "Summer sale")?;
//! editor.save()?;
//!
//! editor.switch_template("wedding")?;
//! assert_eq!(editor.selected(), None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Null Means Default
//!
//! Template-scoped keys (`template_*`) stored as `null` are stripped before
//! rendering, so each template's own fallback applies. An empty string is an
//! explicit blank and is kept.
//!
//! ```rust
//! use serde_json::json;
//! use vitrine::{SettingsBag, StoreSettings};
//!
//! let bag = SettingsBag::new()
//!     .with("template_hero_heading", json!(null))
//!     .with("template_grid_columns", "4");
//! let settings = StoreSettings::resolve(&bag);
//!
//! assert_eq!(settings.hero_heading, None);
//! assert_eq!(settings.grid_columns.get(3), 4);
//! ```
//!
//! ## Writing a Template
//!
//! ```rust,no_run
//! use vitrine::{NodeTree, RenderProps, TemplateRenderer, Theme};
//! use vitrine::render::{FooterLayout, HeaderLayout, HeroLayout, Storefront};
//! use vitrine::TemplateId;
//! use vitrine::templates::Classic;
//!
//! struct Minimal;
//!
//! impl TemplateRenderer for Minimal {
//!     fn id(&self) -> TemplateId { TemplateId::Classic }
//!     fn display_name(&self) -> &'static str { "Minimal" }
//!     fn theme(&self) -> &'static Theme { Classic.theme() }
//!     fn render(&self, props: &RenderProps<'_>) -> NodeTree {
//!         let mut page = Storefront::begin(self.id(), self.theme(), props);
//!         let root = page.root();
//!         page.header(root, HeaderLayout::Inline);
//!         page.hero(root, HeroLayout::Banner);
//!         page.products(root);
//!         page.description(root);
//!         page.footer(root, FooterLayout::Full);
//!         page.finish()
//!     }
//! }
//! ```

// Core modules
mod docs;
mod error;
mod events;
mod sync;

pub mod backend;
pub mod config;
pub mod contract;
pub mod editor;
pub mod region;
pub mod registry;
pub mod render;
pub mod selection;
pub mod settings;
pub mod storage;
pub mod surface;
pub mod templates;
pub mod transport;
pub mod tree;
pub mod viewport;

// Re-exports from core
pub use docs::{DocsConfig, generate_docs, generate_docs_from_metadata, generate_edit_path_catalog};
pub use error::{Error, Result};
pub use events::EventManager;

// Re-exports from config
pub use config::{
    EditorConfig, EditorConfigBuilder, SettingMetadata, SettingOption, SettingScope, SettingType,
    SettingsSchema, opt, store_schema,
};

// Settings
pub use settings::{
    IntSetting, MutationOutcome, SettingChange, SettingsBag, SettingsEngine, StoreSettings,
    resolve_int, resolve_list, resolve_string,
};

// Contract, registry and rendering
pub use contract::{CONTRACT, ContractReport, EditContract};
pub use registry::{PickerEntry, TemplateId, TemplateRegistry, TemplateRenderer, normalize};
pub use render::{Product, RenderProps, Theme, render_public_html};
pub use tree::{EDIT_PATH_ATTR, NodeAction, NodeId, NodeTree};

// Editor, selection and preview
pub use editor::EditorSession;
pub use selection::{CapturedClick, ClickOutcome};
pub use surface::{Document, PreviewDriver, PreviewMode};
pub use viewport::{Breakpoint, Device, DevicePreset, ViewportContext};

// Backend and transport
pub use backend::{SnapshotServer, StoreDocument};
pub use storage::{JsonStorage, StorageBackend};
#[cfg(feature = "toml")]
pub use storage::TomlStorage;
pub use transport::{ImageUploader, SettingsRequest, SettingsTransport, TransportResponse};
