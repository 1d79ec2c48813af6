//! Template registry
//!
//! Maps free-form template identifiers to canonical ids and dispatches
//! rendering. Normalization is total: every string lands on a registered id.

use crate::contract::{CONTRACT, ContractReport};
use crate::render::{ContractFixture, RenderProps, Theme};
use crate::settings::SettingsBag;
use crate::templates;
use crate::tree::NodeTree;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Canonical template id
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Classic,
    Bags,
    Wedding,
    Gold,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Classic,
        TemplateId::Bags,
        TemplateId::Wedding,
        TemplateId::Gold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Bags => "bags",
            TemplateId::Wedding => "wedding",
            TemplateId::Gold => "gold",
        }
    }

    /// Resolve a free-form id or alias, `None` if nothing matches
    ///
    /// Lower-cases and trims, treats `_` and spaces as `-`, strips trailing
    /// `-template`/`-theme`/`-store` decorations and then a leading `gold-`
    /// marker. A bare `gold-` is the gold template itself.
    pub fn lookup(raw: &str) -> Option<TemplateId> {
        let mut id = raw.trim().to_lowercase().replace(['_', ' '], "-");

        for suffix in ["-template", "-theme", "-store"] {
            if let Some(rest) = id.strip_suffix(suffix) {
                if !rest.is_empty() {
                    id = rest.to_string();
                }
            }
        }
        if let Some(rest) = id.strip_prefix("gold-") {
            id = if rest.is_empty() { "gold" } else { rest }.to_string();
        }

        match id.as_str() {
            "classic" | "default" | "basic" => Some(TemplateId::Classic),
            "bags" | "bag" | "handbags" | "leather" => Some(TemplateId::Bags),
            "wedding" | "weddings" | "bridal" => Some(TemplateId::Wedding),
            "gold" | "jewelry" | "jewellery" | "jewels" => Some(TemplateId::Gold),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize against the built-in default template
pub fn normalize(raw: &str) -> TemplateId {
    TemplateId::lookup(raw).unwrap_or_default()
}

/// Templates shown in the picker by default
///
/// Each entry is checked against the edit contract by the conformance tests.
pub const READY_TEMPLATES: &[TemplateId] =
    &[TemplateId::Classic, TemplateId::Bags, TemplateId::Wedding];

/// A template: visual fallbacks plus a render function
pub trait TemplateRenderer: Send + Sync {
    fn id(&self) -> TemplateId;

    fn display_name(&self) -> &'static str;

    /// Built-in fallback values used when a setting is unset
    fn theme(&self) -> &'static Theme;

    /// Render the storefront for the given props
    fn render(&self, props: &RenderProps<'_>) -> NodeTree;
}

/// One picker card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerEntry {
    pub id: TemplateId,
    pub name: &'static str,
    pub ready: bool,
}

/// Canonical id to renderer, plus the ready allow-list
pub struct TemplateRegistry {
    renderers: HashMap<TemplateId, Arc<dyn TemplateRenderer>>,
    default: TemplateId,
    ready: Vec<TemplateId>,
}

impl TemplateRegistry {
    /// Registry with no renderers
    pub fn empty(default: TemplateId) -> Self {
        Self {
            renderers: HashMap::new(),
            default,
            ready: Vec::new(),
        }
    }

    /// Registry with every built-in template
    pub fn builtin() -> Self {
        let mut registry = Self::empty(TemplateId::default());
        registry.register(templates::Classic);
        registry.register(templates::Bags);
        registry.register(templates::Wedding);
        registry.register(templates::Gold);
        registry.ready = READY_TEMPLATES.to_vec();
        registry
    }

    /// Use a different fallback template; the id string goes through `lookup`
    #[must_use]
    pub fn with_default(mut self, raw: &str) -> Self {
        match TemplateId::lookup(raw) {
            Some(id) => self.default = id,
            None => warn!("Unknown default template '{raw}', keeping {}", self.default),
        }
        self
    }

    pub fn register<R: TemplateRenderer + 'static>(&mut self, renderer: R) {
        self.renderers.insert(renderer.id(), Arc::new(renderer));
    }

    pub fn mark_ready(&mut self, id: TemplateId) {
        if !self.ready.contains(&id) {
            self.ready.push(id);
        }
    }

    pub fn default_id(&self) -> TemplateId {
        self.default
    }

    /// Canonical id for any input string
    pub fn normalize(&self, raw: &str) -> TemplateId {
        TemplateId::lookup(raw).unwrap_or(self.default)
    }

    /// Renderer for `raw`, or the default renderer if none is registered
    pub fn renderer(&self, raw: &str) -> Option<Arc<dyn TemplateRenderer>> {
        let id = self.normalize(raw);
        if let Some(renderer) = self.renderers.get(&id) {
            return Some(renderer.clone());
        }
        debug!("No renderer for {id}, using {}", self.default);
        self.renderers.get(&self.default).cloned()
    }

    /// Render `raw` with `props`; never fails
    pub fn render(&self, raw: &str, props: &RenderProps<'_>) -> NodeTree {
        match self.renderer(raw) {
            Some(renderer) => renderer.render(props),
            None => {
                warn!("Registry has no renderers, rendering an empty storefront");
                NodeTree::new("main")
            }
        }
    }

    pub fn is_ready(&self, id: TemplateId) -> bool {
        self.ready.contains(&id)
    }

    pub fn ready(&self) -> &[TemplateId] {
        &self.ready
    }

    /// Registered ids in canonical order
    pub fn ids(&self) -> Vec<TemplateId> {
        TemplateId::ALL
            .into_iter()
            .filter(|id| self.renderers.contains_key(id))
            .collect()
    }

    /// Picker cards: ready templates, or every template when `show_all`
    pub fn picker_entries(&self, show_all: bool) -> Vec<PickerEntry> {
        self.ids()
            .into_iter()
            .filter_map(|id| {
                let renderer = self.renderers.get(&id)?;
                let ready = self.is_ready(id);
                (ready || show_all).then(|| PickerEntry {
                    id,
                    name: renderer.display_name(),
                    ready,
                })
            })
            .collect()
    }

    /// Render a template in manage mode against the contract fixture and
    /// report which required paths are missing
    pub fn check_contract(&self, id: TemplateId) -> ContractReport {
        let fixture = ContractFixture::new();
        let tree = self.render(id.as_str(), &fixture.props());
        CONTRACT.check(&tree)
    }

    /// The template's shipped defaults as a settings bag
    pub fn defaults_bag(&self, id: TemplateId) -> SettingsBag {
        match self.renderer(id.as_str()) {
            Some(renderer) => renderer.theme().defaults_bag(renderer.id()),
            None => SettingsBag::new().with(crate::contract::keys::TEMPLATE, id.as_str()),
        }
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
