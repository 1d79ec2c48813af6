//! In-process settings backend
//!
//! [`SnapshotServer`] answers the settings endpoint the way the hosted API
//! does: one active settings bag per store plus a snapshot per template the
//! store has visited. Documents can be kept in memory or persisted per store
//! through a [`StorageBackend`].
//!
//! When a write cannot be made durable the server still answers with a
//! success status, but flags the body with [`DEGRADED_MARKER`] and leaves its
//! state untouched.

use crate::config::EditorConfig;
use crate::contract::keys;
use crate::error::Result;
use crate::registry::{TemplateId, TemplateRegistry};
use crate::settings::SettingsBag;
use crate::storage::{JsonStorage, StorageBackend};
use crate::sync::RwLockExt;
use crate::transport::{
    DEGRADED_MARKER, SettingsRequest, SettingsTransport, TemplateMode, TemplatePatch,
    TransportResponse,
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;

/// Everything persisted for one store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Settings currently served to the storefront and the editor
    pub active: SettingsBag,

    /// Last settings of every template the store has used, by canonical id
    #[serde(default)]
    pub snapshots: BTreeMap<String, SettingsBag>,

    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Snapshot-keeping settings endpoint
pub struct SnapshotServer<S: StorageBackend = JsonStorage> {
    registry: Arc<TemplateRegistry>,
    default: TemplateId,
    api_base: String,
    persistence: Option<(PathBuf, S)>,
    stores: RwLock<HashMap<String, StoreDocument>>,
    outage: AtomicBool,
}

impl SnapshotServer<JsonStorage> {
    /// Server that keeps documents in memory only
    pub fn in_memory(registry: Arc<TemplateRegistry>) -> Self {
        Self {
            default: registry.default_id(),
            registry,
            api_base: "/api".into(),
            persistence: None,
            stores: RwLock::new(HashMap::new()),
            outage: AtomicBool::new(false),
        }
    }
}

impl SnapshotServer<JsonStorage> {
    /// Server for an editor config: JSON files under `snapshot_dir` when one
    /// is set, memory otherwise
    pub fn for_config(registry: Arc<TemplateRegistry>, config: &EditorConfig) -> Self {
        let server = match &config.snapshot_dir {
            Some(dir) => Self::with_storage(registry, dir.clone(), JsonStorage::new()),
            None => Self::in_memory(registry),
        };
        server
            .api_base(config.api_base.clone())
            .default_template(&config.default_template)
    }
}

impl<S: StorageBackend> SnapshotServer<S> {
    /// Server that persists one document per store under `dir`
    pub fn with_storage(registry: Arc<TemplateRegistry>, dir: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            default: registry.default_id(),
            registry,
            api_base: "/api".into(),
            persistence: Some((dir.into(), storage)),
            stores: RwLock::new(HashMap::new()),
            outage: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Template a bag without a usable `template` key resolves to
    ///
    /// Unknown ids keep the registry's default, as the editor does.
    #[must_use]
    pub fn default_template(mut self, raw: &str) -> Self {
        match TemplateId::lookup(raw) {
            Some(id) => self.default = id,
            None => warn!("Unknown default template '{raw}', keeping {}", self.default),
        }
        self
    }

    /// Make every write fail as if the storage layer were unavailable
    pub fn simulate_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    /// Seed a store's active settings, bypassing the endpoint
    pub fn seed(&self, store: &str, settings: SettingsBag) -> Result<()> {
        let mut doc = self.load_document(store)?;
        let template = self.template_of(&settings);
        doc.snapshots
            .insert(template.as_str().to_string(), settings.clone());
        doc.active = settings;
        self.commit(store, doc)
    }

    /// Current document for a store
    pub fn document(&self, store: &str) -> Result<StoreDocument> {
        self.load_document(store)
    }

    fn document_path(&self, store: &str) -> Option<(PathBuf, &S)> {
        self.persistence.as_ref().map(|(dir, storage)| {
            (
                dir.join(format!("{store}.{}", storage.extension())),
                storage,
            )
        })
    }

    fn load_document(&self, store: &str) -> Result<StoreDocument> {
        if let Some(doc) = self.stores.read_recovered().get(store) {
            return Ok(doc.clone());
        }
        let doc = match self.document_path(store) {
            Some((path, storage)) if path.exists() => {
                debug!("Loading settings document from {}", path.display());
                storage.read(&path)?
            }
            _ => StoreDocument::default(),
        };
        self.stores
            .write_recovered()
            .insert(store.to_string(), doc.clone());
        Ok(doc)
    }

    /// Persist, then publish; nothing changes if persisting fails
    fn commit(&self, store: &str, mut doc: StoreDocument) -> Result<()> {
        if self.outage.load(Ordering::SeqCst) {
            return Err(crate::error::Error::DegradedBackend);
        }
        doc.updated_at = Some(OffsetDateTime::now_utc());
        if let Some((path, storage)) = self.document_path(store) {
            storage.write(&path, &doc)?;
        }
        self.stores.write_recovered().insert(store.to_string(), doc);
        Ok(())
    }

    fn normalize(&self, raw: &str) -> TemplateId {
        TemplateId::lookup(raw).unwrap_or(self.default)
    }

    fn template_of(&self, bag: &SettingsBag) -> TemplateId {
        self.normalize(bag.template().unwrap_or_default())
    }

    fn store_from_path<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.api_base.trim_end_matches('/'))?;
        let rest = rest.strip_prefix("/stores/")?;
        let store = rest.strip_suffix("/settings")?;
        (!store.is_empty() && !store.contains('/')).then_some(store)
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    fn handle(&self, store: &str, request: &SettingsRequest) -> Result<TransportResponse> {
        let doc = self.load_document(store)?;
        match request {
            SettingsRequest::Fetch => Ok(TransportResponse::ok(doc.active.into_value())),
            SettingsRequest::Save(bag) => {
                let next = self.save(doc, bag.clone());
                self.respond(store, next)
            }
            SettingsRequest::Patch(patch) => match self.patch(doc, patch) {
                Ok(next) => self.respond(store, next),
                Err(response) => Ok(response),
            },
        }
    }

    fn save(&self, mut doc: StoreDocument, mut bag: SettingsBag) -> StoreDocument {
        let template = match bag.template() {
            Some(raw) => self.normalize(raw),
            None => self.template_of(&doc.active),
        };
        bag.set(keys::TEMPLATE, template.as_str());
        doc.snapshots
            .insert(template.as_str().to_string(), bag.clone());
        doc.active = bag;
        doc
    }

    fn patch(
        &self,
        mut doc: StoreDocument,
        patch: &TemplatePatch,
    ) -> std::result::Result<StoreDocument, TransportResponse> {
        let current = self.template_of(&doc.active);
        let target = self.normalize(&patch.template);

        match patch.mode {
            TemplateMode::Import => {
                if !doc.active.is_empty() {
                    doc.snapshots
                        .insert(current.as_str().to_string(), doc.active.clone());
                }
                let mut next = doc
                    .snapshots
                    .get(target.as_str())
                    .cloned()
                    .unwrap_or_else(|| self.registry.defaults_bag(target));
                for key in keys::IDENTITY_KEYS {
                    match doc.active.get(key) {
                        Some(value) => next.set(*key, value.clone()),
                        None => next.remove(key),
                    };
                }
                next.set(keys::TEMPLATE, target.as_str());
                info!("Importing template {target} (from {current})");
                doc.active = next;
            }
            TemplateMode::Defaults => {
                if target != current {
                    return Err(TransportResponse::error(
                        409,
                        format!("cannot reset {target}: active template is {current}"),
                    ));
                }
                for key in keys::RESET_KEYS {
                    doc.active.set(*key, Value::Null);
                }
                doc.active.set(keys::TEMPLATE, current.as_str());
                info!("Reset {current} to template defaults");
            }
        }
        doc.snapshots
            .insert(target.as_str().to_string(), doc.active.clone());
        Ok(doc)
    }

    fn respond(&self, store: &str, next: StoreDocument) -> Result<TransportResponse> {
        let body = next.active.clone();
        match self.commit(store, next) {
            Ok(()) => Ok(TransportResponse::ok(body.into_value())),
            Err(e) => {
                warn!("Settings for {store} were not persisted: {e}");
                let mut degraded = body.into_value();
                if let Value::Object(map) = &mut degraded {
                    map.insert(DEGRADED_MARKER.to_string(), Value::Bool(true));
                }
                Ok(TransportResponse::ok(degraded))
            }
        }
    }
}

impl<S: StorageBackend> SettingsTransport for SnapshotServer<S> {
    fn send(&self, path: &str, request: &SettingsRequest) -> Result<TransportResponse> {
        let Some(store) = self.store_from_path(path) else {
            return Ok(TransportResponse::error(404, format!("no route for {path}")));
        };
        match self.handle(store, request) {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!("{} {path} failed: {e}", request.method().as_str());
                Ok(TransportResponse::error(500, e.to_string()))
            }
        }
    }
}
