//! Settings resolution engine
//!
//! Owns the editor's copy of the store's settings and the three mutations the
//! editor exposes: switch template, reset template to defaults, and save.
//! Every mutation replaces local state wholesale with the backend's answer;
//! nothing is patched optimistically.
//!
//! Mutations are split into `begin_*` (validate, build the request, raise the
//! `saving` gate) and [`SettingsEngine::complete`] (apply the response), so a
//! host with a real asynchronous transport can hold the request in flight.
//! The convenience methods run both halves over a [`SettingsTransport`].

use crate::config::{SettingsSchema, store_schema};
use crate::contract::{CONTRACT, keys};
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::registry::{TemplateId, TemplateRegistry};
use crate::settings::{SettingChange, SettingsBag, StoreSettings};
use crate::transport::{
    SettingsRequest, SettingsTransport, TemplateMode, TemplatePatch, TransportResponse,
};

use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

/// What an in-flight request will do once it lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Fetch,
    Save,
    Switch { target: TemplateId },
    Reset { template: TemplateId },
}

/// A request that has been issued but not yet applied
#[derive(Debug)]
#[must_use = "a pending request keeps the saving gate raised until completed"]
pub struct PendingRequest {
    mutation: Mutation,
    request: SettingsRequest,
}

impl PendingRequest {
    pub fn mutation(&self) -> Mutation {
        self.mutation
    }

    pub fn request(&self) -> &SettingsRequest {
        &self.request
    }
}

/// Result of a mutation that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Local state was replaced with the backend's answer
    Applied {
        changes: Vec<SettingChange>,
        template_changed: bool,
    },
    /// Nothing to do (switch to the active template); no request was sent
    Unchanged,
    /// The user declined the confirmation; no request was sent
    Cancelled,
    /// The editor went away before the response arrived; it was dropped
    Discarded,
}

/// Settings state and mutations for one editor session
pub struct SettingsEngine {
    settings_path: String,
    current: SettingsBag,
    registry: Arc<TemplateRegistry>,
    events: Arc<EventManager>,
    saving: bool,
    mounted: bool,
    last_error: Option<String>,
}

impl SettingsEngine {
    pub fn new(
        settings_path: impl Into<String>,
        registry: Arc<TemplateRegistry>,
        events: Arc<EventManager>,
    ) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: SettingsBag::new(),
            registry,
            events,
            saving: false,
            mounted: true,
            last_error: None,
        }
    }

    /// Last settings confirmed by the backend
    pub fn settings(&self) -> &SettingsBag {
        &self.current
    }

    /// Typed view of the confirmed settings
    pub fn resolved(&self) -> StoreSettings {
        StoreSettings::resolve(&self.current)
    }

    /// Canonical id of the template the settings belong to
    pub fn active_template(&self) -> TemplateId {
        self.registry
            .normalize(self.current.template().unwrap_or_default())
    }

    /// Whether a request is in flight; switch/reset/save controls are disabled meanwhile
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Message for the dismissable error banner
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Stop applying responses; in-flight requests are not aborted
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    // =========================================================================
    // Request construction
    // =========================================================================

    fn begin(&mut self, mutation: Mutation, request: SettingsRequest) -> Result<PendingRequest> {
        if self.saving {
            return Err(Error::SaveInProgress);
        }
        self.saving = true;
        debug!("{} {} ({mutation:?})", request.method().as_str(), self.settings_path);
        Ok(PendingRequest { mutation, request })
    }

    pub fn begin_fetch(&mut self) -> Result<PendingRequest> {
        self.begin(Mutation::Fetch, SettingsRequest::Fetch)
    }

    /// Start switching to `requested` (any id or alias)
    ///
    /// Returns `Ok(None)` without touching the network when the id resolves to
    /// the active template.
    pub fn begin_switch(&mut self, requested: &str) -> Result<Option<PendingRequest>> {
        let target = self.registry.normalize(requested);
        if target == self.active_template() {
            debug!("Template '{requested}' is already active, skipping switch");
            return Ok(None);
        }
        let request = SettingsRequest::Patch(TemplatePatch {
            template: target.as_str().to_string(),
            mode: TemplateMode::Import,
        });
        self.begin(Mutation::Switch { target }, request).map(Some)
    }

    /// Start resetting the active template's resettable keys
    ///
    /// Callers must have obtained the user's confirmation first.
    pub fn begin_reset(&mut self) -> Result<PendingRequest> {
        let template = self.active_template();
        let request = SettingsRequest::Patch(TemplatePatch {
            template: template.as_str().to_string(),
            mode: TemplateMode::Defaults,
        });
        self.begin(Mutation::Reset { template }, request)
    }

    /// Start saving a full settings bag
    ///
    /// # Errors
    ///
    /// Returns a validation error, without sending anything, when a changed
    /// key is outside the contract or its new value violates its schema entry
    /// or a registered validator.
    pub fn begin_save(&mut self, mut bag: SettingsBag) -> Result<PendingRequest> {
        self.validate_bag(&bag)?;
        if bag.template().is_none() {
            bag.set(keys::TEMPLATE, self.active_template().as_str());
        }
        self.begin(Mutation::Save, SettingsRequest::Save(bag))
    }

    /// Check the keys and values a bag changes before it is sent
    ///
    /// Values equal to what the backend already holds pass through as-is;
    /// resolution falls back for stored values that are out of range.
    pub fn validate_bag(&self, bag: &SettingsBag) -> Result<()> {
        let schema = StoreSettings::get_metadata();
        for (key, value) in bag.iter() {
            if self.current.get(key) == Some(value) {
                continue;
            }
            if !CONTRACT.allows_key(key) {
                return Err(Error::UnknownSettingKey(key.clone()));
            }
            if let Some(meta) = schema.get(key.as_str()) {
                meta.validate(value)
                    .map_err(|reason| Error::InvalidSettingValue {
                        key: key.clone(),
                        reason,
                    })?;
            }
            self.events
                .validate(key, value)
                .map_err(|reason| Error::InvalidSettingValue {
                    key: key.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    // =========================================================================
    // Response handling
    // =========================================================================

    /// Apply the outcome of a pending request
    ///
    /// On failure local state is left untouched and the banner message is set.
    pub fn complete(
        &mut self,
        pending: PendingRequest,
        response: Result<TransportResponse>,
    ) -> Result<MutationOutcome> {
        self.saving = false;

        if !self.mounted {
            debug!("Dropping response for {:?}: editor unmounted", pending.mutation);
            return Ok(MutationOutcome::Discarded);
        }

        let received = response.and_then(TransportResponse::into_settings);
        let mut next = match received {
            Ok(bag) => bag,
            Err(e) => {
                warn!("Settings request {:?} failed: {e}", pending.mutation);
                self.last_error = Some(e.user_message());
                return Err(e);
            }
        };

        if let Mutation::Switch { target } = pending.mutation {
            if next.template().is_none() {
                next.set(keys::TEMPLATE, target.as_str());
            }
        }

        let previous_template = self.active_template();
        let changes = self.current.diff(&next);
        self.current = next;
        self.last_error = None;

        for change in &changes {
            self.events.notify(&change.key, &change.old, &change.new);
        }

        let template_changed = previous_template != self.active_template();
        match pending.mutation {
            Mutation::Switch { target } => {
                info!("Switched template {previous_template} -> {target}");
                self.events.notify_invalidate();
            }
            Mutation::Reset { template } => info!("Reset template {template} to defaults"),
            Mutation::Save => info!("Saved {} settings", self.current.len()),
            Mutation::Fetch => debug!("Loaded {} settings", self.current.len()),
        }

        Ok(MutationOutcome::Applied {
            changes,
            template_changed,
        })
    }

    fn execute<T: SettingsTransport>(
        &mut self,
        pending: PendingRequest,
        transport: &T,
    ) -> Result<MutationOutcome> {
        let response = transport.send(&self.settings_path, pending.request());
        self.complete(pending, response)
    }

    // =========================================================================
    // Convenience operations
    // =========================================================================

    /// Fetch the store's settings
    pub fn load<T: SettingsTransport>(&mut self, transport: &T) -> Result<MutationOutcome> {
        let pending = self.begin_fetch()?;
        self.execute(pending, transport)
    }

    /// Switch to another template, importing its snapshot or shipped defaults
    pub fn switch_template<T: SettingsTransport>(
        &mut self,
        requested: &str,
        transport: &T,
    ) -> Result<MutationOutcome> {
        match self.begin_switch(requested)? {
            Some(pending) => self.execute(pending, transport),
            None => Ok(MutationOutcome::Unchanged),
        }
    }

    /// Reset the active template to its defaults after asking `confirm`
    pub fn reset_to_defaults<T, F>(&mut self, confirm: F, transport: &T) -> Result<MutationOutcome>
    where
        T: SettingsTransport,
        F: FnOnce(TemplateId) -> bool,
    {
        if !confirm(self.active_template()) {
            return Ok(MutationOutcome::Cancelled);
        }
        let pending = self.begin_reset()?;
        self.execute(pending, transport)
    }

    /// Save a full settings bag
    pub fn save<T: SettingsTransport>(
        &mut self,
        bag: SettingsBag,
        transport: &T,
    ) -> Result<MutationOutcome> {
        let pending = self.begin_save(bag)?;
        self.execute(pending, transport)
    }

    /// Schema default for a key, used by the side panel
    pub fn schema_default(key: &str) -> Option<Value> {
        store_schema().get(key).map(|m| m.default.clone())
    }
}
