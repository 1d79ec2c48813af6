//! Editor session
//!
//! Ties the pieces together for one store: settings engine, template
//! registry, selection and the preview driver. A session is the single owner
//! of its store's settings while it is open.

use crate::config::{EditorConfig, SettingsSchema};
use crate::contract::CONTRACT;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::registry::{PickerEntry, TemplateId, TemplateRegistry};
use crate::render::{Product, RenderProps};
use crate::selection::{CapturedClick, ClickOutcome, SelectionController};
use crate::settings::{MutationOutcome, SettingsBag, SettingsEngine, StoreSettings};
use crate::surface::{Document, PreviewDriver};
use crate::transport::{ImageUploader, SettingsTransport};
use crate::tree::NodeId;
use crate::viewport::Device;

use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

/// One merchant editing one store
pub struct EditorSession<T: SettingsTransport> {
    config: EditorConfig,
    registry: Arc<TemplateRegistry>,
    events: Arc<EventManager>,
    transport: T,
    engine: SettingsEngine,
    selection: SelectionController,
    preview: PreviewDriver,
    draft: Option<SettingsBag>,
    products: Vec<Product>,
    filtered: Option<Vec<Product>>,
    on_preview_tab: bool,
}

impl<T: SettingsTransport> EditorSession<T> {
    /// Open a session with the built-in templates and an empty host document
    pub fn open(config: EditorConfig, transport: T) -> Result<Self> {
        let registry =
            Arc::new(TemplateRegistry::builtin().with_default(&config.default_template));
        Self::open_with(config, registry, transport, Document::new())
    }

    /// Open a session, load the store's settings and render the preview
    pub fn open_with(
        config: EditorConfig,
        registry: Arc<TemplateRegistry>,
        transport: T,
        host: Document,
    ) -> Result<Self> {
        let events = Arc::new(EventManager::new());
        let engine = SettingsEngine::new(config.settings_path(), registry.clone(), events.clone());
        let preview = PreviewDriver::new(&config, host);

        let mut session = Self {
            selection: SelectionController::new(events.clone()),
            config,
            registry,
            events,
            transport,
            engine,
            preview,
            draft: None,
            products: Vec::new(),
            filtered: None,
            on_preview_tab: true,
        };
        session.engine.load(&session.transport)?;
        session.render_preview();
        Ok(session)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    pub fn registry(&self) -> &Arc<TemplateRegistry> {
        &self.registry
    }

    pub fn preview(&self) -> &PreviewDriver {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut PreviewDriver {
        &mut self.preview
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Settings the preview shows: the draft if there is one
    pub fn settings(&self) -> &SettingsBag {
        self.draft.as_ref().unwrap_or_else(|| self.engine.settings())
    }

    /// Settings last confirmed by the backend
    pub fn saved_settings(&self) -> &SettingsBag {
        self.engine.settings()
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    pub fn resolved(&self) -> StoreSettings {
        StoreSettings::resolve(self.settings())
    }

    pub fn active_template(&self) -> TemplateId {
        self.engine.active_template()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn is_saving(&self) -> bool {
        self.engine.is_saving()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.engine.last_error()
    }

    pub fn dismiss_error(&mut self) {
        self.engine.dismiss_error();
    }

    // =========================================================================
    // Preview
    // =========================================================================

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.render_preview();
    }

    /// Restrict the grid to a host-side filter result; `None` shows everything
    pub fn set_filtered_products(&mut self, filtered: Option<Vec<Product>>) {
        self.filtered = filtered;
        self.render_preview();
    }

    /// Re-render the active template into the active surface
    pub fn render_preview(&mut self) {
        let settings = self.resolved();
        let mut props = RenderProps::new(&self.config.store_slug, &self.products, &settings)
            .manage_mode(true)
            .viewport(self.preview.viewport_context())
            .placeholder(&self.config.placeholder_image);
        if let Some(filtered) = &self.filtered {
            props = props.filtered(filtered);
        }
        let template = self.active_template_of(self.settings());
        let tree = self.registry.render(template.as_str(), &props);
        self.preview.render(tree, true);
    }

    fn active_template_of(&self, bag: &SettingsBag) -> TemplateId {
        self.registry.normalize(bag.template().unwrap_or_default())
    }

    /// Deliver a click on the active surface
    pub fn click(&mut self, target: NodeId) -> Result<CapturedClick> {
        let click = self.preview.click(target)?;
        if let ClickOutcome::Selected(path) = &click.outcome {
            self.select(path);
        }
        Ok(click)
    }

    /// Select a region directly (e.g. from the side panel outline)
    pub fn select(&mut self, path: &str) {
        self.selection.select(path);
        self.preview.highlight(Some(path));
    }

    /// Settings keys the side panel shows for the current selection
    pub fn selected_keys(&self) -> &'static [&'static str] {
        match self.selected() {
            Some(path) => CONTRACT.bound_keys(path),
            None => &[],
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.preview.highlight(None);
    }

    pub fn is_on_preview_tab(&self) -> bool {
        self.on_preview_tab
    }

    pub fn leave_preview_tab(&mut self) {
        self.on_preview_tab = false;
        self.clear_selection();
    }

    pub fn enter_preview_tab(&mut self) {
        self.on_preview_tab = true;
        self.render_preview();
    }

    pub fn set_device(&mut self, device: Device) {
        self.preview.set_device(device);
        self.render_preview();
    }

    /// The simulated device frame finished loading
    pub fn frame_loaded(&mut self) -> Result<()> {
        self.preview.frame_loaded()?;
        self.render_preview();
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let before = self.preview.viewport_context().breakpoint();
        self.preview.resize(width, height);
        if self.preview.viewport_context().breakpoint() != before {
            self.render_preview();
        }
    }

    // =========================================================================
    // Template picker
    // =========================================================================

    pub fn picker_entries(&self) -> Vec<PickerEntry> {
        self.registry
            .picker_entries(self.config.show_all_templates)
    }

    pub fn open_picker(&mut self) {
        self.selection.open_picker();
        self.preview.highlight(None);
    }

    pub fn close_picker(&mut self) {
        self.selection.close_picker();
    }

    pub fn is_picker_open(&self) -> bool {
        self.selection.is_picker_open()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    fn after_replace(&mut self, outcome: &MutationOutcome) {
        if let MutationOutcome::Applied { .. } = outcome {
            self.draft = None;
            self.render_preview();
        }
    }

    /// Switch to another template
    ///
    /// Clears the selection and any draft once the new settings arrive.
    pub fn switch_template(&mut self, requested: &str) -> Result<MutationOutcome> {
        let outcome = self.engine.switch_template(requested, &self.transport)?;
        if let MutationOutcome::Applied { .. } = outcome {
            self.clear_selection();
            self.selection.close_picker();
        }
        self.after_replace(&outcome);
        Ok(outcome)
    }

    /// Reset the active template to its defaults after `confirm` agrees
    pub fn reset_to_defaults<F>(&mut self, confirm: F) -> Result<MutationOutcome>
    where
        F: FnOnce(TemplateId) -> bool,
    {
        let outcome = self.engine.reset_to_defaults(confirm, &self.transport)?;
        self.after_replace(&outcome);
        Ok(outcome)
    }

    /// Stage an edit in the draft and re-render
    pub fn update_setting(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if !CONTRACT.allows_key(key) {
            return Err(Error::UnknownSettingKey(key.to_string()));
        }
        if let Some(meta) = StoreSettings::get_metadata().get(key) {
            meta.validate(&value)
                .map_err(|reason| Error::InvalidSettingValue {
                    key: key.to_string(),
                    reason,
                })?;
        }
        self.events
            .validate(key, &value)
            .map_err(|reason| Error::InvalidSettingValue {
                key: key.to_string(),
                reason,
            })?;

        let draft = self
            .draft
            .get_or_insert_with(|| self.engine.settings().clone());
        let old = draft.set(key, value.clone()).unwrap_or(Value::Null);
        debug!("Draft {key}: {old} -> {value}");
        self.render_preview();
        Ok(())
    }

    /// Drop staged edits
    pub fn discard_draft(&mut self) {
        if self.draft.take().is_some() {
            self.render_preview();
        }
    }

    /// Save the draft (or the current settings) and apply the server's answer
    pub fn save(&mut self) -> Result<MutationOutcome> {
        let bag = self.settings().clone();
        let outcome = self.engine.save(bag, &self.transport)?;
        self.after_replace(&outcome);
        Ok(outcome)
    }

    /// Upload an image and stage its URL under `key`
    pub fn upload_image<U: ImageUploader>(
        &mut self,
        uploader: &U,
        key: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let url = uploader.upload(file_name, bytes).map_err(|e| {
            warn!("Upload of {file_name} failed: {e}");
            Error::UploadFailed(e.to_string())
        })?;
        self.update_setting(key, url.as_str())?;
        Ok(url)
    }

    /// The editor is going away; in-flight responses are dropped
    pub fn unmount(&mut self) {
        self.engine.unmount();
        self.events.clear();
    }
}
