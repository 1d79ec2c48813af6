//! Dual-surface preview driver
//!
//! `Desktop` mounts the tree inline in the host document. `Simulated(device)`
//! mounts it into a [`RemoteSurface`], created lazily on entry and torn down
//! on the way back to desktop.

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::render::{MediaRecovery, guard_media, recover_media_error};
use crate::selection::CapturedClick;
use crate::surface::{Document, RemoteSurface};
use crate::tree::{NodeId, NodeTree};
use crate::viewport::{Device, DevicePreset, FrameGeometry, ViewportContext};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewMode {
    #[default]
    Desktop,
    Simulated(Device),
}

/// Routes renders, clicks and highlights to whichever surface is active
#[derive(Debug)]
pub struct PreviewDriver {
    host: Document,
    remote: Option<RemoteSurface>,
    mode: PreviewMode,
    manage: bool,

    mobile: DevicePreset,
    tablet: DevicePreset,
    desktop_max_width: f64,
    placeholder: String,

    available_width: f64,
    available_height: f64,
    geometry: FrameGeometry,

    last_tree: Option<NodeTree>,
    selected: Option<String>,
}

impl PreviewDriver {
    pub fn new(config: &EditorConfig, host: Document) -> Self {
        let available_width = config.desktop_max_width;
        Self {
            host,
            remote: None,
            mode: PreviewMode::Desktop,
            manage: true,
            mobile: config.mobile.clone(),
            tablet: config.tablet.clone(),
            desktop_max_width: config.desktop_max_width,
            placeholder: config.placeholder_image.clone(),
            available_width,
            available_height: 0.0,
            geometry: FrameGeometry::desktop(available_width, config.desktop_max_width),
            last_tree: None,
            selected: None,
        }
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn host(&self) -> &Document {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Document {
        &mut self.host
    }

    pub fn remote(&self) -> Option<&RemoteSurface> {
        self.remote.as_ref()
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Whether renders and clicks reach a surface right now
    pub fn is_ready(&self) -> bool {
        match self.mode {
            PreviewMode::Desktop => true,
            PreviewMode::Simulated(_) => self.remote.as_ref().is_some_and(RemoteSurface::is_ready),
        }
    }

    /// The document the tree is (or will be) mounted in
    pub fn active_document(&self) -> Option<&Document> {
        match self.mode {
            PreviewMode::Desktop => Some(&self.host),
            PreviewMode::Simulated(_) => self.remote.as_ref().and_then(RemoteSurface::document),
        }
    }

    fn active_document_mut(&mut self) -> Option<&mut Document> {
        match self.mode {
            PreviewMode::Desktop => Some(&mut self.host),
            PreviewMode::Simulated(_) => self
                .remote
                .as_mut()
                .filter(|r| r.is_ready())
                .and_then(RemoteSurface::document_mut),
        }
    }

    fn preset(&self, device: Device) -> Option<&DevicePreset> {
        match device {
            Device::Desktop => None,
            Device::Mobile => Some(&self.mobile),
            Device::Tablet => Some(&self.tablet),
        }
    }

    /// Viewport the renderer should lay out against
    pub fn viewport_context(&self) -> ViewportContext {
        match self.mode {
            PreviewMode::Desktop => ViewportContext::measured(self.geometry.width),
            PreviewMode::Simulated(device) => ViewportContext::measured(
                self.preset(device).map_or(self.geometry.width, |p| p.width),
            ),
        }
    }

    // =========================================================================
    // Mode transitions
    // =========================================================================

    /// Switch the simulated device
    ///
    /// Entering a simulated device loads a fresh isolated surface if none
    /// exists; returning to desktop tears it down and remounts inline.
    pub fn set_device(&mut self, device: Device) {
        let next = match device {
            Device::Desktop => PreviewMode::Desktop,
            other => PreviewMode::Simulated(other),
        };
        if next == self.mode {
            return;
        }
        debug!("Preview mode {:?} -> {next:?}", self.mode);

        match next {
            PreviewMode::Desktop => {
                if let Some(mut remote) = self.remote.take() {
                    remote.teardown();
                }
                self.mode = next;
                if let Some(tree) = self.last_tree.take() {
                    self.host.mount(&tree);
                    self.last_tree = Some(tree);
                }
                let selected = self.selected.clone();
                self.host.highlight(selected.as_deref());
            }
            PreviewMode::Simulated(device) => {
                if self.mode == PreviewMode::Desktop {
                    self.host.unmount();
                }
                self.mode = next;
                let remote = self
                    .remote
                    .get_or_insert_with(|| RemoteSurface::new(device));
                remote.set_device(device);
                if remote.state() == crate::surface::SurfaceState::Unloaded {
                    remote.load();
                }
                if let Some(tree) = &self.last_tree {
                    remote.mount(tree);
                }
            }
        }
        self.refit();
    }

    /// The isolated surface's load event fired
    pub fn frame_loaded(&mut self) -> Result<()> {
        let remote = self.remote.as_mut().ok_or(Error::SurfaceNotReady)?;
        remote.on_load(&self.host)?;
        let selected = self.selected.clone();
        remote.highlight(selected.as_deref());
        Ok(())
    }

    /// Container or window resized; cheap and idempotent
    pub fn resize(&mut self, available_width: f64, available_height: f64) {
        self.available_width = available_width.max(0.0);
        self.available_height = available_height.max(0.0);
        self.refit();
    }

    fn refit(&mut self) {
        self.geometry = match self.mode {
            PreviewMode::Desktop => {
                FrameGeometry::desktop(self.available_width, self.desktop_max_width)
            }
            PreviewMode::Simulated(device) => match self.preset(device) {
                Some(preset) => preset.fit(self.available_width, self.available_height),
                None => FrameGeometry::desktop(self.available_width, self.desktop_max_width),
            },
        };
    }

    // =========================================================================
    // Rendering and interaction
    // =========================================================================

    /// Mount a freshly rendered tree on the active surface
    ///
    /// Media recovery is reattached and the current selection re-highlighted.
    pub fn render(&mut self, mut tree: NodeTree, manage: bool) {
        guard_media(&mut tree, &self.placeholder);
        self.manage = manage;

        match self.mode {
            PreviewMode::Desktop => {
                self.host.mount(&tree);
            }
            PreviewMode::Simulated(_) => {
                if let Some(remote) = self.remote.as_mut() {
                    remote.mount(&tree);
                }
            }
        }
        self.last_tree = Some(tree);
        let selected = self.selected.clone();
        self.apply_highlight(selected.as_deref());
    }

    /// Deliver a click to the active surface's listener
    pub fn click(&self, target: NodeId) -> Result<CapturedClick> {
        match self.mode {
            PreviewMode::Desktop => Ok(crate::selection::capture_click(
                self.host.body(),
                target,
                self.manage,
            )),
            PreviewMode::Simulated(_) => self
                .remote
                .as_ref()
                .ok_or(Error::SurfaceNotReady)?
                .click(target, self.manage),
        }
    }

    /// Mirror a selection into the active surface
    pub fn highlight(&mut self, selected: Option<&str>) -> Option<NodeId> {
        self.selected = selected.map(str::to_string);
        self.apply_highlight(selected)
    }

    fn apply_highlight(&mut self, selected: Option<&str>) -> Option<NodeId> {
        self.active_document_mut()?.highlight(selected)
    }

    /// A media element on the active surface failed to load
    pub fn on_media_error(&mut self, node: NodeId) -> MediaRecovery {
        match self.active_document_mut() {
            Some(document) => recover_media_error(document.body_mut(), node),
            None => MediaRecovery::Ignored,
        }
    }
}
