//! Isolated preview surface
//!
//! A separately loaded document used to simulate narrower devices. It has an
//! explicit lifecycle: `load` creates a blank shell that is not ready;
//! `on_load` syncs styles from the host, mounts any pending tree and attaches
//! the surface's own click listener; `teardown` drops everything so the next
//! load starts from scratch.

use crate::error::{Error, Result};
use crate::selection::{CapturedClick, capture_click};
use crate::surface::Document;
use crate::tree::{NodeId, NodeTree};
use crate::viewport::Device;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Unloaded,
    Loading,
    Ready,
}

/// A frame-hosted document the preview can be mounted into
#[derive(Debug)]
pub struct RemoteSurface {
    device: Device,
    state: SurfaceState,
    document: Option<Document>,
    pending: Option<NodeTree>,
    listener_attached: bool,
}

impl RemoteSurface {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            state: SurfaceState::Unloaded,
            document: None,
            pending: None,
            listener_attached: false,
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn has_listener(&self) -> bool {
        self.listener_attached
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    /// Start loading a blank shell
    pub fn load(&mut self) {
        debug!("Loading {:?} preview surface", self.device);
        self.document = Some(Document::new());
        self.state = SurfaceState::Loading;
        self.listener_attached = false;
    }

    /// The frame's load event fired
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurfaceNotReady`] if `load` was not called first.
    pub fn on_load(&mut self, host: &Document) -> Result<()> {
        let document = match (self.state, self.document.as_mut()) {
            (SurfaceState::Unloaded, _) | (_, None) => return Err(Error::SurfaceNotReady),
            (_, Some(document)) => document,
        };
        document.sync_from(host);
        self.listener_attached = true;
        self.state = SurfaceState::Ready;
        info!("{:?} preview surface ready", self.device);

        if let Some(tree) = self.pending.take() {
            self.mount(&tree);
        }
        Ok(())
    }

    /// Mount a tree, or hold it until the surface is ready
    ///
    /// Returns the mounted root when it was mounted immediately.
    pub fn mount(&mut self, tree: &NodeTree) -> Option<NodeId> {
        match (self.state, self.document.as_mut()) {
            (SurfaceState::Ready, Some(document)) => Some(document.mount(tree)),
            _ => {
                self.pending = Some(tree.clone());
                None
            }
        }
    }

    /// Re-copy host styles, e.g. after the host loaded a new stylesheet
    pub fn resync(&mut self, host: &Document) -> Result<()> {
        match (self.state, self.document.as_mut()) {
            (SurfaceState::Ready, Some(document)) => {
                document.sync_from(host);
                Ok(())
            }
            _ => Err(Error::SurfaceNotReady),
        }
    }

    /// Dispatch a click to this surface's own listener
    pub fn click(&self, target: NodeId, manage: bool) -> Result<CapturedClick> {
        match (&self.document, self.listener_attached) {
            (Some(document), true) => Ok(capture_click(document.body(), target, manage)),
            _ => Err(Error::SurfaceNotReady),
        }
    }

    pub fn highlight(&mut self, selected: Option<&str>) -> Option<NodeId> {
        if !self.is_ready() {
            return None;
        }
        self.document.as_mut()?.highlight(selected)
    }

    /// Unmount and forget everything
    pub fn teardown(&mut self) {
        if let Some(document) = self.document.as_mut() {
            document.unmount();
        }
        self.document = None;
        self.pending = None;
        self.listener_attached = false;
        self.state = SurfaceState::Unloaded;
        debug!("{:?} preview surface torn down", self.device);
    }
}
