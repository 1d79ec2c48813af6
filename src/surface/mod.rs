//! Preview surfaces
//!
//! The editor renders the same tree either inline in the host document
//! (desktop) or inside an isolated document loaded in a frame (simulated
//! mobile/tablet). [`PreviewDriver`] switches between the two.

mod document;
mod driver;
mod remote;

pub use document::{Document, HeadEntry, MIRRORED_ATTR, PREVIEW_ROOT_ID};
pub use driver::{PreviewDriver, PreviewMode};
pub use remote::{RemoteSurface, SurfaceState};
