//! Editor configuration

use crate::viewport::{Device, DevicePreset};
use std::path::PathBuf;

/// Fallback image used for products without images and for broken media
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// Configuration for an editor session
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Store whose settings are being edited
    pub store_slug: String,

    /// Base path of the settings API (e.g. "/api")
    pub api_base: String,

    /// Template id used when nothing else resolves
    pub default_template: String,

    /// Placeholder image path
    pub placeholder_image: String,

    /// Maximum width of the inline desktop preview, in CSS pixels
    pub desktop_max_width: f64,

    /// Simulated device presets
    pub mobile: DevicePreset,
    pub tablet: DevicePreset,

    /// Show templates that have not passed the edit contract in the picker
    pub show_all_templates: bool,

    /// Directory for file-backed settings snapshots
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_slug: "store".into(),
            api_base: "/api".into(),
            default_template: "classic".into(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.into(),
            desktop_max_width: 1280.0,
            mobile: DevicePreset::mobile(),
            tablet: DevicePreset::tablet(),
            show_all_templates: false,
            snapshot_dir: None,
        }
    }
}

impl EditorConfig {
    /// Create a new builder for `EditorConfig`
    ///
    /// # Example
    /// ```rust
    /// use vitrine::EditorConfig;
    ///
    /// let config = EditorConfig::builder("acme")
    ///     .default_template("wedding")
    ///     .placeholder_image("/static/empty.png")
    ///     .build();
    /// assert_eq!(config.settings_path(), "/api/stores/acme/settings");
    /// ```
    pub fn builder(store_slug: impl Into<String>) -> EditorConfigBuilder {
        EditorConfigBuilder::new(store_slug)
    }

    /// Settings endpoint for this store
    pub fn settings_path(&self) -> String {
        format!(
            "{}/stores/{}/settings",
            self.api_base.trim_end_matches('/'),
            self.store_slug
        )
    }

    pub fn preset(&self, device: Device) -> Option<&DevicePreset> {
        match device {
            Device::Desktop => None,
            Device::Mobile => Some(&self.mobile),
            Device::Tablet => Some(&self.tablet),
        }
    }
}

/// Builder for creating `EditorConfig` with a fluent API
#[derive(Debug, Clone)]
pub struct EditorConfigBuilder {
    config: EditorConfig,
}

impl EditorConfigBuilder {
    pub fn new(store_slug: impl Into<String>) -> Self {
        Self {
            config: EditorConfig {
                store_slug: store_slug.into(),
                ..EditorConfig::default()
            },
        }
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn default_template(mut self, id: impl Into<String>) -> Self {
        self.config.default_template = id.into();
        self
    }

    pub fn placeholder_image(mut self, path: impl Into<String>) -> Self {
        self.config.placeholder_image = path.into();
        self
    }

    pub fn desktop_max_width(mut self, width: f64) -> Self {
        self.config.desktop_max_width = width;
        self
    }

    pub fn mobile(mut self, preset: DevicePreset) -> Self {
        self.config.mobile = preset;
        self
    }

    pub fn tablet(mut self, preset: DevicePreset) -> Self {
        self.config.tablet = preset;
        self
    }

    /// List every registered template in the picker, ready or not
    pub fn show_all_templates(mut self) -> Self {
        self.config.show_all_templates = true;
        self
    }

    /// Set the snapshot directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn snapshot_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = if path.starts_with("~") {
            match dirs::home_dir() {
                Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
                None => path,
            }
        } else {
            path
        };
        self.config.snapshot_dir = Some(expanded);
        self
    }

    pub fn build(self) -> EditorConfig {
        self.config
    }
}
