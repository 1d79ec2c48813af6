//! Common test utilities for vitrine integration tests
//!
//! Provides a seeded snapshot backend, an editor config and sample products.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use vitrine::contract::keys;
use vitrine::{
    EditorConfig, EditorSession, NodeId, NodeTree, Product, SettingsBag, SnapshotServer,
    TemplateRegistry,
};

pub const STORE: &str = "acme";

// =============================================================================
// Test Fixtures
// =============================================================================

/// Route `log` output through the test harness; set `RUST_LOG` to see it
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Test fixture with a temporary snapshot directory and a seeded backend
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub registry: Arc<TemplateRegistry>,
    pub server: SnapshotServer,
    pub config: EditorConfig,
}

impl TestFixture {
    /// A store on the bags template with a name and currency set
    pub fn new() -> Self {
        Self::with_settings(
            SettingsBag::new()
                .with(keys::TEMPLATE, "bags")
                .with(keys::STORE_NAME, "Acme Bags")
                .with(keys::CURRENCY, "EUR"),
        )
    }

    /// A store seeded with the given settings
    pub fn with_settings(settings: SettingsBag) -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = EditorConfig::builder(STORE)
            .snapshot_dir(temp_dir.path())
            .build();
        let registry = Arc::new(TemplateRegistry::builtin());
        let server = SnapshotServer::for_config(registry.clone(), &config);
        server.seed(STORE, settings).expect("Failed to seed store");

        Self {
            temp_dir,
            registry,
            server,
            config,
        }
    }

    /// Open an editor session against this fixture's backend
    pub fn editor(&self) -> EditorSession<&SnapshotServer> {
        let mut editor = EditorSession::open_with(
            self.config.clone(),
            self.registry.clone(),
            &self.server,
            vitrine::Document::new().with_stylesheet("/assets/app.css"),
        )
        .expect("Failed to open editor");
        editor.set_products(sample_products());
        editor
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn document_path(&self) -> PathBuf {
        self.temp_dir.path().join(format!("{STORE}.json"))
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new("p1", "Canvas Tote", 39.0).with_image("/img/tote.jpg"),
        Product::new("p2", "Leather Clutch", 120.0),
        Product::new("p3", "Weekender", 210.5).with_image("  "),
    ]
}

/// First node carrying `path` as its edit path
pub fn node_at(tree: &NodeTree, path: &str) -> NodeId {
    tree.find_first(vitrine::EDIT_PATH_ATTR, path)
        .unwrap_or_else(|| panic!("no node for {path}"))
}

/// Text rendered under the first node carrying `path`
pub fn text_at(tree: &NodeTree, path: &str) -> String {
    tree.text_content(node_at(tree, path))
}
