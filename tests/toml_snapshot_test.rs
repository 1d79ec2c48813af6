//! TOML Snapshot Storage Tests
//!
//! Tests for persisting store documents as TOML:
//! - Documents survive a server restart
//! - Reset keys (nulls) come back as absent and resolve the same way

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use vitrine::contract::keys;
use vitrine::transport::{TemplateMode, TemplatePatch};
use vitrine::{
    SettingsBag, SettingsRequest, SettingsTransport, SnapshotServer, StoreSettings,
    TemplateRegistry, TomlStorage,
};

const PATH: &str = "/api/stores/acme/settings";

fn server(dir: &TempDir) -> SnapshotServer<TomlStorage> {
    SnapshotServer::with_storage(
        Arc::new(TemplateRegistry::builtin()),
        dir.path(),
        TomlStorage::new(),
    )
}

#[test]
fn test_documents_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let server = server(&dir);
        server
            .seed(
                "acme",
                SettingsBag::new()
                    .with(keys::TEMPLATE, "bags")
                    .with(keys::STORE_NAME, "Acme")
                    .with(keys::SOCIAL_LINKS, json!(["https://instagram.com/acme"])),
            )
            .unwrap();
        let request = SettingsRequest::Patch(TemplatePatch {
            template: "wedding".into(),
            mode: TemplateMode::Import,
        });
        assert!(server.send(PATH, &request).unwrap().is_success());
    }

    let content = std::fs::read_to_string(dir.path().join("acme.toml")).unwrap();
    assert!(content.contains("snapshots"));
    assert!(content.contains("instagram.com/acme"));
    assert!(content.contains("updated_at"));

    let server = server(&dir);
    let doc = server.document("acme").unwrap();
    assert_eq!(doc.active.template(), Some("wedding"));
    assert_eq!(doc.active.get_str(keys::STORE_NAME), Some("Acme"));
    assert_eq!(
        doc.snapshots["bags"].get(keys::SOCIAL_LINKS),
        Some(&json!(["https://instagram.com/acme"]))
    );
    assert!(doc.updated_at.is_some());
}

#[test]
fn test_reset_keys_round_trip_as_absent() {
    let dir = TempDir::new().unwrap();
    {
        let server = server(&dir);
        server
            .seed(
                "acme",
                SettingsBag::new()
                    .with(keys::TEMPLATE, "classic")
                    .with(keys::HERO_HEADING, "Custom"),
            )
            .unwrap();
        let request = SettingsRequest::Patch(TemplatePatch {
            template: "classic".into(),
            mode: TemplateMode::Defaults,
        });
        let bag = server.send(PATH, &request).unwrap().into_settings().unwrap();
        assert_eq!(bag.get(keys::HERO_HEADING), Some(&serde_json::Value::Null));
    }

    let server = server(&dir);
    let active = server.document("acme").unwrap().active;
    assert_eq!(active.get(keys::HERO_HEADING), None);
    assert_eq!(StoreSettings::resolve(&active).hero_heading, None);
}
