//! Preview Surface Integration Tests
//!
//! Tests for the dual-surface preview driven through an editor session:
//! - Desktop inline rendering vs simulated device surfaces
//! - Style mirroring and the surface load lifecycle
//! - Breakpoint-aware rendering
//! - Broken media recovery

mod common;

use common::{TestFixture, node_at};
use vitrine::contract::{keys, paths};
use vitrine::render::MediaRecovery;
use vitrine::surface::HeadEntry;
use vitrine::tree::HIGHLIGHT_ATTR;
use vitrine::{Breakpoint, Device, Error, PreviewMode};

fn grid_columns(body: &vitrine::NodeTree) -> Option<String> {
    body.descendants()
        .find_map(|n| body.attr(n, "data-columns").map(str::to_string))
}

#[test]
fn test_device_switch_waits_for_surface_load() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();

    editor.set_device(Device::Mobile);

    assert_eq!(editor.preview().mode(), PreviewMode::Simulated(Device::Mobile));
    assert!(!editor.preview().is_ready());
    assert!(editor.preview().host().mounted().is_none());
    let frame = editor.preview().remote().unwrap().document().unwrap();
    assert!(frame.mounted().is_none());

    editor.frame_loaded().unwrap();

    assert!(editor.preview().is_ready());
    let frame = editor.preview().active_document().unwrap();
    assert!(frame.mounted().is_some());
    let mirrored: Vec<_> = frame.head().filter(|(_, mirrored)| *mirrored).collect();
    assert_eq!(
        mirrored.first().map(|(entry, _)| (*entry).clone()),
        Some(HeadEntry::Stylesheet {
            href: "/assets/app.css".into()
        })
    );
}

#[test]
fn test_simulated_device_renders_at_its_breakpoint() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();
    editor.update_setting(keys::GRID_COLUMNS, 5).unwrap();
    assert_eq!(grid_columns(editor.preview().host().body()).as_deref(), Some("5"));

    editor.set_device(Device::Mobile);
    editor.frame_loaded().unwrap();

    assert_eq!(
        editor.preview().viewport_context().breakpoint(),
        Breakpoint::Mobile
    );
    let body = editor.preview().active_document().unwrap().body();
    let root = node_at(body, paths::ROOT);
    assert_eq!(body.attr(root, "data-breakpoint"), Some("mobile"));
    assert_eq!(grid_columns(body).as_deref(), Some("2"));

    editor.set_device(Device::Tablet);
    let body = editor.preview().active_document().unwrap().body();
    assert_eq!(grid_columns(body).as_deref(), Some("3"));
}

#[test]
fn test_clicks_reach_the_simulated_surface() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();
    let stale = node_at(editor.preview().host().body(), paths::ROOT);
    editor.set_device(Device::Tablet);

    assert!(matches!(editor.click(stale), Err(Error::SurfaceNotReady)));

    editor.frame_loaded().unwrap();
    let body = editor.preview().active_document().unwrap().body();
    let footer = node_at(body, paths::FOOTER_TEXT);
    editor.click(footer).unwrap();

    assert_eq!(editor.selected(), Some(paths::FOOTER_TEXT));
    let body = editor.preview().active_document().unwrap().body();
    let footer = node_at(body, paths::FOOTER_TEXT);
    assert_eq!(body.attr(footer, HIGHLIGHT_ATTR), Some("true"));
}

#[test]
fn test_back_to_desktop_remounts_inline_with_selection() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();
    editor.set_device(Device::Mobile);
    editor.frame_loaded().unwrap();
    editor.select(paths::HERO);

    editor.set_device(Device::Desktop);

    assert!(editor.preview().remote().is_none());
    let body = editor.preview().host().body();
    let hero = node_at(body, paths::HERO);
    assert_eq!(body.attr(hero, HIGHLIGHT_ATTR), Some("true"));
    assert_eq!(grid_columns(body).as_deref(), Some("3"));
}

#[test]
fn test_resize_refits_device_frame() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();
    editor.set_device(Device::Mobile);

    editor.resize(400.0, 422.0);
    let small = editor.preview().geometry();
    editor.resize(2000.0, 2000.0);
    let large = editor.preview().geometry();

    assert!(small.scale < large.scale);
    assert_eq!(large.scale, 1.0);
    assert_eq!(small.width, large.width);
}

#[test]
fn test_broken_product_image_swaps_once() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();
    let placeholder = fixture.config.placeholder_image.clone();

    let body = editor.preview().host().body();
    let image = body
        .elements_by_tag("img")
        .find(|n| body.attr(*n, "src") == Some("/img/tote.jpg"))
        .unwrap();

    assert_eq!(editor.preview_mut().on_media_error(image), MediaRecovery::Swapped);
    assert_eq!(
        editor.preview().host().body().attr(image, "src"),
        Some(placeholder.as_str())
    );
    assert_eq!(
        editor.preview_mut().on_media_error(image),
        MediaRecovery::AlreadyPlaceholder
    );
}

#[test]
fn test_rerender_guards_fresh_media() {
    let fixture = TestFixture::new();
    let mut editor = fixture.editor();

    editor
        .update_setting(keys::HERO_IMAGE, "https://cdn.example/missing.jpg")
        .unwrap();

    let body = editor.preview().host().body();
    let hero = node_at(body, paths::HERO_IMAGE);
    assert_eq!(
        editor.preview_mut().on_media_error(hero),
        MediaRecovery::Swapped
    );
}
