//! Edit Contract Conformance Tests
//!
//! Every ready template must:
//! - carry every required edit path when rendered in manage mode
//! - select exactly the clicked region's path, from any descendant
//! - render the public storefront without editor-only markup

mod common;

use vitrine::contract::{keys, paths};
use vitrine::registry::READY_TEMPLATES;
use vitrine::render::ContractFixture;
use vitrine::selection::capture_click;
use vitrine::tree::EMPTY_ATTR;
use vitrine::{
    CONTRACT, ClickOutcome, EDIT_PATH_ATTR, NodeAction, RenderProps, SettingsBag, StoreSettings,
    TemplateId, TemplateRegistry, render_public_html,
};

// =============================================================================
// Coverage
// =============================================================================

#[test]
fn test_ready_templates_carry_every_edit_path() {
    let registry = TemplateRegistry::builtin();
    for id in READY_TEMPLATES {
        let report = registry.check_contract(*id);
        assert!(report.is_complete(), "{id} is missing {:?}", report.missing);
        assert!(report.unknown.is_empty(), "{id} emits {:?}", report.unknown);
    }
}

#[test]
fn test_gold_is_not_ready() {
    let registry = TemplateRegistry::builtin();
    assert!(!registry.is_ready(TemplateId::Gold));

    let report = registry.check_contract(TemplateId::Gold);
    assert_eq!(report.missing, vec![paths::FOOTER_SOCIAL.to_string()]);
    assert!(matches!(
        report.into_result("gold"),
        Err(vitrine::Error::ContractViolation { .. })
    ));
}

#[test]
fn test_picker_hides_unready_unless_asked() {
    let registry = TemplateRegistry::builtin();

    let shown: Vec<_> = registry.picker_entries(false).iter().map(|e| e.id).collect();
    assert_eq!(shown, READY_TEMPLATES.to_vec());

    let all = registry.picker_entries(true);
    let gold = all.iter().find(|e| e.id == TemplateId::Gold).unwrap();
    assert!(!gold.ready);
}

// =============================================================================
// Click reachability
// =============================================================================

#[test]
fn test_every_rendered_path_is_selectable() {
    let registry = TemplateRegistry::builtin();
    let fixture = ContractFixture::new();

    for id in READY_TEMPLATES {
        let tree = registry.render(id.as_str(), &fixture.props());
        for node in tree.nodes_with_attr(EDIT_PATH_ATTR) {
            let path = tree.attr(node, EDIT_PATH_ATTR).unwrap().to_string();
            let click = capture_click(&tree, node, true);
            assert_eq!(click.selected_path(), Some(path.as_str()), "{id}");
            assert!(click.default_prevented);
            assert!(click.propagation_stopped);
        }
    }
}

#[test]
fn test_click_on_descendant_selects_nearest_region() {
    let registry = TemplateRegistry::builtin();
    let fixture = ContractFixture::new();

    for id in READY_TEMPLATES {
        let tree = registry.render(id.as_str(), &fixture.props());
        let card = common::node_at(&tree, paths::PRODUCT_CARD);
        let inner = tree
            .descendants()
            .filter(|n| *n != card)
            .find(|n| tree.closest_with_attr(*n, EDIT_PATH_ATTR) == Some(card))
            .expect("card has unmarked content");

        let click = capture_click(&tree, inner, true);
        assert_eq!(click.selected_path(), Some(paths::PRODUCT_CARD), "{id}");
    }
}

#[test]
fn test_manage_mode_suppresses_storefront_actions() {
    let registry = TemplateRegistry::builtin();
    let fixture = ContractFixture::new();
    let tree = registry.render("classic", &fixture.props());

    let button = common::node_at(&tree, paths::HERO_BUTTON);
    let click = capture_click(&tree, button, true);
    assert_eq!(
        click.outcome,
        ClickOutcome::Selected(paths::HERO_BUTTON.to_string())
    );
}

#[test]
fn test_public_mode_runs_storefront_actions() {
    let registry = TemplateRegistry::builtin();
    let fixture = ContractFixture::new();
    let props = fixture.props().manage_mode(false);
    let tree = registry.render("classic", &props);

    let button = common::node_at(&tree, paths::HERO_BUTTON);
    let click = capture_click(&tree, button, false);
    assert!(matches!(click.outcome, ClickOutcome::Activated(NodeAction::Navigate(_))));
    assert!(!click.default_prevented);

    let card = common::node_at(&tree, paths::PRODUCT_CARD);
    let add = tree
        .descendants()
        .find(|n| {
            tree.closest_with_attr(*n, EDIT_PATH_ATTR) == Some(card)
                && matches!(tree.action(*n), Some(NodeAction::AddToCart(_)))
        })
        .expect("card has an add-to-cart button");
    let click = capture_click(&tree, add, false);
    assert_eq!(
        click.outcome,
        ClickOutcome::Activated(NodeAction::AddToCart("fixture-1".to_string()))
    );
}

// =============================================================================
// Empty regions
// =============================================================================

#[test]
fn test_blank_optional_regions_stay_selectable_in_manage_mode_only() {
    let registry = TemplateRegistry::builtin();
    let bag = SettingsBag::new()
        .with(keys::HERO_SUBTITLE, "")
        .with(keys::BUTTON_TEXT, "");
    let settings = StoreSettings::resolve(&bag);
    let products = common::sample_products();

    for id in READY_TEMPLATES {
        let manage = RenderProps::new("acme", &products, &settings).manage_mode(true);
        let tree = registry.render(id.as_str(), &manage);
        let subtitle = common::node_at(&tree, paths::HERO_SUBTITLE);
        assert_eq!(tree.attr(subtitle, EMPTY_ATTR), Some("true"), "{id}");
        assert!(CONTRACT.check(&tree).is_complete(), "{id}");

        let public = manage.manage_mode(false);
        let tree = registry.render(id.as_str(), &public);
        assert!(tree.find_first(EDIT_PATH_ATTR, paths::HERO_SUBTITLE).is_none(), "{id}");
        assert!(tree.find_first(EDIT_PATH_ATTR, paths::HERO_BUTTON).is_none(), "{id}");
    }
}

#[test]
fn test_public_html_has_no_editor_markup() {
    let registry = TemplateRegistry::builtin();
    let fixture = ContractFixture::new();

    let html = render_public_html(&registry, &fixture.props());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Fixture Store</title>"));
    assert!(!html.contains(EMPTY_ATTR));
    assert!(!html.contains("data-edit-selected"));
}
