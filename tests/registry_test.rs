//! Template Registry Tests
//!
//! Tests for template id normalization and renderer lookup:
//! - Aliases and decorated ids
//! - Totality over arbitrary input
//! - Default fallback for unknown ids

use vitrine::render::ContractFixture;
use vitrine::{EDIT_PATH_ATTR, TemplateId, TemplateRegistry, normalize};

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_aliases_and_decorations() {
    let cases = [
        ("classic", TemplateId::Classic),
        ("  Default ", TemplateId::Classic),
        ("BAGS", TemplateId::Bags),
        ("handbags_store", TemplateId::Bags),
        ("leather theme", TemplateId::Bags),
        ("bridal", TemplateId::Wedding),
        ("Wedding-Template", TemplateId::Wedding),
        ("gold-wedding", TemplateId::Wedding),
        ("gold", TemplateId::Gold),
        ("gold-theme", TemplateId::Gold),
        ("gold-", TemplateId::Gold),
        ("Gold_", TemplateId::Gold),
        ("jewellery", TemplateId::Gold),
    ];
    for (raw, expected) in cases {
        assert_eq!(normalize(raw), expected, "{raw:?}");
    }
}

#[test]
fn test_normalize_is_total() {
    let inputs = [
        "",
        " ",
        "-",
        "gold-",
        "-template",
        "template",
        "??",
        "🛍️",
        "classic-template-template",
        "Ωmega",
        "\n\t",
        "a".repeat(4096).as_str(),
    ]
    .map(str::to_string);

    let registry = TemplateRegistry::builtin();
    for raw in &inputs {
        let id = normalize(raw);
        assert!(TemplateId::ALL.contains(&id), "{raw:?}");
        assert_eq!(registry.normalize(raw), registry.normalize(id.as_str()));
    }
}

#[test]
fn test_normalize_is_idempotent() {
    for id in TemplateId::ALL {
        assert_eq!(normalize(id.as_str()), id);
        assert_eq!(normalize(&id.to_string()), id);
    }
}

#[test]
fn test_unknown_falls_back_to_registry_default() {
    let registry = TemplateRegistry::builtin().with_default("wedding");
    assert_eq!(registry.default_id(), TemplateId::Wedding);
    assert_eq!(registry.normalize("nope"), TemplateId::Wedding);
    assert_eq!(normalize("nope"), TemplateId::Classic);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_unknown_id_renders_default_template() {
    let registry = TemplateRegistry::builtin().with_default("bags");
    let fixture = ContractFixture::new();

    let unknown = registry.render("mystery", &fixture.props());
    let bags = registry.render("bags", &fixture.props());

    assert_eq!(unknown.to_html(), bags.to_html());
}

#[test]
fn test_empty_registry_still_renders() {
    let registry = TemplateRegistry::empty(TemplateId::Classic);
    let fixture = ContractFixture::new();

    let tree = registry.render("classic", &fixture.props());
    assert_eq!(tree.nodes_with_attr(EDIT_PATH_ATTR).count(), 0);
    assert!(registry.picker_entries(true).is_empty());
}

#[test]
fn test_template_classes_differ() {
    let registry = TemplateRegistry::builtin();
    let fixture = ContractFixture::new();

    let mut seen = Vec::new();
    for id in registry.ids() {
        let tree = registry.render(id.as_str(), &fixture.props());
        let class = tree.attr(tree.root(), "class").unwrap().to_string();
        assert!(class.contains(id.as_str()));
        assert!(!seen.contains(&class));
        seen.push(class);
    }
    assert_eq!(seen.len(), 4);
}
