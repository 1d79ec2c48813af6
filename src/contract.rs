//! Edit-path contract
//!
//! The fixed catalog of region identifiers and settings keys that every
//! ready template implements. Templates emit these paths; conformance tests
//! and the registry's readiness check read them back from rendered trees.

use crate::error::{Error, Result};
use crate::tree::NodeTree;

/// Canonical edit paths
pub mod paths {
    /// Whole-page settings entry point
    pub const ROOT: &str = "__root";
    /// Store identity fields not owned by a visual region
    pub const SETTINGS: &str = "__settings";
    pub const STORE_NAME: &str = "__settings.store_name";

    pub const HEADER: &str = "layout.header";
    pub const HEADER_LOGO: &str = "layout.header.logo";
    pub const HEADER_NAV: &str = "layout.header.nav";

    pub const HERO: &str = "layout.hero";
    pub const HERO_TITLE: &str = "layout.hero.title";
    pub const HERO_SUBTITLE: &str = "layout.hero.subtitle";
    pub const HERO_BUTTON: &str = "layout.hero.button";
    pub const HERO_IMAGE: &str = "layout.hero.image";

    pub const PRODUCTS: &str = "layout.products";
    pub const PRODUCTS_TITLE: &str = "layout.products.title";
    pub const PRODUCT_CARD: &str = "layout.products.card";

    pub const DESCRIPTION: &str = "layout.description";

    pub const FOOTER: &str = "layout.footer";
    pub const FOOTER_TEXT: &str = "layout.footer.text";
    pub const FOOTER_SOCIAL: &str = "layout.footer.social";
}

/// Canonical settings keys
pub mod keys {
    pub const TEMPLATE: &str = "template";

    // Store identity (un-prefixed, never reset)
    pub const STORE_NAME: &str = "store_name";
    pub const LOGO_URL: &str = "logo_url";
    pub const CURRENCY: &str = "currency";

    // Template-scoped appearance
    pub const BACKGROUND_COLOR: &str = "template_background_color";
    pub const TEXT_COLOR: &str = "template_text_color";
    pub const ACCENT_COLOR: &str = "template_accent_color";
    pub const HERO_HEADING: &str = "template_hero_heading";
    pub const HERO_SUBTITLE: &str = "template_hero_subtitle";
    pub const HERO_IMAGE: &str = "template_hero_image";
    pub const BUTTON_TEXT: &str = "template_button_text";
    pub const DESCRIPTION_TEXT: &str = "template_description_text";
    pub const DESCRIPTION_COLOR: &str = "template_description_color";
    pub const DESCRIPTION_SIZE: &str = "template_description_size";
    pub const DESCRIPTION_WEIGHT: &str = "template_description_weight";
    pub const DESCRIPTION_STYLE: &str = "template_description_style";
    pub const PRODUCTS_HEADING: &str = "template_products_heading";
    pub const FOOTER_TEXT: &str = "template_footer_text";
    pub const SOCIAL_LINKS: &str = "template_social_links";
    pub const GRID_COLUMNS: &str = "template_grid_columns";
    pub const SPACING: &str = "template_spacing";
    pub const CORNER_RADIUS: &str = "template_corner_radius";
    pub const ANIMATION_SPEED: &str = "template_animation_speed";
    pub const HOVER_SCALE: &str = "template_hover_scale";

    /// Prefix marking a key as template-scoped
    pub const TEMPLATE_PREFIX: &str = "template_";

    /// Keys nulled by "reset to template defaults"
    pub const RESET_KEYS: &[&str] = &[
        BACKGROUND_COLOR,
        TEXT_COLOR,
        ACCENT_COLOR,
        HERO_HEADING,
        HERO_SUBTITLE,
        BUTTON_TEXT,
        DESCRIPTION_TEXT,
        DESCRIPTION_COLOR,
        DESCRIPTION_SIZE,
        DESCRIPTION_WEIGHT,
        DESCRIPTION_STYLE,
    ];

    /// Store identity keys carried into a template's first snapshot
    pub const IDENTITY_KEYS: &[&str] = &[STORE_NAME, LOGO_URL, CURRENCY];

    /// Whether the key holds template-scoped appearance
    pub fn is_template_scoped(key: &str) -> bool {
        key.starts_with(TEMPLATE_PREFIX)
    }
}

/// The ordered set of required edit paths and settings keys
#[derive(Debug, Clone, Copy)]
pub struct EditContract {
    pub edit_paths: &'static [&'static str],
    pub setting_keys: &'static [&'static str],
}

/// The contract every ready template implements
pub const CONTRACT: EditContract = EditContract {
    edit_paths: &[
        paths::ROOT,
        paths::STORE_NAME,
        paths::HEADER,
        paths::HEADER_LOGO,
        paths::HEADER_NAV,
        paths::HERO,
        paths::HERO_TITLE,
        paths::HERO_SUBTITLE,
        paths::HERO_BUTTON,
        paths::HERO_IMAGE,
        paths::PRODUCTS,
        paths::PRODUCTS_TITLE,
        paths::PRODUCT_CARD,
        paths::DESCRIPTION,
        paths::FOOTER,
        paths::FOOTER_TEXT,
        paths::FOOTER_SOCIAL,
    ],
    setting_keys: &[
        keys::TEMPLATE,
        keys::STORE_NAME,
        keys::LOGO_URL,
        keys::CURRENCY,
        keys::BACKGROUND_COLOR,
        keys::TEXT_COLOR,
        keys::ACCENT_COLOR,
        keys::HERO_HEADING,
        keys::HERO_SUBTITLE,
        keys::HERO_IMAGE,
        keys::BUTTON_TEXT,
        keys::DESCRIPTION_TEXT,
        keys::DESCRIPTION_COLOR,
        keys::DESCRIPTION_SIZE,
        keys::DESCRIPTION_WEIGHT,
        keys::DESCRIPTION_STYLE,
        keys::PRODUCTS_HEADING,
        keys::FOOTER_TEXT,
        keys::SOCIAL_LINKS,
        keys::GRID_COLUMNS,
        keys::SPACING,
        keys::CORNER_RADIUS,
        keys::ANIMATION_SPEED,
        keys::HOVER_SCALE,
    ],
};

/// Outcome of checking a rendered tree against the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractReport {
    /// Required paths with no carrying node, in contract order
    pub missing: Vec<String>,
    /// Paths present in the tree that the contract does not name
    pub unknown: Vec<String>,
}

impl ContractReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn an incomplete report into a contract violation
    pub fn into_result(self, template: &str) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ContractViolation {
                template: template.to_string(),
                missing: self.missing,
            })
        }
    }
}

impl EditContract {
    /// Check that every required path is carried by at least one node
    pub fn check(&self, tree: &NodeTree) -> ContractReport {
        let present = tree.edit_paths();
        let missing = self
            .edit_paths
            .iter()
            .filter(|p| !present.contains(**p))
            .map(|p| (*p).to_string())
            .collect();
        let unknown = present
            .into_iter()
            .filter(|p| !self.is_edit_path(p))
            .collect();
        ContractReport { missing, unknown }
    }

    pub fn is_edit_path(&self, path: &str) -> bool {
        self.edit_paths.iter().any(|p| *p == path)
            || path
                .strip_prefix(paths::SETTINGS)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }

    /// Settings keys the side panel shows for a selected path
    pub fn bound_keys(&self, path: &str) -> &'static [&'static str] {
        use keys::*;
        match path {
            paths::ROOT => &[BACKGROUND_COLOR, TEXT_COLOR, ACCENT_COLOR, SPACING, CORNER_RADIUS],
            paths::SETTINGS => &[STORE_NAME, LOGO_URL, CURRENCY],
            paths::STORE_NAME => &[STORE_NAME],
            paths::HEADER | paths::HEADER_LOGO => &[LOGO_URL, STORE_NAME],
            paths::HERO => &[HERO_HEADING, HERO_SUBTITLE, BUTTON_TEXT, HERO_IMAGE],
            paths::HERO_TITLE => &[HERO_HEADING],
            paths::HERO_SUBTITLE => &[HERO_SUBTITLE],
            paths::HERO_BUTTON => &[BUTTON_TEXT],
            paths::HERO_IMAGE => &[HERO_IMAGE],
            paths::PRODUCTS => &[PRODUCTS_HEADING, GRID_COLUMNS],
            paths::PRODUCTS_TITLE => &[PRODUCTS_HEADING],
            paths::PRODUCT_CARD => &[CORNER_RADIUS, HOVER_SCALE, ANIMATION_SPEED],
            paths::DESCRIPTION => &[
                DESCRIPTION_TEXT,
                DESCRIPTION_COLOR,
                DESCRIPTION_SIZE,
                DESCRIPTION_WEIGHT,
                DESCRIPTION_STYLE,
            ],
            paths::FOOTER | paths::FOOTER_TEXT => &[FOOTER_TEXT],
            paths::FOOTER_SOCIAL => &[SOCIAL_LINKS],
            other => match other.strip_prefix("__settings.") {
                Some(key) => match IDENTITY_KEYS.iter().position(|k| *k == key) {
                    Some(i) => &IDENTITY_KEYS[i..=i],
                    None => &[],
                },
                None => &[],
            },
        }
    }

    /// Whether a settings key is one of, or namespaced under, the allowed keys
    pub fn allows_key(&self, key: &str) -> bool {
        self.setting_keys.iter().any(|allowed| {
            key == *allowed
                || key
                    .strip_prefix(allowed)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with("__"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::EDIT_PATH_ATTR;

    #[test]
    fn test_reset_keys_are_template_scoped_and_allowed() {
        for key in keys::RESET_KEYS {
            assert!(keys::is_template_scoped(key), "{key}");
            assert!(CONTRACT.allows_key(key), "{key}");
        }
    }

    #[test]
    fn test_identity_keys_are_not_template_scoped() {
        for key in keys::IDENTITY_KEYS {
            assert!(!keys::is_template_scoped(key));
        }
    }

    #[test]
    fn test_allows_namespaced_keys() {
        assert!(CONTRACT.allows_key("template_social_links.instagram"));
        assert!(CONTRACT.allows_key("template_hero_heading__mobile"));
        assert!(!CONTRACT.allows_key("template_hero_headingx"));
        assert!(!CONTRACT.allows_key("billing_plan"));
    }

    #[test]
    fn test_every_path_binds_allowed_keys() {
        for path in CONTRACT.edit_paths {
            if *path == paths::HEADER_NAV {
                continue;
            }
            let bound = CONTRACT.bound_keys(path);
            assert!(!bound.is_empty(), "{path}");
            assert!(bound.iter().all(|k| CONTRACT.allows_key(k)), "{path}");
        }
        assert_eq!(CONTRACT.bound_keys("__settings.currency"), &[keys::CURRENCY]);
        assert!(CONTRACT.bound_keys("layout.unknown").is_empty());
    }

    #[test]
    fn test_settings_root_paths_are_known() {
        assert!(CONTRACT.is_edit_path("__settings"));
        assert!(CONTRACT.is_edit_path("__settings.currency"));
        assert!(!CONTRACT.is_edit_path("__settingsx"));
    }

    #[test]
    fn test_check_reports_missing_in_contract_order() {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        tree.set_attr(root, EDIT_PATH_ATTR, paths::ROOT);
        let hero = tree.append_element(root, "section");
        tree.set_attr(hero, EDIT_PATH_ATTR, paths::HERO);
        let extra = tree.append_element(root, "div");
        tree.set_attr(extra, EDIT_PATH_ATTR, "layout.banner");

        let report = CONTRACT.check(&tree);
        assert!(!report.is_complete());
        assert_eq!(report.missing.first().map(String::as_str), Some(paths::STORE_NAME));
        assert!(!report.missing.contains(&paths::HERO.to_string()));
        assert_eq!(report.unknown, vec!["layout.banner".to_string()]);
        assert!(matches!(
            report.into_result("draft"),
            Err(Error::ContractViolation { .. })
        ));
    }
}
