//! Region rendering
//!
//! Everything a template needs to turn settings and products into a node
//! tree: the props boundary, the shared storefront layout and media helpers.

mod layout;
mod media;

pub use layout::{FooterLayout, HeaderLayout, HeroLayout, Look, Storefront, Theme};
pub use media::{MEDIA_GUARD_ATTR, MediaRecovery, guard_media, product_image, recover_media_error};

use crate::config::DEFAULT_PLACEHOLDER_IMAGE;
use crate::contract::keys;
use crate::registry::TemplateRegistry;
use crate::settings::{SettingsBag, StoreSettings};
use crate::viewport::ViewportContext;
use serde::{Deserialize, Serialize};

/// A product as the storefront shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        let id = id.into();
        Self {
            slug: id.clone(),
            id,
            name: name.into(),
            price,
            images: Vec::new(),
            category: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }
}

/// Formats an amount in a currency for display
pub type PriceFormatter = dyn Fn(f64, &str) -> String + Send + Sync;

/// `"USD 12.50"`
pub fn default_price_format(amount: f64, currency: &str) -> String {
    format!("{currency} {amount:.2}")
}

/// Inputs to a template renderer
///
/// Click behavior is data on the rendered nodes; the selection protocol binds
/// it to the host's navigation and selection handlers at capture time.
#[derive(Clone, Copy)]
pub struct RenderProps<'a> {
    pub store_slug: &'a str,
    pub products: &'a [Product],
    /// Products after the host's search/category filter, if any
    pub filtered_products: Option<&'a [Product]>,
    pub settings: &'a StoreSettings,
    pub format_price: &'a PriceFormatter,
    pub primary_color: Option<&'a str>,
    pub secondary_color: Option<&'a str>,
    pub banner_url: Option<&'a str>,
    pub placeholder_image: &'a str,
    pub manage: bool,
    pub viewport: ViewportContext,
}

impl<'a> RenderProps<'a> {
    pub fn new(store_slug: &'a str, products: &'a [Product], settings: &'a StoreSettings) -> Self {
        Self {
            store_slug,
            products,
            filtered_products: None,
            settings,
            format_price: &default_price_format,
            primary_color: None,
            secondary_color: None,
            banner_url: None,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE,
            manage: false,
            viewport: ViewportContext::default(),
        }
    }

    #[must_use]
    pub fn manage_mode(mut self, manage: bool) -> Self {
        self.manage = manage;
        self
    }

    #[must_use]
    pub fn viewport(mut self, viewport: ViewportContext) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn filtered(mut self, products: &'a [Product]) -> Self {
        self.filtered_products = Some(products);
        self
    }

    #[must_use]
    pub fn price_format(mut self, format: &'a PriceFormatter) -> Self {
        self.format_price = format;
        self
    }

    #[must_use]
    pub fn colors(mut self, primary: Option<&'a str>, secondary: Option<&'a str>) -> Self {
        self.primary_color = primary;
        self.secondary_color = secondary;
        self
    }

    #[must_use]
    pub fn banner(mut self, url: &'a str) -> Self {
        self.banner_url = Some(url);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, path: &'a str) -> Self {
        self.placeholder_image = path;
        self
    }

    /// Products the grid shows
    pub fn visible_products(&self) -> &'a [Product] {
        self.filtered_products.unwrap_or(self.products)
    }

    pub fn price(&self, amount: f64) -> String {
        (self.format_price)(amount, &self.settings.currency)
    }
}

/// One product and minimal settings, rendered in manage mode for
/// conformance checks
pub struct ContractFixture {
    pub products: Vec<Product>,
    pub settings: StoreSettings,
}

impl ContractFixture {
    pub fn new() -> Self {
        let bag = SettingsBag::new().with(keys::STORE_NAME, "Fixture Store");
        Self {
            products: vec![
                Product::new("fixture-1", "Fixture Product", 42.0)
                    .with_image("/images/fixture.jpg"),
            ],
            settings: StoreSettings::resolve(&bag),
        }
    }

    pub fn props(&self) -> RenderProps<'_> {
        RenderProps::new("fixture", &self.products, &self.settings).manage_mode(true)
    }
}

impl Default for ContractFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the public storefront as an HTML document
pub fn render_public_html(registry: &TemplateRegistry, props: &RenderProps<'_>) -> String {
    let public = props.manage_mode(false);
    let template = public.settings.template.as_deref().unwrap_or_default();
    let tree = registry.render(template, &public);

    let title = public.settings.store_name.as_deref().unwrap_or(public.store_slug);
    let mut page = crate::tree::NodeTree::new("title");
    let root = page.root();
    page.append_text(root, title);

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">{}</head><body>{}</body></html>",
        page.to_html(),
        tree.to_html()
    )
}
