//! Shared storefront layout
//!
//! Templates differ in fallbacks, section order and a few layout variants.
//! The sections themselves, and their edit-path wiring, live here once.

use crate::contract::{keys, paths};
use crate::region::{Region, interactive};
use crate::registry::TemplateId;
use crate::render::{RenderProps, product_image};
use crate::settings::SettingsBag;
use crate::tree::{EDIT_PATH_ATTR, NodeAction, NodeId, NodeTree};
use crate::viewport::Breakpoint;
use serde_json::Value;

/// Built-in values a template falls back to when a setting is unset
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
    pub font_family: &'static str,

    pub hero_heading: &'static str,
    pub hero_subtitle: &'static str,
    pub hero_image: &'static str,
    pub button_text: &'static str,

    pub description: &'static str,
    pub description_color: &'static str,
    pub description_size: i64,
    pub description_weight: &'static str,
    pub description_style: &'static str,

    pub products_heading: &'static str,
    pub footer_text: &'static str,
    pub social_links: &'static [&'static str],

    pub grid_columns: i64,
    pub spacing: i64,
    pub corner_radius: i64,
    pub animation_speed: i64,
    pub hover_scale: i64,
}

impl Theme {
    /// The template's shipped defaults, as written on first import
    pub fn defaults_bag(&self, id: TemplateId) -> SettingsBag {
        let mut bag = SettingsBag::new()
            .with(keys::TEMPLATE, id.as_str())
            .with(keys::BACKGROUND_COLOR, self.background)
            .with(keys::TEXT_COLOR, self.text)
            .with(keys::ACCENT_COLOR, self.accent)
            .with(keys::HERO_HEADING, self.hero_heading)
            .with(keys::HERO_SUBTITLE, self.hero_subtitle)
            .with(keys::HERO_IMAGE, self.hero_image)
            .with(keys::BUTTON_TEXT, self.button_text)
            .with(keys::DESCRIPTION_TEXT, self.description)
            .with(keys::DESCRIPTION_COLOR, self.description_color)
            .with(keys::DESCRIPTION_SIZE, self.description_size)
            .with(keys::DESCRIPTION_WEIGHT, self.description_weight)
            .with(keys::DESCRIPTION_STYLE, self.description_style)
            .with(keys::PRODUCTS_HEADING, self.products_heading)
            .with(keys::FOOTER_TEXT, self.footer_text)
            .with(keys::GRID_COLUMNS, self.grid_columns)
            .with(keys::SPACING, self.spacing)
            .with(keys::CORNER_RADIUS, self.corner_radius)
            .with(keys::ANIMATION_SPEED, self.animation_speed)
            .with(keys::HOVER_SCALE, self.hover_scale);
        if !self.social_links.is_empty() {
            let links: Vec<Value> = self.social_links.iter().map(|l| Value::from(*l)).collect();
            bag.set(keys::SOCIAL_LINKS, links);
        }
        bag
    }
}

/// Visual values after settings, host colors and theme fallbacks are merged
#[derive(Debug, Clone, PartialEq)]
pub struct Look {
    pub breakpoint: Breakpoint,
    pub background: String,
    pub text: String,
    pub accent: String,
    pub secondary: String,
    pub columns: i64,
    pub spacing: i64,
    pub radius: i64,
    pub animation_ms: i64,
    pub hover_scale: i64,
    pub description_size: i64,
    pub description_weight: String,
    pub description_style: String,
    pub description_color: String,
}

impl Look {
    pub fn resolve(theme: &Theme, props: &RenderProps<'_>) -> Self {
        let s = props.settings;
        let breakpoint = props.viewport.breakpoint();
        let pick = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };

        Self {
            breakpoint,
            background: pick(&s.background_color, theme.background),
            text: pick(&s.text_color, theme.text),
            accent: s
                .accent_color
                .clone()
                .or_else(|| props.primary_color.map(str::to_string))
                .unwrap_or_else(|| theme.accent.to_string()),
            secondary: props
                .secondary_color
                .unwrap_or(theme.background)
                .to_string(),
            columns: breakpoint.cap_columns(s.grid_columns.get(theme.grid_columns)),
            spacing: s.spacing.get(theme.spacing),
            radius: s.corner_radius.get(theme.corner_radius),
            animation_ms: s.animation_speed.get(theme.animation_speed),
            hover_scale: s.hover_scale.get(theme.hover_scale),
            description_size: s.description_size.get(theme.description_size),
            description_weight: pick(&s.description_weight, theme.description_weight),
            description_style: pick(&s.description_style, theme.description_style),
            description_color: pick(&s.description_color, theme.description_color),
        }
    }

    fn css_vars(&self, font_family: &str) -> String {
        format!(
            "--sf-bg:{};--sf-text:{};--sf-accent:{};--sf-secondary:{};--sf-radius:{}px;\
             --sf-spacing:{}px;--sf-speed:{}ms;--sf-hover:{:.2};font-family:{}",
            self.background,
            self.text,
            self.accent,
            self.secondary,
            self.radius,
            self.spacing,
            self.animation_ms,
            self.hover_scale as f64 / 100.0,
            font_family,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Logo left, navigation right
    Inline,
    /// Logo and name stacked over centered navigation
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroLayout {
    /// Full-width image behind the copy
    Banner,
    /// Copy and image side by side (stacked on mobile)
    Split,
    /// Centered copy with the image below it
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterLayout {
    /// Footer text and social links
    Full,
    /// Footer text only
    TextOnly,
}

/// A storefront tree under construction
pub struct Storefront<'a> {
    props: RenderProps<'a>,
    theme: &'static Theme,
    look: Look,
    tree: NodeTree,
}

impl<'a> Storefront<'a> {
    /// Start a tree whose root is the whole-page region
    pub fn begin(id: TemplateId, theme: &'static Theme, props: &RenderProps<'a>) -> Self {
        let look = Look::resolve(theme, props);
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        tree.set_attr(root, EDIT_PATH_ATTR, paths::ROOT);
        tree.set_attr(root, "class", format!("storefront storefront--{id}"));
        tree.set_attr(root, "data-breakpoint", look.breakpoint.as_str());
        tree.set_attr(root, "style", look.css_vars(theme.font_family));
        if props.manage {
            tree.set_action(root, Some(NodeAction::Select(paths::ROOT.to_string())));
        }

        Self {
            props: *props,
            theme,
            look,
            tree,
        }
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn look(&self) -> &Look {
        &self.look
    }

    pub fn manage(&self) -> bool {
        self.props.manage
    }

    pub fn finish(self) -> NodeTree {
        self.tree
    }

    /// Plain, non-editable wrapper element
    pub fn element(&mut self, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let id = self.tree.append_element(parent, tag);
        self.tree.set_attr(id, "class", class);
        id
    }

    fn place(&mut self, region: Region<'_>, parent: NodeId) -> Option<NodeId> {
        region.render(&mut self.tree, parent, self.props.manage)
    }

    fn home_route(&self) -> String {
        format!("/{}", self.props.store_slug)
    }

    // =========================================================================
    // Sections
    // =========================================================================

    pub fn header(&mut self, parent: NodeId, layout: HeaderLayout) -> Option<NodeId> {
        let class = match layout {
            HeaderLayout::Inline => "sf-header sf-header--inline",
            HeaderLayout::Centered => "sf-header sf-header--centered",
        };
        let header = self.place(Region::new(paths::HEADER, "header").class(class), parent)?;

        let settings = self.props.settings;
        let store_name = settings.store_name.clone().unwrap_or_default();
        let brand = self.element(header, "div", "sf-brand");

        let logo = Region::new(paths::HEADER_LOGO, "a")
            .class("sf-logo")
            .attr("href", self.home_route())
            .on_click(NodeAction::Navigate(self.home_route()));
        if let Some(logo) = self.place(logo, brand) {
            match &settings.logo_url {
                Some(url) => {
                    let img = self.tree.append_element(logo, "img");
                    self.tree.set_attr(img, "src", url.as_str());
                    self.tree.set_attr(img, "alt", store_name.as_str());
                }
                None => {
                    let initial = store_name
                        .chars()
                        .next()
                        .or_else(|| self.props.store_slug.chars().next())
                        .map(|c| c.to_uppercase().to_string())
                        .unwrap_or_default();
                    self.tree.append_text(logo, initial);
                }
            }
        }

        self.place(
            Region::new(paths::STORE_NAME, "span")
                .class("sf-store-name")
                .text(store_name)
                .optional(),
            brand,
        );

        if let Some(nav) = self.place(
            Region::new(paths::HEADER_NAV, "nav").class("sf-nav"),
            header,
        ) {
            let shop = format!("{}#products", self.home_route());
            self.nav_link(nav, "Shop", NodeAction::Navigate(shop));

            let products = self.props.products;
            let mut categories: Vec<&str> = products
                .iter()
                .filter_map(|p| p.category.as_deref())
                .filter(|c| !c.is_empty())
                .collect();
            categories.sort_unstable();
            categories.dedup();
            for category in categories {
                let route = format!("{}?category={category}", self.home_route());
                self.nav_link(nav, category, NodeAction::Navigate(route));
            }
        }
        Some(header)
    }

    fn nav_link(&mut self, nav: NodeId, label: &str, action: NodeAction) {
        let link = self.element(nav, "a", "sf-nav-link");
        if let NodeAction::Navigate(route) = &action {
            self.tree.set_attr(link, "href", route.as_str());
        }
        self.tree.append_text(link, label);
        interactive(&mut self.tree, link, action, self.props.manage);
    }

    pub fn hero(&mut self, parent: NodeId, layout: HeroLayout) -> Option<NodeId> {
        let class = match layout {
            HeroLayout::Banner => "sf-hero sf-hero--banner",
            HeroLayout::Split => "sf-hero sf-hero--split",
            HeroLayout::Centered => "sf-hero sf-hero--centered",
        };
        let padding = self.look.spacing * 2;
        let hero = self.place(
            Region::new(paths::HERO, "section")
                .class(class)
                .style(format!("padding:{padding}px {}px", self.look.spacing)),
            parent,
        )?;

        let s = self.props.settings;
        let heading = s
            .hero_heading
            .clone()
            .unwrap_or_else(|| self.theme.hero_heading.to_string());
        let image_src = s
            .hero_image
            .clone()
            .or_else(|| self.props.banner_url.map(str::to_string))
            .unwrap_or_else(|| self.theme.hero_image.to_string());
        let image = Region::new(paths::HERO_IMAGE, "img")
            .class("sf-hero-image")
            .src(image_src)
            .attr("alt", heading.clone())
            .optional();

        if layout == HeroLayout::Banner {
            self.place(image.clone(), hero);
        }
        let copy = self.element(hero, "div", "sf-hero-copy");

        self.place(
            Region::new(paths::HERO_TITLE, "h1")
                .class("sf-hero-title")
                .text(heading),
            copy,
        );
        self.place(
            Region::new(paths::HERO_SUBTITLE, "p")
                .class("sf-hero-subtitle")
                .text(
                    s.hero_subtitle
                        .clone()
                        .unwrap_or_else(|| self.theme.hero_subtitle.to_string()),
                )
                .optional(),
            copy,
        );
        let shop = format!("{}#products", self.home_route());
        self.place(
            Region::new(paths::HERO_BUTTON, "a")
                .class("sf-button")
                .attr("href", shop.clone())
                .style(format!(
                    "background:{};border-radius:{}px",
                    self.look.accent, self.look.radius
                ))
                .text(
                    s.button_text
                        .clone()
                        .unwrap_or_else(|| self.theme.button_text.to_string()),
                )
                .on_click(NodeAction::Navigate(shop))
                .optional(),
            copy,
        );

        if layout != HeroLayout::Banner {
            self.place(image, hero);
        }
        Some(hero)
    }

    pub fn products(&mut self, parent: NodeId) -> Option<NodeId> {
        let section = self.place(
            Region::new(paths::PRODUCTS, "section")
                .class("sf-products")
                .attr("id", "products"),
            parent,
        )?;

        let heading = self
            .props
            .settings
            .products_heading
            .clone()
            .unwrap_or_else(|| self.theme.products_heading.to_string());
        self.place(
            Region::new(paths::PRODUCTS_TITLE, "h2")
                .class("sf-products-title")
                .text(heading)
                .optional(),
            section,
        );

        let columns = self.look.columns;
        let grid = self.element(section, "div", "sf-grid");
        self.tree.set_attr(grid, "data-columns", columns.to_string());
        self.tree.set_attr(
            grid,
            "style",
            format!(
                "display:grid;grid-template-columns:repeat({columns},minmax(0,1fr));gap:{}px",
                self.look.spacing
            ),
        );

        let products = self.props.visible_products();
        if products.is_empty() {
            self.place(
                Region::new(paths::PRODUCT_CARD, "article")
                    .class("sf-card")
                    .text("")
                    .optional(),
                grid,
            );
            return Some(section);
        }

        let card_style = format!(
            "border-radius:{}px;transition:transform {}ms",
            self.look.radius, self.look.animation_ms
        );
        for product in products {
            let route = format!("{}/products/{}", self.home_route(), product.slug);
            let Some(card) = self.place(
                Region::new(paths::PRODUCT_CARD, "article")
                    .class("sf-card")
                    .style(card_style.clone())
                    .attr("data-product-id", product.id.clone())
                    .on_click(NodeAction::Navigate(route)),
                grid,
            ) else {
                continue;
            };

            let img = self.element(card, "img", "sf-card-image");
            self.tree
                .set_attr(img, "src", product_image(product, self.props.placeholder_image));
            self.tree.set_attr(img, "alt", product.name.as_str());

            let name = self.element(card, "h3", "sf-card-name");
            self.tree.append_text(name, product.name.as_str());

            let price = self.element(card, "span", "sf-card-price");
            let label = self.props.price(product.price);
            self.tree.append_text(price, label);

            let button = self.element(card, "button", "sf-add-to-cart");
            self.tree.append_text(button, "Add to cart");
            interactive(
                &mut self.tree,
                button,
                NodeAction::AddToCart(product.id.clone()),
                self.props.manage,
            );
        }
        Some(section)
    }

    pub fn description(&mut self, parent: NodeId) -> Option<NodeId> {
        let text = self
            .props
            .settings
            .description_text
            .clone()
            .unwrap_or_else(|| self.theme.description.to_string());
        let style = format!(
            "color:{};font-size:{}px;font-weight:{};font-style:{}",
            self.look.description_color,
            self.look.description_size,
            self.look.description_weight,
            self.look.description_style,
        );
        self.place(
            Region::new(paths::DESCRIPTION, "section")
                .class("sf-description")
                .style(style)
                .text(text)
                .optional(),
            parent,
        )
    }

    pub fn footer(&mut self, parent: NodeId, layout: FooterLayout) -> Option<NodeId> {
        let footer = self.place(Region::new(paths::FOOTER, "footer").class("sf-footer"), parent)?;

        let text = self
            .props
            .settings
            .footer_text
            .clone()
            .unwrap_or_else(|| self.theme.footer_text.to_string());
        self.place(
            Region::new(paths::FOOTER_TEXT, "p")
                .class("sf-footer-text")
                .text(text)
                .optional(),
            footer,
        );

        if layout == FooterLayout::Full {
            let links = self.props.settings.social_links.clone().unwrap_or_else(|| {
                self.theme
                    .social_links
                    .iter()
                    .map(|l| (*l).to_string())
                    .collect()
            });
            let list = self.element(footer, "div", "sf-social");
            if links.is_empty() {
                self.place(
                    Region::new(paths::FOOTER_SOCIAL, "a")
                        .class("sf-social-link")
                        .text("")
                        .optional(),
                    list,
                );
            }
            for link in links {
                self.place(
                    Region::new(paths::FOOTER_SOCIAL, "a")
                        .class("sf-social-link")
                        .attr("href", link.clone())
                        .attr("rel", "noopener")
                        .text(social_label(&link))
                        .on_click(NodeAction::OpenExternal(link)),
                    list,
                );
            }
        }
        Some(footer)
    }
}

/// Host part of a link, e.g. `instagram.com` for `https://www.instagram.com/acme`
fn social_label(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split('/').next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
