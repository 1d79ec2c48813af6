//! Gold: jewelry storefront
//!
//! Not ready: the footer has no social links region yet.

use crate::registry::{TemplateId, TemplateRenderer};
use crate::render::{FooterLayout, HeaderLayout, HeroLayout, RenderProps, Storefront, Theme};
use crate::tree::NodeTree;

const THEME: Theme = Theme {
    background: "#0f0f0f",
    text: "#f5f0e1",
    accent: "#d4af37",
    font_family: "'Cinzel', Georgia, serif",
    hero_heading: "Timeless pieces in solid gold",
    hero_subtitle: "Certified 18k jewelry, designed in-house.",
    hero_image: "/images/templates/gold/hero.jpg",
    button_text: "View jewelry",
    description: "Each piece ships with a certificate of authenticity.",
    description_color: "#cfc6ad",
    description_size: 16,
    description_weight: "400",
    description_style: "normal",
    products_heading: "New arrivals",
    footer_text: "Fine jewelry since 1987.",
    social_links: &[],
    grid_columns: 4,
    spacing: 24,
    corner_radius: 0,
    animation_speed: 350,
    hover_scale: 105,
};

pub struct Gold;

impl TemplateRenderer for Gold {
    fn id(&self) -> TemplateId {
        TemplateId::Gold
    }

    fn display_name(&self) -> &'static str {
        "Gold Jewelry"
    }

    fn theme(&self) -> &'static Theme {
        &THEME
    }

    fn render(&self, props: &RenderProps<'_>) -> NodeTree {
        let mut page = Storefront::begin(self.id(), &THEME, props);
        let root = page.root();
        page.header(root, HeaderLayout::Centered);
        page.hero(root, HeroLayout::Banner);
        page.products(root);
        page.description(root);
        page.footer(root, FooterLayout::TextOnly);
        page.finish()
    }
}
