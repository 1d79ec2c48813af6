//! Bags: leather goods, split hero and story-first layout

use crate::registry::{TemplateId, TemplateRenderer};
use crate::render::{FooterLayout, HeaderLayout, HeroLayout, RenderProps, Storefront, Theme};
use crate::tree::NodeTree;

const THEME: Theme = Theme {
    background: "#f7f1ea",
    text: "#3b2a1e",
    accent: "#8b5a2b",
    font_family: "'Playfair Display', Georgia, serif",
    hero_heading: "Crafted to carry everything",
    hero_subtitle: "Hand-stitched leather bags built for decades of use.",
    hero_image: "/images/templates/bags/hero.jpg",
    button_text: "Browse the collection",
    description: "Every bag is cut, stitched and finished by hand in our workshop.",
    description_color: "#5c4633",
    description_size: 18,
    description_weight: "400",
    description_style: "italic",
    products_heading: "The collection",
    footer_text: "Made by hand, made to last.",
    social_links: &["https://instagram.com", "https://pinterest.com"],
    grid_columns: 3,
    spacing: 32,
    corner_radius: 4,
    animation_speed: 400,
    hover_scale: 104,
};

pub struct Bags;

impl TemplateRenderer for Bags {
    fn id(&self) -> TemplateId {
        TemplateId::Bags
    }

    fn display_name(&self) -> &'static str {
        "Leather Bags"
    }

    fn theme(&self) -> &'static Theme {
        &THEME
    }

    fn render(&self, props: &RenderProps<'_>) -> NodeTree {
        let mut page = Storefront::begin(self.id(), &THEME, props);
        let root = page.root();
        page.header(root, HeaderLayout::Inline);
        page.hero(root, HeroLayout::Split);
        page.description(root);
        page.products(root);
        page.footer(root, FooterLayout::Full);
        page.finish()
    }
}
