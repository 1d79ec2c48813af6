//! Wedding: centered, airy layout for bridal stores

use crate::registry::{TemplateId, TemplateRenderer};
use crate::render::{FooterLayout, HeaderLayout, HeroLayout, RenderProps, Storefront, Theme};
use crate::tree::NodeTree;

const THEME: Theme = Theme {
    background: "#fffaf7",
    text: "#4a3b3b",
    accent: "#c9a27e",
    font_family: "'Cormorant Garamond', 'Times New Roman', serif",
    hero_heading: "For the day you will always remember",
    hero_subtitle: "Gowns, veils and accessories for every kind of celebration.",
    hero_image: "/images/templates/wedding/hero.jpg",
    button_text: "Discover",
    description: "Book a private fitting and let us help you find the one.",
    description_color: "#6b5757",
    description_size: 17,
    description_weight: "300",
    description_style: "normal",
    products_heading: "Our pieces",
    footer_text: "With love, from our atelier.",
    social_links: &["https://instagram.com"],
    grid_columns: 2,
    spacing: 40,
    corner_radius: 16,
    animation_speed: 600,
    hover_scale: 102,
};

pub struct Wedding;

impl TemplateRenderer for Wedding {
    fn id(&self) -> TemplateId {
        TemplateId::Wedding
    }

    fn display_name(&self) -> &'static str {
        "Wedding"
    }

    fn theme(&self) -> &'static Theme {
        &THEME
    }

    fn render(&self, props: &RenderProps<'_>) -> NodeTree {
        let mut page = Storefront::begin(self.id(), &THEME, props);
        let root = page.root();
        page.header(root, HeaderLayout::Centered);
        page.hero(root, HeroLayout::Centered);
        page.description(root);
        page.products(root);
        page.footer(root, FooterLayout::Full);
        page.finish()
    }
}
