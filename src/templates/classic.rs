//! Classic: the general-purpose default storefront

use crate::registry::{TemplateId, TemplateRenderer};
use crate::render::{FooterLayout, HeaderLayout, HeroLayout, RenderProps, Storefront, Theme};
use crate::tree::NodeTree;

const THEME: Theme = Theme {
    background: "#ffffff",
    text: "#1f2933",
    accent: "#2563eb",
    font_family: "'Inter', system-ui, sans-serif",
    hero_heading: "Welcome to our store",
    hero_subtitle: "Quality products, delivered to your door.",
    hero_image: "/images/templates/classic/hero.jpg",
    button_text: "Shop now",
    description: "We are a small team that cares about every order.",
    description_color: "#4b5563",
    description_size: 16,
    description_weight: "400",
    description_style: "normal",
    products_heading: "Featured products",
    footer_text: "Thank you for shopping with us.",
    social_links: &["https://instagram.com", "https://facebook.com"],
    grid_columns: 3,
    spacing: 24,
    corner_radius: 8,
    animation_speed: 250,
    hover_scale: 103,
};

pub struct Classic;

impl TemplateRenderer for Classic {
    fn id(&self) -> TemplateId {
        TemplateId::Classic
    }

    fn display_name(&self) -> &'static str {
        "Classic"
    }

    fn theme(&self) -> &'static Theme {
        &THEME
    }

    fn render(&self, props: &RenderProps<'_>) -> NodeTree {
        let mut page = Storefront::begin(self.id(), &THEME, props);
        let root = page.root();
        page.header(root, HeaderLayout::Inline);
        page.hero(root, HeroLayout::Banner);
        page.products(root);
        page.description(root);
        page.footer(root, FooterLayout::Full);
        page.finish()
    }
}
