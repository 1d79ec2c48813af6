//! Product images and broken-media recovery

use crate::render::Product;
use crate::tree::{NodeId, NodeTree};
use log::debug;

/// Marks media whose load failures are recovered; holds the placeholder path
pub const MEDIA_GUARD_ATTR: &str = "data-media-guard";

/// First non-empty product image, else the placeholder
pub fn product_image<'a>(product: &'a Product, placeholder: &'a str) -> &'a str {
    product
        .images
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(placeholder)
}

/// What happened to a media node that failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRecovery {
    /// Image source replaced with the placeholder
    Swapped,
    /// Image already shows the placeholder; left alone
    AlreadyPlaceholder,
    /// Video hidden
    Hidden,
    /// Not guarded media
    Ignored,
}

/// Attach recovery to every `<img>` and `<video>` in the tree
///
/// Called after every render so fresh nodes are covered. Returns how many
/// nodes are guarded.
pub fn guard_media(tree: &mut NodeTree, placeholder: &str) -> usize {
    let media: Vec<NodeId> = tree
        .elements_by_tag("img")
        .chain(tree.elements_by_tag("video"))
        .collect();
    for &id in &media {
        tree.set_attr(id, MEDIA_GUARD_ATTR, placeholder);
    }
    media.len()
}

/// Handle a load failure on `id`
///
/// Images are swapped to the placeholder once: a failing placeholder is not
/// swapped again. Videos are hidden.
pub fn recover_media_error(tree: &mut NodeTree, id: NodeId) -> MediaRecovery {
    let Some(placeholder) = tree.attr(id, MEDIA_GUARD_ATTR).map(str::to_string) else {
        return MediaRecovery::Ignored;
    };
    match tree.node(id).and_then(|n| n.tag()) {
        Some("img") => {
            if tree.attr(id, "src") == Some(placeholder.as_str()) {
                return MediaRecovery::AlreadyPlaceholder;
            }
            debug!("Swapping broken image for {placeholder}");
            tree.set_attr(id, "src", placeholder);
            MediaRecovery::Swapped
        }
        Some("video") => {
            tree.set_attr(id, "hidden", "hidden");
            tree.set_attr(id, "style", "display:none");
            MediaRecovery::Hidden
        }
        _ => MediaRecovery::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_image_skips_blank_entries() {
        let mut product = Product::new("p1", "Tote", 10.0);
        assert_eq!(product_image(&product, "/ph.png"), "/ph.png");
        product.images = vec!["".into(), "  ".into(), "/tote.jpg".into()];
        assert_eq!(product_image(&product, "/ph.png"), "/tote.jpg");
    }

    #[test]
    fn test_image_swaps_once() {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        let img = tree.append_element(root, "img");
        tree.set_attr(img, "src", "/broken.jpg");
        assert_eq!(guard_media(&mut tree, "/ph.png"), 1);

        assert_eq!(recover_media_error(&mut tree, img), MediaRecovery::Swapped);
        assert_eq!(tree.attr(img, "src"), Some("/ph.png"));
        assert_eq!(
            recover_media_error(&mut tree, img),
            MediaRecovery::AlreadyPlaceholder
        );
        assert_eq!(tree.attr(img, "src"), Some("/ph.png"));
    }

    #[test]
    fn test_video_is_hidden_and_unguarded_ignored() {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        let video = tree.append_element(root, "video");
        let stray = tree.append_element(root, "img");

        assert_eq!(recover_media_error(&mut tree, stray), MediaRecovery::Ignored);

        guard_media(&mut tree, "/ph.png");
        assert_eq!(recover_media_error(&mut tree, video), MediaRecovery::Hidden);
        assert_eq!(tree.attr(video, "hidden"), Some("hidden"));
    }
}
