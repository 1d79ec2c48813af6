//! Documents a preview tree can be mounted into

use crate::selection::apply_highlight;
use crate::tree::{NodeId, NodeTree};
use std::collections::HashSet;

/// Marks head entries copied from the host document
pub const MIRRORED_ATTR: &str = "data-vitrine-mirrored";

/// Id of the container the preview tree is mounted into
pub const PREVIEW_ROOT_ID: &str = "vitrine-preview-root";

/// A stylesheet source in a document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadEntry {
    Stylesheet { href: String },
    InlineStyle { css: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeadItem {
    entry: HeadEntry,
    mirrored: bool,
}

/// A document: head styles, root attributes and a body tree
#[derive(Debug, Clone)]
pub struct Document {
    head: Vec<HeadItem>,
    lang: Option<String>,
    dir: Option<String>,
    body: NodeTree,
    container: Option<NodeId>,
    mounted: Option<NodeId>,
    onscreen: HashSet<NodeId>,
    scrolled_to: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document, as loaded from a blank shell
    pub fn new() -> Self {
        Self {
            head: Vec::new(),
            lang: None,
            dir: None,
            body: NodeTree::new("body"),
            container: None,
            mounted: None,
            onscreen: HashSet::new(),
            scrolled_to: None,
        }
    }

    #[must_use]
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.add_head(HeadEntry::Stylesheet { href: href.into() });
        self
    }

    #[must_use]
    pub fn with_inline_style(mut self, css: impl Into<String>) -> Self {
        self.add_head(HeadEntry::InlineStyle { css: css.into() });
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn add_head(&mut self, entry: HeadEntry) {
        self.head.push(HeadItem {
            entry,
            mirrored: false,
        });
    }

    /// Head entries with whether each was mirrored from a host
    pub fn head(&self) -> impl Iterator<Item = (&HeadEntry, bool)> {
        self.head.iter().map(|item| (&item.entry, item.mirrored))
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    pub fn set_lang(&mut self, lang: Option<String>) {
        self.lang = lang;
    }

    pub fn set_dir(&mut self, dir: Option<String>) {
        self.dir = dir;
    }

    /// Replace previously mirrored head entries with the host's own entries,
    /// and copy its language and direction
    pub fn sync_from(&mut self, host: &Document) {
        self.head.retain(|item| !item.mirrored);
        self.head.extend(
            host.head
                .iter()
                .filter(|item| !item.mirrored)
                .map(|item| HeadItem {
                    entry: item.entry.clone(),
                    mirrored: true,
                }),
        );
        self.lang = host.lang.clone();
        self.dir = host.dir.clone();
    }

    pub fn body(&self) -> &NodeTree {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut NodeTree {
        &mut self.body
    }

    fn ensure_container(&mut self) -> NodeId {
        if let Some(id) = self.container {
            return id;
        }
        let root = self.body.root();
        let id = self.body.append_element(root, "div");
        self.body.set_attr(id, "id", PREVIEW_ROOT_ID);
        self.container = Some(id);
        id
    }

    /// Replace whatever is mounted with a copy of `tree`
    pub fn mount(&mut self, tree: &NodeTree) -> NodeId {
        let container = self.ensure_container();
        self.body.clear_children(container);
        let root = self.body.mount(container, tree);
        self.mounted = Some(root);
        self.onscreen.clear();
        self.scrolled_to = None;
        root
    }

    pub fn unmount(&mut self) {
        if let Some(container) = self.container {
            self.body.clear_children(container);
        }
        self.mounted = None;
        self.onscreen.clear();
        self.scrolled_to = None;
    }

    /// Root of the mounted preview tree
    pub fn mounted(&self) -> Option<NodeId> {
        self.mounted
    }

    /// Record which nodes are currently inside the visible scroll area
    pub fn set_onscreen(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.onscreen = nodes.into_iter().collect();
    }

    /// Node most recently scrolled into view by a highlight
    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        let mut head = NodeTree::new("head");
        let root = head.root();
        for item in &self.head {
            let id = match &item.entry {
                HeadEntry::Stylesheet { href } => {
                    let id = head.append_element(root, "link");
                    head.set_attr(id, "rel", "stylesheet");
                    head.set_attr(id, "href", href.as_str());
                    id
                }
                HeadEntry::InlineStyle { css } => {
                    let id = head.append_element(root, "style");
                    head.append_text(id, css.as_str());
                    id
                }
            };
            if item.mirrored {
                head.set_attr(id, MIRRORED_ATTR, "true");
            }
        }

        let mut html = NodeTree::new("html");
        let html_root = html.root();
        if let Some(lang) = &self.lang {
            html.set_attr(html_root, "lang", lang.as_str());
        }
        if let Some(dir) = &self.dir {
            html.set_attr(html_root, "dir", dir.as_str());
        }
        html.mount(html_root, &head);
        html.mount(html_root, &self.body);
        format!("<!DOCTYPE html>{}", html.to_html())
    }

    /// Highlight the selected path in the mounted tree, scrolling to it when
    /// it is offscreen
    pub fn highlight(&mut self, selected: Option<&str>) -> Option<NodeId> {
        self.mounted?;
        let node = apply_highlight(&mut self.body, selected)?;
        if !self.onscreen.contains(&node) {
            self.scrolled_to = Some(node);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{EDIT_PATH_ATTR, HIGHLIGHT_ATTR};

    fn preview() -> NodeTree {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        tree.set_attr(root, EDIT_PATH_ATTR, "__root");
        let title = tree.append_element(root, "h1");
        tree.set_attr(title, EDIT_PATH_ATTR, "layout.hero.title");
        tree
    }

    #[test]
    fn test_sync_replaces_mirrored_entries_only() {
        let host = Document::new()
            .with_stylesheet("/app.css")
            .with_inline_style(":root{--x:1}")
            .with_lang("ar")
            .with_dir("rtl");
        let mut frame = Document::new().with_inline_style("body{margin:0}");

        frame.sync_from(&host);
        frame.sync_from(&host);

        let entries: Vec<_> = frame.head().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.iter().filter(|(_, mirrored)| *mirrored).count(), 2);
        assert_eq!(frame.lang(), Some("ar"));
        assert_eq!(frame.dir(), Some("rtl"));
    }

    #[test]
    fn test_html_tags_mirrored_styles() {
        let host = Document::new().with_stylesheet("/app.css").with_dir("rtl");
        let mut frame = Document::new();
        frame.sync_from(&host);
        let html = frame.to_html();
        assert!(html.starts_with("<!DOCTYPE html><html dir=\"rtl\"><head>"));
        assert!(html.contains(
            "<link rel=\"stylesheet\" href=\"/app.css\" data-vitrine-mirrored=\"true\">"
        ));
    }

    #[test]
    fn test_remount_replaces_previous_tree() {
        let mut doc = Document::new();
        doc.mount(&preview());
        doc.mount(&preview());
        assert_eq!(doc.body().edit_paths().len(), 2);
        assert_eq!(
            doc.body()
                .nodes_with_attr(EDIT_PATH_ATTR)
                .filter(|&id| doc.body().attr(id, EDIT_PATH_ATTR) == Some("__root"))
                .count(),
            1
        );
    }

    #[test]
    fn test_highlight_scrolls_only_when_offscreen() {
        let mut doc = Document::new();
        doc.mount(&preview());

        let node = doc.highlight(Some("layout.hero.title")).unwrap();
        assert_eq!(doc.scrolled_to(), Some(node));
        assert_eq!(doc.body().attr(node, HIGHLIGHT_ATTR), Some("true"));

        let mut doc = Document::new();
        doc.mount(&preview());
        let title = doc.body().find_first(EDIT_PATH_ATTR, "layout.hero.title").unwrap();
        doc.set_onscreen([title]);
        doc.highlight(Some("layout.hero.title"));
        assert_eq!(doc.scrolled_to(), None);
    }

    #[test]
    fn test_highlight_without_mount_is_noop() {
        let mut doc = Document::new();
        assert_eq!(doc.highlight(Some("layout.hero.title")), None);
    }
}
