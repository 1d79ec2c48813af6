//! Rendered node tree
//!
//! Templates render into an arena of element and text nodes. Elements carry
//! string attributes (the edit-path attribute among them) and an optional
//! click action, which is all the selection protocol and the preview
//! surfaces need to know about a rendered storefront.

use indextree::Arena;
pub use indextree::NodeId;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Attribute carrying a node's canonical edit path
pub const EDIT_PATH_ATTR: &str = "data-edit-path";

/// Attribute marking the highlighted (selected) node
pub const HIGHLIGHT_ATTR: &str = "data-edit-selected";

/// Attribute marking a manage-mode placeholder for an empty region
pub const EMPTY_ATTR: &str = "data-edit-empty";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text { text: String },
}

/// What a click on a node does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    /// Manage mode: report the edit path to the editor
    Select(String),
    /// Public mode: go to a storefront route
    Navigate(String),
    /// Public mode: add a product to the cart
    AddToCart(String),
    /// Public mode: open an external link
    OpenExternal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: Vec<(String, String)>,
    pub action: Option<NodeAction>,
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            attrs: Vec::new(),
            action: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            attrs: Vec::new(),
            action: None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }
}

/// Arena-backed tree with a single element root
#[derive(Debug, Clone)]
pub struct NodeTree {
    arena: Arena<Node>,
    root: NodeId,
}

impl NodeTree {
    /// Create a tree whose root is an element with the given tag
    pub fn new(root_tag: &str) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(Node::element(root_tag));
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id).map(|n| n.get())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id).map(|n| n.get_mut())
    }

    /// Whether `id` is a live node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|n| !n.is_removed())
            && id.ancestors(&self.arena).any(|a| a == self.root)
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append(parent, Node::element(tag))
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append(parent, Node::text(text))
    }

    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.arena.new_node(node);
        parent.append(id, &mut self.arena);
        id
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.node_mut(id).and_then(|n| n.remove_attr(name))
    }

    pub fn set_action(&mut self, id: NodeId, action: Option<NodeAction>) {
        if let Some(node) = self.node_mut(id) {
            node.action = action;
        }
    }

    pub fn action(&self, id: NodeId) -> Option<&NodeAction> {
        self.node(id).and_then(|n| n.action.as_ref())
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// All nodes in document order, root first
    pub fn descendants(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root.descendants(&self.arena)
    }

    /// First node in document order whose attribute equals `value`
    pub fn find_first(&self, name: &str, value: &str) -> Option<NodeId> {
        self.descendants()
            .find(|&id| self.attr(id, name) == Some(value))
    }

    /// Every node carrying the attribute, in document order
    pub fn nodes_with_attr<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants()
            .filter(move |&id| self.attr(id, name).is_some())
    }

    /// Nearest node (starting at `id` itself) carrying the attribute
    pub fn closest_with_attr(&self, id: NodeId, name: &str) -> Option<NodeId> {
        if self.arena.get(id).is_none() {
            return None;
        }
        id.ancestors(&self.arena)
            .find(|&a| self.attr(a, name).is_some())
    }

    /// Nearest node (starting at `id` itself) carrying a click action
    pub fn closest_with_action(&self, id: NodeId) -> Option<NodeId> {
        if self.arena.get(id).is_none() {
            return None;
        }
        id.ancestors(&self.arena)
            .find(|&a| self.action(a).is_some())
    }

    /// Distinct edit paths present anywhere in the tree
    pub fn edit_paths(&self) -> BTreeSet<String> {
        self.nodes_with_attr(EDIT_PATH_ATTR)
            .filter_map(|id| self.attr(id, EDIT_PATH_ATTR).map(str::to_string))
            .collect()
    }

    /// Elements with the given tag, in document order
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants()
            .filter(move |&id| self.node(id).and_then(Node::tag) == Some(tag))
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for d in id.descendants(&self.arena) {
            if let Some(Node {
                kind: NodeKind::Text { text },
                ..
            }) = self.node(d)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Deep-copy `other` under `parent`, returning the id of the copied root
    pub fn mount(&mut self, parent: NodeId, other: &NodeTree) -> NodeId {
        self.copy_subtree(parent, other, other.root)
    }

    fn copy_subtree(&mut self, parent: NodeId, other: &NodeTree, src: NodeId) -> NodeId {
        let node = other
            .node(src)
            .cloned()
            .unwrap_or_else(|| Node::element("div"));
        let copied = self.append(parent, node);
        let children: Vec<NodeId> = other.children(src).collect();
        for child in children {
            self.copy_subtree(copied, other, child);
        }
        copied
    }

    /// Detach and drop every child of `id`
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            child.remove_subtree(&mut self.arena);
        }
    }

    /// Serialize to HTML. Actions are not part of the markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text { text } => out.push_str(&escape(text)),
            NodeKind::Element { tag } => {
                let _ = write!(out, "<{tag}");
                for (k, v) in &node.attrs {
                    let _ = write!(out, " {k}=\"{}\"", escape(v));
                }
                if is_void(tag) {
                    out.push_str(">");
                    return;
                }
                out.push('>');
                let children: Vec<NodeId> = self.children(id).collect();
                for child in children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "meta" | "link" | "source" | "input")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        let section = tree.append_element(root, "section");
        tree.set_attr(section, EDIT_PATH_ATTR, "layout.hero");
        let h1 = tree.append_element(section, "h1");
        tree.set_attr(h1, EDIT_PATH_ATTR, "layout.hero.title");
        let text = tree.append_text(h1, "Hello");
        (tree, section, text)
    }

    #[test]
    fn test_closest_with_attr_walks_up_from_text() {
        let (tree, _, text) = sample();
        let found = tree.closest_with_attr(text, EDIT_PATH_ATTR).unwrap();
        assert_eq!(tree.attr(found, EDIT_PATH_ATTR), Some("layout.hero.title"));
    }

    #[test]
    fn test_closest_with_attr_none_at_root() {
        let (tree, _, _) = sample();
        assert!(tree.closest_with_attr(tree.root(), EDIT_PATH_ATTR).is_none());
    }

    #[test]
    fn test_edit_paths_collects_distinct() {
        let (tree, _, _) = sample();
        let paths: Vec<_> = tree.edit_paths().into_iter().collect();
        assert_eq!(paths, vec!["layout.hero", "layout.hero.title"]);
    }

    #[test]
    fn test_mount_deep_copies() {
        let (tree, _, _) = sample();
        let mut host = NodeTree::new("body");
        let root = host.root();
        let container = host.append_element(root, "div");
        host.mount(container, &tree);

        assert_eq!(host.edit_paths(), tree.edit_paths());
        let title = host.find_first(EDIT_PATH_ATTR, "layout.hero.title").unwrap();
        assert_eq!(host.text_content(title), "Hello");
    }

    #[test]
    fn test_clear_children_drops_nodes() {
        let (tree, _, _) = sample();
        let mut host = NodeTree::new("body");
        let root = host.root();
        let mounted = host.mount(root, &tree);
        host.clear_children(root);

        assert!(!host.contains(mounted));
        assert!(host.edit_paths().is_empty());
    }

    #[test]
    fn test_set_attr_replaces_existing() {
        let (mut tree, section, _) = sample();
        tree.set_attr(section, "class", "a");
        tree.set_attr(section, "class", "b");
        assert_eq!(tree.attr(section, "class"), Some("b"));
        assert_eq!(tree.remove_attr(section, "class"), Some("b".to_string()));
        assert_eq!(tree.attr(section, "class"), None);
    }

    #[test]
    fn test_to_html_escapes() {
        let mut tree = NodeTree::new("p");
        let root = tree.root();
        tree.set_attr(root, "title", "a\"b");
        tree.append_text(root, "<b>&");
        let img = tree.append_element(root, "img");
        tree.set_attr(img, "src", "/x.png");

        assert_eq!(
            tree.to_html(),
            "<p title=\"a&quot;b\">&lt;b&gt;&amp;<img src=\"/x.png\"></p>"
        );
    }
}
