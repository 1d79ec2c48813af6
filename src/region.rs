//! Editable regions
//!
//! A [`Region`] is a node bound to an edit path. It owns the manage/public
//! branch so templates only decide markup and content:
//!
//! - manage mode: always rendered (an empty region becomes a zero-content
//!   placeholder), and its only click behavior is selecting the path
//! - public mode: empty optional regions are omitted, and the node carries
//!   its normal storefront action

use crate::tree::{EDIT_PATH_ATTR, EMPTY_ATTR, NodeAction, NodeId, NodeTree};

/// Builder for one editable node
#[derive(Debug, Clone)]
pub struct Region<'p> {
    path: &'p str,
    tag: &'p str,
    text: Option<String>,
    src: Option<String>,
    attrs: Vec<(&'static str, String)>,
    action: Option<NodeAction>,
    optional: bool,
}

impl<'p> Region<'p> {
    pub fn new(path: &'p str, tag: &'p str) -> Self {
        Self {
            path,
            tag,
            text: None,
            src: None,
            attrs: Vec::new(),
            action: None,
            optional: false,
        }
    }

    /// Text content; blank text makes the region empty
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Media source; a blank source makes the region empty
    #[must_use]
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    #[must_use]
    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    /// What a click does on the public storefront
    #[must_use]
    pub fn on_click(mut self, action: NodeAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Allow the public storefront to drop this region when empty
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().is_some_and(|s| s.trim().is_empty());
        blank(&self.text) || blank(&self.src)
    }

    /// Append the region under `parent`
    ///
    /// Returns `None` only in public mode for an empty optional region.
    pub fn render(self, tree: &mut NodeTree, parent: NodeId, manage: bool) -> Option<NodeId> {
        let empty = self.is_empty();
        if empty && self.optional && !manage {
            return None;
        }

        let id = tree.append_element(parent, self.tag);
        tree.set_attr(id, EDIT_PATH_ATTR, self.path);
        for (name, value) in self.attrs {
            tree.set_attr(id, name, value);
        }

        if empty {
            if manage {
                tree.set_attr(id, EMPTY_ATTR, "true");
            }
        } else {
            if let Some(src) = self.src {
                tree.set_attr(id, "src", src);
            }
            if let Some(text) = self.text {
                tree.append_text(id, text);
            }
        }

        let action = if manage {
            Some(NodeAction::Select(self.path.to_string()))
        } else {
            self.action
        };
        tree.set_action(id, action);
        Some(id)
    }
}

/// Attach a public-only action to a node that is not itself a region
///
/// Manage mode never gets storefront behavior.
pub fn interactive(tree: &mut NodeTree, id: NodeId, action: NodeAction, manage: bool) {
    if !manage {
        tree.set_action(id, Some(action));
    }
}
