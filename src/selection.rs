//! Click capture and selection highlighting
//!
//! Clicks are captured at the outermost container before any inner handler
//! runs. In manage mode the nearest node carrying an edit path wins and the
//! event goes no further; in public mode the nearest node's action runs.

use crate::events::EventManager;
use crate::tree::{EDIT_PATH_ATTR, HIGHLIGHT_ATTR, NodeAction, NodeId, NodeTree};
use log::debug;
use std::sync::Arc;

/// What a captured click resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Manage mode: report this edit path
    Selected(String),
    /// Public mode: run the node's storefront action
    Activated(NodeAction),
    /// Nothing to do; selection unchanged
    Ignored,
}

/// Result of the capture-phase listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedClick {
    pub outcome: ClickOutcome,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl CapturedClick {
    fn ignored() -> Self {
        Self {
            outcome: ClickOutcome::Ignored,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn selected_path(&self) -> Option<&str> {
        match &self.outcome {
            ClickOutcome::Selected(path) => Some(path),
            _ => None,
        }
    }
}

/// Resolve a click on `target`
pub fn capture_click(tree: &NodeTree, target: NodeId, manage: bool) -> CapturedClick {
    if manage {
        let Some(found) = tree.closest_with_attr(target, EDIT_PATH_ATTR) else {
            return CapturedClick::ignored();
        };
        let path = tree.attr(found, EDIT_PATH_ATTR).unwrap_or_default().to_string();
        return CapturedClick {
            outcome: ClickOutcome::Selected(path),
            default_prevented: true,
            propagation_stopped: true,
        };
    }

    match tree.closest_with_action(target).and_then(|id| tree.action(id)) {
        Some(NodeAction::Select(_)) | None => CapturedClick::ignored(),
        Some(action) => CapturedClick {
            outcome: ClickOutcome::Activated(action.clone()),
            default_prevented: false,
            propagation_stopped: false,
        },
    }
}

/// Mirror the selection into the tree
///
/// Removes every existing highlight, then marks the first node carrying the
/// selected path. Returns the highlighted node.
pub fn apply_highlight(tree: &mut NodeTree, selected: Option<&str>) -> Option<NodeId> {
    let highlighted: Vec<NodeId> = tree.nodes_with_attr(HIGHLIGHT_ATTR).collect();
    for id in highlighted {
        tree.remove_attr(id, HIGHLIGHT_ATTR);
    }

    let target = tree.find_first(EDIT_PATH_ATTR, selected?)?;
    tree.set_attr(target, HIGHLIGHT_ATTR, "true");
    Some(target)
}

/// At most one selected edit path per preview session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns whether the selection changed
    pub fn select(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.selected.as_deref() == Some(path.as_str()) {
            return false;
        }
        self.selected = Some(path);
        true
    }

    /// Returns whether anything was selected
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }
}

/// Selection plus the template picker overlay
///
/// The two never show affordances at the same time: opening the picker clears
/// the region selection and selecting a region closes the picker.
pub struct SelectionController {
    state: SelectionState,
    picker_open: bool,
    events: Arc<EventManager>,
}

impl SelectionController {
    pub fn new(events: Arc<EventManager>) -> Self {
        Self {
            state: SelectionState::default(),
            picker_open: false,
            events,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.state.selected()
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn select(&mut self, path: &str) {
        self.picker_open = false;
        if self.state.select(path) {
            debug!("Selected {path}");
            self.events.notify_selection(Some(path));
        }
    }

    pub fn clear(&mut self) {
        if self.state.clear() {
            self.events.notify_selection(None);
        }
    }

    pub fn open_picker(&mut self) {
        self.clear();
        self.picker_open = true;
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tree() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        let card = tree.append_element(root, "article");
        tree.set_attr(card, EDIT_PATH_ATTR, "layout.products.card");
        tree.set_action(card, Some(NodeAction::Navigate("/acme/products/tote".into())));
        let name = tree.append_element(card, "h3");
        let text = tree.append_text(name, "Tote");
        let loose = tree.append_element(root, "div");
        (tree, card, text, loose)
    }

    #[test]
    fn test_manage_click_selects_nearest_path_and_stops() {
        let (tree, _, text, _) = tree();
        let click = capture_click(&tree, text, true);
        assert_eq!(click.selected_path(), Some("layout.products.card"));
        assert!(click.default_prevented);
        assert!(click.propagation_stopped);
    }

    #[test]
    fn test_click_without_path_is_ignored() {
        let (tree, _, _, loose) = tree();
        let click = capture_click(&tree, loose, true);
        assert_eq!(click.outcome, ClickOutcome::Ignored);
        assert!(!click.default_prevented);
    }

    #[test]
    fn test_public_click_activates_action() {
        let (tree, _, text, _) = tree();
        let click = capture_click(&tree, text, false);
        assert_eq!(
            click.outcome,
            ClickOutcome::Activated(NodeAction::Navigate("/acme/products/tote".into()))
        );
        assert!(!click.default_prevented);
    }

    #[test]
    fn test_highlight_moves_and_clears() {
        let mut tree = NodeTree::new("main");
        let root = tree.root();
        let first = tree.append_element(root, "a");
        tree.set_attr(first, EDIT_PATH_ATTR, "layout.footer.social");
        let second = tree.append_element(root, "a");
        tree.set_attr(second, EDIT_PATH_ATTR, "layout.footer.social");
        let title = tree.append_element(root, "h1");
        tree.set_attr(title, EDIT_PATH_ATTR, "layout.hero.title");

        assert_eq!(
            apply_highlight(&mut tree, Some("layout.footer.social")),
            Some(first)
        );
        assert_eq!(tree.attr(second, HIGHLIGHT_ATTR), None);

        apply_highlight(&mut tree, Some("layout.hero.title"));
        assert_eq!(tree.attr(first, HIGHLIGHT_ATTR), None);
        assert_eq!(tree.attr(title, HIGHLIGHT_ATTR), Some("true"));

        assert_eq!(apply_highlight(&mut tree, None), None);
        assert_eq!(tree.nodes_with_attr(HIGHLIGHT_ATTR).count(), 0);
    }

    #[test]
    fn test_picker_and_selection_are_exclusive() {
        let events = Arc::new(EventManager::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        events.on_selection(move |p| seen_clone.lock().unwrap().push(p.map(String::from)));

        let mut controller = SelectionController::new(events);
        controller.select("layout.hero.title");
        controller.open_picker();
        assert!(controller.is_picker_open());
        assert_eq!(controller.selected(), None);

        controller.select("layout.hero");
        assert!(!controller.is_picker_open());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Some("layout.hero.title".to_string()),
                None,
                Some("layout.hero".to_string())
            ]
        );
    }
}
