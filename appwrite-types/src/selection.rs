//! Selection tree.
//!
//! Top-level nodes are databases (children = collections) followed by two
//! synthetic roots for users and teams. A node with children is checked iff
//! some child is checked; a childless top-level node keeps its own state.

/// Id of the synthetic users root.
pub const USERS_NODE_ID: &str = "_users_";

/// Id of the synthetic teams root.
pub const TEAMS_NODE_ID: &str = "_teams_";

/// What a top-level node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Database,
    Users,
    Teams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionNode {
    pub id: String,
    pub name: String,
    pub checked: bool,
    pub children: Option<Vec<SelectionNode>>,
}

impl SelectionNode {
    /// An unchecked node without children.
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checked: false,
            children: None,
        }
    }

    /// An unchecked node with the given children.
    pub fn with_children(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<SelectionNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checked: false,
            children: Some(children),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.id.as_str() {
            USERS_NODE_ID => NodeKind::Users,
            TEAMS_NODE_ID => NodeKind::Teams,
            _ => NodeKind::Database,
        }
    }

    /// Some, but not all, children are checked.
    pub fn is_indeterminate(&self) -> bool {
        match &self.children {
            Some(children) => {
                children.iter().any(|c| c.checked) && !children.iter().all(|c| c.checked)
            }
            None => false,
        }
    }

    /// Checked children in fetch order.
    pub fn checked_children(&self) -> impl Iterator<Item = &SelectionNode> {
        self.children.iter().flatten().filter(|c| c.checked)
    }

    fn set_with_children(&mut self, checked: bool) {
        self.checked = checked;
        for child in self.children.iter_mut().flatten() {
            child.checked = checked;
        }
    }

    fn recompute(&mut self) {
        if let Some(children) = &self.children {
            self.checked = children.iter().any(|c| c.checked);
        }
    }
}

/// The checked tree a run is driven by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTree {
    nodes: Vec<SelectionNode>,
}

impl SelectionTree {
    pub fn new(nodes: Vec<SelectionNode>) -> Self {
        Self { nodes }
    }

    /// Databases in source order followed by the users and teams roots.
    pub fn with_synthetic_roots(
        databases: Vec<SelectionNode>,
        users_total: u64,
        teams_total: u64,
    ) -> Self {
        let mut nodes = databases;
        nodes.push(SelectionNode::leaf(
            USERS_NODE_ID,
            format!("Users ({} items)", users_total),
        ));
        nodes.push(SelectionNode::leaf(
            TEAMS_NODE_ID,
            format!("Teams ({} items)", teams_total),
        ));
        Self { nodes }
    }

    pub fn nodes(&self) -> &[SelectionNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SelectionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Checked top-level nodes in fetch order.
    pub fn checked_roots(&self) -> impl Iterator<Item = &SelectionNode> {
        self.nodes.iter().filter(|n| n.checked)
    }

    /// Set the state of the node with `id`.
    ///
    /// A top-level id sets the node and all of its children. Any other id
    /// sets every child carrying it. Parents are recomputed afterwards.
    /// Returns whether any node matched.
    pub fn toggle(&mut self, id: &str, checked: bool) -> bool {
        let mut found = false;
        for node in &mut self.nodes {
            if node.id == id {
                node.set_with_children(checked);
                found = true;
            } else {
                for child in node.children.iter_mut().flatten() {
                    if child.id == id {
                        child.checked = checked;
                        found = true;
                    }
                }
            }
            node.recompute();
        }
        found
    }

    /// Set one child of one parent. Returns whether the child exists.
    pub fn toggle_child(&mut self, parent: &str, child: &str, checked: bool) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == parent) else {
            return false;
        };
        let Some(target) = node
            .children
            .iter_mut()
            .flatten()
            .find(|c| c.id == child)
        else {
            return false;
        };
        target.checked = checked;
        node.recompute();
        true
    }

    /// Check every node.
    pub fn check_all(&mut self) {
        for node in &mut self.nodes {
            node.set_with_children(true);
            node.recompute();
        }
    }

    /// Apply textual selectors: `*`, `<id>` or `<parent>/<child>`.
    ///
    /// Returns the selectors that matched nothing.
    pub fn apply_selectors<'a>(
        &mut self,
        selectors: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut unknown = Vec::new();
        for selector in selectors {
            let selector = selector.trim();
            if selector.is_empty() {
                continue;
            }
            let matched = if selector == "*" {
                self.check_all();
                true
            } else if let Some((parent, child)) = selector.split_once('/') {
                self.toggle_child(parent, child, true)
            } else {
                self.nodes.iter().any(|n| n.id == selector) && self.toggle(selector, true)
            };
            if !matched {
                unknown.push(selector.to_string());
            }
        }
        unknown
    }
}
