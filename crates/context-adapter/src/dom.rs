//! In-memory DOM snapshot.
//!
//! The recording subsystem never touches a real renderer; it operates on a
//! document snapshot reachable through the context abstraction. The snapshot
//! is a flat node arena with parent/child links, which keeps element
//! references ([`NodeId`]) cheap, copyable, and strictly scoped to one
//! document.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic epoch source; every document gets a fresh epoch so cache keys
/// from an old document can never collide with the new one.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Opaque element reference, valid only within its owning [`Document`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    hidden: bool,
}

/// One DOM snapshot. Mutations model what the live page does between
/// events (attribute churn, subtree removal); a navigation replaces the
/// whole document rather than mutating it.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    epoch: u64,
}

impl Document {
    /// Create an empty document with an `html` root element.
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element {
                tag: "html".to_string(),
                attributes: Vec::new(),
            },
            hidden: false,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            epoch: NEXT_EPOCH.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Epoch distinguishing this document from every other document ever
    /// built in this process.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Append an element node under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let attrs = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.push_node(
            parent,
            NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
                attributes: attrs,
            },
        )
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
            hidden: false,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Detach `node` (and its subtree) from the tree. The arena slot stays
    /// allocated so stale references fail lookups instead of aliasing.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.index()).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.index()].children.retain(|c| *c != node);
        self.nodes[node.index()].parent = None;
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element { attributes, .. }) =
            self.nodes.get_mut(node.index()).map(|n| &mut n.kind)
        {
            if let Some(entry) = attributes.iter_mut().find(|(n, _)| n == name) {
                entry.1 = value.to_string();
            } else {
                attributes.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(NodeKind::Element { attributes, .. }) =
            self.nodes.get_mut(node.index()).map(|n| &mut n.kind)
        {
            attributes.retain(|(n, _)| n != name);
        }
    }

    /// Mark a node as not rendered (display:none and friends collapse to
    /// this flag in the snapshot).
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.nodes.get_mut(node.index()) {
            n.hidden = hidden;
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node.index()).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    /// Raw text of a text node; `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.index()).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.nodes.get(node.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Attribute names in document order (matching tolerance checks must not
    /// depend on this order).
    pub fn attribute_names(&self, node: NodeId) -> Vec<&str> {
        match self.nodes.get(node.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => {
                attributes.iter().map(|(n, _)| n.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Class list split on whitespace.
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attribute(node, "class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Explicit hidden flag on the node itself (ancestors not considered).
    pub fn hidden_flag(&self, node: NodeId) -> bool {
        self.nodes.get(node.index()).map(|n| n.hidden).unwrap_or(true)
    }

    /// Whether `node` is still attached under the document root.
    pub fn contains(&self, node: NodeId) -> bool {
        if node.index() >= self.nodes.len() {
            return false;
        }
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.index()].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// All attached element nodes in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
            }
            // push in reverse so traversal stays document-ordered
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Ancestors of `node`, nearest first, excluding the node itself.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent(ancestor);
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_tree_with_attributes() {
        let mut doc = Document::new();
        let button = doc.append_element(doc.root(), "BUTTON", &[("id", "go"), ("class", "btn primary")]);
        doc.append_text(button, "hello");

        assert_eq!(doc.tag(button), Some("button"));
        assert_eq!(doc.attribute(button, "id"), Some("go"));
        assert_eq!(doc.classes(button), vec!["btn", "primary"]);
        assert!(doc.contains(button));
        assert_eq!(doc.elements().len(), 2);
    }

    #[test]
    fn detach_removes_subtree_from_traversal() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[]);
        let child = doc.append_element(div, "span", &[]);

        doc.detach(div);

        assert!(!doc.contains(div));
        assert!(!doc.contains(child));
        assert_eq!(doc.elements().len(), 1);
    }

    #[test]
    fn epochs_differ_between_documents() {
        assert_ne!(Document::new().epoch(), Document::new().epoch());
    }

    #[test]
    fn set_attribute_updates_in_place() {
        let mut doc = Document::new();
        let input = doc.append_element(doc.root(), "input", &[("type", "text")]);
        doc.set_attribute(input, "type", "email");
        doc.set_attribute(input, "name", "user");

        assert_eq!(doc.attribute(input, "type"), Some("email"));
        assert_eq!(doc.attribute(input, "name"), Some("user"));

        doc.remove_attribute(input, "name");
        assert_eq!(doc.attribute(input, "name"), None);
    }
}
