//! Core data structures shared by every format.
//!
//! Both project formats are read into the same shape: a rooted tree of typed [`Node`]s.
//! Formats only translate between their text representation and this tree; all mapping
//! logic works on the tree alone.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Deepest tree either format reads or writes, the root counting as level 1.
///
/// A Plottr node nests two JSON levels (the object and its `children` array) and
/// `serde_json` refuses input nested more than 127 levels, so anything deeper could be
/// written but never read back.
pub const MAX_DEPTH: usize = 60;

/// Attributes in source order.
pub type Attributes = IndexMap<String, String>;

/// A single unit of a project tree (a chapter, a scene, a binder folder...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(type_label: impl Into<String>) -> Self {
        Node {
            type_label: type_label.into(),
            attributes: Attributes::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
    }

    /// Number of levels in this subtree, `self` being level 1.
    ///
    /// Walks with an explicit stack so trees built in code of any depth can be measured.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }
}

/// The root of a loaded or converted project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Document { root }
    }

    /// Total node count, root included.
    pub fn node_count(&self) -> usize {
        self.root.subtree_size()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
