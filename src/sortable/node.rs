use std::fmt;

/// Stable unique identifier of a tree node.
///
/// The engine never interprets the id beyond equality and hashing, so hosts are
/// free to use database keys, UUIDs, or synthetic strings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node of the ordered tree.
///
/// `data` is an opaque payload; the engine only requires `T: Clone` so it can
/// produce copy-on-write snapshots, and never inspects the contents.
///
/// Invariant: a node with `can_have_children == false` has no children. This is
/// enforced by normalization (see [`normalize_items`]), not by errors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode<T> {
    pub id: NodeId,
    pub data: T,
    pub children: Vec<TreeNode<T>>,
    pub collapsed: bool,
    pub can_have_children: bool,
}

impl<T> TreeNode<T> {
    /// A node that may receive children (a folder).
    pub fn new(id: impl Into<NodeId>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            children: Vec::new(),
            collapsed: false,
            can_have_children: true,
        }
    }

    /// A node that may never receive children during drag-and-drop.
    pub fn leaf(id: impl Into<NodeId>, data: T) -> Self {
        Self {
            can_have_children: false,
            ..Self::new(id, data)
        }
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn with_children(mut self, children: impl Into<Vec<TreeNode<T>>>) -> Self {
        self.children = children.into();
        self
    }

    /// Direct child count.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Enforce the leaf invariant on a whole tree.
///
/// Children found under a `can_have_children == false` node are lifted to
/// become its following siblings. Misplacing a node is preferable to silently
/// dropping it.
pub fn normalize_items<T>(items: &mut Vec<TreeNode<T>>) {
    let mut ix = 0;
    while ix < items.len() {
        if !items[ix].can_have_children && !items[ix].children.is_empty() {
            log::warn!(
                "node {} cannot have children; lifting {} child(ren) to siblings",
                items[ix].id,
                items[ix].children.len()
            );
            let lifted = std::mem::take(&mut items[ix].children);
            items.splice(ix + 1..ix + 1, lifted);
        } else {
            normalize_items(&mut items[ix].children);
        }
        ix += 1;
    }
}

/// A node of the flattened (pre-order) representation of the tree.
///
/// Derived by [`flatten`](super::flatten::flatten), never hand-authored. The
/// parent back-reference is an index into the same list; resolve it with
/// [`FlatNode::parent`]. Child ownership stays in the source tree: a flat node
/// only records `child_count`.
#[derive(Clone, Debug)]
pub struct FlatNode<T> {
    pub id: NodeId,
    pub data: T,
    pub collapsed: bool,
    pub can_have_children: bool,
    /// Direct child count in the source tree.
    pub child_count: usize,
    pub parent_id: Option<NodeId>,
    /// `0` for roots; always `parent.depth + 1` otherwise.
    pub depth: usize,
    /// Position among siblings.
    pub index: usize,
    /// Whether this node is the last of its siblings.
    pub is_last: bool,
    pub(crate) parent_ix: Option<usize>,
}

impl<T> FlatNode<T> {
    /// Resolve the parent back-reference against the list this node came from.
    pub fn parent<'a>(&self, list: &'a [FlatNode<T>]) -> Option<&'a FlatNode<T>> {
        self.parent_ix.and_then(|ix| list.get(ix))
    }
}

/// Everything a renderer needs to draw one visible row without recomputing
/// structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowModel {
    pub id: NodeId,
    pub depth: usize,
    pub is_last: bool,
    pub collapsed: bool,
    /// Direct child count (drives the collapse affordance).
    pub child_count: usize,
}
