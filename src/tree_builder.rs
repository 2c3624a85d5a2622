//! A small convenience builder for authoring trees in code.
//!
//! This is intentionally lightweight: scripted layouts, fixtures, and tests
//! want to express nesting without spelling out every [`TreeNode`] field. For
//! full control you can always construct [`TreeNode`] values directly.

use crate::sortable::{NodeId, TreeNode, normalize_items};

/// Builds a forest of [`TreeNode`]s, enforcing the leaf invariant on finish.
pub struct TreeBuilder<T> {
    roots: Vec<TreeNode<T>>,
}

impl<T> Default for TreeBuilder<T> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<T> TreeBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root node.
    pub fn root(mut self, node: TreeNode<T>) -> Self {
        self.roots.push(node);
        self
    }

    /// Append a child to the node with `parent_id`, anywhere in the forest
    /// built so far.
    ///
    /// Panics if `parent_id` does not exist yet; a scripted layout adding
    /// children to a node it never created is a bug at the call site.
    pub fn child_of(mut self, parent_id: impl Into<NodeId>, node: TreeNode<T>) -> Self {
        let parent_id = parent_id.into();
        let mut node = Some(node);
        if !attach(&mut self.roots, &parent_id, &mut node) {
            panic!("child_of: parent {parent_id} does not exist");
        }
        self
    }

    /// Finish building; runs leaf normalization so a `can_have_children ==
    /// false` node never leaves the builder with children.
    pub fn finish(self) -> Vec<TreeNode<T>> {
        let mut roots = self.roots;
        normalize_items(&mut roots);
        roots
    }
}

fn attach<T>(items: &mut [TreeNode<T>], parent_id: &NodeId, node: &mut Option<TreeNode<T>>) -> bool {
    for item in items.iter_mut() {
        if item.id == *parent_id {
            if let Some(node) = node.take() {
                item.children.push(node);
            }
            return true;
        }
        if attach(&mut item.children, parent_id, node) {
            return true;
        }
    }
    false
}
