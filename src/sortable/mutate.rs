//! Pure copy-on-write operations on nested trees.
//!
//! Inputs are never modified; every function returns a freshly built tree, so
//! hosts can rely on reference inequality (or [`SortableTree::version`]) to
//! detect change.
//!
//! [`SortableTree::version`]: super::SortableTree::version

use super::node::{NodeId, TreeNode};

/// Depth-first lookup of a node anywhere in the tree.
pub fn find_item_deep<'a, T>(items: &'a [TreeNode<T>], id: &NodeId) -> Option<&'a TreeNode<T>> {
    for item in items {
        if item.id == *id {
            return Some(item);
        }
        if let Some(found) = find_item_deep(&item.children, id) {
            return Some(found);
        }
    }
    None
}

/// New tree with the node and its whole subtree excised.
pub fn remove_item<T: Clone>(items: &[TreeNode<T>], id: &NodeId) -> Vec<TreeNode<T>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if item.id == *id {
            continue;
        }
        let mut item = item.clone();
        item.children = remove_item(&item.children, id);
        out.push(item);
    }
    out
}

/// New tree with `update` applied to the one node matching `id`.
///
/// The Rust-native form of a keyed `setProperty`: the updater gets the whole
/// node and mutates the field(s) it cares about on the copy.
pub fn update_item<T: Clone>(
    items: &[TreeNode<T>],
    id: &NodeId,
    update: &mut impl FnMut(&mut TreeNode<T>),
) -> Vec<TreeNode<T>> {
    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if item.id == *id {
                update(&mut item);
            } else {
                item.children = update_item(&item.children, id, update);
            }
            item
        })
        .collect()
}

/// Total number of descendants of `id` (not counting the node itself).
///
/// Sizes the drag-overlay badge ("moving N items").
pub fn descendant_count<T>(items: &[TreeNode<T>], id: &NodeId) -> usize {
    fn count<T>(item: &TreeNode<T>) -> usize {
        item.children.len() + item.children.iter().map(count).sum::<usize>()
    }
    find_item_deep(items, id).map(count).unwrap_or(0)
}
