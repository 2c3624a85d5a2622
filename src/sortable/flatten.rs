//! Bidirectional mapping between the nested tree and its flattened, pre-order
//! list representation.

use ahash::{HashMap, HashMapExt as _, HashSet, HashSetExt as _};

use super::node::{FlatNode, NodeId, TreeNode};

/// Flatten a tree into pre-order: every node precedes its descendants and
/// follows all earlier siblings' subtrees.
pub fn flatten<T: Clone>(items: &[TreeNode<T>]) -> Vec<FlatNode<T>> {
    let mut out = Vec::new();
    flatten_into(items, 0, None, &mut out);
    out
}

fn flatten_into<T: Clone>(
    items: &[TreeNode<T>],
    depth: usize,
    parent_ix: Option<usize>,
    out: &mut Vec<FlatNode<T>>,
) {
    let last = items.len().saturating_sub(1);
    for (index, item) in items.iter().enumerate() {
        let node_ix = out.len();
        let parent_id = parent_ix.map(|ix| out[ix].id.clone());
        out.push(FlatNode {
            id: item.id.clone(),
            data: item.data.clone(),
            collapsed: item.collapsed,
            can_have_children: item.can_have_children,
            child_count: item.children.len(),
            parent_id,
            depth,
            index,
            is_last: index == last,
            parent_ix,
        });
        flatten_into(&item.children, depth + 1, Some(node_ix), out);
    }
}

/// Rebuild a nested tree from a flat list.
///
/// The inverse of [`flatten`], but deliberately tolerant: the list does not
/// have to be grouped contiguously by parent (the post-drag ordering is
/// arbitrary). Children attach to their parent in first-encountered order.
/// An item is treated as a root when its `parent_id` is `None`, names an id
/// absent from the list, or names a node that cannot have children.
///
/// Malformed parent chains (cycles) cannot be expressed as a tree; any item
/// left unreachable from the roots is appended as a root rather than dropped.
pub fn build<T: Clone>(flat: &[FlatNode<T>]) -> Vec<TreeNode<T>> {
    let mut ix_by_id: HashMap<&NodeId, usize> = HashMap::with_capacity(flat.len());
    for (ix, item) in flat.iter().enumerate() {
        // First occurrence wins for duplicate ids.
        ix_by_id.entry(&item.id).or_insert(ix);
    }

    let mut child_ixs: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut root_ixs: Vec<usize> = Vec::new();
    for (ix, item) in flat.iter().enumerate() {
        let parent_ix = item
            .parent_id
            .as_ref()
            .and_then(|pid| ix_by_id.get(pid).copied())
            .filter(|&pix| pix != ix && flat[pix].can_have_children);
        match parent_ix {
            Some(pix) => child_ixs[pix].push(ix),
            None => root_ixs.push(ix),
        }
    }

    let mut attached = vec![false; flat.len()];
    let mut roots: Vec<TreeNode<T>> = root_ixs
        .into_iter()
        .map(|ix| assemble(ix, flat, &child_ixs, &mut attached))
        .collect();

    // Cycle fallout: nodes whose parent chain never reaches a root.
    for ix in 0..flat.len() {
        if !attached[ix] {
            roots.push(assemble(ix, flat, &child_ixs, &mut attached));
        }
    }

    roots
}

fn assemble<T: Clone>(
    ix: usize,
    flat: &[FlatNode<T>],
    child_ixs: &[Vec<usize>],
    attached: &mut [bool],
) -> TreeNode<T> {
    attached[ix] = true;
    let item = &flat[ix];
    let mut children = Vec::with_capacity(child_ixs[ix].len());
    for &child_ix in &child_ixs[ix] {
        if !attached[child_ix] {
            children.push(assemble(child_ix, flat, child_ixs, attached));
        }
    }
    TreeNode {
        id: item.id.clone(),
        data: item.data.clone(),
        children,
        collapsed: item.collapsed,
        can_have_children: item.can_have_children,
    }
}

/// Remove every node whose nearest excluded ancestor is in `ids`.
///
/// Used both to hide collapsed branches from the rendered list and to exclude
/// the dragged subtree from drop candidates (preventing self-nesting). The
/// excluded nodes themselves stay in the list; only their descendants go.
/// Relies on pre-order: a node's ancestors have already been classified when
/// the node is visited. Parent back-references are remapped to the result.
pub fn remove_children_of<T>(flat: Vec<FlatNode<T>>, ids: &HashSet<NodeId>) -> Vec<FlatNode<T>> {
    if ids.is_empty() {
        return flat;
    }

    let mut kept: Vec<FlatNode<T>> = Vec::with_capacity(flat.len());
    let mut new_ix: HashMap<NodeId, usize> = HashMap::with_capacity(flat.len());
    // Nodes removed because an ancestor was excluded; their own descendants
    // must go as well, even when the node itself is not in `ids`.
    let mut drop_under: HashSet<NodeId> = HashSet::new();
    for item in flat {
        let gone = item
            .parent_id
            .as_ref()
            .is_some_and(|pid| ids.contains(pid) || drop_under.contains(pid));
        if gone {
            if item.child_count > 0 {
                drop_under.insert(item.id.clone());
            }
            continue;
        }
        let parent_ix = item
            .parent_id
            .as_ref()
            .and_then(|pid| new_ix.get(pid).copied());
        new_ix.insert(item.id.clone(), kept.len());
        kept.push(FlatNode { parent_ix, ..item });
    }
    kept
}

/// Ids of collapsed nodes that actually have children: the branches a
/// renderer hides and a drag session must not offer as drop candidates.
pub fn collapsed_ids<T>(flat: &[FlatNode<T>]) -> HashSet<NodeId> {
    let mut ids = HashSet::new();
    for item in flat {
        if item.collapsed && item.child_count > 0 {
            ids.insert(item.id.clone());
        }
    }
    ids
}
