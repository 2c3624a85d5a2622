use ahash::{HashSet, HashSetExt as _};

use super::node::{FlatNode, NodeId, TreeNode};

/// Structural issues in a nested tree: duplicate ids and children under nodes
/// that must not have any. Empty means healthy.
pub fn tree_integrity_issues<T>(items: &[TreeNode<T>]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&NodeId> = HashSet::new();
    visit(items, &mut seen, &mut issues);
    issues
}

fn visit<'a, T>(
    items: &'a [TreeNode<T>],
    seen: &mut HashSet<&'a NodeId>,
    issues: &mut Vec<String>,
) {
    for item in items {
        if !seen.insert(&item.id) {
            issues.push(format!("integrity: duplicate id {}", item.id));
        }
        if !item.can_have_children && !item.children.is_empty() {
            issues.push(format!(
                "integrity: node {} cannot have children but has {}",
                item.id,
                item.children.len()
            ));
        }
        visit(&item.children, seen, issues);
    }
}

/// Issues in a flattened list: broken depth/parent invariants or violated
/// pre-order (a node appearing before its parent).
pub fn flat_integrity_issues<T>(flat: &[FlatNode<T>]) -> Vec<String> {
    let mut issues = Vec::new();
    for (ix, item) in flat.iter().enumerate() {
        match item.parent(flat) {
            Some(parent) => {
                if item.parent_id.as_ref() != Some(&parent.id) {
                    issues.push(format!(
                        "integrity: {} parent_id={:?} but parent ref is {}",
                        item.id, item.parent_id, parent.id
                    ));
                }
                if item.depth != parent.depth + 1 {
                    issues.push(format!(
                        "integrity: {} depth={} but parent {} depth={}",
                        item.id, item.depth, parent.id, parent.depth
                    ));
                }
                if item.parent_ix.is_some_and(|pix| pix >= ix) {
                    issues.push(format!(
                        "integrity: {} precedes its parent {} (pre-order violated)",
                        item.id, parent.id
                    ));
                }
            }
            None => {
                if item.parent_id.is_some() {
                    issues.push(format!(
                        "integrity: {} has parent_id={:?} but no parent ref",
                        item.id, item.parent_id
                    ));
                }
                if item.depth != 0 {
                    issues.push(format!(
                        "integrity: root {} has depth {}",
                        item.id, item.depth
                    ));
                }
            }
        }
    }
    issues
}
