use ahash::HashSet;

use super::flatten::{build, collapsed_ids, flatten, remove_children_of};
use super::integrity::flat_integrity_issues;
use super::node::{FlatNode, NodeId, TreeNode};

fn item(id: &str, children: Vec<TreeNode<()>>) -> TreeNode<()> {
    TreeNode::new(id, ()).with_children(children)
}

fn leaf(id: &str) -> TreeNode<()> {
    TreeNode::leaf(id, ())
}

/// `[A[B, C[D]], E]`, the navigation-tree shape used throughout these tests.
fn sample() -> Vec<TreeNode<()>> {
    vec![
        item("a", vec![leaf("b"), item("c", vec![leaf("d")])]),
        leaf("e"),
    ]
}

fn dump(items: &[TreeNode<()>], depth: usize, out: &mut String) {
    for node in items {
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.id.as_str());
        out.push('\n');
        dump(&node.children, depth + 1, out);
    }
}

fn dump_str(items: &[TreeNode<()>]) -> String {
    let mut out = String::new();
    dump(items, 0, &mut out);
    out.trim_end().to_owned()
}

fn ids(flat: &[FlatNode<()>]) -> Vec<&str> {
    flat.iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn flatten_assigns_preorder_depth_and_parents() {
    let flat = flatten(&sample());

    assert_eq!(ids(&flat), ["a", "b", "c", "d", "e"]);
    let depths: Vec<usize> = flat.iter().map(|f| f.depth).collect();
    assert_eq!(depths, [0, 1, 1, 2, 0]);

    let parents: Vec<Option<&str>> = flat
        .iter()
        .map(|f| f.parent_id.as_ref().map(NodeId::as_str))
        .collect();
    assert_eq!(parents, [None, Some("a"), Some("a"), Some("c"), None]);

    let indices: Vec<usize> = flat.iter().map(|f| f.index).collect();
    assert_eq!(indices, [0, 0, 1, 0, 1]);

    let is_last: Vec<bool> = flat.iter().map(|f| f.is_last).collect();
    assert_eq!(is_last, [false, false, true, true, true]);
}

#[test]
fn flatten_output_passes_structural_self_checks() {
    let flat = flatten(&sample());
    let issues = flat_integrity_issues(&flat);
    assert!(issues.is_empty(), "unexpected issues:\n{}", issues.join("\n"));

    // Back-references resolve to the node named by parent_id, one level up.
    for node in &flat {
        match node.parent(&flat) {
            Some(parent) => {
                assert_eq!(Some(&parent.id), node.parent_id.as_ref());
                assert_eq!(node.depth, parent.depth + 1);
            }
            None => assert_eq!(node.depth, 0),
        }
    }
}

#[test]
fn build_inverts_flatten() {
    let items = sample();
    let rebuilt = build(&flatten(&items));
    assert_eq!(rebuilt, items);
}

#[test]
fn build_tolerates_arbitrary_ordering() {
    let mut flat = flatten(&sample());
    // Post-drag orderings are not grouped by parent; reverse is the extreme.
    flat.reverse();
    let rebuilt = build(&flat);

    // Children attach in first-encountered order, so siblings come out in
    // list order; structure (who is under whom) is what must survive.
    assert_eq!(
        dump_str(&rebuilt),
        "e\na\n  c\n    d\n  b" // e first, d still under c, b still under a
    );
}

#[test]
fn build_treats_dangling_parent_as_root() {
    let mut flat = flatten(&sample());
    flat.retain(|f| f.id.as_str() != "c");
    let rebuilt = build(&flat);

    // d's parent is gone from the list; d is misplaced to a root, not dropped.
    assert_eq!(dump_str(&rebuilt), "a\n  b\nd\ne");
}

#[test]
fn build_never_attaches_under_a_leaf() {
    let mut flat = flatten(&sample());
    // Claim d is a child of the leaf b.
    let d = flat.iter_mut().find(|f| f.id.as_str() == "d").unwrap();
    d.parent_id = Some(NodeId::from("b"));
    let rebuilt = build(&flat);

    assert_eq!(dump_str(&rebuilt), "a\n  b\n  c\nd\ne");
}

#[test]
fn build_preserves_nodes_caught_in_a_parent_cycle() {
    let mut flat = flatten(&[item("x", vec![]), item("y", vec![])]);
    flat[0].parent_id = Some(NodeId::from("y"));
    flat[1].parent_id = Some(NodeId::from("x"));
    let rebuilt = build(&flat);

    // Neither x nor y resolves to a root; both must still come out.
    let mut root_ids: Vec<&str> = rebuilt.iter().map(|n| n.id.as_str()).collect();
    root_ids.sort_unstable();
    let total: usize = flatten(&rebuilt).len();
    assert_eq!(total, 2);
    assert!(root_ids.contains(&"x"));
}

#[test]
fn remove_children_of_hides_collapsed_branch_only() {
    let mut items = sample();
    items[0].children[1].collapsed = true; // collapse c

    let flat = flatten(&items);
    let collapsed = collapsed_ids(&flat);
    assert_eq!(collapsed.len(), 1);

    let visible = remove_children_of(flat, &collapsed);
    assert_eq!(ids(&visible), ["a", "b", "c", "e"]);

    // The collapsed branch is hidden, not detached: rebuilding the full tree
    // still reconstructs d under c.
    let rebuilt = build(&flatten(&items));
    assert_eq!(dump_str(&rebuilt), "a\n  b\n  c\n    d\ne");
}

#[test]
fn remove_children_of_descends_through_unlisted_children() {
    // Excluding a hides b and, transitively, b's own subtree.
    let items = vec![item("a", vec![item("b", vec![leaf("c")])]), leaf("e")];
    let flat = flatten(&items);
    let exclude: HashSet<NodeId> = [NodeId::from("a")].into_iter().collect();

    let visible = remove_children_of(flat, &exclude);
    assert_eq!(ids(&visible), ["a", "e"]);
}

#[test]
fn remove_children_of_remaps_parent_references() {
    let mut items = sample();
    items[0].children[1].collapsed = true; // collapse c, hiding d

    let flat = flatten(&items);
    let collapsed = collapsed_ids(&flat);
    let visible = remove_children_of(flat, &collapsed);

    let issues = flat_integrity_issues(&visible);
    assert!(issues.is_empty(), "unexpected issues:\n{}", issues.join("\n"));
}

#[test]
fn collapsed_ids_ignores_collapsed_leaves() {
    let mut items = sample();
    items[1].collapsed = true; // e has no children; collapsing it hides nothing
    let flat = flatten(&items);
    assert!(collapsed_ids(&flat).is_empty());
}
