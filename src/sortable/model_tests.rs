//! Randomized model tests: arbitrary trees and gesture sequences must keep
//! the structural invariants and never lose a node.

use super::{
    NodeId, SortableTree, SortableTreeOptions, TreeNode, collapsed_ids, flat_integrity_issues,
    flatten, position_updates, project, remove_children_of, tree_integrity_issues, update_item,
};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0x5017_AB1E_5017_AB1E)
    }

    fn next_u64(&mut self) -> u64 {
        // Simple LCG: deterministic, fast, no dependency.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() & 1) != 0
    }

    /// Depth offset in the range -3..=3, scaled to the indentation unit.
    fn next_offset(&mut self) -> f32 {
        (self.next_usize(7) as f32 - 3.0) * 20.0
    }
}

/// A random tree of `count` nodes: roughly a third leaves, occasional
/// collapsed folders, parents picked among earlier folders or the root level.
fn random_tree(rng: &mut Rng, count: usize) -> Vec<TreeNode<u32>> {
    let mut items: Vec<TreeNode<u32>> = Vec::new();
    let mut folders: Vec<NodeId> = Vec::new();

    for n in 0..count {
        let node = if rng.next_usize(3) == 0 {
            TreeNode::leaf(format!("n{n}"), n as u32)
        } else {
            TreeNode::new(format!("n{n}"), n as u32).with_collapsed(rng.next_usize(4) == 0)
        };
        let parent = if folders.is_empty() || rng.next_bool() {
            None
        } else {
            Some(folders[rng.next_usize(folders.len())].clone())
        };
        if node.can_have_children {
            folders.push(node.id.clone());
        }
        match parent {
            None => items.push(node),
            Some(parent) => {
                items = update_item(&items, &parent, &mut |p| p.children.push(node.clone()));
            }
        }
    }
    items
}

fn sorted_ids(items: &[TreeNode<u32>]) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = flatten(items).into_iter().map(|item| item.id).collect();
    ids.sort();
    ids
}

#[test]
fn model_random_trees_flatten_and_rebuild_losslessly() {
    for seed in 1u64..=16u64 {
        let mut rng = Rng::new(seed);
        let count = 3 + rng.next_usize(20);
        let items = random_tree(&mut rng, count);

        assert_eq!(tree_integrity_issues(&items), Vec::<String>::new());

        let flat = flatten(&items);
        assert_eq!(flat_integrity_issues(&flat), Vec::<String>::new());
        assert_eq!(flat.len(), sorted_ids(&items).len());

        let rebuilt = super::build(&flat);
        assert_eq!(rebuilt, items, "seed {seed}");

        // The persisted set covers every node exactly once.
        let positions = position_updates(&items);
        assert_eq!(positions.len(), flat.len());
    }
}

#[test]
fn model_random_gestures_keep_integrity_and_the_id_set() {
    for seed in 1u64..=12u64 {
        let mut rng = Rng::new(seed);
        let count = 4 + rng.next_usize(16);
        let items = random_tree(&mut rng, count);
        let mut tree = SortableTree::with_items(SortableTreeOptions::default(), items);
        let ids = sorted_ids(tree.items());

        for _ in 0..24 {
            let flat = flatten(tree.items());
            let active = flat[rng.next_usize(flat.len())].id.clone();
            let over = flat[rng.next_usize(flat.len())].id.clone();

            tree.drag_start(&active);
            tree.drag_move(rng.next_offset());
            tree.drag_over(Some(&over));
            tree.drag_end(Some(&over));

            if rng.next_usize(4) == 0 {
                let flat = flatten(tree.items());
                let id = flat[rng.next_usize(flat.len())].id.clone();
                tree.toggle_collapsed(&id);
            }

            assert_eq!(
                tree_integrity_issues(tree.items()),
                Vec::<String>::new(),
                "seed {seed}"
            );
            assert_eq!(
                flat_integrity_issues(&flatten(tree.items())),
                Vec::<String>::new(),
                "seed {seed}"
            );
            assert_eq!(sorted_ids(tree.items()), ids, "seed {seed}");
        }
    }
}

#[test]
fn model_random_projections_always_name_a_legal_parent() {
    for seed in 1u64..=12u64 {
        let mut rng = Rng::new(seed);
        let count = 4 + rng.next_usize(16);
        let items = random_tree(&mut rng, count);
        let flat = flatten(&items);

        for _ in 0..64 {
            let active = flat[rng.next_usize(flat.len())].id.clone();
            let over = flat[rng.next_usize(flat.len())].id.clone();
            let mut exclude = collapsed_ids(&flat);
            exclude.insert(active.clone());
            let snapshot = remove_children_of(flat.clone(), &exclude);

            let Some(p) = project(&snapshot, &active, &over, rng.next_offset(), 20.0) else {
                continue;
            };
            match &p.parent_id {
                None => assert_eq!(p.depth, 0, "seed {seed}"),
                Some(parent_id) => {
                    let parent = snapshot
                        .iter()
                        .find(|item| item.id == *parent_id)
                        .unwrap_or_else(|| panic!("projected parent missing (seed {seed})"));
                    assert_eq!(parent.depth + 1, p.depth, "seed {seed}");
                    assert!(parent.can_have_children, "seed {seed}");
                }
            }
        }
    }
}
