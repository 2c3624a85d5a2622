//! Hierarchical drag-and-drop reordering engine.
//!
//! A generic ordered tree plus a pointer-gesture-driven algorithm that
//! reparents and reorders nodes while preserving structural invariants and
//! emitting minimal persistence diffs. Rendering, input sensing, and the
//! network layer are the host's business: the engine consumes abstract drag
//! events and hands back flat row models and position updates.

#![forbid(unsafe_code)]

pub mod sortable;
pub mod tree_builder;

pub use sortable::{
    ChangeReason, FlatNode, MovementPhase, NodeId, PositionSink, PositionUpdate, Projection,
    RowModel, SortableTree, SortableTreeOptions, TreeChanged, TreeNode, build, changed_positions,
    collapsed_ids, descendant_count, find_item_deep, flat_integrity_issues, flatten,
    normalize_items, position_updates, project, remove_children_of, remove_item,
    tree_integrity_issues, update_item,
};
pub use tree_builder::TreeBuilder;

#[cfg(feature = "persistence")]
pub use sortable::{NodeSnapshot, SnapshotError, TREE_SNAPSHOT_VERSION, TreeSnapshot};
