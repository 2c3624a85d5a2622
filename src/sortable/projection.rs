//! Live computation of where the dragged item would land if dropped now.

use itertools::Itertools as _;

use super::node::{FlatNode, NodeId};

/// The projected landing position of the dragged item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Depth the item would land at.
    pub depth: usize,
    /// Parent it would land under (`None` at depth 0). Always names a node at
    /// `depth - 1`.
    pub parent_id: Option<NodeId>,
    /// Whether the item would be the last of its new siblings.
    pub is_last: bool,
    /// Item immediately before the insertion point, if any. Context for
    /// announcement formatting; not needed to apply the drop.
    pub previous_id: Option<NodeId>,
    /// Item immediately after the insertion point, if any.
    pub next_id: Option<NodeId>,
}

/// Convert a horizontal pointer offset into a depth delta.
pub fn drag_depth(offset_x: f32, indentation_width: f32) -> isize {
    if indentation_width <= 0.0 {
        return 0;
    }
    (offset_x / indentation_width).round() as isize
}

/// Compute the legal landing position for `active_id` hovering over `over_id`.
///
/// `items` must be the session's candidate list: the flattened tree minus
/// collapsed branches and minus the dragged subtree (which is what makes
/// self-nesting impossible). Pure and synchronous; re-evaluated on every
/// pointer move. Returns `None` when either id is not in the list.
///
/// Bounds:
/// - an item may nest at most one level deeper than the item above it, and
///   not at all under one that cannot have children;
/// - it may not end up shallower than the item that follows it, so it never
///   swallows later unrelated siblings;
/// - with nothing above it, depth 0 is forced.
pub fn project<T>(
    items: &[FlatNode<T>],
    active_id: &NodeId,
    over_id: &NodeId,
    offset_x: f32,
    indentation_width: f32,
) -> Option<Projection> {
    let (over_ix, _) = items.iter().find_position(|item| item.id == *over_id)?;
    let (active_ix, _) = items.iter().find_position(|item| item.id == *active_id)?;

    // Simulate the insertion: move the active item to the hovered slot.
    let mut order: Vec<usize> = (0..items.len()).collect();
    let moved = order.remove(active_ix);
    order.insert(over_ix, moved);

    let previous = (over_ix > 0).then(|| &items[order[over_ix - 1]]);
    let next = order.get(over_ix + 1).map(|&ix| &items[ix]);

    let max_depth = previous.map_or(0, |prev| {
        if prev.can_have_children {
            prev.depth + 1
        } else {
            prev.depth
        }
    });
    let min_depth = next.map_or(0, |next| next.depth);
    debug_assert!(min_depth <= max_depth, "inverted depth bounds");

    let projected = previous.map_or(0, |prev| {
        let depth = prev.depth as isize + drag_depth(offset_x, indentation_width);
        depth.max(0) as usize
    });
    let depth = projected.max(min_depth).min(max_depth);

    let parent_id = if depth == 0 {
        None
    } else {
        // Walk the previous item's ancestor chain down to depth - 1; that
        // ancestor is the parent the dragged item would attach to.
        let mut ancestor = previous?;
        while ancestor.depth > depth - 1 {
            ancestor = ancestor.parent(items)?;
        }
        Some(ancestor.id.clone())
    };

    // `min_depth` already guarantees `next.depth <= depth`; a strictly
    // shallower next item means no sibling follows at the landing depth.
    let is_last = next.is_none_or(|next| next.depth < depth);

    Some(Projection {
        depth,
        parent_id,
        is_last,
        previous_id: previous.map(|prev| prev.id.clone()),
        next_id: next.map(|next| next.id.clone()),
    })
}
