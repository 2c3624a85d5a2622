//! Screen-reader announcement strings for drag gestures.
//!
//! Deliberately decoupled from the core algorithm: plain functions over the
//! same session snapshot and projection the engine already computes. Hosts
//! that want different wording (or none) simply don't call them.

use itertools::Itertools as _;

use super::node::{FlatNode, NodeId};
use super::projection::Projection;

/// Whether a movement announcement describes an in-flight move or the drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementPhase {
    Move,
    Drop,
}

pub fn picked_up(active_id: &NodeId) -> String {
    format!("Picked up {active_id}.")
}

pub fn cancelled(active_id: &NodeId) -> String {
    format!("Moving was cancelled. {active_id} was dropped in its original position.")
}

/// "X was moved before/after Y." / "X was nested under Y.", matching how the
/// projected position relates to its neighbors.
pub fn movement<T>(
    items: &[FlatNode<T>],
    active_id: &NodeId,
    projection: &Projection,
    phase: MovementPhase,
) -> Option<String> {
    let moved_verb = match phase {
        MovementPhase::Move => "moved",
        MovementPhase::Drop => "dropped",
    };
    let nested_verb = match phase {
        MovementPhase::Move => "nested",
        MovementPhase::Drop => "dropped",
    };

    let Some(previous_id) = &projection.previous_id else {
        let next_id = projection.next_id.as_ref()?;
        return Some(format!("{active_id} was {moved_verb} before {next_id}."));
    };
    let (_, previous) = items.iter().find_position(|item| item.id == *previous_id)?;

    if projection.depth > previous.depth {
        return Some(format!("{active_id} was {nested_verb} under {previous_id}."));
    }

    // Climb from the previous item to the sibling that precedes the landing
    // position at the landing depth.
    let mut sibling = previous;
    while projection.depth < sibling.depth {
        sibling = sibling.parent(items)?;
    }
    Some(format!(
        "{active_id} was {moved_verb} after {}.",
        sibling.id
    ))
}
