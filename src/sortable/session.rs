use super::node::{FlatNode, NodeId};

/// State of one drag gesture, owned by the controller.
///
/// Created at `drag_start`, replaced wholesale through move/over, and dropped
/// at end/cancel; it never outlives the gesture.
#[derive(Clone, Debug)]
pub(super) struct DragState<T> {
    pub(super) session_id: u64,
    pub(super) active_id: NodeId,
    pub(super) over_id: Option<NodeId>,
    /// Horizontal pointer offset since `drag_start`.
    pub(super) offset_x: f32,
    /// The flattened tree at `drag_start`, minus collapsed branches and minus
    /// the dragged subtree. Drop candidates come from here, which is what
    /// rules out dropping a node into its own descendants.
    pub(super) snapshot: Vec<FlatNode<T>>,
    /// Last announced `(parent_id, over_id)`, to avoid repeating the same
    /// movement announcement on every pointer event.
    pub(super) announced: Option<(Option<NodeId>, NodeId)>,
}

/// Allocates per-gesture session ids, for log correlation.
#[derive(Debug, Default)]
pub(super) struct SessionCounter {
    next_id: u64,
}

impl SessionCounter {
    pub(super) fn begin(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        id
    }
}
