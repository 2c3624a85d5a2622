//! The drag-and-drop reordering engine for ordered trees.
//!
//! [`SortableTree`] owns the current tree and the state of at most one drag
//! gesture. An input adapter (pointer sensor, test harness, ...) feeds it
//! abstract drag events; the engine projects the legal landing position on
//! every move, commits the reordered tree on drop, and emits minimal
//! position-update diffs to a debounced persistence sink.
//!
//! Everything is synchronous and single-threaded. Trees are immutable value
//! snapshots: each commit replaces the tree wholesale, so a concurrent reader
//! always sees either the old or the new, fully formed structure.

use std::collections::VecDeque;
use std::time::Instant;

use itertools::Itertools as _;

mod announce;
mod flatten;
mod integrity;
mod mutate;
mod node;
mod options;
mod persist;
mod positions;
mod projection;
mod session;

#[cfg(feature = "persistence")]
mod snapshot;

#[cfg(test)]
mod flatten_tests;
#[cfg(test)]
mod model_tests;

pub use announce::{MovementPhase, cancelled, movement, picked_up};
pub use flatten::{build, collapsed_ids, flatten, remove_children_of};
pub use integrity::{flat_integrity_issues, tree_integrity_issues};
pub use mutate::{descendant_count, find_item_deep, remove_item, update_item};
pub use node::{FlatNode, NodeId, RowModel, TreeNode, normalize_items};
pub use options::SortableTreeOptions;
pub use persist::PositionSink;
pub use positions::{PositionUpdate, changed_positions, position_updates};
pub use projection::{Projection, drag_depth, project};

#[cfg(feature = "persistence")]
pub use snapshot::{NodeSnapshot, SnapshotError, TREE_SNAPSHOT_VERSION, TreeSnapshot};

use persist::PositionDebouncer;
use session::{DragState, SessionCounter};

/// Why the tree changed, with the payload hosts typically need to react.
#[derive(Clone, Debug)]
pub enum ChangeReason<T> {
    /// A drag gesture committed: the item moved and/or reparented.
    Dropped {
        /// The dragged item's position in the new tree.
        dragged: FlatNode<T>,
        from_parent: Option<NodeId>,
        to_parent: Option<NodeId>,
    },
    Collapsed {
        id: NodeId,
    },
    Expanded {
        id: NodeId,
    },
    Removed {
        /// The excised subtree.
        item: TreeNode<T>,
    },
}

/// Emitted by every mutating operation that actually changed the tree.
///
/// The new tree itself is read back via [`SortableTree::items`]; `version` is
/// the structural version after the change, so hosts can detect staleness
/// without reference tricks.
#[derive(Clone, Debug)]
pub struct TreeChanged<T> {
    pub reason: ChangeReason<T>,
    pub version: u64,
}

/// The drag session controller: owns the tree, the gesture state, and the
/// persistence debouncer.
#[derive(Debug)]
pub struct SortableTree<T> {
    options: SortableTreeOptions,
    items: Vec<TreeNode<T>>,
    version: u64,
    drag: Option<DragState<T>>,
    sessions: SessionCounter,
    debouncer: PositionDebouncer,
    /// Position set of the last tree the sink was (or will be) told about.
    /// Drops that don't change it never produce a write.
    baseline: Vec<PositionUpdate>,
    debug_log: VecDeque<String>,
}

impl<T: Clone> Default for SortableTree<T> {
    fn default() -> Self {
        Self::new(SortableTreeOptions::default())
    }
}

impl<T: Clone> SortableTree<T> {
    pub fn new(options: SortableTreeOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            version: 0,
            drag: None,
            sessions: SessionCounter::default(),
            debouncer: PositionDebouncer::default(),
            baseline: Vec::new(),
            debug_log: VecDeque::new(),
        }
    }

    pub fn with_items(options: SortableTreeOptions, items: Vec<TreeNode<T>>) -> Self {
        let mut this = Self::new(options);
        this.set_items(items);
        this
    }

    pub fn options(&self) -> &SortableTreeOptions {
        &self.options
    }

    /// The current tree. Replaced wholesale on every change; never mutated in
    /// place.
    pub fn items(&self) -> &[TreeNode<T>] {
        &self.items
    }

    /// Monotonically increasing structural version. Changes iff the tree
    /// changed; hosts compare against a remembered value to decide whether to
    /// re-diff or re-render.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the tree from the host (initial load, server refresh).
    ///
    /// Normalizes the leaf invariant, cancels any in-flight drag, and resets
    /// the persistence baseline: a host-supplied tree is by definition already
    /// persisted, so replacing it must never trigger a write.
    pub fn set_items(&mut self, mut items: Vec<TreeNode<T>>) {
        node::normalize_items(&mut items);
        if self.options.debug_integrity {
            for issue in integrity::tree_integrity_issues(&items) {
                log::warn!("set_items: {issue}");
            }
        }
        if let Some(drag) = self.drag.take() {
            self.log_event(format!(
                "session CANCEL id={} (set_items while dragging)",
                drag.session_id
            ));
        }
        self.items = items;
        self.version += 1;
        self.baseline = positions::position_updates(&self.items);
    }

    // ------------------------------------------------------------------
    // Gesture lifecycle

    /// Begin a drag session for `id`.
    ///
    /// Snapshots the flattened tree minus collapsed branches and minus the
    /// dragged subtree; drop candidates for the whole gesture come from that
    /// snapshot. No-op if a session is already active or `id` is unknown.
    pub fn drag_start(&mut self, id: &NodeId) {
        if let Some(drag) = &self.drag {
            let message = format!(
                "session START ignored id={id} (session {} active)",
                drag.session_id
            );
            self.log_event(message);
            return;
        }

        let flat = flatten::flatten(&self.items);
        if !flat.iter().any(|item| item.id == *id) {
            log::debug!("drag_start: unknown id {id}");
            return;
        }
        let mut exclude = flatten::collapsed_ids(&flat);
        exclude.insert(id.clone());
        let snapshot = flatten::remove_children_of(flat, &exclude);

        let session_id = self.sessions.begin();
        self.log_event(format!("session START id={session_id} active={id}"));
        self.drag = Some(DragState {
            session_id,
            active_id: id.clone(),
            over_id: Some(id.clone()),
            offset_x: 0.0,
            snapshot,
            announced: None,
        });
    }

    /// Update the horizontal offset of the in-flight gesture. Purely updates
    /// the projection preview; no structural mutation.
    pub fn drag_move(&mut self, delta_x: f32) {
        if let Some(drag) = &mut self.drag {
            drag.offset_x = delta_x;
        }
    }

    /// Update which item the pointer is over.
    pub fn drag_over(&mut self, over_id: Option<&NodeId>) {
        if let Some(drag) = &mut self.drag {
            drag.over_id = over_id.cloned();
        }
    }

    /// The live projection of the in-flight gesture, re-evaluated from current
    /// `(over_id, offset_x)`: where the dragged item would land if dropped now.
    pub fn projection(&self) -> Option<Projection> {
        let drag = self.drag.as_ref()?;
        let over_id = drag.over_id.as_ref()?;
        projection::project(
            &drag.snapshot,
            &drag.active_id,
            over_id,
            drag.offset_x,
            self.options.indentation_width,
        )
    }

    /// Commit the gesture: splice the dragged item out, reinsert it at the
    /// projected position, rebuild the tree, and queue a persistence write if
    /// (and only if) positions actually changed.
    ///
    /// With no `over_id` or no valid projection the tree is left untouched.
    pub fn drag_end(&mut self, over_id: Option<&NodeId>) -> Option<TreeChanged<T>> {
        let drag = self.drag.take()?;
        let session_id = drag.session_id;

        let Some(over_id) = over_id else {
            self.log_event(format!("session END id={session_id} outcome=no-target"));
            return None;
        };
        let Some(projection) = projection::project(
            &drag.snapshot,
            &drag.active_id,
            over_id,
            drag.offset_x,
            self.options.indentation_width,
        ) else {
            self.log_event(format!("session END id={session_id} outcome=no-projection"));
            return None;
        };

        // Work on the full flat list (collapsed branches included) so hidden
        // descendants follow their parents through the rebuild.
        let mut flat = flatten::flatten(&self.items);
        let Some((over_ix, _)) = flat.iter().find_position(|item| item.id == *over_id) else {
            self.log_event(format!("session END id={session_id} outcome=over-vanished"));
            return None;
        };
        let Some((active_ix, _)) = flat
            .iter()
            .find_position(|item| item.id == drag.active_id)
        else {
            self.log_event(format!("session END id={session_id} outcome=active-vanished"));
            return None;
        };

        let from_parent = flat[active_ix].parent_id.clone();
        flat[active_ix].depth = projection.depth;
        flat[active_ix].parent_id = projection.parent_id.clone();
        let moved = flat.remove(active_ix);
        flat.insert(over_ix.min(flat.len()), moved);

        let new_items = flatten::build(&flat);
        let new_flat = flatten::flatten(&new_items);
        let Some(dragged) = new_flat.into_iter().find(|item| item.id == drag.active_id) else {
            // Rebuild is total over its input, so the dragged id is always
            // reconstructed; guard anyway rather than unwrap.
            self.log_event(format!("session END id={session_id} outcome=rebuild-lost"));
            return None;
        };
        let to_parent = dragged.parent_id.clone();

        self.log_event(format!(
            "session DROP id={session_id} active={} over={over_id} depth={} parent={}",
            drag.active_id,
            projection.depth,
            to_parent
                .as_ref()
                .map_or_else(|| "-".to_owned(), |id| id.to_string()),
        ));

        self.commit(new_items);
        self.queue_positions_if_changed();

        Some(TreeChanged {
            reason: ChangeReason::Dropped {
                dragged,
                from_parent,
                to_parent,
            },
            version: self.version,
        })
    }

    /// Abort the gesture: all pending state is discarded, no mutation ever
    /// becomes visible, no event is emitted.
    pub fn drag_cancel(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.log_event(format!("session CANCEL id={}", drag.session_id));
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active_id(&self) -> Option<&NodeId> {
        self.drag.as_ref().map(|drag| &drag.active_id)
    }

    /// `1 +` total descendants of the dragged item, the count a drag overlay
    /// shows as "moving N items". `None` when idle.
    pub fn drag_overlay_count(&self) -> Option<usize> {
        let drag = self.drag.as_ref()?;
        Some(1 + mutate::descendant_count(&self.items, &drag.active_id))
    }

    // ------------------------------------------------------------------
    // Idle-only operations

    /// Toggle a node's collapsed flag. Only valid between gestures; emits
    /// `Collapsed`/`Expanded` by the node's *new* state and never touches
    /// persistence: a collapsed branch is hidden, not moved.
    pub fn toggle_collapsed(&mut self, id: &NodeId) -> Option<TreeChanged<T>> {
        if self.drag.is_some() {
            log::debug!("toggle_collapsed({id}) ignored while dragging");
            return None;
        }
        mutate::find_item_deep(&self.items, id)?;

        let mut now_collapsed = false;
        let new_items = mutate::update_item(&self.items, id, &mut |node| {
            node.collapsed = !node.collapsed;
            now_collapsed = node.collapsed;
        });
        self.commit(new_items);

        let reason = if now_collapsed {
            ChangeReason::Collapsed { id: id.clone() }
        } else {
            ChangeReason::Expanded { id: id.clone() }
        };
        Some(TreeChanged {
            reason,
            version: self.version,
        })
    }

    /// Excise a subtree. Only valid between gestures.
    ///
    /// Deliberately does not queue a persistence write: deleting the node is
    /// the host's own mutation, and the sibling index shifts it causes ride
    /// along with the next drop's full position set. The baseline is refreshed
    /// so that next drop diffs against the post-removal tree.
    pub fn remove(&mut self, id: &NodeId) -> Option<TreeChanged<T>> {
        if self.drag.is_some() {
            log::debug!("remove({id}) ignored while dragging");
            return None;
        }
        let item = mutate::find_item_deep(&self.items, id)?.clone();

        let new_items = mutate::remove_item(&self.items, id);
        self.commit(new_items);
        self.baseline = positions::position_updates(&self.items);

        Some(TreeChanged {
            reason: ChangeReason::Removed { item },
            version: self.version,
        })
    }

    // ------------------------------------------------------------------
    // Rendering contract

    /// The visible rows, top to bottom: collapsed branches hidden, the dragged
    /// subtree hidden, and the dragged row previewing its projected depth.
    pub fn rows(&self) -> Vec<RowModel> {
        let flat = flatten::flatten(&self.items);
        let mut exclude = flatten::collapsed_ids(&flat);
        if let Some(drag) = &self.drag {
            exclude.insert(drag.active_id.clone());
        }
        let visible = flatten::remove_children_of(flat, &exclude);

        let active_id = self.active_id().cloned();
        let projection = self.projection();
        visible
            .into_iter()
            .map(|item| {
                let projected = match (&active_id, &projection) {
                    (Some(active), Some(projection)) if *active == item.id => {
                        Some((projection.depth, projection.is_last))
                    }
                    _ => None,
                };
                let (depth, is_last) = projected.unwrap_or((item.depth, item.is_last));
                RowModel {
                    id: item.id,
                    depth,
                    is_last,
                    collapsed: item.collapsed,
                    child_count: item.child_count,
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Announcements

    /// Announcement for the start of the in-flight gesture.
    pub fn announce_pickup(&self) -> Option<String> {
        self.drag.as_ref().map(|drag| announce::picked_up(&drag.active_id))
    }

    /// Announcement for the current projected position, deduplicated: repeats
    /// of the same `(parent, over)` pair return `None`.
    pub fn announce_movement(&mut self) -> Option<String> {
        let projection = self.projection()?;
        let drag = self.drag.as_mut()?;
        let over_id = drag.over_id.clone()?;

        let key = (projection.parent_id.clone(), over_id);
        if drag.announced.as_ref() == Some(&key) {
            return None;
        }
        drag.announced = Some(key);

        announce::movement(
            &drag.snapshot,
            &drag.active_id,
            &projection,
            announce::MovementPhase::Move,
        )
    }

    /// Announcement for a drop onto `over_id`; call before [`Self::drag_end`].
    pub fn announce_drop(&self, over_id: &NodeId) -> Option<String> {
        let drag = self.drag.as_ref()?;
        let projection = projection::project(
            &drag.snapshot,
            &drag.active_id,
            over_id,
            drag.offset_x,
            self.options.indentation_width,
        )?;
        announce::movement(
            &drag.snapshot,
            &drag.active_id,
            &projection,
            announce::MovementPhase::Drop,
        )
    }

    /// Announcement for a cancelled gesture; call before [`Self::drag_cancel`].
    pub fn announce_cancel(&self) -> Option<String> {
        self.drag.as_ref().map(|drag| announce::cancelled(&drag.active_id))
    }

    // ------------------------------------------------------------------
    // Persistence

    /// Drive the debounced persistence write. Call periodically (or after
    /// `persist_debounce` has elapsed since the last change); forwards the
    /// pending position set to `sink` once its window has elapsed.
    pub fn pump(&mut self, now: Instant, sink: &mut dyn PositionSink) {
        if let Some(updates) = self.debouncer.take_due(now) {
            self.send(&updates, sink);
        }
    }

    /// Forward any pending write immediately (host teardown).
    pub fn flush(&mut self, sink: &mut dyn PositionSink) {
        if let Some(updates) = self.debouncer.take_now() {
            self.send(&updates, sink);
        }
    }

    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn send(&mut self, updates: &[PositionUpdate], sink: &mut dyn PositionSink) {
        // Fire and forget: a failed write is logged and never retried; the
        // in-memory tree stays authoritative until the next full reload.
        let ok = sink.update_positions(updates);
        self.log_event(format!(
            "persist WRITE items={} ok={ok}",
            updates.len()
        ));
        if !ok {
            log::warn!("position update write failed for {} items", updates.len());
        }
    }

    fn queue_positions_if_changed(&mut self) {
        let new_positions = positions::position_updates(&self.items);
        if new_positions == self.baseline {
            self.log_event("persist SKIP unchanged".to_owned());
            return;
        }
        let changed = positions::changed_positions(&self.baseline, &new_positions);
        self.log_event(format!(
            "persist QUEUE changed={} total={}",
            changed.len(),
            new_positions.len()
        ));
        self.baseline = new_positions.clone();
        self.debouncer
            .queue(new_positions, Instant::now(), self.options.persist_debounce);
    }

    // ------------------------------------------------------------------

    fn commit(&mut self, new_items: Vec<TreeNode<T>>) {
        if self.options.debug_integrity {
            let issues = integrity::tree_integrity_issues(&new_items);
            for issue in &issues {
                log::warn!("commit: {issue}");
            }
            if !issues.is_empty() {
                self.log_event(format!("integrity ISSUES n={}", issues.len()));
            }
        }
        self.items = new_items;
        self.version += 1;
    }

    fn log_event(&mut self, message: String) {
        log::debug!("{message}");
        if !self.options.debug_event_log {
            return;
        }
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(message);
    }

    /// The in-memory event log (empty unless `debug_event_log` is set).
    pub fn debug_log(&self) -> impl Iterator<Item = &str> {
        self.debug_log.iter().map(String::as_str)
    }
}
