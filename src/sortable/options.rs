use std::time::Duration;

/// Options for [`super::SortableTree`].
#[derive(Clone, Debug)]
pub struct SortableTreeOptions {
    /// Unit distance (in whatever length unit the input adapter reports,
    /// typically pixels) representing one depth level. Horizontal drag offset
    /// divided by this gives the intended depth delta.
    ///
    /// This should match the indentation used by the row renderer.
    pub indentation_width: f32,

    /// Trailing-edge debounce window for position persistence. Bursts of
    /// structural changes within the window coalesce into one write that
    /// reflects only the final state.
    pub persist_debounce: Duration,

    /// Keep an in-memory event log of session and drop decisions
    /// (see [`super::SortableTree::debug_log`]).
    pub debug_event_log: bool,

    /// Ring-buffer capacity of the event log.
    pub debug_event_log_capacity: usize,

    /// Run structural self-checks after every commit and log any findings.
    /// Cheap for interactive tree sizes; intended for development builds.
    pub debug_integrity: bool,
}

impl Default for SortableTreeOptions {
    fn default() -> Self {
        Self {
            indentation_width: 20.0,
            persist_debounce: Duration::from_millis(300),
            debug_event_log: false,
            debug_event_log_capacity: 256,
            debug_integrity: cfg!(debug_assertions),
        }
    }
}
