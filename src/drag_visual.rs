//! Snapshot imagery for drag feedback.
//!
//! While a docked panel is being dragged, its drag-feedback window shows a
//! bitmap snapshot of the panel's content. Producing that bitmap needs a real
//! rendering surface, which the docking state machine must not depend on, so
//! it is isolated behind [`DragVisualization`]. A failed or unavailable
//! capture degrades to a snapshot-less feedback window; it never aborts the
//! drag.

use egui::Vec2;

use crate::panel::PanelId;

/// Identifies one captured snapshot owned by a [`DragVisualization`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub u64);

/// Renders and owns content snapshots used as drag-feedback imagery.
pub trait DragVisualization {
    /// Try to capture the panel's current content at the given size.
    ///
    /// Return `None` when capturing is unavailable or fails; the drag
    /// continues without an image.
    fn capture(&mut self, panel: PanelId, size: Vec2) -> Option<SnapshotId>;

    /// Release a snapshot once its drag-feedback window no longer shows it.
    fn discard(&mut self, snapshot: SnapshotId);
}

/// A [`DragVisualization`] for environments without a rendering surface.
/// Never produces a snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDragVisualization;

impl DragVisualization for NoDragVisualization {
    fn capture(&mut self, _panel: PanelId, _size: Vec2) -> Option<SnapshotId> {
        None
    }

    fn discard(&mut self, _snapshot: SnapshotId) {}
}
