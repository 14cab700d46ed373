//! The boundary to the host UI framework's top-level window primitives.
//!
//! The panel model never talks to a windowing backend directly: everything it
//! needs from the environment — "can I create independent windows at all?",
//! "where is the main window?", "open/move/close this window" — goes through
//! [`WindowHost`]. Two implementations ship with the crate:
//!
//! - [`EmbeddedHost`]: no independent-window support (the panel set lives
//!   entirely inside the surface, undocking is disabled).
//! - [`VirtualDesktop`]: an in-memory window table, useful for headless hosts
//!   and for testing the docking state machine without a real backend.

use std::collections::BTreeMap;

use egui::{Pos2, Rect};

/// Identifies one independent top-level window owned by a [`WindowHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Everything needed to open one independent top-level window.
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    /// Outer position and size, in screen coordinates.
    pub rect: Rect,
    pub decorations: bool,
    pub always_on_top: bool,
}

/// Host-environment capability for creating and moving independent top-level
/// windows, plus the screen geometry of the main application window.
///
/// All positions are screen coordinates. Implementations that return `false`
/// from [`Self::supports_windows`] will never receive `open_window`.
pub trait WindowHost {
    /// Whether this environment can create independent top-level windows.
    fn supports_windows(&self) -> bool;

    /// Screen rectangle of the main application window (the one hosting the
    /// container surface).
    fn host_window_rect(&self) -> Rect;

    fn open_window(&mut self, config: WindowConfig) -> WindowId;

    /// Screen rectangle of a previously opened window, or `None` once it has
    /// been closed.
    fn window_rect(&self, id: WindowId) -> Option<Rect>;

    fn move_window(&mut self, id: WindowId, pos: Pos2);

    fn set_window_opacity(&mut self, id: WindowId, opacity: f32);

    /// Closing an already-closed window is a no-op.
    fn close_window(&mut self, id: WindowId);
}

/// A host without independent-window support.
///
/// Panels managed over this host are always docked; drags move them within
/// the surface but never tear them off.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedHost {
    host_rect: Rect,
}

impl EmbeddedHost {
    #[must_use]
    pub fn new(host_rect: Rect) -> Self {
        Self { host_rect }
    }
}

impl WindowHost for EmbeddedHost {
    fn supports_windows(&self) -> bool {
        false
    }

    fn host_window_rect(&self) -> Rect {
        self.host_rect
    }

    fn open_window(&mut self, _config: WindowConfig) -> WindowId {
        // Unreachable for callers that check `supports_windows` first.
        WindowId::new(0)
    }

    fn window_rect(&self, _id: WindowId) -> Option<Rect> {
        None
    }

    fn move_window(&mut self, _id: WindowId, _pos: Pos2) {}

    fn set_window_opacity(&mut self, _id: WindowId, _opacity: f32) {}

    fn close_window(&mut self, _id: WindowId) {}
}

/// One window tracked by [`VirtualDesktop`].
#[derive(Clone, Debug)]
pub struct VirtualWindow {
    pub title: String,
    pub rect: Rect,
    pub decorations: bool,
    pub always_on_top: bool,
    pub opacity: f32,
}

/// An in-memory [`WindowHost`]: windows are plain records in a table.
///
/// Backends that drive a real windowing system can mirror this table into
/// native windows each frame; tests use it directly.
#[derive(Clone, Debug)]
pub struct VirtualDesktop {
    host_rect: Rect,
    windows: BTreeMap<WindowId, VirtualWindow>,
    next_serial: u64,
    closed_count: u64,
}

impl VirtualDesktop {
    #[must_use]
    pub fn new(host_rect: Rect) -> Self {
        Self {
            host_rect,
            windows: BTreeMap::new(),
            next_serial: 1,
            closed_count: 0,
        }
    }

    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&VirtualWindow> {
        self.windows.get(&id)
    }

    #[must_use]
    pub fn open_window_count(&self) -> usize {
        self.windows.len()
    }

    /// Total number of `close_window` calls that actually closed a window.
    #[must_use]
    pub fn closed_window_count(&self) -> u64 {
        self.closed_count
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &VirtualWindow)> {
        self.windows.iter().map(|(id, w)| (*id, w))
    }
}

impl WindowHost for VirtualDesktop {
    fn supports_windows(&self) -> bool {
        true
    }

    fn host_window_rect(&self) -> Rect {
        self.host_rect
    }

    fn open_window(&mut self, config: WindowConfig) -> WindowId {
        let id = WindowId::new(self.next_serial);
        self.next_serial = self.next_serial.saturating_add(1);
        self.windows.insert(
            id,
            VirtualWindow {
                title: config.title,
                rect: config.rect,
                decorations: config.decorations,
                always_on_top: config.always_on_top,
                opacity: 1.0,
            },
        );
        id
    }

    fn window_rect(&self, id: WindowId) -> Option<Rect> {
        self.windows.get(&id).map(|w| w.rect)
    }

    fn move_window(&mut self, id: WindowId, pos: Pos2) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.rect = Rect::from_min_size(pos, w.rect.size());
        }
    }

    fn set_window_opacity(&mut self, id: WindowId, opacity: f32) {
        if let Some(w) = self.windows.get_mut(&id) {
            w.opacity = opacity;
        }
    }

    fn close_window(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            self.closed_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Vec2, pos2};

    fn desktop() -> VirtualDesktop {
        VirtualDesktop::new(Rect::from_min_size(pos2(100.0, 50.0), Vec2::new(800.0, 600.0)))
    }

    #[test]
    fn open_move_close_window() {
        let mut desk = desktop();
        let id = desk.open_window(WindowConfig {
            title: "w".to_owned(),
            rect: Rect::from_min_size(pos2(10.0, 20.0), Vec2::new(200.0, 100.0)),
            decorations: false,
            always_on_top: false,
        });

        assert_eq!(desk.window_rect(id).expect("open").min, pos2(10.0, 20.0));

        desk.move_window(id, pos2(30.0, 40.0));
        let rect = desk.window_rect(id).expect("moved");
        assert_eq!(rect.min, pos2(30.0, 40.0));
        assert_eq!(rect.size(), Vec2::new(200.0, 100.0));

        desk.close_window(id);
        assert!(desk.window_rect(id).is_none());
        assert_eq!(desk.closed_window_count(), 1);

        // Second close is a no-op.
        desk.close_window(id);
        assert_eq!(desk.closed_window_count(), 1);
    }

    #[test]
    fn window_ids_are_unique() {
        let mut desk = desktop();
        let config = WindowConfig {
            title: "w".to_owned(),
            rect: Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0)),
            decorations: false,
            always_on_top: false,
        };
        let a = desk.open_window(config.clone());
        let b = desk.open_window(config);
        assert_ne!(a, b);
    }

    #[test]
    fn embedded_host_has_no_windows() {
        let host = EmbeddedHost::new(Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0)));
        assert!(!host.supports_windows());
        assert!(host.window_rect(WindowId::new(1)).is_none());
    }
}
