//! The drag interaction: exclusive pointer-capture sessions and the
//! docked/undocked transition decided at release.
//!
//! A session starts in [`PanelManager::begin_drag`], tracks pointer samples
//! in [`PanelManager::continue_drag`], and resolves in
//! [`PanelManager::end_drag`]. At most one session exists per manager at a
//! time. There is no abort path other than `end_drag`.

use egui::{Pos2, Rect};

use crate::drag_visual::{DragVisualization, SnapshotId};
use crate::geometry::{pointer_in_host_window, surface_from_window};
use crate::host::{WindowConfig, WindowHost, WindowId};
use crate::manager::{PanelEvent, PanelManager};
use crate::panel::{PanelId, Placement};

/// The transient drag-feedback window overlaying a container-origin drag.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GhostWindow {
    pub(crate) window: WindowId,
    pub(crate) snapshot: Option<SnapshotId>,
}

/// State of one in-progress drag.
///
/// Pointer samples are local to the window that captured the drag: the main
/// application window for container-origin drags, the panel's own window for
/// drags that started undocked. A dragged independent window moves under the
/// pointer, restoring the grab point after every move, so window-origin
/// sessions measure each sample against the grab point instead of the
/// previous sample.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DragSession {
    pub(crate) panel: PanelId,
    last_pointer: Pos2,
    started_docked: bool,
    capture_window: Option<WindowId>,
    ghost: Option<GhostWindow>,
}

impl<C> PanelManager<C> {
    /// Start dragging a panel, capturing pointer input for it exclusively.
    ///
    /// Assigns the panel the next stacking rank. For a docked panel this
    /// lowers the panel's own opacity and, when the host supports independent
    /// windows, opens a borderless feedback window over the panel's current
    /// position showing a content snapshot (capture failure degrades to a
    /// snapshot-less window).
    ///
    /// Returns `false` when another drag is already in progress or the panel
    /// is unknown.
    pub fn begin_drag(
        &mut self,
        host: &mut dyn WindowHost,
        visual: &mut dyn DragVisualization,
        id: PanelId,
        pointer: Pos2,
    ) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(panel) = self.panel(id) else {
            return false;
        };
        let placement = panel.placement();
        let size = panel.size();
        let title = panel.title().to_owned();

        let z = self.allocate_z();
        let lifted = self.options.lifted_panel_opacity;
        let ghost_on_top = self.options.ghost_always_on_top;
        if let Some(panel) = self.panel_mut(id) {
            panel.z = z;
        }

        let session = match placement {
            Placement::Docked { pos } => {
                if let Some(panel) = self.panel_mut(id) {
                    panel.opacity = lifted;
                }
                let ghost = if host.supports_windows() {
                    let snapshot = visual.capture(id, size);
                    if snapshot.is_none() {
                        log::debug!("panel {id:?}: no drag snapshot, feedback window is blank");
                    }
                    let window = host.open_window(WindowConfig {
                        title,
                        rect: Rect::from_min_size(self.overlay_screen_pos(&*host, pos), size),
                        decorations: false,
                        always_on_top: ghost_on_top,
                    });
                    Some(GhostWindow { window, snapshot })
                } else {
                    None
                };
                DragSession {
                    panel: id,
                    last_pointer: pointer,
                    started_docked: true,
                    capture_window: None,
                    ghost,
                }
            }
            Placement::Undocked { window } => DragSession {
                panel: id,
                last_pointer: pointer,
                started_docked: false,
                capture_window: Some(window),
                ghost: None,
            },
        };

        log::debug!("panel {id:?}: drag started (docked: {})", session.started_docked);
        self.drag = Some(session);
        true
    }

    /// Feed a pointer sample into the active drag session; no-op without one.
    ///
    /// Moves the dragged panel (and its feedback window) by the pointer
    /// delta. While the pointer is over the main application window the
    /// moving window is dimmed to the preview-drop opacity, signaling that
    /// releasing would dock.
    pub fn continue_drag(&mut self, host: &mut dyn WindowHost, pointer: Pos2) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let id = session.panel;
        let started_docked = session.started_docked;
        let capture_window = session.capture_window;
        let ghost = session.ghost;
        let delta = pointer - session.last_pointer;
        if started_docked {
            session.last_pointer = pointer;
        }

        let inside = self.pointer_inside_host(&*host, capture_window, pointer);
        let preview = self.options.preview_drop_opacity;

        if started_docked {
            let mut new_pos = None;
            if let Some(panel) = self.panel_mut(id)
                && let Placement::Docked { pos } = &mut panel.placement
            {
                *pos += delta;
                new_pos = Some(*pos);
            }
            if let (Some(ghost), Some(pos)) = (ghost, new_pos) {
                let screen = self.overlay_screen_pos(&*host, pos);
                host.move_window(ghost.window, screen);
                host.set_window_opacity(ghost.window, if inside { preview } else { 1.0 });
            }
        } else if let Some(window) = capture_window {
            if let Some(rect) = host.window_rect(window) {
                host.move_window(window, rect.min + delta);
            }
            if self.options.redock_window_on_drop_inside {
                host.set_window_opacity(window, if inside { preview } else { 1.0 });
            }
        }
    }

    /// Release pointer capture and resolve the docking outcome.
    ///
    /// A container-origin drag released outside the main application window
    /// detaches the panel into an independent window (reusing the feedback
    /// window, or opening one if the feedback window never existed); released
    /// inside, the panel stays docked where `continue_drag` left it. A
    /// window-origin drag released inside re-docks the panel at the
    /// translated position when
    /// [`redock_window_on_drop_inside`](crate::FloaterOptions::redock_window_on_drop_inside)
    /// is set; in every other case the window simply stays where it was
    /// moved. [`PanelEvent::Moved`] and [`PanelEvent::Updated`] are raised
    /// regardless of the outcome. No-op without an active session.
    pub fn end_drag(
        &mut self,
        host: &mut dyn WindowHost,
        visual: &mut dyn DragVisualization,
        pointer: Pos2,
    ) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let id = session.panel;
        let chrome = self.options.window_chrome_offset;
        let decorations = self.options.undocked_window_decorations;
        let inside = self.pointer_inside_host(&*host, session.capture_window, pointer);

        if let Some(panel) = self.panel_mut(id) {
            panel.opacity = 1.0;
        }

        if session.started_docked {
            let undock = !inside && host.supports_windows();
            if undock {
                let window = match session.ghost {
                    Some(ghost) => {
                        if let Some(snapshot) = ghost.snapshot {
                            visual.discard(snapshot);
                        }
                        host.set_window_opacity(ghost.window, 1.0);
                        ghost.window
                    }
                    None => self.open_panel_window(host, id, decorations),
                };
                self.surface_mut().remove(id);
                if let Some(panel) = self.panel_mut(id) {
                    panel.placement = Placement::Undocked { window };
                }
                log::debug!("panel {id:?}: undocked");
            } else {
                if let Some(ghost) = session.ghost {
                    if let Some(snapshot) = ghost.snapshot {
                        visual.discard(snapshot);
                    }
                    host.close_window(ghost.window);
                }
                log::debug!("panel {id:?}: stays docked");
            }
        } else if let Some(window) = session.capture_window {
            if inside && self.options.redock_window_on_drop_inside {
                let pos = host
                    .window_rect(window)
                    .map(|r| surface_from_window(r.min, host.host_window_rect(), chrome));
                host.close_window(window);
                if let Some(pos) = pos {
                    self.surface_mut().insert(id);
                    if let Some(panel) = self.panel_mut(id) {
                        panel.placement = Placement::Docked { pos };
                    }
                    log::debug!("panel {id:?}: re-docked");
                }
            } else {
                host.set_window_opacity(window, 1.0);
            }
        }

        self.push_event(PanelEvent::Moved(id));
        self.push_event(PanelEvent::Updated);
    }

    /// Whether a drag session is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The panel holding pointer capture, if any.
    #[must_use]
    pub fn dragging_panel(&self) -> Option<PanelId> {
        self.drag.as_ref().map(|s| s.panel)
    }

    /// Drop the drag session if it belongs to `id`, closing its feedback
    /// window and releasing its snapshot. Used when a panel disappears
    /// mid-drag.
    pub(crate) fn abandon_drag_of(
        &mut self,
        host: &mut dyn WindowHost,
        visual: &mut dyn DragVisualization,
        id: PanelId,
    ) {
        if self.drag.as_ref().is_some_and(|s| s.panel == id)
            && let Some(session) = self.drag.take()
        {
            if let Some(ghost) = session.ghost {
                if let Some(snapshot) = ghost.snapshot {
                    visual.discard(snapshot);
                }
                host.close_window(ghost.window);
            }
            log::debug!("panel {id:?}: drag abandoned");
        }
    }

    fn pointer_inside_host(
        &self,
        host: &dyn WindowHost,
        capture_window: Option<WindowId>,
        pointer: Pos2,
    ) -> bool {
        let host_rect = host.host_window_rect();
        let chrome = self.options.window_chrome_offset;
        let origin = match capture_window {
            None => host_rect.min + chrome,
            Some(window) => match host.window_rect(window) {
                Some(rect) => rect.min + chrome,
                None => return false,
            },
        };
        pointer_in_host_window(pointer, origin, host_rect)
    }

    fn open_panel_window(
        &mut self,
        host: &mut dyn WindowHost,
        id: PanelId,
        decorations: bool,
    ) -> WindowId {
        let (title, rect) = match self.panel(id) {
            Some(panel) => {
                let pos = match panel.placement() {
                    Placement::Docked { pos } => pos,
                    Placement::Undocked { .. } => Pos2::ZERO,
                };
                (
                    panel.title().to_owned(),
                    Rect::from_min_size(self.overlay_screen_pos(host, pos), panel.size()),
                )
            }
            None => (String::new(), Rect::ZERO),
        };
        host.open_window(WindowConfig {
            title,
            rect,
            decorations,
            always_on_top: false,
        })
    }
}
