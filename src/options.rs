use egui::Vec2;

/// Options for [`crate::PanelManager`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloaterOptions {
    /// Offset (in points) between a top-level window's outer position and its
    /// content origin, as drawn by the host environment's window chrome.
    ///
    /// Used to align the transient drag-feedback window with the panel it
    /// mirrors, and to translate a drop position back into surface
    /// coordinates. Theme/environment specific: zero for borderless hosts,
    /// something like `(10, 32)` for a single-border decorated main window.
    pub window_chrome_offset: Vec2,

    /// Opacity applied to the drag-feedback window while the pointer hovers
    /// inside the container surface's top-level window.
    ///
    /// This is the only signal of an impending dock (vs. undock) outcome, so
    /// keep it visibly different from `1.0`.
    pub preview_drop_opacity: f32,

    /// Opacity applied to the docked panel itself while its drag-feedback
    /// window is being dragged around. Restored to `1.0` when the drag ends.
    pub lifted_panel_opacity: f32,

    /// Whether independent windows hosting undocked panels should request OS
    /// window decorations (title bar, standard buttons).
    ///
    /// The drag-feedback window is always borderless regardless of this.
    pub undocked_window_decorations: bool,

    /// Whether the transient drag-feedback window should be kept above other
    /// windows for the duration of the drag.
    pub ghost_always_on_top: bool,

    /// Whether dropping an undocked panel's window inside the container
    /// surface's top-level window re-attaches the panel to the surface.
    ///
    /// - `true` (classic behavior): any drag released inside the host window
    ///   docks the panel, so undocking round-trips by drag alone.
    /// - `false`: drags of an already-undocked panel only move its window;
    ///   the panel stays undocked no matter where it is released.
    pub redock_window_on_drop_inside: bool,
}

impl Default for FloaterOptions {
    fn default() -> Self {
        Self {
            window_chrome_offset: Vec2::ZERO,
            preview_drop_opacity: 0.5,
            lifted_panel_opacity: 0.25,
            undocked_window_decorations: false,
            ghost_always_on_top: true,
            redock_window_on_drop_inside: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_borderless_with_redock() {
        let opt = FloaterOptions::default();
        assert_eq!(opt.window_chrome_offset, Vec2::ZERO);
        assert!(opt.redock_window_on_drop_inside);
        assert!(!opt.undocked_window_decorations);
        assert!(opt.preview_drop_opacity < 1.0);
        assert!(opt.lifted_panel_opacity < opt.preview_drop_opacity);
    }
}
