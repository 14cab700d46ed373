//! Coordinate projections between surface space and screen space.
//!
//! Docked panels store a surface-relative offset; undocked panels live in
//! independent windows positioned in screen coordinates. These projections
//! keep every reported position surface-relative regardless of where the
//! panel currently lives.

use egui::{Pos2, Rect, Vec2};

/// Project a surface-relative offset to a screen position for a window that
/// should visually overlay the docked panel.
///
/// `chrome` is the host window's chrome offset (see
/// [`crate::FloaterOptions::window_chrome_offset`]).
pub fn screen_from_surface(surface_pos: Pos2, host_rect: Rect, chrome: Vec2) -> Pos2 {
    host_rect.min + chrome + surface_pos.to_vec2()
}

/// Project an independent window's screen position back into surface space.
pub fn surface_from_window(window_min: Pos2, host_rect: Rect, chrome: Vec2) -> Pos2 {
    (window_min - host_rect.min - chrome).to_pos2()
}

/// Surface-relative position of an undocked panel, derived from the two
/// absolute window origins.
pub fn surface_from_screen(window_min: Pos2, host_rect: Rect) -> Pos2 {
    (window_min - host_rect.min).to_pos2()
}

/// Whether a pointer position, reported relative to the window that captured
/// it, lands inside the main application window.
///
/// `capture_origin` is the current screen position of the capturing window.
pub fn pointer_in_host_window(pointer_local: Pos2, capture_origin: Pos2, host_rect: Rect) -> bool {
    let screen = capture_origin + pointer_local.to_vec2();
    host_rect.contains(screen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn host() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn surface_screen_round_trip() {
        let chrome = Vec2::new(10.0, 32.0);
        let pos = pos2(200.0, 100.0);
        let screen = screen_from_surface(pos, host(), chrome);
        assert_eq!(screen, pos2(310.0, 182.0));
        assert_eq!(surface_from_window(screen, host(), chrome), pos);
    }

    #[test]
    fn surface_projection_ignores_chrome() {
        assert_eq!(surface_from_screen(pos2(150.0, 70.0), host()), pos2(50.0, 20.0));
    }

    #[test]
    fn pointer_inside_host() {
        // Pointer captured by the host window itself.
        assert!(pointer_in_host_window(pos2(5.0, 5.0), host().min, host()));
        assert!(!pointer_in_host_window(pos2(-5.0, 5.0), host().min, host()));

        // Pointer captured by an independent window left of the host.
        let window_origin = pos2(0.0, 60.0);
        assert!(!pointer_in_host_window(pos2(10.0, 10.0), window_origin, host()));
        assert!(pointer_in_host_window(pos2(150.0, 10.0), window_origin, host()));
    }
}
