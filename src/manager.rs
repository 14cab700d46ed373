//! The panel manager: one collection of floating panels over one container
//! surface.

use std::any::Any;
use std::collections::BTreeMap;

use egui::{Pos2, Rect, pos2, vec2};
use itertools::Itertools as _;

use crate::drag::DragSession;
use crate::drag_visual::DragVisualization;
use crate::geometry::{screen_from_surface, surface_from_screen};
use crate::host::{WindowConfig, WindowHost, WindowId};
use crate::layout::LayoutError;
use crate::options::FloaterOptions;
use crate::panel::{Panel, PanelId, PanelSpec, Placement};
use crate::provider::ContentProvider;
use crate::surface::Surface;

/// Provider registry handed to [`PanelManager::new`]: type name → provider.
/// Fixed for the manager's lifetime.
pub type ProviderRegistry<C> = ahash::HashMap<String, Box<dyn ContentProvider<C>>>;

/// Notifications raised by the manager, drained by the host.
///
/// `Updated` follows every `Moved`/`Closed`; hosts typically re-save the
/// layout on it. The manager does not debounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// A panel's drag ended (regardless of the docking outcome).
    Moved(PanelId),
    /// A panel was closed via its close affordance or its window.
    Closed(PanelId),
    /// The layout changed in a way worth persisting.
    Updated,
}

/// Owns the set of panels attached to one container surface: creation and
/// removal, the drag/docking state machine, z-order, and layout persistence.
///
/// `C` is the host's displayable-content type; content providers materialize
/// one `C` per panel from its opaque state.
///
/// Single-threaded by design: every operation runs on the host's UI thread.
pub struct PanelManager<C> {
    pub options: FloaterOptions,

    providers: ProviderRegistry<C>,
    panels: BTreeMap<PanelId, Panel<C>>,
    surface: Surface,

    next_panel_serial: u64,
    next_z: u64,

    pub(crate) drag: Option<DragSession>,
    events: Vec<PanelEvent>,
}

impl<C> PanelManager<C> {
    #[must_use]
    pub fn new(providers: ProviderRegistry<C>) -> Self {
        Self::with_options(providers, FloaterOptions::default())
    }

    #[must_use]
    pub fn with_options(providers: ProviderRegistry<C>, options: FloaterOptions) -> Self {
        Self {
            options,
            providers,
            panels: BTreeMap::new(),
            surface: Surface::default(),
            next_panel_serial: 1,
            next_z: 1,
            drag: None,
            events: Vec::new(),
        }
    }

    /// Create a panel and place it, docked into the surface or directly in
    /// its own independent window (`spec.undocked`, honored only when the
    /// host supports windows).
    ///
    /// `top`/`left` are surface-relative in both cases.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownProviderType`] when `spec.type_name` has no
    /// registered provider.
    pub fn add_panel(
        &mut self,
        host: &mut dyn WindowHost,
        spec: PanelSpec,
        state: Box<dyn Any>,
    ) -> Result<PanelId, LayoutError> {
        let provider = self
            .providers
            .get(&spec.type_name)
            .ok_or_else(|| LayoutError::UnknownProviderType(spec.type_name.clone()))?;
        let content = provider.create_content(state.as_ref());

        let id = PanelId::new(self.next_panel_serial);
        self.next_panel_serial += 1;

        let pos = pos2(spec.left, spec.top);
        let size = vec2(spec.width, spec.height);

        let placement = if spec.undocked && host.supports_windows() {
            let window = host.open_window(WindowConfig {
                title: spec.title.clone(),
                rect: Rect::from_min_size(
                    host.host_window_rect().min + pos.to_vec2(),
                    size,
                ),
                decorations: self.options.undocked_window_decorations,
                always_on_top: false,
            });
            Placement::Undocked { window }
        } else {
            self.surface.insert(id);
            Placement::Docked { pos }
        };

        self.panels.insert(
            id,
            Panel {
                id,
                title: spec.title,
                type_name: spec.type_name,
                size,
                placement,
                z: 0,
                opacity: 1.0,
                state,
                content,
            },
        );
        Ok(id)
    }

    /// Remove a panel from the surface and the collection; its independent
    /// window, if any, is closed, and an in-progress drag of it is abandoned
    /// (releasing any captured snapshot through `visual`). Removing an
    /// unknown id is a no-op.
    pub fn remove_panel(
        &mut self,
        host: &mut dyn WindowHost,
        visual: &mut dyn DragVisualization,
        id: PanelId,
    ) {
        self.abandon_drag_of(host, visual, id);
        let Some(panel) = self.panels.remove(&id) else {
            return;
        };
        self.surface.remove(id);
        if let Placement::Undocked { window } = panel.placement {
            host.close_window(window);
        }
    }

    /// The panel's close affordance: remove it, close its window when
    /// undocked, and raise [`PanelEvent::Closed`] + [`PanelEvent::Updated`].
    pub fn close_panel(
        &mut self,
        host: &mut dyn WindowHost,
        visual: &mut dyn DragVisualization,
        id: PanelId,
    ) {
        if !self.panels.contains_key(&id) {
            return;
        }
        self.remove_panel(host, visual, id);
        self.events.push(PanelEvent::Closed(id));
        self.events.push(PanelEvent::Updated);
    }

    /// The reverse close path: the host reports that an independent window
    /// was closed, and the panel it hosted closes with it.
    ///
    /// The window itself is already gone, so no `close_window` is issued —
    /// this is the guard that keeps the window/panel pair a single lifecycle
    /// unit without double-closing either side.
    pub fn handle_window_closed(
        &mut self,
        host: &mut dyn WindowHost,
        visual: &mut dyn DragVisualization,
        window: WindowId,
    ) {
        let closed = self
            .panels
            .values()
            .find(|p| p.placement == Placement::Undocked { window })
            .map(Panel::id);
        let Some(id) = closed else {
            return;
        };
        self.abandon_drag_of(host, visual, id);
        self.panels.remove(&id);
        self.events.push(PanelEvent::Closed(id));
        self.events.push(PanelEvent::Updated);
    }

    /// Drain all pending notifications, in the order they were raised.
    pub fn drain_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: PanelEvent) {
        self.events.push(event);
    }

    pub(crate) fn allocate_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    #[must_use]
    pub fn panel(&self, id: PanelId) -> Option<&Panel<C>> {
        self.panels.get(&id)
    }

    pub(crate) fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel<C>> {
        self.panels.get_mut(&id)
    }

    /// Panels in stable (creation) order.
    pub fn panels(&self) -> impl Iterator<Item = (&PanelId, &Panel<C>)> {
        self.panels.iter()
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Panel ids sorted back-to-front: the most recently picked-up panel
    /// comes last.
    #[must_use]
    pub fn panels_in_z_order(&self) -> Vec<PanelId> {
        self.panels
            .values()
            .sorted_by_key(|p| (p.z, p.id))
            .map(Panel::id)
            .collect()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub(crate) fn provider(&self, type_name: &str) -> Option<&dyn ContentProvider<C>> {
        self.providers.get(type_name).map(Box::as_ref)
    }

    /// Whether the panel is currently hosted in its own independent window.
    /// Unknown ids report `false`.
    #[must_use]
    pub fn is_undocked(&self, id: PanelId) -> bool {
        self.panels.get(&id).is_some_and(Panel::is_undocked)
    }

    /// The panel's top-left corner in surface coordinates, regardless of
    /// docking state: docked panels report their stored offset, undocked
    /// panels the projection of their window's screen position.
    #[must_use]
    pub fn panel_top_left(&self, host: &dyn WindowHost, id: PanelId) -> Option<Pos2> {
        self.panels.get(&id).map(|p| self.panel_top_left_inner(host, p))
    }

    /// Surface-relative bounds of the panel.
    #[must_use]
    pub fn panel_rect(&self, host: &dyn WindowHost, id: PanelId) -> Option<Rect> {
        self.panels
            .get(&id)
            .map(|p| Rect::from_min_size(self.panel_top_left_inner(host, p), p.size))
    }

    pub(crate) fn panel_top_left_inner(&self, host: &dyn WindowHost, panel: &Panel<C>) -> Pos2 {
        match panel.placement {
            Placement::Docked { pos } => pos,
            Placement::Undocked { window } => host
                .window_rect(window)
                .map(|r| surface_from_screen(r.min, host.host_window_rect()))
                .unwrap_or(Pos2::ZERO),
        }
    }

    /// Screen position for a window overlaying the given docked offset,
    /// including the configured chrome offset.
    pub(crate) fn overlay_screen_pos(&self, host: &dyn WindowHost, pos: Pos2) -> Pos2 {
        screen_from_surface(pos, host.host_window_rect(), self.options.window_chrome_offset)
    }
}
