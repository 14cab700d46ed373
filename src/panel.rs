//! One floating panel: identity, geometry, docking placement, content.

use std::any::Any;

use egui::{Pos2, Vec2};

use crate::host::WindowId;

/// Identifies one panel within a [`crate::PanelManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(u64);

impl PanelId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Where a panel currently lives.
///
/// The variant decides which coordinate source is authoritative: a docked
/// panel stores its own surface-relative offset, an undocked panel's position
/// is whatever its window's screen position projects to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Child of the container surface, at a surface-relative offset.
    Docked { pos: Pos2 },
    /// Sole content of an independent top-level window.
    Undocked { window: WindowId },
}

/// Construction parameters for [`crate::PanelManager::add_panel`].
///
/// Geometry defaults mirror the classic layout: `top=100`, `left=200`,
/// `width=200`, `height=100`, docked.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelSpec {
    /// Content-provider type name; must be registered with the manager.
    pub type_name: String,
    pub title: String,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    /// Start as the sole content of an independent window instead of docked.
    /// Ignored when the host has no independent-window support.
    pub undocked: bool,
}

impl PanelSpec {
    #[must_use]
    pub fn new(type_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            title: title.into(),
            top: 100.0,
            left: 200.0,
            width: 200.0,
            height: 100.0,
            undocked: false,
        }
    }

    #[must_use]
    pub fn at(mut self, top: f32, left: f32) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn undocked(mut self, undocked: bool) -> Self {
        self.undocked = undocked;
        self
    }
}

/// One floating panel.
///
/// `C` is the host's displayable-content type, materialized by the panel's
/// content provider from the opaque state.
pub struct Panel<C> {
    pub(crate) id: PanelId,
    pub(crate) title: String,
    pub(crate) type_name: String,
    pub(crate) size: Vec2,
    pub(crate) placement: Placement,
    pub(crate) z: u64,
    pub(crate) opacity: f32,
    pub(crate) state: Box<dyn Any>,
    pub(crate) content: C,
}

impl<C> Panel<C> {
    #[must_use]
    pub fn id(&self) -> PanelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The provider type name this panel was created with; recorded in the
    /// layout document.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn is_undocked(&self) -> bool {
        matches!(self.placement, Placement::Undocked { .. })
    }

    /// Stacking rank: strictly increasing with each drag start, so the most
    /// recently picked-up panel renders above its siblings.
    #[must_use]
    pub fn z_index(&self) -> u64 {
        self.z
    }

    /// Render opacity for the panel's content. Lowered while the panel is
    /// the source of an in-progress drag.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// The opaque provider-owned content state.
    #[must_use]
    pub fn state(&self) -> &dyn Any {
        self.state.as_ref()
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }
}
