//! The container surface's child list.
//!
//! Docked panels are members of exactly one surface. The surface only tracks
//! membership and insertion order; positions and stacking ranks live on the
//! panels themselves.

use crate::panel::PanelId;

#[derive(Clone, Debug, Default)]
pub struct Surface {
    children: Vec<PanelId>,
}

impl Surface {
    /// Attach a panel to the surface. Inserting an already-attached panel is
    /// a no-op, so a panel is never listed twice.
    pub(crate) fn insert(&mut self, id: PanelId) {
        if !self.contains(id) {
            self.children.push(id);
        }
    }

    /// Detach a panel. Returns whether it was attached.
    pub(crate) fn remove(&mut self, id: PanelId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != id);
        self.children.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: PanelId) -> bool {
        self.children.contains(&id)
    }

    /// Attached panels in insertion order.
    #[must_use]
    pub fn children(&self) -> &[PanelId] {
        &self.children
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut surface = Surface::default();
        let id = PanelId::new(1);
        surface.insert(id);
        surface.insert(id);
        assert_eq!(surface.children(), &[id]);
    }

    #[test]
    fn remove_reports_membership() {
        let mut surface = Surface::default();
        let id = PanelId::new(1);
        surface.insert(id);
        assert!(surface.remove(id));
        assert!(!surface.remove(id));
        assert!(surface.is_empty());
    }
}
