#![forbid(unsafe_code)]

pub mod drag_visual;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod manager;
pub mod options;
pub mod panel;
pub mod provider;
pub mod surface;

mod drag;

pub use drag_visual::{DragVisualization, NoDragVisualization, SnapshotId};
pub use host::{EmbeddedHost, VirtualDesktop, VirtualWindow, WindowConfig, WindowHost, WindowId};
pub use layout::{LayoutError, RestoreReport, SkippedRecord};
pub use manager::{PanelEvent, PanelManager, ProviderRegistry};
pub use options::FloaterOptions;
pub use panel::{Panel, PanelId, PanelSpec, Placement};
pub use provider::{ContentProvider, MessageProvider, StateReader, StateWriter};
pub use surface::Surface;
