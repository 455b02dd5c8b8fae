//! wharf - a recursive split-pane docking layout manager
//!
//! This crate owns the workspace structure of a pane-based application:
//! an arbitrary number of resizable, closable content panes arranged by a
//! recursively split layout tree, restructured by drag-and-drop, floated
//! freely, and serialized for persistence. Rendering, the content hosted
//! inside panes, and storage I/O all stay with the host; the manager hands
//! out rectangles, mount/unmount notifications, and a serializable value.
//!
//! The entry point is [`DockManager`]:
//!
//! ```
//! use wharf::{DockManager, Orientation, Rect};
//!
//! let mut dock = DockManager::new(Rect::new(0.0, 0.0, 1280.0, 800.0));
//! let first = dock.pane_ids()[0];
//! let second = dock.split_pane(first, Orientation::Horizontal).unwrap();
//! assert_eq!(dock.active_pane(), Some(second));
//! ```

pub mod drag;
pub mod geometry;
pub mod manager;
pub mod pane;
pub mod persist;
pub mod tree;
pub mod zones;

// Re-export commonly used types
pub use drag::{DragController, DragOutcome, DragSession, DropTarget, HoverZone, Overlay};
pub use geometry::{Point, Rect};
pub use manager::{DockManager, DropLocation};
pub use pane::{ContentId, Pane, PaneEvent, PaneId};
pub use persist::{SavedNode, SavedState};
pub use tree::{Node, NodeId, Orientation, PaneRect};
pub use zones::{classify, DropPosition, EdgeBands};
