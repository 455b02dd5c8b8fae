//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use wharf::{DockManager, Orientation, PaneId, Rect, SavedNode};

/// Workspace rectangle used across the suites
pub const BOUNDS: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1200.0,
    height: 800.0,
};

/// Create a manager with the standard test bounds and one seeded pane
pub fn test_manager() -> DockManager {
    DockManager::new(BOUNDS)
}

/// The seeded pane of a fresh manager
pub fn first_pane(dock: &DockManager) -> PaneId {
    dock.pane_ids()[0]
}

/// Verify the structural invariants that must hold after every completed
/// operation: unique pane occupancy, no degenerate splits, no
/// same-orientation nesting, and a live active pane.
pub fn assert_invariants(dock: &DockManager) {
    let state = dock.state();
    let mut seen = Vec::new();
    walk(&state.root, None, &mut seen);

    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), seen.len(), "pane referenced by two leaves");

    let docked: Vec<PaneId> = dock
        .pane_ids()
        .into_iter()
        .filter(|p| !dock.pane(*p).unwrap().is_floating())
        .collect();
    assert_eq!(seen, docked, "tree and registry disagree on docked panes");

    let active = dock.active_pane().expect("active pane is always set");
    assert!(dock.pane(active).is_some(), "active pane is not live");
}

fn walk(node: &SavedNode, parent: Option<Orientation>, seen: &mut Vec<PaneId>) {
    match node {
        SavedNode::Leaf { pane } => seen.push(*pane),
        SavedNode::Split {
            orientation,
            children,
        } => {
            assert!(children.len() >= 2, "split with fewer than two children");
            assert_ne!(
                Some(*orientation),
                parent,
                "split nested inside a same-orientation split"
            );
            for child in children {
                walk(child, Some(*orientation), seen);
            }
        }
    }
}
