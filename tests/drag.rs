//! Tests for drag sessions: click vs drag, commits, cancellation, floating

mod common;

use common::{assert_invariants, first_pane, test_manager};
use wharf::{
    DragOutcome, DropPosition, Orientation, PaneId, Point, Rect, SavedNode,
};

fn leaf_ids(node: &SavedNode) -> Vec<PaneId> {
    match node {
        SavedNode::Leaf { pane } => vec![*pane],
        SavedNode::Split { children, .. } => children.iter().flat_map(leaf_ids).collect(),
    }
}

// With the 1200x800 test bounds, three horizontal panes tile at x = 0, 400
// and 800; the workspace edge set claims the outer 200px on every side.

// ============================================================================
// Click vs drag
// ============================================================================

#[test]
fn test_plain_click_activates_without_restructuring() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let before = dock.state();
    assert_eq!(dock.active_pane(), Some(p2));

    dock.pointer_down(p1, Point::new(100.0, 400.0));
    dock.pointer_move(Point::new(101.0, 401.0));
    let outcome = dock.pointer_up(Point::new(101.0, 401.0));

    assert_eq!(outcome, Some(DragOutcome::Click { pane: p1 }));
    assert_eq!(dock.active_pane(), Some(p1));
    // only the active pane changed
    assert_eq!(dock.state().root, before.root);
    assert!(dock.drag_session().is_none());
}

#[test]
fn test_threshold_crossing_builds_the_overlay() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    dock.split_pane(p1, Orientation::Horizontal).unwrap();

    dock.pointer_down(p1, Point::new(100.0, 400.0));
    assert!(dock.drag_overlay().is_none());

    dock.pointer_move(Point::new(120.0, 400.0));
    let overlay = dock.drag_overlay().expect("overlay built past threshold");
    // workspace target plus every pane except the source
    assert_eq!(overlay.targets().len(), 2);
    assert_eq!(overlay.pointer(), Point::new(120.0, 400.0));
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn test_drop_on_pane_edge_commits_a_move() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let p3 = dock.split_pane(p2, Orientation::Horizontal).unwrap();

    // drag p3 into p1's right band (x in 260..400, clear of workspace bands)
    dock.pointer_down(p3, Point::new(900.0, 400.0));
    dock.pointer_move(Point::new(300.0, 400.0));
    let zone = dock.hovered_zone().copied().expect("zone highlighted");
    assert_eq!(zone.target, Some(p1));
    assert_eq!(zone.position, DropPosition::Right);

    let outcome = dock.pointer_up(Point::new(300.0, 400.0));
    assert_eq!(
        outcome,
        Some(DragOutcome::Drop {
            source: p3,
            target: Some(p1),
            position: DropPosition::Right,
        })
    );
    assert_eq!(leaf_ids(&dock.state().root), vec![p1, p3, p2]);
    assert_eq!(dock.active_pane(), Some(p3));
    assert!(dock.drag_session().is_none());
    assert_invariants(&dock);
}

#[test]
fn test_drop_on_pane_center_swaps() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let p3 = dock.split_pane(p2, Orientation::Horizontal).unwrap();

    // p1's center region survives between the workspace band (x >= 200) and
    // its own right band (x < 260)
    dock.pointer_down(p3, Point::new(900.0, 400.0));
    dock.pointer_move(Point::new(230.0, 400.0));
    let zone = dock.hovered_zone().copied().unwrap();
    assert_eq!(zone.target, Some(p1));
    assert_eq!(zone.position, DropPosition::Center);

    dock.pointer_up(Point::new(230.0, 400.0));
    assert_eq!(leaf_ids(&dock.state().root), vec![p3, p2, p1]);
    assert_eq!(dock.active_pane(), Some(p3));
    assert_invariants(&dock);
}

#[test]
fn test_drop_on_workspace_edge_docks_against_root() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();

    // the workspace bottom band (y >= 600) outranks pane zones
    dock.pointer_down(p1, Point::new(100.0, 400.0));
    dock.pointer_move(Point::new(600.0, 700.0));
    let zone = dock.hovered_zone().copied().unwrap();
    assert_eq!(zone.target, None);
    assert_eq!(zone.position, DropPosition::Bottom);

    dock.pointer_up(Point::new(600.0, 700.0));
    let state = dock.state();
    match &state.root {
        SavedNode::Split {
            orientation,
            children,
        } => {
            assert_eq!(*orientation, Orientation::Vertical);
            assert_eq!(leaf_ids(&children[0]), vec![p2]);
            assert_eq!(leaf_ids(&children[1]), vec![p1]);
        }
        other => panic!("expected split root, got {:?}", other),
    }
    assert_invariants(&dock);
}

#[test]
fn test_native_drag_skips_the_threshold() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let p3 = dock.split_pane(p2, Orientation::Horizontal).unwrap();

    assert!(dock.begin_native_drag(p3));
    assert!(dock.drag_overlay().is_some());

    dock.pointer_move(Point::new(300.0, 400.0));
    dock.pointer_up(Point::new(300.0, 400.0));

    assert_eq!(leaf_ids(&dock.state().root), vec![p1, p3, p2]);
    assert_invariants(&dock);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_release_over_no_zone_cancels() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let before = dock.state();

    dock.pointer_down(p1, Point::new(100.0, 400.0));
    dock.pointer_move(Point::new(600.0, 400.0));
    let outcome = dock.pointer_up(Point::new(600.0, 900.0));

    assert_eq!(outcome, Some(DragOutcome::Cancelled));
    assert_eq!(dock.state(), before);
    assert_invariants(&dock);
}

#[test]
fn test_explicit_cancel_leaves_the_tree_untouched() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let before = dock.state();

    dock.pointer_down(p1, Point::new(100.0, 400.0));
    dock.pointer_move(Point::new(650.0, 400.0));
    assert!(dock.hovered_zone().is_some());

    assert!(dock.cancel_drag());
    assert!(dock.drag_session().is_none());
    assert!(dock.hovered_zone().is_none());
    assert_eq!(dock.state(), before);

    // the pointer-up that follows the cancel is inert
    assert_eq!(dock.pointer_up(Point::new(650.0, 400.0)), None);
}

#[test]
fn test_starting_a_new_session_cancels_the_old_one() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();

    dock.pointer_down(p1, Point::new(100.0, 400.0));
    dock.pointer_down(p2, Point::new(700.0, 400.0));

    let outcome = dock.pointer_up(Point::new(700.0, 400.0));
    assert_eq!(outcome, Some(DragOutcome::Click { pane: p2 }));
}

// ============================================================================
// Floating sessions
// ============================================================================

#[test]
fn test_float_move_tracks_the_pointer() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    dock.float_pane(p2, Rect::new(100.0, 100.0, 400.0, 300.0));

    dock.pointer_down(p2, Point::new(150.0, 120.0));
    dock.pointer_move(Point::new(500.0, 400.0));

    let rect = dock.pane(p2).unwrap().floating.unwrap();
    assert_eq!((rect.x, rect.y), (450.0, 380.0));

    let outcome = dock.pointer_up(Point::new(500.0, 400.0));
    assert_eq!(outcome, Some(DragOutcome::FloatDone { pane: p2 }));
    assert!(dock.pane(p2).unwrap().is_floating());
    assert_invariants(&dock);
}

#[test]
fn test_float_move_clamps_to_the_workspace() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    dock.float_pane(p2, Rect::new(100.0, 100.0, 400.0, 300.0));

    dock.pointer_down(p2, Point::new(100.0, 100.0));
    dock.pointer_move(Point::new(-5000.0, -5000.0));
    let rect = dock.pane(p2).unwrap().floating.unwrap();
    assert_eq!(rect.x, -368.0, "grab margin stays reachable on the left");
    assert_eq!(rect.y, 0.0, "title bar never leaves the top edge");

    dock.pointer_move(Point::new(5000.0, 5000.0));
    let rect = dock.pane(p2).unwrap().floating.unwrap();
    assert_eq!(rect.x, 1168.0);
    assert_eq!(rect.y, 768.0);
}

#[test]
fn test_float_resize_clamps_to_minimum_size() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    dock.float_pane(p2, Rect::new(100.0, 100.0, 400.0, 300.0));

    assert!(dock.begin_float_resize(p2, Point::new(500.0, 400.0)));
    dock.pointer_move(Point::new(600.0, 500.0));
    let rect = dock.pane(p2).unwrap().floating.unwrap();
    assert_eq!((rect.width, rect.height), (500.0, 400.0));

    dock.pointer_move(Point::new(-5000.0, -5000.0));
    let rect = dock.pane(p2).unwrap().floating.unwrap();
    assert_eq!((rect.width, rect.height), (160.0, 120.0));

    dock.pointer_up(Point::new(-5000.0, -5000.0));
    assert!(dock.drag_session().is_none());
}

#[test]
fn test_float_sessions_never_touch_the_tree() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    dock.float_pane(p2, Rect::new(100.0, 100.0, 400.0, 300.0));
    let before = dock.state().root;

    dock.pointer_down(p2, Point::new(150.0, 120.0));
    dock.pointer_move(Point::new(900.0, 700.0));
    dock.pointer_up(Point::new(900.0, 700.0));

    assert_eq!(dock.state().root, before);
    assert!(dock.pane(p2).unwrap().is_floating());
}

// ============================================================================
// External drags
// ============================================================================

#[test]
fn test_external_drag_classifies_like_an_internal_one() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    let p2 = dock.split_pane(p1, Orientation::Horizontal).unwrap();
    let before = dock.state();

    assert!(dock.can_accept_external_drop(Point::new(650.0, 400.0)));
    assert!(!dock.can_accept_external_drop(Point::new(-10.0, 400.0)));

    dock.external_drag_enter(Point::new(650.0, 400.0));
    let zone = dock.hovered_zone().copied().unwrap();
    assert_eq!(zone.target, Some(p2));
    assert_eq!(zone.position, DropPosition::Left);

    let location = dock.external_drop(Point::new(650.0, 400.0)).unwrap();
    assert_eq!(location.pane, Some(p2));
    assert_eq!(location.position, DropPosition::Left);

    // the effect belongs to the host: nothing moved
    assert_eq!(dock.state(), before);
    assert!(dock.drag_session().is_none());
}

#[test]
fn test_external_drag_targets_every_pane() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    dock.split_pane(p1, Orientation::Horizontal).unwrap();

    dock.external_drag_enter(Point::new(650.0, 400.0));
    // workspace target plus both panes - no source to exclude
    assert_eq!(dock.drag_overlay().unwrap().targets().len(), 3);

    dock.external_drag_leave();
    assert!(dock.drag_session().is_none());
}

#[test]
fn test_external_drop_outside_any_zone_is_none() {
    let mut dock = test_manager();

    dock.external_drag_enter(Point::new(600.0, 400.0));
    assert_eq!(dock.external_drop(Point::new(600.0, 900.0)), None);
    assert!(dock.drag_session().is_none());
}

#[test]
fn test_external_drop_without_a_session_is_none() {
    let mut dock = test_manager();
    let p1 = first_pane(&dock);
    dock.split_pane(p1, Orientation::Horizontal).unwrap();

    assert_eq!(dock.external_drop(Point::new(650.0, 400.0)), None);

    // and it must not consume an unrelated internal session
    dock.pointer_down(p1, Point::new(100.0, 400.0));
    assert_eq!(dock.external_drop(Point::new(650.0, 400.0)), None);
    assert!(dock.drag_session().is_some());
}
