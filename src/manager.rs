//! The docking manager facade
//!
//! `DockManager` composes the pane registry, the layout tree, and the drag
//! controller behind the host-facing API: split/move/close operations called
//! directly, a pointer surface feeding the drag controller, and
//! serialize/restore for persistence. The manager always holds at least one
//! pane; the workspace is never empty.
//!
//! Failures are absorbed as no-ops (stale references, refused
//! restructurings) and logged at `debug!` - invalid ids are a normal
//! outcome of UI races and must never take the workspace down.

use crate::drag::{
    DragController, DragOutcome, DragSession, DragUpdate, DropTarget, HoverZone, Overlay,
};
use crate::geometry::{Point, Rect};
use crate::pane::{ContentId, Pane, PaneEvent, PaneId, PaneRegistry};
use crate::persist::{self, SavedState};
use crate::tree::{LayoutTree, Orientation, PaneRect};
use crate::zones::{DropPosition, EdgeBands};

/// How far a floating pane may leave the workspace while its grab area
/// stays reachable
const FLOAT_GRAB_MARGIN: f32 = 32.0;

/// Where an external payload was released, for the host to act on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropLocation {
    /// `None` when the drop targeted the workspace itself
    pub pane: Option<PaneId>,
    pub position: DropPosition,
}

/// Arranges panes into a recursively split, drag-restructurable workspace
#[derive(Debug, Clone)]
pub struct DockManager {
    bounds: Rect,
    panes: PaneRegistry,
    tree: LayoutTree,
    drag: DragController,
    active: Option<PaneId>,
    /// Floating panes, bottom to top
    float_order: Vec<PaneId>,
}

impl DockManager {
    /// Create a manager seeded with a single pane filling `bounds`
    pub fn new(bounds: Rect) -> Self {
        let mut panes = PaneRegistry::new();
        let first = panes.create();
        Self {
            bounds,
            panes,
            tree: LayoutTree::new(first),
            drag: DragController::new(),
            active: Some(first),
            float_order: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Update the workspace rectangle, pulling floating panes back inside
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        for pane in self.float_order.clone() {
            if let Some(rect) = self.panes.get(pane).and_then(|p| p.floating) {
                self.place_floating(pane, rect.x, rect.y);
            }
        }
    }

    // ========================================================================
    // Pane accessors
    // ========================================================================

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(id)
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// All live pane ids: docked panes in document order, then floating
    /// panes bottom to top
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids = self.tree.pane_ids();
        ids.extend(self.float_order.iter().copied());
        ids
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.active
    }

    /// Activate a pane; unknown ids and `None` are no-ops
    pub fn set_active_pane(&mut self, pane: Option<PaneId>) {
        let Some(pane) = pane else {
            return;
        };
        if !self.panes.contains(pane) {
            tracing::debug!(target: "layout", pane = pane.0, "activate: unknown pane");
            return;
        }
        self.active = Some(pane);
        self.raise_floating(pane);
    }

    /// Whether the close affordance should show for this pane
    pub fn pane_closable(&self, pane: PaneId) -> bool {
        match self.panes.get(pane) {
            Some(p) => p.closable && self.panes.len() > 1,
            None => false,
        }
    }

    pub fn set_pane_content(&mut self, pane: PaneId, content: ContentId) {
        self.panes.set_content(pane, content);
    }

    pub fn clear_pane(&mut self, pane: PaneId) {
        self.panes.clear_content(pane);
    }

    pub fn set_pane_title(&mut self, pane: PaneId, title: &str) {
        self.panes.set_title(pane, title);
    }

    /// Drain queued content mount/unmount notifications
    pub fn take_events(&mut self) -> Vec<PaneEvent> {
        self.panes.take_events()
    }

    /// Equal-division rectangles for the docked panes
    pub fn pane_rects(&self) -> Vec<PaneRect> {
        self.tree.pane_rects(self.bounds)
    }

    // ========================================================================
    // Tree operations
    // ========================================================================

    /// Split the leaf holding `pane`, creating and activating a new pane
    ///
    /// Returns `None` when `pane` is unknown or floating.
    pub fn split_pane(&mut self, pane: PaneId, orientation: Orientation) -> Option<PaneId> {
        if self.tree.leaf_for_pane(pane).is_none() {
            tracing::debug!(target: "layout", pane = pane.0, "split: pane not docked");
            return None;
        }
        let new_pane = self.panes.create();
        self.tree.split_leaf(pane, orientation, new_pane);
        self.active = Some(new_pane);
        tracing::debug!(
            target: "layout",
            pane = pane.0,
            new_pane = new_pane.0,
            ?orientation,
            "split"
        );
        Some(new_pane)
    }

    /// Re-dock `source` relative to `target` (or the workspace root)
    ///
    /// `Center` over a pane swaps the two leaves in place; `Center` over the
    /// workspace is a no-op. Edge positions detach the source and splice or
    /// wrap it on the named side. Invalid input never mutates the tree.
    pub fn move_pane(&mut self, source: PaneId, target: Option<PaneId>, position: DropPosition) {
        if !self.panes.contains(source) {
            tracing::debug!(target: "layout", pane = source.0, "move: unknown pane");
            return;
        }
        if target == Some(source) {
            return;
        }

        if position == DropPosition::Center {
            let Some(target) = target else {
                tracing::debug!(target: "layout", "move: center drop on workspace is a no-op");
                return;
            };
            let (Some(a), Some(b)) = (
                self.tree.leaf_for_pane(source),
                self.tree.leaf_for_pane(target),
            ) else {
                return;
            };
            if self.tree.swap_leaves(a, b) {
                self.active = Some(source);
            }
            return;
        }

        // the target must be resolvable before anything is detached
        if let Some(target) = target {
            if self.tree.leaf_for_pane(target).is_none() {
                tracing::debug!(target: "layout", pane = target.0, "move: target not docked");
                return;
            }
        }

        let source_leaf = match self.tree.leaf_for_pane(source) {
            Some(leaf) => {
                if leaf == self.tree.root() {
                    tracing::debug!(target: "layout", "move: refusing to detach the last docked pane");
                    return;
                }
                self.tree.detach(leaf);
                leaf
            }
            None => {
                // a floating pane docks back in through the same path
                let Some(pane) = self.panes.get_mut(source) else {
                    return;
                };
                if pane.floating.take().is_none() {
                    return;
                }
                self.float_order.retain(|p| *p != source);
                self.tree.alloc_leaf(source)
            }
        };

        let target_leaf = target.and_then(|t| self.tree.leaf_for_pane(t));
        self.tree.insert_relative(source_leaf, target_leaf, position);
        self.active = Some(source);
        tracing::debug!(
            target: "layout",
            pane = source.0,
            to = target.map(|t| t.0),
            ?position,
            "move"
        );
    }

    /// Close a pane, returning the active pane afterwards
    ///
    /// The last pane is cleared rather than removed. Closing the active pane
    /// activates a surviving one.
    pub fn close_pane(&mut self, pane: PaneId) -> Option<PaneId> {
        if !self.panes.contains(pane) {
            return None;
        }
        if self.panes.len() <= 1 {
            self.panes.clear_content(pane);
            return Some(pane);
        }

        // remember a survivor before anything is removed
        let fallback = self.pane_ids().into_iter().find(|p| *p != pane);

        if let Some(leaf) = self.tree.leaf_for_pane(pane) {
            if leaf == self.tree.root() {
                // only floating panes remain; the tree keeps its last leaf
                self.panes.clear_content(pane);
                tracing::debug!(target: "layout", pane = pane.0, "close: last docked pane cleared");
                return Some(pane);
            }
            self.tree.remove_leaf(leaf);
        } else {
            self.float_order.retain(|p| *p != pane);
        }
        self.panes.remove(pane);

        if self.active == Some(pane) {
            self.active = fallback.or_else(|| self.tree.first_pane());
        }
        tracing::debug!(target: "layout", pane = pane.0, "close");
        self.active
    }

    // ========================================================================
    // Floating panes
    // ========================================================================

    /// Detach a pane from the tree and give it free geometry
    ///
    /// Refused for the last docked pane - the tree is never emptied.
    pub fn float_pane(&mut self, pane: PaneId, rect: Rect) -> bool {
        let Some(p) = self.panes.get(pane) else {
            return false;
        };
        if p.is_floating() {
            if let Some(p) = self.panes.get_mut(pane) {
                p.floating = Some(rect);
            }
            return true;
        }
        let Some(leaf) = self.tree.leaf_for_pane(pane) else {
            return false;
        };
        if leaf == self.tree.root() {
            tracing::debug!(target: "layout", "float: refusing to detach the last docked pane");
            return false;
        }
        self.tree.remove_leaf(leaf);
        if let Some(p) = self.panes.get_mut(pane) {
            p.floating = Some(rect);
        }
        self.float_order.push(pane);
        self.active = Some(pane);
        true
    }

    fn raise_floating(&mut self, pane: PaneId) {
        if let Some(idx) = self.float_order.iter().position(|p| *p == pane) {
            let pane = self.float_order.remove(idx);
            self.float_order.push(pane);
        }
    }

    fn place_floating(&mut self, pane: PaneId, x: f32, y: f32) {
        let bounds = self.bounds;
        if let Some(rect) = self
            .panes
            .get_mut(pane)
            .and_then(|p| p.floating.as_mut())
        {
            let lo_x = bounds.x - rect.width + FLOAT_GRAB_MARGIN;
            let hi_x = (bounds.right() - FLOAT_GRAB_MARGIN).max(lo_x);
            let hi_y = (bounds.bottom() - FLOAT_GRAB_MARGIN).max(bounds.y);
            rect.x = x.clamp(lo_x, hi_x);
            rect.y = y.clamp(bounds.y, hi_y);
        }
    }

    // ========================================================================
    // Drag sessions
    // ========================================================================

    /// Pointer pressed on pane chrome: arm a dock drag, or start moving a
    /// floating pane directly
    pub fn pointer_down(&mut self, pane: PaneId, point: Point) {
        let Some(p) = self.panes.get(pane) else {
            return;
        };
        if let Some(rect) = p.floating {
            self.set_active_pane(Some(pane));
            self.drag
                .begin_float_move(pane, Point::new(point.x - rect.x, point.y - rect.y));
        } else if self.tree.contains_pane(pane) {
            self.drag.arm(pane, point);
        }
    }

    /// Pointer pressed on a floating pane's corner handle
    pub fn begin_float_resize(&mut self, pane: PaneId, point: Point) -> bool {
        let Some(rect) = self.panes.get(pane).and_then(|p| p.floating) else {
            return false;
        };
        self.set_active_pane(Some(pane));
        self.drag
            .begin_float_resize(pane, point, (rect.width, rect.height));
        true
    }

    /// A native drag started on pane chrome: enter dragging immediately
    pub fn begin_native_drag(&mut self, pane: PaneId) -> bool {
        if self.tree.leaf_for_pane(pane).is_none() {
            return false;
        }
        let overlay = self.build_overlay(Some(pane), Point::new(-1.0, -1.0));
        self.drag.begin_dock(pane, overlay);
        true
    }

    /// Advance the active drag session. Returns whether a redraw is needed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match self.drag.on_move(point) {
            DragUpdate::None => false,
            DragUpdate::DragStarted { source } => {
                let overlay = self.build_overlay(Some(source), point);
                self.drag.begin_dock(source, overlay);
                true
            }
            DragUpdate::HoverChanged => true,
            DragUpdate::FloatMoved { pane, x, y } => {
                self.place_floating(pane, x, y);
                true
            }
            DragUpdate::FloatResized {
                pane,
                width,
                height,
            } => {
                if let Some(rect) = self
                    .panes
                    .get_mut(pane)
                    .and_then(|p| p.floating.as_mut())
                {
                    rect.width = width;
                    rect.height = height;
                }
                true
            }
        }
    }

    /// End the active drag session, committing a drop if one is hovered
    pub fn pointer_up(&mut self, point: Point) -> Option<DragOutcome> {
        let outcome = self.drag.on_release(point)?;
        match outcome {
            DragOutcome::Click { pane } => self.set_active_pane(Some(pane)),
            DragOutcome::Drop {
                source,
                target,
                position,
            } => self.move_pane(source, target, position),
            DragOutcome::ExternalDrop { .. }
            | DragOutcome::FloatDone { .. }
            | DragOutcome::Cancelled => {}
        }
        Some(outcome)
    }

    /// Abort the active session (escape, pointer leaving the workspace).
    /// The tree is exactly as it was when the session started.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn drag_overlay(&self) -> Option<&Overlay> {
        self.drag.overlay()
    }

    /// The single highlighted zone, if a dock drag is hovering one
    pub fn hovered_zone(&self) -> Option<&HoverZone> {
        self.drag.hovered()
    }

    fn build_overlay(&self, exclude: Option<PaneId>, pointer: Point) -> Overlay {
        // workspace edge set first: it is the topmost layer of the overlay
        let mut targets = vec![DropTarget {
            pane: None,
            rect: self.bounds,
            bands: EdgeBands::WORKSPACE,
            allow_center: false,
        }];
        for pane_rect in self.tree.pane_rects(self.bounds) {
            if Some(pane_rect.pane) == exclude {
                continue;
            }
            targets.push(DropTarget {
                pane: Some(pane_rect.pane),
                rect: pane_rect.rect,
                bands: EdgeBands::PANE,
                allow_center: true,
            });
        }
        Overlay::new(targets, pointer)
    }

    // ========================================================================
    // External drags
    // ========================================================================

    /// Whether a drag payload from outside the manager could drop here
    pub fn can_accept_external_drop(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// An external payload entered the workspace: classify and highlight
    /// exactly like an internal drag
    pub fn external_drag_enter(&mut self, point: Point) {
        let overlay = self.build_overlay(None, point);
        self.drag.begin_external(overlay);
    }

    pub fn external_drag_over(&mut self, point: Point) -> bool {
        self.pointer_move(point)
    }

    pub fn external_drag_leave(&mut self) {
        self.drag.cancel();
    }

    /// The external payload was released; the effect belongs to the host
    pub fn external_drop(&mut self, point: Point) -> Option<DropLocation> {
        if !matches!(self.drag.session(), Some(DragSession::External { .. })) {
            return None;
        }
        match self.drag.on_release(point)? {
            DragOutcome::ExternalDrop { target, position } => Some(DropLocation {
                pane: target,
                position,
            }),
            _ => None,
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Snapshot the tree and active pane as a serializable value
    pub fn state(&self) -> SavedState {
        SavedState {
            root: persist::snapshot(&self.tree, self.tree.root()),
            active_pane: self.active,
        }
    }

    /// Replace the layout with a restored one
    ///
    /// Pane ids from the snapshot are reused and the id generator reseeded
    /// past the largest of them; an active id absent from the rebuilt set
    /// falls back to the first pane in document order. Any in-flight drag is
    /// cancelled and floating panes are discarded with the old layout.
    pub fn restore(&mut self, state: &SavedState) {
        self.drag.cancel();

        // unmount everything the old layout held, then start over
        self.panes.reset();
        self.panes.reseed_past(state.root.max_pane_id());

        let mut tree = LayoutTree::empty();
        let root = persist::rebuild(&state.root, &mut self.panes, &mut tree);
        tree.set_root(root);
        tree.normalize();
        self.tree = tree;
        self.float_order.clear();

        self.active = state
            .active_pane
            .filter(|p| self.tree.contains_pane(*p))
            .or_else(|| self.tree.first_pane());
        tracing::debug!(
            target: "persist",
            panes = self.panes.len(),
            active = self.active.map(|p| p.0),
            "restored layout"
        );
    }
}
