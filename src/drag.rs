//! Drag sessions - pointer-driven pane dragging
//!
//! One controller, one optional session: starting any session implicitly
//! cancels the previous one, so there is never more than one drag in flight.
//! Sessions are transport-agnostic; native drag-and-drop callbacks and raw
//! pointer events both feed the same `on_move`/`on_release` pair.
//!
//! A pointer-down arms a pending session that only becomes a drag once the
//! pointer travels past a small threshold, so a plain click stays a click.
//! Dock drags carry an overlay of candidate drop targets; floating move and
//! resize sessions track pointer deltas directly and never touch the tree.

use crate::geometry::{Point, Rect};
use crate::pane::PaneId;
use crate::zones::{classify, DropPosition, EdgeBands};

/// Movement (in logical px) before a pressed pointer becomes a drag
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Smallest size a floating pane can be resized to
pub const MIN_FLOAT_SIZE: (f32, f32) = (160.0, 120.0);

/// One candidate drop target in the overlay
///
/// Targets are stored top z-order first: the workspace edge set precedes the
/// per-pane sets, matching the stacking the pointer actually sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    /// `None` is the whole-workspace target
    pub pane: Option<PaneId>,
    pub rect: Rect,
    pub bands: EdgeBands,
    /// Whether a `Center` classification counts (pane targets only)
    pub allow_center: bool,
}

impl DropTarget {
    /// The docking preview rectangle a host draws for a hovered zone
    pub fn preview_rect(&self, position: DropPosition) -> Rect {
        let r = self.rect;
        match position {
            DropPosition::Left => Rect::new(r.x, r.y, r.width / 2.0, r.height),
            DropPosition::Right => Rect::new(r.x + r.width / 2.0, r.y, r.width / 2.0, r.height),
            DropPosition::Top => Rect::new(r.x, r.y, r.width, r.height / 2.0),
            DropPosition::Bottom => Rect::new(r.x, r.y + r.height / 2.0, r.width, r.height / 2.0),
            DropPosition::Center => r,
        }
    }
}

/// The zone currently highlighted under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverZone {
    pub target: Option<PaneId>,
    pub position: DropPosition,
    /// Preview rectangle for highlight rendering
    pub rect: Rect,
}

/// Candidate targets plus hover state for an in-flight dock drag
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    targets: Vec<DropTarget>,
    hovered: Option<HoverZone>,
    /// Ghost token position, tracking the pointer
    pointer: Point,
}

impl Overlay {
    pub fn new(targets: Vec<DropTarget>, pointer: Point) -> Self {
        let mut overlay = Self {
            targets,
            hovered: None,
            pointer,
        };
        overlay.update(pointer);
        overlay
    }

    pub fn targets(&self) -> &[DropTarget] {
        &self.targets
    }

    pub fn hovered(&self) -> Option<&HoverZone> {
        self.hovered.as_ref()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Re-classify against the target stack; exactly one zone (or none) is
    /// highlighted afterwards. Returns whether the highlight changed.
    fn update(&mut self, point: Point) -> bool {
        self.pointer = point;
        let mut hovered = None;
        for target in &self.targets {
            match classify(point, target.rect, target.bands) {
                Some(DropPosition::Center) if !target.allow_center => continue,
                Some(position) => {
                    hovered = Some(HoverZone {
                        target: target.pane,
                        position,
                        rect: target.preview_rect(position),
                    });
                    break;
                }
                None => continue,
            }
        }
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }
}

/// The session-lived state of one drag
#[derive(Debug, Clone, PartialEq)]
pub enum DragSession {
    /// Pointer is down on pane chrome but has not crossed the threshold
    Pending { source: PaneId, origin: Point },
    /// Dragging a pane across the workspace, overlay live
    Dock { source: PaneId, overlay: Overlay },
    /// A drag whose payload belongs to the host (classification only)
    External { overlay: Overlay },
    /// Repositioning a floating pane; `grab` is the pointer offset from the
    /// pane origin at press time
    FloatMove { pane: PaneId, grab: Point },
    /// Resizing a floating pane from its corner handle
    FloatResize {
        pane: PaneId,
        origin: Point,
        start_size: (f32, f32),
    },
}

/// What a pointer-move asks the owner to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    None,
    /// Threshold crossed: promote the pending press to a dock drag
    DragStarted { source: PaneId },
    /// Hovered zone changed; a redraw is warranted
    HoverChanged,
    FloatMoved { pane: PaneId, x: f32, y: f32 },
    FloatResized {
        pane: PaneId,
        width: f32,
        height: f32,
    },
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Released before the threshold: a plain click on the source pane
    Click { pane: PaneId },
    /// Released over a valid zone
    Drop {
        source: PaneId,
        target: Option<PaneId>,
        position: DropPosition,
    },
    /// External payload released over a valid zone; effect is the host's
    ExternalDrop {
        target: Option<PaneId>,
        position: DropPosition,
    },
    FloatDone { pane: PaneId },
    /// Released over no zone, or cancelled outright
    Cancelled,
}

/// Session state machine; holds at most one session at a time
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match self.session.as_ref()? {
            DragSession::Dock { overlay, .. } | DragSession::External { overlay } => Some(overlay),
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<&HoverZone> {
        self.overlay()?.hovered()
    }

    /// Arm a pending press; becomes a drag only after the threshold
    pub fn arm(&mut self, source: PaneId, origin: Point) {
        self.replace(DragSession::Pending { source, origin });
    }

    /// Enter dock-dragging directly (native drag start, or post-threshold)
    pub fn begin_dock(&mut self, source: PaneId, overlay: Overlay) {
        self.replace(DragSession::Dock { source, overlay });
    }

    pub fn begin_external(&mut self, overlay: Overlay) {
        self.replace(DragSession::External { overlay });
    }

    pub fn begin_float_move(&mut self, pane: PaneId, grab: Point) {
        self.replace(DragSession::FloatMove { pane, grab });
    }

    pub fn begin_float_resize(&mut self, pane: PaneId, origin: Point, start_size: (f32, f32)) {
        self.replace(DragSession::FloatResize {
            pane,
            origin,
            start_size,
        });
    }

    fn replace(&mut self, session: DragSession) {
        if self.session.is_some() {
            tracing::debug!(target: "drag", "new session cancels the active one");
        }
        self.session = Some(session);
    }

    /// Tear the session down without touching anything else
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Feed a pointer (or native drag-over) movement into the session
    pub fn on_move(&mut self, point: Point) -> DragUpdate {
        match self.session.as_mut() {
            None => DragUpdate::None,
            Some(DragSession::Pending { source, origin }) => {
                let dx = point.x - origin.x;
                let dy = point.y - origin.y;
                if dx.hypot(dy) > DRAG_THRESHOLD {
                    DragUpdate::DragStarted { source: *source }
                } else {
                    DragUpdate::None
                }
            }
            Some(DragSession::Dock { overlay, .. }) | Some(DragSession::External { overlay }) => {
                if overlay.update(point) {
                    DragUpdate::HoverChanged
                } else {
                    DragUpdate::None
                }
            }
            Some(DragSession::FloatMove { pane, grab }) => DragUpdate::FloatMoved {
                pane: *pane,
                x: point.x - grab.x,
                y: point.y - grab.y,
            },
            Some(DragSession::FloatResize {
                pane,
                origin,
                start_size,
            }) => DragUpdate::FloatResized {
                pane: *pane,
                width: (start_size.0 + point.x - origin.x).max(MIN_FLOAT_SIZE.0),
                height: (start_size.1 + point.y - origin.y).max(MIN_FLOAT_SIZE.1),
            },
        }
    }

    /// Feed the pointer-up (or native drop) that ends the session
    pub fn on_release(&mut self, point: Point) -> Option<DragOutcome> {
        let session = self.session.take()?;
        let outcome = match session {
            DragSession::Pending { source, .. } => DragOutcome::Click { pane: source },
            DragSession::Dock {
                source,
                mut overlay,
            } => {
                overlay.update(point);
                match overlay.hovered() {
                    Some(zone) => DragOutcome::Drop {
                        source,
                        target: zone.target,
                        position: zone.position,
                    },
                    None => DragOutcome::Cancelled,
                }
            }
            DragSession::External { mut overlay } => {
                overlay.update(point);
                match overlay.hovered() {
                    Some(zone) => DragOutcome::ExternalDrop {
                        target: zone.target,
                        position: zone.position,
                    },
                    None => DragOutcome::Cancelled,
                }
            }
            DragSession::FloatMove { pane, .. } | DragSession::FloatResize { pane, .. } => {
                DragOutcome::FloatDone { pane }
            }
        };
        Some(outcome)
    }
}
