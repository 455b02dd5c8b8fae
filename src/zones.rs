//! Drop zone classification
//!
//! Pure geometry: maps a pointer position within a target rectangle to the
//! dock side it would dock against. The same function serves per-pane
//! targets and the whole-workspace target, with different band parameters.

use crate::geometry::{Point, Rect};
use crate::tree::Orientation;

/// Where a drop lands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropPosition {
    Left,
    Right,
    Top,
    Bottom,
    /// Onto the target itself (swap for pane-to-pane moves)
    Center,
}

impl DropPosition {
    /// Orientation of the split an edge drop creates; `None` for `Center`
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            DropPosition::Left | DropPosition::Right => Some(Orientation::Horizontal),
            DropPosition::Top | DropPosition::Bottom => Some(Orientation::Vertical),
            DropPosition::Center => None,
        }
    }

    /// Whether the dropped node lands before the target in child order
    pub fn is_leading(self) -> bool {
        matches!(self, DropPosition::Left | DropPosition::Top)
    }
}

/// Edge band sizing: `clamp(extent * ratio, min_px, max_px)` per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeBands {
    pub ratio: f32,
    pub min_px: f32,
    pub max_px: f32,
}

impl EdgeBands {
    /// Bands for a single pane target
    pub const PANE: EdgeBands = EdgeBands {
        ratio: 0.35,
        min_px: 40.0,
        max_px: 140.0,
    };

    /// Bands for the whole-workspace target
    pub const WORKSPACE: EdgeBands = EdgeBands {
        ratio: 0.35,
        min_px: 40.0,
        max_px: 200.0,
    };

    fn band(&self, extent: f32) -> f32 {
        (extent * self.ratio).clamp(self.min_px, self.max_px)
    }
}

/// Classify a pointer position against a target rectangle
///
/// Returns `None` outside the rectangle. Vertical edges (top/bottom) win
/// over horizontal ones in the corner overlap; a pointer in no edge band is
/// `Center`.
pub fn classify(point: Point, rect: Rect, bands: EdgeBands) -> Option<DropPosition> {
    if !rect.contains(point) {
        return None;
    }
    let band_x = bands.band(rect.width);
    let band_y = bands.band(rect.height);

    if point.y < rect.y + band_y {
        return Some(DropPosition::Top);
    }
    if point.y >= rect.bottom() - band_y {
        return Some(DropPosition::Bottom);
    }
    if point.x < rect.x + band_x {
        return Some(DropPosition::Left);
    }
    if point.x >= rect.right() - band_x {
        return Some(DropPosition::Right);
    }
    Some(DropPosition::Center)
}
