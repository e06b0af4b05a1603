//! Marquee (drag-selection) rectangle geometry and hit-testing.
//!
//! Intersections use strict inequality: rectangles that only share an edge do not overlap.

use serde::{Deserialize, Serialize};

use crate::model::{DesktopIcon, PointerPosition};

/// Drags smaller than this on both axes are treated as a plain click.
pub const DEFAULT_SELECTION_THRESHOLD_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// `true` when both sides are below `threshold`, i.e. the gesture is still a click.
    pub fn is_degenerate(&self, threshold: f64) -> bool {
        self.width < threshold && self.height < threshold
    }
}

/// Normalizes two arbitrary corner points into a rectangle with non-negative size.
pub fn bounds(x0: f64, y0: f64, x1: f64, y1: f64) -> SelectionRect {
    SelectionRect {
        left: x0.min(x1),
        top: y0.min(y1),
        width: (x1 - x0).abs(),
        height: (y1 - y0).abs(),
    }
}

pub fn bounds_between(start: PointerPosition, current: PointerPosition) -> SelectionRect {
    bounds(start.x, start.y, current.x, current.y)
}

/// Marquee rectangle for a drag, or `None` while it is below `threshold`.
pub fn marquee(
    start: PointerPosition,
    current: PointerPosition,
    threshold: f64,
) -> Option<SelectionRect> {
    let rect = bounds_between(start, current);
    (!rect.is_degenerate(threshold)).then_some(rect)
}

pub fn intersects(a: &SelectionRect, b: &SelectionRect) -> bool {
    a.left < b.right() && b.left < a.right() && a.top < b.bottom() && b.top < a.bottom()
}

/// Ids of every icon whose bounds intersect `rect`, in icon order.
pub fn hit_test<'a>(rect: &SelectionRect, icons: &'a [DesktopIcon]) -> Vec<&'a str> {
    icons
        .iter()
        .filter(|icon| intersects(rect, &icon.rect.to_selection_rect()))
        .map(|icon| icon.id.as_str())
        .collect()
}
