//! Horizontal scroll offset, wheel input and drag tracking.
//!
//! The offset only ever moves through [`ScrollState::scroll_to`], which
//! clamps it to `[0, max]`, and the max is recomputed through
//! [`ScrollState::set_max`] whenever the item count or the width changes.

use crate::model::{LayoutStyle, Point};
use crate::view_state::constants::PRELOAD_PAGES;

/// Largest scroll offset for `items_count` unjustified full cells in `width`.
pub fn scroll_left_max(full: &LayoutStyle, items_count: usize, width: i32) -> i32 {
    if items_count == 0 {
        return 0;
    }
    let single_full = full.photo_left * 2 + full.photo;
    let count = i32::try_from(items_count).unwrap_or(i32::MAX);
    let width_full = full.left.saturating_add(count.saturating_mul(single_full));
    (width_full - width).max(0)
}

/// Clamped horizontal scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    left: i32,
    left_max: i32,
}

impl ScrollState {
    /// Offset 0 with nothing to scroll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset.
    pub fn left(&self) -> i32 {
        self.left
    }

    /// Current maximum offset.
    pub fn left_max(&self) -> i32 {
        self.left_max
    }

    /// Replace the maximum and pull the offset back into range.
    pub fn set_max(&mut self, left_max: i32) {
        self.left_max = left_max.max(0);
        self.left = self.left.clamp(0, self.left_max);
    }

    /// Move to `left`, clamped. Returns whether the offset changed.
    pub fn scroll_to(&mut self, left: i32) -> bool {
        let next = left.clamp(0, self.left_max);
        if next == self.left {
            return false;
        }
        self.left = next;
        true
    }

    /// Whether fewer than two widths of content remain to the right.
    pub fn needs_more(&self, width: i32) -> bool {
        self.left_max - self.left < width.saturating_mul(PRELOAD_PAGES)
    }
}

/// Raw wheel event deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelDelta {
    /// Precise pixel delta, zero when the device does not report one.
    pub pixel: Point,
    /// Angle delta in eighths of a degree.
    pub angle: Point,
}

impl WheelDelta {
    /// Horizontal-only delta in pixels.
    pub fn horizontal(pixel: i32, angle: i32) -> Self {
        Self {
            pixel: Point::new(pixel, 0),
            angle: Point::new(angle, 0),
        }
    }

    /// Vertical-only delta in angle units.
    pub fn vertical(angle: i32) -> Self {
        Self {
            pixel: Point::default(),
            angle: Point::new(0, angle),
        }
    }

    /// Whether the event carries horizontal movement.
    pub fn is_horizontal(&self) -> bool {
        self.angle.x != 0
    }
}

/// Offset change a horizontal wheel event asks for.
///
/// Prefers the pixel delta, falls back to the angle delta, and mirrors the
/// direction for right-to-left layouts. `None` for vertical events.
pub fn wheel_step(delta: WheelDelta, right_to_left: bool) -> Option<i32> {
    if !delta.is_horizontal() {
        return None;
    }
    let sign = if right_to_left { -1 } else { 1 };
    let raw = if delta.pixel.x != 0 {
        delta.pixel.x
    } else {
        delta.angle.x
    };
    Some(sign * raw)
}

/// Press and drag bookkeeping in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragTracker {
    mouse_down: Option<Point>,
    dragging: bool,
    start_left: i32,
}

impl DragTracker {
    /// Idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press at `position`.
    pub fn press(&mut self, position: Point) {
        self.mouse_down = Some(position);
    }

    /// Forget the press.
    pub fn release(&mut self) {
        self.mouse_down = None;
    }

    /// Position of the current press, if any.
    pub fn mouse_down(&self) -> Option<Point> {
        self.mouse_down
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start dragging once the pointer traveled `threshold` from the press.
    ///
    /// Returns whether a drag started on this call.
    pub fn maybe_start(&mut self, position: Point, threshold: i32, scroll_left: i32) -> bool {
        let Some(down) = self.mouse_down else {
            return false;
        };
        if self.dragging || position.manhattan_distance(down) < threshold {
            return false;
        }
        self.dragging = true;
        self.start_left = scroll_left;
        true
    }

    /// Unclamped offset the drag asks for with the pointer at `position`.
    pub fn target_left(&self, position: Point, right_to_left: bool) -> Option<i32> {
        if !self.dragging {
            return None;
        }
        let down = self.mouse_down?;
        let sign = if right_to_left { -1 } else { 1 };
        Some(sign * (down.x - position.x) + self.start_left)
    }

    /// End the drag. Returns whether one was in progress.
    pub fn finish(&mut self) -> bool {
        std::mem::take(&mut self.dragging)
    }
}
