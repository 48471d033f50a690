//! Interpolated strip layout.
//!
//! One function describes both the compact row and the full panel at once.
//! Every consumer (paint, hit-testing, collapsed geometry) reads the same
//! [`Layout`] and blends the two sub-layouts with its `ratio`, so the
//! transition is a single continuous parameter instead of two modes.

use super::constants::{FRICTION_RATIO, SMALL_THUMBS_SHOWN};
use crate::model::{Alignment, LayoutStyle, Point, PointF, Rect};

/// Inputs of the Changing-state paint shift.
///
/// While changing, the widget covers the union of the compact and full
/// rectangles and its content slides from one to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangingShift {
    /// Top-left of the compact geometry the change started from.
    pub from: Point,
    /// Top-left of the full geometry.
    pub full: Point,
    /// Current top-left of the widget.
    pub position: Point,
}

/// Everything besides the styles that the layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Widget width in pixels.
    pub width: i32,
    /// Number of items.
    pub items_count: usize,
    /// Whether the first item is omitted from the compact row.
    pub first_skip_small: bool,
    /// Horizontal scroll offset of the full panel.
    pub scroll_left: i32,
    /// Last external expansion ratio in `[0, 1]`.
    pub expanded_ratio: f64,
    /// Present only in the Changing geometry state.
    pub shift: Option<ChangingShift>,
}

/// Geometry of both sub-layouts plus their blend.
///
/// Integer fields describe the compact (`*_small`) and full (`*_full`)
/// sub-layouts on their own; float fields are already blended by `ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Number of items.
    pub items_count: usize,
    /// Paint translation, zero outside the Changing state.
    pub geometry_shift: PointF,
    /// Raw external expansion ratio.
    pub expanded_ratio: f64,
    /// Geometric blend factor: 0 is the compact row, 1 the full panel.
    pub ratio: f64,
    /// Left of the first visible avatar.
    pub thumbnail_left: f64,
    /// Blended avatar padding inside a cell.
    pub photo_left: f64,
    /// Left of the first visible cell.
    pub left: f64,
    /// Blended stride.
    pub single: f64,
    /// 1 when the first item is skipped in the compact row.
    pub small_skip: i32,
    /// Left of cell 0 in the full panel, scroll applied.
    pub left_full: i32,
    /// Left of cell 0 in the compact row.
    pub left_small: i32,
    /// Full stride including justification spacing.
    pub single_full: i32,
    /// Compact stride.
    pub single_small: i32,
    /// First item index shown in the compact row.
    pub start_index_small: i32,
    /// One past the last item index shown in the compact row.
    pub end_index_small: i32,
    /// First item index visible in the full panel.
    pub start_index_full: i32,
    /// One past the last item index visible in the full panel.
    pub end_index_full: i32,
}

impl Layout {
    /// Interpolate between a compact and a full value by the layout ratio.
    pub fn lerp(&self, small: f64, full: f64) -> f64 {
        small + (full - small) * self.ratio
    }

    /// Number of slots that need painting.
    pub fn slot_count(&self) -> i32 {
        (self.end_index_full - self.start_index_full)
            .max(self.end_index_small - self.start_index_small)
    }

    /// Slot that holds the first compact avatar (past the skipped one).
    pub fn first_small_slot(&self) -> i32 {
        self.small_skip - self.start_index_small
    }
}

/// Stride of a full cell before justification spacing.
pub fn single_full_min(full: &LayoutStyle) -> i32 {
    full.photo_left * 2 + full.photo
}

/// Compute the layout for `expanded` progress of the toggle animation.
///
/// The geometric ratio blends the collapsed value (external ratio damped by
/// friction) with the expanded value (the external ratio itself) by
/// `expanded`.
pub fn compute_layout(
    context: &LayoutContext,
    small: &LayoutStyle,
    full: &LayoutStyle,
    expanded: f64,
) -> Layout {
    let expanded_ratio = context.expanded_ratio;
    let collapsed_ratio = expanded_ratio * FRICTION_RATIO;
    let ratio = expanded_ratio * expanded + collapsed_ratio * (1.0 - expanded);
    let lerp = |a: f64, b: f64| a + (b - a) * ratio;

    let width = context.width;
    let items_count = i32::try_from(context.items_count).unwrap_or(i32::MAX);

    // Justify the full panel when everything fits.
    let left_full_min = full.left;
    let single_min = single_full_min(full);
    let total_full = left_full_min + single_min * items_count;
    let skip_side = if total_full < width {
        (width - total_full) / (items_count + 1)
    } else {
        0
    };
    let skip_between = if total_full < width && items_count > 1 {
        (width - total_full - 2 * skip_side) / (items_count - 1)
    } else {
        skip_side
    };
    let single_full = (single_min + skip_between).max(1);

    let small_skip = i32::from(items_count > 1 && context.first_skip_small);
    let small_count = SMALL_THUMBS_SHOWN.min(items_count - small_skip);
    let left_small = small.left - if small_skip != 0 { small.shift } else { 0 };
    let left_full = full.left - context.scroll_left + skip_side;
    let start_index_full = (-left_full).max(0) / single_full;
    let cell_left_full = left_full + start_index_full * single_full;
    let end_index_full = ((width - left_full + single_full - 1) / single_full).min(items_count);
    let start_index_small = start_index_full.min(small_skip);
    let end_index_small = small_skip + small_count;
    let cell_left_small = left_small + start_index_small * small.shift;

    let thumbnail_left_full = cell_left_full + full.photo_left;
    let thumbnail_left_small = cell_left_small + small.photo_left;
    let thumbnail_left = lerp(f64::from(thumbnail_left_small), f64::from(thumbnail_left_full));
    let photo_left = lerp(f64::from(small.photo_left), f64::from(full.photo_left));

    let geometry_shift = match context.shift {
        Some(shift) => PointF::new(
            lerp(f64::from(shift.from.x), f64::from(shift.full.x)) - f64::from(shift.position.x),
            lerp(f64::from(shift.from.y), f64::from(shift.full.y)) - f64::from(shift.position.y),
        ),
        None => PointF::ZERO,
    };

    Layout {
        items_count: context.items_count,
        geometry_shift,
        expanded_ratio,
        ratio,
        thumbnail_left,
        photo_left,
        left: thumbnail_left - photo_left,
        single: lerp(f64::from(small.shift), f64::from(single_full)),
        small_skip,
        left_full,
        left_small,
        single_full,
        single_small: small.shift,
        start_index_small,
        end_index_small,
        start_index_full,
        end_index_full,
    }
}

/// Rectangle of the compact row anchored at `position`.
///
/// `collapsed` must be the layout computed with zero toggle progress.
pub fn small_geometry(
    collapsed: &Layout,
    small: &LayoutStyle,
    position: Point,
    align: Alignment,
) -> Rect {
    let count = collapsed.end_index_small
        - collapsed.start_index_small.max(collapsed.small_skip);
    let width = small.left
        + small.photo_left
        + small.photo
        + (count - 1) * small.shift
        + small.photo_left
        + small.left;
    let left = match align {
        Alignment::Right => position.x - width,
        Alignment::Center => position.x - width / 2,
        Alignment::Left => position.x,
    };
    Rect::new(
        left,
        position.y,
        width,
        small.photo_top + small.photo + small.photo_top,
    )
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
