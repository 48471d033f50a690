//! Pointer to item mapping.
//!
//! Inverse of the paint geometry: the same blended layout that places the
//! avatars decides which one is under the pointer.

use super::layout::Layout;
use crate::model::LayoutStyle;

/// Item index under widget-local `x`, or `None`.
///
/// Slot boundaries are computed in both sub-layouts and blended by the
/// layout ratio. The ranges of whichever sub-layout dominates (full from a
/// ratio of 0.5) bound the result. The last slot stays clickable across its
/// trailing padding; clicks further right select the last visible item only
/// when `full_clickable` is set.
pub fn hit_test(layout: &Layout, small: &LayoutStyle, full_clickable: bool, x: i32) -> Option<usize> {
    let first_right_full = layout.left_full + (layout.start_index_full + 1) * layout.single_full;
    let second_left_full = first_right_full;
    let first_right_small = layout.left_small + small.photo_left + small.photo;
    let second_left_small = if layout.small_skip != 0 {
        layout.left_small + small.photo_left + small.shift
    } else {
        first_right_small
    };
    let last_right_add_full = 0;
    let last_right_add_small = small.photo_left;

    let first_right = layout.lerp(f64::from(first_right_small), f64::from(first_right_full));
    let second_left = layout.lerp(f64::from(second_left_small), f64::from(second_left_full));
    let last_right_add = layout.lerp(f64::from(last_right_add_small), f64::from(last_right_add_full));

    let activate_full = layout.ratio >= 0.5;
    let (start_index, end_index) = if activate_full {
        (layout.start_index_full, layout.end_index_full)
    } else {
        (layout.start_index_small, layout.end_index_small)
    };
    let visible = end_index - start_index;
    if visible <= 0 {
        return None;
    }

    let x = f64::from(x);
    let infinite_index = if x < second_left || layout.single <= 0.0 {
        0
    } else {
        ((x - first_right).max(0.0) / layout.single).floor() as i32 + 1
    };
    let last_right = first_right + f64::from(visible - 1) * layout.single + last_right_add;
    let index = if infinite_index == visible && x < last_right {
        // Trailing padding of the last slot.
        infinite_index - 1
    } else if start_index + infinite_index >= end_index {
        if full_clickable {
            visible - 1
        } else {
            return None;
        }
    } else {
        infinite_index
    };

    let selected = start_index + index;
    if index < 0 || selected < 0 || selected as usize >= layout.items_count {
        None
    } else {
        Some(selected as usize)
    }
}

#[cfg(test)]
#[path = "hit_test_tests.rs"]
mod tests;
