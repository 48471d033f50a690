//! Paint orchestration.
//!
//! Turns a [`Layout`] and the items into draw commands. Position and size
//! follow the geometric layout ratio; opacities follow a separate
//! [`expand_ratio`] that only starts fading once the strip is pulled past
//! the friction range and finishes at the collapse threshold.

use super::canvas::{Canvas, DrawCommand, Stroke, TextShaper};
use super::constants::{COLLAPSE_AFTER_RATIO, EXPAND_AFTER_RATIO, FRICTION_RATIO, SMALL_THUMBS_SHOWN};
use super::layout::Layout;
use super::paint_scan::{PaintScan, PaintStep, SlotSummary};
use crate::model::{RectF, StripStyle};
use crate::state::item_store::Item;
use crate::state::repaint::RepaintRequest;

/// Cross-fade progress for a geometric `ratio`.
///
/// 0 up to `0.72 * 0.15`, 1 from `0.68`, linear in between.
pub fn expand_ratio(ratio: f64) -> f64 {
    let low = EXPAND_AFTER_RATIO * FRICTION_RATIO;
    if ratio >= COLLAPSE_AFTER_RATIO {
        1.0
    } else if ratio <= low {
        0.0
    } else {
        (ratio - low) / (COLLAPSE_AFTER_RATIO - low)
    }
}

/// Collaborators and flags a paint pass needs besides the layout.
pub struct PaintContext<'a> {
    /// Injected style.
    pub style: &'a StripStyle,
    /// Renders name labels.
    pub shaper: &'a dyn TextShaper,
    /// Handed to thumbnail providers on first use.
    pub repaint: &'a RepaintRequest,
    /// Translate everything by the layout's geometry shift.
    pub changing: bool,
}

/// Items mapped to one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Single {
    x: f64,
    photo_top: f64,
    small: Option<usize>,
    full: Option<usize>,
}

/// Values derived once per frame.
struct Frame {
    expand_ratio: f64,
    line: f64,
    line_read: f64,
    photo: f64,
    photo_left: f64,
    name_top: f64,
    name_left: f64,
    name_width: f64,
    name_height: f64,
    read_userpic_opacity: f64,
    read_userpic_appearing_opacity: f64,
}

/// Paint the strip back to front.
pub fn paint_strip(
    layout: &Layout,
    items: &mut [Item],
    context: &PaintContext<'_>,
    canvas: &mut dyn Canvas,
) {
    let style = context.style;
    let (small, full) = (&style.small, &style.full);
    let expand = expand_ratio(layout.ratio);
    let elerp = |a: f64, b: f64| a + (b - a) * expand;

    let photo_top_small = f64::from(small.photo_top);
    let photo_top =
        photo_top_small + f64::from(full.photo_top - small.photo_top) * layout.expanded_ratio;
    let photo = layout.lerp(f64::from(small.photo), f64::from(full.photo));
    let name_scale = layout.expanded_ratio;
    let name_width = name_scale * f64::from(style.available_name_width());
    let frame = Frame {
        expand_ratio: expand,
        line: elerp(f64::from(small.line_twice), f64::from(full.line_twice)) / 2.0,
        line_read: elerp(f64::from(small.line_read_twice), f64::from(full.line_read_twice)) / 2.0,
        photo,
        photo_left: layout.photo_left,
        name_top: f64::from(full.name_top) + (photo_top + photo - f64::from(full.photo_top + full.photo)),
        name_left: layout.photo_left + (photo - name_width) / 2.0,
        name_width,
        name_height: name_scale * f64::from(style.name.font_height),
        read_userpic_opacity: elerp(style.read_opacity, 1.0),
        read_userpic_appearing_opacity: elerp(style.read_opacity, 0.0),
    };

    if context.changing {
        canvas.draw(DrawCommand::Translate(layout.geometry_shift));
    }

    let draw_small = expand < 1.0;
    let draw_full = expand > 0.0;
    let items_count = items.len();
    let lookup = |index: i32| -> Option<Single> {
        let index_small = layout.start_index_small + index;
        let index_full = layout.start_index_full + index;
        let y_small = photo_top_small
            + (photo_top - photo_top_small)
                * f64::from(SMALL_THUMBS_SHOWN - index_small + layout.small_skip)
                / 0.5;
        let in_range = |i: i32| usize::try_from(i).ok().filter(|&i| i < items_count);
        let small = (draw_small
            && index_small < layout.end_index_small
            && index_small >= layout.small_skip)
            .then(|| in_range(index_small))
            .flatten();
        let full = (draw_full && index_full < layout.end_index_full)
            .then(|| in_range(index_full))
            .flatten();
        (small.is_some() || full.is_some()).then(|| Single {
            x: layout.left + layout.single * f64::from(index),
            photo_top: elerp(y_small, photo_top),
            small,
            full,
        })
    };

    let unread = |index: Option<usize>| index.is_some_and(|i| items[i].element().has_unread());
    let steps = PaintScan::new().run(
        layout.slot_count(),
        layout.first_small_slot(),
        |slot| {
            lookup(slot).map(|single| SlotSummary {
                has_small: single.small.is_some(),
                unread: unread(single.small) || unread(single.full),
            })
        },
    );

    for step in steps {
        let (slot, gradient) = match step {
            PaintStep::Gradient(slot) => (slot, true),
            PaintStep::Foreground(slot) => (slot, false),
        };
        let Some(single) = lookup(slot) else {
            continue;
        };
        if gradient {
            paint_gradient(&single, &frame, items, context, canvas);
        } else {
            paint_other(&single, &frame, items, context, canvas);
        }
    }
}

fn userpic_rect(single: &Single, frame: &Frame) -> RectF {
    RectF::new(
        single.x + frame.photo_left,
        single.photo_top,
        frame.photo,
        frame.photo,
    )
}

fn is_unread(items: &[Item], index: Option<usize>) -> bool {
    index.is_some_and(|i| items[i].element().has_unread())
}

/// Name label and unread gradient ring.
fn paint_gradient(
    single: &Single,
    frame: &Frame,
    items: &mut [Item],
    context: &PaintContext<'_>,
    canvas: &mut dyn Canvas,
) {
    let style = context.style;
    if let Some(full) = single.full {
        let image = items[full].validate_name(
            context.shaper,
            style.available_name_width(),
            style.name.font_height,
            style.palette.name_fg,
        );
        if frame.expand_ratio > 0.0 {
            canvas.draw(DrawCommand::Name {
                rect: RectF::new(
                    single.x + frame.name_left,
                    frame.name_top,
                    frame.name_width,
                    frame.name_height,
                ),
                opacity: frame.expand_ratio,
                image: image.clone(),
            });
        }
    }

    let small_unread = is_unread(items, single.small);
    let full_unread = is_unread(items, single.full);
    let opacity = match (small_unread, full_unread) {
        (true, true) => 1.0,
        (true, false) => 1.0 - frame.expand_ratio,
        (false, true) => frame.expand_ratio,
        (false, false) => 0.0,
    };
    if opacity > 0.0 {
        canvas.draw(DrawCommand::UnreadGradient {
            ellipse: userpic_rect(single, frame).margins_added(2.0 * frame.line),
            opacity,
            from: style.palette.unread_from,
            to: style.palette.unread_to,
        });
    }
}

/// Background ring, read stroke and the avatar cross-fade.
fn paint_other(
    single: &Single,
    frame: &Frame,
    items: &mut [Item],
    context: &PaintContext<'_>,
    canvas: &mut dyn Canvas,
) {
    debug_assert!(single.small.is_some() || single.full.is_some());
    let style = context.style;
    let userpic = userpic_rect(single, frame);
    let small_unread = is_unread(items, single.small);
    let full_unread = is_unread(items, single.full);

    let has_read_line = single.full.is_some() && !full_unread;
    let ring_opacity = match (single.small, single.full) {
        (Some(_), Some(_)) => 1.0,
        (Some(_), None) => 1.0 - frame.expand_ratio,
        _ => frame.expand_ratio,
    };
    let stroke = has_read_line.then(|| {
        let color = if single.small.is_some() {
            style.palette.read_line.with_alpha_scaled(frame.expand_ratio)
        } else {
            style.palette.read_line
        };
        Stroke {
            color,
            width: frame.line_read,
        }
    });
    let add = frame.line + if has_read_line { frame.line_read / 2.0 } else { 0.0 };
    canvas.draw(DrawCommand::Ring {
        ellipse: userpic.margins_added(add),
        opacity: ring_opacity,
        fill: style.palette.background,
        stroke,
    });

    let full_size = style.full.photo;
    let mut thumbnail = |index: usize, size: i32, opacity: f64| {
        let item = &mut items[index];
        item.validate_thumbnail(context.repaint);
        canvas.draw(DrawCommand::Thumbnail {
            rect: userpic,
            opacity,
            bitmap: item.element().thumbnail.image(size),
        });
    };
    match (single.small, single.full) {
        (Some(small), Some(full)) if small == full => {
            let opacity = if small_unread {
                1.0
            } else {
                frame.read_userpic_opacity
            };
            thumbnail(full, full_size, opacity);
        }
        (small, full) => {
            if let Some(small) = small {
                let opacity = match (small_unread, full.is_some()) {
                    (true, true) => 1.0,
                    (true, false) => 1.0 - frame.expand_ratio,
                    (false, true) => style.read_opacity,
                    (false, false) => frame.read_userpic_appearing_opacity,
                };
                let size = if frame.expand_ratio > 0.0 {
                    full_size
                } else {
                    style.small.photo
                };
                thumbnail(small, size, opacity);
            }
            if let Some(full) = full {
                thumbnail(full, full_size, frame.expand_ratio);
            }
        }
    }
}

#[cfg(test)]
#[path = "paint_tests.rs"]
mod tests;
