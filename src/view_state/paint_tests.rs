//! Tests for the paint orchestrator.

use super::*;
use crate::model::{LayoutStyle, Point, Rgba, StoryId, ThumbnailRef};
use crate::test_harness::{element, element_with, FakeShaper, FakeThumbnail};
use crate::view_state::layout::{compute_layout, ChangingShift, LayoutContext};
use std::rc::Rc;

fn layout_for(width: i32, items: &[Item], scroll_left: i32, expanded_ratio: f64, expanded: f64) -> Layout {
    let context = LayoutContext {
        width,
        items_count: items.len(),
        first_skip_small: items.first().is_some_and(|item| item.element().skip_small),
        scroll_left,
        expanded_ratio,
        shift: None,
    };
    compute_layout(
        &context,
        &LayoutStyle::default_small(),
        &LayoutStyle::default_full(),
        expanded,
    )
}

fn paint(layout: &Layout, items: &mut [Item], shaper: &FakeShaper, changing: bool) -> Vec<DrawCommand> {
    let style = StripStyle::default();
    let repaint = RepaintRequest::new();
    let context = PaintContext {
        style: &style,
        shaper,
        repaint: &repaint,
        changing,
    };
    let mut commands = Vec::new();
    paint_strip(layout, items, &context, &mut commands);
    commands
}

fn rect(r: &RectF) -> String {
    format!("{:.1},{:.1} {:.1}x{:.1}", r.x, r.y, r.width, r.height)
}

fn describe(commands: &[DrawCommand]) -> String {
    commands
        .iter()
        .map(|command| match command {
            DrawCommand::Translate(p) => format!("translate {:.1},{:.1}", p.x, p.y),
            DrawCommand::Name {
                rect: r,
                opacity,
                image,
            } => format!("name {} {} op {:.2}", image.text, rect(r), opacity),
            DrawCommand::UnreadGradient {
                ellipse, opacity, ..
            } => format!("gradient {} op {:.2}", rect(ellipse), opacity),
            DrawCommand::Ring {
                ellipse,
                opacity,
                stroke,
                ..
            } => format!(
                "ring {} op {:.2}{}",
                rect(ellipse),
                opacity,
                stroke
                    .map(|s| format!(" stroke {:.1}", s.width))
                    .unwrap_or_default()
            ),
            DrawCommand::Thumbnail {
                rect: r, opacity, ..
            } => format!("thumb {} op {:.2}", rect(r), opacity),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn thumbnails(commands: &[DrawCommand]) -> Vec<f64> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Thumbnail { opacity, .. } => Some(*opacity),
            _ => None,
        })
        .collect()
}

// ===== Expand ratio =====

#[test]
fn expand_ratio_is_clamped_outside_thresholds() {
    assert_eq!(expand_ratio(0.0), 0.0);
    assert_eq!(expand_ratio(0.72 * 0.15), 0.0);
    assert_eq!(expand_ratio(0.68), 1.0);
    assert_eq!(expand_ratio(1.0), 1.0);
}

#[test]
fn expand_ratio_is_linear_between_thresholds() {
    let low = 0.72 * 0.15;
    let mid = (low + 0.68) / 2.0;
    assert!((expand_ratio(mid) - 0.5).abs() < 1e-9);
}

// ===== Full panel =====

#[test]
fn full_panel_command_stream() {
    let mut items = vec![
        Item::new(element(1)),
        Item::new(element(2).with_counts(3, 1)),
    ];
    let layout = layout_for(400, &items, 0, 1.0, 1.0);
    let shaper = FakeShaper::default();
    let commands = paint(&layout, &mut items, &shaper, false);

    insta::assert_snapshot!(describe(&commands), @r"
    name story-2 251.0,68.0 57.0x16.0 op 1.00
    gradient 249.0,5.0 61.0x61.0 op 1.00
    name story-1 98.0,68.0 57.0x16.0 op 1.00
    ring 251.0,7.0 57.0x57.0 op 1.00
    thumb 253.0,9.0 53.0x53.0 op 1.00
    ring 97.5,6.5 58.0x58.0 op 1.00 stroke 1.0
    thumb 100.0,9.0 53.0x53.0 op 1.00
    ");
}

#[test]
fn names_are_shaped_once_per_item() {
    let mut items = vec![Item::new(element(1)), Item::new(element(2))];
    let layout = layout_for(400, &items, 0, 1.0, 1.0);
    let shaper = FakeShaper::default();
    paint(&layout, &mut items, &shaper, false);
    paint(&layout, &mut items, &shaper, false);
    assert_eq!(shaper.calls.get(), 2);
    assert!(items.iter().all(|item| item.name_cache().is_some()));
}

#[test]
fn thumbnails_subscribe_once() {
    let thumb = FakeThumbnail::new(Rgba::rgb(1, 2, 3));
    let mut items = vec![Item::new(element_with(1, &thumb))];
    let layout = layout_for(400, &items, 0, 1.0, 1.0);
    let shaper = FakeShaper::default();
    paint(&layout, &mut items, &shaper, false);
    paint(&layout, &mut items, &shaper, false);
    assert_eq!(thumb.subscriptions.get(), 1);
    assert_eq!(*thumb.requested_sizes.borrow(), vec![53, 53]);
}

// ===== Compact row =====

#[test]
fn compact_row_draws_small_thumbnails_only() {
    let thumbs: Vec<_> = (0..4).map(|_| FakeThumbnail::new(Rgba::rgb(9, 9, 9))).collect();
    let mut items: Vec<_> = thumbs
        .iter()
        .enumerate()
        .map(|(i, thumb)| Item::new(element_with(i as u64 + 1, thumb)))
        .collect();
    let layout = layout_for(400, &items, 0, 0.0, 0.0);
    let shaper = FakeShaper::default();
    let commands = paint(&layout, &mut items, &shaper, false);

    assert!(commands
        .iter()
        .all(|c| !matches!(c, DrawCommand::Name { .. })));
    assert_eq!(shaper.calls.get(), 0);
    assert_eq!(thumbnails(&commands).len(), 3);
    for thumb in &thumbs[..3] {
        assert_eq!(*thumb.requested_sizes.borrow(), vec![21]);
    }
    assert!(thumbs[3].requested_sizes.borrow().is_empty());
}

#[test]
fn compact_row_skips_flagged_first_item() {
    let thumbs: Vec<_> = (0..4).map(|_| FakeThumbnail::new(Rgba::rgb(9, 9, 9))).collect();
    let mut items: Vec<_> = thumbs
        .iter()
        .enumerate()
        .map(|(i, thumb)| {
            let element = element_with(i as u64 + 1, thumb);
            Item::new(element.with_skip_small(i == 0))
        })
        .collect();
    let layout = layout_for(400, &items, 0, 0.0, 0.0);
    let shaper = FakeShaper::default();
    paint(&layout, &mut items, &shaper, false);

    assert!(thumbs[0].requested_sizes.borrow().is_empty());
    for thumb in &thumbs[1..] {
        assert_eq!(thumb.requested_sizes.borrow().len(), 1);
    }
}

#[test]
fn read_compact_avatars_are_dimmed() {
    let mut items = vec![Item::new(element(1)), Item::new(element(2).with_counts(1, 1))];
    let layout = layout_for(400, &items, 0, 0.0, 0.0);
    let commands = paint(&layout, &mut items, &FakeShaper::default(), false);
    // Back to front: the unread item 2 first.
    assert_eq!(thumbnails(&commands), vec![1.0, 0.6]);
}

// ===== Transition =====

#[test]
fn same_item_in_both_rows_is_drawn_once() {
    let mut items: Vec<_> = (1..=3).map(|id| Item::new(element(id))).collect();
    let layout = layout_for(400, &items, 0, 0.5, 1.0);
    let expand = expand_ratio(layout.ratio);
    assert!(expand > 0.0 && expand < 1.0);
    let commands = paint(&layout, &mut items, &FakeShaper::default(), false);

    let opacities = thumbnails(&commands);
    assert_eq!(opacities.len(), 3);
    let expected = 0.6 + 0.4 * expand;
    assert!(opacities.iter().all(|o| (o - expected).abs() < 1e-9));
}

#[test]
fn different_items_cross_fade() {
    let mut items: Vec<_> = (1..=10)
        .map(|id| Item::new(element(id).with_skip_small(id == 1)))
        .collect();
    // Scrolled two full cells: the full row starts at item 2, the compact
    // row at item 1.
    let layout = layout_for(300, &items, 136, 0.5, 1.0);
    assert_eq!(layout.start_index_full, 2);
    assert_eq!(layout.start_index_small, 1);
    let expand = expand_ratio(layout.ratio);
    let commands = paint(&layout, &mut items, &FakeShaper::default(), false);

    let opacities = thumbnails(&commands);
    assert_eq!(opacities.len(), 8);
    let dimmed = opacities.iter().filter(|o| (*o - 0.6).abs() < 1e-9).count();
    let fading_in = opacities.iter().filter(|o| (*o - expand).abs() < 1e-9).count();
    assert_eq!((dimmed, fading_in), (3, 5));
}

#[test]
fn changing_state_translates_first() {
    let mut items = vec![Item::new(element(1)), Item::new(element(2))];
    let context = LayoutContext {
        width: 400,
        items_count: 2,
        first_skip_small: false,
        scroll_left: 0,
        expanded_ratio: 0.5,
        shift: Some(ChangingShift {
            from: Point::new(100, 0),
            full: Point::new(0, 0),
            position: Point::new(0, 0),
        }),
    };
    let layout = compute_layout(
        &context,
        &LayoutStyle::default_small(),
        &LayoutStyle::default_full(),
        1.0,
    );
    let commands = paint(&layout, &mut items, &FakeShaper::default(), true);
    assert_eq!(
        commands.first(),
        Some(&DrawCommand::Translate(layout.geometry_shift))
    );
    assert!((layout.geometry_shift.x - 50.0).abs() < 1e-9);
}

#[test]
fn empty_items_draw_nothing() {
    let mut items: Vec<Item> = Vec::new();
    let layout = layout_for(400, &items, 0, 1.0, 1.0);
    assert!(paint(&layout, &mut items, &FakeShaper::default(), false).is_empty());
}

#[test]
fn thumbnail_identity_does_not_matter_for_painting() {
    let shared = FakeThumbnail::new(Rgba::rgb(5, 5, 5));
    let thumb: ThumbnailRef = shared.clone();
    let mut items = vec![
        Item::new(crate::model::Element::new(StoryId::new(1), "a", thumb.clone())),
        Item::new(crate::model::Element::new(StoryId::new(2), "b", thumb)),
    ];
    let layout = layout_for(400, &items, 0, 1.0, 1.0);
    paint(&layout, &mut items, &FakeShaper::default(), false);
    // Each item subscribes on its own.
    assert_eq!(shared.subscriptions.get(), 2);
    assert_eq!(Rc::strong_count(&shared), 3);
}
