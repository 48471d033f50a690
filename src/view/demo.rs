//! Synthetic story sources for the terminal demo.

use crate::model::{Bitmap, Content, Element, Rgba, StoryId, Thumbnail};
use std::rc::Rc;

const NAMES: [&str; 12] = [
    "My story",
    "Alice",
    "Bob Marley",
    "Charlotte",
    "Dmitri",
    "Eve",
    "François",
    "Grace Hopper",
    "Hiroshi",
    "Ines",
    "Jamal",
    "Katarzyna",
];

const GRADIENTS: [(Rgba, Rgba); 6] = [
    (Rgba::rgb(0xf5, 0x8e, 0x5c), Rgba::rgb(0xd6, 0x3e, 0x5b)),
    (Rgba::rgb(0x6c, 0xc3, 0xf0), Rgba::rgb(0x2f, 0x6f, 0xc9)),
    (Rgba::rgb(0x9b, 0xe1, 0x7a), Rgba::rgb(0x2e, 0x9d, 0x5b)),
    (Rgba::rgb(0xf7, 0xd0, 0x6b), Rgba::rgb(0xe0, 0x8a, 0x1e)),
    (Rgba::rgb(0xc3, 0x9b, 0xf2), Rgba::rgb(0x7a, 0x4f, 0xd1)),
    (Rgba::rgb(0x8e, 0xe3, 0xdc), Rgba::rgb(0x23, 0x9c, 0xa8)),
];

/// Static avatar: a vertical two-color gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientThumbnail {
    top: Rgba,
    bottom: Rgba,
}

impl GradientThumbnail {
    /// Gradient from `top` to `bottom`.
    pub fn new(top: Rgba, bottom: Rgba) -> Self {
        Self { top, bottom }
    }
}

impl Thumbnail for GradientThumbnail {
    fn image(&self, size: i32) -> Bitmap {
        let size = u32::try_from(size).unwrap_or(0);
        let rows = f64::from(size.saturating_sub(1).max(1));
        let pixels = (0..size).flat_map(|y| {
            let t = f64::from(y) / rows;
            let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            let color = Rgba::rgb(
                channel(self.top.r, self.bottom.r),
                channel(self.top.g, self.bottom.g),
                channel(self.top.b, self.bottom.b),
            );
            std::iter::repeat(color).take(size as usize)
        });
        Bitmap::new(size, pixels)
    }

    // Never changes, so there is nothing to notify.
    fn subscribe_to_updates(&self, _callback: Box<dyn Fn()>) {}
}

/// `count` elements with ids starting at `first_id`.
///
/// Id 1 is "My story": fully read and kept out of the compact row's lead.
/// Every third of the others is read as well.
pub fn demo_elements(first_id: u64, count: usize) -> Vec<Element> {
    (first_id..)
        .take(count)
        .map(|id| {
            let index = (id.saturating_sub(1)) as usize;
            let (top, bottom) = GRADIENTS[index % GRADIENTS.len()];
            let name = if index < NAMES.len() {
                NAMES[index].to_string()
            } else {
                format!("{} {}", NAMES[1 + index % (NAMES.len() - 1)], index / NAMES.len() + 1)
            };
            let is_self = id == 1;
            let unread = if is_self || index % 3 == 0 { 0 } else { 1 + (index % 4) as u32 };
            Element::new(StoryId::new(id), name, Rc::new(GradientThumbnail::new(top, bottom)))
                .with_counts(4, unread)
                .with_skip_small(is_self)
        })
        .collect()
}

/// Snapshot of `elements`, sharing their thumbnails.
pub fn content_of(elements: &[Element]) -> Content {
    Content::new(elements.to_vec())
}
