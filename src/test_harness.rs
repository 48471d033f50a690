//! Shared fakes for unit tests.

use crate::model::{Bitmap, Element, Rgba, StoryId, Thumbnail, ThumbnailRef};
use crate::view_state::canvas::{TextImage, TextShaper};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Thumbnail provider that records subscriptions and requested sizes.
pub struct FakeThumbnail {
    pub color: Rgba,
    pub subscriptions: Cell<usize>,
    pub requested_sizes: RefCell<Vec<i32>>,
    callbacks: RefCell<Vec<Box<dyn Fn()>>>,
}

impl FakeThumbnail {
    pub fn new(color: Rgba) -> Rc<Self> {
        Rc::new(Self {
            color,
            subscriptions: Cell::new(0),
            requested_sizes: RefCell::new(Vec::new()),
            callbacks: RefCell::new(Vec::new()),
        })
    }

    /// Simulate a new frame arriving.
    pub fn fire_update(&self) {
        for callback in self.callbacks.borrow().iter() {
            callback();
        }
    }
}

impl Thumbnail for FakeThumbnail {
    fn image(&self, size: i32) -> Bitmap {
        self.requested_sizes.borrow_mut().push(size);
        Bitmap::solid(1, self.color)
    }

    fn subscribe_to_updates(&self, callback: Box<dyn Fn()>) {
        self.subscriptions.set(self.subscriptions.get() + 1);
        self.callbacks.borrow_mut().push(callback);
    }
}

/// Shaper that keeps the whole text and counts invocations.
#[derive(Default)]
pub struct FakeShaper {
    pub calls: Cell<usize>,
}

impl TextShaper for FakeShaper {
    fn shape_elided(&self, text: &str, available_width: i32, font_height: i32, color: Rgba) -> TextImage {
        self.calls.set(self.calls.get() + 1);
        TextImage {
            text: text.to_string(),
            width: available_width,
            height: font_height,
            color,
        }
    }
}

/// Element with `id`, name `"story-{id}"` and a fresh gray thumbnail.
pub fn element(id: u64) -> Element {
    let thumb: ThumbnailRef = FakeThumbnail::new(Rgba::rgb(128, 128, 128));
    Element::new(StoryId::new(id), format!("story-{}", id), thumb)
}

/// Element sharing the given provider.
pub fn element_with(id: u64, thumb: &Rc<FakeThumbnail>) -> Element {
    let thumb: ThumbnailRef = thumb.clone();
    Element::new(StoryId::new(id), format!("story-{}", id), thumb)
}
