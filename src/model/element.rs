//! Story elements delivered by the data source, and the thumbnail contract.

use super::identifiers::StoryId;
use super::style::Rgba;
use std::fmt;
use std::rc::Rc;

/// Square pixel buffer produced by a [`Thumbnail`] provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    size: u32,
    pixels: Rc<[Rgba]>,
}

impl Bitmap {
    /// Create a bitmap from `size * size` row-major pixels.
    ///
    /// Missing pixels are padded with transparent ones, extra pixels dropped.
    pub fn new(size: u32, pixels: impl IntoIterator<Item = Rgba>) -> Self {
        let len = (size as usize) * (size as usize);
        let mut pixels: Vec<Rgba> = pixels.into_iter().take(len).collect();
        pixels.resize(len, Rgba::TRANSPARENT);
        Self {
            size,
            pixels: pixels.into(),
        }
    }

    /// Bitmap of a single color.
    pub fn solid(size: u32, color: Rgba) -> Self {
        Self::new(size, std::iter::repeat(color))
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Pixel at `(x, y)`, `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.pixels.get((y * self.size + x) as usize).copied()
    }

    /// Pixel at normalized coordinates in `[0, 1]`.
    pub fn sample(&self, u: f64, v: f64) -> Option<Rgba> {
        if self.size == 0 {
            return None;
        }
        let max = f64::from(self.size - 1);
        let x = (u.clamp(0.0, 1.0) * max).round() as u32;
        let y = (v.clamp(0.0, 1.0) * max).round() as u32;
        self.pixel(x, y)
    }
}

/// Image source for one story avatar.
///
/// Providers are shared: several elements and snapshots may hold the same
/// instance, and identity is decided by pointer, never by content.
pub trait Thumbnail {
    /// Current frame scaled to `size` pixels.
    fn image(&self, size: i32) -> Bitmap;

    /// Register a callback fired whenever a new frame is ready.
    fn subscribe_to_updates(&self, callback: Box<dyn Fn()>);
}

/// Shared handle to a thumbnail provider.
pub type ThumbnailRef = Rc<dyn Thumbnail>;

/// Whether two handles point at the same provider instance.
pub fn same_thumbnail(a: &ThumbnailRef, b: &ThumbnailRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// One story source as reported by the data source.
#[derive(Clone)]
pub struct Element {
    /// Identity, unique within a snapshot.
    pub id: StoryId,
    /// Display name rendered under the avatar in the full layout.
    pub name: String,
    /// Avatar provider.
    pub thumbnail: ThumbnailRef,
    /// Total number of stories.
    pub count: u32,
    /// Unread stories; 0 means everything was read.
    pub unread_count: u32,
    /// Omit this element from the compact row's leading position.
    pub skip_small: bool,
}

impl Element {
    /// Create an element with no stories and `skip_small` unset.
    pub fn new(id: StoryId, name: impl Into<String>, thumbnail: ThumbnailRef) -> Self {
        Self {
            id,
            name: name.into(),
            thumbnail,
            count: 0,
            unread_count: 0,
            skip_small: false,
        }
    }

    /// Builder-style count setter.
    pub fn with_counts(mut self, count: u32, unread_count: u32) -> Self {
        self.count = count;
        self.unread_count = unread_count;
        self
    }

    /// Builder-style `skip_small` setter.
    pub fn with_skip_small(mut self, skip_small: bool) -> Self {
        self.skip_small = skip_small;
        self
    }

    /// True when at least one story is unread.
    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && same_thumbnail(&self.thumbnail, &other.thumbnail)
            && self.count == other.count
            && self.unread_count == other.unread_count
            && self.skip_small == other.skip_small
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("thumbnail", &Rc::as_ptr(&self.thumbnail))
            .field("count", &self.count)
            .field("unread_count", &self.unread_count)
            .field("skip_small", &self.skip_small)
            .finish()
    }
}

/// One full snapshot from the data source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Content {
    /// Elements in display order.
    pub elements: Vec<Element>,
}

impl Content {
    /// Wrap an ordered element list.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// True when the snapshot has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
