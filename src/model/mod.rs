//! Domain model types (pure).
//!
//! Story elements, style descriptors and geometry primitives. Nothing here
//! knows about layout, animation or the terminal.

pub mod element;
pub mod error;
pub mod geometry;
pub mod identifiers;
pub mod style;

// Re-export for convenience
pub use element::{same_thumbnail, Bitmap, Content, Element, Thumbnail, ThumbnailRef};
pub use error::AppError;
pub use geometry::{Alignment, Point, PointF, Rect, RectF};
pub use identifiers::StoryId;
pub use style::{Behavior, InvalidColor, LayoutStyle, NameStyle, Palette, Rgba, StripStyle};
