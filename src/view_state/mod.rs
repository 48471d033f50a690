//! View-state layer - layout, hit-testing and paint.
//!
//! Pure geometry and drawing logic shared by every consumer of the strip.
//!
//! # Module Structure
//!
//! - `constants`: thresholds and limits shared across the layer
//! - `animation`: `Timestamp`, `Easing` and the scalar `Animation`
//! - `layout`: `Layout` - both sub-layouts plus their blend
//! - `hit_test`: pointer x to item index through the same blend
//! - `canvas`: `DrawCommand`, `Canvas` and `TextShaper`
//! - `paint_scan`: back-to-front paint ordering
//! - `paint`: layout and items to draw commands

pub mod animation;
pub mod canvas;
pub mod constants;
pub mod hit_test;
pub mod layout;
pub mod paint;
pub mod paint_scan;

pub use animation::{Animation, Easing, Timestamp};
pub use canvas::{Canvas, DrawCommand, Stroke, TextImage, TextShaper};
pub use hit_test::hit_test;
pub use layout::{compute_layout, ChangingShift, Layout, LayoutContext};
pub use paint::{expand_ratio, paint_strip, PaintContext};
pub use paint_scan::{PaintScan, PaintStep, SlotSummary};
