//! Draw commands and the collaborator traits painting goes through.

use crate::model::{Bitmap, PointF, RectF, Rgba};

/// A name rendered once and reused across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TextImage {
    /// Text after elision.
    pub text: String,
    /// Pixel width the text was laid out into.
    pub width: i32,
    /// Pixel height.
    pub height: i32,
    /// Color the text was rendered with.
    pub color: Rgba,
}

/// Text layout service.
pub trait TextShaper {
    /// Lay `text` out on a single line of `available_width` pixels, eliding
    /// the tail if it does not fit.
    fn shape_elided(&self, text: &str, available_width: i32, font_height: i32, color: Rgba) -> TextImage;
}

/// Stroke of an outlined ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub width: f64,
}

/// One paint operation, in widget coordinates after any [`DrawCommand::Translate`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Offset all following commands.
    Translate(PointF),
    /// Cached name image scaled into `rect`.
    Name {
        /// Target rectangle.
        rect: RectF,
        /// Opacity in `[0, 1]`.
        opacity: f64,
        /// Rendered name.
        image: TextImage,
    },
    /// Ellipse filled with a linear gradient from its top-right to its bottom-left.
    UnreadGradient {
        /// Ellipse bounds.
        ellipse: RectF,
        /// Opacity in `[0, 1]`.
        opacity: f64,
        /// Top-right stop.
        from: Rgba,
        /// Bottom-left stop.
        to: Rgba,
    },
    /// Filled ellipse with an optional outline.
    Ring {
        /// Ellipse bounds.
        ellipse: RectF,
        /// Opacity in `[0, 1]`.
        opacity: f64,
        /// Fill color.
        fill: Rgba,
        /// Outline, if any.
        stroke: Option<Stroke>,
    },
    /// Avatar bitmap scaled into `rect`.
    Thumbnail {
        /// Target rectangle.
        rect: RectF,
        /// Opacity in `[0, 1]`.
        opacity: f64,
        /// Frame to draw.
        bitmap: Bitmap,
    },
}

/// Paint target.
pub trait Canvas {
    /// Execute one draw command.
    fn draw(&mut self, command: DrawCommand);
}

impl Canvas for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}
