//! Rasterizes [`DrawCommand`]s into a ratatui [`Buffer`].
//!
//! Every terminal cell carries two pixels stacked vertically, drawn with
//! half-block glyphs: the upper one as the foreground of `▀`, the lower one
//! as its background. A cell spans `cell_width`×`cell_height` widget pixels
//! and each half is shaded from the sample at its center.

use crate::model::{PointF, RectF, Rgba};
use crate::view_state::canvas::{Canvas, DrawCommand, Stroke};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const UPPER_HALF: &str = "▀";
const LOWER_HALF: &str = "▄";

/// What translucent paint is blended against on a pixel nothing covered yet.
const BACKDROP: Rgba = Rgba::rgb(0, 0, 0);

/// Names fainter than this are not drawn; terminal text has no alpha.
const MIN_LABEL_OPACITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
struct Label {
    column: i32,
    row: i32,
    text: String,
    color: Rgba,
}

/// Canvas backed by half-block terminal cells.
///
/// Pixel `(0, 0)` is the top-left corner of `area`; `origin` is where the
/// widget's own `(0, 0)` lands, usually its geometry's top-left.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    area: CellRect,
    cell_width: f64,
    cell_height: f64,
    offset: PointF,
    pixels: Vec<Option<Rgba>>,
    labels: Vec<Label>,
}

impl TerminalCanvas {
    /// Blank canvas covering `area`.
    pub fn new(area: CellRect, cell_width: u16, cell_height: u16, origin: PointF) -> Self {
        let len = usize::from(area.width) * usize::from(area.height) * 2;
        Self {
            area,
            cell_width: f64::from(cell_width.max(1)),
            cell_height: f64::from(cell_height.max(2)),
            offset: origin,
            pixels: vec![None; len],
            labels: Vec::new(),
        }
    }

    /// Write the painted cells into `buf`. Untouched cells are left alone.
    pub fn render(&self, buf: &mut Buffer) {
        for row in 0..self.area.height {
            for column in 0..self.area.width {
                let upper = self.pixels[self.index(column, row * 2)];
                let lower = self.pixels[self.index(column, row * 2 + 1)];
                let (symbol, fg, bg) = match (upper, lower) {
                    (None, None) => continue,
                    (Some(upper), None) => (UPPER_HALF, to_color(upper), Color::Reset),
                    (None, Some(lower)) => (LOWER_HALF, to_color(lower), Color::Reset),
                    (Some(upper), Some(lower)) => (UPPER_HALF, to_color(upper), to_color(lower)),
                };
                let position = (self.area.x + column, self.area.y + row);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_symbol(symbol).set_fg(fg).set_bg(bg);
                }
            }
        }
        for label in &self.labels {
            self.render_label(label, buf);
        }
    }

    fn render_label(&self, label: &Label, buf: &mut Buffer) {
        if label.row < 0 || label.row >= i32::from(self.area.height) {
            return;
        }
        // Drop whatever sticks out on the left.
        let mut column = label.column;
        let mut text = label.text.as_str();
        for (at, ch) in label.text.char_indices() {
            if column >= 0 {
                text = &label.text[at..];
                break;
            }
            column += ch.width().unwrap_or(0) as i32;
            text = "";
        }
        let available = i32::from(self.area.width) - column;
        if text.is_empty() || available <= 0 {
            return;
        }
        buf.set_stringn(
            self.area.x + column as u16,
            self.area.y + label.row as u16,
            text,
            available as usize,
            Style::default().fg(to_color(label.color)),
        );
    }

    fn half_height(&self) -> f64 {
        self.cell_height / 2.0
    }

    fn index(&self, column: u16, half_row: u16) -> usize {
        usize::from(half_row) * usize::from(self.area.width) + usize::from(column)
    }

    /// Half cells whose centers fall inside `bounds`, with those centers.
    fn covered(&self, bounds: RectF) -> Vec<(usize, PointF)> {
        let half = self.half_height();
        let columns = i64::from(self.area.width);
        let rows = i64::from(self.area.height) * 2;
        let first_column = ((bounds.x / self.cell_width).floor() as i64).clamp(0, columns);
        let last_column = (((bounds.x + bounds.width) / self.cell_width).ceil() as i64).clamp(0, columns);
        let first_row = ((bounds.y / half).floor() as i64).clamp(0, rows);
        let last_row = (((bounds.y + bounds.height) / half).ceil() as i64).clamp(0, rows);

        let mut result = Vec::new();
        for row in first_row..last_row {
            for column in first_column..last_column {
                let center = PointF::new(
                    (column as f64 + 0.5) * self.cell_width,
                    (row as f64 + 0.5) * half,
                );
                result.push((self.index(column as u16, row as u16), center));
            }
        }
        result
    }

    fn blend(&mut self, index: usize, color: Rgba, opacity: f64) {
        let alpha = (color.alpha_f() * opacity).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let base = self.pixels[index].unwrap_or(BACKDROP);
        self.pixels[index] = Some(mix(base, Rgba { a: 255, ..color }, alpha));
    }

    fn fill_ellipse(&mut self, ellipse: RectF, opacity: f64, shade: impl Fn(PointF) -> Option<Rgba>) {
        let ellipse = ellipse.translated(self.offset);
        for (index, center) in self.covered(ellipse) {
            if !in_ellipse(ellipse, center) {
                continue;
            }
            if let Some(color) = shade(center) {
                self.blend(index, color, opacity);
            }
        }
    }

    fn stroke_ellipse(&mut self, ellipse: RectF, opacity: f64, stroke: Stroke) {
        let ellipse = ellipse.translated(self.offset);
        let outer = ellipse.margins_added(stroke.width / 2.0);
        let inner = ellipse.margins_added(-stroke.width / 2.0);
        for (index, center) in self.covered(outer) {
            if in_ellipse(outer, center) && !in_ellipse(inner, center) {
                self.blend(index, stroke.color, opacity);
            }
        }
    }
}

impl Canvas for TerminalCanvas {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Translate(by) => {
                self.offset = PointF::new(self.offset.x + by.x, self.offset.y + by.y);
            }
            DrawCommand::Name { rect, opacity, image } => {
                if opacity < MIN_LABEL_OPACITY || image.text.is_empty() {
                    return;
                }
                let center = rect.translated(self.offset).center();
                let columns = image.text.width() as f64;
                self.labels.push(Label {
                    column: (center.x / self.cell_width - columns / 2.0).round() as i32,
                    row: (center.y / self.cell_height).floor() as i32,
                    text: image.text,
                    color: image.color,
                });
            }
            DrawCommand::UnreadGradient {
                ellipse,
                opacity,
                from,
                to,
            } => {
                let start = ellipse.translated(self.offset).top_right();
                let end = ellipse.translated(self.offset).bottom_left();
                let (dx, dy) = (end.x - start.x, end.y - start.y);
                let length = dx * dx + dy * dy;
                self.fill_ellipse(ellipse, opacity, |at| {
                    let t = if length > 0.0 {
                        ((at.x - start.x) * dx + (at.y - start.y) * dy) / length
                    } else {
                        0.0
                    };
                    Some(mix(from, to, t.clamp(0.0, 1.0)))
                });
            }
            DrawCommand::Ring {
                ellipse,
                opacity,
                fill,
                stroke,
            } => {
                self.fill_ellipse(ellipse, opacity, |_| Some(fill));
                if let Some(stroke) = stroke {
                    self.stroke_ellipse(ellipse, opacity, stroke);
                }
            }
            DrawCommand::Thumbnail { rect, opacity, bitmap } => {
                let target = rect.translated(self.offset);
                self.fill_ellipse(rect, opacity, |at| {
                    if target.width <= 0.0 || target.height <= 0.0 {
                        return None;
                    }
                    bitmap.sample(
                        (at.x - target.x) / target.width,
                        (at.y - target.y) / target.height,
                    )
                });
            }
        }
    }
}

fn in_ellipse(ellipse: RectF, point: PointF) -> bool {
    if ellipse.width <= 0.0 || ellipse.height <= 0.0 {
        return false;
    }
    let center = ellipse.center();
    let nx = (point.x - center.x) / (ellipse.width / 2.0);
    let ny = (point.y - center.y) / (ellipse.height / 2.0);
    nx * nx + ny * ny <= 1.0
}

fn mix(a: Rgba, b: Rgba, t: f64) -> Rgba {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Rgba::new(
        channel(a.r, b.r),
        channel(a.g, b.g),
        channel(a.b, b.b),
        channel(a.a, b.a),
    )
}

fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bitmap;
    use crate::view_state::canvas::TextImage;

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = buffer.area();
        let mut lines = Vec::new();
        for y in area.top()..area.bottom() {
            let mut line = String::new();
            for x in area.left()..area.right() {
                line.push_str(buffer[(x, y)].symbol());
            }
            let trimmed = line.trim_end();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        lines.join("\n")
    }

    fn render(canvas: &TerminalCanvas, width: u16, height: u16) -> Buffer {
        let mut buf = Buffer::empty(CellRect::new(0, 0, width, height));
        canvas.render(&mut buf);
        buf
    }

    fn ring(rect: RectF, fill: Rgba, opacity: f64) -> DrawCommand {
        DrawCommand::Ring {
            ellipse: rect,
            opacity,
            fill,
            stroke: None,
        }
    }

    fn name(rect: RectF, text: &str, opacity: f64) -> DrawCommand {
        DrawCommand::Name {
            rect,
            opacity,
            image: TextImage {
                text: text.to_string(),
                width: 16,
                height: 16,
                color: Rgba::rgb(255, 255, 255),
            },
        }
    }

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    #[test]
    fn circle_rasterizes_to_half_blocks() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 4, 2), 8, 16, PointF::ZERO);
        canvas.draw(ring(RectF::new(0.0, 0.0, 32.0, 32.0), RED, 1.0));

        let buf = render(&canvas, 4, 2);

        insta::assert_snapshot!(buffer_to_string(&buf), @r"
        ▄▀▀▄
        ▀▀▀▀
        ");
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn translate_moves_following_commands() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 4, 1), 8, 16, PointF::ZERO);
        canvas.draw(DrawCommand::Translate(PointF::new(8.0, 0.0)));
        canvas.draw(ring(RectF::new(0.0, 0.0, 16.0, 16.0), RED, 1.0));

        let buf = render(&canvas, 4, 1);

        assert_eq!(buffer_to_string(&buf), " ▀▀");
    }

    #[test]
    fn origin_offsets_widget_coordinates() {
        let mut canvas =
            TerminalCanvas::new(CellRect::new(0, 0, 4, 1), 8, 16, PointF::new(8.0, 0.0));
        canvas.draw(ring(RectF::new(0.0, 0.0, 16.0, 16.0), RED, 1.0));

        assert_eq!(buffer_to_string(&render(&canvas, 4, 1)), " ▀▀");
    }

    #[test]
    fn translucent_fill_blends_over_backdrop() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 2, 1), 8, 16, PointF::ZERO);
        canvas.draw(ring(RectF::new(0.0, 0.0, 16.0, 16.0), Rgba::rgb(200, 100, 0), 0.5));

        let buf = render(&canvas, 2, 1);

        assert_eq!(buf[(0, 0)].fg, Color::Rgb(100, 50, 0));
    }

    #[test]
    fn later_commands_paint_over_earlier_ones() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 2, 1), 8, 16, PointF::ZERO);
        canvas.draw(ring(RectF::new(0.0, 0.0, 16.0, 16.0), RED, 1.0));
        canvas.draw(ring(RectF::new(0.0, 0.0, 16.0, 16.0), Rgba::rgb(0, 0, 255), 1.0));

        let buf = render(&canvas, 2, 1);

        assert_eq!(buf[(1, 0)].fg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn gradient_runs_from_top_right_to_bottom_left() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 2, 2), 8, 16, PointF::ZERO);
        canvas.draw(DrawCommand::UnreadGradient {
            ellipse: RectF::new(0.0, 0.0, 16.0, 32.0),
            opacity: 1.0,
            from: RED,
            to: Rgba::rgb(0, 0, 255),
        });

        let buf = render(&canvas, 2, 2);

        // Top-right half cell sits near the start, bottom-left near the end.
        let Color::Rgb(r, _, b) = buf[(1, 0)].fg else {
            panic!("expected rgb, got {:?}", buf[(1, 0)].fg);
        };
        assert!(r > b, "top right should be mostly red: {} vs {}", r, b);
        let Color::Rgb(r, _, b) = buf[(0, 1)].bg else {
            panic!("expected rgb, got {:?}", buf[(0, 1)].bg);
        };
        assert!(b > r, "bottom left should be mostly blue: {} vs {}", r, b);
    }

    #[test]
    fn thumbnail_samples_bitmap_inside_circle() {
        let green = Rgba::rgb(0, 200, 0);
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 2, 1), 8, 16, PointF::ZERO);
        canvas.draw(DrawCommand::Thumbnail {
            rect: RectF::new(0.0, 0.0, 16.0, 16.0),
            opacity: 1.0,
            bitmap: Bitmap::solid(4, green),
        });

        let buf = render(&canvas, 2, 1);

        assert_eq!(buffer_to_string(&buf), "▀▀");
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(0, 200, 0));
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(0, 200, 0));
    }

    #[test]
    fn name_is_centered_under_its_rect() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 10, 2), 8, 16, PointF::ZERO);
        canvas.draw(name(RectF::new(0.0, 16.0, 80.0, 16.0), "ab", 1.0));

        assert_eq!(buffer_to_string(&render(&canvas, 10, 2)), "    ab");
    }

    #[test]
    fn faded_name_is_skipped() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 10, 2), 8, 16, PointF::ZERO);
        canvas.draw(name(RectF::new(0.0, 16.0, 80.0, 16.0), "ab", 0.3));

        assert_eq!(buffer_to_string(&render(&canvas, 10, 2)), "");
    }

    #[test]
    fn name_clipped_at_left_edge() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 10, 1), 8, 16, PointF::ZERO);
        // Centered at column 0, so "ab" starts one column off screen.
        canvas.draw(name(RectF::new(-8.0, 0.0, 16.0, 16.0), "ab", 1.0));

        assert_eq!(buffer_to_string(&render(&canvas, 10, 1)), "b");
    }

    #[test]
    fn shapes_outside_the_area_are_ignored() {
        let mut canvas = TerminalCanvas::new(CellRect::new(0, 0, 4, 2), 8, 16, PointF::ZERO);
        canvas.draw(ring(RectF::new(-100.0, -100.0, 50.0, 50.0), RED, 1.0));
        canvas.draw(ring(RectF::new(500.0, 0.0, 50.0, 50.0), RED, 1.0));

        assert_eq!(buffer_to_string(&render(&canvas, 4, 2)), "");
    }
}
