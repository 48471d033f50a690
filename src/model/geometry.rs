//! Pixel geometry primitives shared by the layout, hit-test and paint code.
//!
//! Integer types carry widget geometry as the host reports it; the `F`
//! variants carry interpolated positions that only get rounded at the edge.

/// Integer point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sum of the absolute coordinate differences.
    pub fn manhattan_distance(&self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Floating point position, used for interpolated coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl PointF {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// Integer rectangle. Empty when width or height is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Bounding rectangle of both. An empty operand is ignored.
    pub fn united(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        } else if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Whether `point` lies inside, right/bottom edges exclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Floating point rectangle used for draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl RectF {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow by `margin` on every side.
    pub fn margins_added(&self, margin: f64) -> RectF {
        RectF::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Shift by `offset`.
    pub fn translated(&self, offset: PointF) -> RectF {
        RectF::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Top-right corner.
    pub fn top_right(&self) -> PointF {
        PointF::new(self.x + self.width, self.y)
    }

    /// Bottom-left corner.
    pub fn bottom_left(&self) -> PointF {
        PointF::new(self.x, self.y + self.height)
    }

    /// Center point.
    pub fn center(&self) -> PointF {
        PointF::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Horizontal anchoring of the compact row relative to its position point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Position is the left edge.
    #[default]
    Left,
    /// Position is the horizontal center.
    Center,
    /// Position is the right edge.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn united_covers_both_rects() {
        let a = Rect::new(10, 10, 20, 20);
        let b = Rect::new(0, 25, 5, 30);
        assert_eq!(a.united(&b), Rect::new(0, 10, 30, 45));
    }

    #[test]
    fn united_ignores_empty_operand() {
        let a = Rect::new(10, 10, 20, 20);
        assert_eq!(a.united(&Rect::default()), a);
        assert_eq!(Rect::default().united(&a), a);
    }

    #[test]
    fn contains_excludes_right_and_bottom_edges() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!r.contains(Point::new(5, 10)));
    }

    #[test]
    fn margins_added_grows_symmetrically() {
        let r = RectF::new(10.0, 10.0, 20.0, 20.0).margins_added(2.0);
        assert_eq!(r, RectF::new(8.0, 8.0, 24.0, 24.0));
    }

    #[test]
    fn manhattan_distance_sums_axes() {
        assert_eq!(Point::new(0, 0).manhattan_distance(Point::new(3, -4)), 7);
    }
}
