use serde::{Deserialize, Serialize};

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its four edges, Win32 `RECT` style.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns whether the two rectangles share any area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Multiplies every coordinate by `factor`, rounding to the nearest pixel.
    ///
    /// Used to convert between logical (DPI-independent) and physical units.
    pub fn scale(&self, factor: f64) -> Rect {
        let s = |v: i32| (f64::from(v) * factor).round() as i32;
        Rect::from_edges(s(self.x), s(self.y), s(self.right()), s(self.bottom()))
    }
}
