//! Geometry primitives in logical pixels

use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Inclusive containment: points on the edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Exclusive containment: points on the edges are outside.
    pub fn contains_strict(&self, point: Point) -> bool {
        point.x > self.left() && point.x < self.right() && point.y > self.top() && point.y < self.bottom()
    }

    /// Return this rectangle moved by `(dx, dy)`
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
    }

    #[test]
    fn test_contains_inclusive_vs_strict() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let edge = Point::new(100.0, 50.0);

        assert!(rect.contains(edge));
        assert!(!rect.contains_strict(edge));
        assert!(rect.contains_strict(Point::new(50.0, 50.0)));
        assert!(!rect.contains(Point::new(101.0, 50.0)));
    }

    #[test]
    fn test_translate() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0).translate(5.0, -5.0);
        assert_eq!(rect.origin, Point::new(5.0, -5.0));
        assert_eq!(rect.size, Size::new(10.0, 10.0));
    }
}
