//! Geometric primitives for the layout engine

use serde::{Deserialize, Serialize};

use crate::constraint::{Attribute, Axis, AxisAttribute};

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A zero-area size
    pub fn zero() -> Self {
        Self::default()
    }
}

/// An axis-aligned rectangle: origin plus extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// The rectangle's extent
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Leading edge on the given axis (x or y)
    pub fn min(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Midpoint on the given axis
    pub fn mid(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x + self.width / 2.0,
            Axis::Y => self.y + self.height / 2.0,
        }
    }

    /// Trailing edge on the given axis (right or bottom)
    pub fn max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right(),
            Axis::Y => self.bottom(),
        }
    }

    /// Extent on the given axis (width or height)
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Value of one axis-attribute on the given axis
    pub fn axis_value(&self, axis: Axis, attribute: AxisAttribute) -> f64 {
        match attribute {
            AxisAttribute::Min => self.min(axis),
            AxisAttribute::Mid => self.mid(axis),
            AxisAttribute::Max => self.max(axis),
            AxisAttribute::Size => self.extent(axis),
        }
    }

    /// Value of one of the 8 geometric attributes
    pub fn attribute_value(&self, attribute: Attribute) -> f64 {
        let (axis, axis_attribute) = attribute.decompose();
        self.axis_value(axis, axis_attribute)
    }

    /// Replace the origin and extent on one axis, leaving the other axis untouched
    pub fn set_axis_span(&mut self, axis: Axis, min: f64, size: f64) {
        match axis {
            Axis::X => {
                self.x = min;
                self.width = size;
            }
            Axis::Y => {
                self.y = min;
                self.height = size;
            }
        }
    }

    /// Compute the union of two rectangles (smallest rect containing both)
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Check if this rectangle contains a point
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::zero()
    }
}
