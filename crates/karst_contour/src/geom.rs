//! Geometric value types for extracted contours.
//!
//! These are the canonical representations handed to the renderer and sent
//! through the gather protocol; `#[repr(C)]` + `Pod` keeps the flat-float
//! transport a cast instead of a copy.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D point in world coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Point2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Point2 {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl std::ops::Add for Point2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Point2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// One contour line segment, an ordered pair of world-space points.
///
/// Pure value semantics; the transport layout is exactly
/// `[start.x, start.y, end.x, end.y]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct LineSegment {
    /// Segment start point.
    pub start: Point2,
    /// Segment end point.
    pub end: Point2,
}

impl LineSegment {
    /// Creates a new segment.
    #[inline]
    #[must_use]
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Segment length.
    #[must_use]
    pub fn length(self) -> f32 {
        let d = self.end - self.start;
        d.x.hypot(d.y)
    }
}
