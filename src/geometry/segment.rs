use crate::math::Point3;

/// A straight segment between two points.
///
/// Used both for conductor centerlines (start and end follow the walking
/// direction) and for conductor outlines (start is the minimum corner, end
/// the maximum corner of the rectangle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns the Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Returns the midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        nalgebra::center(&self.start, &self.end)
    }
}
