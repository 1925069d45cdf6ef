//! Data and operations on planar points.
//!
//! A [`Point`] is a plain coordinate value. Identity inside a triangulation is carried by
//! the [`VertexKey`](crate::core::triangulation_data_structure::VertexKey) assigned when
//! the point is inserted, so two points with equal coordinates still become two distinct
//! vertices unless the caller deduplicates them first.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// The [Point] struct represents an immutable point in the plane.
///
/// Points serialize as a two-element array `[x, y]`.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0]);
/// assert_eq!(p.x(), 1.0);
/// assert_eq!(p.y(), 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// The coordinates of the point.
    coords: [f64; 2],
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl Point {
    /// Creates a new point from its `[x, y]` coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [f64; 2]) -> Self {
        Self { coords }
    }

    /// Returns a reference to the point's coordinates as an array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[f64; 2] {
        &self.coords
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.coords[0]
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Returns `true` when both coordinates are finite (neither NaN nor infinite).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::geometry::point::Point;
    ///
    /// assert!(Point::new([0.0, 1.0]).is_finite());
    /// assert!(!Point::new([f64::NAN, 1.0]).is_finite());
    /// assert!(!Point::new([0.0, f64::INFINITY]).is_finite());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Coordinate bits used as a hashable identity for duplicate detection.
    #[inline]
    #[must_use]
    pub fn to_bits(&self) -> [u64; 2] {
        [self.coords[0].to_bits(), self.coords[1].to_bits()]
    }
}

/// Euclidean distance between two points.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::{Point, distance};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([3.0, 4.0]);
/// assert_eq!(distance(&a, &b), 5.0);
/// ```
#[inline]
#[must_use]
pub fn distance(a: &Point, b: &Point) -> f64 {
    (b.x() - a.x()).hypot(b.y() - a.y())
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl From<[f64; 2]> for Point {
    #[inline]
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords)
    }
}

impl From<Point> for [f64; 2] {
    #[inline]
    fn from(point: Point) -> Self {
        point.coords
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x(), self.y())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_accessors() {
        let p = Point::new([1.5, -2.0]);
        assert_relative_eq!(p.x(), 1.5);
        assert_relative_eq!(p.y(), -2.0);
        assert_eq!(p.coords(), &[1.5, -2.0]);

        let arr: [f64; 2] = p.into();
        assert_eq!(arr, [1.5, -2.0]);
    }

    #[test]
    fn point_distance() {
        let a = Point::new([1.0, 1.0]);
        let b = Point::new([4.0, 5.0]);
        assert_relative_eq!(distance(&a, &b), 5.0);
        assert_relative_eq!(distance(&a, &b), distance(&b, &a));
        assert_relative_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn point_serializes_as_array() {
        let p = Point::new([0.25, 8.0]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[0.25,8.0]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn point_display() {
        let p = Point::new([1.0, 2.5]);
        assert_eq!(p.to_string(), "(1.000000, 2.500000)");
    }
}
