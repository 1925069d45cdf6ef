//! Geometric predicates for planar triangulations.
//!
//! Pure functions on points and triangles: orientation, segment and triangle
//! containment, and circumcircles. Everything uses ordinary `f64` arithmetic; the only
//! tolerance in the crate lives in the Delaunay validator.

#![forbid(unsafe_code)]

use crate::geometry::point::{Point, distance};
use serde::{Deserialize, Serialize};

/// Represents the orientation of an ordered triple of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The triple turns clockwise (negative signed area).
    CLOCKWISE,
    /// The triple is collinear (signed area exactly zero).
    COLLINEAR,
    /// The triple turns counterclockwise (positive signed area).
    COUNTERCLOCKWISE,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CLOCKWISE => write!(f, "CLOCKWISE"),
            Self::COLLINEAR => write!(f, "COLLINEAR"),
            Self::COUNTERCLOCKWISE => write!(f, "COUNTERCLOCKWISE"),
        }
    }
}

/// Twice the signed area of the triangle `abc`.
///
/// Positive when `a → b → c` turns counterclockwise, negative when it turns clockwise
/// and exactly zero when the three points are collinear.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::signed_area;
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([4.0, 0.0]);
/// let c = Point::new([0.0, 4.0]);
/// assert_eq!(signed_area(&a, &b, &c), 16.0);
/// assert_eq!(signed_area(&a, &c, &b), -16.0);
/// assert_eq!(signed_area(&a, &b, &Point::new([8.0, 0.0])), 0.0);
/// ```
#[inline]
#[must_use]
#[allow(clippy::suboptimal_flops)] // both products must round the same way for exact zeros
pub fn signed_area(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

/// Orientation of the ordered triple `abc`, derived from the sign of [`signed_area`].
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::{Orientation, orientation};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// let c = Point::new([0.0, 1.0]);
/// assert_eq!(orientation(&a, &b, &c), Orientation::COUNTERCLOCKWISE);
/// assert_eq!(orientation(&a, &c, &b), Orientation::CLOCKWISE);
/// ```
#[inline]
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    let area = signed_area(a, b, c);
    if area > 0.0 {
        Orientation::COUNTERCLOCKWISE
    } else if area < 0.0 {
        Orientation::CLOCKWISE
    } else {
        Orientation::COLLINEAR
    }
}

/// Returns `true` when `p` is collinear with the segment `ab` and lies between its
/// endpoints (endpoints included).
///
/// The betweenness test compares coordinates along the first axis on which the segment
/// is not degenerate.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::is_on_segment;
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([4.0, 4.0]);
/// assert!(is_on_segment(&Point::new([2.0, 2.0]), &a, &b));
/// assert!(is_on_segment(&a, &a, &b));
/// assert!(!is_on_segment(&Point::new([5.0, 5.0]), &a, &b));
/// assert!(!is_on_segment(&Point::new([2.0, 2.5]), &a, &b));
/// ```
#[must_use]
pub fn is_on_segment(p: &Point, a: &Point, b: &Point) -> bool {
    if signed_area(p, a, b) != 0.0 {
        return false;
    }

    let within = |v: f64, lo: f64, hi: f64| lo < hi && v >= lo && v <= hi;

    within(p.x(), a.x(), b.x())
        || within(p.x(), b.x(), a.x())
        || within(p.y(), a.y(), b.y())
        || within(p.y(), b.y(), a.y())
}

/// Returns `true` when `p` lies inside the triangle or on its boundary.
///
/// A point on any edge counts as contained; otherwise the point must be on the same
/// side of all three directed edges. The vertex order may be either winding.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::triangle_contains_point;
///
/// let tri = [
///     Point::new([0.0, 0.0]),
///     Point::new([4.0, 0.0]),
///     Point::new([0.0, 4.0]),
/// ];
/// assert!(triangle_contains_point(&tri, &Point::new([1.0, 1.0])));
/// assert!(triangle_contains_point(&tri, &Point::new([2.0, 0.0])));
/// assert!(!triangle_contains_point(&tri, &Point::new([3.0, 3.0])));
/// ```
#[must_use]
pub fn triangle_contains_point(triangle: &[Point; 3], p: &Point) -> bool {
    let [a, b, c] = triangle;

    if is_on_segment(p, a, b) || is_on_segment(p, b, c) || is_on_segment(p, c, a) {
        return true;
    }

    // `p` leads every triple so the signs agree bit-for-bit with `is_on_segment` and with
    // the triangles built around `p` during insertion.
    let side = orientation(p, a, b);
    side != Orientation::COLLINEAR && side == orientation(p, b, c) && side == orientation(p, c, a)
}

// =============================================================================
// CIRCUMCIRCLE
// =============================================================================

/// The circle through the three vertices of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circumcircle {
    /// Center, equidistant from the three vertices.
    pub center: Point,
    /// Distance from the center to any vertex.
    pub radius: f64,
}

impl Circumcircle {
    /// Returns `true` when `p` lies strictly inside the circle.
    ///
    /// Points on the circle are not contained, matching the legalization rule that a
    /// co-circular configuration is already legal.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        distance(p, &self.center) < self.radius
    }

    /// How far `p` intrudes into the circle: `radius - distance(p, center)`.
    ///
    /// Positive values are inside, zero is on the circle, negative values are outside.
    #[inline]
    #[must_use]
    pub fn violation(&self, p: &Point) -> f64 {
        self.radius - distance(p, &self.center)
    }
}

/// Computes the circumcircle of the triangle `abc`.
///
/// Returns `None` for collinear triples, which have no circumcircle.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::circumcircle;
///
/// let circle = circumcircle(
///     &Point::new([0.0, 0.0]),
///     &Point::new([4.0, 0.0]),
///     &Point::new([0.0, 4.0]),
/// )
/// .unwrap();
/// assert_eq!(circle.center, Point::new([2.0, 2.0]));
/// assert!((circle.radius - 8.0_f64.sqrt()).abs() < 1e-12);
///
/// assert!(circumcircle(
///     &Point::new([0.0, 0.0]),
///     &Point::new([1.0, 1.0]),
///     &Point::new([2.0, 2.0]),
/// )
/// .is_none());
/// ```
#[must_use]
pub fn circumcircle(a: &Point, b: &Point, c: &Point) -> Option<Circumcircle> {
    // Solve relative to `a` to keep the magnitudes small.
    let (bx, by) = (b.x() - a.x(), b.y() - a.y());
    let (cx, cy) = (c.x() - a.x(), c.y() - a.y());

    #[allow(clippy::suboptimal_flops)]
    let d = 2.0 * (bx * cy - by * cx);
    if d == 0.0 || !d.is_finite() {
        return None;
    }

    let b_sq = bx.mul_add(bx, by * by);
    let c_sq = cx.mul_add(cx, cy * cy);
    let ux = cy.mul_add(b_sq, -(by * c_sq)) / d;
    let uy = bx.mul_add(c_sq, -(cx * b_sq)) / d;

    let center = Point::new([a.x() + ux, a.y() + uy]);
    Some(Circumcircle {
        center,
        radius: distance(a, &center),
    })
}

// =============================================================================
// TESTS
// =============================================================================
