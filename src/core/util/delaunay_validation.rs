//! Delaunay empty-circumcircle property validation utilities.
//!
//! Every live triangle is checked against every input vertex. A vertex violates a
//! triangle when it lies inside the circumcircle by more than a tolerance:
//! `radius - distance(vertex, center) > epsilon`. The triangle's own vertices are
//! skipped, since they sit on the circle by construction.

#![forbid(unsafe_code)]

use crate::core::triangulation_data_structure::{Tds, TriangleKey, VertexKey};
use crate::geometry::point::Point;
use std::fmt::Write as _;
use thiserror::Error;

/// Default tolerance for the empty-circumcircle check.
pub const DEFAULT_DELAUNAY_EPSILON: f64 = 1e-8;

/// Errors that can occur during Delaunay property validation.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::triangulation_data_structure::{TriangleKey, VertexKey};
/// use planar_delaunay::core::util::DelaunayValidationError;
/// use planar_delaunay::geometry::point::Point;
/// use slotmap::KeyData;
///
/// let err = DelaunayValidationError::DelaunayViolation {
///     triangle: TriangleKey::from(KeyData::from_ffi(1)),
///     vertex: VertexKey::from(KeyData::from_ffi(2)),
///     point: Point::new([1.0, 1.0]),
///     excess: 0.5,
///     total: 1,
/// };
/// assert!(matches!(err, DelaunayValidationError::DelaunayViolation { .. }));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DelaunayValidationError {
    /// A triangle has an input vertex strictly inside its circumcircle.
    #[error(
        "Triangle {triangle:?} violates the Delaunay property: vertex {vertex:?} at {point} is {excess:e} inside its circumcircle ({total} violation(s) in total)"
    )]
    DelaunayViolation {
        /// The offending triangle.
        triangle: TriangleKey,
        /// The vertex inside its circumcircle.
        vertex: VertexKey,
        /// Position of that vertex.
        point: Point,
        /// How far inside: `radius - distance`.
        excess: f64,
        /// Total number of violations found.
        total: usize,
    },
    /// The tolerance was negative or not finite.
    #[error("Invalid Delaunay tolerance {epsilon}: must be finite and non-negative")]
    InvalidEpsilon {
        /// The rejected tolerance.
        epsilon: f64,
    },
}

/// One (triangle, vertex) pair that breaks the empty-circumcircle property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelaunayViolation {
    /// The offending triangle.
    pub triangle: TriangleKey,
    /// The vertex inside its circumcircle.
    pub vertex: VertexKey,
    /// Position of that vertex.
    pub point: Point,
    /// `radius - distance(point, center)`; always greater than the tolerance.
    pub excess: f64,
}

/// Collects every violation of the empty-circumcircle property.
///
/// Box corners are not tested as intruders; only input vertices are.
#[must_use]
pub fn find_delaunay_violations(tds: &Tds, epsilon: f64) -> Vec<DelaunayViolation> {
    let inputs: Vec<(VertexKey, Point)> = tds
        .vertices()
        .filter(|(_, v)| v.is_input())
        .map(|(k, v)| (k, *v.point()))
        .collect();

    let mut violations = Vec::new();
    for (triangle_key, triangle) in tds.triangles() {
        let circle = triangle.circumcircle();
        for &(vertex, point) in &inputs {
            if triangle.contains_vertex(vertex) {
                continue;
            }
            let excess = circle.violation(&point);
            if excess > epsilon {
                violations.push(DelaunayViolation {
                    triangle: triangle_key,
                    vertex,
                    point,
                    excess,
                });
            }
        }
    }
    violations
}

/// Validates the empty-circumcircle property with tolerance `epsilon`.
///
/// On failure, every violation, the input points and the full triangle dump are
/// logged at `error` level before the first violation is returned.
///
/// # Errors
///
/// - [`DelaunayValidationError::InvalidEpsilon`] for a negative or non-finite
///   tolerance.
/// - [`DelaunayValidationError::DelaunayViolation`] for the first violation found.
pub fn validate_delaunay(tds: &Tds, epsilon: f64) -> Result<(), DelaunayValidationError> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(DelaunayValidationError::InvalidEpsilon { epsilon });
    }

    let violations = find_delaunay_violations(tds, epsilon);
    let Some(first) = violations.first() else {
        tracing::debug!(
            triangles = tds.number_of_triangles(),
            epsilon,
            "Delaunay property holds"
        );
        return Ok(());
    };

    let mut report = String::new();
    for v in &violations {
        let _ = writeln!(
            report,
            "  triangle {:?} / vertex {:?} at {}: excess {:e}",
            v.triangle, v.vertex, v.point, v.excess
        );
    }
    tracing::error!(
        count = violations.len(),
        epsilon,
        "Delaunay property violated:\n{report}{tds}"
    );

    Err(DelaunayValidationError::DelaunayViolation {
        triangle: first.triangle,
        vertex: first.vertex,
        point: first.point,
        excess: first.excess,
        total: violations.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adjacency::recompute_neighborhood;
    use crate::core::vertex::VertexKind;

    /// Square split along the chosen diagonal; the (0,0)–(1,1) split is legal only
    /// up to co-circularity, the other one too. Perturb the top-right corner to make
    /// one of them illegal.
    fn quad(top_right: [f64; 2], diagonal_from_origin: bool) -> Tds {
        let mut tds = Tds::new();
        let v: Vec<_> = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], top_right]
            .into_iter()
            .enumerate()
            .map(|(i, c)| tds.insert_vertex(Point::new(c), VertexKind::Input(i)))
            .collect();
        let faces = if diagonal_from_origin {
            [[v[0], v[1], v[3]], [v[0], v[3], v[2]]]
        } else {
            [[v[0], v[1], v[2]], [v[2], v[1], v[3]]]
        };
        let keys = faces.map(|f| {
            let t = tds.create_triangle(f).unwrap().unwrap();
            tds.add_triangle(t)
        });
        recompute_neighborhood(&mut tds, keys[0]).unwrap();
        tds
    }

    #[test]
    fn co_circular_square_is_delaunay_either_way() {
        assert!(validate_delaunay(&quad([1.0, 1.0], true), DEFAULT_DELAUNAY_EPSILON).is_ok());
        assert!(validate_delaunay(&quad([1.0, 1.0], false), DEFAULT_DELAUNAY_EPSILON).is_ok());
    }

    #[test]
    fn illegal_diagonal_is_reported() {
        // Pulling (1, 1) inward to (0.8, 0.8) makes the (1,0)–(0,1) diagonal illegal
        let tds = quad([0.8, 0.8], false);
        let violations = find_delaunay_violations(&tds, DEFAULT_DELAUNAY_EPSILON);
        assert!(!violations.is_empty());
        assert!(violations.iter().all(|v| v.excess > DEFAULT_DELAUNAY_EPSILON));

        match validate_delaunay(&tds, DEFAULT_DELAUNAY_EPSILON) {
            Err(DelaunayValidationError::DelaunayViolation { total, .. }) => {
                assert_eq!(total, violations.len());
            }
            other => panic!("expected a violation, got {other:?}"),
        }

        // The other diagonal is fine
        assert!(validate_delaunay(&quad([0.8, 0.8], true), DEFAULT_DELAUNAY_EPSILON).is_ok());
    }

    #[test]
    fn large_tolerance_accepts_small_violations() {
        let tds = quad([0.99, 0.99], false);
        assert!(validate_delaunay(&tds, 0.0).is_err());
        assert!(validate_delaunay(&tds, 0.1).is_ok());
    }

    #[test]
    fn box_corners_are_not_tested() {
        let mut tds = quad([0.8, 0.8], true);
        // A corner deep inside every circumcircle is ignored
        tds.insert_vertex(Point::new([0.4, 0.4]), VertexKind::BoxCorner(0));
        assert!(validate_delaunay(&tds, DEFAULT_DELAUNAY_EPSILON).is_ok());
    }

    #[test]
    fn invalid_tolerance() {
        let tds = Tds::new();
        assert_eq!(
            validate_delaunay(&tds, -1.0),
            Err(DelaunayValidationError::InvalidEpsilon { epsilon: -1.0 })
        );
        assert!(validate_delaunay(&tds, f64::NAN).is_err());
        assert!(validate_delaunay(&tds, 0.0).is_ok());
    }
}
