//! Point location.
//!
//! A linear scan over the live triangles returning the first one that contains the
//! query point, boundary included. Scan order is the arena's iteration order, so the
//! result is deterministic for a given sequence of insertions.
//!
//! A point on a shared edge is contained by both adjacent triangles; whichever comes
//! first is returned and the split engine picks up the other one through the
//! neighbor link.

use crate::core::triangulation_data_structure::{Tds, TdsError, TriangleKey};
use crate::geometry::point::Point;
use crate::geometry::predicates::triangle_contains_point;

/// Error during point location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocateError {
    /// Triangulation has no triangles
    #[error("Cannot locate in empty triangulation")]
    EmptyTriangulation,

    /// No triangle contains the point
    #[error("No triangle contains {point}")]
    NotFound {
        /// The query point
        point: Point,
    },

    /// Underlying data structure failure
    #[error(transparent)]
    Tds(#[from] TdsError),
}

/// Finds a triangle containing `point` (boundary inclusive).
///
/// # Errors
///
/// - [`LocateError::EmptyTriangulation`] when there are no triangles.
/// - [`LocateError::NotFound`] when no triangle contains the point.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::algorithms::locate::locate;
/// use planar_delaunay::core::bounding_box::BoundingBox;
/// use planar_delaunay::core::triangulation_data_structure::Tds;
/// use planar_delaunay::geometry::point::Point;
///
/// let mut tds = Tds::new();
/// BoundingBox::new(8.0, 8.0, 1.0).unwrap().seed(&mut tds).unwrap();
///
/// let t = locate(&tds, &Point::new([1.0, 2.0])).unwrap();
/// assert!(tds.contains_triangle(t));
/// assert!(locate(&tds, &Point::new([100.0, 0.0])).is_err());
/// ```
pub fn locate(tds: &Tds, point: &Point) -> Result<TriangleKey, LocateError> {
    if tds.number_of_triangles() == 0 {
        return Err(LocateError::EmptyTriangulation);
    }

    for key in tds.triangle_keys() {
        if triangle_contains_point(&tds.triangle_points(key)?, point) {
            tracing::trace!(?key, %point, "located point");
            return Ok(key);
        }
    }
    Err(LocateError::NotFound { point: *point })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bounding_box::BoundingBox;

    fn seeded() -> (Tds, [TriangleKey; 2]) {
        let mut tds = Tds::new();
        let seeds = BoundingBox::new(8.0, 8.0, 1.0)
            .unwrap()
            .seed(&mut tds)
            .unwrap();
        (tds, seeds)
    }

    #[test]
    fn locates_strictly_inside_points() {
        let (tds, [lower, upper]) = seeded();
        // Box spans [-8, 16]², diagonal x + y = 8
        assert_eq!(locate(&tds, &Point::new([1.0, 1.0])), Ok(lower));
        assert_eq!(locate(&tds, &Point::new([7.0, 7.0])), Ok(upper));
    }

    #[test]
    fn diagonal_points_resolve_to_either_seed() {
        let (tds, seeds) = seeded();
        let t = locate(&tds, &Point::new([4.0, 4.0])).unwrap();
        assert!(seeds.contains(&t));
    }

    #[test]
    fn points_outside_are_not_found() {
        let (tds, _) = seeded();
        let outside = Point::new([20.0, 0.0]);
        assert_eq!(
            locate(&tds, &outside),
            Err(LocateError::NotFound { point: outside })
        );
    }

    #[test]
    fn empty_structure() {
        assert_eq!(
            locate(&Tds::new(), &Point::new([0.0, 0.0])),
            Err(LocateError::EmptyTriangulation)
        );
    }
}
