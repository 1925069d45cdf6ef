//! Edge-flip legalization.
//!
//! After a point `p` is inserted, only the edges opposite `p` in the new triangles can
//! violate the empty-circumcircle property. For each such triangle `t = (p, a, b)` the
//! legalizer looks at the triangle `c = (b, a, q)` across `ab`. If `p` lies strictly
//! inside the circumcircle of `c`, the edge `ab` is replaced by `pq`:
//!
//! ```text
//!        q                    q
//!       / \                  /|\
//!      /   \                / | \
//!     a-----b     ──►      a  |  b
//!      \   /                \ | /
//!       \ /                  \|/
//!        p                    p
//! ```
//!
//! Triangles touching the bounding box are tested with their corners at infinity (see
//! [`in_circumcircle`]), so the finite box never decides the fate of an input edge.
//!
//! Both replacement triangles again contain `p` and are legalized in turn. The
//! recursion is unrolled into an explicit worklist; entries whose triangle has been
//! flipped away in the meantime are skipped.
//!
//! # References
//! - L. J. Guibas and J. Stolfi, "Primitives for the manipulation of general
//!   subdivisions and the computation of Voronoi diagrams", ACM TOG, 1985.

use thiserror::Error;

use crate::core::adjacency::{recompute_neighborhood, remove_neighborhood};
use crate::core::bounding_box::in_circumcircle;
use crate::core::collections::SmallBuffer;
use crate::core::triangulation_data_structure::{Tds, TdsError, TriangleKey, VertexKey};

/// Errors raised while legalizing around a new point.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FlipError {
    /// A worklist triangle does not have the inserted point as a vertex.
    #[error("Triangle {triangle:?} does not contain vertex {vertex:?}")]
    VertexNotInTriangle {
        /// The triangle being legalized.
        triangle: TriangleKey,
        /// The inserted vertex.
        vertex: VertexKey,
    },
    /// The far triangle does not link back to the triangle holding the new point.
    #[error("Far triangle {candidate:?} has no link back to {triangle:?}")]
    FarTriangleNotFound {
        /// The triangle holding the new point.
        triangle: TriangleKey,
        /// The candidate across the edge opposite the new point.
        candidate: TriangleKey,
    },
    /// A flip would have produced a zero-area triangle.
    #[error("Flipping the edge between {triangle:?} and {candidate:?} is degenerate")]
    DegenerateFlip {
        /// The triangle holding the new point.
        triangle: TriangleKey,
        /// The candidate across the edge opposite the new point.
        candidate: TriangleKey,
    },
    /// Underlying data structure failure.
    #[error("Flip failed: {0}")]
    Tds(#[from] TdsError),
}

/// Restores the Delaunay property around vertex `p` by edge flips.
///
/// `new_triangles` are the triangles just created around `p`. Returns the number of
/// flips performed.
///
/// # Errors
///
/// Returns a [`FlipError`] when the neighborhood is inconsistent or a flip would be
/// degenerate. The structure is left as it was at the failing flip.
pub fn legalize(
    tds: &mut Tds,
    p: VertexKey,
    new_triangles: &[TriangleKey],
) -> Result<usize, FlipError> {
    let p_point = tds.vertex_point(p)?;
    let mut worklist: Vec<TriangleKey> = new_triangles.iter().rev().copied().collect();
    let mut flips = 0;

    while let Some(t) = worklist.pop() {
        let Some(triangle) = tds.get_triangle(t) else {
            continue;
        };
        let p_index = triangle
            .vertex_index(p)
            .ok_or(FlipError::VertexNotInTriangle {
                triangle: t,
                vertex: p,
            })?;
        let Some(candidate) = triangle.neighbor(p_index) else {
            continue;
        };

        if !in_circumcircle(tds, candidate, &p_point)? {
            continue;
        }

        let far = tds
            .get_triangle(candidate)
            .ok_or(TdsError::TriangleNotFound { key: candidate })?;

        let s = far
            .neighbor_index(t)
            .ok_or(FlipError::FarTriangleNotFound {
                triangle: t,
                candidate,
            })?;
        let q = far.vertex(s);
        let (a, b) = (far.vertex(s + 1), far.vertex(s + 2));

        let degenerate = FlipError::DegenerateFlip {
            triangle: t,
            candidate,
        };
        let first = tds.create_triangle([p, q, a])?.ok_or_else(|| degenerate.clone())?;
        let second = tds.create_triangle([p, q, b])?.ok_or(degenerate)?;

        remove_neighborhood(tds, t)?;
        remove_neighborhood(tds, candidate)?;
        tds.remove_triangle(t)?;
        tds.remove_triangle(candidate)?;

        let replaced: SmallBuffer<TriangleKey, 2> =
            [tds.add_triangle(first), tds.add_triangle(second)].into_iter().collect();
        for &k in &replaced {
            recompute_neighborhood(tds, k)?;
        }

        flips += 1;
        tracing::trace!(?t, ?candidate, ?replaced, "flipped edge");
        worklist.extend(replaced.iter().rev().copied());
    }

    Ok(flips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vertex::VertexKind;
    use crate::geometry::point::Point;

    /// Two linked triangles `(p, b, a)` and `(q, a, b)` over the diagonal `a–b`.
    fn pair(coords: [[f64; 2]; 4]) -> (Tds, [VertexKey; 4], [TriangleKey; 2]) {
        let mut tds = Tds::new();
        let v: Vec<_> = coords
            .into_iter()
            .enumerate()
            .map(|(i, c)| tds.insert_vertex(Point::new(c), VertexKind::Input(i)))
            .collect();
        let (p, a, b, q) = (v[0], v[1], v[2], v[3]);

        let near = tds.create_triangle([p, b, a]).unwrap().unwrap();
        let far = tds.create_triangle([q, a, b]).unwrap().unwrap();
        let keys = [tds.add_triangle(near), tds.add_triangle(far)];
        recompute_neighborhood(&mut tds, keys[0]).unwrap();
        (tds, [p, a, b, q], keys)
    }

    /// `p` sits inside the circumcircle of `(q, a, b)`.
    fn illegal_pair() -> (Tds, [VertexKey; 4], [TriangleKey; 2]) {
        pair([[0.0, -1.0], [-3.0, 0.0], [3.0, 0.0], [0.0, 1.0]])
    }

    #[test]
    fn flips_illegal_edge() {
        let (mut tds, [p, a, b, q], [near, far]) = illegal_pair();

        assert_eq!(legalize(&mut tds, p, &[near]), Ok(1));
        assert!(!tds.contains_triangle(near));
        assert!(!tds.contains_triangle(far));
        assert_eq!(tds.number_of_triangles(), 2);

        let edges: Vec<_> = tds.edges().collect();
        assert!(edges.contains(&crate::core::edge::EdgeKey::new(p, q)));
        assert!(!edges.contains(&crate::core::edge::EdgeKey::new(a, b)));
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn legal_edge_is_kept() {
        // Long thin quadrilateral: p is far outside the circumcircle of (q, a, b)
        let (mut tds, [p, a, b, _], [near, far]) =
            pair([[0.0, -5.0], [-1.0, 0.0], [1.0, 0.0], [0.0, 5.0]]);

        assert_eq!(legalize(&mut tds, p, &[near]), Ok(0));
        assert!(tds.contains_triangle(near));
        assert!(tds.contains_triangle(far));
        assert!(tds.edges().any(|e| e == crate::core::edge::EdgeKey::new(a, b)));
    }

    #[test]
    fn boundary_triangles_need_no_flips() {
        let mut tds = Tds::new();
        let v: Vec<_> = [[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]]
            .into_iter()
            .enumerate()
            .map(|(i, c)| tds.insert_vertex(Point::new(c), VertexKind::Input(i)))
            .collect();
        let t = tds.create_triangle([v[0], v[1], v[2]]).unwrap().unwrap();
        let key = tds.add_triangle(t);

        assert_eq!(legalize(&mut tds, v[0], &[key]), Ok(0));
        assert!(tds.contains_triangle(key));
    }

    #[test]
    fn stale_entries_are_skipped() {
        let (mut tds, [p, ..], [near, _]) = illegal_pair();
        // The same triangle listed twice: the second entry refers to a flipped-away key
        assert_eq!(legalize(&mut tds, p, &[near, near]), Ok(1));
    }

    #[test]
    fn worklist_entries_must_contain_the_point() {
        let (mut tds, [p, ..], [_, far]) = illegal_pair();
        assert_eq!(
            legalize(&mut tds, p, &[far]),
            Err(FlipError::VertexNotInTriangle {
                triangle: far,
                vertex: p
            })
        );
    }

    #[test]
    fn one_sided_link_is_reported() {
        let (mut tds, [p, ..], [near, far]) = illegal_pair();
        tds.get_triangle_mut(far).unwrap().clear_neighbors();
        assert_eq!(
            legalize(&mut tds, p, &[near]),
            Err(FlipError::FarTriangleNotFound {
                triangle: near,
                candidate: far
            })
        );
    }
}
