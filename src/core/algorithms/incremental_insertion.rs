//! Incremental insertion: locate, split, legalize.
//!
//! Inserting a vertex `p`:
//! 1. locate a triangle `t` containing `p` (boundary inclusive),
//! 2. split `t` into the triangles `(p, v[i], v[i + 1])`; if `p` lies on an edge of
//!    `t`, the triangle `u` across that edge is split as well, skipping the collinear
//!    edge on both sides (four triangles instead of three),
//! 3. legalize the new triangles by edge flips
//!    ([`legalize`](crate::core::algorithms::flips::legalize)).
//!
//! The old triangles are unlinked and removed *before* the replacements are added so
//! that no edge is ever claimed by more than two triangles.

use crate::core::adjacency::{recompute_neighborhood, remove_neighborhood};
use crate::core::algorithms::flips::{FlipError, legalize};
use crate::core::algorithms::locate::{LocateError, locate};
use crate::core::collections::{SmallBuffer, TriangleKeyBuffer};
use crate::core::triangle::Triangle;
use crate::core::triangulation_data_structure::{Tds, TdsError, TriangleKey, VertexKey};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Error during incremental insertion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum InsertionError {
    /// Point location failed
    #[error("Location error: {0}")]
    Location(#[from] LocateError),

    /// The point coincides with an existing vertex of the containing triangle
    #[error("Vertex {vertex:?} coincides with a vertex of triangle {triangle:?}")]
    CoincidentVertex {
        /// The vertex being inserted
        vertex: VertexKey,
        /// The triangle that was being split
        triangle: TriangleKey,
    },

    /// Legalization failed
    #[error("Legalization error: {0}")]
    Flip(#[from] FlipError),

    /// Underlying data structure failure
    #[error("Data structure error: {0}")]
    Tds(#[from] TdsError),
}

/// What a split produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Keys of the new triangles (3, or 4 when the point was on an edge).
    pub triangles: TriangleKeyBuffer,
    /// Number of triangles removed (1, or 2 when the point was on an edge).
    pub removed: usize,
    /// Whether the point was on an edge of the located triangle.
    pub on_edge: bool,
}

/// Per-insertion statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionStatistics {
    /// Number of vertices inserted.
    pub vertices_inserted: usize,
    /// Number of insertions that landed on an existing edge.
    pub edge_splits: usize,
    /// Triangles created by splits and flips.
    pub triangles_created: usize,
    /// Triangles removed by splits and flips.
    pub triangles_removed: usize,
    /// Edge flips performed during legalization.
    pub flips: usize,
}

impl AddAssign for InsertionStatistics {
    fn add_assign(&mut self, rhs: Self) {
        self.vertices_inserted += rhs.vertices_inserted;
        self.edge_splits += rhs.edge_splits;
        self.triangles_created += rhs.triangles_created;
        self.triangles_removed += rhs.triangles_removed;
        self.flips += rhs.flips;
    }
}

/// Triangles `(p, v[i], v[i + 1])` for every non-collinear edge of `t`, plus the
/// neighbor slots of `t` whose edge was collinear with `p`.
fn fan_around(
    tds: &Tds,
    t: TriangleKey,
    p: VertexKey,
) -> Result<(SmallBuffer<Triangle, 3>, SmallBuffer<usize, 3>), TdsError> {
    let triangle = tds
        .get_triangle(t)
        .ok_or(TdsError::TriangleNotFound { key: t })?;
    let mut fan = SmallBuffer::new();
    let mut collinear = SmallBuffer::new();
    for i in 0..3 {
        match tds.create_triangle([p, triangle.vertex(i), triangle.vertex(i + 1)])? {
            Some(new) => fan.push(new),
            // Edge (v[i], v[i + 1]) is opposite v[i + 2]
            None => collinear.push((i + 2) % 3),
        }
    }
    Ok((fan, collinear))
}

/// Splits triangle `t` around vertex `p`, which must lie inside or on the boundary
/// of `t`.
///
/// When `p` lies on an edge of `t` the neighbor across that edge is split too, and the
/// two degenerate triangles are skipped, so no zero-area triangle is ever created.
/// The new triangles are linked to each other and to the surrounding triangles.
///
/// # Errors
///
/// - [`InsertionError::CoincidentVertex`] if `p` is collinear with more than one edge
///   of `t` (or of its neighbor), i.e. it coincides with a vertex.
/// - [`InsertionError::Tds`] on an inconsistent structure.
pub fn split_triangle(
    tds: &mut Tds,
    t: TriangleKey,
    p: VertexKey,
) -> Result<SplitOutcome, InsertionError> {
    let (mut fan, collinear) = fan_around(tds, t, p)?;
    if collinear.len() > 1 {
        return Err(InsertionError::CoincidentVertex {
            vertex: p,
            triangle: t,
        });
    }

    let mut old: SmallBuffer<TriangleKey, 2> = SmallBuffer::new();
    old.push(t);
    if let Some(&slot) = collinear.first()
        && let Some(u) = tds.get_triangle(t).and_then(|tri| tri.neighbor(slot))
    {
        let (other_fan, other_collinear) = fan_around(tds, u, p)?;
        if other_collinear.len() != 1 {
            return Err(InsertionError::CoincidentVertex {
                vertex: p,
                triangle: u,
            });
        }
        fan.extend(other_fan);
        old.push(u);
    }

    for &k in &old {
        remove_neighborhood(tds, k)?;
    }
    for &k in &old {
        tds.remove_triangle(k)?;
    }

    let triangles: TriangleKeyBuffer = fan.into_iter().map(|new| tds.add_triangle(new)).collect();
    for &k in &triangles {
        recompute_neighborhood(tds, k)?;
    }

    let on_edge = !collinear.is_empty();
    tracing::trace!(?t, ?p, on_edge, created = triangles.len(), "split triangle");
    Ok(SplitOutcome {
        triangles,
        removed: old.len(),
        on_edge,
    })
}

/// Inserts an already stored vertex into the triangulation: locate, split and
/// legalize.
///
/// # Errors
///
/// Returns an [`InsertionError`] if the vertex is unknown, cannot be located, coincides
/// with an existing vertex, or legalization fails.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::algorithms::incremental_insertion::insert_vertex;
/// use planar_delaunay::core::bounding_box::BoundingBox;
/// use planar_delaunay::core::triangulation_data_structure::Tds;
/// use planar_delaunay::core::vertex::VertexKind;
/// use planar_delaunay::geometry::point::Point;
///
/// let mut tds = Tds::new();
/// BoundingBox::new(8.0, 8.0, 1.0).unwrap().seed(&mut tds).unwrap();
///
/// let v = tds.insert_vertex(Point::new([1.0, 2.0]), VertexKind::Input(0));
/// let stats = insert_vertex(&mut tds, v).unwrap();
/// assert_eq!(stats.vertices_inserted, 1);
/// assert_eq!(tds.number_of_triangles(), 4);
/// assert!(tds.is_valid().is_ok());
/// ```
pub fn insert_vertex(tds: &mut Tds, vertex: VertexKey) -> Result<InsertionStatistics, InsertionError> {
    let point = tds.vertex_point(vertex)?;
    let located = locate(tds, &point)?;
    let outcome = split_triangle(tds, located, vertex)?;
    let flips = legalize(tds, vertex, &outcome.triangles)?;

    let stats = InsertionStatistics {
        vertices_inserted: 1,
        edge_splits: usize::from(outcome.on_edge),
        triangles_created: outcome.triangles.len() + 2 * flips,
        triangles_removed: outcome.removed + 2 * flips,
        flips,
    };
    tracing::debug!(?vertex, %point, flips, on_edge = outcome.on_edge, "inserted vertex");
    Ok(stats)
}
