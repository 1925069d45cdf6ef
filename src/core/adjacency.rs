//! Neighbor link maintenance.
//!
//! Links are always written in pairs: if `t1` records `t2` in slot `i`, then `t2`
//! records `t1` in the slot facing the same edge. Three operations keep it that way:
//!
//! - [`update_neighborhood`] links two triangles when they share exactly one edge,
//! - [`recompute_neighborhood`] re-derives every link of one triangle from the
//!   [`Tds`] edge index,
//! - [`remove_neighborhood`] severs a triangle from all of its neighbors before it is
//!   removed.

#![forbid(unsafe_code)]

use crate::core::triangulation_data_structure::{Tds, TdsError, TriangleKey};

/// Links `t1` and `t2` if they share exactly two vertices.
///
/// The slot index in each triangle is `3 - (sum of the matched local indices)`, i.e.
/// the index of the one vertex that is not on the shared edge. Triangles sharing zero,
/// one or three vertices are left untouched.
///
/// Returns `true` when a link was written.
///
/// # Errors
///
/// Returns [`TdsError::TriangleNotFound`] if either key is not live.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::adjacency::update_neighborhood;
/// use planar_delaunay::core::triangulation_data_structure::Tds;
/// use planar_delaunay::core::vertex::VertexKind;
/// use planar_delaunay::geometry::point::Point;
///
/// let mut tds = Tds::new();
/// let v: Vec<_> = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
///     .into_iter()
///     .enumerate()
///     .map(|(i, c)| tds.insert_vertex(Point::new(c), VertexKind::Input(i)))
///     .collect();
///
/// let lower = tds.create_triangle([v[0], v[1], v[2]]).unwrap().unwrap();
/// let upper = tds.create_triangle([v[2], v[1], v[3]]).unwrap().unwrap();
/// let (t1, t2) = (tds.add_triangle(lower), tds.add_triangle(upper));
///
/// assert!(update_neighborhood(&mut tds, t1, t2).unwrap());
/// assert_eq!(tds.get_triangle(t1).unwrap().neighbor(0), Some(t2));
/// assert_eq!(tds.get_triangle(t2).unwrap().neighbor(2), Some(t1));
/// ```
pub fn update_neighborhood(
    tds: &mut Tds,
    t1: TriangleKey,
    t2: TriangleKey,
) -> Result<bool, TdsError> {
    let a = *tds
        .get_triangle(t1)
        .ok_or(TdsError::TriangleNotFound { key: t1 })?
        .vertices();
    let b = *tds
        .get_triangle(t2)
        .ok_or(TdsError::TriangleNotFound { key: t2 })?
        .vertices();

    if t1 == t2 {
        return Ok(false);
    }

    let mut shared = 0;
    let (mut sum_a, mut sum_b) = (0, 0);
    for (i, va) in a.iter().enumerate() {
        for (j, vb) in b.iter().enumerate() {
            if va == vb {
                shared += 1;
                sum_a += i;
                sum_b += j;
            }
        }
    }
    if shared != 2 {
        return Ok(false);
    }

    if let Some(t) = tds.get_triangle_mut(t1) {
        t.set_neighbor(3 - sum_a, Some(t2));
    }
    if let Some(t) = tds.get_triangle_mut(t2) {
        t.set_neighbor(3 - sum_b, Some(t1));
    }
    tracing::trace!(?t1, ?t2, "linked triangles");
    Ok(true)
}

/// Re-derives all three neighbor links of `t` from the edge index.
///
/// Each edge of `t` is shared with at most one other triangle, which is passed to
/// [`update_neighborhood`]. Slots whose edge has no other triangle are cleared.
///
/// # Errors
///
/// - [`TdsError::TriangleNotFound`] if `t` is not live.
/// - [`TdsError::NonManifoldEdge`] if an edge of `t` is indexed by more than two
///   triangles.
pub fn recompute_neighborhood(tds: &mut Tds, t: TriangleKey) -> Result<(), TdsError> {
    let edges = tds
        .get_triangle(t)
        .ok_or(TdsError::TriangleNotFound { key: t })?
        .edges();

    for (slot, edge) in edges.into_iter().enumerate() {
        let incident = tds.edge_index.get(&edge).cloned().unwrap_or_default();
        if incident.len() > 2 {
            return Err(TdsError::NonManifoldEdge {
                edge,
                count: incident.len(),
            });
        }
        match incident.iter().copied().find(|&other| other != t) {
            Some(other) => {
                update_neighborhood(tds, t, other)?;
            }
            None => {
                if let Some(triangle) = tds.get_triangle_mut(t) {
                    triangle.set_neighbor(slot, None);
                }
            }
        }
    }
    Ok(())
}

/// Clears every link between `t` and its neighbors, in both directions.
///
/// # Errors
///
/// Returns [`TdsError::TriangleNotFound`] if `t` is not live.
pub fn remove_neighborhood(tds: &mut Tds, t: TriangleKey) -> Result<(), TdsError> {
    let neighbors = *tds
        .get_triangle(t)
        .ok_or(TdsError::TriangleNotFound { key: t })?
        .neighbors();

    for neighbor in neighbors.into_iter().flatten() {
        if let Some(other) = tds.get_triangle_mut(neighbor)
            && let Some(slot) = other.neighbor_index(t)
        {
            other.set_neighbor(slot, None);
        }
    }
    if let Some(triangle) = tds.get_triangle_mut(t) {
        triangle.clear_neighbors();
    }
    Ok(())
}
