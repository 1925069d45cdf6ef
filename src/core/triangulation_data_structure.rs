//! The triangulation data structure: vertex and triangle arenas plus an edge index.
//!
//! [`Tds`] owns every [`Vertex`] and [`Triangle`] in slotmap arenas addressed by
//! [`VertexKey`] and [`TriangleKey`]. Keys are stable handles: removing a triangle never
//! invalidates other keys, and a removed key never resolves to a newer triangle.
//!
//! Alongside the arenas the structure keeps an edge → triangles index, updated on every
//! [`add_triangle`](Tds::add_triangle) and [`remove_triangle`](Tds::remove_triangle). The
//! adjacency maintainer in [`crate::core::adjacency`] reads it to find the (at most one)
//! triangle across each edge instead of scanning the whole set.
//!
//! # Invariants
//!
//! - Every stored triangle is counterclockwise with non-zero area.
//! - Neighbor links are mutual and always cross a shared edge.
//! - Every edge is shared by at most two triangles.
//! - A triangle can only be removed once nothing links to it.
//!
//! [`Tds::is_valid`] checks all of these.
//!
//! # Examples
//!
//! ```rust
//! use planar_delaunay::core::triangulation_data_structure::Tds;
//! use planar_delaunay::core::vertex::VertexKind;
//! use planar_delaunay::geometry::point::Point;
//!
//! let mut tds = Tds::new();
//! let a = tds.insert_vertex(Point::new([0.0, 0.0]), VertexKind::Input(0));
//! let b = tds.insert_vertex(Point::new([4.0, 0.0]), VertexKind::Input(1));
//! let c = tds.insert_vertex(Point::new([0.0, 4.0]), VertexKind::Input(2));
//!
//! let triangle = tds.create_triangle([a, c, b]).unwrap().unwrap();
//! let key = tds.add_triangle(triangle);
//!
//! assert_eq!(tds.number_of_triangles(), 1);
//! assert!(tds.is_valid().is_ok());
//! assert_eq!(tds.remove_triangle(key).unwrap().vertices(), &[a, b, c]);
//! ```

#![forbid(unsafe_code)]

use crate::core::collections::{EdgeToTrianglesMap, FastHashMap, StorageMap};
use crate::core::edge::EdgeKey;
use crate::core::triangle::{Triangle, TriangleValidationError};
use crate::core::vertex::{Vertex, VertexKind};
use crate::geometry::point::Point;
use crate::geometry::predicates::signed_area;
use slotmap::new_key_type;
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by triangle-set operations and structural validation.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum TdsError {
    /// A triangle key did not resolve to a live triangle.
    #[error("Triangle {key:?} not found")]
    TriangleNotFound {
        /// The missing triangle key.
        key: TriangleKey,
    },
    /// A vertex key did not resolve to a stored vertex.
    #[error("Vertex {key:?} not found")]
    VertexNotFound {
        /// The missing vertex key.
        key: VertexKey,
    },
    /// A vertex was removed while a triangle still used it.
    #[error("Vertex {key:?} is still used by triangle {triangle:?}")]
    VertexInUse {
        /// The vertex being removed.
        key: VertexKey,
        /// A triangle that still uses it.
        triangle: TriangleKey,
    },
    /// A triangle was removed while a neighbor link to or from it was still set.
    #[error("Triangle {triangle:?} is still linked with neighbor {neighbor:?}")]
    DanglingNeighbor {
        /// The triangle being removed.
        triangle: TriangleKey,
        /// The triangle on the other end of the remaining link.
        neighbor: TriangleKey,
    },
    /// More than two triangles claim the same edge.
    #[error("Edge {edge:?} is shared by {count} triangles (at most 2 allowed)")]
    NonManifoldEdge {
        /// The over-shared edge.
        edge: EdgeKey,
        /// How many triangles claim it.
        count: usize,
    },
    /// A triangle failed its own structural checks.
    #[error("Invalid triangle {key:?}: {source}")]
    InvalidTriangle {
        /// The offending triangle.
        key: TriangleKey,
        /// The underlying triangle validation error.
        source: TriangleValidationError,
    },
    /// Neighbor links are inconsistent.
    #[error("Invalid neighbor relationships: {message}")]
    InvalidNeighbors {
        /// Description of the inconsistency.
        message: String,
    },
    /// A stored triangle is clockwise or degenerate.
    #[error("Triangle {key:?} is not counterclockwise (doubled signed area {area})")]
    NotCounterclockwise {
        /// The offending triangle.
        key: TriangleKey,
        /// Its doubled signed area.
        area: f64,
    },
    /// The edge index disagrees with the stored triangles.
    #[error("Edge index inconsistency: {message}")]
    EdgeIndexMismatch {
        /// Description of the mismatch.
        message: String,
    },
}

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices in the storage map.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing triangles in the storage map.
    ///
    /// Keys of removed triangles stay invalid forever; the legalizer relies on this to
    /// skip work items whose triangle has already been flipped away.
    pub struct TriangleKey;
}

// =============================================================================
// TDS
// =============================================================================

/// Triangulation data structure: vertex and triangle arenas with an edge index.
#[derive(Clone, Debug, Default)]
pub struct Tds {
    vertices: StorageMap<VertexKey, Vertex>,
    triangles: StorageMap<TriangleKey, Triangle>,
    pub(crate) edge_index: EdgeToTrianglesMap,
}

impl Tds {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Vertices
    // -------------------------------------------------------------------------

    /// Stores a vertex and returns its key.
    pub fn insert_vertex(&mut self, point: Point, kind: VertexKind) -> VertexKey {
        self.vertices.insert(Vertex::new(point, kind))
    }

    /// Looks up a vertex.
    #[inline]
    #[must_use]
    pub fn get_vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    /// Removes a vertex that no triangle references any more.
    ///
    /// # Errors
    ///
    /// - [`TdsError::VertexNotFound`] for an unknown key.
    /// - [`TdsError::VertexInUse`] while a live triangle still has it as a corner.
    pub fn remove_vertex(&mut self, key: VertexKey) -> Result<Vertex, TdsError> {
        if !self.vertices.contains_key(key) {
            return Err(TdsError::VertexNotFound { key });
        }
        if let Some(edge) = self.edge_index.keys().find(|e| e.contains(key)) {
            let triangle = self.edge_index[edge][0];
            return Err(TdsError::VertexInUse { key, triangle });
        }
        self.vertices
            .remove(key)
            .ok_or(TdsError::VertexNotFound { key })
    }

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] for an unknown key.
    #[inline]
    pub fn vertex_point(&self, key: VertexKey) -> Result<Point, TdsError> {
        self.vertices
            .get(key)
            .map(|v| *v.point())
            .ok_or(TdsError::VertexNotFound { key })
    }

    /// Iterates over all vertices, input points and box corners alike.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.vertices.iter()
    }

    /// Number of stored vertices (including box corners while they exist).
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored input vertices.
    #[must_use]
    pub fn number_of_input_vertices(&self) -> usize {
        self.vertices.values().filter(|v| v.is_input()).count()
    }

    // -------------------------------------------------------------------------
    // Triangles
    // -------------------------------------------------------------------------

    /// Builds a triangle from stored vertices.
    ///
    /// Returns `Ok(None)` when the vertices are collinear (see
    /// [`Triangle::from_points`]).
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] if any key is unknown.
    pub fn create_triangle(&self, keys: [VertexKey; 3]) -> Result<Option<Triangle>, TdsError> {
        let points = [
            self.vertex_point(keys[0])?,
            self.vertex_point(keys[1])?,
            self.vertex_point(keys[2])?,
        ];
        Ok(Triangle::from_points(keys, points))
    }

    /// Adds a triangle to the set and indexes its edges.
    ///
    /// The triangle's neighbor slots are kept as given; links are established with
    /// [`recompute_neighborhood`](crate::core::adjacency::recompute_neighborhood).
    pub fn add_triangle(&mut self, triangle: Triangle) -> TriangleKey {
        let edges = triangle.edges();
        let key = self.triangles.insert(triangle);
        for edge in edges {
            self.edge_index.entry(edge).or_default().push(key);
        }
        key
    }

    /// Removes a triangle from the set.
    ///
    /// The triangle must be fully unlinked first (see
    /// [`remove_neighborhood`](crate::core::adjacency::remove_neighborhood)).
    ///
    /// # Errors
    ///
    /// - [`TdsError::TriangleNotFound`] if the key is not live.
    /// - [`TdsError::DanglingNeighbor`] if the triangle still links to a neighbor or a
    ///   live triangle still links to it.
    pub fn remove_triangle(&mut self, key: TriangleKey) -> Result<Triangle, TdsError> {
        let triangle = self.get_triangle(key).ok_or(TdsError::TriangleNotFound { key })?;

        if let Some(neighbor) = triangle.neighbors().iter().flatten().next() {
            return Err(TdsError::DanglingNeighbor {
                triangle: key,
                neighbor: *neighbor,
            });
        }
        for edge in triangle.edges() {
            for &other in self.edge_index.get(&edge).into_iter().flatten() {
                if other != key
                    && self
                        .triangles
                        .get(other)
                        .is_some_and(|t| t.neighbor_index(key).is_some())
                {
                    return Err(TdsError::DanglingNeighbor {
                        triangle: key,
                        neighbor: other,
                    });
                }
            }
        }

        let removed = self
            .triangles
            .remove(key)
            .ok_or(TdsError::TriangleNotFound { key })?;
        for edge in removed.edges() {
            if let Some(incident) = self.edge_index.get_mut(&edge) {
                incident.retain(|k| *k != key);
                if incident.is_empty() {
                    self.edge_index.remove(&edge);
                }
            }
        }
        Ok(removed)
    }

    /// Looks up a triangle.
    #[inline]
    #[must_use]
    pub fn get_triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    pub(crate) fn get_triangle_mut(&mut self, key: TriangleKey) -> Option<&mut Triangle> {
        self.triangles.get_mut(key)
    }

    /// Returns `true` when `key` names a live triangle.
    #[inline]
    #[must_use]
    pub fn contains_triangle(&self, key: TriangleKey) -> bool {
        self.triangles.contains_key(key)
    }

    /// Iterates over all live triangles, in unspecified order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangles.iter()
    }

    /// Iterates over all live triangle keys, in unspecified order.
    pub fn triangle_keys(&self) -> impl Iterator<Item = TriangleKey> + '_ {
        self.triangles.keys()
    }

    /// Number of live triangles.
    #[inline]
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Positions of a triangle's vertices, in stored (counterclockwise) order.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::TriangleNotFound`] or [`TdsError::VertexNotFound`] for
    /// unknown keys.
    pub fn triangle_points(&self, key: TriangleKey) -> Result<[Point; 3], TdsError> {
        let triangle = self.get_triangle(key).ok_or(TdsError::TriangleNotFound { key })?;
        let [a, b, c] = *triangle.vertices();
        Ok([
            self.vertex_point(a)?,
            self.vertex_point(b)?,
            self.vertex_point(c)?,
        ])
    }

    /// Iterates over every distinct edge of the live triangles.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edge_index.keys().copied()
    }

    /// Number of box corners among a triangle's vertices.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::TriangleNotFound`] or [`TdsError::VertexNotFound`] for
    /// unknown keys.
    pub fn box_corner_count(&self, key: TriangleKey) -> Result<usize, TdsError> {
        let triangle = self.get_triangle(key).ok_or(TdsError::TriangleNotFound { key })?;
        let mut count = 0;
        for &v in triangle.vertices() {
            let vertex = self.get_vertex(v).ok_or(TdsError::VertexNotFound { key: v })?;
            if vertex.is_box_corner() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Releases every triangle and vertex.
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.vertices.clear();
        self.edge_index.clear();
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Checks that neighbor links are mutual, cross a shared edge, and that every
    /// interior edge links its two triangles.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::InvalidNeighbors`] describing the first inconsistency.
    pub fn validate_neighbors(&self) -> Result<(), TdsError> {
        for (key, triangle) in &self.triangles {
            for (slot, neighbor) in triangle.neighbors().iter().enumerate() {
                let Some(neighbor) = *neighbor else {
                    continue;
                };
                let Some(other) = self.triangles.get(neighbor) else {
                    return Err(TdsError::InvalidNeighbors {
                        message: format!("{key:?} slot {slot} links missing triangle {neighbor:?}"),
                    });
                };
                let Some(back) = other.neighbor_index(key) else {
                    return Err(TdsError::InvalidNeighbors {
                        message: format!("link {key:?} → {neighbor:?} is not mutual"),
                    });
                };
                if triangle.edge(slot) != other.edge(back) {
                    return Err(TdsError::InvalidNeighbors {
                        message: format!(
                            "{key:?} slot {slot} and {neighbor:?} slot {back} do not cross the same edge"
                        ),
                    });
                }
            }
        }

        for (edge, incident) in &self.edge_index {
            if let [t1, t2] = incident.as_slice() {
                let linked = self
                    .triangles
                    .get(*t1)
                    .is_some_and(|t| t.neighbor_index(*t2).is_some());
                if !linked {
                    return Err(TdsError::InvalidNeighbors {
                        message: format!("{t1:?} and {t2:?} share {edge:?} but are not linked"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that every triangle is counterclockwise with non-zero area.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::NotCounterclockwise`] for the first offending triangle.
    pub fn validate_orientation(&self) -> Result<(), TdsError> {
        for key in self.triangles.keys() {
            let [a, b, c] = self.triangle_points(key)?;
            let area = signed_area(&a, &b, &c);
            if area.is_nan() || area <= 0.0 {
                return Err(TdsError::NotCounterclockwise { key, area });
            }
        }
        Ok(())
    }

    /// Checks that the edge index matches the stored triangles exactly.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::NonManifoldEdge`] or [`TdsError::EdgeIndexMismatch`].
    pub fn validate_edge_index(&self) -> Result<(), TdsError> {
        let mut expected: FastHashMap<EdgeKey, usize> = FastHashMap::default();
        for (key, triangle) in &self.triangles {
            for edge in triangle.edges() {
                *expected.entry(edge).or_default() += 1;
                let indexed = self
                    .edge_index
                    .get(&edge)
                    .is_some_and(|incident| incident.contains(&key));
                if !indexed {
                    return Err(TdsError::EdgeIndexMismatch {
                        message: format!("{edge:?} of {key:?} is not indexed"),
                    });
                }
            }
        }

        for (edge, incident) in &self.edge_index {
            if incident.len() > 2 {
                return Err(TdsError::NonManifoldEdge {
                    edge: *edge,
                    count: incident.len(),
                });
            }
            if expected.get(edge).copied().unwrap_or_default() != incident.len() {
                return Err(TdsError::EdgeIndexMismatch {
                    message: format!("{edge:?} indexes {} stale triangle(s)", incident.len()),
                });
            }
        }
        Ok(())
    }

    /// Runs every structural check: per-triangle validity, edge index, neighbors and
    /// orientation.
    ///
    /// # Errors
    ///
    /// Returns the first failure found.
    pub fn is_valid(&self) -> Result<(), TdsError> {
        for (key, triangle) in &self.triangles {
            triangle
                .is_valid(Some(key))
                .map_err(|source| TdsError::InvalidTriangle { key, source })?;
        }
        self.validate_edge_index()?;
        self.validate_neighbors()?;
        self.validate_orientation()
    }
}

impl fmt::Display for Tds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Tds: {} vertices, {} triangles",
            self.vertices.len(),
            self.triangles.len()
        )?;
        for (key, vertex) in &self.vertices {
            writeln!(f, "  vertex {key:?}: {vertex}")?;
        }
        for (key, triangle) in &self.triangles {
            writeln!(f, "  triangle {key:?}: {triangle}")?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adjacency::{recompute_neighborhood, remove_neighborhood};

    /// Unit square split along its (1, 0)–(0, 1) diagonal.
    fn square() -> (Tds, [VertexKey; 4], TriangleKey, TriangleKey) {
        let mut tds = Tds::new();
        let v = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
            .into_iter()
            .enumerate()
            .map(|(i, c)| tds.insert_vertex(Point::new(c), VertexKind::Input(i)))
            .collect::<Vec<_>>();
        let v = [v[0], v[1], v[2], v[3]];

        let lower = tds.create_triangle([v[0], v[1], v[2]]).unwrap().unwrap();
        let upper = tds.create_triangle([v[2], v[1], v[3]]).unwrap().unwrap();
        let t1 = tds.add_triangle(lower);
        let t2 = tds.add_triangle(upper);
        recompute_neighborhood(&mut tds, t1).unwrap();
        (tds, v, t1, t2)
    }

    #[test]
    fn add_triangle_indexes_edges() {
        let (tds, v, t1, t2) = square();
        assert_eq!(tds.number_of_triangles(), 2);
        assert_eq!(tds.edges().count(), 5);

        let diagonal = &tds.edge_index[&EdgeKey::new(v[1], v[2])];
        assert_eq!(diagonal.len(), 2);
        assert!(diagonal.contains(&t1) && diagonal.contains(&t2));
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn create_triangle_reports_collinear_and_missing_vertices() {
        let mut tds = Tds::new();
        let a = tds.insert_vertex(Point::new([0.0, 0.0]), VertexKind::Input(0));
        let b = tds.insert_vertex(Point::new([1.0, 1.0]), VertexKind::Input(1));
        let c = tds.insert_vertex(Point::new([2.0, 2.0]), VertexKind::Input(2));
        assert_eq!(tds.create_triangle([a, b, c]), Ok(None));

        let mut other = Tds::new();
        other.insert_vertex(Point::new([0.0, 0.0]), VertexKind::Input(0));
        let stray = other.insert_vertex(Point::new([1.0, 0.0]), VertexKind::Input(1));
        let mut small = Tds::new();
        let only = small.insert_vertex(Point::new([0.0, 0.0]), VertexKind::Input(0));
        assert!(matches!(
            small.create_triangle([only, stray, only]),
            Err(TdsError::VertexNotFound { .. })
        ));
    }

    #[test]
    fn remove_triangle_requires_unlinking() {
        let (mut tds, _, t1, t2) = square();

        assert_eq!(
            tds.remove_triangle(t1),
            Err(TdsError::DanglingNeighbor {
                triangle: t1,
                neighbor: t2
            })
        );

        remove_neighborhood(&mut tds, t1).unwrap();
        let removed = tds.remove_triangle(t1).unwrap();
        assert!(!removed.has_neighbors());
        assert!(!tds.contains_triangle(t1));
        assert_eq!(tds.edges().count(), 3);
        assert!(tds.is_valid().is_ok());

        assert_eq!(
            tds.remove_triangle(t1),
            Err(TdsError::TriangleNotFound { key: t1 })
        );
    }

    #[test]
    fn validate_neighbors_detects_one_sided_link() {
        let (mut tds, _, t1, t2) = square();
        tds.get_triangle_mut(t2).unwrap().clear_neighbors();
        assert!(matches!(
            tds.validate_neighbors(),
            Err(TdsError::InvalidNeighbors { .. })
        ));
        // Restore through the maintainer
        recompute_neighborhood(&mut tds, t1).unwrap();
        assert!(tds.validate_neighbors().is_ok());
    }

    #[test]
    fn validate_neighbors_detects_missing_link_on_shared_edge() {
        let (mut tds, _, t1, t2) = square();
        tds.get_triangle_mut(t1).unwrap().clear_neighbors();
        tds.get_triangle_mut(t2).unwrap().clear_neighbors();
        assert!(matches!(
            tds.validate_neighbors(),
            Err(TdsError::InvalidNeighbors { .. })
        ));
    }

    #[test]
    fn box_corner_count_and_clear() {
        let mut tds = Tds::new();
        let a = tds.insert_vertex(Point::new([0.0, 0.0]), VertexKind::BoxCorner(0));
        let b = tds.insert_vertex(Point::new([4.0, 0.0]), VertexKind::BoxCorner(1));
        let c = tds.insert_vertex(Point::new([1.0, 1.0]), VertexKind::Input(0));
        let t = tds.create_triangle([a, b, c]).unwrap().unwrap();
        let key = tds.add_triangle(t);

        assert_eq!(tds.box_corner_count(key), Ok(2));
        assert_eq!(tds.number_of_input_vertices(), 1);
        assert!(tds.to_string().starts_with("Tds: 3 vertices, 1 triangles"));

        assert_eq!(
            tds.remove_vertex(a),
            Err(TdsError::VertexInUse { key: a, triangle: key })
        );
        tds.remove_triangle(key).unwrap();
        assert_eq!(tds.remove_vertex(a).unwrap().kind(), VertexKind::BoxCorner(0));
        assert_eq!(
            tds.remove_vertex(a),
            Err(TdsError::VertexNotFound { key: a })
        );

        tds.clear();
        assert_eq!(tds.number_of_vertices(), 0);
        assert_eq!(tds.number_of_triangles(), 0);
        assert_eq!(tds.edges().count(), 0);
    }
}
