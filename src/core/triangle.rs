//! Triangles of the planar triangulation.
//!
//! A [`Triangle`] holds three [`VertexKey`]s in counterclockwise order, one neighbor slot
//! per edge and its circumcircle, computed once when the triangle is built. Neighbor
//! slot `i` is the triangle across the edge *opposite* vertex `i`:
//!
//! ```text
//!            v2
//!           /  \
//!   n1 →   /    \   ← n0
//!         /      \
//!       v0 ------ v1
//!            ↑
//!            n2
//! ```
//!
//! Triangles only ever come from [`Triangle::from_points`], which refuses collinear
//! input, so every stored triangle has non-zero area.

#![forbid(unsafe_code)]

use crate::core::edge::EdgeKey;
use crate::core::triangulation_data_structure::{TriangleKey, VertexKey};
use crate::geometry::point::Point;
use crate::geometry::predicates::{Circumcircle, circumcircle, signed_area};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Structural problems detected on a single triangle.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::triangle::TriangleValidationError;
///
/// let err = TriangleValidationError::DuplicateVertices;
/// assert!(matches!(err, TriangleValidationError::DuplicateVertices));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangleValidationError {
    /// The same vertex key appears more than once.
    #[error("Duplicate vertices: triangle contains non-unique vertices")]
    DuplicateVertices,
    /// A neighbor slot points back at the triangle itself.
    #[error("Triangle lists itself as its neighbor in slot {slot}")]
    SelfNeighbor {
        /// The offending neighbor slot.
        slot: usize,
    },
}

// =============================================================================
// TRIANGLE
// =============================================================================

/// A counterclockwise triangle with neighbor links and a cached circumcircle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    vertices: [VertexKey; 3],
    neighbors: [Option<TriangleKey>; 3],
    circumcircle: Circumcircle,
}

impl Triangle {
    /// Builds a triangle from three vertex keys and their positions.
    ///
    /// Returns `None` when the points are collinear. Otherwise `keys[0]` stays at
    /// index 0 and the other two are swapped if needed so the stored order is
    /// counterclockwise. Neighbor slots start empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::triangle::Triangle;
    /// use planar_delaunay::core::triangulation_data_structure::VertexKey;
    /// use planar_delaunay::geometry::point::Point;
    /// use slotmap::KeyData;
    ///
    /// let keys = [1, 2, 3].map(|i| VertexKey::from(KeyData::from_ffi(i)));
    /// let cw = [
    ///     Point::new([0.0, 0.0]),
    ///     Point::new([0.0, 4.0]),
    ///     Point::new([4.0, 0.0]),
    /// ];
    /// let t = Triangle::from_points(keys, cw).unwrap();
    /// assert_eq!(t.vertices(), &[keys[0], keys[2], keys[1]]);
    ///
    /// let collinear = [
    ///     Point::new([0.0, 0.0]),
    ///     Point::new([1.0, 1.0]),
    ///     Point::new([2.0, 2.0]),
    /// ];
    /// assert!(Triangle::from_points(keys, collinear).is_none());
    /// ```
    #[must_use]
    pub fn from_points(keys: [VertexKey; 3], points: [Point; 3]) -> Option<Self> {
        let [k0, mut k1, mut k2] = keys;
        let [p0, mut p1, mut p2] = points;

        let area = signed_area(&p0, &p1, &p2);
        if area == 0.0 || area.is_nan() {
            return None;
        }
        if area < 0.0 {
            std::mem::swap(&mut k1, &mut k2);
            std::mem::swap(&mut p1, &mut p2);
        }

        let circumcircle = circumcircle(&p0, &p1, &p2)?;
        Some(Self {
            vertices: [k0, k1, k2],
            neighbors: [None; 3],
            circumcircle,
        })
    }

    /// The three vertex keys, counterclockwise.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[VertexKey; 3] {
        &self.vertices
    }

    /// Vertex key at local index `i` (taken modulo 3).
    #[inline]
    #[must_use]
    pub const fn vertex(&self, i: usize) -> VertexKey {
        self.vertices[i % 3]
    }

    /// The three neighbor slots; slot `i` is across the edge opposite vertex `i`.
    #[inline]
    #[must_use]
    pub const fn neighbors(&self) -> &[Option<TriangleKey>; 3] {
        &self.neighbors
    }

    /// Neighbor across the edge opposite vertex `i` (taken modulo 3).
    #[inline]
    #[must_use]
    pub const fn neighbor(&self, i: usize) -> Option<TriangleKey> {
        self.neighbors[i % 3]
    }

    /// The circumcircle computed when the triangle was built.
    #[inline]
    #[must_use]
    pub const fn circumcircle(&self) -> &Circumcircle {
        &self.circumcircle
    }

    /// Returns `true` when `v` is one of the three vertices.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, v: VertexKey) -> bool {
        self.vertices.contains(&v)
    }

    /// Local index of vertex `v`.
    #[inline]
    #[must_use]
    pub fn vertex_index(&self, v: VertexKey) -> Option<usize> {
        self.vertices.iter().position(|&k| k == v)
    }

    /// Slot in which `t` is recorded as a neighbor.
    #[inline]
    #[must_use]
    pub fn neighbor_index(&self, t: TriangleKey) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == Some(t))
    }

    /// The edge opposite vertex `i` (taken modulo 3).
    #[inline]
    #[must_use]
    pub fn edge(&self, i: usize) -> EdgeKey {
        EdgeKey::new(self.vertex(i + 1), self.vertex(i + 2))
    }

    /// The three edges, indexed like the neighbor slots.
    #[must_use]
    pub fn edges(&self) -> [EdgeKey; 3] {
        [self.edge(0), self.edge(1), self.edge(2)]
    }

    /// Returns `true` when at least one neighbor slot is filled.
    #[inline]
    #[must_use]
    pub fn has_neighbors(&self) -> bool {
        self.neighbors.iter().any(Option::is_some)
    }

    pub(crate) const fn set_neighbor(&mut self, slot: usize, neighbor: Option<TriangleKey>) {
        self.neighbors[slot % 3] = neighbor;
    }

    pub(crate) const fn clear_neighbors(&mut self) {
        self.neighbors = [None; 3];
    }

    /// Checks the triangle's own structure: distinct vertices and no self-links.
    ///
    /// # Errors
    ///
    /// Returns a [`TriangleValidationError`] describing the first problem found.
    pub fn is_valid(&self, own_key: Option<TriangleKey>) -> Result<(), TriangleValidationError> {
        let [a, b, c] = self.vertices;
        if a == b || b == c || a == c {
            return Err(TriangleValidationError::DuplicateVertices);
        }
        if let Some(key) = own_key
            && let Some(slot) = self.neighbor_index(key)
        {
            return Err(TriangleValidationError::SelfNeighbor { slot });
        }
        Ok(())
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}, {:?}, {:?}] neighbors {:?} circumcircle {} r={:.6}",
            self.vertices[0],
            self.vertices[1],
            self.vertices[2],
            self.neighbors,
            self.circumcircle.center,
            self.circumcircle.radius
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
