//! Canonical undirected edges.
//!
//! Edges are never stored on their own; a triangle's edges are implied by its vertices.
//! [`EdgeKey`] names an edge by its two endpoint [`VertexKey`]s in a canonical order, so
//! `(a, b)` and `(b, a)` hash and compare equal. It keys the edge → triangles index the
//! adjacency maintainer uses and is what
//! [`DelaunayTriangulation::edges`](crate::core::delaunay_triangulation::DelaunayTriangulation::edges)
//! yields.

#![forbid(unsafe_code)]

use crate::core::triangulation_data_structure::VertexKey;
use slotmap::Key;

/// Canonical identifier for an undirected edge.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::edge::EdgeKey;
/// use planar_delaunay::core::triangulation_data_structure::VertexKey;
/// use slotmap::KeyData;
///
/// let a = VertexKey::from(KeyData::from_ffi(1));
/// let b = VertexKey::from(KeyData::from_ffi(2));
/// assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
/// assert_eq!(EdgeKey::new(b, a).endpoints(), (a, b));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    v0: VertexKey,
    v1: VertexKey,
}

impl EdgeKey {
    /// Creates the canonical key for the edge between `a` and `b`.
    ///
    /// Endpoints are ordered by their raw slotmap representation.
    #[must_use]
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        if a.data().as_ffi() <= b.data().as_ffi() {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// Both endpoints, in canonical order.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (VertexKey, VertexKey) {
        (self.v0, self.v1)
    }

    /// Returns `true` when `v` is one of the endpoints.
    #[inline]
    #[must_use]
    pub fn contains(self, v: VertexKey) -> bool {
        self.v0 == v || self.v1 == v
    }
}
