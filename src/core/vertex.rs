//! Vertices stored in the triangulation.
//!
//! A [`Vertex`] pairs a [`Point`] with its [`VertexKind`]: either an input point
//! (remembering its position in the caller's slice) or one of the four bounding box
//! corners. Box corners are recognized by this tag, never by comparing coordinates.
//!
//! # Examples
//!
//! ```rust
//! use planar_delaunay::core::vertex::{Vertex, VertexKind};
//! use planar_delaunay::geometry::point::Point;
//!
//! let v = Vertex::new(Point::new([1.0, 2.0]), VertexKind::Input(7));
//! assert!(v.is_input());
//! assert_eq!(v.input_index(), Some(7));
//!
//! let corner = Vertex::new(Point::new([-10.0, -10.0]), VertexKind::BoxCorner(0));
//! assert!(corner.is_box_corner());
//! assert_eq!(corner.input_index(), None);
//! ```

#![forbid(unsafe_code)]

use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a vertex came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// An input point, carrying its index in the caller's point slice.
    Input(usize),
    /// A bounding box corner, numbered `0..4` in the order
    /// `(min, min), (max, min), (min, max), (max, max)`.
    BoxCorner(usize),
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(i) => write!(f, "input #{i}"),
            Self::BoxCorner(c) => write!(f, "box corner #{c}"),
        }
    }
}

/// A vertex of the triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    point: Point,
    kind: VertexKind,
}

impl Vertex {
    /// Creates a vertex at `point` with the given origin.
    #[inline]
    #[must_use]
    pub const fn new(point: Point, kind: VertexKind) -> Self {
        Self { point, kind }
    }

    /// The vertex position.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// Where the vertex came from.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> VertexKind {
        self.kind
    }

    /// Returns `true` for input points.
    #[inline]
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self.kind, VertexKind::Input(_))
    }

    /// Returns `true` for bounding box corners.
    #[inline]
    #[must_use]
    pub const fn is_box_corner(&self) -> bool {
        matches!(self.kind, VertexKind::BoxCorner(_))
    }

    /// Position of the point in the caller's input slice, if this is an input vertex.
    #[inline]
    #[must_use]
    pub const fn input_index(&self) -> Option<usize> {
        match self.kind {
            VertexKind::Input(i) => Some(i),
            VertexKind::BoxCorner(_) => None,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.point, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_kind_queries() {
        let input = Vertex::new(Point::new([0.5, 0.5]), VertexKind::Input(3));
        let corner = Vertex::new(Point::new([9.0, 9.0]), VertexKind::BoxCorner(3));

        assert!(input.is_input());
        assert!(!input.is_box_corner());
        assert_eq!(input.input_index(), Some(3));
        assert_eq!(input.point(), &Point::new([0.5, 0.5]));

        assert!(corner.is_box_corner());
        assert_eq!(corner.kind(), VertexKind::BoxCorner(3));
        assert_eq!(corner.input_index(), None);
    }

    #[test]
    fn vertex_display() {
        let v = Vertex::new(Point::new([1.0, 2.0]), VertexKind::Input(0));
        assert_eq!(v.to_string(), "(1.000000, 2.000000) [input #0]");
        assert_eq!(VertexKind::BoxCorner(2).to_string(), "box corner #2");
    }
}
