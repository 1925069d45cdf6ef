//! # planar-delaunay
//!
//! This is a library for computing the Delaunay triangulation of a set of points in the
//! plane by incremental insertion with edge-flip legalization.
//!
//! # Features
//!
//! - Planar Delaunay triangulations of points inside a `width × height` canvas
//! - Stable slotmap keys for vertices and triangles, with mutual neighbor links
//! - Boundary-inclusive point location, edge splits for points landing on an edge
//! - Structural and empty-circumcircle validation
//! - Serialization/Deserialization of points, options and statistics with
//!   [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use planar_delaunay::prelude::*;
//!
//! let points = vec![
//!     Point::new([1.0, 1.0]),
//!     Point::new([7.0, 1.0]),
//!     Point::new([4.0, 6.0]),
//!     Point::new([4.0, 3.0]),
//! ];
//!
//! let dt = DelaunayTriangulation::new(&points, 8.0, 8.0).unwrap();
//!
//! assert_eq!(dt.number_of_vertices(), 4);
//! assert_eq!(dt.number_of_triangles(), 3);
//! assert!(dt.is_valid().is_ok());
//! assert!(dt.validate_delaunay().is_ok());
//! ```
//!
//! # Algorithm
//!
//! Construction seeds two triangles covering a box far larger than the canvas, then
//! inserts the input points in order:
//!
//! 1. [`locate`](core::algorithms::locate::locate) finds a triangle containing the point,
//!    boundary inclusive;
//! 2. [`split_triangle`](core::algorithms::incremental_insertion::split_triangle) replaces
//!    it by three triangles, or splits both triangles on an edge into four;
//! 3. [`legalize`](core::algorithms::flips::legalize) flips every edge whose far vertex
//!    lies strictly inside the circumcircle of the triangle across from the new point.
//!
//! Finally [`strip`](core::bounding_box::strip) walks the ring of triangles that still
//! touch a box corner and removes them.
//!
//! # Invariants
//!
//! After every operation that modifies the structure:
//!
//! - every triangle is counterclockwise with non-zero area,
//! - neighbor links are mutual and cross a shared edge,
//! - no edge belongs to more than two triangles.
//!
//! After construction every triangle passes the empty-circumcircle test against every
//! input point within [`DEFAULT_DELAUNAY_EPSILON`](core::util::DEFAULT_DELAUNAY_EPSILON)
//! (configurable through
//! [`ConstructionOptions`](core::delaunay_triangulation::ConstructionOptions)).
//!
//! # Degenerate input
//!
//! Fewer than three points, or points that are all collinear, yield an empty triangle
//! set. Four co-circular points are split along whichever diagonal insertion order
//! produces; both choices are Delaunay.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the triangulation data structure and the algorithms that
/// build it.
///
/// It includes the `Tds` struct, which stores vertices and triangles, the adjacency
/// maintainer, the bounding box and the [`DelaunayTriangulation`](core::DelaunayTriangulation)
/// entry point.
pub mod core {
    /// Triangulation algorithms for construction and querying
    pub mod algorithms {
        /// Edge-flip legalization
        pub mod flips;
        /// Locate, split, legalize
        pub mod incremental_insertion;
        /// Point location
        pub mod locate;
    }
    pub mod adjacency;
    pub mod bounding_box;
    /// High-performance collection types
    pub mod collections;
    /// Delaunay triangulation entry point
    pub mod delaunay_triangulation;
    pub mod edge;
    pub mod triangle;
    pub mod triangulation_data_structure;
    pub mod util;
    pub mod vertex;

    pub use delaunay_triangulation::*;
    pub use edge::*;
    pub use triangle::*;
    pub use triangulation_data_structure::*;
    pub use util::*;
    pub use vertex::*;
    // Note: collections module not re-exported here to avoid namespace pollution
    // Import specific types via prelude or use crate::core::collections::
}

/// Contains geometric types including the `Point` struct and geometry predicates.
pub mod geometry {
    pub mod point;
    /// Orientation, containment and circumcircle predicates
    pub mod predicates;
    /// Point cloud generation
    pub mod util;

    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::{
            flips::FlipError,
            incremental_insertion::{InsertionError, InsertionStatistics},
            locate::LocateError,
        },
        bounding_box::{BoundingBox, BoxError},
        delaunay_triangulation::*,
        edge::*,
        triangle::*,
        triangulation_data_structure::*,
        util::*,
        vertex::*,
    };

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{FastHashMap, FastHashSet, SmallBuffer};

    // Re-export from geometry
    pub use crate::geometry::{point::*, predicates::*, util::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            delaunay_triangulation::DelaunayTriangulation, edge::EdgeKey, triangle::Triangle,
            triangulation_data_structure::Tds, vertex::Vertex,
        },
        geometry::{Circumcircle, Point},
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<Circumcircle>());
        assert!(is_normal::<Vertex>());
        assert!(is_normal::<EdgeKey>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<Tds>());
        assert!(is_normal::<DelaunayTriangulation>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let mut map: FastHashMap<u64, usize> = FastHashMap::default();
        map.insert(123, 456);
        assert_eq!(map.get(&123), Some(&456));

        let mut set: FastHashSet<u64> = FastHashSet::default();
        set.insert(789);
        assert!(set.contains(&789));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);

        let points = generate_random_points_seeded(20, 8.0, 8.0, 1).unwrap();
        let dt = DelaunayTriangulation::new(&points, 8.0, 8.0).unwrap();
        assert!(dt.number_of_triangles() > 0);
        assert_eq!(orientation(&points[0], &points[0], &points[1]), Orientation::COLLINEAR);
    }
}
