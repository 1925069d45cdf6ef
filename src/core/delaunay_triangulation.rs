//! Delaunay triangulation of a planar point cloud.
//!
//! [`DelaunayTriangulation`] is the entry point of the crate. Construction runs the whole
//! pipeline in one call:
//!
//! 1. validate the options and every input point,
//! 2. seed a bounding box far larger than the `width × height` canvas
//!    ([`BoundingBox`]),
//! 3. insert the points one at a time, in input order
//!    ([`insert_vertex`]),
//! 4. strip every triangle that still touches a box corner ([`strip`]),
//! 5. optionally check the structure and the empty-circumcircle property.
//!
//! The result only contains triangles whose three corners are input points. Inputs
//! that are all collinear, or fewer than three, produce an empty triangle set.
//!
//! # Examples
//!
//! ```rust
//! use planar_delaunay::core::delaunay_triangulation::DelaunayTriangulation;
//! use planar_delaunay::geometry::point::Point;
//!
//! let points = [
//!     Point::new([1.0, 1.0]),
//!     Point::new([7.0, 1.0]),
//!     Point::new([7.0, 7.0]),
//!     Point::new([1.0, 7.0]),
//! ];
//! let dt = DelaunayTriangulation::new(&points, 8.0, 8.0).unwrap();
//!
//! assert_eq!(dt.number_of_vertices(), 4);
//! assert_eq!(dt.number_of_triangles(), 2);
//! assert!(dt.validate_delaunay().is_ok());
//! ```

#![forbid(unsafe_code)]

use crate::core::algorithms::incremental_insertion::{
    InsertionError, InsertionStatistics, insert_vertex,
};
use crate::core::bounding_box::{BoundingBox, BoxError, strip};
use crate::core::collections::FastHashMap;
use crate::core::edge::EdgeKey;
use crate::core::triangle::Triangle;
use crate::core::triangulation_data_structure::{Tds, TdsError, TriangleKey, VertexKey};
use crate::core::util::{DEFAULT_DELAUNAY_EPSILON, DelaunayValidationError, validate_delaunay};
use crate::core::vertex::VertexKind;
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default multiple of the canvas size used as the bounding box margin.
pub const DEFAULT_BOUNDING_BOX_SCALE: f64 = 1e6;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building a [`DelaunayTriangulation`].
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum TriangulationConstructionError {
    /// The construction options are unusable.
    #[error("Invalid construction options: {message}")]
    InvalidOptions {
        /// Which option was rejected and why.
        message: String,
    },
    /// The canvas is empty or not finite.
    #[error("Invalid canvas: width={width}, height={height}")]
    InvalidDimensions {
        /// Canvas width.
        width: f64,
        /// Canvas height.
        height: f64,
    },
    /// An input point has a NaN or infinite coordinate.
    #[error("Point #{index} {point:?} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position in the input slice.
        index: usize,
        /// The offending point.
        point: Point,
    },
    /// An input point lies outside `[0, width] × [0, height]`.
    #[error("Point #{index} {point} lies outside [0, {width}] × [0, {height}]")]
    PointOutOfBounds {
        /// Position in the input slice.
        index: usize,
        /// The offending point.
        point: Point,
        /// Canvas width.
        width: f64,
        /// Canvas height.
        height: f64,
    },
    /// Two input points have the same coordinates.
    #[error("Points #{first} and #{duplicate} share the coordinates {point}")]
    DuplicateCoordinates {
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        duplicate: usize,
        /// The shared coordinates.
        point: Point,
    },
    /// Seeding or stripping the bounding box failed.
    #[error("Bounding box error: {0}")]
    BoundingBox(#[from] BoxError),
    /// Inserting one of the input points failed.
    #[error("Failed to insert point #{index}: {source}")]
    Insertion {
        /// Position of the point in the input slice.
        index: usize,
        /// The underlying insertion error.
        source: InsertionError,
    },
    /// The finished triangulation is structurally inconsistent.
    #[error("Structural validation failed: {0}")]
    Tds(#[from] TdsError),
    /// The finished triangulation is not Delaunay.
    #[error("Delaunay validation failed: {0}")]
    DelaunayValidation(#[from] DelaunayValidationError),
}

// =============================================================================
// OPTIONS AND STATISTICS
// =============================================================================

/// Knobs for [`DelaunayTriangulation::with_options`].
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::delaunay_triangulation::{
///     ConstructionOptions, ConstructionOptionsBuilder,
/// };
///
/// let options = ConstructionOptionsBuilder::default()
///     .delaunay_epsilon(1e-6)
///     .validate(false)
///     .build()
///     .unwrap();
/// assert_eq!(options.delaunay_epsilon, 1e-6);
/// assert_eq!(options.bounding_box_scale, ConstructionOptions::default().bounding_box_scale);
///
/// assert!(ConstructionOptionsBuilder::default().bounding_box_scale(0.0).build().is_err());
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::check"))]
#[serde(default)]
pub struct ConstructionOptions {
    /// Tolerance of the empty-circumcircle check: a vertex violates a triangle only
    /// when it lies more than this far inside the circumcircle.
    pub delaunay_epsilon: f64,
    /// Bounding box margin as a multiple of `max(width, height)`.
    pub bounding_box_scale: f64,
    /// Check structure and Delaunay property after construction.
    pub validate: bool,
}

impl Default for ConstructionOptions {
    fn default() -> Self {
        Self {
            delaunay_epsilon: DEFAULT_DELAUNAY_EPSILON,
            bounding_box_scale: DEFAULT_BOUNDING_BOX_SCALE,
            validate: true,
        }
    }
}

fn check_options(epsilon: f64, scale: f64) -> Result<(), String> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(format!(
            "delaunay_epsilon must be finite and non-negative, got {epsilon}"
        ));
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!(
            "bounding_box_scale must be finite and positive, got {scale}"
        ));
    }
    Ok(())
}

impl ConstructionOptionsBuilder {
    fn check(&self) -> Result<(), String> {
        check_options(
            self.delaunay_epsilon.unwrap_or(DEFAULT_DELAUNAY_EPSILON),
            self.bounding_box_scale.unwrap_or(DEFAULT_BOUNDING_BOX_SCALE),
        )
    }
}

impl ConstructionOptions {
    /// Checks option values that may have bypassed the builder (struct literals or
    /// deserialization).
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationConstructionError::InvalidOptions`] for a negative or
    /// non-finite epsilon, or a non-positive or non-finite box scale.
    pub fn validate_options(&self) -> Result<(), TriangulationConstructionError> {
        check_options(self.delaunay_epsilon, self.bounding_box_scale)
            .map_err(|message| TriangulationConstructionError::InvalidOptions { message })
    }
}

/// Counters gathered while building a triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionStatistics {
    /// Totals over every point insertion.
    pub insertion: InsertionStatistics,
    /// Triangles removed when the bounding box was stripped.
    pub box_triangles_removed: usize,
}

// =============================================================================
// DELAUNAY TRIANGULATION
// =============================================================================

/// A finished Delaunay triangulation of a set of input points.
#[derive(Clone, Debug)]
pub struct DelaunayTriangulation {
    tds: Tds,
    statistics: ConstructionStatistics,
    options: ConstructionOptions,
}

/// Builds the Delaunay triangulation of `points` inside `[0, width] × [0, height]`
/// with default options.
///
/// Shorthand for [`DelaunayTriangulation::new`].
///
/// # Errors
///
/// See [`DelaunayTriangulation::with_options`].
pub fn build_triangulation(
    points: &[Point],
    width: f64,
    height: f64,
) -> Result<DelaunayTriangulation, TriangulationConstructionError> {
    DelaunayTriangulation::new(points, width, height)
}

/// Coordinates identity of a finite point, with `-0.0` folded into `0.0`.
fn coordinate_identity(point: &Point) -> [u64; 2] {
    let canonical = |c: f64| if c == 0.0 { 0.0_f64.to_bits() } else { c.to_bits() };
    [canonical(point.x()), canonical(point.y())]
}

fn check_inputs(
    points: &[Point],
    width: f64,
    height: f64,
) -> Result<(), TriangulationConstructionError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(width) || !positive(height) {
        return Err(TriangulationConstructionError::InvalidDimensions { width, height });
    }

    let mut seen: FastHashMap<[u64; 2], usize> = FastHashMap::default();
    seen.reserve(points.len());
    for (index, point) in points.iter().enumerate() {
        if !point.is_finite() {
            return Err(TriangulationConstructionError::NonFiniteCoordinate {
                index,
                point: *point,
            });
        }
        if !(0.0..=width).contains(&point.x()) || !(0.0..=height).contains(&point.y()) {
            return Err(TriangulationConstructionError::PointOutOfBounds {
                index,
                point: *point,
                width,
                height,
            });
        }
        if let Some(&first) = seen.get(&coordinate_identity(point)) {
            return Err(TriangulationConstructionError::DuplicateCoordinates {
                first,
                duplicate: index,
                point: *point,
            });
        }
        seen.insert(coordinate_identity(point), index);
    }
    Ok(())
}

impl DelaunayTriangulation {
    /// Builds the Delaunay triangulation of `points` inside `[0, width] × [0, height]`
    /// with [`ConstructionOptions::default`].
    ///
    /// # Errors
    ///
    /// See [`with_options`](Self::with_options).
    pub fn new(
        points: &[Point],
        width: f64,
        height: f64,
    ) -> Result<Self, TriangulationConstructionError> {
        Self::with_options(points, width, height, ConstructionOptions::default())
    }

    /// Builds the Delaunay triangulation of `points` inside `[0, width] × [0, height]`.
    ///
    /// Points are inserted in input order; the same input always yields the same
    /// triangles, keys and statistics.
    ///
    /// # Errors
    ///
    /// - [`TriangulationConstructionError::InvalidOptions`] for unusable options.
    /// - [`TriangulationConstructionError::InvalidDimensions`],
    ///   [`NonFiniteCoordinate`](TriangulationConstructionError::NonFiniteCoordinate),
    ///   [`PointOutOfBounds`](TriangulationConstructionError::PointOutOfBounds) or
    ///   [`DuplicateCoordinates`](TriangulationConstructionError::DuplicateCoordinates)
    ///   for bad input. Nothing is built in that case.
    /// - [`TriangulationConstructionError::Insertion`] or
    ///   [`BoundingBox`](TriangulationConstructionError::BoundingBox) if the
    ///   construction itself breaks down. The partial structure is logged at `error`
    ///   level.
    /// - [`TriangulationConstructionError::Tds`] or
    ///   [`DelaunayValidation`](TriangulationConstructionError::DelaunayValidation) if
    ///   `options.validate` is set and the result fails a check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::delaunay_triangulation::{
    ///     ConstructionOptionsBuilder, DelaunayTriangulation, TriangulationConstructionError,
    /// };
    /// use planar_delaunay::geometry::point::Point;
    ///
    /// let options = ConstructionOptionsBuilder::default()
    ///     .bounding_box_scale(100.0)
    ///     .build()
    ///     .unwrap();
    /// let points = [Point::new([0.0, 0.0]), Point::new([4.0, 0.0]), Point::new([0.0, 4.0])];
    /// let dt = DelaunayTriangulation::with_options(&points, 8.0, 8.0, options).unwrap();
    /// assert_eq!(dt.number_of_triangles(), 1);
    ///
    /// let outside = [Point::new([9.0, 1.0])];
    /// assert!(matches!(
    ///     DelaunayTriangulation::with_options(&outside, 8.0, 8.0, options),
    ///     Err(TriangulationConstructionError::PointOutOfBounds { index: 0, .. })
    /// ));
    /// ```
    pub fn with_options(
        points: &[Point],
        width: f64,
        height: f64,
        options: ConstructionOptions,
    ) -> Result<Self, TriangulationConstructionError> {
        options.validate_options()?;
        check_inputs(points, width, height)?;

        let mut tds = Tds::new();
        BoundingBox::new(width, height, options.bounding_box_scale)?.seed(&mut tds)?;

        let mut insertion = InsertionStatistics::default();
        for (index, point) in points.iter().enumerate() {
            let vertex = tds.insert_vertex(*point, VertexKind::Input(index));
            match insert_vertex(&mut tds, vertex) {
                Ok(stats) => insertion += stats,
                Err(source) => {
                    tracing::error!(
                        index,
                        %point,
                        error = %source,
                        "point insertion failed; partial triangulation:\n{tds}"
                    );
                    return Err(TriangulationConstructionError::Insertion { index, source });
                }
            }
        }

        let box_triangles_removed = match strip(&mut tds) {
            Ok(removed) => removed,
            Err(err) => {
                tracing::error!(error = %err, "bounding box strip failed:\n{tds}");
                return Err(err.into());
            }
        };

        let triangulation = Self {
            tds,
            statistics: ConstructionStatistics {
                insertion,
                box_triangles_removed,
            },
            options,
        };

        if options.validate {
            triangulation.is_valid()?;
            triangulation.validate_delaunay()?;
        }

        tracing::debug!(
            vertices = triangulation.number_of_vertices(),
            triangles = triangulation.number_of_triangles(),
            flips = insertion.flips,
            edge_splits = insertion.edge_splits,
            box_triangles_removed,
            "built Delaunay triangulation"
        );
        Ok(triangulation)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Iterates over the triangles with their keys.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.tds.triangles()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.tds.number_of_triangles()
    }

    /// Number of vertices (the input points).
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.tds.number_of_vertices()
    }

    /// Position of a vertex, if the key is known.
    #[must_use]
    pub fn vertex_point(&self, key: VertexKey) -> Option<Point> {
        self.tds.get_vertex(key).map(|v| *v.point())
    }

    /// Position of a vertex in the input slice, if the key is known.
    #[must_use]
    pub fn input_index(&self, key: VertexKey) -> Option<usize> {
        self.tds.get_vertex(key).and_then(|v| v.input_index())
    }

    /// Corner positions of a triangle in counterclockwise order.
    #[must_use]
    pub fn triangle_points(&self, key: TriangleKey) -> Option<[Point; 3]> {
        self.tds.triangle_points(key).ok()
    }

    /// Every triangle as three `[x, y]` corners in counterclockwise order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::delaunay_triangulation::DelaunayTriangulation;
    /// use planar_delaunay::geometry::point::Point;
    ///
    /// let points = [Point::new([0.0, 0.0]), Point::new([0.0, 4.0]), Point::new([4.0, 0.0])];
    /// let dt = DelaunayTriangulation::new(&points, 8.0, 8.0).unwrap();
    /// let coords = dt.triangle_coordinates();
    /// assert_eq!(coords.len(), 1);
    /// for corner in [[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]] {
    ///     assert!(coords[0].contains(&corner));
    /// }
    /// ```
    #[must_use]
    pub fn triangle_coordinates(&self) -> Vec<[[f64; 2]; 3]> {
        self.tds
            .triangle_keys()
            .filter_map(|key| self.tds.triangle_points(key).ok())
            .map(|points| points.map(|p| *p.coords()))
            .collect()
    }

    /// Every distinct edge.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.tds.edges()
    }

    /// Counters gathered during construction.
    #[inline]
    #[must_use]
    pub const fn statistics(&self) -> &ConstructionStatistics {
        &self.statistics
    }

    /// The options the triangulation was built with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &ConstructionOptions {
        &self.options
    }

    /// Checks the structural invariants of the underlying data structure.
    ///
    /// # Errors
    ///
    /// Returns the first [`TdsError`] found.
    pub fn is_valid(&self) -> Result<(), TdsError> {
        self.tds.is_valid()
    }

    /// Checks the empty-circumcircle property with the configured tolerance.
    ///
    /// # Errors
    ///
    /// Returns a [`DelaunayValidationError`] describing the first violation.
    pub fn validate_delaunay(&self) -> Result<(), DelaunayValidationError> {
        validate_delaunay(&self.tds, self.options.delaunay_epsilon)
    }

    /// The underlying data structure.
    #[inline]
    #[must_use]
    pub const fn tds(&self) -> &Tds {
        &self.tds
    }

    /// Consumes the triangulation and returns the underlying data structure.
    #[must_use]
    pub fn into_tds(self) -> Tds {
        self.tds
    }

    /// Drops every vertex and triangle and resets the statistics.
    pub fn clear(&mut self) {
        self.tds.clear();
        self.statistics = ConstructionStatistics::default();
    }
}

impl fmt::Display for DelaunayTriangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tds)
    }
}

// =============================================================================
// TESTS
// =============================================================================
