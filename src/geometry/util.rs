//! Geometric utility functions.
//!
//! Currently this is reproducible point cloud generation for tests, benchmarks and
//! demos (see [`point_generation`]).

use thiserror::Error;

pub mod point_generation;

pub use point_generation::*;

/// Errors that can occur while generating point clouds.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::util::RandomPointGenerationError;
///
/// let err = RandomPointGenerationError::InvalidRange {
///     width: -1.0,
///     height: 2.0,
/// };
/// assert!(err.to_string().contains("width=-1"));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum RandomPointGenerationError {
    /// The sampling rectangle is empty or not finite.
    #[error("Invalid sampling rectangle: width={width}, height={height}")]
    InvalidRange {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The integer lattice inside the margins has too few points.
    #[error("Requested {requested} distinct points but only {available} lattice points are available")]
    InsufficientLatticePoints {
        /// Number of points requested.
        requested: usize,
        /// Number of distinct lattice points available.
        available: u64,
    },
    /// Rejection sampling kept drawing duplicates.
    #[error("Gave up after {attempts} draws with only {generated} distinct points")]
    RandomGenerationFailed {
        /// Draws made.
        attempts: usize,
        /// Distinct points obtained.
        generated: usize,
    },
}
