//! The bounding box that seeds and then leaves the triangulation.
//!
//! Construction starts from a rectangle, far larger than the input cloud, split into two
//! triangles along one diagonal. Every input point lands inside it, so point location
//! always succeeds. Once all points are in, every triangle still touching a box corner
//! is stripped, leaving the triangulation of the input points alone.
//!
//! Corners are numbered like this, and the seed triangles share the `c1–c2` diagonal:
//!
//! ```text
//!   c2 ─────── c3
//!   │ ╲        │
//!   │   ╲      │
//!   │     ╲    │
//!   │       ╲  │
//!   c0 ─────── c1
//! ```
//!
//! The stripper does not scan for corner triangles one by one. It walks the ring they
//! form around the input hull: inside a corner's fan it crosses the edge from the corner
//! to the next fan vertex, and at a triangle spanning two corners it steps over to the
//! next corner's fan. The walk ends when it arrives back where it started.

#![forbid(unsafe_code)]

use crate::core::adjacency::{recompute_neighborhood, remove_neighborhood};
use crate::core::collections::FastHashSet;
use crate::core::triangulation_data_structure::{Tds, TdsError, TriangleKey, VertexKey};
use crate::core::vertex::VertexKind;
use crate::geometry::point::Point;
use crate::geometry::predicates::{Orientation, is_on_segment, orientation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Failures while seeding or stripping the bounding box.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum BoxError {
    /// Box dimensions were not finite and positive.
    #[error("Invalid bounding box: width={width}, height={height}, scale={scale}")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
        /// Requested margin scale.
        scale: f64,
    },
    /// A seed triangle could not be built.
    #[error("Bounding box corners are degenerate")]
    DegenerateSeed,
    /// Corner triangles exist, but none of them can start the ring walk.
    #[error("No triangle with one or two box corners to start the strip walk")]
    NoSeedTriangle,
    /// The walk reached a triangle without the neighbor it needed.
    #[error("Strip walk left the triangulation at {triangle:?} (slot {slot} is empty)")]
    OpenWalk {
        /// Triangle where the walk stopped.
        triangle: TriangleKey,
        /// Neighbor slot that was empty.
        slot: usize,
    },
    /// The walk ran longer than the number of live triangles.
    #[error("Strip walk did not return to its start after {steps} steps")]
    WalkDidNotClose {
        /// Steps taken before giving up.
        steps: usize,
    },
    /// Triangles referencing a corner survived the strip.
    #[error("{remaining} triangle(s) still reference a box corner after stripping")]
    CornerTrianglesRemain {
        /// How many were left.
        remaining: usize,
    },
    /// Underlying data structure failure.
    #[error(transparent)]
    Tds(#[from] TdsError),
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

/// Rectangle enclosing `[0, width] × [0, height]` with a margin on every side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Point,
    max: Point,
}

impl BoundingBox {
    /// Builds the box around `[0, width] × [0, height]`, pushed out on every side by
    /// `scale * max(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::InvalidDimensions`] unless `width`, `height` and `scale` are
    /// finite and positive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::bounding_box::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(8.0, 4.0, 2.0).unwrap();
    /// assert_eq!(bbox.corners()[0].coords(), &[-16.0, -16.0]);
    /// assert_eq!(bbox.corners()[3].coords(), &[24.0, 20.0]);
    /// ```
    pub fn new(width: f64, height: f64, scale: f64) -> Result<Self, BoxError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let margin = scale * width.max(height);
        if !(positive(width) && positive(height) && positive(scale) && margin.is_finite()) {
            return Err(BoxError::InvalidDimensions {
                width,
                height,
                scale,
            });
        }
        Ok(Self {
            min: Point::new([-margin, -margin]),
            max: Point::new([width + margin, height + margin]),
        })
    }

    /// Lower-left corner.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> Point {
        self.min
    }

    /// Upper-right corner.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> Point {
        self.max
    }

    /// The four corners: `(min, min), (max, min), (min, max), (max, max)`.
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new([self.max.x(), self.min.y()]),
            Point::new([self.min.x(), self.max.y()]),
            self.max,
        ]
    }

    /// Inserts the corners and the two seed triangles `(c0, c1, c2)` and
    /// `(c2, c1, c3)`, linked across their shared diagonal.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::DegenerateSeed`] if a seed triangle is degenerate, or a
    /// [`BoxError::Tds`] failure.
    pub fn seed(&self, tds: &mut Tds) -> Result<[TriangleKey; 2], BoxError> {
        let mut corners = [VertexKey::default(); 4];
        for (i, point) in self.corners().into_iter().enumerate() {
            corners[i] = tds.insert_vertex(point, VertexKind::BoxCorner(i));
        }
        let [c0, c1, c2, c3] = corners;

        let lower = tds
            .create_triangle([c0, c1, c2])?
            .ok_or(BoxError::DegenerateSeed)?;
        let upper = tds
            .create_triangle([c2, c1, c3])?
            .ok_or(BoxError::DegenerateSeed)?;
        let keys = [tds.add_triangle(lower), tds.add_triangle(upper)];
        recompute_neighborhood(tds, keys[0])?;

        tracing::debug!(min = %self.min, max = %self.max, "seeded bounding box");
        Ok(keys)
    }
}

// =============================================================================
// CORNERS AT INFINITY
// =============================================================================

/// Empty-circumcircle test for triangle `t` that treats box corners as points at
/// infinity.
///
/// Growing the box about its centre without bound turns the circumcircle of a
/// triangle that touches it into:
///
/// - **no corner**: the cached circumcircle;
/// - **one corner** `c` of the counterclockwise triangle `(u, v, c)`: the open
///   half-plane left of `u → v`, plus the open segment `uv`;
/// - **two corners** `c1`, `c2` and an input vertex `r`: the open half-plane past the
///   line through `r` parallel to `c1c2`, on the side of the midpoint of `c1c2`. On
///   that line only points closer than `r` to the midpoint's projection count;
/// - **three corners**: the whole plane.
///
/// Returns `true` when `p` lies strictly inside.
///
/// # Errors
///
/// Returns a [`TdsError`] if `t` or one of its vertices is missing.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::bounding_box::{BoundingBox, in_circumcircle};
/// use planar_delaunay::core::triangulation_data_structure::Tds;
/// use planar_delaunay::geometry::point::Point;
///
/// let mut tds = Tds::new();
/// let [lower, _] = BoundingBox::new(8.0, 8.0, 1.0).unwrap().seed(&mut tds).unwrap();
/// // Far outside the finite box, still inside the seed once its corners are at infinity
/// assert!(in_circumcircle(&tds, lower, &Point::new([1e9, -1e9])).unwrap());
/// ```
pub fn in_circumcircle(tds: &Tds, t: TriangleKey, p: &Point) -> Result<bool, TdsError> {
    let flags = corner_flags(tds, t)?;
    let points = tds.triangle_points(t)?;

    let inside = match flags.iter().filter(|&&c| c).count() {
        0 => tds
            .get_triangle(t)
            .ok_or(TdsError::TriangleNotFound { key: t })?
            .circumcircle()
            .contains(p),
        1 => {
            let c = flags.iter().position(|&c| c).unwrap_or_default();
            let (u, v) = (points[(c + 1) % 3], points[(c + 2) % 3]);
            match orientation(&u, &v, p) {
                Orientation::COUNTERCLOCKWISE => true,
                Orientation::CLOCKWISE => false,
                Orientation::COLLINEAR => is_on_segment(p, &u, &v) && *p != u && *p != v,
            }
        }
        2 => {
            let r = flags.iter().position(|&c| !c).unwrap_or_default();
            corner_pair_contains(&points[(r + 1) % 3], &points[(r + 2) % 3], &points[r], p)
        }
        _ => true,
    };
    Ok(inside)
}

/// Limit of the circle through corners `c1`, `c2` and input vertex `r`.
///
/// Box sides are axis-aligned, so for adjacent corners one component of `c2 - c1` is an
/// exact zero and both tests reduce to comparing single coordinates.
#[allow(clippy::suboptimal_flops)]
fn corner_pair_contains(c1: &Point, c2: &Point, r: &Point, p: &Point) -> bool {
    let (ex, ey) = (c2.x() - c1.x(), c2.y() - c1.y());
    let mid = Point::new([f64::midpoint(c1.x(), c2.x()), f64::midpoint(c1.y(), c2.y())]);
    let side = |q: &Point| ex * (q.y() - r.y()) - ey * (q.x() - r.x());
    let along = |q: &Point| (ex * (q.x() - mid.x()) + ey * (q.y() - mid.y())).abs();

    let p_side = side(p);
    if p_side == 0.0 {
        along(p) < along(r)
    } else {
        (p_side > 0.0) == (side(&mid) > 0.0)
    }
}

// =============================================================================
// STRIPPING
// =============================================================================

/// Local index of the corner the walk pivots on, given which vertices are corners.
///
/// With one corner that is the corner itself; with two, it is the corner whose cyclic
/// successor is also a corner.
fn pivot_index(is_corner: [bool; 3]) -> Option<usize> {
    match is_corner.iter().filter(|&&c| c).count() {
        1 => is_corner.iter().position(|&c| c),
        2 => (0..3).find(|&i| is_corner[i] && is_corner[(i + 1) % 3]),
        _ => None,
    }
}

fn corner_flags(tds: &Tds, t: TriangleKey) -> Result<[bool; 3], TdsError> {
    let triangle = tds
        .get_triangle(t)
        .ok_or(TdsError::TriangleNotFound { key: t })?;
    let mut flags = [false; 3];
    for (flag, &v) in flags.iter_mut().zip(triangle.vertices()) {
        *flag = tds
            .get_vertex(v)
            .ok_or(TdsError::VertexNotFound { key: v })?
            .is_box_corner();
    }
    Ok(flags)
}

/// Removes every triangle that references a box corner, then the corners themselves,
/// and returns how many triangles were removed.
///
/// With no input vertices the only corner triangles are the two seeds, which are
/// removed directly. Otherwise the ring of corner triangles is walked from a triangle
/// with one corner (or two, when none has exactly one), collected, unlinked and
/// removed.
///
/// # Errors
///
/// Returns a [`BoxError`] when the ring cannot be walked or corner triangles survive.
/// The walk only reads the structure, so on a walk error nothing has been removed.
pub fn strip(tds: &mut Tds) -> Result<usize, BoxError> {
    let mut seed_one = None;
    let mut seed_two = None;
    let mut corner_triangles = Vec::new();
    for t in tds.triangle_keys() {
        let count = corner_flags(tds, t)?.iter().filter(|&&c| c).count();
        if count > 0 {
            corner_triangles.push(t);
        }
        match count {
            1 if seed_one.is_none() => seed_one = Some(t),
            2 if seed_two.is_none() => seed_two = Some(t),
            _ => {}
        }
    }

    let ring = if corner_triangles.is_empty() || tds.number_of_input_vertices() == 0 {
        corner_triangles
    } else {
        let seed = seed_one.or(seed_two).ok_or(BoxError::NoSeedTriangle)?;
        walk_ring(tds, seed)?
    };

    for &t in &ring {
        remove_neighborhood(tds, t)?;
    }
    for &t in &ring {
        tds.remove_triangle(t)?;
    }

    let mut remaining = 0;
    for t in tds.triangle_keys() {
        if corner_flags(tds, t)?.contains(&true) {
            remaining += 1;
        }
    }
    if remaining > 0 {
        return Err(BoxError::CornerTrianglesRemain { remaining });
    }

    let corners: Vec<VertexKey> = tds
        .vertices()
        .filter(|(_, v)| v.is_box_corner())
        .map(|(k, _)| k)
        .collect();
    for corner in corners {
        tds.remove_vertex(corner)?;
    }

    tracing::debug!(
        removed = ring.len(),
        remaining = tds.number_of_triangles(),
        "stripped bounding box"
    );
    Ok(ring.len())
}

fn walk_ring(tds: &Tds, seed: TriangleKey) -> Result<Vec<TriangleKey>, BoxError> {
    let limit = tds.number_of_triangles();
    let mut ring = Vec::new();
    let mut seen: FastHashSet<TriangleKey> = FastHashSet::default();
    let mut current = seed;

    for _ in 0..limit {
        if seen.insert(current) {
            ring.push(current);
        }

        let flags = corner_flags(tds, current)?;
        let Some(s) = pivot_index(flags) else {
            // Walked into a triangle without a usable pivot (no corner or three corners)
            return Err(BoxError::OpenWalk {
                triangle: current,
                slot: 0,
            });
        };
        let slot = (s + 1) % 3;
        let next = tds
            .get_triangle(current)
            .ok_or(TdsError::TriangleNotFound { key: current })?
            .neighbor(slot)
            .ok_or(BoxError::OpenWalk {
                triangle: current,
                slot,
            })?;

        tracing::trace!(?current, ?next, pivot = s, "strip walk step");
        if next == seed {
            return Ok(ring);
        }
        current = next;
    }
    Err(BoxError::WalkDidNotClose { steps: limit })
}

// =============================================================================
// TESTS
// =============================================================================
