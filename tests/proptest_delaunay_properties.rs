//! Property-based tests for `DelaunayTriangulation` invariants.
//!
//! ## Invariants Tested
//!
//! - **Empty circumcircle** - no input point lies strictly inside any triangle's
//!   circumcircle (within the default tolerance)
//! - **Structural validity** - mutual neighbor links, consistent edge index
//! - **Orientation** - every triangle is counterclockwise with non-zero area
//! - **Tiling** - triangle areas add up to the area of the convex hull
//! - **Triangle count** - `T = 2n - 2 - h`, with `h` counted from an independently
//!   computed hull
//! - **Determinism** - the same input yields the same triangles
//!
//! Integer clouds exercise points landing exactly on edges and co-circular
//! quadruples; float clouds exercise the general position case; thin clouds put
//! every point on two nearly coincident lines, so the hull is lined with slivers.

use approx::assert_relative_eq;
use planar_delaunay::core::collections::FastHashSet;
use planar_delaunay::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

const CANVAS: f64 = 100.0;

/// Strategy for duplicate-free float clouds inside the canvas.
fn float_cloud() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(prop::array::uniform2(0.0..CANVAS), 0..40).prop_map(dedup)
}

/// Strategy for duplicate-free integer clouds on a small lattice, which is dense
/// enough to produce many collinear and co-circular configurations.
fn lattice_cloud() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(prop::array::uniform2(0_u8..=20), 0..60).prop_map(|coords| {
        dedup(
            coords
                .into_iter()
                .map(|[x, y]| [f64::from(x), f64::from(y)])
                .collect(),
        )
    })
}

/// Strategy for clouds on two rows `y = 50` and `y = 50 + gap`, with integer `x`.
fn thin_cloud() -> impl Strategy<Value = Vec<Point>> {
    let gap = prop_oneof![Just(1e-1), Just(1e-2), Just(1e-3)];
    (
        gap,
        prop::collection::vec((0_u8..=100, any::<bool>()), 0..40),
    )
        .prop_map(|(gap, coords)| {
            dedup(
                coords
                    .into_iter()
                    .map(|(x, upper)| [f64::from(x), if upper { 50.0 + gap } else { 50.0 }])
                    .collect(),
            )
        })
}

fn dedup(coords: Vec<[f64; 2]>) -> Vec<Point> {
    let mut seen = FastHashSet::default();
    coords
        .into_iter()
        .map(Point::new)
        .filter(|p| seen.insert(p.to_bits()))
        .collect()
}

/// Convex hull vertices in counterclockwise order by Andrew's monotone chain, without
/// collinear boundary points.
fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())));
    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(2 * sorted.len());
    for pass in 0..2 {
        let start = hull.len();
        let iter: Box<dyn Iterator<Item = &Point>> = if pass == 0 {
            Box::new(sorted.iter())
        } else {
            Box::new(sorted.iter().rev())
        };
        for p in iter {
            while hull.len() >= start + 2
                && signed_area(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0
            {
                hull.pop();
            }
            hull.push(*p);
        }
        hull.pop();
    }
    hull
}

fn hull_area(points: &[Point]) -> f64 {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return 0.0;
    }
    let n = hull.len();
    (0..n)
        .map(|i| {
            let (a, b) = (hull[i], hull[(i + 1) % n]);
            a.x() * b.y() - b.x() * a.y()
        })
        .sum::<f64>()
        / 2.0
}

/// Number of input points on the hull boundary, collinear ones included, or `None`
/// when the cloud has no two-dimensional hull.
fn hull_boundary_count(points: &[Point]) -> Option<usize> {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return None;
    }
    let n = hull.len();
    let on_boundary = |p: &Point| (0..n).any(|i| is_on_segment(p, &hull[i], &hull[(i + 1) % n]));
    Some(points.iter().filter(|p| on_boundary(p)).count())
}

fn assert_triangle_count(dt: &DelaunayTriangulation, points: &[Point]) -> Result<(), TestCaseError> {
    match hull_boundary_count(points) {
        Some(h) => {
            prop_assert_eq!(
                dt.number_of_triangles() + 2 + h,
                2 * points.len(),
                "hull has {} boundary points",
                h
            );
        }
        None => prop_assert_eq!(dt.number_of_triangles(), 0),
    }
    Ok(())
}

fn triangle_area_sum(dt: &DelaunayTriangulation) -> f64 {
    dt.triangles()
        .map(|(key, _)| {
            let [a, b, c] = dt.triangle_points(key).unwrap();
            signed_area(&a, &b, &c) / 2.0
        })
        .sum()
}

fn check_invariants(points: &[Point]) -> Result<DelaunayTriangulation, TestCaseError> {
    let dt = DelaunayTriangulation::new(points, CANVAS, CANVAS)
        .map_err(|err| TestCaseError::fail(format!("construction failed: {err}")))?;

    prop_assert_eq!(dt.number_of_vertices(), points.len());
    prop_assert!(dt.is_valid().is_ok(), "{:?}", dt.is_valid());
    prop_assert!(
        find_delaunay_violations(dt.tds(), DEFAULT_DELAUNAY_EPSILON).is_empty(),
        "Delaunay violations in\n{}",
        dt
    );
    for (key, _) in dt.triangles() {
        let [a, b, c] = dt.triangle_points(key).unwrap();
        prop_assert!(signed_area(&a, &b, &c) > 0.0, "triangle {:?} not CCW", key);
    }
    for (key, triangle) in dt.triangles() {
        for (slot, neighbor) in triangle.neighbors().iter().enumerate() {
            if let Some(n) = neighbor {
                let other = dt.tds().get_triangle(*n).unwrap();
                prop_assert_eq!(other.neighbor_index(key).map(|s| other.edge(s)), Some(triangle.edge(slot)));
            }
        }
    }
    Ok(dt)
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_float_cloud_is_delaunay(points in float_cloud()) {
        check_invariants(&points)?;
    }

    #[test]
    fn prop_lattice_cloud_is_delaunay(points in lattice_cloud()) {
        check_invariants(&points)?;
    }

    #[test]
    fn prop_lattice_cloud_tiles_its_hull(points in lattice_cloud()) {
        let dt = check_invariants(&points)?;
        let expected = hull_area(&points);
        let actual = triangle_area_sum(&dt);
        assert_relative_eq!(actual, expected, epsilon = 1e-9);
        if expected == 0.0 {
            prop_assert_eq!(dt.number_of_triangles(), 0);
        }
    }

    #[test]
    fn prop_float_cloud_tiles_its_hull(points in float_cloud()) {
        let dt = check_invariants(&points)?;
        let expected = hull_area(&points);
        assert_relative_eq!(triangle_area_sum(&dt), expected, epsilon = 1e-6, max_relative = 1e-9);
    }

    #[test]
    fn prop_construction_is_deterministic(points in lattice_cloud()) {
        let a = DelaunayTriangulation::new(&points, CANVAS, CANVAS).unwrap();
        let b = DelaunayTriangulation::new(&points, CANVAS, CANVAS).unwrap();
        prop_assert_eq!(a.triangle_coordinates(), b.triangle_coordinates());
        prop_assert_eq!(a.statistics(), b.statistics());
    }

    #[test]
    fn prop_lattice_cloud_triangle_count(points in lattice_cloud()) {
        let dt = check_invariants(&points)?;
        assert_triangle_count(&dt, &points)?;
    }

    #[test]
    fn prop_float_cloud_triangle_count(points in float_cloud()) {
        let dt = check_invariants(&points)?;
        assert_triangle_count(&dt, &points)?;
    }

    #[test]
    fn prop_thin_cloud_keeps_its_slivers(points in thin_cloud()) {
        let dt = check_invariants(&points)?;
        assert_triangle_count(&dt, &points)?;

        // A small box puts the corners close enough to swallow slivers if they were
        // tested as ordinary points
        let options = ConstructionOptionsBuilder::default()
            .bounding_box_scale(1e3)
            .build()
            .unwrap();
        let small = DelaunayTriangulation::with_options(&points, CANVAS, CANVAS, options)
            .map_err(|err| TestCaseError::fail(format!("construction failed: {err}")))?;
        assert_triangle_count(&small, &points)?;
        assert_relative_eq!(
            triangle_area_sum(&small),
            hull_area(&points),
            epsilon = 1e-9,
            max_relative = 1e-9
        );
    }
}
