//! Pure distance and projection primitives on the sphere and in 3-D
//! Cartesian space. No state, no I/O — every function here is a direct
//! translation of `networkbuild.ModBoruvka`'s `cartesian_projection`,
//! `hav_dist`/`get_hav_distance`, and `sq_dist`, generalised from NumPy
//! vector operations to scalar node pairs.

use crate::constants::Weight;
use crate::types::Coordinate;

/// A point in 3-D Cartesian (ECEF-style) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Projects a (lon, lat) pair in decimal degrees onto a sphere of the given
/// radius, using standard geodetic-to-ECEF conversion with no ellipsoidal
/// flattening. Used for k-NN / bbox indexing only; `radius_m` should be
/// [`crate::EngineConfig::cartesian_radius_m`] (spec default: 6 378 137 m).
pub fn cartesian(coord: Coordinate, radius_m: f64) -> Point3 {
    let lon = coord.lon.to_radians();
    let lat = coord.lat.to_radians();
    let cos_lat = lat.cos();
    Point3 {
        x: radius_m * cos_lat * lon.cos(),
        y: radius_m * cos_lat * lon.sin(),
        z: radius_m * lat.sin(),
    }
}

/// Squared Euclidean distance between two Cartesian-projected points. Used
/// for k-NN ordering and queue priority; monotone in great-circle distance
/// for nearby points and avoids trigonometric cost per comparison.
pub fn sq_dist_3d(a: Point3, b: Point3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// Great-circle distance in metres between two (lon, lat) coordinates via
/// the haversine formula, on a sphere of the given radius. Used only at
/// commit time, where absolute distance drives the budget ledger.
/// `radius_m` should be [`crate::EngineConfig::haversine_radius_m`]
/// (spec default: 6 371 010 m).
pub fn haversine(a: Coordinate, b: Coordinate, radius_m: f64) -> Weight {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lon2 = b.lon.to_radians();

    let dlat = (lat2 - lat1) / 2.0;
    let dlon = (lon2 - lon1) / 2.0;
    let h = dlat.sin().powi(2) + lat1.cos() * lat2.cos() * dlon.sin().powi(2);
    let angle = 2.0 * h.sqrt().asin();

    radius_m * angle
}

/// A 2-D point in the same projected Cartesian plane used by the rectangle
/// index (the x/y components of [`cartesian`]).
pub type Point2 = [f64; 2];

/// Drops the `z` component of [`cartesian`] to get the 2-D plane the
/// rectangle index and [`crate::geometry_guard`] operate in. Every caller
/// that builds or queries the rectangle index must go through this same
/// projection (spec.md §4.1's consistency requirement on `bbox`).
pub fn project_2d(coord: Coordinate, radius_m: f64) -> Point2 {
    let p = cartesian(coord, radius_m);
    [p.x, p.y]
}

/// Axis-aligned bounding box of a segment `p`–`q`, in the projected plane
/// used for both endpoint storage and rectangle queries. Callers must use
/// a consistent projection on both sides.
pub fn bbox(p: Point2, q: Point2) -> (f64, f64, f64, f64) {
    let xmin = p[0].min(q[0]);
    let xmax = p[0].max(q[0]);
    let ymin = p[1].min(q[1]);
    let ymax = p[1].max(q[1]);
    (xmin, ymin, xmax, ymax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn haversine_matches_spec_scenario_one() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.01, 0.0);
        let d = haversine(a, b, 6_371_010.0);
        // spec.md scenario 1: "haversine ~= 1_113 m"
        assert_abs_diff_eq!(d, 1_113.0, epsilon = 5.0);
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let a = Coordinate::new(12.3, 45.6);
        assert_abs_diff_eq!(haversine(a, a, 6_371_010.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn sq_dist_3d_is_symmetric_and_zero_at_identity() {
        let a = cartesian(Coordinate::new(10.0, 20.0), 6_378_137.0);
        let b = cartesian(Coordinate::new(-5.0, 30.0), 6_378_137.0);
        assert_abs_diff_eq!(sq_dist_3d(a, b), sq_dist_3d(b, a), epsilon = 1e-6);
        assert_abs_diff_eq!(sq_dist_3d(a, a), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn bbox_normalizes_min_max_regardless_of_point_order() {
        let (xmin, ymin, xmax, ymax) = bbox([3.0, -1.0], [1.0, 4.0]);
        assert_eq!((xmin, ymin, xmax, ymax), (1.0, -1.0, 3.0, 4.0));
        let (xmin2, ymin2, xmax2, ymax2) = bbox([1.0, 4.0], [3.0, -1.0]);
        assert_eq!((xmin, ymin, xmax, ymax), (xmin2, ymin2, xmax2, ymax2));
    }
}
