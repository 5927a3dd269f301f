//! Math utilities for navigation mesh construction and queries
//!
//! Planar tests work on the XZ plane (Y-up coordinate system), matching the
//! walkable-surface convention used by the navigation core.

use glam::Vec3;

/// Calculates twice the signed area of a triangle projected onto the XZ plane.
///
/// The sign encodes the winding order and is the turn test used by the
/// funnel algorithm: positive means `c` lies to one side of the `a`→`b`
/// edge, negative the other, zero collinear.
#[inline]
pub fn tri_area_2d(a: &Vec3, b: &Vec3, c: &Vec3) -> f32 {
    let abx = b.x - a.x;
    let abz = b.z - a.z;
    let acx = c.x - a.x;
    let acz = c.z - a.z;
    acx * abz - abx * acz
}

/// Checks whether two points are close enough to be treated as the same
/// funnel vertex (squared distance below 1e-6).
#[inline]
pub fn points_equal(a: &Vec3, b: &Vec3) -> bool {
    a.distance_squared(*b) < 1e-6
}

/// Rounds a value to the given number of decimal places.
#[inline]
pub fn round_to(value: f32, decimals: u32) -> f32 {
    let f = 10f32.powi(decimals as i32);
    (value * f + 0.5).floor() / f
}

/// Reads point `id` out of a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer.
#[inline]
pub fn vec3_at(flat: &[f32], id: u32) -> Vec3 {
    let i = id as usize * 3;
    Vec3::new(flat[i], flat[i + 1], flat[i + 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_area_2d_winding_sign() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let area = tri_area_2d(&a, &b, &c);
        assert!(area > 0.0);
        // Swapping two corners flips the sign
        assert_eq!(tri_area_2d(&a, &c, &b), -area);
    }

    #[test]
    fn test_tri_area_2d_collinear() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 5.0, 1.0);
        let c = Vec3::new(2.0, -3.0, 2.0);
        // Y is ignored; the XZ projections are collinear
        assert_eq!(tri_area_2d(&a, &b, &c), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235, 2), 1.24);
        assert_eq!(round_to(-1.0, 4), -1.0);
    }

    #[test]
    fn test_points_equal_threshold() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert!(points_equal(&a, &Vec3::new(1.0005, 2.0, 3.0)));
        assert!(!points_equal(&a, &Vec3::new(1.1, 2.0, 3.0)));
    }

    #[test]
    fn test_vec3_at() {
        let flat = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(vec3_at(&flat, 1), Vec3::new(3.0, 4.0, 5.0));
    }
}
