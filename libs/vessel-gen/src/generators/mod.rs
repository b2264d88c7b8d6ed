//! # Generators
//!
//! One module per vessel. Each exposes an immutable config struct whose
//! `Default` carries the production parameter table in millimetres, a
//! `build_mesh` that returns the stitched [`Mesh`](loft_mesh::Mesh), and a
//! `generate` that wraps the result in [`ObjectRecord`](crate::ObjectRecord)s.

pub mod bowl;
pub mod cup;
pub mod plate;
pub mod pot;
pub mod pot_lid;
pub mod sauce_dish;
pub mod spoon;

use config::constants::{subdivided_loop_count, vertices_per_loop, MAX_SUBDIVISION};
use glam::DVec2;
use loft_mesh::CurveSampler;

use crate::error::{GenError, GenResult};

/// Loop resolution for a horizontal subdivision level.
pub(crate) fn loop_vertices(subdivide_x: u32) -> GenResult<usize> {
    if subdivide_x > MAX_SUBDIVISION {
        return Err(GenError::invalid_config(format!(
            "horizontal subdivision {subdivide_x} exceeds {MAX_SUBDIVISION}"
        )));
    }
    Ok(vertices_per_loop(subdivide_x))
}

/// Rejects a vertical subdivision level past the supported maximum.
pub(crate) fn check_vertical(subdivide_y: u32) -> GenResult<()> {
    ensure(subdivide_y <= MAX_SUBDIVISION, || {
        format!("vertical subdivision {subdivide_y} exceeds {MAX_SUBDIVISION}")
    })
}

/// Loop count of a resampled span whose `anchors` loops stay on the curve
/// ends, with every interval split `2^subdivide_y` times.
pub(crate) fn resampled_count(anchors: usize, subdivide_y: u32) -> usize {
    subdivided_loop_count(anchors.saturating_sub(1), subdivide_y) + 1
}

pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> GenResult<()> {
    if condition {
        Ok(())
    } else {
        Err(GenError::invalid_config(message()))
    }
}

/// Samples an open cubic B-spline through a 2-D profile.
pub(crate) fn spline_profile(points: &[DVec2], samples: usize) -> GenResult<Vec<DVec2>> {
    Ok(CurveSampler::open().sample(points, samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_vertices_limits() {
        assert_eq!(loop_vertices(0).unwrap(), 16);
        assert_eq!(loop_vertices(2).unwrap(), 64);
        assert!(loop_vertices(MAX_SUBDIVISION + 1).is_err());
    }

    #[test]
    fn test_check_vertical_limits() {
        assert!(check_vertical(MAX_SUBDIVISION).is_ok());
        assert!(check_vertical(MAX_SUBDIVISION + 1).is_err());
        assert!(check_vertical(70).is_err());
    }

    #[test]
    fn test_resampled_count_keeps_anchors() {
        assert_eq!(resampled_count(5, 0), 5);
        assert_eq!(resampled_count(5, 2), 17);
        assert_eq!(resampled_count(1, 3), 1);
    }

    #[test]
    fn test_spline_profile_keeps_ends() {
        let points = [DVec2::new(0.0, 0.0), DVec2::new(5.0, 2.0), DVec2::new(10.0, 0.0)];
        let out = spline_profile(&points, 9).unwrap();
        assert_eq!(out.len(), 9);
        assert!((out[0] - points[0]).length() < 1e-9);
        assert!((out[8] - points[2]).length() < 1e-9);
    }
}
