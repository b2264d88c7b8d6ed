//! # Cap Mesh
//!
//! Closes a loop end with concentric rings taken from an `(e+1) x (e+1)`
//! grid, where `e` is the loop's edges-per-side. Ring `r` walks the square
//! of half-width `r` around the grid centre, so rings hold
//! `1, 8, 16, ..., 4e` vertices and every consecutive pair is bridged by the
//! corner-aware path with quads only.
//!
//! ```text
//!  row 0   o---o---o---o---o      ring e (outer) = the loop itself
//!          |   .---.---.   |      ring 2
//!          |   |   o   |   |      centre
//!          |   '---'---'   |
//!  row e   o---o---o---o---o
//! ```

use glam::DVec3;

use crate::edge_loop::EdgeLoop;
use crate::error::{MeshError, MeshResult};

/// Number of faces produced when a cap closes a loop of `size` vertices.
///
/// These are the faces a host must flip when the cap leads the stack.
///
/// # Example
///
/// ```rust
/// use loft_mesh::cap_face_count;
///
/// assert_eq!(cap_face_count(8), 4);
/// assert_eq!(cap_face_count(64), 256);
/// ```
pub fn cap_face_count(size: usize) -> usize {
    let e = size / 4;
    e * e
}

/// Square vertex grid spanning a cap.
#[derive(Debug, Clone)]
pub struct CapGrid {
    edges: usize,
    points: Vec<DVec3>,
}

impl CapGrid {
    /// Checks that a loop of `size` vertices can be capped.
    pub fn edges_for(size: usize) -> MeshResult<usize> {
        if size < 8 || size % 8 != 0 {
            return Err(MeshError::invalid_input(format!(
                "cap needs a loop size that is a multiple of 8, got {size}"
            )));
        }
        Ok(size / 4)
    }

    /// Builds a grid by evaluating `f(x, y)` on `[-1, 1]²`.
    ///
    /// Row 0 is `y = -1`, column 0 is `x = -1`.
    pub fn from_square_map(size: usize, f: impl Fn(f64, f64) -> DVec3) -> MeshResult<Self> {
        let edges = Self::edges_for(size)?;
        let step = |i: usize| i as f64 / edges as f64 * 2.0 - 1.0;
        let points = (0..=edges)
            .flat_map(|row| (0..=edges).map(move |col| (row, col)))
            .map(|(row, col)| f(step(col), step(row)))
            .collect();
        Ok(Self { edges, points })
    }

    /// Builds a grid whose border is `perimeter`.
    ///
    /// The perimeter walks top (left to right), right (top to bottom),
    /// bottom (right to left), left (bottom to top), starting at the
    /// top-left corner. Interior rows interpolate linearly between the left
    /// and right border vertices of the same row.
    pub fn from_perimeter(perimeter: &[DVec3]) -> MeshResult<Self> {
        let n = perimeter.len();
        let e = Self::edges_for(n)?;
        let mut points = Vec::with_capacity((e + 1) * (e + 1));
        for row in 0..=e {
            for col in 0..=e {
                let p = if row == 0 {
                    perimeter[col]
                } else if row == e {
                    perimeter[3 * e - col]
                } else if col == 0 {
                    perimeter[n - row]
                } else if col == e {
                    perimeter[e + row]
                } else {
                    let left = perimeter[n - row];
                    let right = perimeter[e + row];
                    left.lerp(right, col as f64 / e as f64)
                };
                points.push(p);
            }
        }
        Ok(Self { edges: e, points })
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> DVec3 {
        self.points[row * (self.edges + 1) + col]
    }

    /// Extracts the concentric rings, centre first.
    ///
    /// `reverse` returns them outer ring first, for caps that close the top
    /// of a stack.
    pub fn rings(&self, reverse: bool) -> Vec<EdgeLoop> {
        let c = self.edges / 2;
        let mut rings = vec![EdgeLoop::new(vec![self.at(c, c)])];
        for r in 1..=c {
            let side = 2 * r;
            let mut ring = Vec::with_capacity(4 * side);
            ring.extend((0..side).map(|i| self.at(c - r, c - r + i)));
            ring.extend((0..side).map(|i| self.at(c - r + i, c + r)));
            ring.extend((0..side).map(|i| self.at(c + r, c + r - i)));
            ring.extend((0..side).map(|i| self.at(c + r - i, c - r)));
            rings.push(EdgeLoop::new(ring));
        }
        if reverse {
            rings.reverse();
        }
        rings
    }
}

/// Caps an existing loop by interpolating its own vertices.
///
/// Works on any 3D loop whose size is a multiple of 8 and whose vertex 0 is
/// a corner of a four-sided parameterization.
pub fn cap_loop(edge_loop: &EdgeLoop, reverse: bool) -> MeshResult<Vec<EdgeLoop>> {
    let perimeter = edge_loop
        .slots()
        .iter()
        .map(|slot| slot.point())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| MeshError::invalid_input("cannot cap a loop with culled vertices"))?;
    Ok(CapGrid::from_perimeter(&perimeter)?.rings(reverse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_square(size: usize) -> CapGrid {
        CapGrid::from_square_map(size, |x, y| DVec3::new(x, y, 0.0)).unwrap()
    }

    #[test]
    fn test_edges_for_requires_multiple_of_eight() {
        assert!(CapGrid::edges_for(4).is_err());
        assert!(CapGrid::edges_for(12).is_err());
        assert_eq!(CapGrid::edges_for(16).unwrap(), 4);
    }

    #[test]
    fn test_ring_sizes() {
        let rings = flat_square(32).rings(false);
        let sizes: Vec<usize> = rings.iter().map(EdgeLoop::len).collect();
        assert_eq!(sizes, vec![1, 8, 16, 24, 32]);
    }

    #[test]
    fn test_reverse_puts_outer_ring_first() {
        let rings = flat_square(16).rings(true);
        assert_eq!(rings.first().map(EdgeLoop::len), Some(16));
        assert_eq!(rings.last().map(EdgeLoop::len), Some(1));
    }

    #[test]
    fn test_outer_ring_starts_top_left() {
        let rings = flat_square(16).rings(false);
        let outer = &rings[2];
        assert_eq!(outer.point(0), Some(DVec3::new(-1.0, -1.0, 0.0)));
        assert_eq!(outer.point(4), Some(DVec3::new(1.0, -1.0, 0.0)));
        assert_eq!(outer.point(8), Some(DVec3::new(1.0, 1.0, 0.0)));
        assert_eq!(outer.point(12), Some(DVec3::new(-1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_centre_is_grid_middle() {
        let rings = flat_square(24).rings(false);
        let centre = rings[0].point(0).unwrap();
        assert_relative_eq!(centre.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(centre.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_perimeter_reproduces_border() {
        let outer = flat_square(16).rings(false).pop().unwrap();
        let perimeter: Vec<DVec3> = outer.points().collect();
        let rebuilt = CapGrid::from_perimeter(&perimeter).unwrap().rings(false);
        let rebuilt_outer: Vec<DVec3> = rebuilt[2].points().collect();
        for (a, b) in perimeter.iter().zip(&rebuilt_outer) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cap_loop_rejects_culled() {
        let mut ring = flat_square(8).rings(false).pop().unwrap();
        ring.cull(1).unwrap();
        assert!(cap_loop(&ring, false).is_err());
    }

    #[test]
    fn test_cap_face_count() {
        assert_eq!(cap_face_count(16), 16);
        assert_eq!(cap_face_count(32), 64);
    }
}
