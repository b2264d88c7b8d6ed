//! # Solidify
//!
//! Offsets a single-surface loop stack by a wall thickness. Each loop is
//! pushed along the normal estimated from its neighbours; a loop whose
//! neighbours share its height is translated straight up instead.
//!
//! The stack ends have one real neighbour only. The missing one is
//! synthesized by shifting the loop itself by its height difference to the
//! real neighbour, mirroring the slope.

use glam::DVec3;
use tracing::{debug, warn};

use crate::displace::{DisplaceDirection, NormalFrame};
use crate::edge_loop::EdgeLoop;
use crate::error::{MeshError, MeshResult};
use config::constants::approx_equal;

/// Returns the offset stack, same order and cardinality as `loops`.
///
/// # Errors
///
/// [`MeshError::SolidifyAbort`] if a non-flat loop has a neighbour of a
/// different size.
///
/// # Example
///
/// ```rust
/// use loft_mesh::{solidify, LoopFactory, LoopShape};
///
/// let disc = LoopFactory::new(LoopShape::Circle { radius: 5.0 })
///     .emit_cap(16, 0.0, false)
///     .unwrap();
/// let offset = solidify(&disc, 1.5).unwrap();
/// assert!(offset.iter().all(|l| l.z() == Some(1.5)));
/// ```
pub fn solidify(loops: &[EdgeLoop], thickness: f64) -> MeshResult<Vec<EdgeLoop>> {
    let last = loops.len().saturating_sub(1);
    let mut out = Vec::with_capacity(loops.len());
    let mut flat = 0usize;
    let mut degenerate = 0usize;

    for (index, here) in loops.iter().enumerate() {
        let lift = DVec3::new(0.0, 0.0, thickness);
        let Some(z) = here.z() else {
            out.push(here.clone());
            continue;
        };
        if loops.len() == 1 {
            out.push(here.translate(lift));
            flat += 1;
            continue;
        }

        let (before, after) = match index {
            0 => {
                let before = loops[1].clone();
                let dz = z - before.z().unwrap_or(z);
                let after = here.translate(DVec3::new(0.0, 0.0, dz));
                (before, after)
            }
            i if i == last => {
                let after = loops[i - 1].clone();
                let dz = z - after.z().unwrap_or(z);
                let before = here.translate(DVec3::new(0.0, 0.0, dz));
                (before, after)
            }
            i => (loops[i + 1].clone(), loops[i - 1].clone()),
        };

        let (zb, za) = (before.z().unwrap_or(z), after.z().unwrap_or(z));
        if approx_equal(zb, z) && approx_equal(za, z) {
            out.push(here.translate(lift));
            flat += 1;
            continue;
        }

        for neighbour in [&before, &after] {
            if neighbour.len() != here.len() {
                return Err(MeshError::SolidifyAbort {
                    index,
                    expected: here.len(),
                    found: neighbour.len(),
                });
            }
        }

        let n = here.len();
        out.push(here.map_points(|i, p| {
            let frame = match (
                before.point((i + n - 1) % n),
                before.point((i + 1) % n),
                after.point(i),
            ) {
                (Some(b), Some(a), Some(f)) => NormalFrame {
                    before: b,
                    adjacent: a,
                    after: f,
                },
                _ => return p,
            };
            match frame.direction(p, DisplaceDirection::Inward) {
                Some(dir) => p + dir * thickness,
                None => {
                    degenerate += 1;
                    p
                }
            }
        }));
    }

    if degenerate > 0 {
        warn!(degenerate, "solidify left vertices with degenerate normals in place");
    }
    debug!(loops = loops.len(), flat, thickness, "solidified stack");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{LoopFactory, LoopShape};
    use approx::assert_relative_eq;

    fn circle(n: usize, radius: f64, z: f64) -> EdgeLoop {
        LoopFactory::new(LoopShape::Circle { radius })
            .emit_loop(n, z)
            .unwrap()
    }

    #[test]
    fn test_flat_loops_translate_exactly() {
        let stack = vec![circle(16, 3.0, 2.0), circle(16, 4.0, 2.0), circle(16, 5.0, 2.0)];
        let out = solidify(&stack, 0.75).unwrap();
        for (a, b) in stack.iter().zip(&out) {
            for (p, q) in a.points().zip(b.points()) {
                assert_eq!(q, p + DVec3::new(0.0, 0.0, 0.75));
            }
        }
    }

    #[test]
    fn test_single_loop_translates() {
        let out = solidify(&[circle(8, 1.0, 0.0)], 2.0).unwrap();
        assert_eq!(out[0].z(), Some(2.0));
    }

    #[test]
    fn test_wall_keeps_cardinality_and_moves_by_thickness() {
        let stack: Vec<EdgeLoop> = (0..4).map(|z| circle(16, 10.0, z as f64)).collect();
        let out = solidify(&stack, 0.5).unwrap();
        assert_eq!(out.len(), 4);
        for (a, b) in stack.iter().zip(&out) {
            assert_eq!(a.len(), b.len());
            for (p, q) in a.points().zip(b.points()) {
                assert_relative_eq!(p.distance(q), 0.5, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_mismatched_neighbour_aborts() {
        let stack = vec![circle(16, 10.0, 0.0), circle(16, 10.0, 1.0), circle(8, 10.0, 2.0)];
        assert!(matches!(
            solidify(&stack, 0.5),
            Err(MeshError::SolidifyAbort {
                index: 1,
                expected: 16,
                found: 8
            })
        ));
    }

    #[test]
    fn test_cap_then_wall() {
        let factory = LoopFactory::new(LoopShape::Circle { radius: 5.0 });
        let mut stack = factory.emit_cap(16, 0.0, false).unwrap();
        stack.push(factory.emit_loop(16, 0.0).unwrap());
        stack.push(factory.emit_loop(16, 3.0).unwrap());
        stack.push(factory.emit_loop(16, 6.0).unwrap());
        let out = solidify(&stack, 0.4).unwrap();
        assert_eq!(out.len(), stack.len());
        assert_eq!(out[0].z(), Some(0.4));
        assert_eq!(out[2].z(), Some(0.4));
    }

    #[test]
    fn test_empty_stack() {
        assert!(solidify(&[], 1.0).unwrap().is_empty());
    }
}
