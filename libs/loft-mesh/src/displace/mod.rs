//! # Displacement Engine
//!
//! Pushes loop vertices along a local normal estimated from neighbouring
//! loops. The same normal estimate drives [`solidify`](crate::solidify).
//!
//! ## Normal Estimate
//!
//! For a vertex `p` at index `i` of loop `L[k]`:
//!
//! ```text
//! before   = L[k-1][i-1]        adjacent = L[k-1][i+1]        after = L[k+1][i]
//!
//! heights are re-zeroed on p.z, then
//!   outward: n = (after - before) x (adjacent - before)
//!   inward:  n = (adjacent - before) x (after - before)
//!   dir    = normalize(n - p)
//! ```
//!
//! Displacement moves `p` by `-amount * dir`; solidify moves it by
//! `+thickness * dir`. The original height is restored afterwards.

pub mod signal;

#[cfg(test)]
mod tests;

use glam::{DVec2, DVec3};
use tracing::debug;

use crate::edge_loop::EdgeLoop;
use crate::error::{MeshError, MeshResult};
use config::constants::EPSILON;
pub use signal::{DataCurve, DisplacementSignal, GridProjection, GridSignal, SampleGrid};

/// Orientation of the estimated normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplaceDirection {
    /// Normal from `(after - before) x (adjacent - before)`.
    #[default]
    Outward,
    /// The opposite orientation.
    Inward,
}

/// Three neighbour positions around a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalFrame {
    /// Previous loop, previous index.
    pub before: DVec3,
    /// Previous loop, next index.
    pub adjacent: DVec3,
    /// Next loop, same index.
    pub after: DVec3,
}

impl NormalFrame {
    /// Unit offset direction for `p`, or `None` when degenerate.
    pub fn direction(&self, p: DVec3, direction: DisplaceDirection) -> Option<DVec3> {
        let rel = |q: DVec3| DVec3::new(q.x, q.y, q.z - p.z);
        let (p1, p2, p3) = (rel(self.before), rel(self.adjacent), rel(self.after));
        let p0 = DVec3::new(p.x, p.y, 0.0);
        let n = match direction {
            DisplaceDirection::Outward => (p3 - p1).cross(p2 - p1),
            DisplaceDirection::Inward => (p2 - p1).cross(p3 - p1),
        };
        let d = n - p0;
        let len = d.length();
        (len > EPSILON).then(|| d / len)
    }

    /// Moves `p` by `distance` along the offset direction.
    ///
    /// Degenerate frames leave the point where it is.
    pub fn offset(&self, p: DVec3, direction: DisplaceDirection, distance: f64) -> DVec3 {
        match self.direction(p, direction) {
            Some(dir) => p + dir * distance,
            None => p,
        }
    }
}

/// Where a vertex sits within a displaced span, handed to the signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Vertex position before displacement.
    pub position: DVec3,
    /// Arc-length position of the loop along the span, in `[0, 1]`.
    pub along: f64,
    /// Index position around the loop, in `[0, 1]`.
    pub around: f64,
}

/// Displaces interior loops of a span by a signal.
///
/// # Example
///
/// ```rust
/// use loft_mesh::{DataCurve, DisplacementEngine, LoopFactory, LoopShape};
///
/// let factory = LoopFactory::new(LoopShape::Circle { radius: 10.0 });
/// let span: Vec<_> = (0..5)
///     .map(|z| factory.emit_loop(16, z as f64).unwrap())
///     .collect();
/// let curve = DataCurve::new(vec![(0.0, 0.0), (1.0, 1.0)]).unwrap();
/// let out = DisplacementEngine::new(&curve, 0.5).displace_span(&span).unwrap();
/// assert_eq!(out.len(), 5);
/// assert_eq!(out[0], span[0]);
/// assert_eq!(out[4], span[4]);
/// ```
pub struct DisplacementEngine<'a, S: DisplacementSignal + ?Sized> {
    signal: &'a S,
    max_depth: f64,
    direction: DisplaceDirection,
}

impl<'a, S: DisplacementSignal + ?Sized> DisplacementEngine<'a, S> {
    /// Creates an engine displacing outward by up to `max_depth`.
    pub fn new(signal: &'a S, max_depth: f64) -> Self {
        Self {
            signal,
            max_depth,
            direction: DisplaceDirection::Outward,
        }
    }

    /// Overrides the normal orientation.
    pub fn with_direction(self, direction: DisplaceDirection) -> Self {
        Self { direction, ..self }
    }

    /// Displaces a single point.
    pub fn displace(&self, p: DVec3, frame: &NormalFrame, strength: f64) -> DVec3 {
        frame.offset(p, self.direction, -strength * self.max_depth)
    }

    /// Displaces every loop of `span` except the first and last.
    ///
    /// The end loops anchor the span and are returned unchanged. Culled
    /// slots stay culled; a vertex with a culled neighbour is left in place.
    ///
    /// # Errors
    ///
    /// [`MeshError::ShapeMismatch`] if an interior loop differs in size from
    /// a neighbour.
    pub fn displace_span(&self, span: &[EdgeLoop]) -> MeshResult<Vec<EdgeLoop>> {
        if span.len() < 3 {
            return Ok(span.to_vec());
        }
        let along = arc_positions(span);
        let mut out = Vec::with_capacity(span.len());
        out.push(span[0].clone());
        for k in 1..span.len() - 1 {
            let (prev, here, next) = (&span[k - 1], &span[k], &span[k + 1]);
            for neighbour in [prev, next] {
                if neighbour.len() != here.len() {
                    return Err(MeshError::shape_mismatch(
                        here.len(),
                        neighbour.len(),
                        "displaced loops need equal cardinality",
                    ));
                }
            }
            let n = here.len();
            let displaced = here.map_points(|i, p| {
                let frame = match (
                    prev.point((i + n - 1) % n),
                    prev.point((i + 1) % n),
                    next.point(i),
                ) {
                    (Some(before), Some(adjacent), Some(after)) => NormalFrame {
                        before,
                        adjacent,
                        after,
                    },
                    _ => return p,
                };
                let sample = SamplePoint {
                    position: p,
                    along: along[k],
                    around: if n > 1 {
                        i as f64 / (n - 1) as f64
                    } else {
                        0.0
                    },
                };
                self.displace(p, &frame, self.signal.strength(&sample))
            });
            out.push(displaced);
        }
        if let Some(last) = span.last() {
            out.push(last.clone());
        }
        debug!(loops = span.len(), depth = self.max_depth, "displaced span");
        Ok(out)
    }
}

/// Normalized arc length of each loop's centroid along the span.
fn arc_positions(span: &[EdgeLoop]) -> Vec<f64> {
    let centroids: Vec<Option<DVec3>> = span.iter().map(EdgeLoop::centroid).collect();
    let mut acc = vec![0.0; span.len()];
    for k in 1..span.len() {
        let step = match (centroids[k - 1], centroids[k]) {
            (Some(a), Some(b)) => a.distance(b),
            _ => 0.0,
        };
        acc[k] = acc[k - 1] + step;
    }
    let total = acc.last().copied().unwrap_or(0.0);
    if total > EPSILON {
        acc.iter_mut().for_each(|v| *v /= total);
    } else {
        let last = (span.len().max(2) - 1) as f64;
        acc.iter_mut()
            .enumerate()
            .for_each(|(k, v)| *v = k as f64 / last);
    }
    acc
}

/// Raises vertices at or above `min_z` along +Z by `amount × strength`.
///
/// `strength` is sampled from `grid` through a planar projection of X/Y
/// onto `bounds`. Used for reliefs on flat tops.
pub fn emboss_z(
    loops: &[EdgeLoop],
    grid: &SampleGrid,
    bounds: (DVec2, DVec2),
    amount: f64,
    min_z: f64,
) -> Vec<EdgeLoop> {
    let signal = GridSignal::new(
        grid,
        GridProjection::Planar {
            min: bounds.0,
            max: bounds.1,
        },
    );
    loops
        .iter()
        .map(|edge_loop| {
            edge_loop.map_points(|_, p| {
                if p.z < min_z {
                    return p;
                }
                let sample = SamplePoint {
                    position: p,
                    along: 0.0,
                    around: 0.0,
                };
                p + DVec3::Z * amount * signal.strength(&sample)
            })
        })
        .collect()
}
