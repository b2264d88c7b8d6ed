//! # Mesh Builder
//!
//! Accumulates an ordered stack of edge loops and stitches it into a mesh
//! in one pass. Building consumes the builder, so a stack is stitched
//! exactly once.
//!
//! ## Pipeline
//!
//! ```text
//! loops ──▶ vertex slots + tags (every loop, in order)
//!       ──▶ faces: end quads for 4-vertex loops, bridge(loop[i-1], loop[i])
//!       ──▶ shell seams for ranged spans of a solidified stack
//!       ──▶ VertexCuller (drop culled and non-participating slots, remap faces)
//!       ──▶ OpeningRegistry (collect annotated rims)
//!       ──▶ Mesh
//! ```

use config::constants::{MAX_FACES, MAX_VERTICES};
use glam::DVec3;
use std::ops::Range;
use tracing::debug;

use crate::bridge::bridge;
use crate::cull::VertexCuller;
use crate::edge_loop::{lerp_loop, EdgeLoop};
use crate::error::{MeshError, MeshResult};
use crate::mesh::{Face, Mesh};
use crate::openings::OpeningRegistry;
use crate::solidify::solidify;

/// Ordered loop stack awaiting stitching.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    loops: Vec<EdgeLoop>,
    /// Outer loop count once the stack was solidified.
    shell: Option<usize>,
}

impl MeshBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a loop.
    pub fn add_loop(&mut self, edge_loop: EdgeLoop) -> &mut Self {
        self.loops.push(edge_loop);
        self
    }

    /// Appends several loops in order.
    pub fn add_loops(&mut self, loops: impl IntoIterator<Item = EdgeLoop>) -> &mut Self {
        self.loops.extend(loops);
        self
    }

    /// Appends a loop `distance` along the way from the last loop to `next`.
    ///
    /// Used to tighten the curvature right after a rim. The gap is measured
    /// between the seam vertices (index 0) of the two loops, and the helper
    /// must land before its midpoint.
    pub fn add_helper_loop(&mut self, next: &EdgeLoop, distance: f64) -> MeshResult<&mut Self> {
        let Some(last) = self.loops.last() else {
            return Err(MeshError::invalid_input("helper loop needs a previous loop"));
        };
        let (Some(from), Some(to)) = (last.point(0), next.point(0)) else {
            return Err(MeshError::invalid_input("helper loop needs live seam vertices"));
        };
        let gap = from.distance(to);
        if gap <= 0.0 || distance >= gap / 2.0 {
            return Err(MeshError::invalid_input(format!(
                "helper distance {distance} does not fit a gap of {gap}"
            )));
        }
        let helper = lerp_loop(last, next, distance / gap)?;
        self.loops.push(helper);
        Ok(self)
    }

    /// Replaces the loops in `range` with `loops`.
    ///
    /// Used to splice resampled or displaced spans back into the stack.
    pub fn replace_loops(
        &mut self,
        range: Range<usize>,
        loops: impl IntoIterator<Item = EdgeLoop>,
    ) -> MeshResult<&mut Self> {
        if range.start > range.end || range.end > self.loops.len() {
            return Err(MeshError::invalid_input(format!(
                "loop range {range:?} outside stack of {}",
                self.loops.len()
            )));
        }
        self.loops.splice(range, loops);
        self.shell = None;
        Ok(self)
    }

    /// Translates every loop.
    pub fn translate(&mut self, offset: DVec3) -> &mut Self {
        for edge_loop in &mut self.loops {
            *edge_loop = edge_loop.translate(offset);
        }
        self
    }

    /// Offsets the stack by `thickness` and appends it in reverse order.
    ///
    /// The outer surface runs first-to-last and the inner surface comes back
    /// last-to-first, so the two meet at the final loop. A ranged span at the
    /// end of the outer surface is sealed along its sides when the stack is
    /// built (see [`build`](Self::build)).
    pub fn solidify(&mut self, thickness: f64) -> MeshResult<&mut Self> {
        let mut offset = solidify(&self.loops, thickness)?;
        offset.reverse();
        self.shell = Some(self.loops.len());
        self.loops.extend(offset);
        Ok(self)
    }

    /// The current stack.
    #[inline]
    pub fn loops(&self) -> &[EdgeLoop] {
        &self.loops
    }

    /// Number of loops in the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Returns true if no loops were added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Stitches the stack into a mesh.
    ///
    /// Slots of a ranged loop outside its range are dropped with the culled
    /// ones. In a solidified stack, a run of ranged loops closing the outer
    /// surface (a handle strip growing out of a full root loop) is sealed:
    /// walls along both long sides, and the root rim outside the range joined
    /// to the matching inner rim.
    ///
    /// # Errors
    ///
    /// - [`MeshError::ShapeMismatch`] for adjacent loops with no bridging rule
    /// - [`MeshError::TooManyVertices`] past the configured limit
    /// - [`MeshError::InvalidInput`] for a ranged span that cannot be sealed
    pub fn build(self) -> MeshResult<Mesh> {
        let total: usize = self.loops.iter().map(EdgeLoop::len).sum();
        if total > MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                count: total,
                max: MAX_VERTICES,
            });
        }

        let mut faces = Vec::new();
        let mut offset = 0;
        for (i, pair) in self.loops.windows(2).enumerate() {
            faces.extend(bridge(&pair[0], &pair[1], offset).map_err(|e| {
                debug!(loop_index = i + 1, error = %e, "bridge failed");
                e
            })?);
            offset += pair[0].len();
        }
        if let Some(outer) = self.shell {
            faces.extend(seal_shell(&self.loops, outer)?);
        }
        if let Some(first) = self.loops.first() {
            if is_end_quad(first) {
                faces.insert(0, Face::Quad([0, 1, 2, 3]));
            }
        }
        if self.loops.len() > 1 {
            if let Some(last) = self.loops.last() {
                if is_end_quad(last) {
                    let o = offset as u32;
                    faces.push(Face::Quad([o, o + 1, o + 2, o + 3]));
                }
            }
        }
        if faces.len() > MAX_FACES {
            return Err(MeshError::invalid_input(format!(
                "{} faces exceeds the limit of {MAX_FACES}",
                faces.len()
            )));
        }

        let loop_count = self.loops.len();
        let mut slots = Vec::with_capacity(total);
        let mut tags = Vec::with_capacity(total);
        for mut edge_loop in self.loops {
            edge_loop.cull_outside_range();
            let (s, t) = edge_loop.into_parts();
            slots.extend(s);
            tags.extend(t);
        }

        let culled = VertexCuller::cull(slots, tags, faces);
        let openings = OpeningRegistry::collect(&culled.tags)?;
        debug!(
            loops = loop_count,
            vertices = culled.vertices.len(),
            faces = culled.faces.len(),
            openings = openings.len(),
            "stitched loop stack"
        );
        Ok(Mesh::from_parts(culled.vertices, culled.faces, openings))
    }
}

/// Seam faces for the ranged span of a solidified stack of `outer` loops.
///
/// Outer loop `k` mirrors loop `2 * outer - 1 - k`. The span must follow a
/// full closed root loop, reach the end of the outer surface and share one
/// range of at least two vertices.
fn seal_shell(loops: &[EdgeLoop], outer: usize) -> MeshResult<Vec<Face>> {
    if loops.len() < 2 * outer {
        return Ok(Vec::new());
    }
    let Some(first) = loops[..outer].iter().position(|l| l.range().is_some()) else {
        return Ok(Vec::new());
    };
    let mirror = |k: usize| 2 * outer - 1 - k;
    let range = loops[first].participating();
    if first == 0 || loops[first..=mirror(first)].iter().any(|l| l.participating() != range) {
        return Err(MeshError::invalid_input(format!(
            "ranged span from loop {first} must follow a full loop and share one range"
        )));
    }
    if range.len() < 2 {
        return Err(MeshError::invalid_input("ranged span needs at least 2 vertices"));
    }
    let root = first - 1;
    let n = loops[root].len();
    if !loops[root].is_closed()
        || loops[root].range().is_some()
        || loops[mirror(root)].len() != n
        || range.end > n
    {
        return Err(MeshError::invalid_input(format!(
            "loop {root} cannot root a ranged span of {}..{}",
            range.start, range.end
        )));
    }

    let mut bases = Vec::with_capacity(loops.len());
    let mut base = 0usize;
    for edge_loop in loops {
        bases.push(base);
        base += edge_loop.len();
    }
    let at = |k: usize, i: usize| (bases[k] + i) as u32;

    let (s, t) = (range.start, range.end - 1);
    let mut faces = Vec::new();
    for k in root..outer - 1 {
        let (j, mk, mj) = (k + 1, mirror(k), mirror(k + 1));
        faces.push(Face::Quad([at(k, s), at(j, s), at(mj, s), at(mk, s)]));
        faces.push(Face::Quad([at(j, t), at(k, t), at(mk, t), at(mj, t)]));
    }
    let inner_root = mirror(root);
    for step in 0..n - (t - s) {
        let i = (t + step) % n;
        let next = (i + 1) % n;
        faces.push(Face::Quad([
            at(root, i),
            at(root, next),
            at(inner_root, next),
            at(inner_root, i),
        ]));
    }
    debug!(root, span = outer - first, faces = faces.len(), "sealed ranged span");
    Ok(faces)
}

/// Closed four-vertex loops at either end of a stack get their own quad.
fn is_end_quad(edge_loop: &EdgeLoop) -> bool {
    edge_loop.len() == 4 && edge_loop.is_closed() && edge_loop.range().is_none()
}
