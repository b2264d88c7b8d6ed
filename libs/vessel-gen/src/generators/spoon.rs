//! # Spoon
//!
//! A spoon shaped by a data series along its length. The bowl is a stack of
//! ellipses cut through the valley of the curve around the base: each level
//! spans from the first rise on the left of the base to the first rise on
//! its right. The handle grows from the right side of the rim as open arcs
//! restricted to the `+x` quarter of full ellipses, each placed at the
//! curve height of its station. The whole surface is thickened with
//! [`MeshBuilder::solidify`], which also seals the handle edges.
//!
//! ```text
//!   z
//!   │  rim ____                 ______ handle arcs
//!   │     \    \_ base _/    /_/
//!   └──────────────────────────────────▶ x (0..1 along the series)
//! ```

use glam::{DVec2, DVec3};
use loft_mesh::{
    cap_face_count, DataCurve, EdgeLoop, LoopFactory, LoopShape, Mesh, MeshBuilder, PartialRange,
};
use tracing::info;

use super::{ensure, loop_vertices};
use crate::error::GenResult;
use crate::record::ObjectRecord;

/// Steps used to search the curve for the bowl walls.
const LEVEL_SEARCH_STEPS: usize = 512;

/// Spoon parameters in millimetres; positions along the series are in
/// `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpoonConfig {
    /// Length covered by the whole series.
    pub length: f64,
    /// Widest span across the bowl.
    pub width: f64,
    /// Height of a full-scale value.
    pub height: f64,
    /// Wall thickness added by solidify.
    pub thickness: f64,
    /// Inset of the floor cap from the base outline.
    pub inset_width: f64,
    /// Width factors along the series as `(position, factor)`.
    pub widths: Vec<(f64, f64)>,
    /// Start and end of the flat base.
    pub base_span: (f64, f64),
    /// Last position the right bowl wall may reach.
    pub bowl_end: f64,
    /// Position of the first handle arc.
    pub handle_start: f64,
    /// Distance from each handle arc back to its ellipse centre.
    pub handle_reach: f64,
    /// Ellipse loops between the base and the rim.
    pub bowl_loops: usize,
    /// Arcs along the handle.
    pub handle_loops: usize,
    /// Horizontal subdivision level.
    pub subdivide_x: u32,
    /// Spoon centre.
    pub center: DVec2,
}

impl Default for SpoonConfig {
    fn default() -> Self {
        Self {
            length: 140.0,
            width: 50.0,
            height: 40.0,
            thickness: 4.0,
            inset_width: 3.0,
            widths: vec![(0.0, 0.2), (0.2, 1.0), (0.6, 0.8), (0.9, 0.33), (1.0, 0.25)],
            base_span: (40.0 / 130.0, 70.0 / 130.0),
            bowl_end: 80.0 / 130.0,
            handle_start: 90.0 / 130.0,
            handle_reach: 0.2,
            bowl_loops: 6,
            handle_loops: 5,
            subdivide_x: 2,
            center: DVec2::ZERO,
        }
    }
}

impl SpoonConfig {
    /// Width factor at `t`, linear between the table entries.
    pub fn width_factor(&self, t: f64) -> f64 {
        let upper = self.widths.partition_point(|w| w.0 < t);
        match (upper.checked_sub(1).map(|i| self.widths[i]), self.widths.get(upper)) {
            (Some((x0, f0)), Some(&(x1, f1))) if x1 > x0 => f0 + (f1 - f0) * (t - x0) / (x1 - x0),
            (_, Some(&(_, f))) | (Some((_, f)), None) => f,
            (None, None) => 1.0,
        }
    }

    /// Semi-axes of the flat base.
    pub fn base_radii(&self) -> DVec2 {
        DVec2::new(
            (self.base_span.1 - self.base_span.0) / 2.0 * self.length,
            self.width / 4.0,
        )
    }

    fn validate(&self) -> GenResult<()> {
        let (start, end) = self.base_span;
        ensure(
            0.0 < start && start < end && end < self.bowl_end && self.bowl_end < self.handle_start,
            || format!("base {start}..{end}, bowl end and handle start must increase"),
        )?;
        ensure(self.handle_start < 1.0, || {
            format!("handle start {} must lie inside the series", self.handle_start)
        })?;
        ensure(self.bowl_loops >= 1 && self.handle_loops >= 2, || {
            format!(
                "need a bowl loop and two handle arcs, got {} and {}",
                self.bowl_loops, self.handle_loops
            )
        })?;
        ensure(self.thickness > 0.0 && self.handle_reach > 0.0, || {
            format!(
                "thickness {} and handle reach {} must be positive",
                self.thickness, self.handle_reach
            )
        })?;
        ensure(
            self.widths.windows(2).all(|w| w[0].0 <= w[1].0),
            || "width table must be sorted by position".to_string(),
        )?;
        let radii = self.base_radii();
        ensure(radii.min_element() > self.inset_width, || {
            format!("inset {} does not fit the base {radii}", self.inset_width)
        })
    }

    /// Position along the series to X in millimetres, base centred.
    fn x_at(&self, t: f64) -> f64 {
        (t - (self.base_span.0 + self.base_span.1) / 2.0) * self.length
    }

    fn ellipse(&self, radii: DVec2, x: f64) -> LoopFactory {
        LoopFactory::new(LoopShape::Ellipse {
            radius_x: radii.x,
            radius_y: radii.y,
        })
        .at(self.center + DVec2::new(x, 0.0))
    }

    /// Bowl wall positions as `(left, right, level)`, lowest first.
    ///
    /// The rim level is the lower of the two highest values on either side
    /// of the base, so both walls always find a rise.
    pub fn bowl_levels(&self, curve: &DataCurve) -> GenResult<Vec<(f64, f64, f64)>> {
        let (start, end) = self.base_span;
        let peak = |from: f64, to: f64| {
            (0..=LEVEL_SEARCH_STEPS)
                .map(|k| curve.value_at(from + (to - from) * k as f64 / LEVEL_SEARCH_STEPS as f64))
                .fold(0.0f64, f64::max)
        };
        let rim = peak(0.0, start).min(peak(end, self.bowl_end));
        ensure(rim > 0.0, || "data curve does not rise around the base".to_string())?;

        let rise = |from: f64, to: f64, level: f64| {
            (0..=LEVEL_SEARCH_STEPS)
                .map(|k| from + (to - from) * k as f64 / LEVEL_SEARCH_STEPS as f64)
                .find(|&t| curve.value_at(t) >= level)
                .unwrap_or(to)
        };
        Ok((1..=self.bowl_loops)
            .map(|k| {
                let level = rim * k as f64 / self.bowl_loops as f64;
                (rise(start, 0.0, level), rise(end, self.bowl_end, level), level)
            })
            .collect())
    }

    /// Handle stations as `(position, level)`, bowl side first.
    pub fn handle_stations(&self, curve: &DataCurve) -> Vec<(f64, f64)> {
        let span = 1.0 - self.handle_start;
        (0..self.handle_loops)
            .map(|j| {
                let t = self.handle_start + span * j as f64 / (self.handle_loops - 1) as f64;
                (t, curve.value_at(t))
            })
            .collect()
    }
}

/// Stitches the solidified spoon.
pub fn build_mesh(config: &SpoonConfig, curve: &DataCurve) -> GenResult<Mesh> {
    config.validate()?;
    let n = loop_vertices(config.subdivide_x)?;
    let side = n / 4;
    let arc = PartialRange::new(side, 2 * side + 1)?;

    let base = config.base_radii();
    let base_x = config.x_at((config.base_span.0 + config.base_span.1) / 2.0);
    let floor = base - DVec2::splat(config.inset_width / 2.0);

    let mut builder = MeshBuilder::new();
    builder.add_loops(config.ellipse(floor, base_x).emit_cap(n, 0.0, false)?);
    builder.add_loop(config.ellipse(base, base_x).emit_loop(n, 0.0)?);

    let levels = config.bowl_levels(curve)?;
    let rim = levels.last().map_or(0.0, |l| l.2);
    for &(left, right, level) in &levels {
        let mid = (left + right) / 2.0;
        let radii = DVec2::new(
            (right - left) / 2.0 * config.length,
            base.y + (config.width / 2.0 * config.width_factor(mid) - base.y) * level / rim,
        );
        builder.add_loop(
            config
                .ellipse(radii.max(base), config.x_at(mid))
                .emit_loop(n, level * config.height)?,
        );
    }

    for (t, level) in config.handle_stations(curve) {
        let radii = DVec2::new(
            config.handle_reach * config.length,
            config.width / 2.0 * config.width_factor(t),
        );
        let ring = config
            .ellipse(radii, config.x_at(t - config.handle_reach))
            .emit_loop(n, level * config.height)?;
        builder.add_loop(EdgeLoop::open(ring.points().collect()).with_range(arc)?);
    }

    let surface = builder.len();
    builder.solidify(config.thickness)?;
    let loops = builder.len();
    let mesh = builder.build()?;
    info!(
        surface,
        loops,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "built spoon"
    );
    Ok(mesh)
}

/// Generates the spoon record. The leading floor cap is flipped.
pub fn generate(config: &SpoonConfig, curve: &DataCurve) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config, curve)?;
    let n = loop_vertices(config.subdivide_x)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Spoon",
        &mesh,
        DVec3::ZERO,
        0..cap_face_count(n),
    )])
}
