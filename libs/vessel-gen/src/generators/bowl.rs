//! # Bowl
//!
//! A round bowl lofted from a single open B-spline through its
//! cross-section: underside inset, foot, outer wall, lip, inner wall and
//! inner floor. Both ends close on a pole vertex with a triangle fan. An
//! optional data curve swells a band of rows below the lip.

use glam::{DVec2, DVec3};
use loft_mesh::{
    DataCurve, DisplacementEngine, EdgeLoop, LoopFactory, LoopShape, Mesh, MeshBuilder,
};
use tracing::info;

use super::{ensure, spline_profile};
use crate::error::GenResult;
use crate::record::ObjectRecord;

/// Bowl parameters in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct BowlConfig {
    /// Outer diameter at the lip.
    pub width: f64,
    /// Overall height.
    pub height: f64,
    /// Outer diameter of the foot.
    pub base_width: f64,
    /// Height of the foot.
    pub base_height: f64,
    /// Rounding at the inset and the lip.
    pub edge_radius: f64,
    /// Wall thickness.
    pub thickness: f64,
    /// Rounding at the outer foot.
    pub base_edge_radius: f64,
    /// Maximum depth of the data-curve band.
    pub displace_amount: f64,
    /// Vertices per loop.
    pub columns: usize,
    /// Loops sampled along the profile.
    pub loops: usize,
    /// Rows in the relief band.
    pub relief_rows: usize,
    /// Start of the relief band as a fraction of the profile.
    pub relief_offset: f64,
    /// Loop centre.
    pub center: DVec2,
}

impl Default for BowlConfig {
    fn default() -> Self {
        Self {
            width: 118.0,
            height: 60.0,
            base_width: 55.0,
            base_height: 9.0,
            edge_radius: 4.0,
            thickness: 5.0,
            base_edge_radius: 2.0,
            displace_amount: 1.25,
            columns: 111,
            loops: 120,
            relief_rows: 10,
            relief_offset: 0.515,
            center: DVec2::ZERO,
        }
    }
}

impl BowlConfig {
    /// Diameter of the underside inset.
    pub fn inset_base_width(&self) -> f64 {
        self.base_width - 8.0
    }

    /// Height of the underside inset.
    pub fn inset_base_height(&self) -> f64 {
        self.base_height * 0.5
    }

    /// Diameter where the foot meets the ground on the inside.
    pub fn inner_base_width(&self) -> f64 {
        self.base_width - 6.0
    }

    /// Height of the body loop.
    pub fn body_height(&self) -> f64 {
        (self.height - self.base_height) * 0.1 + self.base_height
    }

    /// Outer diameter of the body loop.
    pub fn body_width(&self) -> f64 {
        self.width * 0.8
    }

    /// Diameter of the inner floor.
    pub fn inner_inset_base_width(&self) -> f64 {
        self.inset_base_width() * 0.5
    }

    /// Cross-section control points as `(diameter, z)`.
    pub fn profile(&self) -> Vec<DVec2> {
        let (er, t) = (self.edge_radius, self.thickness);
        let inset_w = self.inset_base_width();
        let inset_h = self.inset_base_height();
        let inner_floor = self.inner_inset_base_width();
        [
            (inset_w - er * 2.0, inset_h),
            (inset_w, inset_h),
            (inset_w, inset_h * 0.5),
            (self.inner_base_width(), 0.0),
            (self.base_width, 0.0),
            (self.base_width, self.base_edge_radius),
            (self.base_width, self.base_height),
            (self.body_width(), self.body_height()),
            (self.width, self.height - er),
            (self.width, self.height),
            (self.width - t * 2.0, self.height),
            (self.width - t * 2.0, self.height - er),
            (self.body_width() - t * 2.0, self.body_height()),
            (inner_floor, self.base_height + t),
            (inner_floor - er * 2.0, self.base_height + t),
        ]
        .into_iter()
        .map(|(w, z)| DVec2::new(w, z))
        .collect()
    }

    fn validate(&self) -> GenResult<()> {
        ensure(self.columns >= 3, || {
            format!("{} columns cannot form a loop", self.columns)
        })?;
        ensure(self.loops >= 2, || format!("{} loops cannot form a wall", self.loops))?;
        ensure((0.0..=1.0).contains(&self.relief_offset), || {
            format!("relief offset {} outside [0, 1]", self.relief_offset)
        })?;
        ensure(self.inner_inset_base_width() > self.edge_radius * 2.0, || {
            "inner floor narrower than its edge rounding".to_string()
        })
    }
}

/// Stitches the bowl, swelling the relief band by `relief` if given.
pub fn build_mesh(config: &BowlConfig, relief: Option<&DataCurve>) -> GenResult<Mesh> {
    config.validate()?;
    let samples = spline_profile(&config.profile(), config.loops)?;
    let pole = |z: f64| EdgeLoop::new(vec![config.center.extend(z)]);

    let mut builder = MeshBuilder::new();
    if let Some(first) = samples.first() {
        builder.add_loop(pole(first.y));
    }
    for sample in &samples {
        let factory = LoopFactory::new(LoopShape::Circle {
            radius: sample.x * 0.5,
        })
        .at(config.center);
        builder.add_loop(factory.emit_loop(config.columns, sample.y)?);
    }
    if let Some(last) = samples.last() {
        builder.add_loop(pole(last.y));
    }

    if let Some(curve) = relief {
        // stack index = sample index + 1 for the leading pole
        let first = (config.relief_offset * (samples.len() - 1) as f64).round() as usize + 1;
        let start = first.saturating_sub(1).max(1);
        let end = (first + config.relief_rows + 1).min(builder.len() - 1);
        if end > start {
            let displaced = DisplacementEngine::new(curve, config.displace_amount)
                .displace_span(&builder.loops()[start..end])?;
            builder.replace_loops(start..end, displaced)?;
        }
    }

    let loops = builder.len();
    let mesh = builder.build()?;
    info!(
        loops,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        relief = relief.is_some(),
        "built bowl"
    );
    Ok(mesh)
}

/// Generates the bowl record. The leading pole fan is flipped.
pub fn generate(config: &BowlConfig, relief: Option<&DataCurve>) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config, relief)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Bowl",
        &mesh,
        DVec3::ZERO,
        0..config.columns,
    )])
}
