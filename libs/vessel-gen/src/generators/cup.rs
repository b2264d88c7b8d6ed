//! # Cup
//!
//! A round-footed cup that flares into a rounded-square lip. The stack runs
//! from the underside inset, out over the foot, up the outer wall, over the
//! lip and back down the inner wall to a reversed inner base cap. The
//! anchor loops between the two caps are resampled vertically, and an
//! optional image relief is pressed into the inner neck.

use glam::{DVec2, DVec3};
use loft_mesh::{
    cap_face_count, resample_loops, DisplacementEngine, GridProjection, GridSignal, LoopFactory,
    LoopShape, Mesh, MeshBuilder, SampleGrid,
};
use tracing::info;

use super::{check_vertical, ensure, loop_vertices, resampled_count};
use crate::error::GenResult;
use crate::record::ObjectRecord;

/// Fraction of the displaced span skipped before the relief starts.
const RELIEF_LEAD: f64 = 0.05;

/// Cup parameters in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct CupConfig {
    /// Outer width of the rounded-square lip.
    pub top_width: f64,
    /// Overall height.
    pub height: f64,
    /// Drop from the lip to the outer and inner top loops.
    pub top_lip: f64,
    /// Corner radius of the rounded-square loops.
    pub top_corner_radius: f64,
    /// Wall thickness.
    pub thickness: f64,
    /// Maximum relief depth.
    pub displacement_depth: f64,
    /// Height of the underside inset.
    pub base_inset_height: f64,
    /// Helper distance at the foot corners.
    pub base_edge_radius: f64,
    /// Horizontal subdivision level.
    pub subdivide_x: u32,
    /// Vertical subdivision level of the wall span.
    pub subdivide_y: u32,
    /// Loop centre.
    pub center: DVec2,
}

impl Default for CupConfig {
    fn default() -> Self {
        Self {
            top_width: 70.0,
            height: 66.0,
            top_lip: 2.5,
            top_corner_radius: 15.0,
            thickness: 4.8,
            displacement_depth: 3.0,
            base_inset_height: 3.0,
            base_edge_radius: 1.0,
            subdivide_x: 5,
            subdivide_y: 6,
            center: DVec2::ZERO,
        }
    }
}

impl CupConfig {
    /// Outer diameter of the foot.
    pub fn base_outer_diameter(&self) -> f64 {
        self.top_width * 0.56
    }

    /// Diameter where the foot meets the ground on the inside.
    pub fn base_inner_diameter(&self) -> f64 {
        self.base_outer_diameter() * 0.8
    }

    /// Diameter of the underside inset.
    pub fn base_inset_diameter(&self) -> f64 {
        self.base_inner_diameter() * 0.9
    }

    /// Outer diameter at the widest part of the body.
    pub fn body_diameter(&self) -> f64 {
        self.top_width * 0.875
    }

    /// Outer width at the neck.
    pub fn neck_diameter(&self) -> f64 {
        self.body_diameter()
    }

    /// Inner diameter of the body.
    pub fn body_inner_diameter(&self) -> f64 {
        self.body_diameter() - self.thickness * 2.0
    }

    /// Inner width of the neck.
    pub fn neck_inner_diameter(&self) -> f64 {
        self.neck_diameter() - self.thickness * 2.0
    }

    /// Diameter of the flat inner floor.
    pub fn inner_base_diameter(&self) -> f64 {
        self.body_inner_diameter() * 0.667
    }

    /// Height of the foot.
    pub fn base_height(&self) -> f64 {
        self.height * 0.0667
    }

    /// Height of the widest body loop.
    pub fn body_height(&self) -> f64 {
        self.height * 0.167
    }

    /// Height of the neck loops.
    pub fn neck_height(&self) -> f64 {
        self.height * 0.85
    }

    /// Height of the inner floor.
    pub fn inner_base_height(&self) -> f64 {
        self.base_height() + self.thickness
    }

    /// Height of the inner body loop.
    pub fn inner_body_height(&self) -> f64 {
        self.body_height() * 1.3
    }

    fn validate(&self) -> GenResult<()> {
        check_vertical(self.subdivide_y)?;
        ensure(self.thickness > 0.0, || {
            format!("thickness {} must be positive", self.thickness)
        })?;
        let inner_top = self.top_width - self.thickness * 2.0;
        ensure(self.top_corner_radius * 2.0 <= self.neck_inner_diameter().min(inner_top), || {
            format!(
                "corner radius {} does not fit the inner neck",
                self.top_corner_radius
            )
        })?;
        ensure(self.inner_base_height() < self.inner_body_height(), || {
            "inner floor sits above the inner body".to_string()
        })
    }
}

/// Stitches the cup, pressing `relief` into the inner neck if given.
pub fn build_mesh(config: &CupConfig, relief: Option<&SampleGrid>) -> GenResult<Mesh> {
    config.validate()?;
    let n = loop_vertices(config.subdivide_x)?;
    let circle = |diameter: f64| {
        LoopFactory::new(LoopShape::Circle {
            radius: diameter * 0.5,
        })
        .at(config.center)
    };
    let square = |width: f64| {
        LoopFactory::new(LoopShape::RoundedRect {
            width,
            height: width,
            corner_radius: config.top_corner_radius,
        })
        .at(config.center)
    };

    let inset = config.base_inset_diameter();
    let inner = config.base_inner_diameter();
    let outer = config.base_outer_diameter();
    let inner_base = config.inner_base_diameter();
    let body_inner = config.body_inner_diameter();

    let mut builder = MeshBuilder::new();
    builder.add_loops(circle(inset * 0.98).emit_cap(n, config.base_inset_height, false)?);
    let span_start = builder.len();

    // underside inset, out and down to the foot
    builder.add_loop(circle(inset).emit_loop(n, config.base_inset_height)?);
    builder.add_loop(circle((inset + inner) * 0.5).emit_loop(n, config.base_inset_height)?);
    builder.add_loop(circle(inner).emit_loop(n, 0.0)?);
    let base_outer = circle(outer).emit_loop(n, 0.0)?;
    builder.add_helper_loop(&base_outer, config.base_edge_radius)?;
    builder.add_loop(base_outer);
    let base = circle(outer).emit_loop(n, config.base_height())?;
    builder.add_helper_loop(&base, config.base_edge_radius)?;
    builder.add_loop(base);

    // outer wall and lip
    builder.add_loop(circle(config.body_diameter()).emit_loop(n, config.body_height())?);
    builder.add_loop(square(config.neck_diameter()).emit_loop(n, config.neck_height())?);
    builder.add_loop(square(config.top_width).emit_loop(n, config.height - config.top_lip)?);
    builder.add_loop(square(config.top_width - config.thickness).emit_loop(n, config.height)?);
    builder.add_loop(
        square(config.top_width - config.thickness * 2.0)
            .emit_loop(n, config.height - config.top_lip)?,
    );

    // inner wall down to the floor
    let relief_start = builder.len();
    builder.add_loop(square(config.neck_inner_diameter()).emit_loop(n, config.neck_height())?);
    builder.add_loop(circle(body_inner).emit_loop(n, config.inner_body_height())?);
    let relief_end = builder.len();
    builder.add_loop(
        circle((inner_base + body_inner) * 0.5).emit_loop(n, config.inner_base_height())?,
    );
    builder.add_loop(circle(inner_base).emit_loop(n, config.inner_base_height())?);
    let span_end = builder.len();

    builder.add_loops(circle(inner_base * 0.98).emit_cap(n, config.inner_base_height(), true)?);

    let anchors = builder.loops()[span_start..span_end].to_vec();
    let wall = resample_loops(&anchors, resampled_count(anchors.len(), config.subdivide_y))?;
    let span_len = wall.len();
    builder.replace_loops(span_start..span_end, wall)?;

    if let Some(grid) = relief {
        let delta = (relief_end - relief_start) << config.subdivide_y;
        let start = span_start
            + ((relief_start - span_start) << config.subdivide_y)
            + (RELIEF_LEAD * delta as f64) as usize;
        let end = (start + delta).min(span_start + span_len);
        if end > start {
            let signal = GridSignal::new(grid, GridProjection::Wrap);
            let displaced = DisplacementEngine::new(&signal, config.displacement_depth)
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
        "built cup"
    );
    Ok(mesh)
}

/// Generates the cup record.
pub fn generate(config: &CupConfig, relief: Option<&SampleGrid>) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config, relief)?;
    let n = loop_vertices(config.subdivide_x)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Cup",
        &mesh,
        DVec3::ZERO,
        0..cap_face_count(n),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use approx::assert_relative_eq;

    fn coarse() -> CupConfig {
        CupConfig {
            subdivide_x: 0,
            subdivide_y: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_dimensions() {
        let config = CupConfig::default();
        assert_relative_eq!(config.base_outer_diameter(), 39.2, epsilon = 1e-9);
        assert_relative_eq!(config.body_inner_diameter(), 51.65, epsilon = 1e-9);
        assert_relative_eq!(config.inner_base_height(), 66.0 * 0.0667 + 4.8, epsilon = 1e-9);
    }

    #[test]
    fn test_coarse_cup_is_valid() {
        let mesh = build_mesh(&coarse(), None).unwrap();
        assert!(mesh.validate().is_ok());
        // Resampled wall stays inside the hull of its anchors
        let (min, max) = mesh.bounding_box();
        assert!(min.z > -1e-9);
        assert!(max.z <= 66.0 + 1e-9 && max.z > 60.0);
    }

    #[test]
    fn test_relief_keeps_topology() {
        let plain = build_mesh(&coarse(), None).unwrap();
        let grid = SampleGrid::from_gray(2, 2, &[0, 255, 255, 0]).unwrap();
        let relief = build_mesh(&coarse(), Some(&grid)).unwrap();
        assert_eq!(plain.vertex_count(), relief.vertex_count());
        assert_eq!(plain.faces(), relief.faces());
        assert_ne!(plain.vertices(), relief.vertices());
    }

    #[test]
    fn test_generate_flips_leading_cap() {
        let records = generate(&coarse(), None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Cup");
        assert_eq!(records[0].flip_faces, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_rejects_excess_vertical_subdivision() {
        let config = CupConfig {
            subdivide_y: 9,
            ..coarse()
        };
        let grid = SampleGrid::from_gray(1, 1, &[0]).unwrap();
        assert!(matches!(
            build_mesh(&config, Some(&grid)),
            Err(GenError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_corner() {
        let config = CupConfig {
            top_corner_radius: 40.0,
            ..coarse()
        };
        assert!(build_mesh(&config, None).is_err());
    }
}
