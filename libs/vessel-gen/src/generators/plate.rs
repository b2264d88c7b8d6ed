//! # Plate
//!
//! A shallow round plate. The cross-section is an open B-spline through
//! `(diameter, z)` control points, emitted as ellipse loops and closed on
//! both ends by square-to-disc caps. An optional image is embossed into the
//! eating surface from the rim inwards.

use glam::{DVec2, DVec3};
use loft_mesh::{cap_face_count, emboss_z, LoopFactory, LoopShape, Mesh, MeshBuilder, SampleGrid};
use tracing::info;

use super::{check_vertical, ensure, loop_vertices, spline_profile};
use crate::error::GenResult;
use crate::record::ObjectRecord;

/// Plate parameters in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateConfig {
    /// Outer diameter.
    pub width: f64,
    /// Overall height.
    pub height: f64,
    /// Rounding at the inset and the inner floor edge.
    pub edge_radius: f64,
    /// Wall thickness.
    pub thickness: f64,
    /// Height of the base stand.
    pub base_height: f64,
    /// Width of the base stand ring.
    pub base_stand_width: f64,
    /// Lowest height the relief may touch.
    pub min_height: f64,
    /// Maximum relief height.
    pub relief_depth: f64,
    /// Scale of the relief image over the plate diameter.
    pub relief_scale: f64,
    /// Offset of the relief image centre.
    pub relief_offset: DVec2,
    /// Horizontal subdivision level.
    pub subdivide_x: u32,
    /// Vertical subdivision level.
    pub subdivide_y: u32,
    /// Loop centre.
    pub center: DVec2,
}

impl Default for PlateConfig {
    fn default() -> Self {
        let width = 123.0;
        Self {
            width,
            height: 22.0,
            edge_radius: 4.0,
            thickness: 4.5,
            base_height: 8.0,
            base_stand_width: 4.0,
            min_height: 1.5,
            relief_depth: 3.0,
            relief_scale: 1.0,
            relief_offset: DVec2::new(-width * 0.5 * 0.4, 0.0),
            subdivide_x: 4,
            subdivide_y: 4,
            center: DVec2::ZERO,
        }
    }
}

impl PlateConfig {
    /// Diameter of the flat centre.
    pub fn center_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Outer diameter of the base.
    pub fn base_width(&self) -> f64 {
        self.width * 0.6
    }

    /// Inner diameter of the base stand.
    pub fn inner_base_width(&self) -> f64 {
        self.base_width() * 0.8
    }

    /// Diameter of the underside inset.
    pub fn inset_base_width(&self) -> f64 {
        self.inner_base_width() * 0.8
    }

    /// Height of the underside inset.
    pub fn inset_base_height(&self) -> f64 {
        self.base_height * 0.6
    }

    /// Height of the body loop.
    pub fn body_height(&self) -> f64 {
        (self.height - self.base_height) * 0.1 + self.base_height
    }

    /// Outer diameter of the body loop.
    pub fn body_width(&self) -> f64 {
        self.width * 0.8
    }

    /// Height of the eating surface.
    pub fn center_height(&self) -> f64 {
        self.inset_base_height() + self.thickness
    }

    /// Thickness of the rim.
    pub fn top_edge_thickness(&self) -> f64 {
        self.thickness * 1.1
    }

    /// Cross-section control points as `(diameter, z)`.
    pub fn profile(&self) -> Vec<DVec2> {
        let (er, t) = (self.edge_radius, self.thickness);
        let stand = self.inner_base_width() + self.base_stand_width * 2.0;
        [
            (self.inset_base_width() - er, self.inset_base_height()),
            (self.inset_base_width(), self.inset_base_height()),
            (self.inner_base_width(), self.inset_base_height()),
            (self.inner_base_width(), 0.0),
            (stand, 0.0),
            (stand, self.base_height),
            (self.base_width(), self.base_height),
            (self.body_width(), self.body_height()),
            (self.width, self.height - self.top_edge_thickness()),
            (self.width, self.height),
            (self.width - t * 2.0, self.height),
            (self.body_width() - t * 2.0, self.body_height() + t),
            (self.center_width(), self.center_height()),
            (self.center_width() - er * 2.0, self.center_height()),
        ]
        .into_iter()
        .map(|(w, z)| DVec2::new(w, z))
        .collect()
    }

    fn validate(&self) -> GenResult<()> {
        check_vertical(self.subdivide_y)?;
        ensure(self.body_height() + self.thickness > self.center_height(), || {
            format!(
                "body height {} must clear the centre height {}",
                self.body_height() + self.thickness,
                self.center_height()
            )
        })?;
        ensure(
            self.base_width() > self.inner_base_width() + self.base_stand_width * 2.0,
            || "base stand wider than the base".to_string(),
        )
    }
}

/// Stitches the plate, embossing `relief` into the eating surface if given.
pub fn build_mesh(config: &PlateConfig, relief: Option<&SampleGrid>) -> GenResult<Mesh> {
    config.validate()?;
    let n = loop_vertices(config.subdivide_x)?;
    let profile = config.profile();
    let count = profile.len() << config.subdivide_y;
    let samples = spline_profile(&profile, count)?;

    let mut builder = MeshBuilder::new();
    let last = samples.len() - 1;
    for (i, sample) in samples.iter().enumerate() {
        let r = sample.x * 0.5;
        let factory = LoopFactory::new(LoopShape::Ellipse {
            radius_x: r,
            radius_y: r,
        })
        .at(config.center);
        match i {
            0 => builder.add_loops(factory.emit_cap(n, sample.y, false)?),
            i if i == last => builder.add_loops(factory.emit_cap(n, sample.y, true)?),
            _ => builder.add_loop(factory.emit_loop(n, sample.y)?),
        };
    }

    if let Some(grid) = relief {
        let rim = builder
            .loops()
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.z().map(|z| (i, z)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(i, _)| i);
        let half = DVec2::splat(config.width * 0.5 * config.relief_scale);
        let origin = config.center + config.relief_offset;
        let surface = emboss_z(
            &builder.loops()[rim..],
            grid,
            (origin - half, origin + half),
            config.relief_depth,
            config.min_height,
        );
        let end = builder.len();
        builder.replace_loops(rim..end, surface)?;
    }

    let loops = builder.len();
    let mesh = builder.build()?;
    info!(
        loops,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        relief = relief.is_some(),
        "built plate"
    );
    Ok(mesh)
}

/// Generates the plate record. The leading cap is flipped.
pub fn generate(config: &PlateConfig, relief: Option<&SampleGrid>) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config, relief)?;
    let n = loop_vertices(config.subdivide_x)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Plate",
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

    fn coarse() -> PlateConfig {
        PlateConfig {
            subdivide_x: 0,
            subdivide_y: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_dimensions() {
        let config = PlateConfig::default();
        assert_relative_eq!(config.base_width(), 73.8, epsilon = 1e-9);
        assert_relative_eq!(config.center_height(), 9.3, epsilon = 1e-9);
        assert_relative_eq!(config.relief_offset.x, -24.6, epsilon = 1e-9);
    }

    #[test]
    fn test_coarse_plate_counts() {
        let mesh = build_mesh(&coarse(), None).unwrap();
        // Two caps of 1 + 8 + 16 vertices around 12 wall loops
        assert_eq!(mesh.vertex_count(), 2 * 25 + 12 * 16);
        assert_eq!(mesh.face_count(), 2 * cap_face_count(16) + 13 * 16);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_rejects_excess_vertical_subdivision() {
        let config = PlateConfig {
            subdivide_y: 70,
            ..coarse()
        };
        assert!(matches!(
            build_mesh(&config, None),
            Err(GenError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_relief_raises_surface_only() {
        let plain = build_mesh(&coarse(), None).unwrap();
        let grid = SampleGrid::from_gray(1, 1, &[0]).unwrap();
        let embossed = build_mesh(&coarse(), Some(&grid)).unwrap();
        let mut raised = 0;
        for (a, b) in plain.vertices().iter().zip(embossed.vertices()) {
            assert_relative_eq!(a.x, b.x);
            assert_relative_eq!(a.y, b.y);
            assert!(b.z >= a.z);
            if b.z > a.z {
                raised += 1;
            }
        }
        assert!(raised > 0);
        // The underside cap is never touched
        assert_eq!(plain.vertices()[..25], embossed.vertices()[..25]);
    }
}
