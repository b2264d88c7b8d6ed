//! # Sauce Dish
//!
//! A rounded-rectangle dish built as a single outer surface and thickened
//! with [`MeshBuilder::solidify`]: a flat floor cap, a helper ring hugging
//! its rim, and a resampled flaring wall up to the lip.

use glam::{DVec2, DVec3};
use loft_mesh::{cap_face_count, resample_loops, LoopFactory, LoopShape, Mesh, MeshBuilder};
use tracing::info;

use super::{check_vertical, ensure, loop_vertices, resampled_count};
use crate::error::GenResult;
use crate::record::ObjectRecord;

/// Sauce dish parameters in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct SauceDishConfig {
    /// Outer length at the lip.
    pub length: f64,
    /// Outer width at the lip.
    pub width: f64,
    /// Overall height of the outer surface.
    pub height: f64,
    /// Height of the foot.
    pub base_height: f64,
    /// Rounding at the lip and floor edge.
    pub edge_radius: f64,
    /// Corner radius of every loop.
    pub corner_radius: f64,
    /// Wall thickness added by solidify.
    pub thickness: f64,
    /// Inset of the foot from the base outline.
    pub base_thickness: f64,
    /// Horizontal subdivision level.
    pub subdivide_x: u32,
    /// Vertical subdivision level of the wall.
    pub subdivide_y: u32,
    /// Dish centre.
    pub center: DVec2,
}

impl Default for SauceDishConfig {
    fn default() -> Self {
        Self {
            length: 146.0,
            width: 72.0,
            height: 25.0,
            base_height: 6.0,
            edge_radius: 4.0,
            corner_radius: 6.0,
            thickness: 6.0,
            base_thickness: 6.0,
            subdivide_x: 4,
            subdivide_y: 2,
            center: DVec2::ZERO,
        }
    }
}

impl SauceDishConfig {
    /// Length and width of the base outline.
    pub fn base_size(&self) -> DVec2 {
        DVec2::new(self.length, self.width) - DVec2::splat(12.0)
    }

    /// Length and width of the foot ring on the ground.
    pub fn foot_size(&self) -> DVec2 {
        self.base_size() - DVec2::splat(self.base_thickness * 2.0)
    }

    /// Length and width of the floor cap.
    pub fn floor_size(&self) -> DVec2 {
        self.foot_size() - DVec2::splat(self.edge_radius * 2.0)
    }

    /// Wall anchors as `(length and width, z)`, foot ring first.
    pub fn wall_stations(&self) -> Vec<(DVec2, f64)> {
        let lip = DVec2::new(self.length, self.width);
        vec![
            (self.foot_size(), 0.0),
            (self.base_size(), self.base_height),
            (lip, self.height - self.edge_radius),
            (lip, self.height),
        ]
    }

    fn validate(&self) -> GenResult<()> {
        check_vertical(self.subdivide_y)?;
        ensure(self.thickness > 0.0, || {
            format!("thickness {} must be positive", self.thickness)
        })?;
        let floor = self.floor_size();
        ensure(self.corner_radius * 2.0 <= floor.min_element(), || {
            format!("corner radius {} does not fit the floor {floor}", self.corner_radius)
        })
    }

    fn outline(&self, size: DVec2) -> LoopFactory {
        LoopFactory::new(LoopShape::RoundedRect {
            width: size.x,
            height: size.y,
            corner_radius: self.corner_radius,
        })
        .at(self.center)
    }
}

/// Stitches the solidified dish.
pub fn build_mesh(config: &SauceDishConfig) -> GenResult<Mesh> {
    config.validate()?;
    let n = loop_vertices(config.subdivide_x)?;

    let anchors = config
        .wall_stations()
        .into_iter()
        .map(|(size, z)| config.outline(size).emit_loop(n, z))
        .collect::<Result<Vec<_>, _>>()?;
    let wall = resample_loops(&anchors, resampled_count(anchors.len(), config.subdivide_y))?;

    let mut builder = MeshBuilder::new();
    builder.add_loops(config.outline(config.floor_size()).emit_cap(n, 0.0, false)?);
    if let Some(foot) = wall.first() {
        builder.add_helper_loop(foot, config.edge_radius * 0.25)?;
    }
    builder.add_loops(wall);
    let surface = builder.len();
    builder.solidify(config.thickness)?;

    let loops = builder.len();
    let mesh = builder.build()?;
    info!(
        surface,
        loops,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "built sauce dish"
    );
    Ok(mesh)
}

/// Generates the dish record. The leading cap is flipped.
pub fn generate(config: &SauceDishConfig) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config)?;
    let n = loop_vertices(config.subdivide_x)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Sauce dish",
        &mesh,
        DVec3::ZERO,
        0..cap_face_count(n),
    )])
}
