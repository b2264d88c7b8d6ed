//! # Pot Lid
//!
//! A lid cut to the pot's outline: a plug that drops into the opening, a
//! flange resting on the seat and a flat top. The top's innermost loop
//! carries opening `knob`; the knob is lofted from ellipse loops at the
//! same time and welded on.

use glam::DVec2;
use loft_mesh::{
    cap_face_count, emboss_z, EdgeLoop, JoinSpec, LoopFactory, LoopShape, Mesh, MeshBuilder,
    MeshJoiner, SampleGrid,
};
use tracing::info;

use super::pot::{LidSeat, PotConfig};
use super::{ensure, loop_vertices};
use crate::error::GenResult;
use crate::record::ObjectRecord;

/// Opening id shared by the lid and the knob.
pub const KNOB_OPENING: &str = "knob";

/// Lid parameters in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PotLidConfig {
    /// Seat taken from the pot.
    pub seat: LidSeat,
    /// Rounding at the top edge.
    pub edge_radius: f64,
    /// Clearance removed from every length and width.
    pub reduce_amount: f64,
    /// Height of the plug.
    pub base_height: f64,
    /// Wall thickness of the plug.
    pub base_thickness: f64,
    /// Rounding at the plug corners.
    pub base_edge: f64,
    /// Height of the top relief.
    pub relief_depth: f64,
    /// Diameter of the knob top.
    pub knob_top_width: f64,
    /// Height of the knob top.
    pub knob_top_height: f64,
    /// Diameter of the knob neck.
    pub knob_neck_width: f64,
    /// Height of the knob neck.
    pub knob_neck_height: f64,
    /// Rounding at the knob corners.
    pub knob_edge_radius: f64,
    /// Knob offset along the nose axis.
    pub knob_offset_x: f64,
    /// Horizontal subdivision level.
    pub subdivide_x: u32,
    /// Lid centre.
    pub center: DVec2,
}

impl Default for PotLidConfig {
    fn default() -> Self {
        Self::fitted_to(&PotConfig::default())
    }
}

impl PotLidConfig {
    /// Production lid parameters for `pot`.
    pub fn fitted_to(pot: &PotConfig) -> Self {
        Self {
            seat: pot.lid_seat(),
            edge_radius: 4.0,
            reduce_amount: 2.0,
            base_height: 6.0,
            base_thickness: 4.0,
            base_edge: 2.0,
            relief_depth: 4.0,
            knob_top_width: 18.0,
            knob_top_height: 6.0,
            knob_neck_width: 9.0,
            knob_neck_height: 6.0,
            knob_edge_radius: 2.0,
            knob_offset_x: 3.0,
            subdivide_x: pot.subdivide_x,
            center: DVec2::ZERO,
        }
    }

    /// Height of the lid top.
    pub fn top_z(&self) -> f64 {
        self.base_height + self.seat.height
    }

    /// Lid cross-sections as `(length, width, z)`, plug first.
    pub fn stations(&self) -> Vec<(DVec2, f64)> {
        let (inner, outer) = (self.seat.inner, self.seat.outer);
        let er2 = DVec2::splat(self.edge_radius * 2.0);
        let be = self.base_edge;
        let be2 = DVec2::splat(be * 2.0);
        let bt2 = DVec2::splat(self.base_thickness * 2.0);
        let bh = self.base_height;
        let top = self.top_z();
        let plug = inner - bt2;
        [
            (plug - er2, bh),
            (plug, bh),
            (plug, bh - be),
            (plug, be),
            (plug, 0.0),
            (plug + be2, 0.0),
            (inner - be2, 0.0),
            (inner, 0.0),
            (inner, be),
            (inner, bh - be),
            (inner, bh),
            (inner + be2, bh),
            (outer, bh),
            (outer, bh + be),
            (outer, top - be),
            (outer, top),
            (outer - er2, top),
        ]
        .into_iter()
        .map(|(size, z)| (size - DVec2::splat(self.reduce_amount), z))
        .collect()
    }

    /// Knob cross-sections as `(diameter, z)`.
    pub fn knob_stations(&self) -> Vec<(f64, f64)> {
        let her2 = self.knob_edge_radius * 2.0;
        let neck_z = self.top_z();
        let neck_top = neck_z + self.knob_neck_height;
        vec![
            (self.knob_neck_width + her2, neck_z),
            (self.knob_neck_width, neck_z),
            (self.knob_neck_width, neck_z + her2),
            (self.knob_neck_width, neck_top),
            (self.knob_top_width - her2, neck_top),
            (self.knob_top_width, neck_top),
            (self.knob_top_width, neck_top + self.knob_top_height),
            (self.knob_top_width - her2, neck_top + self.knob_top_height),
        ]
    }

    fn validate(&self) -> GenResult<()> {
        let smallest = self
            .stations()
            .first()
            .map_or(DVec2::ZERO, |(size, _)| *size);
        ensure(smallest.min_element() > 0.0, || {
            format!("plug {smallest} collapses after clearance")
        })?;
        ensure(self.seat.shape.len() >= 3, || {
            "lid outline needs at least 3 points".to_string()
        })?;
        let knob_reach = self.knob_offset_x.abs() + self.knob_top_width * 0.5;
        ensure(knob_reach * 2.0 < self.seat.outer.min_element(), || {
            format!("knob reaches {knob_reach} past the lid top")
        })
    }

    fn outline(&self, size: DVec2) -> LoopFactory {
        LoopFactory::new(LoopShape::Profile {
            points: self.seat.shape.clone(),
            width: size.x,
            height: size.y,
        })
        .at(self.center)
    }
}

fn build_lid(config: &PotLidConfig, n: usize, relief: Option<&SampleGrid>) -> GenResult<Mesh> {
    let stations = config.stations();
    let mut loops: Vec<EdgeLoop> = Vec::new();
    for (i, (size, z)) in stations.iter().enumerate() {
        let factory = config.outline(*size);
        if i == 0 {
            loops.extend(factory.emit_cap(n, *z, false)?);
        } else {
            loops.push(factory.emit_loop(n, *z)?);
        }
    }
    if let Some(grid) = relief {
        // the knob seat stays level with the knob
        let seat = loops.len() - 1;
        let half = config.seat.outer * 0.5;
        let embossed = emboss_z(
            &loops[..seat],
            grid,
            (config.center - half, config.center + half),
            config.relief_depth,
            config.top_z(),
        );
        for (dst, src) in loops.iter_mut().zip(embossed) {
            *dst = src;
        }
    }
    if let Some(last) = loops.pop() {
        loops.push(last.with_opening(KNOB_OPENING));
    }

    let mut builder = MeshBuilder::new();
    builder.add_loops(loops);
    Ok(builder.build()?)
}

fn build_knob(config: &PotLidConfig, n: usize) -> GenResult<Mesh> {
    let center = config.center + DVec2::new(config.knob_offset_x, 0.0);
    let stations = config.knob_stations();
    let last = stations.len() - 1;
    let mut builder = MeshBuilder::new();
    for (i, (width, z)) in stations.into_iter().enumerate() {
        let r = width * 0.5;
        let factory = LoopFactory::new(LoopShape::Ellipse {
            radius_x: r,
            radius_y: r,
        })
        .at(center);
        match i {
            0 => builder.add_loop(factory.emit_loop(n, z)?.with_opening(KNOB_OPENING)),
            i if i == last => builder.add_loops(factory.emit_cap(n, z, true)?),
            _ => builder.add_loop(factory.emit_loop(n, z)?),
        };
    }
    Ok(builder.build()?)
}

/// Stitches the lid and knob concurrently and welds them together.
pub fn build_mesh(config: &PotLidConfig, relief: Option<&SampleGrid>) -> GenResult<Mesh> {
    config.validate()?;
    let n = loop_vertices(config.subdivide_x)?;
    let (lid, knob) = rayon::join(
        || build_lid(config, n, relief),
        || build_knob(config, n),
    );
    let mesh = MeshJoiner::join(lid?, &knob?, &[JoinSpec::new(KNOB_OPENING)])?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        relief = relief.is_some(),
        "built pot lid"
    );
    Ok(mesh)
}

/// Generates the lid record, located on the pot's seat.
pub fn generate(config: &PotLidConfig, relief: Option<&SampleGrid>) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config, relief)?;
    let n = loop_vertices(config.subdivide_x)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Pot lid",
        &mesh,
        config.center.extend(config.seat.z),
        0..cap_face_count(n),
    )])
}
