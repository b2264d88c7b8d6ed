//! # Pot
//!
//! An iron-shaped pot: a profile outline with a pointed nose, lofted from
//! the underside inset up the outer wall, in through an elliptical top
//! opening and back down the inner wall. A window of the outer wall next to
//! the nose is culled and annotated as opening `spout`; the spout tube is
//! built concurrently and welded onto it.

use glam::{DVec2, DVec3};
use loft_mesh::{
    cap_face_count, cap_loop, EdgeLoop, JoinSpec, LoopFactory, LoopShape, Mesh, MeshBuilder,
    MeshJoiner, OpeningTag,
};
use tracing::{debug, info};

use super::{ensure, loop_vertices};
use crate::error::{GenError, GenResult};
use crate::record::ObjectRecord;

/// Opening id shared by the pot body and the spout.
pub const SPOUT_OPENING: &str = "spout";

/// Pot parameters in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PotConfig {
    /// Outer extent across the nose axis.
    pub width: f64,
    /// Outer extent along the nose axis.
    pub length: f64,
    /// Overall height including the handle allowance.
    pub height: f64,
    /// Rounding at wall corners.
    pub edge_radius: f64,
    /// Wall thickness.
    pub thickness: f64,
    /// Height of the foot.
    pub base_height: f64,
    /// Height of the underside inset.
    pub base_inset_height: f64,
    /// Depth of the lid seat below the body top.
    pub body_top_inset_height: f64,
    /// Foot width as a fraction of `width`.
    pub base_w: f64,
    /// Foot length as a fraction of `length`.
    pub base_l: f64,
    /// Body scale just above the base.
    pub body_bottom: f64,
    /// Body scale at the shoulder.
    pub body_top: f64,
    /// Body scale of the lid seat.
    pub body_top_inset: f64,
    /// Outer wall station at the centre of the spout window.
    pub spout_row: usize,
    /// Spout length along its axis.
    pub spout_length: f64,
    /// Upward slope of the spout axis.
    pub spout_rise: f64,
    /// Tip scale relative to the window.
    pub spout_taper: f64,
    /// Loops along the spout.
    pub spout_segments: usize,
    /// Horizontal subdivision level.
    pub subdivide_x: u32,
    /// Pot centre.
    pub center: DVec2,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            width: 110.0,
            length: 160.0,
            height: 125.0,
            edge_radius: 4.0,
            thickness: 6.0,
            base_height: 3.0,
            base_inset_height: 3.0,
            body_top_inset_height: 3.0,
            base_w: 0.9,
            base_l: 0.95,
            body_bottom: 0.95,
            body_top: 0.8,
            body_top_inset: 0.7,
            spout_row: 10,
            spout_length: 40.0,
            spout_rise: 0.6,
            spout_taper: 0.6,
            spout_segments: 4,
            subdivide_x: 0,
            center: DVec2::ZERO,
        }
    }
}

/// Where a lid sits on the pot.
#[derive(Debug, Clone, PartialEq)]
pub struct LidSeat {
    /// Outline shared with the pot, in the unit square.
    pub shape: Vec<DVec2>,
    /// Outer length and width of the lid.
    pub outer: DVec2,
    /// Length and width of the plug that drops into the opening.
    pub inner: DVec2,
    /// Height of the seat.
    pub z: f64,
    /// Height of the lid top above its base.
    pub height: f64,
}

/// One cross-section: full extents, height and centre.
#[derive(Debug, Clone, Copy)]
struct Station {
    size: DVec2,
    z: f64,
    center: DVec2,
}

impl PotConfig {
    /// Height of the body shoulder.
    pub fn body_height(&self) -> f64 {
        0.6 * (self.height - self.base_height)
    }

    /// Height where the base flares into the body.
    pub fn body_base_height(&self) -> f64 {
        self.body_height() * 0.2
    }

    /// Radius of the elliptical top opening.
    pub fn top_radius(&self) -> f64 {
        (self.width * self.body_top_inset * 0.82 - self.edge_radius * 2.0) * 0.5
    }

    /// Cross-section outline in the unit square, clockwise from the top
    /// nose with the nose point on the left.
    pub fn shape(&self) -> Vec<DVec2> {
        let edge_x = self.edge_radius / self.length;
        let edge_y = self.edge_radius / self.width;
        let (body1_x, body1_w) = (0.333, 0.7);
        let (body2_x, body2_w) = (0.667, 0.95);
        let (nose_x, nose_w) = (0.05, 0.2);
        let nose_point_w = nose_w * 0.1667;
        let body1_y = (1.0 - body1_w) * 0.5;
        let body2_y = (1.0 - body2_w) * 0.5;
        let nose_y = (1.0 - nose_w) * 0.5;
        let nose_point_y = (1.0 - nose_point_w) * 0.5;
        [
            (nose_x, nose_y),
            (body1_x, body1_y),
            (body2_x, body2_y),
            (1.0 - edge_x, 0.0),
            (1.0, 0.0),
            (1.0, edge_y),
            (1.0, 0.5),
            (1.0, 1.0 - edge_y),
            (1.0, 1.0),
            (1.0 - edge_x, 1.0),
            (body2_x, 1.0 - body2_y),
            (body1_x, 1.0 - body1_y),
            (nose_x, 1.0 - nose_y),
            (0.0, 1.0 - nose_point_y),
            (0.0, 0.5),
            (0.0, nose_point_y),
        ]
        .into_iter()
        .map(|(x, y)| DVec2::new(x, y))
        .collect()
    }

    /// The seat a fitted lid rests on.
    pub fn lid_seat(&self) -> LidSeat {
        let outer = DVec2::new(self.length, self.width) * self.body_top_inset;
        LidSeat {
            shape: self.shape(),
            outer,
            inner: outer - DVec2::splat((self.thickness + self.edge_radius) * 2.0),
            z: self.body_height(),
            height: self.body_top_inset_height * 2.0,
        }
    }

    fn outer_stations(&self) -> Vec<Station> {
        let (l, w) = (self.length, self.width);
        let er = self.edge_radius;
        let bbh = self.body_base_height();
        let bh = self.body_height();
        let inset = DVec2::new(self.base_l * 0.8875 * l, self.base_w * 0.8 * w);
        let foot = DVec2::new(l * self.base_l, w * self.base_w);
        let full = DVec2::new(l, w);
        let top = self.center + DVec2::new(l * 0.05, 0.0);
        let c = self.center;
        let at = |size: DVec2, z: f64, center: DVec2| Station { size, z, center };
        vec![
            at(inset - DVec2::splat(er * 2.0), self.base_inset_height, c),
            at(inset, self.base_inset_height, c),
            at(inset, 0.0, c),
            at(foot, 0.0, c),
            at(foot, self.base_height, c),
            at(full, self.base_height, c),
            at(full, self.base_height + er, c),
            at(full, bbh - er, c),
            at(full, bbh, c),
            at(full * self.body_bottom, bbh + er, c),
            at(full * self.body_bottom, bbh + er * 2.0, c),
            at(full * self.body_top, bh - self.body_top_inset_height, top),
            at(full * self.body_top_inset, bh - self.body_top_inset_height, top),
            at(full * self.body_top_inset, bh, top),
            at(full * self.body_top_inset - DVec2::splat(er), bh, top),
        ]
    }

    fn top_stations(&self) -> Vec<Station> {
        let r = self.top_radius();
        let r_inner = r - 3.0;
        let outer_z = self.body_height() - 3.0;
        let inner_z = outer_z - 3.0;
        let center = self.center + DVec2::new(self.length * 0.1, 0.0);
        [
            (r + 2.0, self.body_height()),
            (r, self.body_height()),
            (r, outer_z),
            (r_inner, outer_z),
            (r_inner, inner_z),
            (r_inner + self.edge_radius, inner_z),
        ]
        .into_iter()
        .map(|(radius, z)| Station {
            size: DVec2::splat(radius),
            z,
            center,
        })
        .collect()
    }

    fn inner_stations(&self) -> Vec<Station> {
        let full = DVec2::new(self.length, self.width);
        let t2 = DVec2::splat(self.thickness * 2.0);
        let er2 = DVec2::splat(self.edge_radius * 2.0);
        let top_z = self.body_height() - 6.0;
        let bottom_z = self.body_base_height();
        let top = self.center + DVec2::new(self.length * 0.05, 0.0);
        let c = self.center;
        let at = |size: DVec2, z: f64, center: DVec2| Station { size, z, center };
        vec![
            at(full * self.body_top - t2 - er2, top_z, top),
            at(full * self.body_top - t2, top_z, top),
            at(full * self.body_bottom - t2, bottom_z + er2.x * 2.0, c),
            at(full * self.body_bottom - t2, bottom_z, c),
            at(full * self.body_bottom - t2 - er2 * 4.0, bottom_z, c),
        ]
    }

    fn validate(&self) -> GenResult<()> {
        let outer = self.outer_stations().len();
        ensure(self.spout_row >= 2 && self.spout_row + 1 < outer, || {
            format!("spout row {} must leave a station on each side", self.spout_row)
        })?;
        ensure(self.spout_segments >= 2, || {
            "spout needs at least 2 segments".to_string()
        })?;
        ensure(self.top_radius() > 3.0, || {
            format!("top radius {} leaves no inner opening", self.top_radius())
        })?;
        ensure(self.body_base_height() - self.edge_radius > self.edge_radius, || {
            "body base too low for its edge rounding".to_string()
        })
    }

    fn profile(&self, station: &Station) -> LoopFactory {
        LoopFactory::new(LoopShape::Profile {
            points: self.shape(),
            width: station.size.x,
            height: station.size.y,
        })
        .at(station.center)
    }
}

fn ellipse(station: &Station) -> LoopFactory {
    LoopFactory::new(LoopShape::Ellipse {
        radius_x: station.size.x,
        radius_y: station.size.y,
    })
    .at(station.center)
}

/// Rim of the 3 x 3 window centred on `(row, col)`, walked around its four
/// sides.
fn window_rim(row: usize, col: usize, n: usize) -> [(usize, usize); 8] {
    let (left, right) = ((col + n - 1) % n, (col + 1) % n);
    [
        (row - 1, left),
        (row - 1, col),
        (row - 1, right),
        (row, right),
        (row + 1, right),
        (row + 1, col),
        (row + 1, left),
        (row, left),
    ]
}

/// Cuts the spout window into `wall` and returns its rim points.
fn cut_spout_window(wall: &mut [EdgeLoop], row: usize) -> GenResult<Vec<DVec3>> {
    let n = wall[row].len();
    let mid = wall[row]
        .centroid()
        .ok_or_else(|| GenError::invalid_config("spout row has no vertices"))?;
    // nose tip: leftmost vertex, nearest the axis among ties
    let col = wall[row]
        .points()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.x.total_cmp(&b.x)
                .then((a.y - mid.y).abs().total_cmp(&(b.y - mid.y).abs()))
        })
        .map_or(0, |(i, _)| i);

    let rim = window_rim(row, col, n);
    let mut points = Vec::with_capacity(rim.len());
    for (position, &(r, c)) in rim.iter().enumerate() {
        points.push(
            wall[r]
                .point(c)
                .ok_or_else(|| GenError::invalid_config("spout rim vertex already culled"))?,
        );
        wall[r].set_tag(
            c,
            OpeningTag::Opening {
                id: SPOUT_OPENING.to_string(),
                position,
                total: rim.len(),
            },
        )?;
    }
    wall[row].cull(col)?;
    debug!(row, col, "cut spout window");
    Ok(points)
}

fn build_spout(config: &PotConfig, rim: &[DVec3]) -> GenResult<Mesh> {
    let centroid = rim.iter().copied().sum::<DVec3>() / rim.len() as f64;
    let axis = DVec3::new(-1.0, 0.0, config.spout_rise).normalize();
    let segments = config.spout_segments;
    let ring = |k: usize| {
        let t = k as f64 / segments as f64;
        let scale = 1.0 + (config.spout_taper - 1.0) * t;
        EdgeLoop::new(
            rim.iter()
                .map(|p| centroid + (*p - centroid) * scale + axis * config.spout_length * t)
                .collect(),
        )
    };

    let mut builder = MeshBuilder::new();
    builder.add_loop(ring(1).with_opening(SPOUT_OPENING));
    for k in 2..segments {
        builder.add_loop(ring(k));
    }
    let tip = ring(segments);
    let cap = cap_loop(&tip, true)?;
    builder.add_loop(tip);
    builder.add_loops(cap.into_iter().skip(1));
    Ok(builder.build()?)
}

fn build_body(config: &PotConfig, n: usize, wall: Vec<EdgeLoop>) -> GenResult<Mesh> {
    let outer = config.outer_stations();
    let mut builder = MeshBuilder::new();
    builder.add_loops(config.profile(&outer[0]).emit_cap(n, outer[0].z, false)?);
    builder.add_loops(wall);
    for station in config.top_stations() {
        builder.add_loop(ellipse(&station).emit_loop(n, station.z)?);
    }
    let inner = config.inner_stations();
    if let Some((last, rest)) = inner.split_last() {
        for station in rest {
            builder.add_loop(config.profile(station).emit_loop(n, station.z)?);
        }
        builder.add_loops(config.profile(last).emit_cap(n, last.z, true)?);
    }
    Ok(builder.build()?)
}

/// Stitches the pot body, builds the spout alongside it and welds the two.
pub fn build_mesh(config: &PotConfig) -> GenResult<Mesh> {
    config.validate()?;
    let n = loop_vertices(config.subdivide_x)?;

    let mut wall = config
        .outer_stations()
        .iter()
        .skip(1)
        .map(|s| config.profile(s).emit_loop(n, s.z))
        .collect::<Result<Vec<_>, _>>()?;
    // wall[i] is outer station i + 1
    let rim = cut_spout_window(&mut wall, config.spout_row - 1)?;

    let (body, spout) = rayon::join(
        || build_body(config, n, wall),
        || build_spout(config, &rim),
    );
    let mesh = MeshJoiner::join(body?, &spout?, &[JoinSpec::new(SPOUT_OPENING)])?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "built pot"
    );
    Ok(mesh)
}

/// Generates the pot record. The leading cap is flipped.
pub fn generate(config: &PotConfig) -> GenResult<Vec<ObjectRecord>> {
    let mesh = build_mesh(config)?;
    let n = loop_vertices(config.subdivide_x)?;
    Ok(vec![ObjectRecord::from_mesh(
        "Pot",
        &mesh,
        DVec3::ZERO,
        0..cap_face_count(n),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_dimensions() {
        let config = PotConfig::default();
        assert_relative_eq!(config.body_height(), 73.2, epsilon = 1e-9);
        assert_relative_eq!(config.body_base_height(), 14.64, epsilon = 1e-9);
        assert_relative_eq!(config.top_radius(), (110.0 * 0.7 * 0.82 - 8.0) * 0.5);
    }

    #[test]
    fn test_shape_nose_points_left() {
        let shape = PotConfig::default().shape();
        assert_eq!(shape.len(), 16);
        assert_eq!(shape[14], DVec2::new(0.0, 0.5));
        assert!(shape.iter().all(|p| (0.0..=1.0).contains(&p.x)));
    }

    #[test]
    fn test_window_rim_wraps_seam() {
        let rim = window_rim(3, 0, 16);
        assert_eq!(rim[0], (2, 15));
        assert_eq!(rim[3], (3, 1));
        assert_eq!(rim[7], (3, 15));
    }

    #[test]
    fn test_spout_consumes_opening() {
        let mesh = build_mesh(&PotConfig::default()).unwrap();
        assert!(mesh.opening(SPOUT_OPENING).is_none());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_lid_seat_fits_inside_body() {
        let config = PotConfig::default();
        let seat = config.lid_seat();
        assert!(seat.inner.x < seat.outer.x && seat.inner.y < seat.outer.y);
        assert!(seat.outer.x < config.length * config.body_top);
        assert_relative_eq!(seat.z, config.body_height());
    }

    #[test]
    fn test_rejects_spout_on_end_station() {
        let config = PotConfig {
            spout_row: 14,
            ..Default::default()
        };
        assert!(build_mesh(&config).is_err());
    }
}
