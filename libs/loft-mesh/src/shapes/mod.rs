//! # Loop Factory
//!
//! Closed 2D outlines placed at a height: circles, ellipses, rounded
//! rectangles and arbitrary profiles. Every outline starts on its top-left
//! corner and walks top, right, bottom, left, so loops of different shapes
//! with the same size line up vertex for vertex, and so a loop can be closed
//! by the matching [`cap`] rings.

pub mod cap;


use config::constants::{CIRCLE_START_ANGLE_DEG, ROUNDED_RECT_RAW_POINTS};
use glam::{DVec2, DVec3};

use crate::curve::sample_closed_shape;
use crate::edge_loop::EdgeLoop;
use crate::error::{MeshError, MeshResult};
use cap::CapGrid;

/// Outline variants.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopShape {
    /// Regular polygon starting at -135 degrees.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// Square-to-disc mapped ellipse; `size` must be a multiple of 4.
    Ellipse {
        /// Semi-axis along X.
        radius_x: f64,
        /// Semi-axis along Y.
        radius_y: f64,
    },
    /// Rectangle with rounded corners, splined above 16 points.
    RoundedRect {
        /// Full width.
        width: f64,
        /// Full height.
        height: f64,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Closed profile in the unit square, scaled to `width x height`.
    Profile {
        /// Control points in `[0, 1]²`.
        points: Vec<DVec2>,
        /// Full width.
        width: f64,
        /// Full height.
        height: f64,
    },
}

/// An outline placed at a centre, able to emit loops and caps.
///
/// # Example
///
/// ```rust
/// use loft_mesh::{LoopFactory, LoopShape};
///
/// let factory = LoopFactory::new(LoopShape::Ellipse { radius_x: 20.0, radius_y: 10.0 });
/// let ring = factory.emit_loop(32, 5.0).unwrap();
/// assert_eq!(ring.len(), 32);
///
/// let cap = factory.emit_cap(32, 0.0, false).unwrap();
/// let sizes: Vec<usize> = cap.iter().map(|l| l.len()).collect();
/// assert_eq!(sizes, vec![1, 8, 16, 24, 32]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoopFactory {
    /// Outline kind and dimensions.
    pub shape: LoopShape,
    /// Centre in the XY plane.
    pub center: DVec2,
}

impl LoopFactory {
    /// Creates a factory centred on the origin.
    pub fn new(shape: LoopShape) -> Self {
        Self {
            shape,
            center: DVec2::ZERO,
        }
    }

    /// Moves the centre.
    pub fn at(self, center: DVec2) -> Self {
        Self { center, ..self }
    }

    /// Emits a closed loop at height `z`.
    ///
    /// Rounded rectangles and profiles may return more points than `size`
    /// when `size` is below their raw point count.
    pub fn emit_loop(&self, size: usize, z: f64) -> MeshResult<EdgeLoop> {
        let points = self.outline(size)?;
        Ok(EdgeLoop::new(
            points.into_iter().map(|p| (p + self.center).extend(z)).collect(),
        ))
    }

    /// Emits the concentric cap rings closing a loop of `size` at height `z`.
    ///
    /// Centre first unless `reverse`; the outermost ring equals
    /// [`emit_loop`](Self::emit_loop) for circles and ellipses, and is the
    /// emitted outline itself for rectangles and profiles.
    pub fn emit_cap(&self, size: usize, z: f64, reverse: bool) -> MeshResult<Vec<EdgeLoop>> {
        let center = self.center;
        let grid = match &self.shape {
            LoopShape::Circle { radius } => {
                let r = *radius;
                CapGrid::from_square_map(size, |x, y| {
                    (square_to_disc(x, y) * r + center).extend(z)
                })?
            }
            LoopShape::Ellipse { radius_x, radius_y } => {
                let scale = DVec2::new(*radius_x, *radius_y);
                CapGrid::from_square_map(size, |x, y| {
                    (square_to_disc(x, y) * scale + center).extend(z)
                })?
            }
            LoopShape::RoundedRect { .. } | LoopShape::Profile { .. } => {
                let perimeter: Vec<DVec3> = self
                    .outline(size)?
                    .into_iter()
                    .map(|p| (p + center).extend(z))
                    .collect();
                CapGrid::from_perimeter(&perimeter)?
            }
        };
        Ok(grid.rings(reverse))
    }

    /// The outline relative to the centre.
    pub fn outline(&self, size: usize) -> MeshResult<Vec<DVec2>> {
        if size == 0 {
            return Err(MeshError::invalid_input("loop size must be positive"));
        }
        match &self.shape {
            LoopShape::Circle { radius } => Ok(circle(size, *radius)),
            LoopShape::Ellipse { radius_x, radius_y } => {
                ellipse(size, DVec2::new(*radius_x, *radius_y))
            }
            LoopShape::RoundedRect {
                width,
                height,
                corner_radius,
            } => rounded_rect(size, *width, *height, *corner_radius),
            LoopShape::Profile {
                points,
                width,
                height,
            } => profile(points, size, *width, *height),
        }
    }
}

// =============================================================================
// OUTLINES
// =============================================================================

/// Maps the square `[-1, 1]²` onto the unit disc.
#[inline]
pub fn square_to_disc(x: f64, y: f64) -> DVec2 {
    DVec2::new(
        x * (1.0 - y * y / 2.0).sqrt(),
        y * (1.0 - x * x / 2.0).sqrt(),
    )
}

fn circle(size: usize, radius: f64) -> Vec<DVec2> {
    let start = CIRCLE_START_ANGLE_DEG.to_radians();
    (0..size)
        .map(|i| {
            let angle = start + std::f64::consts::TAU * i as f64 / size as f64;
            DVec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Walks the border of `[-1, 1]²` with `e` points per side.
fn square_border(e: usize) -> impl Iterator<Item = (f64, f64)> {
    let t = move |i: usize| i as f64 / e as f64 * 2.0 - 1.0;
    let top = (0..e).map(move |i| (t(i), -1.0));
    let right = (0..e).map(move |i| (1.0, t(i)));
    let bottom = (0..e).map(move |i| (-t(i), 1.0));
    let left = (0..e).map(move |i| (-1.0, -t(i)));
    top.chain(right).chain(bottom).chain(left)
}

fn ellipse(size: usize, radii: DVec2) -> MeshResult<Vec<DVec2>> {
    if size % 4 != 0 {
        return Err(MeshError::invalid_input(format!(
            "ellipse loops need a multiple of 4 vertices, got {size}"
        )));
    }
    Ok(square_border(size / 4)
        .map(|(x, y)| square_to_disc(x, y) * radii)
        .collect())
}

fn rounded_rect(size: usize, width: f64, height: f64, radius: f64) -> MeshResult<Vec<DVec2>> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    if radius < 0.0 || radius > hw.min(hh) {
        return Err(MeshError::invalid_input(format!(
            "corner radius {radius} does not fit a {width} x {height} rectangle"
        )));
    }
    let raw = vec![
        DVec2::new(-hw, -hh),
        DVec2::new(-hw + radius, -hh),
        DVec2::new(0.0, -hh),
        DVec2::new(hw - radius, -hh),
        DVec2::new(hw, -hh),
        DVec2::new(hw, -hh + radius),
        DVec2::new(hw, 0.0),
        DVec2::new(hw, hh - radius),
        DVec2::new(hw, hh),
        DVec2::new(hw - radius, hh),
        DVec2::new(0.0, hh),
        DVec2::new(-hw + radius, hh),
        DVec2::new(-hw, hh),
        DVec2::new(-hw, hh - radius),
        DVec2::new(-hw, 0.0),
        DVec2::new(-hw, -hh + radius),
    ];
    if size <= ROUNDED_RECT_RAW_POINTS {
        Ok(raw)
    } else {
        sample_closed_shape(&raw, size)
    }
}

fn profile(points: &[DVec2], size: usize, width: f64, height: f64) -> MeshResult<Vec<DVec2>> {
    if points.len() < 3 {
        return Err(MeshError::invalid_input("profile needs at least 3 points"));
    }
    let unit = if size > points.len() {
        sample_closed_shape(points, size)?
    } else {
        points.to_vec()
    };
    let scale = DVec2::new(width, height);
    Ok(unit.into_iter().map(|p| p * scale - scale / 2.0).collect())
}
