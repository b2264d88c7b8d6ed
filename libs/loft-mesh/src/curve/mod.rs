//! # Curve Sampler
//!
//! Uniform B-spline evaluation over a control polygon, open (clamped) or
//! periodic, returning evenly spaced samples in parameter space.
//!
//! ## Algorithm
//!
//! ```text
//! open:     knots = clamp([0..count+degree] - degree, 0, count - degree)
//!           u in [0, count - degree]
//! periodic: control polygon wrapped to count + degree + 1 points
//!           knots = [-degree, 1 - degree, ...]
//!           u in [1, count + 1]   (one full period)
//! ```
//!
//! Each sample is evaluated with de Boor's algorithm.

use config::constants::{DEFAULT_SPLINE_DEGREE, EPSILON, SEAM_ROTATION_DIVISOR};
use glam::DVec3;
use std::ops::{Add, Mul};

use crate::edge_loop::EdgeLoop;
use crate::error::{MeshError, MeshResult};


/// Anything that can be blended by a spline: `f64`, `DVec2`, `DVec3`.
pub trait ControlPoint: Copy + Add<Output = Self> + Mul<f64, Output = Self> {}

impl<T> ControlPoint for T where T: Copy + Add<Output = T> + Mul<f64, Output = T> {}

// =============================================================================
// SAMPLER
// =============================================================================

/// B-spline sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveSampler {
    /// Requested degree; clamped to what the control polygon supports.
    pub degree: usize,
    /// Treat the control polygon as closed.
    pub periodic: bool,
}

impl Default for CurveSampler {
    fn default() -> Self {
        Self::open()
    }
}

impl CurveSampler {
    /// Clamped open cubic spline; interpolates both end points.
    pub fn open() -> Self {
        Self {
            degree: DEFAULT_SPLINE_DEGREE,
            periodic: false,
        }
    }

    /// Closed cubic spline over the wrapped control polygon.
    pub fn periodic() -> Self {
        Self {
            degree: DEFAULT_SPLINE_DEGREE,
            periodic: true,
        }
    }

    /// Overrides the degree.
    pub fn with_degree(self, degree: usize) -> Self {
        Self { degree, ..self }
    }

    /// Samples `n` evenly spaced points.
    ///
    /// A periodic sample of `count + 1` points starts and ends on the same
    /// point. A single control point yields `n` copies of it.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidInput`] for an empty control polygon.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loft_mesh::CurveSampler;
    ///
    /// let ramp = CurveSampler::open().sample(&[0.0, 1.0, 2.0, 3.0], 7).unwrap();
    /// assert_eq!(ramp.len(), 7);
    /// assert!((ramp[0] - 0.0).abs() < 1e-12);
    /// assert!((ramp[6] - 3.0).abs() < 1e-12);
    /// ```
    pub fn sample<T: ControlPoint>(&self, control: &[T], n: usize) -> MeshResult<Vec<T>> {
        let Some(first) = control.first() else {
            return Err(MeshError::invalid_input("spline needs at least one control point"));
        };
        if control.len() == 1 {
            return Ok(vec![*first; n]);
        }
        let spline = if self.periodic {
            Spline::periodic(control, self.degree.max(1))
        } else {
            Spline::open(control, self.degree.clamp(1, control.len() - 1))
        };
        Ok(spline.sample(n))
    }
}

/// Knot vector, coefficients and parameter domain ready for evaluation.
struct Spline<T> {
    degree: usize,
    knots: Vec<f64>,
    coeffs: Vec<T>,
    domain: (f64, f64),
}

impl<T: ControlPoint> Spline<T> {
    fn open(control: &[T], degree: usize) -> Self {
        let count = control.len();
        let top = (count - degree) as f64;
        let knots = (0..count + degree + 1)
            .map(|i| (i as f64 - degree as f64).clamp(0.0, top))
            .collect();
        Self {
            degree,
            knots,
            coeffs: control.to_vec(),
            domain: (0.0, top),
        }
    }

    fn periodic(control: &[T], degree: usize) -> Self {
        let count = control.len();
        let coeffs: Vec<T> = (0..count + degree + 1).map(|i| control[i % count]).collect();
        let knots = (0..coeffs.len() + degree + 1)
            .map(|i| i as f64 - degree as f64)
            .collect();
        Self {
            degree,
            knots,
            coeffs,
            domain: (1.0, (count + 1) as f64),
        }
    }

    fn sample(&self, n: usize) -> Vec<T> {
        let (lo, hi) = self.domain;
        match n {
            0 => Vec::new(),
            1 => vec![self.eval(lo)],
            _ => (0..n)
                .map(|k| self.eval(lo + (hi - lo) * k as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// Index `k` with `knots[k] <= u < knots[k + 1]`, clamped to the valid spans.
    fn span(&self, u: f64) -> usize {
        let last = self.coeffs.len() - 1;
        let mut k = self.degree;
        while k < last && self.knots[k + 1] <= u {
            k += 1;
        }
        k
    }

    fn eval(&self, u: f64) -> T {
        let p = self.degree;
        let k = self.span(u);
        let mut d: Vec<T> = (0..=p).map(|j| self.coeffs[j + k - p]).collect();
        for r in 1..=p {
            for j in (r..=p).rev() {
                let left = self.knots[j + k - p];
                let right = self.knots[j + 1 + k - r];
                let denom = right - left;
                let alpha = if denom.abs() < EPSILON {
                    0.0
                } else {
                    (u - left) / denom
                };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }
        d[p]
    }
}

// =============================================================================
// SHAPE HELPERS
// =============================================================================

/// Samples a closed shape to exactly `vertices` points.
///
/// The periodic curve is sampled at `vertices + 1` points, the duplicate seam
/// sample is dropped and the result is rotated right by `vertices / 8` so
/// index 0 sits on the shape's top-left corner.
pub fn sample_closed_shape<T: ControlPoint>(control: &[T], vertices: usize) -> MeshResult<Vec<T>> {
    let mut points = CurveSampler::periodic().sample(control, vertices + 1)?;
    points.pop();
    if !points.is_empty() {
        let shift = vertices / SEAM_ROTATION_DIVISOR % points.len();
        points.rotate_right(shift);
    }
    Ok(points)
}

/// Resamples a loop stack to `target` loops.
///
/// Every vertex column is splined across the stack with the open sampler, so
/// the first and last loops are reproduced exactly. Closedness follows the
/// first loop; annotations and ranges are not carried.
///
/// # Errors
///
/// - [`MeshError::ShapeMismatch`] if loops differ in cardinality
/// - [`MeshError::InvalidInput`] if any slot is culled or the stack is empty
pub fn resample_loops(loops: &[EdgeLoop], target: usize) -> MeshResult<Vec<EdgeLoop>> {
    let Some(first) = loops.first() else {
        return Err(MeshError::invalid_input("cannot resample an empty loop stack"));
    };
    let width = first.len();
    let mut columns: Vec<Vec<DVec3>> = vec![Vec::with_capacity(loops.len()); width];
    for edge_loop in loops {
        if edge_loop.len() != width {
            return Err(MeshError::shape_mismatch(
                width,
                edge_loop.len(),
                "resampled loops need equal cardinality",
            ));
        }
        for (column, slot) in columns.iter_mut().zip(edge_loop.slots()) {
            let p = slot
                .point()
                .ok_or_else(|| MeshError::invalid_input("cannot resample culled vertices"))?;
            column.push(p);
        }
    }

    let sampler = CurveSampler::open();
    let sampled = columns
        .iter()
        .map(|column| sampler.sample(column, target))
        .collect::<MeshResult<Vec<_>>>()?;

    Ok((0..target)
        .map(|row| {
            let points = sampled.iter().map(|column| column[row]).collect();
            if first.is_closed() {
                EdgeLoop::new(points)
            } else {
                EdgeLoop::open(points)
            }
        })
        .collect())
}
