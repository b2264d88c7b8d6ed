//! # Displacement Signals
//!
//! Scalar fields in `[0, 1]` that drive displacement: a pixel grid read
//! through HLS lightness, or a 1-D data curve along the span.

use glam::DVec2;

use super::SamplePoint;
use crate::error::{MeshError, MeshResult};
use config::constants::EPSILON;

/// Displacement strength source.
pub trait DisplacementSignal {
    /// Strength in `[0, 1]` for one vertex.
    fn strength(&self, sample: &SamplePoint) -> f64;
}

// =============================================================================
// SAMPLE GRID
// =============================================================================

/// Row-major RGB pixel grid.
///
/// Decoding images is left to the caller; this only stores and samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl SampleGrid {
    /// Wraps `width * height` RGB pixels, row 0 first.
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> MeshResult<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(MeshError::invalid_input(format!(
                "{} pixels do not fill a {width} x {height} grid",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a grid from single-channel values.
    pub fn from_gray(width: usize, height: usize, values: &[u8]) -> MeshResult<Self> {
        Self::new(width, height, values.iter().map(|&v| [v, v, v]).collect())
    }

    /// Grid width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// HLS lightness of the pixel nearest to `(u, v)`, both in `[0, 1]`.
    pub fn lightness(&self, u: f64, v: f64) -> f64 {
        let col = nearest(u, self.width);
        let row = nearest(v, self.height);
        let [r, g, b] = self.pixels[row * self.width + col];
        let max = r.max(g).max(b) as f64;
        let min = r.min(g).min(b) as f64;
        (max + min) / 2.0 / 255.0
    }
}

#[inline]
fn nearest(t: f64, len: usize) -> usize {
    let scaled = (t.clamp(0.0, 1.0) * (len - 1) as f64).round();
    (scaled as usize).min(len - 1)
}

/// How a vertex maps into grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridProjection {
    /// `u` runs backwards around the loop, `v` along the span.
    Wrap,
    /// `u, v` from X/Y normalized into `[min, max]`.
    Planar {
        /// Lower XY corner.
        min: DVec2,
        /// Upper XY corner.
        max: DVec2,
    },
}

/// A [`SampleGrid`] read as `1 - lightness`, so dark pixels push deepest.
#[derive(Debug, Clone, Copy)]
pub struct GridSignal<'a> {
    grid: &'a SampleGrid,
    projection: GridProjection,
}

impl<'a> GridSignal<'a> {
    /// Pairs a grid with a projection.
    pub fn new(grid: &'a SampleGrid, projection: GridProjection) -> Self {
        Self { grid, projection }
    }
}

impl DisplacementSignal for GridSignal<'_> {
    fn strength(&self, sample: &SamplePoint) -> f64 {
        let (u, v) = match self.projection {
            GridProjection::Wrap => (1.0 - sample.around, sample.along),
            GridProjection::Planar { min, max } => {
                let span = max - min;
                let norm = |x: f64, lo: f64, size: f64| {
                    if size.abs() < EPSILON {
                        0.0
                    } else {
                        (x - lo) / size
                    }
                };
                (
                    norm(sample.position.x, min.x, span.x),
                    norm(sample.position.y, min.y, span.y),
                )
            }
        };
        1.0 - self.grid.lightness(u, v)
    }
}

// =============================================================================
// DATA CURVE
// =============================================================================

/// Piecewise-linear 1-D series with positions and values normalized to
/// `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use loft_mesh::DataCurve;
///
/// let curve = DataCurve::new(vec![(10.0, 5.0), (20.0, 15.0), (30.0, 5.0)]).unwrap();
/// assert_eq!(curve.value_at(0.0), 0.0);
/// assert_eq!(curve.value_at(0.5), 1.0);
/// assert_eq!(curve.value_at(0.25), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataCurve {
    samples: Vec<(f64, f64)>,
}

impl DataCurve {
    /// Normalizes `(position, value)` pairs; order does not matter.
    ///
    /// A constant series normalizes to all zeros.
    pub fn new(mut samples: Vec<(f64, f64)>) -> MeshResult<Self> {
        if samples.len() < 2 {
            return Err(MeshError::invalid_input("data curve needs at least 2 samples"));
        }
        if samples.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(MeshError::invalid_input("data curve samples must be finite"));
        }
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (x0, x1) = (samples[0].0, samples[samples.len() - 1].0);
        if x1 - x0 < EPSILON {
            return Err(MeshError::invalid_input("data curve positions are all equal"));
        }
        let (lo, hi) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.1), hi.max(s.1))
            });
        let range = hi - lo;
        let samples = samples
            .into_iter()
            .map(|(x, y)| {
                let v = if range < EPSILON { 0.0 } else { (y - lo) / range };
                ((x - x0) / (x1 - x0), v)
            })
            .collect();
        Ok(Self { samples })
    }

    /// Linearly interpolated value at `t`, clamped to the ends.
    pub fn value_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let upper = self.samples.partition_point(|s| s.0 < t);
        if upper == 0 {
            return self.samples[0].1;
        }
        let Some(&(x1, y1)) = self.samples.get(upper) else {
            return self.samples[self.samples.len() - 1].1;
        };
        let (x0, y0) = self.samples[upper - 1];
        if x1 - x0 < EPSILON {
            y1
        } else {
            y0 + (y1 - y0) * (t - x0) / (x1 - x0)
        }
    }

    /// `n` evenly spaced values from start to end.
    pub fn resample(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.value_at(0.0)],
            _ => (0..n)
                .map(|k| self.value_at(k as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

impl DisplacementSignal for DataCurve {
    fn strength(&self, sample: &SamplePoint) -> f64 {
        self.value_at(sample.along)
    }
}
