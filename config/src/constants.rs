//! # Configuration Constants
//!
//! Centralized constants for the loft mesh pipeline. Precision values,
//! loop resolutions, spline parameters and safety limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances and output rounding
//! - **Resolution**: Loop vertex counts and subdivision helpers
//! - **Curves**: B-spline defaults and closed-shape seam handling
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Tolerance below which two heights count as the same plane, and below
/// which a normal is treated as degenerate.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// let z: f64 = 12.5;
/// assert!((z - (z + 1e-12)).abs() < EPSILON);
/// ```
pub const EPSILON: f64 = 1e-10;

/// Number of decimal places kept when coordinates are serialized.
///
/// Rounding is applied exactly once, when a mesh is turned into an
/// output record.
///
/// # Example
///
/// ```rust
/// use config::constants::{round_to_precision, COORDINATE_PRECISION};
///
/// assert_eq!(COORDINATE_PRECISION, 8);
/// assert_eq!(round_to_precision(0.123456789123), 0.12345679);
/// ```
pub const COORDINATE_PRECISION: i32 = 8;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Vertex count of an unsubdivided loop.
///
/// Horizontal subdivision doubles this value, so every loop resolution is a
/// multiple of 16 and therefore cap-compatible.
pub const BASE_VERTICES: usize = 16;

/// Number of raw points in an unsplined rounded rectangle.
///
/// Four points per side: corner, corner plus radius, midpoint, far side
/// minus radius. Requests at or below this count emit the raw points.
pub const ROUNDED_RECT_RAW_POINTS: usize = 16;

/// Start angle of circle loops, in degrees.
///
/// Places vertex 0 on the top-left diagonal, which is where the
/// square-to-disc cap rings start.
///
/// # Example
///
/// ```rust
/// use config::constants::CIRCLE_START_ANGLE_DEG;
///
/// let first = CIRCLE_START_ANGLE_DEG.to_radians();
/// assert!((first.cos() - first.sin()).abs() < 1e-12);
/// ```
pub const CIRCLE_START_ANGLE_DEG: f64 = -135.0;

// =============================================================================
// CURVE CONSTANTS
// =============================================================================

/// Default B-spline degree (cubic).
pub const DEFAULT_SPLINE_DEGREE: usize = 3;

/// Divisor for the seam rotation of sampled closed shapes.
///
/// A closed shape sampled to `n` points is rotated right by `n / 8` so
/// that index 0 lands on the shape's top-left corner.
///
/// # Example
///
/// ```rust
/// use config::constants::SEAM_ROTATION_DIVISOR;
///
/// let vertices = 64;
/// assert_eq!(vertices / SEAM_ROTATION_DIVISOR, 8);
/// ```
pub const SEAM_ROTATION_DIVISOR: usize = 8;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single mesh.
///
/// Prevents memory exhaustion from runaway subdivision settings.
/// 10 million vertices is sufficient for any printable vessel.
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of faces in a single mesh.
pub const MAX_FACES: usize = 10_000_000;

/// Maximum horizontal subdivision level accepted by generators.
///
/// `BASE_VERTICES << MAX_SUBDIVISION` vertices per loop.
pub const MAX_SUBDIVISION: u32 = 8;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Returns the loop resolution for a horizontal subdivision level.
///
/// # Example
///
/// ```rust
/// use config::constants::vertices_per_loop;
///
/// assert_eq!(vertices_per_loop(0), 16);
/// assert_eq!(vertices_per_loop(3), 128);
/// ```
#[inline]
pub fn vertices_per_loop(subdivide_x: u32) -> usize {
    BASE_VERTICES << subdivide_x.min(MAX_SUBDIVISION)
}

/// Returns the loop count of a vertically subdivided span.
///
/// `anchors` loops become `anchors * 2^subdivide_y` loops.
///
/// # Example
///
/// ```rust
/// use config::constants::subdivided_loop_count;
///
/// assert_eq!(subdivided_loop_count(5, 0), 5);
/// assert_eq!(subdivided_loop_count(5, 2), 20);
/// ```
#[inline]
pub fn subdivided_loop_count(anchors: usize, subdivide_y: u32) -> usize {
    anchors << subdivide_y.min(MAX_SUBDIVISION)
}

/// Rounds a coordinate to [`COORDINATE_PRECISION`] decimal places.
#[inline]
pub fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    (value * scale).round() / scale
}

/// Whether two heights lie within [`EPSILON`] of each other.
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(4.0, 4.0 + 1e-12));
/// assert!(!approx_equal(4.0, 4.001));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}
