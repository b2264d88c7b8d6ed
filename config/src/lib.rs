//! # Config Crate
//!
//! Shared constants for the loft mesh engine and the vessel generators:
//! tolerances, output rounding, loop resolutions, spline defaults and the
//! vertex and face ceilings.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{round_to_precision, vertices_per_loop, BASE_VERTICES};
//!
//! // each horizontal subdivision doubles the loop resolution
//! assert_eq!(vertices_per_loop(0), BASE_VERTICES);
//! assert_eq!(vertices_per_loop(2), BASE_VERTICES * 4);
//!
//! assert_eq!(round_to_precision(0.1234567891), 0.12345679);
//! ```
//!
//! Loop resolutions stay multiples of 8 so every loop can be closed by a
//! concentric quad cap.

pub mod constants;

#[cfg(test)]
mod tests;
