//! # Mesh Errors
//!
//! Error types for loop generation, stitching and mesh joining.

use thiserror::Error;

/// Errors that can occur while building a loft mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Two adjacent loops have no supported bridging rule.
    #[error("Shape mismatch: cannot bridge {left} and {right} vertices ({reason})")]
    ShapeMismatch {
        left: usize,
        right: usize,
        reason: String,
    },

    /// An opening is missing on one side of a join or has unfilled positions.
    #[error("Incomplete opening '{id}': {filled} of {total} positions filled")]
    IncompleteOpening {
        id: String,
        filled: usize,
        total: usize,
    },

    /// A non-flat loop has a neighbour of different cardinality.
    #[error("Solidify aborted at loop {index}: {expected} vertices next to a loop of {found}")]
    SolidifyAbort {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Parameters outside the supported domain.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },
}

impl MeshError {
    /// Creates a shape mismatch error.
    pub fn shape_mismatch(left: usize, right: usize, reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            left,
            right,
            reason: reason.into(),
        }
    }

    /// Creates an incomplete opening error.
    pub fn incomplete_opening(id: impl Into<String>, filled: usize, total: usize) -> Self {
        Self::IncompleteOpening {
            id: id.into(),
            filled,
            total,
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type for loft mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = MeshError::shape_mismatch(12, 16, "difference is not a multiple of 8");
        let message = err.to_string();
        assert!(message.contains("12"));
        assert!(message.contains("16"));
        assert!(message.contains("multiple of 8"));
    }

    #[test]
    fn test_incomplete_opening_message() {
        let err = MeshError::incomplete_opening("spout", 3, 8);
        assert_eq!(
            err.to_string(),
            "Incomplete opening 'spout': 3 of 8 positions filled"
        );
    }
}
