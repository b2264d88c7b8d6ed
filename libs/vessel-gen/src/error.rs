//! # Generator Errors

use loft_mesh::MeshError;
use thiserror::Error;

/// Errors raised while generating or writing a vessel.
#[derive(Debug, Error)]
pub enum GenError {
    /// Stitching, solidifying or joining failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Record serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter table that cannot produce a valid vessel.
    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

impl GenError {
    /// Creates an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type for generator operations.
pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_error_converts() {
        fn stitch() -> GenResult<()> {
            Err(MeshError::shape_mismatch(4, 8, "no rule"))?;
            Ok(())
        }
        assert!(matches!(stitch(), Err(GenError::Mesh(_))));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = GenError::invalid_config("thickness must be positive");
        assert_eq!(err.to_string(), "Invalid config: thickness must be positive");
    }
}
