//! Error types for spatial algebra operations.

use thiserror::Error;

/// Errors raised by spatial algebra operations.
///
/// These are precondition violations: the caller handed in buffers whose
/// shapes do not agree, or mass data that cannot describe a rigid body.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    /// Index and value buffers of a scatter have different lengths.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// A scatter index points past the end of the target buffer.
    #[error("index {index} out of bounds for buffer of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the target buffer.
        len: usize,
    },

    /// Invalid rigid-body inertia.
    #[error("invalid inertia: {reason}")]
    InvalidInertia {
        /// Description of what's wrong.
        reason: String,
    },
}

impl SpatialError {
    /// Create an invalid inertia error.
    #[must_use]
    pub fn invalid_inertia(reason: impl Into<String>) -> Self {
        Self::InvalidInertia {
            reason: reason.into(),
        }
    }

    /// Check if this is a shape error (length or index).
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::IndexOutOfBounds { .. }
        )
    }
}
