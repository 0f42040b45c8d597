//! Error types for mechanism construction and dynamics evaluation.

use sim_spatial::SpatialError;
use thiserror::Error;

/// Errors raised while building a mechanism or evaluating its dynamics.
///
/// Every variant is a caller error: a malformed mechanism description or
/// inputs whose shape or values do not fit the mechanism. Nothing here is
/// transient, so nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DynamicsError {
    /// An input's length doesn't match the mechanism.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which input was malformed (`"q"`, `"qd"`, `"x"`, ...).
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// Unrecognized or unsupported joint type.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// More than one link has no parent.
    #[error("mechanism is a forest with {roots} roots; only a single tree is supported")]
    Forest {
        /// Number of root links found.
        roots: usize,
    },

    /// No link is a root.
    #[error("mechanism has no root link")]
    NoRoot,

    /// The parent relation loops back on itself.
    #[error("parent chain of link {link} contains a cycle")]
    CyclicTree {
        /// A link whose ancestor chain never reaches the root.
        link: usize,
    },

    /// A parent index is out of range or refers to the link itself.
    #[error("link {link} has invalid parent {parent}")]
    InvalidParent {
        /// The offending link.
        link: usize,
        /// Its declared parent.
        parent: usize,
    },

    /// The mechanism has no links.
    #[error("mechanism has no links")]
    EmptyMechanism,

    /// A dof's motion subspace or coefficients are malformed.
    #[error("invalid dof {dof}: {reason}")]
    InvalidDof {
        /// The offending dof index.
        dof: usize,
        /// Description of what's wrong.
        reason: String,
    },

    /// Invalid mass properties.
    #[error("invalid mass properties: {reason}")]
    InvalidMass {
        /// Description of what's wrong.
        reason: String,
    },

    /// An input contains `NaN` or `Inf`.
    #[error("non-finite value in {what} at index {index}")]
    NonFinite {
        /// Which input held the value.
        what: &'static str,
        /// Index of the first bad entry.
        index: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A spatial algebra precondition failed.
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

impl DynamicsError {
    /// Create an invalid dof error.
    #[must_use]
    pub fn invalid_dof(dof: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDof {
            dof,
            reason: reason.into(),
        }
    }

    /// Create an invalid mass properties error.
    #[must_use]
    pub fn invalid_mass(reason: impl Into<String>) -> Self {
        Self::InvalidMass {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this error describes malformed input shapes.
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        match self {
            Self::ShapeMismatch { .. } => true,
            Self::Spatial(e) => e.is_shape_error(),
            _ => false,
        }
    }

    /// Check if this error describes a malformed tree topology.
    #[must_use]
    pub fn is_topology_error(&self) -> bool {
        matches!(
            self,
            Self::Forest { .. }
                | Self::NoRoot
                | Self::CyclicTree { .. }
                | Self::InvalidParent { .. }
                | Self::EmptyMechanism
        )
    }
}
