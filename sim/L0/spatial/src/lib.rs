//! Spatial vector algebra for articulated rigid-body dynamics.
//!
//! This crate provides the value types shared by the dynamics pipeline:
//!
//! - [`Pose`] - Rigid placement of a frame (position + orientation)
//! - [`Motion`] - Spatial velocity/acceleration `[ω, v]`
//! - [`Force`] - Spatial force `[τ, f]`
//! - [`Inertia`] - Mass properties of one link
//! - [`SpatialInertia`] - Inertia about a reference point, applied to motions
//! - [`index_sum`] - Scatter-add reduction used to combine dofs per link
//!
//! Everything here is pure math with no pipeline state. Angular components
//! come first in every six-dimensional quantity, following Featherstone.
//!
//! # Example
//!
//! ```
//! use sim_spatial::{Inertia, Motion, Pose, SpatialInertia};
//! use nalgebra::Vector3;
//!
//! // A 2 kg sphere one meter above the reference point.
//! let body = Inertia::sphere(2.0, 0.1);
//! let cinr = SpatialInertia::from_body(&body, &Pose::from_translation(Vector3::z()));
//!
//! // Linear acceleration straight up needs a force of m·a.
//! let f = cinr.mul(&Motion::linear(Vector3::new(0.0, 0.0, 9.81)));
//! assert!((f.force.z - 2.0 * 9.81).abs() < 1e-12);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-spatial/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,         // Error docs added where non-obvious
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

mod error;
mod inertia;
mod motion;
mod pose;
mod reduce;

pub use error::SpatialError;
pub use inertia::{Inertia, SpatialInertia};
pub use motion::{Force, Motion, SpatialVector};
pub use pose::Pose;
pub use reduce::index_sum;

// Re-export math types for convenience
pub use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3};

/// Result type for spatial algebra operations.
pub type Result<T> = std::result::Result<T, SpatialError>;
