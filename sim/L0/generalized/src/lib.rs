//! Generalized-coordinate dynamics for articulated rigid-body trees.
//!
//! Given a [`Mechanism`] (a single kinematic tree of links and joints) and
//! one state (`q`, `qd` and world link poses `x` from a kinematics pass),
//! this crate evaluates the force terms of the equation of motion
//! `M(q)·qdd = passive - bias + tau`:
//!
//! ```text
//!   q, qd, x ──► transform_com ──► ComFrame ──┬──► inverse ──► bias
//!                                             │
//!   q, qd ─────────────────────────────────► passive ──► passive
//!                                             │
//!                                   forward = passive - bias + tau
//! ```
//!
//! - [`transform_com`] re-expresses link inertias, velocities and dof
//!   motion subspaces about the mechanism's center of mass.
//! - [`inverse`] runs recursive Newton-Euler on those quantities to get the
//!   Coriolis, centrifugal and gravity force.
//! - [`passive`] evaluates joint springs and dampers.
//! - [`forward`] combines the terms. The mass matrix solve is not part of
//!   this crate.
//!
//! Traversals are expressed through [`scan`]: joint-type grouped maps plus
//! root-to-leaf and leaf-to-root tree scans.
//!
//! # Quick Start
//!
//! ```
//! use sim_generalized::{Mechanism, forward, transform_com};
//! use sim_spatial::Pose;
//! use nalgebra::{DVector, Vector3};
//!
//! let mech = Mechanism::n_link_pendulum(2, 1.0, 1.0)?;
//! let q = DVector::zeros(2);
//! let qd = DVector::from_vec(vec![0.5, -0.5]);
//! // At q = 0 the chain hangs straight down.
//! let x = vec![
//!     Pose::from_translation(Vector3::new(0.0, 0.0, -1.0)),
//!     Pose::from_translation(Vector3::new(0.0, 0.0, -2.0)),
//! ];
//!
//! let frame = transform_com(&mech, &q, &qd, &x)?;
//! let net = forward(&mech, &q, &qd, &frame, &DVector::zeros(2))?;
//! assert_eq!(net.len(), 2);
//! # Ok::<(), sim_generalized::DynamicsError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: (de)serialize mechanisms and configuration. A deserialized
//!   [`Mechanism`] is validated exactly like one built in code.
//! - `parallel`: evaluate [`BatchDynamics`] states on the rayon pool.

#![doc(html_root_url = "https://docs.rs/sim-generalized/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::option_if_let_else,         // if-let is often more readable than map_or_else
    clippy::missing_errors_doc,         // Error docs on the top-level passes
    clippy::module_name_repetitions,    // JointType in mechanism::joint etc.
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Mechanism description, joint types and construction
pub mod mechanism;

// Evaluation configuration (gravity, disable flags)
pub mod config;

// Tree traversal primitives
pub mod scan;

// Dynamics passes
pub mod com;
pub mod forward;
pub mod inverse;
pub mod passive;

// Batched evaluation (N independent states sharing one Mechanism)
pub mod batch;

mod check;
mod error;

pub use batch::{BatchDynamics, GeneralizedState};
pub use com::{ComFrame, transform_com};
pub use config::{DisableFlags, DynamicsConfig, Gravity};
pub use error::DynamicsError;
pub use forward::{GeneralizedForces, forward, forward_terms};
pub use inverse::{inverse, link_accelerations, link_forces, subtree_forces};
pub use mechanism::{
    AxisKind, Dof, JointAxis, JointSpec, JointType, Link, LinkSpec, Mechanism, MechanismBuilder,
    MechanismParts, StackedAxes,
};
pub use passive::passive;
pub use scan::JointGroup;

/// Result type for dynamics operations.
pub type Result<T> = std::result::Result<T, DynamicsError>;
