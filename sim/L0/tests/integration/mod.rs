//! Integration tests for the generalized dynamics crates.
//!
//! These tests verify end-to-end behavior of the evaluation pipeline:
//! - Closed-form chains (static gravity torques, Coriolis terms)
//! - Physical invariants (CoM, force conservation, linearity, determinism)
//! - Motion subspaces against finite-differenced kinematics
//! - Mechanism descriptions through serde
//! - Batched evaluation

pub mod common;
pub mod description;
pub mod subspace;
