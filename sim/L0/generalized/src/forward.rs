//! Net generalized force for forward dynamics.
//!
//! `qfrc = qfrc_passive - qfrc_bias + tau` is the right-hand side of
//! `M(q)·qdd = qfrc`. Solving for `qdd` needs the mass matrix and is left to
//! the caller.

use nalgebra::DVector;

use crate::check;
use crate::com::ComFrame;
use crate::inverse::inverse;
use crate::passive::passive;
use crate::{Mechanism, Result};

/// The terms of the forward-dynamics force balance.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizedForces {
    /// Spring and damper forces.
    pub passive: DVector<f64>,
    /// Coriolis, centrifugal and gravity forces, `C(q, qd)·qd + g(q)`.
    pub bias: DVector<f64>,
    /// `passive - bias + tau`.
    pub net: DVector<f64>,
}

/// Compute passive, bias and net force in one go.
///
/// # Errors
///
/// Shape and finiteness errors from [`passive`] and [`inverse`], and
/// [`DynamicsError::ShapeMismatch`](crate::DynamicsError::ShapeMismatch) if
/// `tau` has the wrong length.
pub fn forward_terms(
    mech: &Mechanism,
    q: &DVector<f64>,
    qd: &DVector<f64>,
    frame: &ComFrame,
    tau: &DVector<f64>,
) -> Result<GeneralizedForces> {
    check::check_dofs(mech, "tau", tau)?;
    let passive = passive(mech, q, qd)?;
    let bias = inverse(mech, qd, frame)?;
    let net = &passive - &bias + tau;
    Ok(GeneralizedForces { passive, bias, net })
}

/// Net generalized force `passive - bias + tau`.
pub fn forward(
    mech: &Mechanism,
    q: &DVector<f64>,
    qd: &DVector<f64>,
    frame: &ComFrame,
    tau: &DVector<f64>,
) -> Result<DVector<f64>> {
    forward_terms(mech, q, qd, frame, tau).map(|terms| terms.net)
}
