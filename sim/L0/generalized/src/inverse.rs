//! Recursive Newton-Euler inverse dynamics.
//!
//! With every quantity referenced at the mechanism CoM, RNE reduces to
//! three stages:
//!
//! 1. Forward pass: link accelerations `cdd = cdd_parent + Σ cdofd·qd`,
//!    seeded at the root with `-gravity` so gravity shows up as an
//!    inertial force.
//! 2. Per link: `f = I·a + v ×* (I·v)`.
//! 3. Backward pass: sum link forces into their ancestors, then project
//!    each dof's subtree force onto its motion subspace.
//!
//! The result is the bias force `C(q, qd)·qd + g(q)`.

use nalgebra::DVector;
use sim_spatial::{Force, Motion, index_sum};

use crate::check;
use crate::com::ComFrame;
use crate::scan;
use crate::{Mechanism, Result};

/// Link accelerations about the CoM, gravity included.
pub fn link_accelerations(
    mech: &Mechanism,
    qd: &DVector<f64>,
    frame: &ComFrame,
) -> Result<Vec<Motion>> {
    check::check_dofs(mech, "qd", qd)?;
    check::check_frame(mech, frame)?;

    let cdofd_qd: Vec<Motion> = frame
        .cdofd
        .iter()
        .zip(qd.iter())
        .map(|(s, &v)| *s * v)
        .collect();
    let mut own = vec![Motion::zero(); mech.link_count()];
    index_sum(&mut own, mech.dof_link(), &cdofd_qd)?;

    let seed = Motion::linear(-mech.gravity());
    Ok(scan::forward(mech, seed, |parent, link| *parent + own[link]))
}

/// Force each link needs on its own to follow `cdd`.
///
/// `cfrc = cinr·cdd + cd ×* (cinr·cd)`, before any subtree summation.
#[must_use]
pub fn link_forces(frame: &ComFrame, cdd: &[Motion]) -> Vec<Force> {
    frame
        .cinr
        .iter()
        .zip(&frame.cd)
        .zip(cdd)
        .map(|((inertia, v), a)| inertia.mul(a) + v.cross_force(&inertia.mul(v)))
        .collect()
}

/// Sum link forces over subtrees.
#[must_use]
pub fn subtree_forces(mech: &Mechanism, forces: Vec<Force>) -> Vec<Force> {
    scan::backward(mech, forces, |parent, child| *parent += *child)
}

/// Bias force `C(q, qd)·qd + g(q)`, one entry per dof.
///
/// # Errors
///
/// [`DynamicsError::ShapeMismatch`](crate::DynamicsError::ShapeMismatch) if
/// `qd` or `frame` don't fit the mechanism.
pub fn inverse(mech: &Mechanism, qd: &DVector<f64>, frame: &ComFrame) -> Result<DVector<f64>> {
    let cdd = link_accelerations(mech, qd, frame)?;
    let cfrc = subtree_forces(mech, link_forces(frame, &cdd));

    let dof_link = mech.dof_link();
    Ok(DVector::from_iterator(
        mech.dof_count(),
        frame
            .cdof
            .iter()
            .zip(dof_link)
            .map(|(s, &link)| s.dot(&cfrc[link])),
    ))
}
