//! Passive joint forces: springs and dampers.
//!
//! `qfrc_passive = -stiffness·q - damping·qd` per dof, with the spring term
//! dropped for joint types whose `q` is not a displacement (free joints).
//! Corresponds to the joint part of MuJoCo's `engine_passive.c`.

use nalgebra::DVector;

use crate::check;
use crate::scan;
use crate::{Mechanism, Result};

/// Passive force per dof.
///
/// Honors the `spring` and `damper` disable flags of the mechanism config.
///
/// # Errors
///
/// [`DynamicsError::ShapeMismatch`](crate::DynamicsError::ShapeMismatch) if
/// `q` or `qd` don't fit the mechanism.
pub fn passive(mech: &Mechanism, q: &DVector<f64>, qd: &DVector<f64>) -> Result<DVector<f64>> {
    check::check_dofs(mech, "q", q)?;
    check::check_dofs(mech, "qd", qd)?;

    let dofs = mech.dofs();
    let disable = mech.config().disable;

    let spring = if disable.spring {
        vec![0.0; mech.dof_count()]
    } else {
        scan::by_joint_type(mech, |group| {
            if group.joint.supports_spring() {
                group.dofs.iter().map(|&d| -dofs[d].stiffness * q[d]).collect()
            } else {
                vec![0.0; group.dofs.len()]
            }
        })?
    };

    Ok(DVector::from_iterator(
        mech.dof_count(),
        spring.iter().zip(dofs).zip(qd.iter()).map(|((&s, dof), &v)| {
            if disable.damper {
                s
            } else {
                s - dof.damping * v
            }
        }),
    ))
}
