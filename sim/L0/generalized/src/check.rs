//! Input validation for the evaluation passes.
//!
//! Lengths are always checked. Finiteness is checked when the mechanism's
//! config has `check_finite` set; the first bad entry is logged and
//! reported.

use nalgebra::DVector;
use sim_spatial::Pose;
use tracing::error;

use crate::com::ComFrame;
use crate::{DynamicsError, Mechanism, Result};

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(DynamicsError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

fn check_values(mech: &Mechanism, what: &'static str, values: &DVector<f64>) -> Result<()> {
    if !mech.config().check_finite {
        return Ok(());
    }
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => {
            error!(input = what, index, value = values[index], "non-finite input rejected");
            Err(DynamicsError::NonFinite { what, index })
        }
        None => Ok(()),
    }
}

/// Check a dof-length vector.
pub(crate) fn check_dofs(mech: &Mechanism, what: &'static str, values: &DVector<f64>) -> Result<()> {
    check_len(what, mech.dof_count(), values.len())?;
    check_values(mech, what, values)
}

/// Check the per-link world poses.
pub(crate) fn check_poses(mech: &Mechanism, x: &[Pose]) -> Result<()> {
    check_len("x", mech.link_count(), x.len())?;
    if !mech.config().check_finite {
        return Ok(());
    }
    match x.iter().position(|p| !p.is_finite()) {
        Some(index) => {
            error!(input = "x", index, "non-finite link pose rejected");
            Err(DynamicsError::NonFinite { what: "x", index })
        }
        None => Ok(()),
    }
}

/// Check that a CoM frame was computed for this mechanism.
pub(crate) fn check_frame(mech: &Mechanism, frame: &ComFrame) -> Result<()> {
    let links = mech.link_count();
    let dofs = mech.dof_count();
    check_len("cinr", links, frame.cinr.len())?;
    check_len("cd", links, frame.cd.len())?;
    check_len("cdof", dofs, frame.cdof.len())?;
    check_len("cdofd", dofs, frame.cdofd.len())
}
