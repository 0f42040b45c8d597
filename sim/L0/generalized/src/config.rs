//! Configuration for dynamics evaluation.
//!
//! A [`DynamicsConfig`] is fixed when a [`Mechanism`](crate::Mechanism) is
//! built and read on every evaluation: the uniform gravity field, which
//! force terms are switched off, and whether inputs are screened for
//! non-finite values.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DynamicsError;

/// Uniform gravitational field in world axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Acceleration of a free particle (m/s²).
    pub acceleration: Vector3<f64>,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::earth()
    }
}

impl Gravity {
    /// 9.81 m/s² along world -Z.
    #[must_use]
    pub fn earth() -> Self {
        Self::custom(Vector3::new(0.0, 0.0, -9.81))
    }

    /// No field.
    #[must_use]
    pub fn zero() -> Self {
        Self::custom(Vector3::zeros())
    }

    /// Field with an arbitrary acceleration, e.g. tilted for a sloped base.
    #[must_use]
    pub const fn custom(acceleration: Vector3<f64>) -> Self {
        Self { acceleration }
    }
}

/// Force terms that can be switched off without editing the mechanism.
///
/// Mirrors MuJoCo's `disableflags` for the terms this core computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisableFlags {
    /// Evaluate as if gravity were zero.
    pub gravity: bool,
    /// Drop joint stiffness from the passive force.
    pub spring: bool,
    /// Drop joint damping from the passive force.
    pub damper: bool,
}

/// Configuration for a mechanism's dynamics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DynamicsConfig {
    /// Gravity configuration.
    pub gravity: Gravity,
    /// Disabled force terms.
    pub disable: DisableFlags,
    /// Reject NaN/Inf in q, qd, link poses and actuation.
    pub check_finite: bool,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            gravity: Gravity::earth(),
            disable: DisableFlags::default(),
            check_finite: true,
        }
    }
}

impl DynamicsConfig {
    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity (zero-G environment).
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Gravity::zero();
        self
    }

    /// Set the disabled force terms.
    #[must_use]
    pub fn disable(mut self, flags: DisableFlags) -> Self {
        self.disable = flags;
        self
    }

    /// Skip the non-finite input screening.
    #[must_use]
    pub fn without_finite_checks(mut self) -> Self {
        self.check_finite = false;
        self
    }

    /// Gravity actually applied during evaluation.
    #[must_use]
    pub fn effective_gravity(&self) -> Vector3<f64> {
        if self.disable.gravity {
            Vector3::zeros()
        } else {
            self.gravity.acceleration
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.gravity.acceleration.iter().all(|g| g.is_finite()) {
            return Err(DynamicsError::invalid_config("gravity must be finite"));
        }
        Ok(())
    }
}
