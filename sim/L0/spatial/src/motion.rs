//! Spatial motion and force vectors.
//!
//! Follows Featherstone's convention, angular part first:
//! - Motion vectors: `[ω, v]` (angular velocity, linear velocity)
//! - Force vectors: `[τ, f]` (torque, force)
//!
//! Both are referenced at a point; [`Motion::shift`] moves that point.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use nalgebra::{UnitQuaternion, Vector3, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 6D spatial vector: `[angular (3), linear (3)]`.
pub type SpatialVector = Vector6<f64>;

/// Spatial motion: velocity, acceleration, or a joint's motion subspace.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Motion {
    /// Angular component (rad/s, or rad/s² for accelerations).
    pub angular: Vector3<f64>,
    /// Linear component of the reference point.
    pub linear: Vector3<f64>,
}

impl Motion {
    /// Create a motion from angular and linear parts.
    #[must_use]
    pub const fn new(angular: Vector3<f64>, linear: Vector3<f64>) -> Self {
        Self { angular, linear }
    }

    /// Zero motion.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            angular: Vector3::zeros(),
            linear: Vector3::zeros(),
        }
    }

    /// Create a motion with an angular part only.
    #[must_use]
    pub fn angular(omega: Vector3<f64>) -> Self {
        Self {
            angular: omega,
            linear: Vector3::zeros(),
        }
    }

    /// Create a motion with a linear part only.
    #[must_use]
    pub fn linear(v: Vector3<f64>) -> Self {
        Self {
            angular: Vector3::zeros(),
            linear: v,
        }
    }

    /// Re-reference the motion from point `A` to point `A + r`.
    ///
    /// `v' = v + ω × r`. The angular part is unchanged.
    #[must_use]
    pub fn shift(&self, r: &Vector3<f64>) -> Self {
        Self {
            angular: self.angular,
            linear: self.linear + self.angular.cross(r),
        }
    }

    /// Rotate both components (no change of reference point).
    #[must_use]
    pub fn rotate(&self, rotation: &UnitQuaternion<f64>) -> Self {
        Self {
            angular: rotation * self.angular,
            linear: rotation * self.linear,
        }
    }

    /// Spatial cross product for motions: `self × m`.
    ///
    /// `(ω×ω_m, ω×v_m + v×ω_m)`
    #[must_use]
    pub fn cross(&self, m: &Self) -> Self {
        Self {
            angular: self.angular.cross(&m.angular),
            linear: self.angular.cross(&m.linear) + self.linear.cross(&m.angular),
        }
    }

    /// Spatial cross product of a motion with a force: `self ×* f`.
    ///
    /// `(ω×τ + v×f, ω×f)`
    #[must_use]
    pub fn cross_force(&self, f: &Force) -> Force {
        Force {
            torque: self.angular.cross(&f.torque) + self.linear.cross(&f.force),
            force: self.angular.cross(&f.force),
        }
    }

    /// Power pairing of a motion with a force: `ω·τ + v·f`.
    #[must_use]
    pub fn dot(&self, f: &Force) -> f64 {
        self.angular.dot(&f.torque) + self.linear.dot(&f.force)
    }

    /// Check if the motion contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.angular.iter().all(|x| x.is_finite()) && self.linear.iter().all(|x| x.is_finite())
    }
}

impl Add for Motion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            angular: self.angular + rhs.angular,
            linear: self.linear + rhs.linear,
        }
    }
}

impl AddAssign for Motion {
    fn add_assign(&mut self, rhs: Self) {
        self.angular += rhs.angular;
        self.linear += rhs.linear;
    }
}

impl Sub for Motion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            angular: self.angular - rhs.angular,
            linear: self.linear - rhs.linear,
        }
    }
}

impl SubAssign for Motion {
    fn sub_assign(&mut self, rhs: Self) {
        self.angular -= rhs.angular;
        self.linear -= rhs.linear;
    }
}

impl Neg for Motion {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            angular: -self.angular,
            linear: -self.linear,
        }
    }
}

impl Mul<f64> for Motion {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            angular: self.angular * rhs,
            linear: self.linear * rhs,
        }
    }
}

impl From<Motion> for SpatialVector {
    fn from(m: Motion) -> Self {
        Self::new(
            m.angular.x,
            m.angular.y,
            m.angular.z,
            m.linear.x,
            m.linear.y,
            m.linear.z,
        )
    }
}

impl From<SpatialVector> for Motion {
    fn from(v: SpatialVector) -> Self {
        Self {
            angular: Vector3::new(v[0], v[1], v[2]),
            linear: Vector3::new(v[3], v[4], v[5]),
        }
    }
}

/// Spatial force: a torque and a force referenced at a point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Force {
    /// Torque about the reference point (N·m).
    pub torque: Vector3<f64>,
    /// Linear force (N).
    pub force: Vector3<f64>,
}

impl Force {
    /// Create a spatial force from torque and force parts.
    #[must_use]
    pub const fn new(torque: Vector3<f64>, force: Vector3<f64>) -> Self {
        Self { torque, force }
    }

    /// Zero force.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            torque: Vector3::zeros(),
            force: Vector3::zeros(),
        }
    }

    /// Check if the force contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.torque.iter().all(|x| x.is_finite()) && self.force.iter().all(|x| x.is_finite())
    }
}

impl Add for Force {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            torque: self.torque + rhs.torque,
            force: self.force + rhs.force,
        }
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Self) {
        self.torque += rhs.torque;
        self.force += rhs.force;
    }
}

impl Sub for Force {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            torque: self.torque - rhs.torque,
            force: self.force - rhs.force,
        }
    }
}

impl Neg for Force {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            torque: -self.torque,
            force: -self.force,
        }
    }
}

impl Mul<f64> for Force {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            torque: self.torque * rhs,
            force: self.force * rhs,
        }
    }
}

impl From<Force> for SpatialVector {
    fn from(f: Force) -> Self {
        Self::new(
            f.torque.x, f.torque.y, f.torque.z, f.force.x, f.force.y, f.force.z,
        )
    }
}

impl From<SpatialVector> for Force {
    fn from(v: SpatialVector) -> Self {
        Self {
            torque: Vector3::new(v[0], v[1], v[2]),
            force: Vector3::new(v[3], v[4], v[5]),
        }
    }
}
