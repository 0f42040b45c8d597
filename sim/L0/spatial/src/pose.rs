//! Rigid poses.
//!
//! A [`Pose`] places a frame in its parent: a position plus a unit
//! quaternion. Besides points and vectors, poses act on spatial motions,
//! which is how joint axes are carried between frames.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Motion;

/// Position and orientation of a frame relative to its parent.
///
/// # Example
///
/// ```
/// use sim_spatial::Pose;
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
///
/// let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
/// let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in parent coordinates.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from a translation vector (identity rotation).
    #[must_use]
    pub fn from_translation(offset: Vector3<f64>) -> Self {
        Self::from_position(Point3::from(offset))
    }

    /// Create a pose from rotation only (origin position).
    #[must_use]
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            position: Point3::origin(),
            rotation,
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Transform a point from local to parent coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a vector from local to parent coordinates (rotation only).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a point from parent to local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, parent: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (parent - self.position))
    }

    /// Transform a vector from parent to local coordinates.
    #[must_use]
    pub fn inverse_transform_vector(&self, parent: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * parent
    }

    /// Compute the inverse pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv_rotation * self.position.coords)),
            rotation: inv_rotation,
        }
    }

    /// Compose two poses: `self * other`.
    ///
    /// `other` is expressed in the frame of `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(&other.position),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Express a motion given in this pose's local frame in the parent frame.
    ///
    /// The local motion is referenced at the local origin; the result is
    /// referenced at the parent origin:
    /// `ω' = R·ω`, `v' = R·v + p × ω'`.
    #[must_use]
    pub fn transform_motion(&self, local: &Motion) -> Motion {
        let angular = self.rotation * local.angular;
        let linear = self.rotation * local.linear + self.position.coords.cross(&angular);
        Motion::new(angular, linear)
    }

    /// Express a motion given in the parent frame in this pose's local frame.
    ///
    /// Inverse of [`transform_motion`](Self::transform_motion):
    /// `ω' = Rᵀ·ω`, `v' = Rᵀ·(v − p × ω)`.
    #[must_use]
    pub fn inverse_transform_motion(&self, parent: &Motion) -> Motion {
        let inv_rotation = self.rotation.inverse();
        let angular = inv_rotation * parent.angular;
        let linear = inv_rotation * (parent.linear - self.position.coords.cross(&parent.angular));
        Motion::new(angular, linear)
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}
