//! Rigid-body inertia and spatial inertia.
//!
//! [`Inertia`] is the static description of one link: mass, rotational
//! inertia about the center of mass, and where that center of mass sits in
//! the link frame. [`SpatialInertia`] is the same body seen from a reference
//! point in world-aligned axes, ready to multiply spatial motions.

use nalgebra::{Matrix3, Matrix6, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Force, Motion, Pose, SpatialError};

/// Mass properties of a rigid link.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inertia {
    /// Total mass in kg.
    pub mass: f64,
    /// Inertia tensor about the center of mass, in the CoM frame (kg·m²).
    pub inertia: Matrix3<f64>,
    /// Pose of the CoM frame relative to the link frame.
    pub frame: Pose,
}

impl Inertia {
    /// Create mass properties with given values.
    #[must_use]
    pub const fn new(mass: f64, inertia: Matrix3<f64>, frame: Pose) -> Self {
        Self {
            mass,
            inertia,
            frame,
        }
    }

    /// Create mass properties for a point mass at the link origin.
    #[must_use]
    pub fn point_mass(mass: f64) -> Self {
        Self {
            mass,
            inertia: Matrix3::zeros(),
            frame: Pose::identity(),
        }
    }

    /// Create mass properties for a uniform sphere.
    ///
    /// Inertia of a solid sphere: I = (2/5) * m * r²
    #[must_use]
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 0.4 * mass * radius * radius;
        Self {
            mass,
            inertia: Matrix3::from_diagonal(&Vector3::new(i, i, i)),
            frame: Pose::identity(),
        }
    }

    /// Create mass properties for a uniform box.
    ///
    /// Inertia of a solid box with dimensions (x, y, z):
    /// - Ixx = (1/12) * m * (y² + z²)
    /// - Iyy = (1/12) * m * (x² + z²)
    /// - Izz = (1/12) * m * (x² + y²)
    #[must_use]
    pub fn box_shape(mass: f64, half_extents: Vector3<f64>) -> Self {
        let x2 = 4.0 * half_extents.x * half_extents.x;
        let y2 = 4.0 * half_extents.y * half_extents.y;
        let z2 = 4.0 * half_extents.z * half_extents.z;

        Self {
            mass,
            inertia: Matrix3::from_diagonal(&Vector3::new(
                mass * (y2 + z2) / 12.0,
                mass * (x2 + z2) / 12.0,
                mass * (x2 + y2) / 12.0,
            )),
            frame: Pose::identity(),
        }
    }

    /// Move the CoM frame to `offset` in the link frame.
    #[must_use]
    pub fn with_com(mut self, offset: Point3<f64>) -> Self {
        self.frame.position = offset;
        self
    }

    /// Replace the CoM frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Pose) -> Self {
        self.frame = frame;
        self
    }

    /// Validate that the mass properties are physically valid.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(SpatialError::invalid_inertia(
                "mass must be finite and non-negative",
            ));
        }

        if !self.frame.is_finite() {
            return Err(SpatialError::invalid_inertia("CoM frame must be finite"));
        }

        if !self.inertia.iter().all(|x| x.is_finite()) {
            return Err(SpatialError::invalid_inertia(
                "inertia tensor must be finite",
            ));
        }

        // Physical inertia is positive semi-definite.
        let eigenvalues = self.inertia.symmetric_eigenvalues();
        if eigenvalues.iter().any(|&e| e < -1e-10) {
            return Err(SpatialError::invalid_inertia(
                "inertia tensor must be positive semi-definite",
            ));
        }

        Ok(())
    }
}

/// Spatial inertia of a rigid body about a reference point.
///
/// Stored as mass, first moment `h = m·c` (with `c` the CoM relative to the
/// reference point) and rotational inertia about the reference point, all
/// in world-aligned axes. The equivalent 6×6 matrix is
///
/// ```text
/// I = [ i      [h]×  ]
///     [ [h]×ᵀ  m·1₃  ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialInertia {
    /// Total mass.
    pub mass: f64,
    /// First mass moment `m·c` about the reference point.
    pub h: Vector3<f64>,
    /// Rotational inertia about the reference point.
    pub rotational: Matrix3<f64>,
}

impl Default for SpatialInertia {
    fn default() -> Self {
        Self::zero()
    }
}

impl SpatialInertia {
    /// Massless inertia.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            mass: 0.0,
            h: Vector3::zeros(),
            rotational: Matrix3::zeros(),
        }
    }

    /// Place a rigid body's inertia relative to a reference point.
    ///
    /// `placement.position` is the CoM relative to the reference point and
    /// `placement.rotation` orients the CoM frame in world axes. The
    /// rotational inertia follows the parallel axis theorem:
    /// `i = R·I·Rᵀ + m·(|c|²·1₃ − c·cᵀ)`.
    #[must_use]
    pub fn from_body(body: &Inertia, placement: &Pose) -> Self {
        let rot = placement.rotation.to_rotation_matrix();
        let c = placement.position.coords;
        let i_world = rot.matrix() * body.inertia * rot.matrix().transpose();
        let parallel = Matrix3::identity() * c.norm_squared() - c * c.transpose();

        Self {
            mass: body.mass,
            h: c * body.mass,
            rotational: i_world + parallel * body.mass,
        }
    }

    /// Center of mass relative to the reference point, if the body has mass.
    #[must_use]
    pub fn com_offset(&self) -> Option<Vector3<f64>> {
        (self.mass > 0.0).then(|| self.h / self.mass)
    }

    /// Apply the inertia to a motion, producing a spatial force.
    ///
    /// `τ = i·ω + h×v`, `f = m·v − h×ω`.
    #[must_use]
    pub fn mul(&self, m: &Motion) -> Force {
        Force {
            torque: self.rotational * m.angular + self.h.cross(&m.linear),
            force: m.linear * self.mass - self.h.cross(&m.angular),
        }
    }

    /// 6×6 matrix form (rows 0-2 angular, rows 3-5 linear).
    #[must_use]
    pub fn to_matrix(&self) -> Matrix6<f64> {
        let skew = self.h.cross_matrix();
        let mut out = Matrix6::zeros();
        out.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotational);
        out.fixed_view_mut::<3, 3>(0, 3).copy_from(&skew);
        out.fixed_view_mut::<3, 3>(3, 0).copy_from(&skew.transpose());
        out.fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&(Matrix3::identity() * self.mass));
        out
    }
}

impl std::ops::Add for SpatialInertia {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            mass: self.mass + rhs.mass,
            h: self.h + rhs.h,
            rotational: self.rotational + rhs.rotational,
        }
    }
}
