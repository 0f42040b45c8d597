//! Factory methods for common mechanical systems.
//!
//! These constructors produce pre-configured [`Mechanism`] instances for
//! canonical test systems (pendulums, free bodies). Used by inline tests,
//! benchmarks and `sim-generalized-tests`.

use nalgebra::{Matrix3, Vector3};
use sim_spatial::{Inertia, Pose};

use super::{JointSpec, LinkSpec, Mechanism};
use crate::{DynamicsError, Result};

// Small rotational inertia so point masses stay physically valid.
const POINT_INERTIA: f64 = 0.001;

fn bob(mass: f64) -> Inertia {
    Inertia::new(
        mass,
        Matrix3::from_diagonal_element(POINT_INERTIA),
        Pose::identity(),
    )
}

impl Mechanism {
    /// Create an n-link serial pendulum (hinge joints only).
    ///
    /// Each link frame sits at the END of its link, where the point mass
    /// is, `link_length` below the previous one. Every joint rotates about
    /// the Y axis at the top of its link, so at `q = 0` the chain hangs
    /// straight down from the world origin.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::EmptyMechanism`] if `n` is 0 and propagates
    /// validation errors (e.g. a non-positive mass).
    pub fn n_link_pendulum(n: usize, link_length: f64, link_mass: f64) -> Result<Self> {
        if n == 0 {
            return Err(DynamicsError::EmptyMechanism);
        }

        let mut builder = Self::builder();
        let mut parent = None;
        for i in 0..n {
            let mut spec = LinkSpec::new(bob(link_mass), JointSpec::hinge(Vector3::y()))
                .name(format!("link_{i}"))
                .transform(Pose::from_translation(Vector3::new(0.0, 0.0, -link_length)))
                .joint_frame(Pose::from_translation(Vector3::new(0.0, 0.0, link_length)));
            if let Some(p) = parent {
                spec = spec.parent(p);
            }
            parent = Some(builder.add_link(spec));
        }
        builder.build()
    }

    /// Two-link hanging pendulum, `n_link_pendulum(2, ..)`.
    pub fn double_pendulum(link_length: f64, link_mass: f64) -> Result<Self> {
        Self::n_link_pendulum(2, link_length, link_mass)
    }

    /// Create a spherical pendulum: a point mass `length` below a ball
    /// joint at the world origin, the ball written as hinges about x, y, z.
    ///
    /// The hinges are ordinary stacked axes, so any stiffness set on them
    /// acts as a spring on the three angles.
    pub fn spherical_pendulum(length: f64, mass: f64) -> Result<Self> {
        let mut builder = Self::builder();
        builder.add_link(
            LinkSpec::new(bob(mass), JointSpec::ball())
                .name("bob")
                .transform(Pose::from_translation(Vector3::new(0.0, 0.0, -length)))
                .joint_frame(Pose::from_translation(Vector3::new(0.0, 0.0, length))),
        );
        builder.build()
    }

    /// Create a single free-floating rigid body.
    pub fn free_body(inertia: Inertia) -> Result<Self> {
        let mut builder = Self::builder();
        builder.add_link(LinkSpec::new(inertia, JointSpec::free()).name("body"));
        builder.build()
    }

    /// Create a free-floating box with the given half extents.
    pub fn free_box(mass: f64, half_extents: Vector3<f64>) -> Result<Self> {
        Self::free_body(Inertia::box_shape(mass, half_extents))
    }
}
