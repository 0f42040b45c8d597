//! Incremental mechanism construction.

use nalgebra::Vector3;
use sim_spatial::{Inertia, Motion, Pose};
use tracing::warn;

use super::{AxisKind, Dof, JointType, Link, Mechanism, StackedAxes};
use crate::config::{DynamicsConfig, Gravity};
use crate::{DynamicsError, Result};

/// One axis of a stacked joint, with its passive coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAxis {
    /// Rotational or translational.
    pub kind: AxisKind,
    /// Axis direction in the joint frame; normalized on build.
    pub axis: Vector3<f64>,
    /// Spring stiffness.
    pub stiffness: f64,
    /// Viscous damping.
    pub damping: f64,
}

impl JointAxis {
    /// Rotation about `axis`.
    #[must_use]
    pub fn rotational(axis: Vector3<f64>) -> Self {
        Self {
            kind: AxisKind::Rotational,
            axis,
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    /// Translation along `axis`.
    #[must_use]
    pub fn translational(axis: Vector3<f64>) -> Self {
        Self {
            kind: AxisKind::Translational,
            axis,
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    /// Set the spring stiffness.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the damping.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

/// Joint of a link under construction.
#[derive(Debug, Clone, PartialEq)]
pub enum JointSpec {
    /// 6-dof free joint with uniform damping on all dofs.
    Free {
        /// Damping applied to every free dof.
        damping: f64,
    },
    /// Zero to three stacked axes. Zero axes is only valid on the root,
    /// where it is built as a free joint.
    Axes(Vec<JointAxis>),
}

impl JointSpec {
    /// Undamped free joint.
    #[must_use]
    pub fn free() -> Self {
        Self::Free { damping: 0.0 }
    }

    /// Single hinge about `axis`.
    #[must_use]
    pub fn hinge(axis: Vector3<f64>) -> Self {
        Self::Axes(vec![JointAxis::rotational(axis)])
    }

    /// Single slide along `axis`.
    #[must_use]
    pub fn slide(axis: Vector3<f64>) -> Self {
        Self::Axes(vec![JointAxis::translational(axis)])
    }

    /// Three hinges about x, y and z, applied in that order.
    ///
    /// Unlike a quaternion ball joint, `q` here holds three angles, and
    /// stiffness set on the axes springs each angle back to zero.
    #[must_use]
    pub fn ball() -> Self {
        Self::Axes(vec![
            JointAxis::rotational(Vector3::x()),
            JointAxis::rotational(Vector3::y()),
            JointAxis::rotational(Vector3::z()),
        ])
    }
}

/// A link under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    /// Optional name.
    pub name: Option<String>,
    /// Parent index, `None` for the root.
    pub parent: Option<usize>,
    /// Link frame relative to the parent.
    pub transform: Pose,
    /// Joint frame relative to the link.
    pub joint_frame: Pose,
    /// Mass properties.
    pub inertia: Inertia,
    /// Joint.
    pub joint: JointSpec,
}

impl LinkSpec {
    /// Root-level link with identity frames.
    #[must_use]
    pub fn new(inertia: Inertia, joint: JointSpec) -> Self {
        Self {
            name: None,
            parent: None,
            transform: Pose::identity(),
            joint_frame: Pose::identity(),
            inertia,
            joint,
        }
    }

    /// Set the parent link.
    #[must_use]
    pub fn parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the link frame relative to the parent.
    #[must_use]
    pub fn transform(mut self, transform: Pose) -> Self {
        self.transform = transform;
        self
    }

    /// Set the joint frame relative to the link.
    #[must_use]
    pub fn joint_frame(mut self, joint_frame: Pose) -> Self {
        self.joint_frame = joint_frame;
        self
    }
}

/// Builder assembling links and their dofs into a [`Mechanism`].
///
/// # Example
///
/// ```
/// use sim_generalized::{JointSpec, LinkSpec, Mechanism};
/// use sim_spatial::{Inertia, Pose};
/// use nalgebra::{Point3, Vector3};
///
/// let mut builder = Mechanism::builder();
/// let upper = builder.add_link(LinkSpec::new(
///     Inertia::point_mass(1.0).with_com(Point3::new(1.0, 0.0, 0.0)),
///     JointSpec::hinge(Vector3::y()),
/// ));
/// builder.add_link(
///     LinkSpec::new(
///         Inertia::point_mass(1.0).with_com(Point3::new(1.0, 0.0, 0.0)),
///         JointSpec::hinge(Vector3::y()),
///     )
///     .parent(upper)
///     .transform(Pose::from_translation(Vector3::new(1.0, 0.0, 0.0))),
/// );
/// let mech = builder.build().unwrap();
/// assert_eq!(mech.dof_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MechanismBuilder {
    links: Vec<LinkSpec>,
    config: DynamicsConfig,
}

impl MechanismBuilder {
    /// Create an empty builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation configuration.
    #[must_use]
    pub fn config(mut self, config: DynamicsConfig) -> Self {
        self.config = config;
        self
    }

    /// Set gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.config.gravity = gravity;
        self
    }

    /// Append a link and return its index.
    pub fn add_link(&mut self, link: LinkSpec) -> usize {
        self.links.push(link);
        self.links.len() - 1
    }

    /// Number of links added so far.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Resolve joints into dofs and validate the mechanism.
    pub fn build(self) -> Result<Mechanism> {
        let mut links = Vec::with_capacity(self.links.len());
        let mut dofs = Vec::new();

        for (i, spec) in self.links.into_iter().enumerate() {
            let joint = match spec.joint {
                JointSpec::Free { damping } => {
                    dofs.extend(Dof::free_basis().map(|d| Dof { damping, ..d }));
                    JointType::Free
                }
                JointSpec::Axes(axes) if axes.is_empty() => {
                    if spec.parent.is_some() {
                        return Err(DynamicsError::UnsupportedJointType(format!(
                            "link {i} has a joint with no axes"
                        )));
                    }
                    warn!(link = i, "root joint has no axes; treating it as free");
                    dofs.extend(Dof::free_basis());
                    JointType::Free
                }
                JointSpec::Axes(axes) => {
                    let kinds: Vec<AxisKind> = axes.iter().map(|a| a.kind).collect();
                    let stacked = StackedAxes::new(&kinds)?;
                    for axis in &axes {
                        dofs.push(resolve_axis(axis, dofs.len())?);
                    }
                    JointType::Stacked(stacked)
                }
            };

            links.push(Link {
                name: spec.name,
                parent: spec.parent,
                joint,
                transform: spec.transform,
                joint_frame: spec.joint_frame,
                inertia: spec.inertia,
            });
        }

        Mechanism::new(links, dofs, self.config)
    }
}

fn resolve_axis(axis: &JointAxis, index: usize) -> Result<Dof> {
    let norm = axis.axis.norm();
    if !norm.is_finite() || norm < 1e-12 {
        return Err(DynamicsError::invalid_dof(index, "axis has zero length"));
    }
    let unit = axis.axis / norm;
    let motion = match axis.kind {
        AxisKind::Rotational => Motion::angular(unit),
        AxisKind::Translational => Motion::linear(unit),
    };
    Ok(Dof {
        motion,
        stiffness: axis.stiffness,
        damping: axis.damping,
    })
}
