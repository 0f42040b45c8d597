//! Static description of an articulated mechanism.
//!
//! A [`Mechanism`] is a single kinematic tree of rigid [`Link`]s. Each link
//! hangs off its parent through a joint whose degrees of freedom are
//! listed, link-major, in a flat [`Dof`] table. Construction validates the
//! tree once and precomputes everything the evaluation passes index by:
//! dof→link maps, depths, a topological order and joint-type groups.
//!
//! # Frames
//!
//! For link `i` with parent `p`:
//!
//! - `transform` places the link frame in the parent's link frame.
//! - `joint_frame` places the joint in the link frame; joint axes are
//!   expressed in it.
//! - `inertia.frame` places the center of mass in the link frame.
//!
//! Link world poses `x` are an input of every evaluation; they come from a
//! kinematics pass run elsewhere.

mod builder;
mod factories;
mod joint;

pub use builder::{JointAxis, JointSpec, LinkSpec, MechanismBuilder};
pub use joint::{AxisKind, JointType, MAX_STACKED_AXES, StackedAxes};

use std::ops::Range;

use hashbrown::HashMap;
use nalgebra::Vector3;
use sim_spatial::{Inertia, Motion, Pose};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::DynamicsConfig;
use crate::scan::JointGroup;
use crate::{DynamicsError, Result};

// Axes and free-joint bases must be unit length to this tolerance.
const AXIS_TOLERANCE: f64 = 1e-9;

/// A rigid link and the joint connecting it to its parent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    /// Optional name for diagnostics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Parent link index, `None` for the root.
    pub parent: Option<usize>,
    /// Joint type.
    pub joint: JointType,
    /// Link frame relative to the parent link frame.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transform: Pose,
    /// Joint frame relative to the link frame.
    #[cfg_attr(feature = "serde", serde(default))]
    pub joint_frame: Pose,
    /// Mass properties.
    pub inertia: Inertia,
}

/// One degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dof {
    /// Motion subspace in the joint frame. Rotational axes set `angular`,
    /// translational axes set `linear`.
    pub motion: Motion,
    /// Spring stiffness about `q = 0`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stiffness: f64,
    /// Viscous damping.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damping: f64,
}

impl Dof {
    /// Dof rotating about `axis`.
    #[must_use]
    pub fn rotational(axis: Vector3<f64>) -> Self {
        Self {
            motion: Motion::angular(axis),
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    /// Dof translating along `axis`.
    #[must_use]
    pub fn translational(axis: Vector3<f64>) -> Self {
        Self {
            motion: Motion::linear(axis),
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    /// The six dofs of a free joint: translations along x, y, z then
    /// rotations about x, y, z.
    #[must_use]
    pub fn free_basis() -> [Self; 6] {
        [
            Self::translational(Vector3::x()),
            Self::translational(Vector3::y()),
            Self::translational(Vector3::z()),
            Self::rotational(Vector3::x()),
            Self::rotational(Vector3::y()),
            Self::rotational(Vector3::z()),
        ]
    }
}

/// Unvalidated parts of a mechanism, as stored in a description file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MechanismParts {
    /// Links in any order; parents are referenced by index.
    pub links: Vec<Link>,
    /// Dofs, link-major.
    pub dofs: Vec<Dof>,
    /// Evaluation settings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: DynamicsConfig,
}

/// A validated single-tree mechanism with precomputed indexing.
///
/// Immutable after construction and shared read-only by every evaluation.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "MechanismParts", into = "MechanismParts")
)]
pub struct Mechanism {
    links: Vec<Link>,
    dofs: Vec<Dof>,
    config: DynamicsConfig,

    root: usize,
    /// First dof of each link.
    link_dof_adr: Vec<usize>,
    /// Owning link of each dof.
    dof_link: Vec<usize>,
    /// Tree depth of each link (root = 0).
    depth: Vec<usize>,
    /// Links sorted by depth, ties by index.
    order: Vec<usize>,
    /// `order[level_start[d]..level_start[d + 1]]` holds depth `d`.
    level_start: Vec<usize>,
    groups: Vec<JointGroup>,
    total_mass: f64,
}

impl Mechanism {
    /// Start building a mechanism link by link.
    #[must_use]
    pub fn builder() -> MechanismBuilder {
        MechanismBuilder::new()
    }

    /// Validate links and dofs and precompute the tree indexing.
    ///
    /// # Errors
    ///
    /// - [`DynamicsError::EmptyMechanism`] if there are no links.
    /// - [`DynamicsError::InvalidParent`], [`DynamicsError::NoRoot`],
    ///   [`DynamicsError::Forest`] or [`DynamicsError::CyclicTree`] if the
    ///   parent relation is not a single rooted tree.
    /// - [`DynamicsError::ShapeMismatch`] if the dof table length disagrees
    ///   with the joint types.
    /// - [`DynamicsError::InvalidDof`] for a malformed axis or coefficient.
    /// - [`DynamicsError::InvalidMass`] for bad inertia or zero total mass.
    pub fn new(links: Vec<Link>, dofs: Vec<Dof>, config: DynamicsConfig) -> Result<Self> {
        if links.is_empty() {
            return Err(DynamicsError::EmptyMechanism);
        }
        config.validate()?;

        let n = links.len();
        for (i, link) in links.iter().enumerate() {
            if let Some(p) = link.parent {
                if p >= n || p == i {
                    return Err(DynamicsError::InvalidParent { link: i, parent: p });
                }
            }
        }

        let roots: Vec<usize> = (0..n).filter(|&i| links[i].parent.is_none()).collect();
        let root = match roots.as_slice() {
            [] => return Err(DynamicsError::NoRoot),
            [root] => *root,
            _ => return Err(DynamicsError::Forest { roots: roots.len() }),
        };

        let depth = compute_depths(&links)?;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| depth[i]);
        let max_depth = depth.iter().copied().max().unwrap_or(0);
        let mut level_start = vec![0; max_depth + 2];
        for &d in &depth {
            level_start[d + 1] += 1;
        }
        for d in 1..level_start.len() {
            level_start[d] += level_start[d - 1];
        }

        let expected: usize = links.iter().map(|l| l.joint.dof_count()).sum();
        if dofs.len() != expected {
            return Err(DynamicsError::ShapeMismatch {
                what: "dofs",
                expected,
                actual: dofs.len(),
            });
        }

        let mut link_dof_adr = Vec::with_capacity(n);
        let mut dof_link = Vec::with_capacity(dofs.len());
        for (i, link) in links.iter().enumerate() {
            link_dof_adr.push(dof_link.len());
            dof_link.extend(std::iter::repeat_n(i, link.joint.dof_count()));
        }

        for (i, link) in links.iter().enumerate() {
            let start = link_dof_adr[i];
            validate_joint_dofs(&link.joint, &dofs[start..start + link.joint.dof_count()], start)?;
        }

        let mut total_mass = 0.0;
        for (i, link) in links.iter().enumerate() {
            link.inertia
                .validate()
                .map_err(|e| DynamicsError::invalid_mass(format!("link {i}: {e}")))?;
            total_mass += link.inertia.mass;
        }
        if total_mass <= 0.0 {
            return Err(DynamicsError::invalid_mass(
                "total mass of the mechanism must be positive",
            ));
        }

        let groups = group_by_joint_type(&links, &link_dof_adr);

        debug!(
            links = n,
            dofs = dofs.len(),
            depth = max_depth,
            joint_groups = groups.len(),
            "mechanism built"
        );

        Ok(Self {
            links,
            dofs,
            config,
            root,
            link_dof_adr,
            dof_link,
            depth,
            order,
            level_start,
            groups,
            total_mass,
        })
    }

    /// Validate [`MechanismParts`].
    pub fn from_parts(parts: MechanismParts) -> Result<Self> {
        Self::new(parts.links, parts.dofs, parts.config)
    }

    /// The unvalidated parts this mechanism was built from.
    #[must_use]
    pub fn to_parts(&self) -> MechanismParts {
        MechanismParts {
            links: self.links.clone(),
            dofs: self.dofs.clone(),
            config: self.config.clone(),
        }
    }

    /// All links, indexed as given at construction.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Link `i`.
    #[must_use]
    pub fn link(&self, i: usize) -> Option<&Link> {
        self.links.get(i)
    }

    /// All dofs, link-major.
    #[must_use]
    pub fn dofs(&self) -> &[Dof] {
        &self.dofs
    }

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of dofs (length of `q` and `qd`).
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.dofs.len()
    }

    /// Evaluation settings.
    #[must_use]
    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    /// Gravity applied during evaluation, after disable flags.
    #[must_use]
    pub fn gravity(&self) -> Vector3<f64> {
        self.config.effective_gravity()
    }

    /// Index of the root link.
    #[must_use]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Parent of link `i`.
    #[must_use]
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.links.get(i).and_then(|l| l.parent)
    }

    /// Tree depth of link `i` (root = 0).
    #[must_use]
    pub fn depth(&self, i: usize) -> usize {
        self.depth[i]
    }

    /// Owning link of each dof.
    #[must_use]
    pub fn dof_link(&self) -> &[usize] {
        &self.dof_link
    }

    /// Dof indices of link `i`.
    #[must_use]
    pub fn link_dofs(&self, i: usize) -> Range<usize> {
        let start = self.link_dof_adr[i];
        start..start + self.links[i].joint.dof_count()
    }

    /// Links ordered so that every parent precedes its children.
    #[must_use]
    pub fn topological_order(&self) -> &[usize] {
        &self.order
    }

    /// Links grouped by depth, root level first.
    ///
    /// Links within a level are independent of each other in both forward
    /// and backward scans.
    pub fn depth_levels(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.level_start
            .windows(2)
            .map(|w| &self.order[w[0]..w[1]])
    }

    /// Links bucketed by exact joint type, in order of first appearance.
    #[must_use]
    pub fn joint_groups(&self) -> &[JointGroup] {
        &self.groups
    }

    /// Sum of link masses.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }
}

impl TryFrom<MechanismParts> for Mechanism {
    type Error = DynamicsError;

    fn try_from(parts: MechanismParts) -> Result<Self> {
        Self::from_parts(parts)
    }
}

impl From<Mechanism> for MechanismParts {
    fn from(mech: Mechanism) -> Self {
        Self {
            links: mech.links,
            dofs: mech.dofs,
            config: mech.config,
        }
    }
}

fn compute_depths(links: &[Link]) -> Result<Vec<usize>> {
    let n = links.len();
    let mut depth: Vec<Option<usize>> = vec![None; n];
    let mut chain = Vec::with_capacity(n);

    for start in 0..n {
        chain.clear();
        let mut base = 0;
        let mut cur = Some(start);
        while let Some(link) = cur {
            if let Some(d) = depth[link] {
                base = d + 1;
                break;
            }
            if chain.len() == n {
                return Err(DynamicsError::CyclicTree { link: start });
            }
            chain.push(link);
            cur = links[link].parent;
        }
        for (k, &link) in chain.iter().rev().enumerate() {
            depth[link] = Some(base + k);
        }
    }

    Ok(depth.into_iter().map(|d| d.unwrap_or(0)).collect())
}

fn validate_joint_dofs(joint: &JointType, dofs: &[Dof], first: usize) -> Result<()> {
    for (k, dof) in dofs.iter().enumerate() {
        let index = first + k;
        if !dof.motion.is_finite() {
            return Err(DynamicsError::invalid_dof(index, "motion must be finite"));
        }
        if !(dof.stiffness.is_finite() && dof.stiffness >= 0.0) {
            return Err(DynamicsError::invalid_dof(
                index,
                "stiffness must be finite and non-negative",
            ));
        }
        if !(dof.damping.is_finite() && dof.damping >= 0.0) {
            return Err(DynamicsError::invalid_dof(
                index,
                "damping must be finite and non-negative",
            ));
        }
    }

    match joint {
        JointType::Free => {
            for (k, (dof, basis)) in dofs.iter().zip(Dof::free_basis()).enumerate() {
                let diff = dof.motion - basis.motion;
                if diff.angular.norm() > AXIS_TOLERANCE || diff.linear.norm() > AXIS_TOLERANCE {
                    return Err(DynamicsError::invalid_dof(
                        first + k,
                        "free joint dofs must be the unit translations then unit rotations",
                    ));
                }
            }
        }
        JointType::Stacked(axes) => {
            for (k, (dof, kind)) in dofs.iter().zip(axes.kinds()).enumerate() {
                let (axis, other) = match kind {
                    AxisKind::Rotational => (dof.motion.angular, dof.motion.linear),
                    AxisKind::Translational => (dof.motion.linear, dof.motion.angular),
                };
                if (axis.norm() - 1.0).abs() > AXIS_TOLERANCE {
                    return Err(DynamicsError::invalid_dof(first + k, "axis must be unit length"));
                }
                if other.norm() > AXIS_TOLERANCE {
                    return Err(DynamicsError::invalid_dof(
                        first + k,
                        format!("{kind:?} axis has a non-zero off-axis component"),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn group_by_joint_type(links: &[Link], link_dof_adr: &[usize]) -> Vec<JointGroup> {
    let mut slot: HashMap<JointType, usize> = HashMap::new();
    let mut groups: Vec<JointGroup> = Vec::new();

    for (i, link) in links.iter().enumerate() {
        let g = *slot.entry(link.joint).or_insert_with(|| {
            groups.push(JointGroup {
                joint: link.joint,
                links: Vec::new(),
                dofs: Vec::new(),
            });
            groups.len() - 1
        });
        let start = link_dof_adr[i];
        groups[g].links.push(i);
        groups[g].dofs.extend(start..start + link.joint.dof_count());
    }

    groups
}
