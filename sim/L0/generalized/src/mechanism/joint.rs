//! Joint type vocabulary.
//!
//! A joint is either a 6-dof free joint or a stack of one to three
//! single-axis joints applied in order. Stacks are identified by a short
//! tag: `"f"` for free, otherwise one character per axis (`'r'` for a
//! rotational axis, `'p'` for a prismatic one), so `"rr"` is a universal
//! joint and `"rrr"` a ball written as three hinges.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Unit, UnitQuaternion};
use sim_spatial::{Motion, Pose};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DynamicsError;

/// Maximum number of axes in a stacked joint.
pub const MAX_STACKED_AXES: usize = 3;

/// Kind of a single joint axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisKind {
    /// Rotation about the axis (hinge).
    Rotational,
    /// Translation along the axis (slide).
    Translational,
}

impl AxisKind {
    /// One-character tag.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Rotational => 'r',
            Self::Translational => 'p',
        }
    }

    /// Parse a one-character tag.
    #[must_use]
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'r' => Some(Self::Rotational),
            'p' => Some(Self::Translational),
            _ => None,
        }
    }

    /// Transform produced by moving this axis by `q`.
    ///
    /// Rotational axes rotate by `q` radians about `motion.angular`;
    /// translational axes translate by `q·motion.linear`.
    #[must_use]
    pub fn transform(self, motion: &Motion, q: f64) -> Pose {
        match self {
            Self::Rotational => {
                let axis = Unit::new_normalize(motion.angular);
                Pose::from_rotation(UnitQuaternion::from_axis_angle(&axis, q))
            }
            Self::Translational => Pose::from_translation(motion.linear * q),
        }
    }
}

/// Axis kinds of a stacked joint, one to three of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackedAxes {
    // Unused slots hold `Rotational` so that equality and hashing only
    // depend on the used prefix.
    kinds: [AxisKind; MAX_STACKED_AXES],
    len: usize,
}

impl StackedAxes {
    /// Create from a list of one to three axis kinds.
    pub fn new(kinds: &[AxisKind]) -> crate::Result<Self> {
        if kinds.is_empty() || kinds.len() > MAX_STACKED_AXES {
            return Err(DynamicsError::UnsupportedJointType(format!(
                "stacked joint with {} axes (expected 1 to {MAX_STACKED_AXES})",
                kinds.len()
            )));
        }
        let mut slots = [AxisKind::Rotational; MAX_STACKED_AXES];
        slots[..kinds.len()].copy_from_slice(kinds);
        Ok(Self {
            kinds: slots,
            len: kinds.len(),
        })
    }

    /// Axis kinds in application order.
    #[must_use]
    pub fn kinds(&self) -> &[AxisKind] {
        &self.kinds[..self.len]
    }

    /// Number of axes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a stacked joint has at least one axis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Joint type of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum JointType {
    /// Free joint (6 dofs): three world-frame translations, then three
    /// rotations in the link's local axes. Its pose comes from kinematics,
    /// not from `q`.
    Free,
    /// One to three single-axis joints applied in order.
    Stacked(StackedAxes),
}

impl JointType {
    /// Single rotational axis.
    #[must_use]
    pub const fn hinge() -> Self {
        Self::Stacked(StackedAxes {
            kinds: [AxisKind::Rotational; MAX_STACKED_AXES],
            len: 1,
        })
    }

    /// Single translational axis.
    #[must_use]
    pub const fn slide() -> Self {
        Self::Stacked(StackedAxes {
            kinds: [
                AxisKind::Translational,
                AxisKind::Rotational,
                AxisKind::Rotational,
            ],
            len: 1,
        })
    }

    /// Number of dofs (q and qd entries) this joint contributes.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        match self {
            Self::Free => 6,
            Self::Stacked(axes) => axes.len(),
        }
    }

    /// Whether joint stiffness acts on this joint's dofs.
    ///
    /// Free joints carry their configuration in the link pose rather than in
    /// `q`, so a linear spring on `q` has no meaning for them.
    #[must_use]
    pub const fn supports_spring(&self) -> bool {
        match self {
            Self::Free => false,
            Self::Stacked(_) => true,
        }
    }

    /// Short tag (`"f"`, `"r"`, `"pr"`, ...).
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::Free => "f".to_string(),
            Self::Stacked(axes) => axes.kinds().iter().map(|k| k.tag()).collect(),
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for JointType {
    type Err = DynamicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "f" {
            return Ok(Self::Free);
        }
        let kinds = s
            .chars()
            .map(AxisKind::from_tag)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DynamicsError::UnsupportedJointType(s.to_string()))?;
        StackedAxes::new(&kinds)
            .map(Self::Stacked)
            .map_err(|_| DynamicsError::UnsupportedJointType(s.to_string()))
    }
}

impl TryFrom<String> for JointType {
    type Error = DynamicsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JointType> for String {
    fn from(joint: JointType) -> Self {
        joint.tag()
    }
}
