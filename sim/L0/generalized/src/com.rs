//! Motion quantities about the mechanism's center of mass.
//!
//! Every spatial quantity the dynamics passes consume is expressed in world
//! axes and referenced at one common point, the mechanism CoM. With a
//! single reference point, transporting a motion or force from a child link
//! to its parent is plain addition.

use nalgebra::{DVector, Point3, Vector3};
use sim_spatial::{Motion, Pose, SpatialInertia, index_sum};

use crate::check;
use crate::scan::{self, JointGroup};
use crate::{JointType, Mechanism, Result};

/// Per-evaluation quantities about the mechanism's center of mass.
///
/// Produced by [`transform_com`] and consumed by
/// [`inverse`](crate::inverse::inverse) and
/// [`forward`](crate::forward::forward). Nothing in here outlives one
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComFrame {
    /// World-frame center of mass of the whole mechanism.
    pub com: Point3<f64>,
    /// Spatial inertia of each link about `com`.
    pub cinr: Vec<SpatialInertia>,
    /// Spatial velocity of each link about `com`.
    pub cd: Vec<Motion>,
    /// Motion subspace of each dof about `com`.
    pub cdof: Vec<Motion>,
    /// Time derivative of `cdof`.
    pub cdofd: Vec<Motion>,
}

/// Compute the CoM-referenced motion quantities for one state.
///
/// `x` holds one world pose per link, from a kinematics pass over the same
/// `q`.
///
/// # Errors
///
/// [`DynamicsError::ShapeMismatch`](crate::DynamicsError::ShapeMismatch) if
/// `q`, `qd` or `x` don't fit the mechanism;
/// [`DynamicsError::NonFinite`](crate::DynamicsError::NonFinite) for NaN or
/// Inf inputs when finite checks are on.
pub fn transform_com(
    mech: &Mechanism,
    q: &DVector<f64>,
    qd: &DVector<f64>,
    x: &[Pose],
) -> Result<ComFrame> {
    check::check_dofs(mech, "q", q)?;
    check::check_dofs(mech, "qd", qd)?;
    check::check_poses(mech, x)?;

    let links = mech.links();

    let xi: Vec<Pose> = x
        .iter()
        .zip(links)
        .map(|(x, link)| x.compose(&link.inertia.frame))
        .collect();
    let moment = xi
        .iter()
        .zip(links)
        .fold(Vector3::zeros(), |acc, (xi, link)| {
            acc + xi.position.coords * link.inertia.mass
        });
    let com = Point3::from(moment / mech.total_mass());

    let cinr = xi
        .iter()
        .zip(links)
        .map(|(xi, link)| {
            let placement = Pose::from_position_rotation(Point3::from(xi.position - com), xi.rotation);
            SpatialInertia::from_body(&link.inertia, &placement)
        })
        .collect();

    let joint_frames = joint_world_frames(mech, x);
    let cdof = scan::by_joint_type(mech, |group| {
        subspace_about_com(mech, group, q, &joint_frames, &com)
    })?;

    let cdof_qd: Vec<Motion> = cdof.iter().zip(qd.iter()).map(|(s, &v)| *s * v).collect();
    let mut own = vec![Motion::zero(); mech.link_count()];
    index_sum(&mut own, mech.dof_link(), &cdof_qd)?;
    let cd = scan::forward(mech, Motion::zero(), |parent, link| *parent + own[link]);

    let cd_parent: Vec<Motion> = (0..mech.link_count())
        .map(|i| mech.parent(i).map_or_else(Motion::zero, |p| cd[p]))
        .collect();
    let cdofd = scan::by_joint_type(mech, |group| {
        subspace_rate(mech, group, &cd_parent, &cdof, &cdof_qd)
    })?;

    Ok(ComFrame {
        com,
        cinr,
        cd,
        cdof,
        cdofd,
    })
}

/// World pose of each link's joint frame before its own joint moves.
///
/// Stacked joints sit in the parent (world for the root); free joints move
/// the link itself, so their frame rides on the link's pose.
fn joint_world_frames(mech: &Mechanism, x: &[Pose]) -> Vec<Pose> {
    mech.links()
        .iter()
        .enumerate()
        .map(|(i, link)| match link.joint {
            JointType::Free => x[i].compose(&link.joint_frame),
            JointType::Stacked(_) => {
                let parent = link.parent.map_or_else(Pose::identity, |p| x[p]);
                parent.compose(&link.transform).compose(&link.joint_frame)
            }
        })
        .collect()
}

fn subspace_about_com(
    mech: &Mechanism,
    group: &JointGroup,
    q: &DVector<f64>,
    joint_frames: &[Pose],
    com: &Point3<f64>,
) -> Vec<Motion> {
    let dofs = mech.dofs();
    let mut out = Vec::with_capacity(group.dofs.len());

    match group.joint {
        JointType::Free => {
            for &link in &group.links {
                let frame = &joint_frames[link];
                let r = com - frame.position;
                for d in mech.link_dofs(link) {
                    // Translations are world-aligned, rotations are local.
                    let m = dofs[d].motion;
                    let world = Motion::new(frame.rotation * m.angular, m.linear);
                    out.push(world.shift(&r));
                }
            }
        }
        JointType::Stacked(axes) => {
            for &link in &group.links {
                let frame = &joint_frames[link];
                let r = com - frame.position;
                let mut moved = Pose::identity();
                for (d, kind) in mech.link_dofs(link).zip(axes.kinds()) {
                    let m = dofs[d].motion;
                    let local = moved.transform_motion(&m);
                    out.push(local.rotate(&frame.rotation).shift(&r));
                    moved = moved.compose(&kind.transform(&m, q[d]));
                }
            }
        }
    }

    out
}

fn subspace_rate(
    mech: &Mechanism,
    group: &JointGroup,
    cd_parent: &[Motion],
    cdof: &[Motion],
    cdof_qd: &[Motion],
) -> Vec<Motion> {
    let mut out = Vec::with_capacity(group.dofs.len());

    match group.joint {
        JointType::Free => {
            for &link in &group.links {
                let dofs = mech.link_dofs(link);
                let v = dofs
                    .clone()
                    .take(3)
                    .fold(cd_parent[link], |acc, d| acc + cdof_qd[d]);
                for (k, d) in dofs.enumerate() {
                    out.push(if k < 3 { Motion::zero() } else { v.cross(&cdof[d]) });
                }
            }
        }
        JointType::Stacked(_) => {
            for &link in &group.links {
                let mut running = cd_parent[link];
                for d in mech.link_dofs(link) {
                    out.push(running.cross(&cdof[d]));
                    running += cdof_qd[d];
                }
            }
        }
    }

    out
}
