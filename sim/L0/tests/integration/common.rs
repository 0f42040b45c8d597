//! Shared fixtures: a reference forward kinematics pass and small
//! mechanisms with closed-form answers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use nalgebra::{DVector, Point3, Vector3};
use sim_generalized::{
    ComFrame, DynamicsConfig, GeneralizedForces, JointAxis, JointSpec, JointType, LinkSpec,
    Mechanism, forward_terms, transform_com,
};
use sim_spatial::{Inertia, Pose};

/// Geometric tolerance for closed-form comparisons.
pub const TOL: f64 = 1e-10;

/// World link poses for `q`.
///
/// Stacked joints move the link about the joint frame:
/// `x = x_parent · transform · joint_frame · J(q) · joint_frame⁻¹` with
/// `J(q)` the axis transforms composed in order. Free links take the next
/// pose from `free_poses`.
pub fn forward_kinematics(mech: &Mechanism, q: &DVector<f64>, free_poses: &[Pose]) -> Vec<Pose> {
    let mut x = vec![Pose::identity(); mech.link_count()];
    let mut free = free_poses.iter();

    for &i in mech.topological_order() {
        let link = &mech.links()[i];
        x[i] = match link.joint {
            JointType::Free => *free.next().expect("a pose for every free link"),
            JointType::Stacked(axes) => {
                let parent = link.parent.map_or_else(Pose::identity, |p| x[p]);
                let joint = mech
                    .link_dofs(i)
                    .zip(axes.kinds())
                    .fold(Pose::identity(), |acc, (d, kind)| {
                        acc.compose(&kind.transform(&mech.dofs()[d].motion, q[d]))
                    });
                parent
                    .compose(&link.transform)
                    .compose(&link.joint_frame)
                    .compose(&joint)
                    .compose(&link.joint_frame.inverse())
            }
        };
    }
    x
}

/// Run kinematics then `transform_com`.
pub fn com_frame(
    mech: &Mechanism,
    q: &DVector<f64>,
    qd: &DVector<f64>,
    free_poses: &[Pose],
) -> ComFrame {
    let x = forward_kinematics(mech, q, free_poses);
    transform_com(mech, q, qd, &x).expect("transform_com")
}

/// Run kinematics, `transform_com` and `forward_terms` with zero actuation.
pub fn evaluate(mech: &Mechanism, q: &DVector<f64>, qd: &DVector<f64>) -> GeneralizedForces {
    let frame = com_frame(mech, q, qd, &[]);
    forward_terms(mech, q, qd, &frame, &DVector::zeros(mech.dof_count())).expect("forward_terms")
}

/// Two-link serial chain of unit point masses at the link tips.
///
/// Both hinges rotate about `axis`; at `q = 0` the links lie along +x with
/// the joints at the origin and at (1, 0, 0).
pub fn two_link_chain(axis: Vector3<f64>, config: DynamicsConfig) -> Mechanism {
    let tip = || Inertia::point_mass(1.0).with_com(Point3::new(1.0, 0.0, 0.0));
    let mut b = Mechanism::builder().config(config);
    let upper = b.add_link(LinkSpec::new(tip(), JointSpec::hinge(axis)).name("upper"));
    b.add_link(
        LinkSpec::new(tip(), JointSpec::hinge(axis))
            .name("lower")
            .parent(upper)
            .transform(Pose::from_translation(Vector3::new(1.0, 0.0, 0.0))),
    );
    b.build().unwrap()
}

/// A branching tree exercising every stacked joint flavor with offset
/// frames, rotated CoM frames and non-trivial inertia tensors.
pub fn mixed_tree(config: DynamicsConfig) -> Mechanism {
    let mut b = Mechanism::builder().config(config);
    let torso = b.add_link(
        LinkSpec::new(
            Inertia::box_shape(4.0, Vector3::new(0.2, 0.1, 0.3))
                .with_com(Point3::new(0.0, 0.0, 0.1)),
            JointSpec::Axes(vec![
                JointAxis::translational(Vector3::x()).with_damping(0.4),
                JointAxis::rotational(Vector3::z()).with_stiffness(2.0),
            ]),
        )
        .name("torso"),
    );
    let arm = b.add_link(
        LinkSpec::new(
            Inertia::box_shape(1.0, Vector3::new(0.3, 0.05, 0.05))
                .with_com(Point3::new(0.3, 0.0, 0.0)),
            JointSpec::Axes(vec![
                JointAxis::rotational(Vector3::y()),
                JointAxis::rotational(Vector3::new(1.0, 0.0, 1.0)).with_damping(0.1),
            ]),
        )
        .name("arm")
        .parent(torso)
        .transform(Pose::from_position_rotation(
            Point3::new(0.2, 0.1, 0.3),
            nalgebra::UnitQuaternion::from_euler_angles(0.2, 0.0, -0.4),
        ))
        .joint_frame(Pose::from_translation(Vector3::new(0.05, 0.0, 0.0))),
    );
    b.add_link(
        LinkSpec::new(
            Inertia::sphere(0.5, 0.1).with_frame(Pose::from_position_rotation(
                Point3::new(0.1, 0.0, -0.05),
                nalgebra::UnitQuaternion::from_euler_angles(0.0, 0.5, 0.1),
            )),
            JointSpec::Axes(vec![
                JointAxis::translational(Vector3::new(0.0, 1.0, 1.0)).with_stiffness(5.0),
                JointAxis::rotational(Vector3::x()),
                JointAxis::rotational(Vector3::z()),
            ]),
        )
        .name("hand")
        .parent(arm)
        .transform(Pose::from_translation(Vector3::new(0.6, 0.0, 0.0))),
    );
    b.add_link(
        LinkSpec::new(
            Inertia::box_shape(2.0, Vector3::new(0.05, 0.05, 0.4))
                .with_com(Point3::new(0.0, 0.0, -0.4)),
            JointSpec::hinge(Vector3::y()),
        )
        .name("leg")
        .parent(torso)
        .transform(Pose::from_translation(Vector3::new(0.0, -0.1, -0.3))),
    );
    b.build().unwrap()
}

/// A free-floating box carrying a slide-and-hinge arm with a hinged tip.
///
/// Dofs: six free dofs on the base, then "rp" on the arm, then one hinge.
pub fn free_tree(config: DynamicsConfig) -> Mechanism {
    let mut b = Mechanism::builder().config(config);
    let base = b.add_link(
        LinkSpec::new(
            Inertia::box_shape(3.0, Vector3::new(0.3, 0.2, 0.1))
                .with_com(Point3::new(0.05, 0.0, 0.02)),
            JointSpec::free(),
        )
        .name("base"),
    );
    let arm = b.add_link(
        LinkSpec::new(
            Inertia::box_shape(1.0, Vector3::new(0.2, 0.04, 0.04))
                .with_com(Point3::new(0.2, 0.0, 0.0)),
            JointSpec::Axes(vec![
                JointAxis::rotational(Vector3::y()),
                JointAxis::translational(Vector3::x()),
            ]),
        )
        .name("arm")
        .parent(base)
        .transform(Pose::from_position_rotation(
            Point3::new(0.3, 0.0, 0.1),
            nalgebra::UnitQuaternion::from_euler_angles(0.3, -0.2, 0.6),
        )),
    );
    b.add_link(
        LinkSpec::new(
            Inertia::sphere(0.5, 0.05).with_com(Point3::new(0.0, 0.0, -0.2)),
            JointSpec::hinge(Vector3::x()),
        )
        .name("tip")
        .parent(arm)
        .transform(Pose::from_translation(Vector3::new(0.4, 0.0, 0.1))),
    );
    b.build().unwrap()
}

/// Pose of a free link after moving for `t` at constant free-joint rates:
/// world-frame linear velocity `qd[0..3]`, body-frame angular velocity
/// `qd[3..6]`.
pub fn advance_free_pose(start: &Pose, qd: &[f64], t: f64) -> Pose {
    let v = Vector3::new(qd[0], qd[1], qd[2]);
    let omega = Vector3::new(qd[3], qd[4], qd[5]);
    Pose::from_position_rotation(
        start.position + v * t,
        start.rotation * nalgebra::UnitQuaternion::from_scaled_axis(omega * t),
    )
}

/// Deterministic pseudo-random vector in `[-scale, scale]`.
pub fn sample_vector(n: usize, seed: u64, scale: f64) -> DVector<f64> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    DVector::from_fn(n, |_, _| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        #[allow(clippy::cast_precision_loss)]
        let unit = (state >> 11) as f64 / (1_u64 << 53) as f64;
        scale * (2.0 * unit - 1.0)
    })
}
