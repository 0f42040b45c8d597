//! Motion subspaces and bias forces against finite-differenced kinematics.
//!
//! The kinematics helper moves links exactly as the joint definitions say,
//! so differencing it gives independent references for `cd`, the gravity
//! force and the velocity-product force.

use approx::assert_relative_eq;
use nalgebra::{DVector, Point3, UnitQuaternion, Vector3};
use sim_generalized::{
    ComFrame, DynamicsConfig, Mechanism, inverse, link_accelerations, link_forces, subtree_forces,
    transform_com,
};
use sim_spatial::{Force, Motion, Pose};

use super::common::{
    advance_free_pose, com_frame, forward_kinematics, free_tree, mixed_tree, sample_vector,
};

const H: f64 = 1e-6;
const FD_TOL: f64 = 1e-6;

/// Test: `cd` matches the differenced motion of each link.
///
/// The angular part is the link's angular velocity; the linear part is the
/// velocity of the link-fixed point that momentarily coincides with `com`.
#[test]
fn cd_matches_differenced_poses() {
    let mech = mixed_tree(DynamicsConfig::default());
    let n = mech.dof_count();

    for seed in 0..4 {
        let q = sample_vector(n, 100 + seed, 1.2);
        let qd = sample_vector(n, 200 + seed, 2.0);
        let frame = com_frame(&mech, &q, &qd, &[]);

        let x0 = forward_kinematics(&mech, &q, &[]);
        let plus = forward_kinematics(&mech, &(&q + &qd * H), &[]);
        let minus = forward_kinematics(&mech, &(&q - &qd * H), &[]);

        for i in 0..mech.link_count() {
            let omega = (plus[i].rotation * minus[i].rotation.inverse()).scaled_axis() / (2.0 * H);
            let anchor = x0[i].inverse_transform_point(&frame.com);
            let v = (plus[i].transform_point(&anchor) - minus[i].transform_point(&anchor)) / (2.0 * H);

            assert_relative_eq!(frame.cd[i].angular, omega, epsilon = FD_TOL);
            assert_relative_eq!(frame.cd[i].linear, v, epsilon = FD_TOL);
        }
    }
}

fn potential_energy(mech: &Mechanism, q: &DVector<f64>) -> f64 {
    let x = forward_kinematics(mech, q, &[]);
    mech.links()
        .iter()
        .zip(&x)
        .map(|(link, x)| {
            let com = x.transform_point(&link.inertia.frame.position);
            -link.inertia.mass * mech.gravity().dot(&com.coords)
        })
        .sum()
}

fn kinetic_energy(mech: &Mechanism, q: &DVector<f64>, qd: &DVector<f64>) -> f64 {
    let frame = com_frame(mech, q, qd, &[]);
    0.5 * frame
        .cd
        .iter()
        .zip(&frame.cinr)
        .map(|(v, inertia)| v.dot(&inertia.mul(v)))
        .sum::<f64>()
}

/// Generalized momentum `M(q)·qd`, from link momenta summed over subtrees.
fn momentum(mech: &Mechanism, q: &DVector<f64>, qd: &DVector<f64>) -> DVector<f64> {
    let frame = com_frame(mech, q, qd, &[]);
    let link_momenta: Vec<Force> = frame
        .cinr
        .iter()
        .zip(&frame.cd)
        .map(|(inertia, v)| inertia.mul(v))
        .collect();
    let subtree = subtree_forces(mech, link_momenta);
    DVector::from_iterator(
        mech.dof_count(),
        frame
            .cdof
            .iter()
            .zip(mech.dof_link())
            .map(|(s, &link)| s.dot(&subtree[link])),
    )
}

fn unit(n: usize, k: usize) -> DVector<f64> {
    let mut e = DVector::zeros(n);
    e[k] = 1.0;
    e
}

/// Test: at rest the bias is the gradient of the potential energy.
#[test]
fn gravity_bias_is_potential_gradient() {
    let mech = mixed_tree(DynamicsConfig::default());
    let n = mech.dof_count();
    let zeros = DVector::zeros(n);
    let h = 1e-5;

    for seed in 0..3 {
        let q = sample_vector(n, 300 + seed, 1.0);
        let frame = com_frame(&mech, &q, &zeros, &[]);
        let bias = inverse(&mech, &zeros, &frame).unwrap();

        for k in 0..n {
            let e = unit(n, k);
            let grad = (potential_energy(&mech, &(&q + &e * h))
                - potential_energy(&mech, &(&q - &e * h)))
                / (2.0 * h);
            assert_relative_eq!(bias[k], grad, epsilon = FD_TOL);
        }
    }
}

/// Test: without gravity the bias is the Lagrangian velocity-product term
/// `d/dt(∂T/∂qd) - ∂T/∂q` evaluated at `qdd = 0`.
#[test]
fn velocity_bias_matches_lagrangian() {
    let mech = mixed_tree(DynamicsConfig::default().zero_gravity());
    let n = mech.dof_count();
    let h = 1e-5;

    for seed in 0..3 {
        let q = sample_vector(n, 400 + seed, 1.0);
        let qd = sample_vector(n, 500 + seed, 1.5);
        let frame = com_frame(&mech, &q, &qd, &[]);
        let bias = inverse(&mech, &qd, &frame).unwrap();

        // With qdd = 0, d/dt(M·qd) is the directional derivative along qd.
        let momentum_rate =
            (momentum(&mech, &(&q + &qd * h), &qd) - momentum(&mech, &(&q - &qd * h), &qd))
                / (2.0 * h);

        for k in 0..n {
            let e = unit(n, k);
            let dt_dq = (kinetic_energy(&mech, &(&q + &e * h), &qd)
                - kinetic_energy(&mech, &(&q - &e * h), &qd))
                / (2.0 * h);
            assert_relative_eq!(bias[k], momentum_rate[k] - dt_dq, epsilon = 1e-5);
        }
    }
}

/// Test: the momentum helper agrees with `∂T/∂qd` (T is quadratic in qd).
#[test]
fn momentum_is_kinetic_energy_gradient() {
    let mech = mixed_tree(DynamicsConfig::default());
    let n = mech.dof_count();
    let q = sample_vector(n, 600, 1.0);
    let qd = sample_vector(n, 601, 1.0);
    let p = momentum(&mech, &q, &qd);

    for k in 0..n {
        let e = unit(n, k);
        let grad = (kinetic_energy(&mech, &q, &(&qd + &e * H)) - kinetic_energy(&mech, &q, &(&qd - &e * H)))
            / (2.0 * H);
        assert_relative_eq!(p[k], grad, epsilon = FD_TOL);
    }

    // Energy is half the momentum pairing.
    assert_relative_eq!(kinetic_energy(&mech, &q, &qd), 0.5 * p.dot(&qd), epsilon = 1e-10);
}

fn free_tree_start() -> Pose {
    Pose::from_position_rotation(
        Point3::new(0.4, -0.3, 1.2),
        UnitQuaternion::from_euler_angles(0.7, -0.4, 1.1),
    )
}

/// World poses of the free tree `t` after `(q0, base)` at constant `qd`.
fn free_tree_poses(mech: &Mechanism, q0: &DVector<f64>, qd: &DVector<f64>, t: f64) -> Vec<Pose> {
    let base = advance_free_pose(&free_tree_start(), &qd.as_slice()[..6], t);
    forward_kinematics(mech, &(q0 + qd * t), &[base])
}

fn free_tree_frame(mech: &Mechanism, q0: &DVector<f64>, qd: &DVector<f64>, t: f64) -> ComFrame {
    let x = free_tree_poses(mech, q0, qd, t);
    transform_com(mech, &(q0 + qd * t), qd, &x).unwrap()
}

/// Test: below a free root, `cd` still matches the differenced poses.
#[test]
fn free_root_cd_matches_differenced_poses() {
    let mech = free_tree(DynamicsConfig::default());
    let n = mech.dof_count();
    assert_eq!(n, 9);

    for seed in 0..3 {
        let q0 = sample_vector(n, 700 + seed, 1.0);
        let qd = sample_vector(n, 800 + seed, 1.5);
        let frame = free_tree_frame(&mech, &q0, &qd, 0.0);

        let x0 = free_tree_poses(&mech, &q0, &qd, 0.0);
        let plus = free_tree_poses(&mech, &q0, &qd, H);
        let minus = free_tree_poses(&mech, &q0, &qd, -H);

        for i in 0..mech.link_count() {
            let omega = (plus[i].rotation * minus[i].rotation.inverse()).scaled_axis() / (2.0 * H);
            let anchor = x0[i].inverse_transform_point(&frame.com);
            let v = (plus[i].transform_point(&anchor) - minus[i].transform_point(&anchor)) / (2.0 * H);

            assert_relative_eq!(frame.cd[i].angular, omega, epsilon = FD_TOL);
            assert_relative_eq!(frame.cd[i].linear, v, epsilon = FD_TOL);
        }
    }
}

/// Test: with a free root, the acceleration pass and the bias force agree
/// with differenced link velocities.
///
/// `cd` is re-referenced to the fixed point `com(0)` before differencing so
/// the derivative is a true spatial acceleration; the free joint and the
/// child joints all move at constant rates, so `qdd = 0`.
#[test]
fn free_root_bias_matches_differenced_acceleration() {
    let h = 1e-5;

    for config in [DynamicsConfig::default().zero_gravity(), DynamicsConfig::default()] {
        let mech = free_tree(config);
        let n = mech.dof_count();
        let seed_acceleration = Motion::linear(-mech.gravity());

        for seed in 0..3 {
            let q0 = sample_vector(n, 900 + seed, 1.0);
            let qd = sample_vector(n, 950 + seed, 1.5);
            let frame = free_tree_frame(&mech, &q0, &qd, 0.0);

            let about_start = |t: f64| -> Vec<Motion> {
                let moved = free_tree_frame(&mech, &q0, &qd, t);
                let r: Vector3<f64> = frame.com - moved.com;
                moved.cd.iter().map(|v| v.shift(&r)).collect()
            };
            let (plus, minus) = (about_start(h), about_start(-h));
            let expected: Vec<Motion> = plus
                .iter()
                .zip(&minus)
                .map(|(p, m)| (*p - *m) * (0.5 / h) + seed_acceleration)
                .collect();

            let cdd = link_accelerations(&mech, &qd, &frame).unwrap();
            for (actual, expected) in cdd.iter().zip(&expected) {
                assert_relative_eq!(actual.angular, expected.angular, epsilon = FD_TOL);
                assert_relative_eq!(actual.linear, expected.linear, epsilon = FD_TOL);
            }

            let subtree = subtree_forces(&mech, link_forces(&frame, &expected));
            let bias = inverse(&mech, &qd, &frame).unwrap();
            for k in 0..n {
                let reference = frame.cdof[k].dot(&subtree[mech.dof_link()[k]]);
                assert_relative_eq!(bias[k], reference, epsilon = FD_TOL);
            }
        }
    }
}
