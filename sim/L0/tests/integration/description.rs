//! Mechanism descriptions through serde.
//!
//! A deserialized mechanism goes through the same validation as one built
//! in code; malformed descriptions fail with the validation error text.

use nalgebra::{DVector, Vector3};
use serde_json::{Value, json};
use sim_generalized::{DynamicsConfig, Gravity, Mechanism};

use super::common::{TOL, evaluate, mixed_tree, sample_vector};

fn description() -> Value {
    serde_json::to_value(mixed_tree(DynamicsConfig::default())).unwrap()
}

#[test]
fn joint_types_serialize_as_axis_tags() {
    let value = description();
    let tags: Vec<&str> = value["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["joint"].as_str().unwrap())
        .collect();
    assert_eq!(tags, ["pr", "rr", "prr", "r"]);
    assert_eq!(value["dofs"].as_array().unwrap().len(), 8);
}

#[test]
fn round_trip_preserves_mechanism() {
    let mech = mixed_tree(DynamicsConfig::default().gravity(Gravity::custom(Vector3::new(0.5, 0.0, -1.5))));
    let text = serde_json::to_string(&mech).unwrap();
    let back: Mechanism = serde_json::from_str(&text).unwrap();

    for (a, b) in back.links().iter().zip(mech.links()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.parent, b.parent);
        assert_eq!(a.joint, b.joint);
        assert!((a.inertia.mass - b.inertia.mass).abs() < TOL);
    }
    assert_eq!(back.topological_order(), mech.topological_order());
    assert_eq!(back.config(), mech.config());

    let q = sample_vector(8, 11, 1.0);
    let qd = sample_vector(8, 12, 1.0);
    let expected = evaluate(&mech, &q, &qd);
    let actual = evaluate(&back, &q, &qd);
    assert!((expected.net - actual.net).amax() < TOL);
}

#[test]
fn unknown_joint_tag_is_rejected() {
    let mut value = description();
    value["links"][3]["joint"] = json!("x");
    let err = serde_json::from_value::<Mechanism>(value).unwrap_err();
    assert!(
        err.to_string().contains("unsupported joint type"),
        "unexpected error: {err}"
    );
}

#[test]
fn too_many_stacked_axes_are_rejected() {
    let mut value = description();
    value["links"][3]["joint"] = json!("rrrr");
    assert!(serde_json::from_value::<Mechanism>(value).is_err());
}

#[test]
fn invalid_parent_is_rejected() {
    let mut value = description();
    value["links"][1]["parent"] = json!(17);
    let err = serde_json::from_value::<Mechanism>(value).unwrap_err();
    assert!(err.to_string().contains("invalid parent"), "unexpected error: {err}");
}

#[test]
fn second_root_is_rejected() {
    let mut value = description();
    value["links"][3]["parent"] = Value::Null;
    let err = serde_json::from_value::<Mechanism>(value).unwrap_err();
    assert!(err.to_string().contains("forest"), "unexpected error: {err}");
}

#[test]
fn dof_count_must_match_joints() {
    let mut value = description();
    value["dofs"].as_array_mut().unwrap().pop();
    let err = serde_json::from_value::<Mechanism>(value).unwrap_err();
    assert!(err.to_string().contains("shape mismatch"), "unexpected error: {err}");
}

#[test]
fn missing_config_uses_defaults() {
    let mut value = description();
    value.as_object_mut().unwrap().remove("config");
    let mech: Mechanism = serde_json::from_value(value).unwrap();
    assert_eq!(mech.config(), &DynamicsConfig::default());

    // Default gravity points along -z, across the torso slide.
    let forces = evaluate(&mech, &DVector::zeros(8), &DVector::zeros(8));
    assert!(forces.bias[0].abs() < TOL);
}
