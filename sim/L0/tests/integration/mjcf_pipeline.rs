//! MJCF loading → rigid-body system.

use approx::assert_relative_eq;
use jointspace_analysis::{Decomposer, GroundReaction, TimeSeriesFrame};
use jointspace_conformance_tests::pendulum_mjcf;
use jointspace_core::{Model, RigidBodySystem};
use jointspace_types::{AnalysisConfig, MissingBodyPolicy, MultibodySystem, Stage};
use nalgebra::{DVector, Vector3};

fn realized(model: Model, state: &[f64]) -> RigidBodySystem {
    let mut system = RigidBodySystem::new(model).expect("valid model");
    system.set_state(state).expect("state");
    system.realize(Stage::Dynamics).expect("realize");
    system
}

/// A pendulum described in MJCF behaves exactly like the factory pendulum.
#[test]
fn mjcf_pendulum_matches_factory() {
    let (length, mass) = (0.5, 1.5);
    for state in [
        [0.0, 0.0, 0.0, 0.0],
        [0.4, -0.7, 1.2, 0.3],
        [-1.1, 2.0, -0.5, 2.5],
    ] {
        let loaded = jointspace_mjcf::load_model(&pendulum_mjcf(2, length, mass)).expect("load");
        assert_eq!(loaded.name, "2_link_pendulum");
        let factory = Model::n_link_pendulum(2, length, mass);
        assert_eq!(loaded.jnt_name, factory.jnt_name);

        let a = realized(loaded, &state);
        let b = realized(factory, &state);

        for col in 0..2 {
            let mut e = DVector::zeros(2);
            e[col] = 1.0;
            let ma = a.multiply_by_mass_matrix(&e).expect("mass");
            let mb = b.multiply_by_mass_matrix(&e).expect("mass");
            assert_relative_eq!(ma, mb, epsilon = 1e-12);
        }

        let fa = a.gravity_body_forces().expect("gravity");
        let fb = b.gravity_body_forces().expect("gravity");
        let ga = a.multiply_by_system_jacobian_transpose(&fa).expect("jt");
        let gb = b.multiply_by_system_jacobian_transpose(&fb).expect("jt");
        assert_relative_eq!(ga, gb, epsilon = 1e-12);

        let tip = Vector3::new(0.0, 0.0, -length);
        let ja = a.calc_frame_jacobian(2, &tip).expect("jacobian");
        let jb = b.calc_frame_jacobian(2, &tip).expect("jacobian");
        assert_relative_eq!(ja, jb, epsilon = 1e-12);

        for body in 1..3 {
            let ca = a.centrifugal_body_force(body).expect("centrifugal");
            let cb = b.centrifugal_body_force(body).expect("centrifugal");
            assert_relative_eq!(ca, cb, epsilon = 1e-12);
        }
    }
}

/// Holding a loaded pendulum still takes `m g L sin q` and leaves no residual.
#[test]
fn mjcf_pendulum_static_hold() {
    let (length, mass, q) = (0.8, 2.0, 0.4_f64);
    let model = jointspace_mjcf::load_model(&pendulum_mjcf(1, length, mass)).expect("load");
    let mut system = RigidBodySystem::new(model).expect("system");

    let config = AnalysisConfig::default().missing_body(MissingBodyPolicy::Zero);
    let decomposer = Decomposer::new(&system, &config).expect("decomposer");

    let hold = mass * 9.81 * length * q.sin();
    let frame = TimeSeriesFrame {
        time: 0.0,
        states: vec![q, 0.0],
        accelerations: DVector::zeros(1),
        net_torques: DVector::from_element(1, hold),
        ground_reaction: GroundReaction::default(),
    };
    let d = decomposer.decompose(&mut system, &frame).expect("decompose");

    assert_relative_eq!(d.forces.gravity[0], -hold, epsilon = 1e-12);
    assert_relative_eq!(d.forces.coriolis[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(d.forces.inertia[0], 0.0, epsilon = 1e-12);
    assert!(d.check.max_abs_residual() < 1e-12);
}

/// A model file on disk loads the same as its source text.
#[test]
fn mjcf_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pendulum.xml");
    let source = pendulum_mjcf(3, 0.3, 1.0);
    std::fs::write(&path, &source).expect("write");

    let from_file = jointspace_mjcf::load_model_from_file(&path).expect("load file");
    let from_str = jointspace_mjcf::load_model(&source).expect("load str");
    assert_eq!(from_file.nbody, 4);
    assert_eq!(from_file.nv, 3);
    assert_eq!(from_file.body_name, from_str.body_name);
    assert_eq!(from_file.body_parent, from_str.body_parent);

    let missing = jointspace_mjcf::load_model_from_file(dir.path().join("nope.xml"));
    assert!(matches!(missing, Err(jointspace_mjcf::MjcfError::Io { .. })));
}
