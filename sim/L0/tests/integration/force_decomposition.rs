//! Joint-space force decomposition on the gait model.

use approx::assert_relative_eq;
use jointspace_analysis::{
    Decomposer, Decomposition, GroundReaction, Side, TimeSeriesFrame, GRF_CHANNELS,
};
use jointspace_conformance_tests::GaitRecording;
use jointspace_core::{Model, RigidBodySystem};
use jointspace_types::{
    spatial_force, AnalysisConfig, AttachmentConfig, MultibodySystem, Stage,
};
use nalgebra::{DVector, Vector3};

const DOFS: usize = 12;
const RIGHT_LEG: std::ops::Range<usize> = 6..9;
const LEFT_LEG: std::ops::Range<usize> = 9..12;

fn biped() -> RigidBodySystem {
    RigidBodySystem::new(Model::gait_biped()).expect("biped")
}

fn recorded_frame(recording: &GaitRecording, f: usize) -> TimeSeriesFrame {
    TimeSeriesFrame {
        time: recording.times[f],
        states: recording.states[f].clone(),
        accelerations: DVector::from_vec(recording.accelerations[f].clone()),
        net_torques: DVector::from_vec(recording.net_torques[f].clone()),
        ground_reaction: GroundReaction::new(recording.ground_reaction[f]),
    }
}

fn decompose(
    system: &mut RigidBodySystem,
    config: &AnalysisConfig,
    frame: &TimeSeriesFrame,
) -> Decomposition {
    Decomposer::new(&*system, config)
        .expect("decomposer")
        .decompose(system, frame)
        .expect("decompose")
}

/// Contact torques are the frame Jacobian transpose applied to the ground
/// reaction at the centre of pressure.
#[test]
fn contact_forces_match_frame_jacobian_transpose() {
    let recording = GaitRecording::synthetic(DOFS, 4, 0.1);
    let mut system = biped();
    let config = AnalysisConfig::default();

    for f in 0..recording.len() {
        let frame = recorded_frame(&recording, f);
        let d = decompose(&mut system, &config, &frame);

        system.set_state(&frame.states).expect("state");
        system.realize(Stage::Position).expect("realize");
        let body = system.find_body_index("calcn_r").expect("calcn_r");
        let load = frame.ground_reaction.load(Side::Right);
        let station = system.transform_point(0, &load.cop, body).expect("station");
        let jacobian = system.calc_frame_jacobian(body, &station).expect("jacobian");
        let expected = jacobian.transpose() * spatial_force(&load.moment, &load.force);

        assert_relative_eq!(d.forces.right_contact, expected, epsilon = 1e-9);
        // No left load in the recording.
        assert!(d.forces.left_contact.iter().all(|v| *v == 0.0));
        for i in LEFT_LEG {
            assert_eq!(d.forces.right_contact[i], 0.0);
        }
    }
}

/// Sliding the centre of pressure along the force's line of action does not
/// change the joint torques.
#[test]
fn contact_torques_invariant_along_line_of_action() {
    let recording = GaitRecording::synthetic(DOFS, 1, 0.1);
    let mut system = biped();
    let config = AnalysisConfig::default();

    let frame = recorded_frame(&recording, 0);
    let base = decompose(&mut system, &config, &frame);

    let mut channels = recording.ground_reaction[0];
    let force = Vector3::new(channels[0], channels[1], channels[2]);
    let shift = force.normalize() * 0.3;
    for k in 0..3 {
        channels[3 + k] += shift[k];
    }
    let shifted = TimeSeriesFrame {
        ground_reaction: GroundReaction::new(channels),
        ..frame
    };
    let moved = decompose(&mut system, &config, &shifted);
    assert_relative_eq!(
        base.forces.right_contact,
        moved.forces.right_contact,
        epsilon = 1e-9
    );
}

/// Feeding the implied internal forces back as net torques closes the
/// residual, and repeating a frame reproduces it exactly.
#[test]
fn internal_forces_close_the_residual() {
    let recording = GaitRecording::synthetic(DOFS, 3, 0.25);
    let mut system = biped();
    let config = AnalysisConfig::default().attachment(AttachmentConfig::default());

    for f in 0..recording.len() {
        let frame = recorded_frame(&recording, f);
        let open_loop = decompose(&mut system, &config, &frame);
        assert_relative_eq!(
            open_loop.check.residual,
            -&open_loop.check.internal,
            epsilon = 1e-9
        );

        let closed = TimeSeriesFrame {
            net_torques: open_loop.check.internal.clone(),
            ..frame.clone()
        };
        let d = decompose(&mut system, &config, &closed);
        assert!(
            d.check.max_abs_residual() < 1e-9,
            "frame {f}: {}",
            d.check.residual
        );
        assert_eq!(d.forces.inertia, open_loop.forces.inertia);
        assert_eq!(d.forces.gravity, open_loop.forces.gravity);

        let again = decompose(&mut system, &config, &closed);
        assert_eq!(again, d);
    }
}

/// Attachment Jacobians at the femur stations only see the pelvis and their
/// own hip.
#[test]
fn attachment_jacobians_follow_the_tree() {
    let recording = GaitRecording::synthetic(DOFS, 1, 0.1);
    let mut system = biped();
    let config = AnalysisConfig::default().attachment(AttachmentConfig::default());
    let d = decompose(&mut system, &config, &recorded_frame(&recording, 0));

    let jacobians = d.attachments.expect("attachments");
    assert_eq!(jacobians.right.shape(), (6, DOFS));
    for row in 0..6 {
        for col in RIGHT_LEG.skip(1).chain(LEFT_LEG) {
            assert_eq!(jacobians.right[(row, col)], 0.0);
        }
        for col in LEFT_LEG.skip(1).chain(RIGHT_LEG) {
            assert_eq!(jacobians.left[(row, col)], 0.0);
        }
    }
    // A hinge column's angular part is its unit axis.
    let hip = jacobians.right.view((0, RIGHT_LEG.start), (3, 1));
    assert_relative_eq!(hip.norm(), 1.0, epsilon = 1e-12);
}

/// Gravity alone on a standing biped: the pelvis translation columns carry
/// the full body weight.
#[test]
fn gravity_on_vertical_translation_is_body_weight() {
    let mut system = biped();
    let model = Model::gait_biped();
    let total_mass: f64 = model.body_mass.iter().sum();

    let frame = TimeSeriesFrame {
        time: 0.0,
        states: vec![0.0; 2 * DOFS],
        accelerations: DVector::zeros(DOFS),
        net_torques: DVector::zeros(DOFS),
        ground_reaction: GroundReaction::new([0.0; GRF_CHANNELS]),
    };
    let d = decompose(&mut system, &AnalysisConfig::default(), &frame);
    // pelvis_ty is coordinate 4; gravity is -9.81 along Y.
    assert_relative_eq!(d.forces.gravity[4], -9.81 * total_mass, epsilon = 1e-9);
    assert_relative_eq!(d.forces.gravity[3], 0.0, epsilon = 1e-12);
    assert_relative_eq!(d.forces.gravity[5], 0.0, epsilon = 1e-12);
}
