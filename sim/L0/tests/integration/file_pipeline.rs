//! File streams → decomposition → output tables.

use std::path::Path;

use approx::assert_relative_eq;
use jointspace_analysis::{
    parse_row, AnalysisError, Decomposer, ForceOutputs, FrameJacobianRun, GroundReaction,
    JointSpaceForceRun, StreamPaths, SynchronizedReader, TimeSeriesFrame, ACTUATION_FILE,
    LEFT_ATTACHMENT_FILE, RESIDUAL_FILE, RIGHT_ATTACHMENT_FILE,
};
use jointspace_conformance_tests::{write_table, GaitRecording};
use jointspace_core::{Model, RigidBodySystem};
use jointspace_types::{AnalysisConfig, AttachmentConfig, MultibodySystem, Stage};
use nalgebra::{DMatrix, DVector, Vector3};

const DOFS: usize = 12;

fn stream_paths(dir: &Path) -> StreamPaths {
    StreamPaths {
        ground_reaction: dir.join("grf.txt"),
        states: dir.join("states.txt"),
        accelerations: dir.join("accelerations.txt"),
        dynamics: dir.join("dynamics.txt"),
    }
}

fn rows(path: &Path) -> Vec<Vec<f64>> {
    std::fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(|l| parse_row(l).expect("numeric row"))
        .collect()
}

/// Net torques equal to the implied internal forces, so a consistent run has
/// no residual.
fn closed_loop_recording(frames: usize, config: &AnalysisConfig) -> GaitRecording {
    let mut recording = GaitRecording::synthetic(DOFS, frames, 0.01);
    let mut system = RigidBodySystem::new(Model::gait_biped()).expect("biped");
    let decomposer = Decomposer::new(&system, config).expect("decomposer");
    for f in 0..recording.len() {
        let frame = TimeSeriesFrame {
            time: recording.times[f],
            states: recording.states[f].clone(),
            accelerations: DVector::from_vec(recording.accelerations[f].clone()),
            net_torques: DVector::zeros(DOFS),
            ground_reaction: GroundReaction::new(recording.ground_reaction[f]),
        };
        let d = decomposer.decompose(&mut system, &frame).expect("decompose");
        recording.net_torques[f] = d.check.internal.iter().copied().collect();
    }
    recording
}

#[test]
fn forces_from_files_close_the_residual() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_dir = dir.path().join("results");
    let config = AnalysisConfig::default().attachment(AttachmentConfig::default());
    let recording = closed_loop_recording(6, &config);
    recording.write(dir.path(), &config).expect("write inputs");

    let mut system = RigidBodySystem::new(Model::gait_biped()).expect("biped");
    let mut reader =
        SynchronizedReader::open(&stream_paths(dir.path()), DOFS, &config).expect("open");
    let mut outputs = ForceOutputs::create(&out_dir, &config).expect("outputs");
    let summary = JointSpaceForceRun::new(&mut system, &config)
        .expect("run")
        .run(&mut reader, &mut outputs)
        .expect("completed run");

    assert_eq!(summary.frames_read, 6);
    assert_eq!(summary.frames_written, 6);
    assert!(
        summary.max_abs_residual < 1e-8,
        "{}",
        summary.max_abs_residual
    );

    let residual = rows(&out_dir.join(RESIDUAL_FILE));
    assert_eq!(residual.len(), 6);
    for (row, t) in residual.iter().zip(&recording.times) {
        assert_eq!(row.len(), 1 + DOFS);
        assert_eq!(row[0], *t);
        assert!(row[1..].iter().all(|r| r.abs() < 1e-8));
    }

    let actuation = rows(&out_dir.join(ACTUATION_FILE));
    for (row, tau) in actuation.iter().zip(&recording.net_torques) {
        assert_eq!(&row[1..], tau.as_slice());
    }

    for name in [RIGHT_ATTACHMENT_FILE, LEFT_ATTACHMENT_FILE] {
        let table = rows(&out_dir.join(name));
        assert_eq!(table.len(), 6 * 6);
        assert_eq!(table[6][0], recording.times[1]);
    }
}

#[test]
fn misaligned_stream_stops_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_dir = dir.path().join("results");
    let config = AnalysisConfig::default();
    let recording = GaitRecording::synthetic(DOFS, 4, 0.01);
    recording.write(dir.path(), &config).expect("write inputs");

    let mut shifted = recording.times.clone();
    shifted[2] += 0.005;
    write_table(
        &dir.path().join("dynamics.txt"),
        "time\ttau",
        &shifted,
        &recording.net_torques,
    )
    .expect("rewrite dynamics");

    let mut system = RigidBodySystem::new(Model::gait_biped()).expect("biped");
    let mut reader =
        SynchronizedReader::open(&stream_paths(dir.path()), DOFS, &config).expect("open");
    let mut outputs = ForceOutputs::create(&out_dir, &config).expect("outputs");
    let err = JointSpaceForceRun::new(&mut system, &config)
        .expect("run")
        .run(&mut reader, &mut outputs)
        .expect_err("misaligned");
    assert!(
        matches!(err, AnalysisError::Misaligned { frame: 2, .. }),
        "{err}"
    );

    // Frames before the failure stay on disk.
    drop(outputs);
    assert_eq!(rows(&out_dir.join(ACTUATION_FILE)).len(), 2);
}

#[test]
fn unequal_stream_lengths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recording = GaitRecording::synthetic(DOFS, 3, 0.01);
    let strict = AnalysisConfig::default();
    recording.write(dir.path(), &strict).expect("write inputs");
    let grf: Vec<Vec<f64>> = recording.ground_reaction[..2]
        .iter()
        .map(|c| c.to_vec())
        .collect();
    write_table(
        &dir.path().join("grf.txt"),
        "time\tground_force",
        &recording.times[..2],
        &grf,
    )
    .expect("truncate grf");

    let mut reader =
        SynchronizedReader::open(&stream_paths(dir.path()), DOFS, &strict).expect("open");
    let frames: Vec<_> = reader.by_ref().collect();
    assert_eq!(frames.len(), 3);
    assert!(frames[..2].iter().all(Result::is_ok));
    assert!(matches!(frames[2], Err(AnalysisError::LengthMismatch { rows: 2, .. })));

    let lenient = AnalysisConfig::default().allow_unequal_length();
    let reader =
        SynchronizedReader::open(&stream_paths(dir.path()), DOFS, &lenient).expect("open");
    let frames: Vec<_> = reader.collect::<Result<_, _>>().expect("lenient read");
    assert_eq!(frames.len(), 2);
}

#[test]
fn frame_jacobians_from_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_dir = dir.path().join("jacobians");
    let recording = GaitRecording::synthetic(DOFS, 3, 0.02);
    write_table(
        &dir.path().join("states.txt"),
        "time\tstates",
        &recording.times,
        &recording.states,
    )
    .expect("states");
    let settings = dir.path().join("points.xml");
    std::fs::write(
        &settings,
        r#"<?xml version="1.0"?>
        <FrameJacobianSettings>
            <Points>
                <Point name="heel_r">
                    <location>-0.02 -0.01 0</location>
                    <frame>calcn_r</frame>
                </Point>
                <Point name="knee_l">
                    <location>0 -0.396 0</location>
                    <frame>femur_l</frame>
                </Point>
            </Points>
        </FrameJacobianSettings>"#,
    )
    .expect("settings");

    let points = jointspace_mjcf::load_points_from_file(&settings).expect("points");
    let mut system = RigidBodySystem::new(Model::gait_biped()).expect("biped");
    let mut run = FrameJacobianRun::new(&mut system, &points).expect("run");
    let mut states = run.open_states(dir.path().join("states.txt")).expect("states");
    let mut outputs = run.create_outputs(&out_dir, true).expect("outputs");
    assert_eq!(run.run(&mut states, &mut outputs).expect("completed"), 3);
    drop(outputs);

    let mut reference = RigidBodySystem::new(Model::gait_biped()).expect("biped");
    for (name, body, station) in [
        ("heel_r", "calcn_r", Vector3::new(-0.02, -0.01, 0.0)),
        ("knee_l", "femur_l", Vector3::new(0.0, -0.396, 0.0)),
    ] {
        let table = rows(&out_dir.join(format!("{name}.txt")));
        assert_eq!(table.len(), 3 * 6);
        let body = reference.find_body_index(body).expect("body");
        for f in 0..3 {
            reference.set_state(&recording.states[f]).expect("state");
            reference.realize(Stage::Position).expect("realize");
            let expected = reference.calc_frame_jacobian(body, &station).expect("jacobian");
            let written = DMatrix::from_fn(6, DOFS, |r, c| table[6 * f + r][1 + c]);
            let block = &table[6 * f..6 * f + 6];
            assert!(block.iter().all(|row| row[0] == recording.times[f]));
            assert_relative_eq!(written, expected, epsilon = 1e-12);
        }
    }
}
