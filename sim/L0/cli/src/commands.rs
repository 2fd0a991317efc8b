//! Subcommand implementations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use jointspace_analysis::{
    ForceOutputs, FrameJacobianRun, JointSpaceForceRun, StreamPaths, SynchronizedReader,
};
use jointspace_core::RigidBodySystem;
use jointspace_types::{AnalysisConfig, MultibodySystem};
use tracing::info;

use crate::{ForcesArgs, JacobiansArgs};

/// Read an [`AnalysisConfig`] from JSON, or use the defaults.
fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    config.validate().context("invalid analysis configuration")?;
    Ok(config)
}

fn load_system(path: &Path) -> Result<RigidBodySystem> {
    let model = jointspace_mjcf::load_model_from_file(path)
        .with_context(|| format!("failed to load model {}", path.display()))?;
    let system = RigidBodySystem::new(model)
        .with_context(|| format!("model {} is not usable", path.display()))?;
    Ok(system)
}

/// `jointspace forces`.
pub fn forces(args: &ForcesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut system = load_system(&args.model)?;
    info!(
        model = %args.model.display(),
        dofs = system.dof_count(),
        bodies = system.body_count(),
        "model loaded"
    );

    let paths = StreamPaths {
        ground_reaction: args.grf.clone(),
        states: args.states.clone(),
        accelerations: args.accelerations.clone(),
        dynamics: args.dynamics.clone(),
    };
    let mut reader = SynchronizedReader::open(&paths, system.dof_count(), &config)
        .context("failed to open input streams")?;
    let mut outputs = ForceOutputs::create(&args.out_dir, &config)
        .with_context(|| format!("failed to create outputs in {}", args.out_dir.display()))?;

    let summary = JointSpaceForceRun::new(&mut system, &config)?
        .run(&mut reader, &mut outputs)
        .context("joint-space force run failed")?;

    info!(
        frames = summary.frames_written,
        max_abs_residual = summary.max_abs_residual,
        out_dir = %args.out_dir.display(),
        "forces written"
    );
    Ok(())
}

/// `jointspace jacobians`.
pub fn jacobians(args: &JacobiansArgs) -> Result<()> {
    let points = jointspace_mjcf::load_points_from_file(&args.points)
        .with_context(|| format!("failed to load points {}", args.points.display()))?;
    let mut system = load_system(&args.model)?;

    let mut run = FrameJacobianRun::new(&mut system, &points)?;
    let mut states = run
        .open_states(&args.states)
        .context("failed to open states")?;
    let mut outputs = run
        .create_outputs(&args.out_dir, true)
        .with_context(|| format!("failed to create outputs in {}", args.out_dir.display()))?;
    let frames = run
        .run(&mut states, &mut outputs)
        .context("frame jacobian run failed")?;

    info!(
        frames,
        points = points.len(),
        out_dir = %args.out_dir.display(),
        "jacobians written"
    );
    Ok(())
}
