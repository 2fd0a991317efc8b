//! Joint-space force analysis of recorded motion.
//!
//! Reads time-aligned recordings (states, accelerations, inverse-dynamics
//! torques and ground reactions), drives a [`MultibodySystem`] through every
//! recorded state and splits the net joint torques into additive components:
//!
//! | Component   | Source                                              |
//! |-------------|-----------------------------------------------------|
//! | inertia     | `M(q) q̈`                                            |
//! | coriolis    | `J^T` of the per-body centrifugal forces            |
//! | gravity     | `J^T` of the per-body gravity forces                |
//! | contact     | frame `J^T` of each foot's ground reaction at its COP |
//! | actuation   | recorded net torques, relayed unchanged             |
//!
//! plus the residual and internal-force checks.
//!
//! The crate is generic over [`MultibodySystem`]; it never touches an engine
//! directly.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use jointspace_analysis::{
//!     ForceOutputs, ForceTableWriter, InputStreams, JointSpaceForceRun, SynchronizedReader,
//! };
//! use jointspace_core::{Model, RigidBodySystem};
//! use jointspace_types::{AnalysisConfig, MissingBodyPolicy};
//!
//! let mut system = RigidBodySystem::new(Model::n_link_pendulum(1, 1.0, 1.0))?;
//! // One hinge, no feet, accelerations in degrees.
//! let config = AnalysisConfig::default()
//!     .missing_body(MissingBodyPolicy::Zero)
//!     .unconverted_accelerations(Vec::new());
//!
//! let grf = format!("0{}\n", "\t0".repeat(18));
//! let streams = InputStreams {
//!     ground_reaction: Cursor::new(grf.into_bytes()),
//!     states: Cursor::new(b"0 0.5 0\n".to_vec()),
//!     accelerations: Cursor::new(b"0 0\n".to_vec()),
//!     dynamics: Cursor::new(b"0 4.7\n".to_vec()),
//! };
//! let mut reader = SynchronizedReader::new(streams, 1, &config)?;
//! let mut outputs = ForceOutputs::from_fn(&config, |name| {
//!     Ok(ForceTableWriter::new(Vec::new(), name, config.write_time))
//! })?;
//!
//! let summary = JointSpaceForceRun::new(&mut system, &config)?
//!     .run(&mut reader, &mut outputs)?;
//! assert_eq!(summary.frames_written, 1);
//! # Ok::<(), jointspace_analysis::AnalysisError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

mod decompose;
mod error;
mod frame;
#[cfg(test)]
mod mock;
mod output;
mod reader;
mod run;
mod stream;

pub use decompose::{AttachmentJacobians, Decomposer, Decomposition};
pub use error::AnalysisError;
pub use frame::{
    ContactLoad, GroundReaction, JointSpaceForceSet, ResidualCheck, Side, TimeSeriesFrame,
    GRF_CHANNELS,
};
pub use output::{
    parse_row, ForceOutputs, ForceTableWriter, ACTUATION_FILE, CORIOLIS_FILE, EXTERNAL_FILE,
    GRAVITY_FILE, INERTIA_FILE, INTERNAL_FILE, LEFT_ATTACHMENT_FILE, RESIDUAL_FILE,
    RIGHT_ATTACHMENT_FILE,
};
pub use reader::{InputStreams, StreamPaths, SynchronizedReader};
pub use run::{FrameJacobianRun, JointSpaceForceRun, RunSummary};
pub use stream::NumericTable;

pub use jointspace_types::MultibodySystem;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
