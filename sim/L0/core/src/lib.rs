//! Reference rigid-body engine for joint-space force analysis.
//!
//! This crate provides a MuJoCo-style Model/Data architecture for tree-shaped
//! multibody systems with hinge and slide joints, and implements the
//! [`MultibodySystem`](jointspace_types::MultibodySystem) interface on top of
//! it. It follows Todorov's design where:
//!
//! - [`Model`] is static (immutable after loading)
//! - [`Data`] is dynamic (qpos/qvel are the source of truth)
//! - Everything else is derived by stage passes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Model                               │
//! │  Static: kinematic tree, joint definitions, inertias        │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Data                               │
//! │  qpos ─▶ Position ─▶ xpos, xquat, cinert, cdof              │
//! │  qvel ─▶ Velocity ─▶ cvel, cdof_dot                         │
//! │       ─▶ Dynamics ─▶ cacc_bias, cfrc_bias                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Spatial quantities are expressed in the world frame about the world
//! origin; see [`dynamics`] for the conventions.
//!
//! # Layer 0 Crate
//!
//! No file I/O and no rendering. Models come from `jointspace-mjcf` or from
//! the factories on [`Model`].
//!
//! # Quick Start
//!
//! ```
//! use jointspace_core::{Model, RigidBodySystem};
//! use jointspace_types::{MultibodySystem, Stage};
//!
//! let mut system = RigidBodySystem::new(Model::gait_biped())?;
//! let mut state = vec![0.0; 2 * system.dof_count()];
//! state[6] = 0.4; // right hip flexion
//! system.set_state(&state)?;
//! system.realize(Stage::Dynamics)?;
//!
//! let gravity = system.gravity_body_forces()?;
//! let tau = system.multiply_by_system_jacobian_transpose(&gravity)?;
//! assert_eq!(tau.len(), 12);
//! # Ok::<(), jointspace_types::DynamicsError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::needless_range_loop,        // Index loops mirror the tree-walk notation
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Core type definitions (JointType, Model, Data, factories)
pub mod types;

// Spatial algebra and Newton-Euler passes
pub mod dynamics;

// Stage pipeline (position, velocity, dynamics)
pub mod forward;

// Frame Jacobians and force projection
pub mod jacobian;

mod system;

pub use system::RigidBodySystem;
pub use types::{Data, JointType, Model};
