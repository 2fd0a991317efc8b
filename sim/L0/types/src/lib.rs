//! Shared types for joint-space force analysis.
//!
//! This crate is the common language between the rigid-body engine and the
//! analysis tools built on it:
//!
//! - [`MultibodySystem`] - The engine operations a force decomposition needs
//! - [`Stage`] - How far a state has been realized
//! - [`SpatialVec`] - 6D `[angular, linear]` vectors in the world frame
//! - [`AnalysisConfig`] - Body roles, unit conversion, output layout
//! - [`ContactPointSpec`] - Named stations for frame Jacobian export
//!
//! # Layer 0
//!
//! Pure data and traits, no file I/O and no engine. Any rigid-body engine can
//! be analyzed by implementing [`MultibodySystem`].
//!
//! # Example
//!
//! ```
//! use jointspace_types::{spatial_force, AnalysisConfig, MissingBodyPolicy};
//! use nalgebra::Vector3;
//!
//! let config = AnalysisConfig::default().missing_body(MissingBodyPolicy::Zero);
//! assert!(config.validate().is_ok());
//! assert!(config.converts_acceleration(0));
//! assert!(!config.converts_acceleration(4));
//!
//! let f = spatial_force(&Vector3::zeros(), &Vector3::new(0.0, 700.0, 0.0));
//! assert_eq!(f[4], 700.0);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod config;
mod error;
mod points;
mod system;

pub use config::{AnalysisConfig, AttachmentConfig, BodyPair, MissingBodyPolicy};
pub use error::DynamicsError;
pub use points::{first_duplicate_name, first_invalid_name, is_valid_output_name, ContactPointSpec};
pub use system::{spatial_force, MultibodySystem, SpatialVec, Stage};

// Re-export math types for convenience
pub use nalgebra::{DMatrix, DVector, Vector3};

/// Result type for multibody system operations.
pub type Result<T> = std::result::Result<T, DynamicsError>;
