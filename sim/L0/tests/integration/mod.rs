//! Integration tests for the jointspace crates.
//!
//! These tests verify end-to-end functionality:
//! - MJCF loading → rigid-body system matching the programmatic factories
//! - Joint-space force decomposition on the gait model
//! - File streams → decomposition → output tables, and frame Jacobian export

pub mod file_pipeline;
pub mod force_decomposition;
pub mod mjcf_pipeline;
