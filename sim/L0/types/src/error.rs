//! Error types for multibody system operations.

use thiserror::Error;

use crate::Stage;

/// Errors raised by a [`MultibodySystem`](crate::MultibodySystem) implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DynamicsError {
    /// State vector has the wrong number of entries.
    #[error("invalid state vector: expected {expected} values (2 x {dofs} DOFs), got {actual}")]
    InvalidStateLength {
        /// Number of degrees of freedom of the system.
        dofs: usize,
        /// Expected length (`2 * dofs`).
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// An operator was called before the state was realized far enough.
    #[error("state realized to {current:?}, operator requires {required:?}")]
    StageViolation {
        /// Stage the operator needs.
        required: Stage,
        /// Stage the state is currently realized to.
        current: Stage,
    },

    /// Body index outside `0..body_count`.
    #[error("invalid body index {index} (system has {count} bodies)")]
    InvalidBodyIndex {
        /// The offending index.
        index: usize,
        /// Number of bodies in the system.
        count: usize,
    },

    /// A vector argument has the wrong dimension.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which argument was wrong.
        what: &'static str,
        /// Expected dimension.
        expected: usize,
        /// Supplied dimension.
        actual: usize,
    },

    /// A state value is NaN or infinite.
    #[error("non-finite state value at index {index}: {value}")]
    NonFiniteState {
        /// Index into the state vector.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl DynamicsError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error.
    #[must_use]
    pub fn dimension(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
