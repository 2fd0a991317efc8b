//! Configuration for joint-space force analysis.
//!
//! [`AnalysisConfig`] maps the logical body roles used by the decomposition
//! (left/right ground contact, left/right attachment) to model body names,
//! and controls unit conversion, stream alignment and output layout. The
//! defaults reproduce the conventions of a gait model with `calcn_*` feet
//! and `femur_*` thighs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DynamicsError;

/// Main configuration for a decomposition run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Bodies receiving the right/left ground reaction.
    pub contact: BodyPair,
    /// Optional stations whose frame Jacobians are exported every frame.
    pub attachment: Option<AttachmentConfig>,
    /// What to do when a configured body is not in the model.
    pub missing_body: MissingBodyPolicy,
    /// Acceleration indices already in model units.
    ///
    /// Every other acceleration column is converted from degrees to radians.
    pub unconverted_accelerations: Vec<usize>,
    /// Absolute tolerance when comparing time stamps across streams.
    pub time_tolerance: f64,
    /// Fail when input streams end at different rows.
    pub require_equal_length: bool,
    /// Compute but do not write the first frame.
    pub skip_first_frame: bool,
    /// Prefix each output row with the frame time.
    pub write_time: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            contact: BodyPair::new("calcn_r", "calcn_l"),
            attachment: None,
            missing_body: MissingBodyPolicy::Error,
            unconverted_accelerations: vec![3, 4, 5],
            time_tolerance: 1e-6,
            require_equal_length: true,
            skip_first_frame: false,
            write_time: true,
        }
    }
}

impl AnalysisConfig {
    /// Set the ground-contact bodies.
    #[must_use]
    pub fn contact(mut self, right: impl Into<String>, left: impl Into<String>) -> Self {
        self.contact = BodyPair::new(right, left);
        self
    }

    /// Export frame Jacobians at the given attachment stations.
    #[must_use]
    pub fn attachment(mut self, attachment: AttachmentConfig) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Set the policy for configured bodies absent from the model.
    #[must_use]
    pub fn missing_body(mut self, policy: MissingBodyPolicy) -> Self {
        self.missing_body = policy;
        self
    }

    /// Set the acceleration indices exempt from degree conversion.
    #[must_use]
    pub fn unconverted_accelerations(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.unconverted_accelerations = indices.into();
        self
    }

    /// Set the time alignment tolerance.
    #[must_use]
    pub fn time_tolerance(mut self, tolerance: f64) -> Self {
        self.time_tolerance = tolerance;
        self
    }

    /// Stop quietly at the shortest stream instead of failing.
    #[must_use]
    pub fn allow_unequal_length(mut self) -> Self {
        self.require_equal_length = false;
        self
    }

    /// Drop the first frame from the output.
    #[must_use]
    pub fn skip_first_frame(mut self, skip: bool) -> Self {
        self.skip_first_frame = skip;
        self
    }

    /// Control the time column of output rows.
    #[must_use]
    pub fn write_time(mut self, write: bool) -> Self {
        self.write_time = write;
        self
    }

    /// Whether acceleration column `index` is converted from degrees.
    #[must_use]
    pub fn converts_acceleration(&self, index: usize) -> bool {
        !self.unconverted_accelerations.contains(&index)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::InvalidConfig`] for empty or coinciding body
    /// names, a negative or non-finite tolerance, or a non-finite station.
    pub fn validate(&self) -> crate::Result<()> {
        self.contact.validate("contact")?;

        if let Some(attachment) = &self.attachment {
            attachment.bodies.validate("attachment")?;
            if attachment.point.iter().any(|v| !v.is_finite()) {
                return Err(DynamicsError::invalid_config(
                    "attachment point must be finite",
                ));
            }
        }

        if !self.time_tolerance.is_finite() || self.time_tolerance < 0.0 {
            return Err(DynamicsError::invalid_config(format!(
                "time tolerance must be finite and non-negative, got {}",
                self.time_tolerance
            )));
        }

        Ok(())
    }

    /// [`validate`](Self::validate), then check that every unconverted
    /// acceleration index addresses one of `dof_count` columns.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::InvalidConfig`] for the first index at or
    /// beyond `dof_count`.
    pub fn validate_for_dofs(&self, dof_count: usize) -> crate::Result<()> {
        self.validate()?;
        if let Some(index) = self
            .unconverted_accelerations
            .iter()
            .find(|&&i| i >= dof_count)
        {
            return Err(DynamicsError::invalid_config(format!(
                "unconverted acceleration index {index} exceeds {dof_count} degrees of freedom"
            )));
        }
        Ok(())
    }
}

/// A right/left pair of body names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyPair {
    /// Right-side body.
    pub right: String,
    /// Left-side body.
    pub left: String,
}

impl BodyPair {
    /// Create a body pair.
    #[must_use]
    pub fn new(right: impl Into<String>, left: impl Into<String>) -> Self {
        Self {
            right: right.into(),
            left: left.into(),
        }
    }

    fn validate(&self, role: &str) -> crate::Result<()> {
        if self.right.is_empty() || self.left.is_empty() {
            return Err(DynamicsError::invalid_config(format!(
                "{role} body names must not be empty"
            )));
        }
        if self.right == self.left {
            return Err(DynamicsError::invalid_config(format!(
                "{role} bodies must differ, both are '{}'",
                self.right
            )));
        }
        Ok(())
    }
}

/// Stations on a body pair whose frame Jacobians are exported.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttachmentConfig {
    /// Attachment bodies.
    pub bodies: BodyPair,
    /// Station in each body's frame.
    pub point: [f64; 3],
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            bodies: BodyPair::new("femur_r", "femur_l"),
            point: [0.0, -0.35, 0.0],
        }
    }
}

/// Handling of configured body names that the model does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MissingBodyPolicy {
    /// Refuse to start.
    #[default]
    Error,
    /// Use a zero contribution and log a warning.
    Zero,
}
