//! Station descriptors for frame Jacobian export.

use nalgebra::Vector3;

/// A point fixed to a named body, with the name its output is written under.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPointSpec {
    /// Location in the body's frame.
    pub point: Vector3<f64>,
    /// Name of the body the point is fixed to.
    pub frame_name: String,
    /// Output key; unique within a collection.
    pub output_name: String,
}

impl ContactPointSpec {
    /// Create a new point descriptor.
    #[must_use]
    pub fn new(
        point: Vector3<f64>,
        frame_name: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            point,
            frame_name: frame_name.into(),
            output_name: output_name.into(),
        }
    }
}

/// First output name that appears more than once, if any.
#[must_use]
pub fn first_duplicate_name(points: &[ContactPointSpec]) -> Option<&str> {
    points.iter().enumerate().find_map(|(i, p)| {
        points[..i]
            .iter()
            .any(|q| q.output_name == p.output_name)
            .then_some(p.output_name.as_str())
    })
}

/// Whether `name` can be used as a single file-name component: non-empty,
/// not `.` or `..`, and free of path separators and NUL.
#[must_use]
pub fn is_valid_output_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

/// First output name rejected by [`is_valid_output_name`], if any.
#[must_use]
pub fn first_invalid_name(points: &[ContactPointSpec]) -> Option<&str> {
    points
        .iter()
        .map(|p| p.output_name.as_str())
        .find(|name| !is_valid_output_name(name))
}
