//! Joint type vocabulary.

/// Joint type following `MuJoCo` naming.
///
/// Both variants carry exactly one degree of freedom, so for every model
/// `nq == nv` and generalized coordinates and speeds share indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JointType {
    /// Rotation about a single axis through an anchor point.
    /// qpos: angle in radians. qvel: angular velocity.
    #[default]
    Hinge,
    /// Translation along a single axis.
    /// qpos: displacement. qvel: linear velocity.
    Slide,
}

impl JointType {
    /// Number of degrees of freedom contributed by this joint.
    #[must_use]
    pub fn nv(self) -> usize {
        1
    }

    /// `MJCF` spelling of the joint type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hinge => "hinge",
            Self::Slide => "slide",
        }
    }
}
