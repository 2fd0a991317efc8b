//! Per-frame data: the synchronized input sample and the joint-space forces
//! derived from it.

use jointspace_types::{spatial_force, SpatialVec};
use nalgebra::{DVector, Vector3};

/// Number of ground-reaction channels per frame.
pub const GRF_CHANNELS: usize = 18;

/// Foot side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Right foot.
    Right,
    /// Left foot.
    Left,
}

/// Ground-reaction sample for both feet.
///
/// Channel layout: right force (0..3), right centre of pressure (3..6), left
/// force (6..9), left centre of pressure (9..12), right moment (12..15),
/// left moment (15..18). All expressed in the ground frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundReaction([f64; GRF_CHANNELS]);

impl GroundReaction {
    /// Wrap raw channels.
    #[must_use]
    pub fn new(channels: [f64; GRF_CHANNELS]) -> Self {
        Self(channels)
    }

    /// Copy channels from a slice of exactly [`GRF_CHANNELS`] values.
    #[must_use]
    pub fn from_slice(channels: &[f64]) -> Option<Self> {
        channels.try_into().ok().map(Self)
    }

    /// Raw channels.
    #[must_use]
    pub fn channels(&self) -> &[f64; GRF_CHANNELS] {
        &self.0
    }

    fn vec3(&self, start: usize) -> Vector3<f64> {
        Vector3::new(self.0[start], self.0[start + 1], self.0[start + 2])
    }

    /// Right-foot force.
    #[must_use]
    pub fn right_force(&self) -> Vector3<f64> {
        self.vec3(0)
    }

    /// Right-foot centre of pressure.
    #[must_use]
    pub fn right_cop(&self) -> Vector3<f64> {
        self.vec3(3)
    }

    /// Left-foot force.
    #[must_use]
    pub fn left_force(&self) -> Vector3<f64> {
        self.vec3(6)
    }

    /// Left-foot centre of pressure.
    #[must_use]
    pub fn left_cop(&self) -> Vector3<f64> {
        self.vec3(9)
    }

    /// Right-foot moment.
    #[must_use]
    pub fn right_moment(&self) -> Vector3<f64> {
        self.vec3(12)
    }

    /// Left-foot moment.
    #[must_use]
    pub fn left_moment(&self) -> Vector3<f64> {
        self.vec3(15)
    }

    /// The load on one foot.
    #[must_use]
    pub fn load(&self, side: Side) -> ContactLoad {
        match side {
            Side::Right => ContactLoad {
                force: self.right_force(),
                cop: self.right_cop(),
                moment: self.right_moment(),
            },
            Side::Left => ContactLoad {
                force: self.left_force(),
                cop: self.left_cop(),
                moment: self.left_moment(),
            },
        }
    }
}

/// Force, centre of pressure and moment measured under one foot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactLoad {
    /// Force in the ground frame.
    pub force: Vector3<f64>,
    /// Point of application in the ground frame.
    pub cop: Vector3<f64>,
    /// Free moment in the ground frame.
    pub moment: Vector3<f64>,
}

impl ContactLoad {
    /// Spatial force `[moment; force]`.
    #[must_use]
    pub fn spatial_force(&self) -> SpatialVec {
        spatial_force(&self.moment, &self.force)
    }
}

/// One time-aligned sample from the four input streams.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesFrame {
    /// Time stamp shared by all streams.
    pub time: f64,
    /// Generalized coordinates followed by generalized velocities (2·D).
    pub states: Vec<f64>,
    /// Generalized accelerations in model units (D).
    pub accelerations: DVector<f64>,
    /// Recorded net joint torques (D).
    pub net_torques: DVector<f64>,
    /// Ground-reaction channels.
    pub ground_reaction: GroundReaction,
}

impl TimeSeriesFrame {
    /// Degrees of freedom implied by the acceleration vector.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.accelerations.len()
    }
}

/// Joint-space force components of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct JointSpaceForceSet {
    /// `M(q) q̈`.
    pub inertia: DVector<f64>,
    /// Coriolis and centrifugal forces.
    pub coriolis: DVector<f64>,
    /// Gravitational forces.
    pub gravity: DVector<f64>,
    /// Right ground-contact forces.
    pub right_contact: DVector<f64>,
    /// Left ground-contact forces.
    pub left_contact: DVector<f64>,
    /// Recorded net actuation, relayed unchanged.
    pub actuation: DVector<f64>,
}

impl JointSpaceForceSet {
    /// Combined ground-contact forces (right + left).
    #[must_use]
    pub fn external(&self) -> DVector<f64> {
        &self.right_contact + &self.left_contact
    }

    /// Residual and internal checks.
    ///
    /// `residual = gravity − inertia + actuation − coriolis + right + left`
    /// and `internal = inertia − gravity + coriolis − right − left`, so
    /// `internal = actuation − residual`.
    #[must_use]
    pub fn residual_check(&self) -> ResidualCheck {
        let internal = &self.inertia - &self.gravity + &self.coriolis - self.external();
        let residual = &self.actuation - &internal;
        ResidualCheck { residual, internal }
    }
}

/// Equation-of-motion checks derived from a [`JointSpaceForceSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualCheck {
    /// Should be near zero for consistent recordings.
    pub residual: DVector<f64>,
    /// Net internal (muscle and ligament) forces implied by the motion.
    pub internal: DVector<f64>,
}

impl ResidualCheck {
    /// Largest absolute residual component, or 0 for an empty vector.
    ///
    /// NaN if any component is NaN.
    #[must_use]
    pub fn max_abs_residual(&self) -> f64 {
        self.residual.iter().copied().fold(0.0, nan_max)
    }
}

/// `f64::max` over absolute values that keeps NaN instead of dropping it.
pub(crate) fn nan_max(acc: f64, value: f64) -> f64 {
    if acc.is_nan() || value.is_nan() {
        f64::NAN
    } else {
        acc.max(value.abs())
    }
}
