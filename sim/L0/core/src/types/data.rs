//! Data struct definition.
//!
//! [`Data`] is the dynamic state: generalized coordinates (qpos, qvel) and
//! the quantities derived from them by the position, velocity and dynamics
//! passes. It is the mutable counterpart to [`Model`]; create one per model
//! via `model.make_data()`.

use jointspace_types::{SpatialVec, Stage};
use nalgebra::{DVector, Matrix3, Matrix6, UnitQuaternion, Vector3};

use super::model::Model;

/// Dynamic state (like mjData).
///
/// # Key Invariant
///
/// `qpos` and `qvel` are the only state variables. Everything else is
/// computed from them and is valid only up to [`stage`](Self::stage).
///
/// All `c*` spatial quantities are expressed in the world frame about the
/// world origin, so they add across bodies without shifting.
#[derive(Debug, Clone)]
pub struct Data {
    // ==================== Generalized Coordinates ====================
    /// Joint positions (length `nq`).
    pub qpos: DVector<f64>,
    /// Joint velocities (length `nv`).
    pub qvel: DVector<f64>,

    // ==================== Position Stage ====================
    /// Body origin positions in world frame.
    pub xpos: Vec<Vector3<f64>>,
    /// Body orientations in world frame.
    pub xquat: Vec<UnitQuaternion<f64>>,
    /// Body rotation matrices (cached from `xquat`).
    pub xmat: Vec<Matrix3<f64>>,
    /// Body centers of mass in world frame.
    pub xipos: Vec<Vector3<f64>>,
    /// Principal inertia frame orientations in world frame.
    pub ximat: Vec<Matrix3<f64>>,
    /// Joint anchors in world frame, taken before the joint's own motion.
    pub xanchor: Vec<Vector3<f64>>,
    /// Joint axes in world frame, taken before the joint's own motion.
    pub xaxis: Vec<Vector3<f64>>,
    /// Body spatial inertia about the world origin.
    pub cinert: Vec<Matrix6<f64>>,
    /// DOF motion subspaces `[axis; linear velocity of the origin]`.
    pub cdof: Vec<SpatialVec>,

    // ==================== Velocity Stage ====================
    /// Body spatial velocities.
    pub cvel: Vec<SpatialVec>,
    /// Time derivatives of the motion subspaces.
    pub cdof_dot: Vec<SpatialVec>,

    // ==================== Dynamics Stage ====================
    /// Velocity-product body accelerations.
    pub cacc_bias: Vec<SpatialVec>,
    /// Per-body force producing `cacc_bias`, not accumulated over subtrees.
    pub cfrc_bias: Vec<SpatialVec>,

    /// Stage the derived quantities are valid for.
    pub stage: Stage,
}

impl Data {
    /// Allocate data for `model` at the zero state.
    #[must_use]
    pub fn new(model: &Model) -> Self {
        let nbody = model.nbody;
        Self {
            qpos: DVector::zeros(model.nq),
            qvel: DVector::zeros(model.nv),
            xpos: vec![Vector3::zeros(); nbody],
            xquat: vec![UnitQuaternion::identity(); nbody],
            xmat: vec![Matrix3::identity(); nbody],
            xipos: vec![Vector3::zeros(); nbody],
            ximat: vec![Matrix3::identity(); nbody],
            xanchor: vec![Vector3::zeros(); model.njnt],
            xaxis: vec![Vector3::zeros(); model.njnt],
            cinert: vec![Matrix6::zeros(); nbody],
            cdof: vec![SpatialVec::zeros(); model.nv],
            cvel: vec![SpatialVec::zeros(); nbody],
            cdof_dot: vec![SpatialVec::zeros(); model.nv],
            cacc_bias: vec![SpatialVec::zeros(); nbody],
            cfrc_bias: vec![SpatialVec::zeros(); nbody],
            stage: Stage::Model,
        }
    }

    /// Fail unless the data is realized to at least `required`.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::StageViolation`](jointspace_types::DynamicsError::StageViolation).
    pub fn require(&self, required: Stage) -> jointspace_types::Result<()> {
        if self.stage < required {
            return Err(jointspace_types::DynamicsError::StageViolation {
                required,
                current: self.stage,
            });
        }
        Ok(())
    }
}
