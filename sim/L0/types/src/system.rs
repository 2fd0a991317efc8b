//! The multibody system interface consumed by joint-space force analysis.
//!
//! A [`MultibodySystem`] owns a kinematic tree and one current state. The
//! analysis code sets the state once per recorded frame, realizes it to
//! [`Stage::Dynamics`], and then only reads through the `&self` operators.
//!
//! # Spatial vector convention
//!
//! A [`SpatialVec`] is `[angular (3), linear (3)]`. Spatial forces are
//! `[moment, force]` expressed in the world (ground) frame. Body-level
//! operators treat the force as acting at the body origin; the frame
//! Jacobian operators treat it as acting at the given station.

use nalgebra::{DMatrix, DVector, Vector3, Vector6};

use crate::Result;

/// 6D spatial vector: `[angular (3), linear (3)]`.
pub type SpatialVec = Vector6<f64>;

/// Computation stage a state has been realized to.
///
/// Stages are ordered: realizing to a stage realizes every earlier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    /// State set, nothing derived yet.
    #[default]
    Model,
    /// Body poses and motion subspaces.
    Position,
    /// Body velocities.
    Velocity,
    /// Bias accelerations and velocity-dependent body forces.
    Dynamics,
}

/// Build a spatial force from a moment and a force, moment first.
#[must_use]
pub fn spatial_force(moment: &Vector3<f64>, force: &Vector3<f64>) -> SpatialVec {
    SpatialVec::new(moment.x, moment.y, moment.z, force.x, force.y, force.z)
}

/// Rigid-body engine operations needed to decompose joint torques.
///
/// Body index 0 is the root (ground). Bodies are numbered in the engine's
/// internal order, which is also the order of the vectors returned by
/// [`gravity_body_forces`](Self::gravity_body_forces) and expected by
/// [`multiply_by_system_jacobian_transpose`](Self::multiply_by_system_jacobian_transpose).
///
/// Every operator after [`realize`](Self::realize) takes `&self`: once a
/// state is realized it is read-only until the next [`set_state`](Self::set_state).
pub trait MultibodySystem {
    /// Number of generalized coordinates (and generalized speeds), `D`.
    fn dof_count(&self) -> usize;

    /// Number of bodies including the root.
    fn body_count(&self) -> usize;

    /// Index of the body with exactly this name.
    fn find_body_index(&self, name: &str) -> Option<usize>;

    /// Replace the current state with `[q (D), u (D)]`.
    ///
    /// Invalidates every realized stage.
    ///
    /// # Errors
    ///
    /// Returns an error if `values.len() != 2 * D` or a value is not finite.
    fn set_state(&mut self, values: &[f64]) -> Result<()>;

    /// Realize the current state up to and including `stage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot evaluate the state.
    fn realize(&mut self, stage: Stage) -> Result<()>;

    /// Stage the current state is realized to.
    fn stage(&self) -> Stage;

    /// `M(q) * udot` without forming `M`.
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Position`] and `udot.len() == D`.
    fn multiply_by_mass_matrix(&self, udot: &DVector<f64>) -> Result<DVector<f64>>;

    /// Gravity force on every body, at body origins. Entry 0 (root) is zero.
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Position`].
    fn gravity_body_forces(&self) -> Result<Vec<SpatialVec>>;

    /// Spatial force needed on `body` to produce its velocity-dependent
    /// acceleration, at the body origin. Zero for the root.
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Dynamics`] and a valid body index.
    fn centrifugal_body_force(&self, body: usize) -> Result<SpatialVec>;

    /// `J^T * F` for one spatial force per body (at body origins).
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Position`] and `forces.len() == body_count()`.
    fn multiply_by_system_jacobian_transpose(&self, forces: &[SpatialVec]) -> Result<DVector<f64>>;

    /// Re-express a point given in `from`'s frame in `to`'s frame.
    ///
    /// This is a point transform (rotation and translation), not a vector
    /// re-expression.
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Position`] and valid body indices.
    fn transform_point(&self, from: usize, point: &Vector3<f64>, to: usize) -> Result<Vector3<f64>>;

    /// `J_S^T * F` for a spatial force applied at `station` (in `body`'s frame).
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Position`] and a valid body index.
    fn multiply_by_frame_jacobian_transpose(
        &self,
        body: usize,
        station: &Vector3<f64>,
        force: &SpatialVec,
    ) -> Result<DVector<f64>>;

    /// 6×D Jacobian mapping `u` to the spatial velocity `[ω, v]` of a frame
    /// fixed to `body` at `station`, both expressed in ground.
    ///
    /// # Errors
    ///
    /// Requires [`Stage::Position`] and a valid body index.
    fn calc_frame_jacobian(&self, body: usize, station: &Vector3<f64>) -> Result<DMatrix<f64>>;
}
