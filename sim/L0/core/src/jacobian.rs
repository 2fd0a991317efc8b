//! Jacobian computation and force projection.
//!
//! Provides the frame Jacobian (`jac_frame`), projection of a spatial force at
//! a point (`apply_ft`), projection of one force per body (`mul_jac_t`), and
//! point re-expression between body frames (`transform_point`).
//!
//! All routines walk the kinematic chain through `body_parent` and read the
//! origin-referenced motion subspaces `cdof` computed by
//! [`fwd_position`](crate::forward::fwd_position).

use jointspace_types::SpatialVec;
use nalgebra::{DMatrix, DVector, Vector3};

use crate::dynamics::{angular, force_to_origin, linear};
use crate::types::{Data, Model};

/// Frame Jacobian at a world-frame point fixed to `body_id`: 6×nv.
///
/// Rows 0-2 map `qvel` to the frame's angular velocity, rows 3-5 to the
/// linear velocity of `point`. A DOF in the chain of `body_id` contributes
/// the column
///
/// ```text
/// [ axis ; v_O + axis × point ]
/// ```
///
/// which is `[axis; axis × (point − anchor)]` for a hinge and `[0; axis]`
/// for a slide. Other columns are zero.
#[must_use]
pub fn jac_frame(
    model: &Model,
    data: &Data,
    body_id: usize,
    point: &Vector3<f64>,
) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(6, model.nv);

    let mut current = body_id;
    while current != 0 {
        let jnt_start = model.body_jnt_adr[current];
        let jnt_end = jnt_start + model.body_jnt_num[current];

        for jnt_id in jnt_start..jnt_end {
            let dof = model.jnt_dof_adr[jnt_id];
            let s = &data.cdof[dof];
            let w = angular(s);
            let v = linear(s) + w.cross(point);
            for k in 0..3 {
                jac[(k, dof)] = w[k];
                jac[(k + 3, dof)] = v[k];
            }
        }
        current = model.body_parent[current];
    }

    jac
}

/// Project a spatial force `[moment; force]` acting at a world-frame point on
/// `body_id` into generalized forces: `J(point)ᵀ · f`.
///
/// Walks the chain without materializing the Jacobian.
#[must_use]
pub fn apply_ft(
    model: &Model,
    data: &Data,
    body_id: usize,
    point: &Vector3<f64>,
    force: &SpatialVec,
) -> DVector<f64> {
    let mut qfrc = DVector::zeros(model.nv);
    let about_origin = force_to_origin(force, point);

    let mut current = body_id;
    while current != 0 {
        let jnt_start = model.body_jnt_adr[current];
        let jnt_end = jnt_start + model.body_jnt_num[current];
        for jnt_id in jnt_start..jnt_end {
            let dof = model.jnt_dof_adr[jnt_id];
            qfrc[dof] += data.cdof[dof].dot(&about_origin);
        }
        current = model.body_parent[current];
    }

    qfrc
}

/// Project one origin-referenced spatial force per body into generalized
/// forces.
///
/// Forces are accumulated from leaves to root so each DOF sees the total
/// force on the subtree it moves, then `qfrc[j] = cdof[j] · F_subtree`.
/// Entry 0 (world) is ignored.
#[must_use]
pub fn mul_jac_t(model: &Model, data: &Data, origin_forces: &[SpatialVec]) -> DVector<f64> {
    let mut subtree = origin_forces.to_vec();
    subtree[0] = SpatialVec::zeros();

    // Propagate forces from leaves to root (no shift needed about the origin)
    for body_id in (1..model.nbody).rev() {
        let parent_id = model.body_parent[body_id];
        if parent_id != 0 {
            let child = subtree[body_id];
            subtree[parent_id] += child;
        }
    }

    let mut qfrc = DVector::zeros(model.nv);
    for dof in 0..model.nv {
        qfrc[dof] = data.cdof[dof].dot(&subtree[model.dof_body[dof]]);
    }
    qfrc
}

/// Re-express a point given in `from`'s frame in `to`'s frame.
///
/// `p_to = R_toᵀ (x_from + R_from · p − x_to)`.
#[must_use]
pub fn transform_point(data: &Data, from: usize, point: &Vector3<f64>, to: usize) -> Vector3<f64> {
    let world = data.xpos[from] + data.xquat[from] * point;
    data.xquat[to].inverse_transform_vector(&(world - data.xpos[to]))
}

/// World position of a point given in `body_id`'s frame.
#[must_use]
pub fn station_world(data: &Data, body_id: usize, station: &Vector3<f64>) -> Vector3<f64> {
    data.xpos[body_id] + data.xquat[body_id] * station
}
