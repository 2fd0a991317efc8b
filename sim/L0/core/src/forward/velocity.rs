//! Velocity-stage forward kinematics.
//!
//! Computes body spatial velocities and motion subspace derivatives from
//! joint velocities.

use jointspace_types::SpatialVec;

use crate::dynamics::spatial_cross_motion;
use crate::types::{Data, Model};

/// Velocity kinematics: compute body velocities from qvel.
///
/// With every motion vector referenced to the world origin, velocities add
/// along the tree without lever-arm terms:
///
/// ```text
/// v[b] = v[parent] + Σ_j cdof[j] · qvel[j]
/// ```
///
/// A subspace is fixed in its joint's predecessor frame, so its derivative is
/// `cdof_dot[j] = v_pred ×ₘ cdof[j]`, where `v_pred` is the velocity before
/// joint `j` contributes. Requires [`fwd_position`](super::fwd_position).
pub fn fwd_velocity(model: &Model, data: &mut Data) {
    // World body has zero velocity
    data.cvel[0] = SpatialVec::zeros();

    for body_id in 1..model.nbody {
        let mut vel = data.cvel[model.body_parent[body_id]];

        let jnt_start = model.body_jnt_adr[body_id];
        let jnt_end = jnt_start + model.body_jnt_num[body_id];

        for jnt_id in jnt_start..jnt_end {
            let dof = model.jnt_dof_adr[jnt_id];
            let s = data.cdof[dof];
            data.cdof_dot[dof] = spatial_cross_motion(&vel, &s);
            vel += s * data.qvel[dof];
        }

        data.cvel[body_id] = vel;
    }
}
