//! Forward kinematics and position-stage computations.
//!
//! Computes body poses, joint anchors and axes, motion subspaces and
//! origin-referenced spatial inertias from joint positions.

use nalgebra::{Matrix3, Matrix6, Unit, UnitQuaternion, Vector3};

use crate::dynamics::{compute_body_spatial_inertia, spatial};
use crate::types::{Data, JointType, Model};

/// Forward kinematics: compute body poses from qpos.
///
/// Traverses the kinematic tree from root to leaves. Each joint's anchor and
/// axis are recorded in world frame *before* that joint moves the body, so
/// they describe the joint as seen from its predecessor. The motion subspace
/// of a DOF is then
///
/// | Joint type | `cdof`                    |
/// |------------|---------------------------|
/// | Hinge      | `[axis; anchor × axis]`   |
/// | Slide      | `[0; axis]`               |
pub fn fwd_position(model: &Model, data: &mut Data) {
    // Body 0 (world) is always at origin
    data.xpos[0] = Vector3::zeros();
    data.xquat[0] = UnitQuaternion::identity();
    data.xmat[0] = Matrix3::identity();
    data.xipos[0] = Vector3::zeros();
    data.ximat[0] = Matrix3::identity();

    // Bodies are topologically sorted: parent before child.
    for body_id in 1..model.nbody {
        let parent_id = model.body_parent[body_id];

        let mut pos = data.xpos[parent_id];
        let mut quat = data.xquat[parent_id];

        // Apply body offset in parent frame
        pos += quat * model.body_pos[body_id];
        quat *= model.body_quat[body_id];

        let jnt_start = model.body_jnt_adr[body_id];
        let jnt_end = jnt_start + model.body_jnt_num[body_id];

        for jnt_id in jnt_start..jnt_end {
            let qpos = data.qpos[model.jnt_qpos_adr[jnt_id]];
            let dof = model.jnt_dof_adr[jnt_id];
            let world_axis = quat * model.jnt_axis[jnt_id];
            let world_anchor = pos + quat * model.jnt_pos[jnt_id];

            data.xaxis[jnt_id] = world_axis;
            data.xanchor[jnt_id] = world_anchor;

            match model.jnt_type[jnt_id] {
                JointType::Hinge => {
                    data.cdof[dof] = spatial(&world_axis, &world_anchor.cross(&world_axis));

                    // Model::validate rejects zero axes; identity keeps FK total.
                    let rot = Unit::try_new(world_axis, 1e-10).map_or_else(
                        UnitQuaternion::identity,
                        |axis| UnitQuaternion::from_axis_angle(&axis, qpos),
                    );
                    quat = rot * quat;
                    pos = world_anchor + rot * (pos - world_anchor);
                }
                JointType::Slide => {
                    data.cdof[dof] = spatial(&Vector3::zeros(), &world_axis);
                    pos += world_axis * qpos;
                }
            }
        }

        data.xpos[body_id] = pos;
        data.xquat[body_id] = quat;
        data.xmat[body_id] = quat.to_rotation_matrix().into_inner();

        data.xipos[body_id] = pos + quat * model.body_ipos[body_id];
        data.ximat[body_id] = (quat * model.body_iquat[body_id])
            .to_rotation_matrix()
            .into_inner();

        // Spatial inertia about the world origin
        data.cinert[body_id] = compute_body_spatial_inertia(
            model.body_mass[body_id],
            &model.body_inertia[body_id],
            &data.ximat[body_id],
            &data.xipos[body_id],
        );
    }

    // World body has zero inertia
    data.cinert[0] = Matrix6::zeros();
}
