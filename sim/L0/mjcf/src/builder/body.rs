//! Body tree traversal.

use jointspace_core::{JointType, Model};
use tracing::trace;

use super::mass::extract_inertial_properties;
use super::orientation::quat_from_wxyz;
use crate::error::Result;
use crate::types::{MjcfBody, MjcfJointType};

/// Append `body` and its subtree to `model` under `parent`, depth first.
///
/// Each body's joints are appended right after the body so joint indices
/// stay contiguous per body.
pub fn process_body(model: &mut Model, body: &MjcfBody, parent: usize) -> Result<()> {
    let quat = quat_from_wxyz(body.quat, &format!("body '{}'", body.name))?;
    let body_id = model.add_body(parent, body.name.clone(), body.pos, quat);

    let (mass, inertia, ipos, iquat) =
        extract_inertial_properties(body.inertial.as_ref(), &body.name)?;
    model.set_inertial(body_id, mass, ipos, iquat, inertia);

    for joint in &body.joints {
        let jnt_type = match joint.joint_type {
            MjcfJointType::Hinge => JointType::Hinge,
            MjcfJointType::Slide => JointType::Slide,
        };
        let name = (!joint.name.is_empty()).then(|| joint.name.clone());
        model.add_joint(jnt_type, joint.axis, joint.pos, name);
    }
    trace!(body = %body.name, body_id, joints = body.joints.len(), "added body");

    for child in &body.children {
        process_body(model, child, body_id)?;
    }
    Ok(())
}
