//! MJCF validation utilities.
//!
//! Validates the kinematic structure and physical properties of parsed MJCF
//! before any [`Model`](jointspace_core::Model) is assembled.

use std::collections::HashSet;

use crate::error::{MjcfError, Result};
use crate::types::{MjcfBody, MjcfModel};

/// Validation result containing the flattened body tree structure.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// All body names in depth-first order (parents before children).
    pub sorted_bodies: Vec<String>,
    /// All named joints in the same order.
    pub joint_names: Vec<String>,
}

#[derive(Default)]
struct Seen {
    bodies: HashSet<String>,
    joints: HashSet<String>,
    result: ValidationResult,
}

/// Validate a parsed MJCF model.
///
/// Checks name uniqueness (the world name is reserved), finite gravity,
/// and non-negative finite mass and inertia on every body.
///
/// # Errors
///
/// Returns the first violation found in document order.
pub fn validate(model: &MjcfModel) -> Result<ValidationResult> {
    let g = model.option.gravity;
    if !(g.x.is_finite() && g.y.is_finite() && g.z.is_finite()) {
        return Err(MjcfError::invalid_attribute(
            "gravity",
            "option",
            "gravity must be finite",
        ));
    }

    let mut seen = Seen::default();
    seen.bodies.insert("world".to_string());
    for body in &model.worldbody.children {
        traverse_body(body, &mut seen)?;
    }
    Ok(seen.result)
}

fn traverse_body(body: &MjcfBody, seen: &mut Seen) -> Result<()> {
    if !seen.bodies.insert(body.name.clone()) {
        return Err(MjcfError::DuplicateBody(body.name.clone()));
    }
    seen.result.sorted_bodies.push(body.name.clone());

    for joint in &body.joints {
        if joint.name.is_empty() {
            continue;
        }
        if !seen.joints.insert(joint.name.clone()) {
            return Err(MjcfError::DuplicateJoint(joint.name.clone()));
        }
        seen.result.joint_names.push(joint.name.clone());
    }

    if let Some(ref inertial) = body.inertial {
        if !inertial.mass.is_finite() || inertial.mass < 0.0 {
            return Err(MjcfError::invalid_mass(&body.name, inertial.mass));
        }

        if let Some(diag) = inertial.diaginertia {
            if !diag.iter().all(|v| v.is_finite()) {
                return Err(MjcfError::invalid_inertia(
                    &body.name,
                    "inertia values must be finite",
                ));
            }
            if diag.iter().any(|&v| v < 0.0) {
                return Err(MjcfError::invalid_inertia(
                    &body.name,
                    "diagonal elements must be non-negative",
                ));
            }
        }
        if let Some(full) = inertial.fullinertia {
            if !full.iter().all(|v| v.is_finite()) {
                return Err(MjcfError::invalid_inertia(
                    &body.name,
                    "inertia values must be finite",
                ));
            }
        }
    }

    for child in &body.children {
        traverse_body(child, seen)?;
    }
    Ok(())
}
