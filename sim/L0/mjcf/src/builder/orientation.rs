//! Quaternion helpers for MJCF element processing.
//!
//! MJCF stores quaternions as `w x y z`; nalgebra's constructor takes the
//! same order but the storage is `i j k w`, so conversions go through here.

use nalgebra::{Quaternion, UnitQuaternion, Vector4};

use crate::error::{MjcfError, Result};

/// Convert an MJCF quaternion `[w, x, y, z]` to a `UnitQuaternion`,
/// normalizing it.
///
/// # Errors
///
/// Returns [`MjcfError::InvalidAttribute`] when the quaternion has (near)
/// zero norm or non-finite components.
pub fn quat_from_wxyz(q: Vector4<f64>, element: &str) -> Result<UnitQuaternion<f64>> {
    let norm = q.norm();
    if !norm.is_finite() || norm < 1e-10 {
        return Err(MjcfError::invalid_attribute(
            "quat",
            element,
            format!("cannot normalize quaternion {:?}", q.as_slice()),
        ));
    }
    Ok(UnitQuaternion::from_quaternion(Quaternion::new(
        q[0], q[1], q[2], q[3],
    )))
}
