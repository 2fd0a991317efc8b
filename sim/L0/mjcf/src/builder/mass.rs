//! Mass property extraction from `<inertial>`.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

use super::orientation::quat_from_wxyz;
use crate::error::{MjcfError, Result};
use crate::types::MjcfInertial;

/// Mass, principal moments, COM position and principal-axes orientation.
pub type InertialProperties = (f64, Vector3<f64>, Vector3<f64>, UnitQuaternion<f64>);

/// Extract inertial properties with MuJoCo semantics.
///
/// `fullinertia` takes priority over `diaginertia` and is diagonalized by
/// eigendecomposition; the principal orientation is folded into `iquat`.
/// A body without `<inertial>` is massless.
///
/// # Errors
///
/// Returns [`MjcfError::InvalidInertia`] when a full tensor has a negative
/// principal moment, or [`MjcfError::InvalidAttribute`] for a degenerate
/// `quat`.
pub fn extract_inertial_properties(
    inertial: Option<&MjcfInertial>,
    body_name: &str,
) -> Result<InertialProperties> {
    let Some(inertial) = inertial else {
        return Ok((
            0.0,
            Vector3::zeros(),
            Vector3::zeros(),
            UnitQuaternion::identity(),
        ));
    };
    let base_iquat = quat_from_wxyz(inertial.quat, &format!("inertial of body '{body_name}'"))?;

    if let Some(full) = inertial.fullinertia {
        // [Ixx, Iyy, Izz, Ixy, Ixz, Iyz]
        let inertia_matrix = Matrix3::new(
            full[0], full[3], full[4], //
            full[3], full[1], full[5], //
            full[4], full[5], full[2],
        );

        let eigen = inertia_matrix.symmetric_eigen();
        if eigen.eigenvalues.iter().any(|&v| v < -1e-12) {
            return Err(MjcfError::invalid_inertia(
                body_name,
                "full inertia tensor is not positive semi-definite",
            ));
        }
        let principal = eigen.eigenvalues.map(|v| v.max(0.0));

        // Eigenvectors as columns; flip one to stay right-handed
        let mut rot = eigen.eigenvectors;
        if rot.determinant() < 0.0 {
            let flipped = -rot.column(2);
            rot.set_column(2, &flipped);
        }
        let iquat = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rot));

        Ok((inertial.mass, principal, inertial.pos, base_iquat * iquat))
    } else {
        let diag = inertial.diaginertia.unwrap_or_else(Vector3::zeros);
        Ok((inertial.mass, diag, inertial.pos, base_iquat))
    }
}
