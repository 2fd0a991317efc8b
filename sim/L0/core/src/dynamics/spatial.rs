//! Spatial algebra utilities for 6D motion and force vectors.
//!
//! Featherstone's spatial vector algebra with every quantity expressed in
//! the world frame about the world origin. Motion vectors are `[ω; v_O]`
//! where `v_O` is the velocity of the (possibly fictitious) body point at
//! the origin; force vectors are `[n_O; f]` with the moment taken about the
//! origin. Functions here are pure math with no pipeline state.

use jointspace_types::SpatialVec;
use nalgebra::{Matrix3, Matrix6, Vector3};

/// Angular (first three) part of a spatial vector.
#[inline]
#[must_use]
pub fn angular(v: &SpatialVec) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

/// Linear (last three) part of a spatial vector.
#[inline]
#[must_use]
pub fn linear(v: &SpatialVec) -> Vector3<f64> {
    Vector3::new(v[3], v[4], v[5])
}

/// Assemble a spatial vector from its angular and linear parts.
#[inline]
#[must_use]
pub fn spatial(ang: &Vector3<f64>, lin: &Vector3<f64>) -> SpatialVec {
    SpatialVec::new(ang.x, ang.y, ang.z, lin.x, lin.y, lin.z)
}

/// Spatial cross product for motion vectors: `v ×ₘ s`.
#[inline]
#[must_use]
pub fn spatial_cross_motion(v: &SpatialVec, s: &SpatialVec) -> SpatialVec {
    let w = angular(v);
    let v_lin = linear(v);
    let s_ang = angular(s);
    let lin = w.cross(&linear(s)) + v_lin.cross(&s_ang);
    spatial(&w.cross(&s_ang), &lin)
}

/// Spatial cross product for force vectors: `v ×* f`.
#[inline]
#[must_use]
pub fn spatial_cross_force(v: &SpatialVec, f: &SpatialVec) -> SpatialVec {
    let w = angular(v);
    let f_lin = linear(f);
    spatial(
        &(w.cross(&angular(f)) + linear(v).cross(&f_lin)),
        &w.cross(&f_lin),
    )
}

/// Re-reference a force acting at `point` to the world origin.
///
/// `n_O = n_P + P × f`; the force part is unchanged.
#[inline]
#[must_use]
pub fn force_to_origin(f: &SpatialVec, point: &Vector3<f64>) -> SpatialVec {
    let force = linear(f);
    spatial(&(angular(f) + point.cross(&force)), &force)
}

/// Re-reference a force about the world origin to act at `point`.
#[inline]
#[must_use]
pub fn force_from_origin(f: &SpatialVec, point: &Vector3<f64>) -> SpatialVec {
    let force = linear(f);
    spatial(&(angular(f) - point.cross(&force)), &force)
}

/// Velocity of the body point at `point` from an origin-referenced motion vector.
#[inline]
#[must_use]
pub fn motion_at(v: &SpatialVec, point: &Vector3<f64>) -> SpatialVec {
    let w = angular(v);
    spatial(&w, &(linear(v) + w.cross(point)))
}

/// Compute body spatial inertia in world frame.
///
/// - `mass`: body mass
/// - `inertia_diag`: principal moments about the center of mass
/// - `i_mat`: rotation from the principal frame to world
/// - `h`: center of mass relative to the reference point, in world frame
///
/// ```text
/// I = [I_c + m*(h·h*I₃ - h⊗h),  m*[h]×]
///     [-m*[h]×,                 m*I₃  ]
/// ```
///
/// Passing `h = xipos` yields the inertia about the world origin, which is
/// what every pass in this crate uses.
#[must_use]
pub fn compute_body_spatial_inertia(
    mass: f64,
    inertia_diag: &Vector3<f64>,
    i_mat: &Matrix3<f64>,
    h: &Vector3<f64>,
) -> Matrix6<f64> {
    let i_com = i_mat * Matrix3::from_diagonal(inertia_diag) * i_mat.transpose();
    let i_rot = i_com + mass * (h.dot(h) * Matrix3::identity() - h * h.transpose());
    let mh = mass * h.cross_matrix();

    let mut crb = Matrix6::zeros();
    crb.fixed_view_mut::<3, 3>(0, 0).copy_from(&i_rot);
    crb.fixed_view_mut::<3, 3>(0, 3).copy_from(&mh);
    crb.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-mh));
    crb.fixed_view_mut::<3, 3>(3, 3)
        .copy_from(&(mass * Matrix3::identity()));
    crb
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_motion_of_self_is_zero() {
        let v = SpatialVec::new(0.3, -1.0, 2.0, 0.5, 0.1, -0.7);
        assert_relative_eq!(spatial_cross_motion(&v, &v).norm(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_cross_duality() {
        // (v ×ₘ s) · f == -s · (v ×* f)
        let v = SpatialVec::new(0.3, -1.0, 2.0, 0.5, 0.1, -0.7);
        let s = SpatialVec::new(1.0, 0.0, 0.2, -0.4, 0.9, 0.3);
        let f = SpatialVec::new(-0.6, 0.8, 0.1, 1.5, -2.0, 0.4);
        let lhs = spatial_cross_motion(&v, &s).dot(&f);
        let rhs = -s.dot(&spatial_cross_force(&v, &f));
        assert_relative_eq!(lhs, rhs, epsilon = 1e-12);
    }

    #[test]
    fn test_force_shift_round_trip() {
        let f = SpatialVec::new(1.0, 2.0, 3.0, 0.0, -9.81, 0.0);
        let p = Vector3::new(0.2, 1.0, -0.3);
        let back = force_from_origin(&force_to_origin(&f, &p), &p);
        assert_relative_eq!(back, f, epsilon = 1e-14);
    }

    #[test]
    fn test_point_mass_inertia_momentum() {
        // Point mass at h rotating with ω about the origin: p = m (ω × h).
        let m = 2.0;
        let h = Vector3::new(0.0, 0.0, -1.0);
        let inertia =
            compute_body_spatial_inertia(m, &Vector3::zeros(), &Matrix3::identity(), &h);
        let v = SpatialVec::new(0.0, 1.5, 0.0, 0.0, 0.0, 0.0);
        let momentum = inertia * v;
        let expected_p = m * Vector3::new(0.0, 1.5, 0.0).cross(&h);
        assert_relative_eq!(linear(&momentum), expected_p, epsilon = 1e-12);
        assert_relative_eq!(
            angular(&momentum),
            h.cross(&expected_p),
            epsilon = 1e-12
        );
    }
}
