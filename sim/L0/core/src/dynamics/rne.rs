//! Recursive Newton-Euler passes.
//!
//! Splits the classic RNE into the pieces a joint-space force decomposition
//! needs separately:
//!
//! - [`fwd_bias`]: velocity-product accelerations and the body forces that
//!   produce them (Coriolis/centrifugal), without projecting to joint space
//! - [`mul_m`]: `M(q) · v` as an RNE with zero velocity and no gravity
//! - [`gravity_body_forces`]: per-body weight as spatial forces
//!
//! Projection of body forces to joint space lives in
//! [`mul_jac_t`](crate::jacobian::mul_jac_t).
//!
//! Reference: Featherstone, "Rigid Body Dynamics Algorithms", Chapter 5

use jointspace_types::SpatialVec;
use nalgebra::DVector;

use crate::dynamics::spatial::{force_from_origin, spatial, spatial_cross_force};
use crate::jacobian::mul_jac_t;
use crate::types::{Data, Model};

/// Velocity-product (bias) accelerations and body forces.
///
/// Forward pass:
/// ```text
/// a_bias[b] = a_bias[parent] + Σ_j cdof_dot[j] · qvel[j]
/// ```
/// then per body, about the world origin:
/// ```text
/// f_bias[b] = I[b] · a_bias[b] + v[b] ×* (I[b] · v[b])
/// ```
/// Forces are stored per body, not accumulated over subtrees. Requires
/// [`fwd_velocity`](crate::forward::fwd_velocity).
pub fn fwd_bias(model: &Model, data: &mut Data) {
    data.cacc_bias[0] = SpatialVec::zeros();
    data.cfrc_bias[0] = SpatialVec::zeros();

    for body_id in 1..model.nbody {
        let mut a_bias = data.cacc_bias[model.body_parent[body_id]];

        let jnt_start = model.body_jnt_adr[body_id];
        let jnt_end = jnt_start + model.body_jnt_num[body_id];
        for jnt_id in jnt_start..jnt_end {
            let dof = model.jnt_dof_adr[jnt_id];
            a_bias += data.cdof_dot[dof] * data.qvel[dof];
        }
        data.cacc_bias[body_id] = a_bias;

        let inertia = &data.cinert[body_id];
        let v = data.cvel[body_id];
        data.cfrc_bias[body_id] = inertia * a_bias + spatial_cross_force(&v, &(inertia * v));
    }
}

/// Velocity-dependent force on one body, acting at the body origin.
#[must_use]
pub fn centrifugal_body_force(data: &Data, body_id: usize) -> SpatialVec {
    if body_id == 0 {
        return SpatialVec::zeros();
    }
    force_from_origin(&data.cfrc_bias[body_id], &data.xpos[body_id])
}

/// Mass-matrix product `M(q) · vec` without forming `M`.
///
/// Propagates `a[b] = a[parent] + Σ cdof · vec` outward, forms `I[b] · a[b]`
/// and projects the subtree sums back onto each DOF. Requires
/// [`fwd_position`](crate::forward::fwd_position); `vec.len()` must be `nv`.
#[must_use]
pub fn mul_m(model: &Model, data: &Data, vec: &DVector<f64>) -> DVector<f64> {
    let mut acc = vec![SpatialVec::zeros(); model.nbody];
    let mut frc = vec![SpatialVec::zeros(); model.nbody];

    for body_id in 1..model.nbody {
        let mut a = acc[model.body_parent[body_id]];
        let jnt_start = model.body_jnt_adr[body_id];
        let jnt_end = jnt_start + model.body_jnt_num[body_id];
        for jnt_id in jnt_start..jnt_end {
            let dof = model.jnt_dof_adr[jnt_id];
            a += data.cdof[dof] * vec[dof];
        }
        acc[body_id] = a;
        frc[body_id] = data.cinert[body_id] * a;
    }

    mul_jac_t(model, data, &frc)
}

/// Weight of every body as a spatial force at the body origin.
///
/// `[(xipos - xpos) × m·g; m·g]`, zero for the world body. Requires
/// [`fwd_position`](crate::forward::fwd_position).
#[must_use]
pub fn gravity_body_forces(model: &Model, data: &Data) -> Vec<SpatialVec> {
    let mut forces = vec![SpatialVec::zeros(); model.nbody];
    for body_id in 1..model.nbody {
        let weight = model.body_mass[body_id] * model.gravity;
        let lever = data.xipos[body_id] - data.xpos[body_id];
        forces[body_id] = spatial(&lever.cross(&weight), &weight);
    }
    forces
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::dynamics::spatial::force_to_origin;
    use approx::assert_relative_eq;
    use jointspace_types::Stage;
    use nalgebra::DMatrix;

    fn mass_matrix(model: &Model, data: &Data) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(model.nv, model.nv);
        for col in 0..model.nv {
            let e = DVector::from_fn(model.nv, |i, _| if i == col { 1.0 } else { 0.0 });
            m.set_column(col, &mul_m(model, data, &e));
        }
        m
    }

    fn coriolis(model: &Model, data: &Data) -> DVector<f64> {
        let origin_forces: Vec<_> = (0..model.nbody)
            .map(|b| force_to_origin(&centrifugal_body_force(data, b), &data.xpos[b]))
            .collect();
        mul_jac_t(model, data, &origin_forces)
    }

    #[test]
    fn test_single_pendulum_mass() {
        let model = Model::n_link_pendulum(1, 0.8, 2.0);
        let mut data = model.make_data();
        data.qpos[0] = 0.4;
        data.realize(&model, Stage::Position);

        let m = mass_matrix(&model, &data);
        assert_relative_eq!(m[(0, 0)], 2.0 * 0.8 * 0.8 + 0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_double_pendulum_mass_matrix() {
        // Point masses m at the link tips, lengths l, inertia 0.001 each:
        // M11 = 2ml² + ml²·2cos(q2)... expressed per standard form.
        let (l, m) = (1.0, 1.5);
        let model = Model::n_link_pendulum(2, l, m);
        let mut data = model.make_data();
        let q2 = 0.7;
        data.qpos[0] = -0.3;
        data.qpos[1] = q2;
        data.realize(&model, Stage::Position);

        let mm = mass_matrix(&model, &data);
        let i = 0.001;
        let m11 = m * l * l + m * (l * l + l * l + 2.0 * l * l * q2.cos()) + 2.0 * i;
        let m12 = m * (l * l + l * l * q2.cos()) + i;
        let m22 = m * l * l + i;
        assert_relative_eq!(mm[(0, 0)], m11, epsilon = 1e-10);
        assert_relative_eq!(mm[(0, 1)], m12, epsilon = 1e-10);
        assert_relative_eq!(mm[(1, 0)], m12, epsilon = 1e-10);
        assert_relative_eq!(mm[(1, 1)], m22, epsilon = 1e-10);
    }

    #[test]
    fn test_double_pendulum_coriolis() {
        let (l, m) = (1.0, 1.5);
        let model = Model::n_link_pendulum(2, l, m);
        let mut data = model.make_data();
        let (q2, qd1, qd2) = (0.7, 1.3, -0.4);
        data.qpos[1] = q2;
        data.qvel[0] = qd1;
        data.qvel[1] = qd2;
        data.realize(&model, Stage::Dynamics);

        // C(q, q̇)q̇ for a double pendulum with tip masses.
        let h = m * l * l * q2.sin();
        let c1 = -h * (2.0 * qd1 * qd2 + qd2 * qd2);
        let c2 = h * qd1 * qd1;
        let c = coriolis(&model, &data);
        assert_relative_eq!(c[0], c1, epsilon = 1e-10);
        assert_relative_eq!(c[1], c2, epsilon = 1e-10);
    }

    #[test]
    fn test_pendulum_gravity_torque() {
        let (l, m) = (0.5, 3.0);
        let model = Model::n_link_pendulum(1, l, m);
        let mut data = model.make_data();
        let q = 0.6;
        data.qpos[0] = q;
        data.realize(&model, Stage::Position);

        let forces = gravity_body_forces(&model, &data);
        assert_eq!(forces[0], SpatialVec::zeros());
        let origin: Vec<_> = forces
            .iter()
            .enumerate()
            .map(|(b, f)| force_to_origin(f, &data.xpos[b]))
            .collect();
        let tau = mul_jac_t(&model, &data, &origin);

        // Rotating by +q about Y swings the tip toward -X; gravity pulls it back.
        assert_relative_eq!(tau[0], -m * 9.81 * l * q.sin(), epsilon = 1e-10);
    }

    #[test]
    fn test_bias_vanishes_at_rest() {
        let model = Model::gait_biped();
        let mut data = model.make_data();
        data.qpos[6] = 0.3;
        data.realize(&model, Stage::Dynamics);
        for b in 0..model.nbody {
            let f = centrifugal_body_force(&data, b);
            assert_relative_eq!(f.norm(), 0.0, epsilon = 1e-14);
        }
    }
}
