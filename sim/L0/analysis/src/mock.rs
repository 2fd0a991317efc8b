//! Linear stand-in system for unit tests.
//!
//! Body `b >= 1` drives DOF `(b - 1) % D`. Every operator is a simple linear
//! map so expected outputs can be written down by hand:
//!
//! - `M = mass * I`
//! - gravity on each body is `[0; 0, gravity, 0]`
//! - the centrifugal force on body `b` is `[0; u_d^2, 0, 0]`
//! - `J^T` sums `f.x + f.y` into the body's DOF
//! - frame `J^T` at station `s` gives `f.y + s.x * n.z`
//! - body `b` is translated by `(b, 0, 0)` from ground

use jointspace_types::{DynamicsError, MultibodySystem, Result, SpatialVec, Stage};
use nalgebra::{DMatrix, DVector, Vector3};

pub(crate) struct MockSystem {
    names: Vec<String>,
    dofs: usize,
    state: Vec<f64>,
    stage: Stage,
    pub(crate) mass: f64,
    pub(crate) gravity: f64,
}

impl MockSystem {
    pub(crate) fn new(dofs: usize, bodies: &[&str]) -> Self {
        let mut names = vec!["ground".to_string()];
        names.extend(bodies.iter().map(|b| (*b).to_string()));
        Self {
            names,
            dofs,
            state: vec![0.0; 2 * dofs],
            stage: Stage::Model,
            mass: 2.0,
            gravity: 0.0,
        }
    }

    fn dof_of(&self, body: usize) -> usize {
        (body - 1) % self.dofs
    }

    fn require(&self, stage: Stage) -> Result<()> {
        if self.stage < stage {
            return Err(DynamicsError::StageViolation {
                required: stage,
                current: self.stage,
            });
        }
        Ok(())
    }

    fn check_body(&self, body: usize) -> Result<()> {
        if body >= self.names.len() {
            return Err(DynamicsError::InvalidBodyIndex {
                index: body,
                count: self.names.len(),
            });
        }
        Ok(())
    }

    fn offset(body: usize) -> Vector3<f64> {
        Vector3::new(body as f64, 0.0, 0.0)
    }
}

impl MultibodySystem for MockSystem {
    fn dof_count(&self) -> usize {
        self.dofs
    }

    fn body_count(&self) -> usize {
        self.names.len()
    }

    fn find_body_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn set_state(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != 2 * self.dofs {
            return Err(DynamicsError::InvalidStateLength {
                dofs: self.dofs,
                expected: 2 * self.dofs,
                actual: values.len(),
            });
        }
        self.state = values.to_vec();
        self.stage = Stage::Model;
        Ok(())
    }

    fn realize(&mut self, stage: Stage) -> Result<()> {
        self.stage = self.stage.max(stage);
        Ok(())
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn multiply_by_mass_matrix(&self, udot: &DVector<f64>) -> Result<DVector<f64>> {
        self.require(Stage::Position)?;
        Ok(udot * self.mass)
    }

    fn gravity_body_forces(&self) -> Result<Vec<SpatialVec>> {
        self.require(Stage::Position)?;
        let mut forces = vec![SpatialVec::zeros(); self.names.len()];
        for f in forces.iter_mut().skip(1) {
            f[4] = self.gravity;
        }
        Ok(forces)
    }

    fn centrifugal_body_force(&self, body: usize) -> Result<SpatialVec> {
        self.require(Stage::Dynamics)?;
        self.check_body(body)?;
        let mut f = SpatialVec::zeros();
        if body > 0 {
            let u = self.state[self.dofs + self.dof_of(body)];
            f[3] = u * u;
        }
        Ok(f)
    }

    fn multiply_by_system_jacobian_transpose(&self, forces: &[SpatialVec]) -> Result<DVector<f64>> {
        self.require(Stage::Position)?;
        let bodies = self.names.len();
        if forces.len() != bodies {
            return Err(DynamicsError::dimension("body forces", bodies, forces.len()));
        }
        let mut tau = DVector::zeros(self.dofs);
        for (body, f) in forces.iter().enumerate().skip(1) {
            tau[self.dof_of(body)] += f[3] + f[4];
        }
        Ok(tau)
    }

    fn transform_point(
        &self,
        from: usize,
        point: &Vector3<f64>,
        to: usize,
    ) -> Result<Vector3<f64>> {
        self.require(Stage::Position)?;
        self.check_body(from)?;
        self.check_body(to)?;
        Ok(point + Self::offset(from) - Self::offset(to))
    }

    fn multiply_by_frame_jacobian_transpose(
        &self,
        body: usize,
        station: &Vector3<f64>,
        force: &SpatialVec,
    ) -> Result<DVector<f64>> {
        let jacobian = self.calc_frame_jacobian(body, station)?;
        let force = DVector::from_column_slice(force.as_slice());
        Ok(jacobian.transpose() * force)
    }

    fn calc_frame_jacobian(&self, body: usize, station: &Vector3<f64>) -> Result<DMatrix<f64>> {
        self.require(Stage::Position)?;
        self.check_body(body)?;
        let mut j = DMatrix::zeros(6, self.dofs);
        if body > 0 {
            let dof = self.dof_of(body);
            j[(2, dof)] = station.x;
            j[(4, dof)] = 1.0;
        }
        Ok(j)
    }
}
