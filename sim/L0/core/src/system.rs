//! [`RigidBodySystem`]: a [`Model`]/[`Data`] pair behind the
//! [`MultibodySystem`] interface.

use jointspace_types::{DynamicsError, MultibodySystem, Result, SpatialVec, Stage};
use nalgebra::{DMatrix, DVector, Vector3};
use tracing::debug;

use crate::dynamics::{centrifugal_body_force, force_to_origin, gravity_body_forces, mul_m};
use crate::jacobian::{apply_ft, jac_frame, mul_jac_t, station_world, transform_point};
use crate::types::{Data, Model};

/// A model together with its current state.
///
/// # Example
///
/// ```
/// use jointspace_core::{Model, RigidBodySystem};
/// use jointspace_types::{MultibodySystem, Stage};
/// use nalgebra::DVector;
///
/// let mut system = RigidBodySystem::new(Model::n_link_pendulum(2, 1.0, 1.0))?;
/// system.set_state(&[0.3, -0.2, 0.0, 0.0])?;
/// system.realize(Stage::Dynamics)?;
///
/// let tau = system.multiply_by_mass_matrix(&DVector::from_vec(vec![1.0, 0.0]))?;
/// assert_eq!(tau.len(), 2);
/// # Ok::<(), jointspace_types::DynamicsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RigidBodySystem {
    model: Model,
    data: Data,
}

impl RigidBodySystem {
    /// Validate `model` and allocate its state.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found by [`Model::validate`].
    pub fn new(model: Model) -> Result<Self> {
        model.validate()?;
        debug!(
            model = %model.name,
            nbody = model.nbody,
            nv = model.nv,
            "rigid-body system created"
        );
        let data = model.make_data();
        Ok(Self { model, data })
    }

    /// The static model.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The current state and derived quantities.
    #[must_use]
    pub fn data(&self) -> &Data {
        &self.data
    }

    fn require(&self, stage: Stage) -> Result<()> {
        self.data.require(stage)
    }

    fn check_body(&self, index: usize) -> Result<()> {
        if index >= self.model.nbody {
            return Err(DynamicsError::InvalidBodyIndex {
                index,
                count: self.model.nbody,
            });
        }
        Ok(())
    }
}

impl MultibodySystem for RigidBodySystem {
    fn dof_count(&self) -> usize {
        self.model.nv
    }

    fn body_count(&self) -> usize {
        self.model.nbody
    }

    fn find_body_index(&self, name: &str) -> Option<usize> {
        self.model.body_id(name)
    }

    fn set_state(&mut self, values: &[f64]) -> Result<()> {
        let nv = self.model.nv;
        if values.len() != 2 * nv {
            return Err(DynamicsError::InvalidStateLength {
                dofs: nv,
                expected: 2 * nv,
                actual: values.len(),
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DynamicsError::NonFiniteState { index, value });
        }

        self.data.qpos.copy_from_slice(&values[..nv]);
        self.data.qvel.copy_from_slice(&values[nv..]);
        self.data.invalidate();
        Ok(())
    }

    fn realize(&mut self, stage: Stage) -> Result<()> {
        self.data.realize(&self.model, stage);
        Ok(())
    }

    fn stage(&self) -> Stage {
        self.data.stage
    }

    fn multiply_by_mass_matrix(&self, udot: &DVector<f64>) -> Result<DVector<f64>> {
        self.require(Stage::Position)?;
        if udot.len() != self.model.nv {
            return Err(DynamicsError::dimension("udot", self.model.nv, udot.len()));
        }
        Ok(mul_m(&self.model, &self.data, udot))
    }

    fn gravity_body_forces(&self) -> Result<Vec<SpatialVec>> {
        self.require(Stage::Position)?;
        Ok(gravity_body_forces(&self.model, &self.data))
    }

    fn centrifugal_body_force(&self, body: usize) -> Result<SpatialVec> {
        self.require(Stage::Dynamics)?;
        self.check_body(body)?;
        Ok(centrifugal_body_force(&self.data, body))
    }

    fn multiply_by_system_jacobian_transpose(&self, forces: &[SpatialVec]) -> Result<DVector<f64>> {
        self.require(Stage::Position)?;
        if forces.len() != self.model.nbody {
            return Err(DynamicsError::dimension("body forces", self.model.nbody, forces.len()));
        }
        let origin_forces: Vec<SpatialVec> = forces
            .iter()
            .zip(&self.data.xpos)
            .map(|(f, xpos)| force_to_origin(f, xpos))
            .collect();
        Ok(mul_jac_t(&self.model, &self.data, &origin_forces))
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
        Ok(transform_point(&self.data, from, point, to))
    }

    fn multiply_by_frame_jacobian_transpose(
        &self,
        body: usize,
        station: &Vector3<f64>,
        force: &SpatialVec,
    ) -> Result<DVector<f64>> {
        self.require(Stage::Position)?;
        self.check_body(body)?;
        let point = station_world(&self.data, body, station);
        Ok(apply_ft(&self.model, &self.data, body, &point, force))
    }

    fn calc_frame_jacobian(&self, body: usize, station: &Vector3<f64>) -> Result<DMatrix<f64>> {
        self.require(Stage::Position)?;
        self.check_body(body)?;
        let point = station_world(&self.data, body, station);
        Ok(jac_frame(&self.model, &self.data, body, &point))
    }
}
