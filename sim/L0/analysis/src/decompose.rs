//! Joint-space force decomposition of one frame.
//!
//! For a realized state the net joint torque splits into
//!
//! ```text
//! τ_actuation = M(q) q̈ + c(q, q̇) − g(q) − J_R^T F_R − J_L^T F_L + residual
//! ```
//!
//! where every term on the right is evaluated through the
//! [`MultibodySystem`] operators. The residual is what the recording fails
//! to explain.

use jointspace_types::{
    AnalysisConfig, DynamicsError, MissingBodyPolicy, MultibodySystem, SpatialVec, Stage,
};
use nalgebra::{DMatrix, DVector, Vector3};
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::frame::{ContactLoad, JointSpaceForceSet, ResidualCheck, Side, TimeSeriesFrame};
use crate::Result;

/// Frame Jacobians at the configured attachment stations.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentJacobians {
    /// 6×D Jacobian of the right station.
    pub right: DMatrix<f64>,
    /// 6×D Jacobian of the left station.
    pub left: DMatrix<f64>,
}

/// Everything computed for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Frame time.
    pub time: f64,
    /// Force components.
    pub forces: JointSpaceForceSet,
    /// Residual and internal checks.
    pub check: ResidualCheck,
    /// Attachment Jacobians, when configured.
    pub attachments: Option<AttachmentJacobians>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AttachmentTargets {
    right: Option<usize>,
    left: Option<usize>,
    station: Vector3<f64>,
}

/// Decomposes recorded frames against one multibody system.
///
/// Body roles are resolved to indices once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposer {
    dof_count: usize,
    body_count: usize,
    right_contact: Option<usize>,
    left_contact: Option<usize>,
    attachment: Option<AttachmentTargets>,
}

fn resolve_body<S: MultibodySystem + ?Sized>(
    system: &S,
    role: &'static str,
    name: &str,
    policy: MissingBodyPolicy,
) -> Result<Option<usize>> {
    match system.find_body_index(name) {
        Some(index) => Ok(Some(index)),
        None => match policy {
            MissingBodyPolicy::Error => Err(AnalysisError::MissingBody {
                role,
                name: name.to_string(),
            }),
            MissingBodyPolicy::Zero => {
                warn!(role, name, "body not in model, its contribution is zero");
                Ok(None)
            }
        },
    }
}

impl Decomposer {
    /// Resolve the configured body roles against `system`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error from [`AnalysisConfig::validate`], or
    /// [`AnalysisError::MissingBody`] when a role's body is absent and the
    /// policy is [`MissingBodyPolicy::Error`].
    pub fn new<S: MultibodySystem + ?Sized>(system: &S, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.missing_body;
        let right_contact = resolve_body(system, "right contact", &config.contact.right, policy)?;
        let left_contact = resolve_body(system, "left contact", &config.contact.left, policy)?;
        let attachment = match &config.attachment {
            Some(a) => Some(AttachmentTargets {
                right: resolve_body(system, "right attachment", &a.bodies.right, policy)?,
                left: resolve_body(system, "left attachment", &a.bodies.left, policy)?,
                station: Vector3::from(a.point),
            }),
            None => None,
        };

        debug!(
            dofs = system.dof_count(),
            bodies = system.body_count(),
            ?right_contact,
            ?left_contact,
            "resolved body roles"
        );
        Ok(Self {
            dof_count: system.dof_count(),
            body_count: system.body_count(),
            right_contact,
            left_contact,
            attachment,
        })
    }

    /// Degrees of freedom of the system this decomposer was built for.
    pub fn dof_count(&self) -> usize {
        self.dof_count
    }

    /// Set `frame`'s state on `system`, realize it and compute every force
    /// component.
    ///
    /// The result depends only on `frame` and the system's model, never on
    /// earlier calls.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError`] (wrapped) when a frame vector has the wrong
    /// length or any operator fails.
    pub fn decompose<S: MultibodySystem + ?Sized>(
        &self,
        system: &mut S,
        frame: &TimeSeriesFrame,
    ) -> Result<Decomposition> {
        let d = self.dof_count;
        for (what, expected, actual) in [
            ("system degrees of freedom", d, system.dof_count()),
            ("system bodies", self.body_count, system.body_count()),
            ("accelerations", d, frame.accelerations.len()),
            ("net torques", d, frame.net_torques.len()),
        ] {
            if actual != expected {
                return Err(DynamicsError::dimension(what, expected, actual).into());
            }
        }

        let realized = RealizedFrame::new(system, &frame.states)?;
        let grf = &frame.ground_reaction;
        let forces = JointSpaceForceSet {
            inertia: realized.inertia(&frame.accelerations)?,
            coriolis: realized.coriolis()?,
            gravity: realized.gravity()?,
            right_contact: realized.contact(self.right_contact, &grf.load(Side::Right))?,
            left_contact: realized.contact(self.left_contact, &grf.load(Side::Left))?,
            actuation: frame.net_torques.clone(),
        };
        let attachments = match &self.attachment {
            Some(a) => Some(AttachmentJacobians {
                right: realized.frame_jacobian(a.right, &a.station)?,
                left: realized.frame_jacobian(a.left, &a.station)?,
            }),
            None => None,
        };
        let check = forces.residual_check();

        debug!(
            time = frame.time,
            net = ?forces.actuation.as_slice(),
            inertia = ?forces.inertia.as_slice(),
            gravity = ?forces.gravity.as_slice(),
            coriolis = ?forces.coriolis.as_slice(),
            right_contact = ?forces.right_contact.as_slice(),
            left_contact = ?forces.left_contact.as_slice(),
            max_residual = check.max_abs_residual(),
            "decomposed frame"
        );

        Ok(Decomposition {
            time: frame.time,
            forces,
            check,
            attachments,
        })
    }
}

/// A system realized to [`Stage::Dynamics`] for one state.
///
/// Holding the shared borrow guarantees that every component of a frame is
/// computed from the same state.
pub(crate) struct RealizedFrame<'a, S: ?Sized> {
    system: &'a S,
    dofs: usize,
}

impl<'a, S: MultibodySystem + ?Sized> RealizedFrame<'a, S> {
    pub(crate) fn new(system: &'a mut S, states: &[f64]) -> Result<Self> {
        system.set_state(states)?;
        system.realize(Stage::Dynamics)?;
        let dofs = system.dof_count();
        Ok(Self { system, dofs })
    }

    fn checked(&self, what: &'static str, v: DVector<f64>) -> Result<DVector<f64>> {
        if v.len() != self.dofs {
            let err = DynamicsError::dimension(what, self.dofs, v.len());
            return Err(err.into());
        }
        Ok(v)
    }

    fn inertia(&self, accelerations: &DVector<f64>) -> Result<DVector<f64>> {
        let v = self.system.multiply_by_mass_matrix(accelerations)?;
        self.checked("inertia forces", v)
    }

    fn coriolis(&self) -> Result<DVector<f64>> {
        let n = self.system.body_count();
        let mut forces = vec![SpatialVec::zeros(); n];
        for (body, f) in forces.iter_mut().enumerate().skip(1) {
            *f = self.system.centrifugal_body_force(body)?;
        }
        let v = self.system.multiply_by_system_jacobian_transpose(&forces)?;
        self.checked("coriolis forces", v)
    }

    fn gravity(&self) -> Result<DVector<f64>> {
        let forces = self.system.gravity_body_forces()?;
        let v = self.system.multiply_by_system_jacobian_transpose(&forces)?;
        self.checked("gravity forces", v)
    }

    fn contact(&self, body: Option<usize>, load: &ContactLoad) -> Result<DVector<f64>> {
        let Some(body) = body else {
            return Ok(DVector::zeros(self.dofs));
        };
        let station = self.system.transform_point(0, &load.cop, body)?;
        let force = load.spatial_force();
        let v = self
            .system
            .multiply_by_frame_jacobian_transpose(body, &station, &force)?;
        self.checked("contact forces", v)
    }

    pub(crate) fn frame_jacobian(
        &self,
        body: Option<usize>,
        station: &Vector3<f64>,
    ) -> Result<DMatrix<f64>> {
        let Some(body) = body else {
            return Ok(DMatrix::zeros(6, self.dofs));
        };
        let j = self.system.calc_frame_jacobian(body, station)?;
        if j.shape() != (6, self.dofs) {
            let err = DynamicsError::dimension("frame jacobian columns", self.dofs, j.ncols());
            return Err(err.into());
        }
        Ok(j)
    }
}
