//! Model struct definition, construction helpers and validation.
//!
//! [`Model`] is the static, immutable description of the multibody system:
//! kinematic tree, body inertias, joint definitions and gravity. It is
//! constructed by jointspace-mjcf's model builder or by the factory
//! constructors (`Model::n_link_pendulum`, `Model::gait_biped`), then shared
//! read-only by every pipeline stage.

use jointspace_types::{DynamicsError, Result};
use nalgebra::{UnitQuaternion, Vector3};

use super::data::Data;
use super::enums::JointType;

/// Static model definition (like mjModel).
///
/// # Memory Layout
///
/// Arrays are indexed by their respective IDs:
/// - `body_*` arrays indexed by `body_id` (0 = world)
/// - `jnt_*` arrays indexed by `joint_id`
/// - `dof_*` arrays indexed by `dof_id`
///
/// Bodies are stored in topological order (`body_parent[b] < b`) and the
/// joints of a body occupy the contiguous range
/// `body_jnt_adr[b]..body_jnt_adr[b] + body_jnt_num[b]`. Every joint has one
/// DOF, so `jnt_dof_adr[j] == j`.
#[derive(Debug, Clone)]
pub struct Model {
    /// Model name (from the MJCF `model` attribute).
    pub name: String,

    // ==================== Dimensions ====================
    /// Number of generalized position coordinates.
    pub nq: usize,
    /// Number of generalized velocity coordinates (equal to `nq`).
    pub nv: usize,
    /// Number of bodies (including world body 0).
    pub nbody: usize,
    /// Number of joints.
    pub njnt: usize,

    // ==================== Bodies ====================
    /// Parent body index (world's parent is itself).
    pub body_parent: Vec<usize>,
    /// Body name; world is `"world"`.
    pub body_name: Vec<String>,
    /// Body origin in the parent frame.
    pub body_pos: Vec<Vector3<f64>>,
    /// Body orientation in the parent frame.
    pub body_quat: Vec<UnitQuaternion<f64>>,
    /// Center of mass in the body frame.
    pub body_ipos: Vec<Vector3<f64>>,
    /// Principal inertia frame orientation in the body frame.
    pub body_iquat: Vec<UnitQuaternion<f64>>,
    /// Body mass.
    pub body_mass: Vec<f64>,
    /// Principal moments of inertia about the center of mass.
    pub body_inertia: Vec<Vector3<f64>>,
    /// First joint of the body.
    pub body_jnt_adr: Vec<usize>,
    /// Number of joints of the body.
    pub body_jnt_num: Vec<usize>,

    // ==================== Joints ====================
    /// Joint type.
    pub jnt_type: Vec<JointType>,
    /// Owning body.
    pub jnt_body: Vec<usize>,
    /// Address in `qpos`.
    pub jnt_qpos_adr: Vec<usize>,
    /// Address in `qvel`.
    pub jnt_dof_adr: Vec<usize>,
    /// Unit axis in the body frame.
    pub jnt_axis: Vec<Vector3<f64>>,
    /// Anchor in the body frame (hinge only).
    pub jnt_pos: Vec<Vector3<f64>>,
    /// Optional joint name.
    pub jnt_name: Vec<Option<String>>,

    // ==================== DOFs ====================
    /// Body moved by the DOF.
    pub dof_body: Vec<usize>,
    /// Joint owning the DOF.
    pub dof_jnt: Vec<usize>,

    // ==================== Options ====================
    /// Gravitational acceleration in the world frame.
    pub gravity: Vector3<f64>,
}

impl Model {
    /// Model containing only the world body, with standard gravity along -Z.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            nq: 0,
            nv: 0,
            nbody: 1,
            njnt: 0,
            body_parent: vec![0],
            body_name: vec!["world".to_string()],
            body_pos: vec![Vector3::zeros()],
            body_quat: vec![UnitQuaternion::identity()],
            body_ipos: vec![Vector3::zeros()],
            body_iquat: vec![UnitQuaternion::identity()],
            body_mass: vec![0.0],
            body_inertia: vec![Vector3::zeros()],
            body_jnt_adr: vec![0],
            body_jnt_num: vec![0],
            jnt_type: Vec::new(),
            jnt_body: Vec::new(),
            jnt_qpos_adr: Vec::new(),
            jnt_dof_adr: Vec::new(),
            jnt_axis: Vec::new(),
            jnt_pos: Vec::new(),
            jnt_name: Vec::new(),
            dof_body: Vec::new(),
            dof_jnt: Vec::new(),
            gravity: Vector3::new(0.0, 0.0, -9.81),
        }
    }

    /// Append a massless body and return its index.
    ///
    /// The body must be added after its parent. Joints for the new body must
    /// be added with [`add_joint`](Self::add_joint) before the next body.
    pub fn add_body(
        &mut self,
        parent: usize,
        name: impl Into<String>,
        pos: Vector3<f64>,
        quat: UnitQuaternion<f64>,
    ) -> usize {
        let body_id = self.nbody;
        self.body_parent.push(parent);
        self.body_name.push(name.into());
        self.body_pos.push(pos);
        self.body_quat.push(quat);
        self.body_ipos.push(Vector3::zeros());
        self.body_iquat.push(UnitQuaternion::identity());
        self.body_mass.push(0.0);
        self.body_inertia.push(Vector3::zeros());
        self.body_jnt_adr.push(self.njnt);
        self.body_jnt_num.push(0);
        self.nbody += 1;
        body_id
    }

    /// Set the mass properties of a body.
    pub fn set_inertial(
        &mut self,
        body_id: usize,
        mass: f64,
        ipos: Vector3<f64>,
        iquat: UnitQuaternion<f64>,
        inertia: Vector3<f64>,
    ) {
        self.body_mass[body_id] = mass;
        self.body_ipos[body_id] = ipos;
        self.body_iquat[body_id] = iquat;
        self.body_inertia[body_id] = inertia;
    }

    /// Append a joint to the most recently added body and return its index.
    ///
    /// A zero axis is kept as-is and rejected later by [`validate`](Self::validate).
    pub fn add_joint(
        &mut self,
        jnt_type: JointType,
        axis: Vector3<f64>,
        pos: Vector3<f64>,
        name: Option<String>,
    ) -> usize {
        let jnt_id = self.njnt;
        let body_id = self.nbody - 1;
        let axis = axis.try_normalize(1e-12).unwrap_or(axis);

        self.jnt_type.push(jnt_type);
        self.jnt_body.push(body_id);
        self.jnt_qpos_adr.push(self.nq);
        self.jnt_dof_adr.push(self.nv);
        self.jnt_axis.push(axis);
        self.jnt_pos.push(pos);
        self.jnt_name.push(name);

        self.dof_body.push(body_id);
        self.dof_jnt.push(jnt_id);

        self.body_jnt_num[body_id] += 1;
        self.njnt += 1;
        self.nq += jnt_type.nv();
        self.nv += jnt_type.nv();
        jnt_id
    }

    /// Index of the body with exactly this name.
    #[must_use]
    pub fn body_id(&self, name: &str) -> Option<usize> {
        self.body_name.iter().position(|n| n == name)
    }

    /// Index of the joint with exactly this name.
    #[must_use]
    pub fn joint_id(&self, name: &str) -> Option<usize> {
        self.jnt_name
            .iter()
            .position(|n| n.as_deref() == Some(name))
    }

    /// Whether `ancestor` lies on the path from `body_id` to the world
    /// (a body is its own ancestor).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: usize, body_id: usize) -> bool {
        let mut current = body_id;
        loop {
            if current == ancestor {
                return true;
            }
            if current == 0 {
                return false;
            }
            current = self.body_parent[current];
        }
    }

    /// Create a [`Data`] sized for this model.
    #[must_use]
    pub fn make_data(&self) -> Data {
        Data::new(self)
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::InvalidConfig`] describing the first violated
    /// invariant: inconsistent array lengths, a parent that does not precede
    /// its child, non-contiguous joint ranges, a zero joint axis, negative or
    /// non-finite mass properties, or duplicate body names.
    pub fn validate(&self) -> Result<()> {
        let body_arrays = [
            self.body_parent.len(),
            self.body_name.len(),
            self.body_pos.len(),
            self.body_quat.len(),
            self.body_ipos.len(),
            self.body_iquat.len(),
            self.body_mass.len(),
            self.body_inertia.len(),
            self.body_jnt_adr.len(),
            self.body_jnt_num.len(),
        ];
        if body_arrays.iter().any(|&len| len != self.nbody) {
            return Err(DynamicsError::invalid_config(format!(
                "body arrays must all have length nbody = {}",
                self.nbody
            )));
        }

        let joint_arrays = [
            self.jnt_type.len(),
            self.jnt_body.len(),
            self.jnt_qpos_adr.len(),
            self.jnt_dof_adr.len(),
            self.jnt_axis.len(),
            self.jnt_pos.len(),
            self.jnt_name.len(),
        ];
        if joint_arrays.iter().any(|&len| len != self.njnt) {
            return Err(DynamicsError::invalid_config(format!(
                "joint arrays must all have length njnt = {}",
                self.njnt
            )));
        }

        if self.nq != self.nv || self.nv != self.njnt {
            return Err(DynamicsError::invalid_config(format!(
                "expected nq == nv == njnt, got nq = {}, nv = {}, njnt = {}",
                self.nq, self.nv, self.njnt
            )));
        }
        if self.dof_body.len() != self.nv || self.dof_jnt.len() != self.nv {
            return Err(DynamicsError::invalid_config(
                "dof arrays must have length nv",
            ));
        }

        let mut next_joint = 0;
        for body_id in 1..self.nbody {
            if self.body_parent[body_id] >= body_id {
                return Err(DynamicsError::invalid_config(format!(
                    "body {body_id} ('{}') has parent {} which does not precede it",
                    self.body_name[body_id], self.body_parent[body_id]
                )));
            }
            if self.body_jnt_adr[body_id] != next_joint {
                return Err(DynamicsError::invalid_config(format!(
                    "joints of body {body_id} are not contiguous"
                )));
            }
            next_joint += self.body_jnt_num[body_id];

            let mass = self.body_mass[body_id];
            let inertia = self.body_inertia[body_id];
            if !mass.is_finite() || mass < 0.0 {
                return Err(DynamicsError::invalid_config(format!(
                    "body '{}' has invalid mass {mass}",
                    self.body_name[body_id]
                )));
            }
            if inertia.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(DynamicsError::invalid_config(format!(
                    "body '{}' has invalid inertia {inertia:?}",
                    self.body_name[body_id]
                )));
            }
            if self.body_name[..body_id].contains(&self.body_name[body_id]) {
                return Err(DynamicsError::invalid_config(format!(
                    "duplicate body name '{}'",
                    self.body_name[body_id]
                )));
            }
        }
        if next_joint != self.njnt {
            return Err(DynamicsError::invalid_config(
                "body joint ranges do not cover every joint",
            ));
        }

        for jnt_id in 0..self.njnt {
            let body_id = self.jnt_body[jnt_id];
            let start = self.body_jnt_adr[body_id];
            if !(start..start + self.body_jnt_num[body_id]).contains(&jnt_id) {
                return Err(DynamicsError::invalid_config(format!(
                    "joint {jnt_id} is outside the joint range of body {body_id}"
                )));
            }
            if (self.jnt_axis[jnt_id].norm() - 1.0).abs() > 1e-9 {
                return Err(DynamicsError::invalid_config(format!(
                    "joint {jnt_id} has a zero or non-unit axis"
                )));
            }
            if self.jnt_dof_adr[jnt_id] != jnt_id || self.jnt_qpos_adr[jnt_id] != jnt_id {
                return Err(DynamicsError::invalid_config(format!(
                    "joint {jnt_id} has non-sequential addresses"
                )));
            }
        }

        if self.gravity.iter().any(|v| !v.is_finite()) {
            return Err(DynamicsError::invalid_config("gravity must be finite"));
        }

        Ok(())
    }
}
