//! Intermediate representation of the supported MJCF subset.
//!
//! The parser fills these types straight from XML attributes; the builder
//! turns them into a [`jointspace_core::Model`].

use nalgebra::{Vector3, Vector4};

/// A parsed `<mujoco>` document.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfModel {
    /// Model name from the `model` attribute.
    pub name: String,
    /// Global options.
    pub option: MjcfOption,
    /// The `<worldbody>` element, holding top-level bodies as children.
    pub worldbody: MjcfBody,
}

impl MjcfModel {
    /// Create an empty model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option: MjcfOption::default(),
            worldbody: MjcfBody::new("world"),
        }
    }

    /// Add a top-level body.
    #[must_use]
    pub fn with_body(mut self, body: MjcfBody) -> Self {
        self.worldbody.children.push(body);
        self
    }

    /// Set gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.option.gravity = gravity;
        self
    }
}

/// Options from `<option>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MjcfOption {
    /// Gravitational acceleration.
    pub gravity: Vector3<f64>,
}

impl Default for MjcfOption {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, 0.0, -9.81),
        }
    }
}

/// A `<body>` element and its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfBody {
    /// Body name.
    pub name: String,
    /// Position in the parent frame.
    pub pos: Vector3<f64>,
    /// Orientation in the parent frame (quaternion: w x y z).
    pub quat: Vector4<f64>,
    /// Mass properties, if given.
    pub inertial: Option<MjcfInertial>,
    /// Joints in document order.
    pub joints: Vec<MjcfJoint>,
    /// Child bodies in document order.
    pub children: Vec<MjcfBody>,
}

impl MjcfBody {
    /// Create a body at the parent origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos: Vector3::zeros(),
            quat: Vector4::new(1.0, 0.0, 0.0, 0.0),
            inertial: None,
            joints: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the position in the parent frame.
    #[must_use]
    pub fn with_pos(mut self, pos: Vector3<f64>) -> Self {
        self.pos = pos;
        self
    }

    /// Add a joint.
    #[must_use]
    pub fn with_joint(mut self, joint: MjcfJoint) -> Self {
        self.joints.push(joint);
        self
    }

    /// Set mass properties.
    #[must_use]
    pub fn with_inertial(mut self, inertial: MjcfInertial) -> Self {
        self.inertial = Some(inertial);
        self
    }

    /// Add a child body.
    #[must_use]
    pub fn with_child(mut self, child: MjcfBody) -> Self {
        self.children.push(child);
        self
    }
}

/// Supported joint types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MjcfJointType {
    /// Rotation about an axis.
    #[default]
    Hinge,
    /// Translation along an axis.
    Slide,
}

impl MjcfJointType {
    /// Parse the `type` attribute.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hinge" => Some(Self::Hinge),
            "slide" => Some(Self::Slide),
            _ => None,
        }
    }
}

/// A `<joint>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfJoint {
    /// Joint name (may be empty).
    pub name: String,
    /// Joint type.
    pub joint_type: MjcfJointType,
    /// Axis in the body frame (not normalized).
    pub axis: Vector3<f64>,
    /// Anchor in the body frame.
    pub pos: Vector3<f64>,
}

impl MjcfJoint {
    /// A named hinge about `axis`.
    #[must_use]
    pub fn hinge(name: impl Into<String>, axis: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            joint_type: MjcfJointType::Hinge,
            axis,
            pos: Vector3::zeros(),
        }
    }

    /// A named slide along `axis`.
    #[must_use]
    pub fn slide(name: impl Into<String>, axis: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            joint_type: MjcfJointType::Slide,
            axis,
            pos: Vector3::zeros(),
        }
    }
}

impl Default for MjcfJoint {
    fn default() -> Self {
        Self {
            name: String::new(),
            joint_type: MjcfJointType::Hinge,
            axis: Vector3::z(),
            pos: Vector3::zeros(),
        }
    }
}

/// Inertial properties from `<inertial>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MjcfInertial {
    /// Position of center of mass relative to body frame.
    pub pos: Vector3<f64>,
    /// Orientation of principal axes (quaternion: w x y z).
    pub quat: Vector4<f64>,
    /// Mass in kg.
    pub mass: f64,
    /// Diagonal inertia (Ixx, Iyy, Izz) - if specified.
    pub diaginertia: Option<Vector3<f64>>,
    /// Full inertia tensor (Ixx, Iyy, Izz, Ixy, Ixz, Iyz) - if specified.
    pub fullinertia: Option<[f64; 6]>,
}

impl Default for MjcfInertial {
    fn default() -> Self {
        Self {
            pos: Vector3::zeros(),
            quat: Vector4::new(1.0, 0.0, 0.0, 0.0),
            mass: 0.0,
            diaginertia: None,
            fullinertia: None,
        }
    }
}

impl MjcfInertial {
    /// Point mass properties with principal moments `diag` at `pos`.
    #[must_use]
    pub fn diagonal(mass: f64, pos: Vector3<f64>, diag: Vector3<f64>) -> Self {
        Self {
            pos,
            mass,
            diaginertia: Some(diag),
            ..Self::default()
        }
    }
}
