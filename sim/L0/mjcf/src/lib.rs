//! MJCF (MuJoCo XML Format) model loader for joint-space force analysis.
//!
//! This crate parses the kinematic-tree subset of
//! [MJCF](https://mujoco.readthedocs.io/en/stable/XMLreference.html) and
//! converts it into a [`jointspace_core::Model`]. It also reads the small
//! XML settings document that lists contact points for frame-Jacobian export.
//!
//! # Features
//!
//! - Parse MJCF XML from files or strings
//! - Build a Model with hinge and slide joints, any number per body
//! - Diagonal or full inertia tensors (full tensors are diagonalized)
//! - Kinematic tree validation (unique names, finite mass properties)
//! - Contact-point settings with unique output names
//!
//! # Layer 0
//!
//! No rendering and no simulation stepping. The only I/O is reading the
//! input document in the `*_from_file` helpers.
//!
//! # Example
//!
//! ```
//! use jointspace_mjcf::load_model;
//!
//! let mjcf = r#"
//!     <mujoco model="simple">
//!         <worldbody>
//!             <body name="base" pos="0 0 1">
//!                 <joint name="swing" axis="0 1 0"/>
//!                 <inertial pos="0 0 -0.5" mass="1.0" diaginertia="0.01 0.01 0.01"/>
//!             </body>
//!         </worldbody>
//!     </mujoco>
//! "#;
//!
//! let model = load_model(mjcf).expect("should parse");
//! assert_eq!(model.name, "simple");
//! assert_eq!(model.nv, 1);
//! ```
//!
//! # Supported MJCF Elements
//!
//! - `<mujoco model="...">` - Root element, model name parsing
//! - `<option gravity="...">` - Gravity; other options are ignored
//! - `<worldbody>` - Root of the body tree
//! - `<body name="..." pos="..." quat="...">` - Hierarchical body definition
//! - `<inertial>` - Mass properties with pos, quat, mass, diaginertia/fullinertia
//! - `<joint type="hinge|slide" axis="..." pos="...">` - Joint attached to body
//!
//! Any other element (geoms, sites, actuators, defaults, assets) is skipped
//! with its subtree. Ball and free joints are rejected as unsupported.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::should_implement_trait,
    clippy::doc_markdown,
    clippy::suboptimal_flops
)]

mod builder;
mod error;
mod parser;
mod points;
mod types;
mod validation;

// Re-export main types
pub use error::{MjcfError, Result};
pub use parser::parse_mjcf_str;
pub use points::{load_points, load_points_from_file};
pub use types::{MjcfBody, MjcfInertial, MjcfJoint, MjcfJointType, MjcfModel, MjcfOption};
pub use validation::{validate, ValidationResult};

// Model conversion (primary API)
pub use builder::{load_model, load_model_from_file, model_from_mjcf};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jointspace_core::RigidBodySystem;
    use jointspace_types::{MultibodySystem, Stage};

    /// A loaded model drives the reference system end to end.
    #[test]
    fn test_two_link_arm_realizes() {
        let mjcf = r#"
            <mujoco model="two_link_arm">
                <option gravity="0 0 -9.81"/>
                <worldbody>
                    <body name="base_link" pos="0 0 0.1">
                        <inertial pos="0 0 0" mass="5.0" diaginertia="0.5 0.5 0.5"/>
                        <geom type="box" size="0.1 0.1 0.05"/>
                        <body name="link1" pos="0 0 0.05">
                            <joint name="joint1" type="hinge" axis="0 1 0"
                                   limited="true" range="-3.14 3.14" damping="0.5"/>
                            <inertial pos="0 0 0.25" mass="1.0" diaginertia="0.1 0.1 0.01"/>
                            <body name="link2" pos="0 0 0.5">
                                <joint name="joint2" type="hinge" axis="0 1 0"/>
                                <inertial pos="0 0 0.2" mass="0.5" diaginertia="0.05 0.05 0.005"/>
                            </body>
                        </body>
                    </body>
                </worldbody>
            </mujoco>
        "#;

        let model = load_model(mjcf).expect("should load");
        assert_eq!(model.njnt, 2);

        let mut system = RigidBodySystem::new(model).unwrap();
        assert_eq!(system.find_body_index("link2"), Some(3));
        system.set_state(&[0.3, -0.2, 0.0, 0.0]).unwrap();
        system.realize(Stage::Dynamics).unwrap();
        let gravity = system.gravity_body_forces().unwrap();
        assert_eq!(gravity.len(), 4);
    }

    #[test]
    fn test_invalid_mjcf() {
        assert!(parse_mjcf_str("<body name='test'/>").is_err());

        let result = parse_mjcf_str(
            r#"
            <mujoco model="test">
                <worldbody>
                    <body name="a">
                        <joint name="j" type="invalid"/>
                    </body>
                </worldbody>
            </mujoco>
        "#,
        );
        assert!(matches!(result, Err(MjcfError::UnknownJointType(_))));
    }
}
