//! Factory methods for canonical multibody systems.
//!
//! These constructors produce pre-configured [`Model`] instances used by
//! inline tests, by `jointspace-conformance-tests` and as demo models for
//! the CLI.

use nalgebra::{UnitQuaternion, Vector3};

use super::enums::JointType;
use super::model::Model;

impl Model {
    /// Create an n-link serial pendulum (hinge joints only).
    ///
    /// Each link rotates about the Y axis at its proximal end and carries a
    /// point mass at its distal end; the next link is attached there. At
    /// `qpos = 0` the chain hangs straight down along -Z.
    ///
    /// # Arguments
    /// * `n` - Number of links (must be >= 1)
    /// * `link_length` - Length of each link (meters)
    /// * `link_mass` - Mass of each link (kg)
    ///
    /// # Panics
    /// Panics if `n` is 0 (requires at least 1 link).
    ///
    /// # Example
    /// ```
    /// use jointspace_core::Model;
    ///
    /// let model = Model::n_link_pendulum(3, 1.0, 1.0);
    /// assert_eq!(model.nv, 3);
    /// assert_eq!(model.body_id("link_2"), Some(3));
    /// ```
    #[must_use]
    pub fn n_link_pendulum(n: usize, link_length: f64, link_mass: f64) -> Self {
        assert!(n >= 1, "n_link_pendulum requires at least 1 link");

        let mut model = Self::empty();
        model.name = format!("{n}_link_pendulum");

        for i in 0..n {
            let parent_id = i;
            // First link hangs from the world origin, later links from the
            // previous link's tip.
            let pos = if i == 0 {
                Vector3::zeros()
            } else {
                Vector3::new(0.0, 0.0, -link_length)
            };
            let name = format!("link_{i}");
            let body_id = model.add_body(parent_id, name, pos, UnitQuaternion::identity());

            // Point mass approximation (small moment of inertia)
            model.set_inertial(
                body_id,
                link_mass,
                Vector3::new(0.0, 0.0, -link_length),
                UnitQuaternion::identity(),
                Vector3::new(0.001, 0.001, 0.001),
            );
            model.add_joint(
                JointType::Hinge,
                Vector3::y(),
                Vector3::zeros(),
                Some(format!("hinge_{i}")),
            );
        }

        model
    }

    /// Create a planar-legged gait model with a 6-DOF pelvis.
    ///
    /// Y is up and gravity is `-9.81` along Y. Generalized coordinates:
    ///
    /// | Index | Joint              | Type  |
    /// |-------|--------------------|-------|
    /// | 0-2   | pelvis tilt/list/rotation | hinge Z/X/Y |
    /// | 3-5   | pelvis tx/ty/tz    | slide X/Y/Z |
    /// | 6-8   | right hip/knee/ankle | hinge Z |
    /// | 9-11  | left hip/knee/ankle  | hinge Z |
    ///
    /// Bodies: `pelvis`, then `femur_r`, `tibia_r`, `calcn_r`, then
    /// `femur_l`, `tibia_l`, `calcn_l`. Segment parameters are those of an
    /// adult of about 75 kg.
    #[must_use]
    pub fn gait_biped() -> Self {
        let mut model = Self::empty();
        model.name = "gait_biped".to_string();
        model.gravity = Vector3::new(0.0, -9.81, 0.0);

        let pelvis = model.add_body(
            0,
            "pelvis",
            Vector3::new(0.0, 0.95, 0.0),
            UnitQuaternion::identity(),
        );
        model.set_inertial(
            pelvis,
            11.777,
            Vector3::new(-0.0707, 0.0, 0.0),
            UnitQuaternion::identity(),
            Vector3::new(0.1028, 0.0871, 0.0579),
        );
        let pelvis_joints = [
            ("pelvis_tilt", JointType::Hinge, Vector3::z()),
            ("pelvis_list", JointType::Hinge, Vector3::x()),
            ("pelvis_rotation", JointType::Hinge, Vector3::y()),
            ("pelvis_tx", JointType::Slide, Vector3::x()),
            ("pelvis_ty", JointType::Slide, Vector3::y()),
            ("pelvis_tz", JointType::Slide, Vector3::z()),
        ];
        for (name, jnt_type, axis) in pelvis_joints {
            model.add_joint(jnt_type, axis, Vector3::zeros(), Some(name.to_string()));
        }

        for (side, z) in [("r", 0.0835), ("l", -0.0835)] {
            let femur = model.add_body(
                pelvis,
                format!("femur_{side}"),
                Vector3::new(-0.0707, -0.0661, z),
                UnitQuaternion::identity(),
            );
            model.set_inertial(
                femur,
                9.301,
                Vector3::new(0.0, -0.17, 0.0),
                UnitQuaternion::identity(),
                Vector3::new(0.1339, 0.0351, 0.1412),
            );
            model.add_joint(
                JointType::Hinge,
                Vector3::z(),
                Vector3::zeros(),
                Some(format!("hip_flexion_{side}")),
            );

            let tibia = model.add_body(
                femur,
                format!("tibia_{side}"),
                Vector3::new(0.0, -0.396, 0.0),
                UnitQuaternion::identity(),
            );
            model.set_inertial(
                tibia,
                3.708,
                Vector3::new(0.0, -0.187, 0.0),
                UnitQuaternion::identity(),
                Vector3::new(0.0504, 0.0051, 0.0511),
            );
            model.add_joint(
                JointType::Hinge,
                Vector3::z(),
                Vector3::zeros(),
                Some(format!("knee_angle_{side}")),
            );

            let calcn = model.add_body(
                tibia,
                format!("calcn_{side}"),
                Vector3::new(0.0, -0.43, 0.0),
                UnitQuaternion::identity(),
            );
            model.set_inertial(
                calcn,
                1.25,
                Vector3::new(0.1, 0.03, 0.0),
                UnitQuaternion::identity(),
                Vector3::new(0.0014, 0.0039, 0.0041),
            );
            model.add_joint(
                JointType::Hinge,
                Vector3::z(),
                Vector3::zeros(),
                Some(format!("ankle_angle_{side}")),
            );
        }

        model
    }
}
