//! Dynamics computations: spatial algebra and the Newton-Euler passes.

pub(crate) mod rne;
pub(crate) mod spatial;

pub use rne::{centrifugal_body_force, fwd_bias, gravity_body_forces, mul_m};
pub use spatial::{
    angular, compute_body_spatial_inertia, force_from_origin, force_to_origin, linear, motion_at,
    spatial, spatial_cross_force, spatial_cross_motion,
};
