//! Core type definitions: joint types, [`Model`] and [`Data`].

pub(crate) mod data;
pub(crate) mod enums;
pub(crate) mod model;
mod model_factories;

pub use data::Data;
pub use enums::JointType;
pub use model::Model;
