//! MJCF-to-Model builder.
//!
//! Converts a parsed [`MjcfModel`] into a [`Model`]. Sub-modules handle the
//! body tree, mass properties and orientations; this module holds the public
//! entry points ([`model_from_mjcf`], [`load_model`], [`load_model_from_file`]).

pub mod body;
pub mod mass;
pub mod orientation;

use std::path::Path;

use jointspace_core::Model;
use tracing::{debug, info};

use crate::error::{MjcfError, Result};
use crate::parser::parse_mjcf_str;
use crate::types::MjcfModel;
use crate::validation::validate;

/// Convert a parsed MJCF model into a [`Model`].
///
/// # Errors
///
/// Returns an error if validation fails or the assembled model violates a
/// structural invariant.
pub fn model_from_mjcf(mjcf: &MjcfModel) -> Result<Model> {
    let summary = validate(mjcf)?;
    debug!(
        bodies = summary.sorted_bodies.len(),
        named_joints = summary.joint_names.len(),
        "validated MJCF"
    );

    let mut model = Model::empty();
    model.name.clone_from(&mjcf.name);
    model.gravity = mjcf.option.gravity;
    for body in &mjcf.worldbody.children {
        body::process_body(&mut model, body, 0)?;
    }

    model.validate()?;
    Ok(model)
}

/// Parse and build a model from an MJCF string.
///
/// # Errors
///
/// Returns an error on malformed XML or an invalid model.
pub fn load_model(xml: &str) -> Result<Model> {
    let mjcf = parse_mjcf_str(xml)?;
    model_from_mjcf(&mjcf)
}

/// Read, parse and build a model from an MJCF file.
///
/// # Errors
///
/// Returns [`MjcfError::Io`] if the file cannot be read, or any error of
/// [`load_model`].
pub fn load_model_from_file(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| MjcfError::io(path, e))?;
    let model = load_model(&xml)?;
    info!(
        path = %path.display(),
        model = %model.name,
        nbody = model.nbody,
        nv = model.nv,
        "loaded MJCF model"
    );
    Ok(model)
}
