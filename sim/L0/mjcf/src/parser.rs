//! MJCF XML parser.
//!
//! Parses MJCF XML into the intermediate representation types. Elements
//! outside the supported subset are skipped with their whole subtree.

use nalgebra::{Vector3, Vector4};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;
use tracing::trace;

use crate::error::{MjcfError, Result};
use crate::types::{MjcfBody, MjcfInertial, MjcfJoint, MjcfJointType, MjcfModel, MjcfOption};

/// Parse an MJCF string into a model.
///
/// # Errors
///
/// Returns an error if the XML is malformed or missing required elements.
pub fn parse_mjcf_str(xml: &str) -> Result<MjcfModel> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    parse_mjcf_reader(&mut reader)
}

/// Parse MJCF from a reader.
fn parse_mjcf_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<MjcfModel> {
    let mut buf = Vec::new();
    let mut model: Option<MjcfModel> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"mujoco" => {
                model = Some(parse_mujoco(reader, e)?);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"mujoco" => {
                model = Some(MjcfModel::new(model_name(e)));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    model.ok_or_else(|| MjcfError::missing_element("mujoco", "MJCF document"))
}

fn model_name(e: &BytesStart) -> String {
    get_attribute_opt(e, "model").unwrap_or_else(|| "unnamed".to_string())
}

/// Parse the mujoco root element and its children.
fn parse_mujoco<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<MjcfModel> {
    let mut model = MjcfModel::new(model_name(start));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"option" => {
                        model.option = parse_option_attrs(e)?;
                        skip_element(reader, &elem_name)?;
                    }
                    b"worldbody" => {
                        let wb = parse_worldbody(reader)?;
                        // Merge: several <worldbody> blocks append to one tree
                        model.worldbody.children.extend(wb.children);
                    }
                    // Skip other elements
                    _ => {
                        trace!(element = %String::from_utf8_lossy(&elem_name), "skipping");
                        skip_element(reader, &elem_name)?;
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"option" {
                    model.option = parse_option_attrs(e)?;
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"mujoco" => break,
            Ok(Event::Eof) => return Err(MjcfError::XmlParse("unexpected EOF in mujoco".into())),
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(model)
}

/// Parse option attributes only.
fn parse_option_attrs(e: &BytesStart) -> Result<MjcfOption> {
    let mut option = MjcfOption::default();
    if let Some(gravity) = get_attribute_opt(e, "gravity") {
        option.gravity = parse_vector3(&gravity)?;
    }
    Ok(option)
}

/// Parse worldbody element.
fn parse_worldbody<R: BufRead>(reader: &mut Reader<R>) -> Result<MjcfBody> {
    let mut worldbody = MjcfBody::new("world");
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"body" => {
                        let body = parse_body(reader, e)?;
                        worldbody.children.push(body);
                    }
                    _ => skip_element(reader, &elem_name)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"body" {
                    worldbody.children.push(parse_body_attrs(e)?);
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"worldbody" => break,
            Ok(Event::Eof) => {
                return Err(MjcfError::XmlParse("unexpected EOF in worldbody".into()));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(worldbody)
}

/// Parse body element.
fn parse_body<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<MjcfBody> {
    let mut body = parse_body_attrs(start)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"body" => {
                        let child = parse_body(reader, e)?;
                        body.children.push(child);
                    }
                    b"joint" => {
                        body.joints.push(parse_joint_attrs(e)?);
                        skip_element(reader, &elem_name)?;
                    }
                    b"inertial" => {
                        body.inertial = Some(parse_inertial_attrs(e, &body.name)?);
                        skip_element(reader, &elem_name)?;
                    }
                    b"freejoint" => {
                        return Err(MjcfError::Unsupported(format!(
                            "free joint on body '{}'",
                            body.name
                        )));
                    }
                    _ => skip_element(reader, &elem_name)?,
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"body" => body.children.push(parse_body_attrs(e)?),
                b"joint" => body.joints.push(parse_joint_attrs(e)?),
                b"inertial" => body.inertial = Some(parse_inertial_attrs(e, &body.name)?),
                b"freejoint" => {
                    return Err(MjcfError::Unsupported(format!(
                        "free joint on body '{}'",
                        body.name
                    )));
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"body" => break,
            Ok(Event::Eof) => return Err(MjcfError::XmlParse("unexpected EOF in body".into())),
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(body)
}

/// Parse body attributes only.
fn parse_body_attrs(e: &BytesStart) -> Result<MjcfBody> {
    let name = get_attribute_opt(e, "name")
        .ok_or_else(|| MjcfError::missing_attribute("name", "body"))?;
    let mut body = MjcfBody::new(name);

    if let Some(pos) = get_attribute_opt(e, "pos") {
        body.pos = parse_vector3(&pos)?;
    }
    if let Some(quat) = get_attribute_opt(e, "quat") {
        body.quat = parse_vector4(&quat)?;
    }

    Ok(body)
}

/// Parse joint attributes only.
fn parse_joint_attrs(e: &BytesStart) -> Result<MjcfJoint> {
    let mut joint = MjcfJoint {
        name: get_attribute_opt(e, "name").unwrap_or_default(),
        ..MjcfJoint::default()
    };

    if let Some(jtype) = get_attribute_opt(e, "type") {
        joint.joint_type = match jtype.as_str() {
            "ball" | "free" => {
                return Err(MjcfError::Unsupported(format!(
                    "{jtype} joint '{}'",
                    joint.name
                )));
            }
            other => MjcfJointType::from_str(other)
                .ok_or_else(|| MjcfError::UnknownJointType(jtype.clone()))?,
        };
    }
    if let Some(pos) = get_attribute_opt(e, "pos") {
        joint.pos = parse_vector3(&pos)?;
    }
    if let Some(axis) = get_attribute_opt(e, "axis") {
        joint.axis = parse_vector3(&axis)?;
        if joint.axis.norm() < 1e-10 {
            return Err(MjcfError::invalid_attribute(
                "axis",
                format!("joint '{}'", joint.name),
                "axis must be non-zero",
            ));
        }
    }

    Ok(joint)
}

/// Parse inertial attributes only.
fn parse_inertial_attrs(e: &BytesStart, body_name: &str) -> Result<MjcfInertial> {
    let mut inertial = MjcfInertial::default();
    let context = || format!("inertial of body '{body_name}'");

    if let Some(pos) = get_attribute_opt(e, "pos") {
        inertial.pos = parse_vector3(&pos)?;
    }
    if let Some(quat) = get_attribute_opt(e, "quat") {
        inertial.quat = parse_vector4(&quat)?;
    }
    let mass = get_attribute_opt(e, "mass")
        .ok_or_else(|| MjcfError::missing_attribute("mass", context()))?;
    inertial.mass = mass.trim().parse().map_err(|_| {
        MjcfError::invalid_attribute("mass", context(), format!("expected float, got '{mass}'"))
    })?;
    if let Some(diag) = get_attribute_opt(e, "diaginertia") {
        inertial.diaginertia = Some(parse_vector3(&diag)?);
    }
    if let Some(full) = get_attribute_opt(e, "fullinertia") {
        let parts = parse_float_array(&full)?;
        if parts.len() != 6 {
            return Err(MjcfError::invalid_attribute(
                "fullinertia",
                context(),
                format!("expected 6 values, got {}", parts.len()),
            ));
        }
        inertial.fullinertia = Some([parts[0], parts[1], parts[2], parts[3], parts[4], parts[5]]);
    }
    if inertial.diaginertia.is_none() && inertial.fullinertia.is_none() {
        return Err(MjcfError::missing_attribute("diaginertia", context()));
    }

    Ok(inertial)
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get an optional attribute value.
pub(crate) fn get_attribute_opt(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

/// Parse a space-separated vector3 string; exactly three values.
pub(crate) fn parse_vector3(s: &str) -> Result<Vector3<f64>> {
    let parts = parse_float_array(s)?;

    if parts.len() != 3 {
        return Err(MjcfError::XmlParse(format!(
            "expected 3 values in vector, got {}: {s}",
            parts.len()
        )));
    }

    Ok(Vector3::new(parts[0], parts[1], parts[2]))
}

/// Parse a space-separated vector4 string; exactly four values.
fn parse_vector4(s: &str) -> Result<Vector4<f64>> {
    let parts = parse_float_array(s)?;

    if parts.len() != 4 {
        return Err(MjcfError::XmlParse(format!(
            "expected 4 values in vector, got {}: {s}",
            parts.len()
        )));
    }

    Ok(Vector4::new(parts[0], parts[1], parts[2], parts[3]))
}

/// Parse a space-separated array of floats.
fn parse_float_array(s: &str) -> Result<Vec<f64>> {
    s.split_whitespace()
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| MjcfError::XmlParse(format!("invalid float: {p}")))
        })
        .collect()
}

/// Skip an element and all its children.
pub(crate) fn skip_element<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => {
                depth += 1;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => {
                return Err(MjcfError::XmlParse(format!(
                    "unexpected EOF in {}",
                    String::from_utf8_lossy(name)
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(())
}
