//! Contact-point settings reader.
//!
//! The settings document nests one list element inside the root; each child
//! of the list describes one point:
//!
//! ```xml
//! <settings>
//!   <points>
//!     <point name="right_heel">
//!       <location>0.0 -0.02 0.0</location>
//!       <frame>calcn_r</frame>
//!     </point>
//!   </points>
//! </settings>
//! ```
//!
//! Element names of the root, list and point level are not checked; only
//! the nesting matters.

use std::path::Path;

use jointspace_types::{first_duplicate_name, first_invalid_name, ContactPointSpec};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{MjcfError, Result};
use crate::parser::{get_attribute_opt, parse_vector3, skip_element};

/// Parse a point-settings document.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the list is missing or empty,
/// a point lacks its `name`, `<location>` or `<frame>`, a `<location>` does
/// not hold exactly three numbers, a name cannot be used as an output file
/// name, or two points share a name.
pub fn load_points(xml: &str) -> Result<Vec<ContactPointSpec>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut list_seen = false;
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match depth {
                    1 => {}
                    2 if !list_seen => list_seen = true,
                    3 => {
                        points.push(parse_point(&mut reader, &e)?);
                        depth -= 1;
                    }
                    _ => {
                        let name = e.name().as_ref().to_vec();
                        skip_element(&mut reader, &name)?;
                        depth -= 1;
                    }
                }
            }
            Ok(Event::Empty(e)) => match depth {
                0 => break,
                1 if !list_seen => list_seen = true,
                2 => return Err(incomplete_point(&e, "location")),
                _ => {}
            },
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => {
                if depth > 0 {
                    return Err(MjcfError::XmlParse("unexpected EOF in settings".into()));
                }
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
    }

    if points.is_empty() {
        return Err(MjcfError::missing_element("point", "point settings"));
    }
    if let Some(name) = first_invalid_name(&points) {
        return Err(MjcfError::invalid_attribute(
            "name",
            "point",
            format!("'{name}' cannot be used as an output file name"),
        ));
    }
    if let Some(name) = first_duplicate_name(&points) {
        return Err(MjcfError::DuplicatePoint(name.to_string()));
    }
    debug!(count = points.len(), "parsed point settings");
    Ok(points)
}

/// Read and parse a point-settings file.
///
/// # Errors
///
/// Returns [`MjcfError::Io`] if the file cannot be read, or any error of
/// [`load_points`].
pub fn load_points_from_file(path: impl AsRef<Path>) -> Result<Vec<ContactPointSpec>> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| MjcfError::io(path, e))?;
    load_points(&xml)
}

fn point_context(e: &BytesStart) -> String {
    match get_attribute_opt(e, "name") {
        Some(name) => format!("point '{name}'"),
        None => "point".to_string(),
    }
}

fn incomplete_point(e: &BytesStart, missing: &'static str) -> MjcfError {
    if get_attribute_opt(e, "name").is_none() {
        return MjcfError::missing_attribute("name", "point");
    }
    MjcfError::missing_element(missing, point_context(e))
}

/// Parse one point element; the reader is positioned just after its start.
fn parse_point(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<ContactPointSpec> {
    let name = get_attribute_opt(start, "name")
        .ok_or_else(|| MjcfError::missing_attribute("name", "point"))?;
    let context = format!("point '{name}'");
    let mut location = None;
    let mut frame = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"location" => {
                        let text = reader
                            .read_text(QName(b"location"))
                            .map_err(|e| MjcfError::XmlParse(e.to_string()))?;
                        location = Some(parse_vector3(&text).map_err(|_| {
                            MjcfError::invalid_attribute(
                                "location",
                                context.clone(),
                                format!("expected three numbers, got '{}'", text.trim()),
                            )
                        })?);
                    }
                    b"frame" => {
                        let text = reader
                            .read_text(QName(b"frame"))
                            .map_err(|e| MjcfError::XmlParse(e.to_string()))?;
                        frame = Some(text.trim().to_string());
                    }
                    _ => skip_element(reader, &elem_name)?,
                }
            }
            Ok(Event::End(e)) if e.name() == start.name() => break,
            Ok(Event::Eof) => {
                return Err(MjcfError::XmlParse(format!("unexpected EOF in {context}")));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::XmlParse(e.to_string())),
        }
    }

    let point = location.ok_or_else(|| MjcfError::missing_element("location", context.clone()))?;
    let frame = frame
        .filter(|f| !f.is_empty())
        .ok_or_else(|| MjcfError::missing_element("frame", context))?;
    Ok(ContactPointSpec::new(point, frame, name))
}
