//! Error types for MJCF and point-settings loading.

use std::path::PathBuf;

use jointspace_types::DynamicsError;
use thiserror::Error;

/// Errors that can occur during MJCF parsing and loading.
#[derive(Debug, Error)]
pub enum MjcfError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Missing required element.
    #[error("missing required element: {element} in {context}")]
    MissingElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute: {attribute} on {element}")]
    MissingAttribute {
        /// The missing attribute name.
        attribute: &'static str,
        /// The element that should have the attribute.
        element: String,
    },

    /// Invalid attribute value.
    #[error("invalid value for {attribute} on {element}: {message}")]
    InvalidAttribute {
        /// The attribute with the invalid value.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Unknown joint type.
    #[error("unknown joint type: {0}")]
    UnknownJointType(String),

    /// Duplicate body name.
    #[error("duplicate body name: {0}")]
    DuplicateBody(String),

    /// Duplicate joint name.
    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// Invalid inertia (negative or non-finite principal moments).
    #[error("invalid inertia tensor for body {body_name}: {message}")]
    InvalidInertia {
        /// The body with invalid inertia.
        body_name: String,
        /// Description of why the inertia is invalid.
        message: String,
    },

    /// Negative or non-finite mass.
    #[error("invalid mass for body {body_name}: {mass}")]
    InvalidMass {
        /// The body with invalid mass.
        body_name: String,
        /// The invalid mass value.
        mass: f64,
    },

    /// Two points in a settings file share an output name.
    #[error("duplicate point name: {0}")]
    DuplicatePoint(String),

    /// File could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Unsupported feature.
    #[error("unsupported MJCF feature: {0}")]
    Unsupported(String),

    /// The assembled model failed structural validation.
    #[error("invalid model: {0}")]
    InvalidModel(#[from] DynamicsError),
}

/// Result type for MJCF operations.
pub type Result<T> = std::result::Result<T, MjcfError>;

impl MjcfError {
    /// Create a missing element error.
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(attribute: &'static str, element: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute,
            element: element.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(
        attribute: &'static str,
        element: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            attribute,
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create an invalid inertia error.
    pub fn invalid_inertia(body_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInertia {
            body_name: body_name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid mass error.
    pub fn invalid_mass(body_name: impl Into<String>, mass: f64) -> Self {
        Self::InvalidMass {
            body_name: body_name.into(),
            mass,
        }
    }

    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
