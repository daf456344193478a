//! # Codec Errors
//!
//! Every decode failure is fatal to the call that raised it and names the
//! shape and field it happened in, so that a caller can point at the offending
//! input without re-parsing it. Encoding can only fail on the output sink.

use atrius_fhirpath_support::evaluation_error::EvaluationError;
use thiserror::Error;

/// Errors raised while decoding or encoding FHIR content.
#[derive(Debug, Error)]
pub enum FhirError {
    /// A primitive literal does not match the syntax of its declared kind.
    ///
    /// Raised for `"active": "yes"` on a boolean slot, a `birthDate` of
    /// `"2023-13-01"`, a JSON `null` in a single-valued primitive and the like.
    #[error("Malformed {kind} in {shape}.{field}: {found}")]
    MalformedPrimitive {
        shape: String,
        field: String,
        kind: &'static str,
        found: String,
    },

    /// The `_name` metadata of a primitive is not an object carrying an id or
    /// extensions.
    #[error("Malformed metadata for {shape}.{field}: expected an id or extension, found {found}")]
    MalformedMetadata {
        shape: String,
        field: String,
        found: String,
    },

    /// A key or element that the shape does not declare.
    #[error("Unknown field '{field}' in {shape}")]
    UnknownField { shape: String, field: String },

    /// A discriminator that is not in the resource registry.
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// More than one variant of a choice field is present.
    #[error("Conflicting variants for {shape}.{base}[x]: found both '{first}' and '{second}'")]
    ConflictingVariant {
        shape: String,
        base: String,
        first: String,
        second: String,
    },

    /// The structure of the input does not match the shape, e.g. a string
    /// where an object was declared.
    #[error("Unexpected token in {shape}.{field}: expected {expected}, found {found}")]
    UnexpectedToken {
        shape: String,
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A required field or attribute is absent.
    #[error("Missing required field {shape}.{field}")]
    MissingField { shape: String, field: String },

    /// A coercion requested through the reflection façade failed.
    #[error("{0}")]
    NotConvertible(#[from] EvaluationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FhirError>;

impl FhirError {
    pub(crate) fn unknown_field(shape: &str, field: &str) -> Self {
        FhirError::UnknownField {
            shape: shape.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn missing_field(shape: &str, field: &str) -> Self {
        FhirError::MissingField {
            shape: shape.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn unexpected(
        shape: &str,
        field: &str,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        FhirError::UnexpectedToken {
            shape: shape.to_string(),
            field: field.to_string(),
            expected,
            found: found.into(),
        }
    }

    pub(crate) fn malformed(
        shape: &str,
        field: &str,
        kind: &'static str,
        found: impl Into<String>,
    ) -> Self {
        FhirError::MalformedPrimitive {
            shape: shape.to_string(),
            field: field.to_string(),
            kind,
            found: found.into(),
        }
    }

    pub(crate) fn conflicting(shape: &str, base: &str, first: &str, second: &str) -> Self {
        FhirError::ConflictingVariant {
            shape: shape.to_string(),
            base: base.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}
