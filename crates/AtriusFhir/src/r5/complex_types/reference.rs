use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{FhirString, Uri};
use crate::r5::Identifier;

/// FHIR Reference type
///
/// A reference from one resource to another.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Reference](http://hl7.org/fhir/StructureDefinition/Reference)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Reference {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Literal reference, Relative, internal or absolute URL
    pub reference: Option<FhirString>,
    /// Type the reference refers to (e.g. "Patient")
    #[fhir_serde(rename = "type")]
    pub r#type: Option<Uri>,
    /// Logical reference, when literal reference is not known
    pub identifier: Option<Box<Identifier>>,
    /// Text alternative for the resource
    pub display: Option<FhirString>,
}

impl Reference {
    /// A literal reference such as `Patient/123` or `#contained-id`.
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(FhirString::new(reference.into())),
            ..Default::default()
        }
    }
}
