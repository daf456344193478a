use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{DateTime, FhirString, Markdown};
use crate::r5::Reference;

/// FHIR Annotation type
///
/// A text note which also contains information about who made the statement
/// and when.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Annotation](http://hl7.org/fhir/StructureDefinition/Annotation)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Annotation {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Individual responsible for the annotation
    #[fhir_serde(flatten)]
    pub author: Option<AnnotationAuthor>,
    /// When the annotation was made
    pub time: Option<DateTime>,
    /// The annotation - text content (as markdown)
    pub text: Option<Markdown>,
}

/// Choice of types for the author[x] field in Annotation
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "author")]
pub enum AnnotationAuthor {
    #[fhir_serde(rename = "authorReference")]
    Reference(Reference),
    #[fhir_serde(rename = "authorString")]
    String(FhirString),
}
