use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::FhirString;
use crate::r5::Coding;

/// FHIR CodeableConcept type
///
/// A concept that may be defined by a formal reference to a terminology or
/// ontology or may be provided by text.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [CodeableConcept](http://hl7.org/fhir/StructureDefinition/CodeableConcept)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct CodeableConcept {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Code defined by a terminology system
    pub coding: Vec<Coding>,
    /// Plain text representation of the concept
    pub text: Option<FhirString>,
}
