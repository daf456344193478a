use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Code, FhirString, Uri};
use crate::r5::{CodeableConcept, Period, Reference};

/// FHIR Identifier type
///
/// An identifier - identifies some entity uniquely and unambiguously.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Identifier](http://hl7.org/fhir/StructureDefinition/Identifier)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Identifier {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// usual | official | temp | secondary | old (If known)
    #[fhir_serde(rename = "use")]
    pub r#use: Option<Code>,
    /// Description of identifier
    #[fhir_serde(rename = "type")]
    pub r#type: Option<CodeableConcept>,
    /// The namespace for the identifier value
    pub system: Option<Uri>,
    /// The value that is unique
    pub value: Option<FhirString>,
    /// Time period when id is/was valid for use
    pub period: Option<Period>,
    /// Organization that issued id (may be just text)
    pub assigner: Option<Box<Reference>>,
}
