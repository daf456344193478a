use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Code, FhirString};
use crate::r5::Period;

/// FHIR HumanName type
///
/// A name, normally of a human, that can be used for other living entities
/// that have also been named by humans and may need to use name
/// representation in the same manner.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [HumanName](http://hl7.org/fhir/StructureDefinition/HumanName)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct HumanName {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// usual | official | temp | nickname | anonymous | old | maiden
    #[fhir_serde(rename = "use")]
    pub r#use: Option<Code>,
    /// Text representation of the full name
    pub text: Option<FhirString>,
    /// Family name (often called 'Surname')
    pub family: Option<FhirString>,
    /// Given names (not always 'first'). Includes middle names
    pub given: Vec<FhirString>,
    /// Parts that come before the name
    pub prefix: Vec<FhirString>,
    /// Parts that come after the name
    pub suffix: Vec<FhirString>,
    /// Time period when name was/is in use
    pub period: Option<Period>,
}
