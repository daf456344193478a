use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::r5::{BodyStructure, Citation, Observation, Patient};

/// Any resource of the model.
///
/// Used for `contained` lists and for documents whose type is only known
/// once they are read. Decoding dispatches on `resourceType` (JSON) or the
/// element name (XML) through [`crate::registry`].
///
/// ```rust
/// use atrius_fhir_lib::json::from_json_str;
/// use atrius_fhir_lib::r5::Resource;
///
/// let resource: Resource = from_json_str(r#"{"resourceType":"Patient","id":"p1"}"#).unwrap();
/// assert_eq!(resource.resource_type(), "Patient");
/// assert_eq!(resource.id(), Some("p1"));
/// ```
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_registry]
pub enum Resource {
    BodyStructure(Box<BodyStructure>),
    Citation(Box<Citation>),
    Observation(Box<Observation>),
    Patient(Box<Patient>),
}
