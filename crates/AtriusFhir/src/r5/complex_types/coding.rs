use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Boolean, Code, FhirString, Uri};

/// FHIR Coding type
///
/// A reference to a code defined by a terminology system.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Coding](http://hl7.org/fhir/StructureDefinition/Coding)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Coding {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Identity of the terminology system
    pub system: Option<Uri>,
    /// Version of the system - if relevant
    pub version: Option<FhirString>,
    /// Symbol in syntax defined by the system
    pub code: Option<Code>,
    /// Representation defined by the system
    pub display: Option<FhirString>,
    /// If this coding was chosen directly by the user
    pub user_selected: Option<Boolean>,
}

impl Coding {
    /// A coding with only `system` and `code` set.
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(Uri::new(system.into())),
            code: Some(Code::new(code.into())),
            ..Default::default()
        }
    }
}
