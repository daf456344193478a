use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Canonical, Id, Instant, Uri};
use crate::r5::Coding;

/// FHIR Meta type
///
/// The metadata about a resource.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Meta](http://hl7.org/fhir/StructureDefinition/Meta)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Meta {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Version specific identifier
    pub version_id: Option<Id>,
    /// When the resource version last changed
    pub last_updated: Option<Instant>,
    /// Identifies where the resource comes from
    pub source: Option<Uri>,
    /// Profiles this resource claims to conform to
    pub profile: Vec<Canonical>,
    /// Security Labels applied to this resource
    pub security: Vec<Coding>,
    /// Tags applied to this resource
    pub tag: Vec<Coding>,
}
