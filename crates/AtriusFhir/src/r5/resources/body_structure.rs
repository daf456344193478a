use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Boolean, Code, Id, Markdown, Uri};
use crate::r5::{Attachment, CodeableConcept, Identifier, Meta, Reference, Resource};

/// FHIR BodyStructure resource
///
/// Record details about an anatomical structure. This resource may be used
/// when a coded concept does not provide the necessary detail needed for the
/// use case.
///
/// ## Type: Resource type
/// Base type: DomainResource
///
/// See: [BodyStructure](http://hl7.org/fhir/StructureDefinition/BodyStructure)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
#[fhir_resource]
pub struct BodyStructure {
    /// Logical id of this artifact
    pub id: Option<Id>,
    /// Metadata about the resource
    pub meta: Option<Meta>,
    /// A set of rules under which this content was created
    pub implicit_rules: Option<Uri>,
    /// Language of the resource content
    pub language: Option<Code>,
    /// Contained, inline Resources
    pub contained: Vec<Resource>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Extensions that cannot be ignored
    pub modifier_extension: Vec<Extension>,
    /// Bodystructure identifier
    pub identifier: Vec<Identifier>,
    /// Whether this record is in active use
    pub active: Option<Boolean>,
    /// Kind of Structure
    pub morphology: Option<CodeableConcept>,
    /// Included anatomic location(s)
    pub included_structure: Vec<BodyStructureIncludedStructure>,
    /// Excluded anatomic locations(s)
    pub excluded_structure: Vec<BodyStructureIncludedStructure>,
    /// Text description
    pub description: Option<Markdown>,
    /// Attached images
    pub image: Vec<Attachment>,
    /// Who this is about
    pub patient: Option<Reference>,
}

/// BodyStructure.includedStructure: Included anatomic location(s)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
#[type_info(namespace = "FHIR", name = "BackboneElement")]
pub struct BodyStructureIncludedStructure {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    /// Code that represents the included structure
    pub structure: Option<CodeableConcept>,
    /// Code that represents the included structure laterality
    pub laterality: Option<CodeableConcept>,
    /// Code that represents the included structure qualifier
    pub qualifier: Vec<CodeableConcept>,
}
