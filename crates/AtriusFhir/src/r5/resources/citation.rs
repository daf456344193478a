use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Boolean, Code, Date, DateTime, FhirString, Id, Markdown, Uri};
use crate::r5::{CodeableConcept, Coding, Identifier, Meta, Period, Resource};

/// FHIR Citation resource
///
/// The Citation Resource enables reference to any knowledge artifact for
/// purposes of identification and attribution.
///
/// ## Type: Resource type
/// Base type: DomainResource
///
/// See: [Citation](http://hl7.org/fhir/StructureDefinition/Citation)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
#[fhir_resource(choice_elements = "versionAlgorithm")]
pub struct Citation {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub contained: Vec<Resource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    /// Canonical identifier for this citation record, represented as a globally unique URI
    pub url: Option<Uri>,
    /// Identifier for the citation record itself
    pub identifier: Vec<Identifier>,
    /// Business version of the citation record
    pub version: Option<FhirString>,
    /// How to compare versions
    #[fhir_serde(flatten)]
    pub version_algorithm: Option<CitationVersionAlgorithm>,
    /// Name for this citation record (computer friendly)
    pub name: Option<FhirString>,
    /// Name for this citation record (human friendly)
    pub title: Option<FhirString>,
    /// draft | active | retired | unknown
    pub status: Option<Code>,
    /// For testing purposes, not real usage
    pub experimental: Option<Boolean>,
    /// Date last changed
    pub date: Option<DateTime>,
    /// The publisher of the citation record, not the publisher of the article or artifact being cited
    pub publisher: Option<FhirString>,
    /// Natural language description of the citation
    pub description: Option<Markdown>,
    /// The context that the citation record content is intended to support
    pub jurisdiction: Vec<CodeableConcept>,
    /// Why this citation is defined
    pub purpose: Option<Markdown>,
    /// Use and/or publishing restrictions for the citation record, not for the cited artifact
    pub copyright: Option<Markdown>,
    /// When the citation record was approved by publisher
    pub approval_date: Option<Date>,
    /// When the citation record was last reviewed by the publisher
    pub last_review_date: Option<Date>,
    /// When the citation record is expected to be used
    pub effective_period: Option<Period>,
    /// The status of the citation record
    pub current_state: Vec<CodeableConcept>,
}

/// Choice of types for the versionAlgorithm[x] field in Citation
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "versionAlgorithm")]
pub enum CitationVersionAlgorithm {
    /// Variant accepting the String type.
    #[fhir_serde(rename = "versionAlgorithmString")]
    String(FhirString),
    /// Variant accepting the Coding type.
    #[fhir_serde(rename = "versionAlgorithmCoding")]
    Coding(Coding),
}
