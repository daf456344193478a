use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Boolean, Code, DateTime, FhirString, Id, Instant, Integer, Time, Uri};
use crate::r5::{Annotation, CodeableConcept, Identifier, Meta, Period, Quantity, Reference, Resource};

/// FHIR Observation resource
///
/// Measurements and simple assertions made about a patient, device or other
/// subject.
///
/// ## Type: Resource type
/// Base type: DomainResource
///
/// See: [Observation](http://hl7.org/fhir/StructureDefinition/Observation)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
#[fhir_resource]
pub struct Observation {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub contained: Vec<Resource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    /// Business Identifier for observation
    pub identifier: Vec<Identifier>,
    /// Fulfills plan, proposal or order
    pub based_on: Vec<Reference>,
    /// registered | preliminary | final | amended +
    pub status: Option<Code>,
    /// Classification of  type of observation
    pub category: Vec<CodeableConcept>,
    /// Type of observation (code / type)
    pub code: Option<CodeableConcept>,
    /// Who and/or what the observation is about
    pub subject: Option<Reference>,
    /// Healthcare event during which this observation is made
    pub encounter: Option<Reference>,
    /// Clinically relevant time/time-period for observation
    #[fhir_serde(flatten)]
    pub effective: Option<ObservationEffective>,
    /// Date/Time this version was made available
    pub issued: Option<Instant>,
    /// Who is responsible for the observation
    pub performer: Vec<Reference>,
    /// Actual result
    #[fhir_serde(flatten)]
    pub value: Option<ObservationValue>,
    /// Why the result is missing
    pub data_absent_reason: Option<CodeableConcept>,
    /// High, low, normal, etc
    pub interpretation: Vec<CodeableConcept>,
    /// Comments about the observation
    pub note: Vec<Annotation>,
}

/// Choice of types for the effective[x] field in Observation
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "effective")]
pub enum ObservationEffective {
    #[fhir_serde(rename = "effectiveDateTime")]
    DateTime(DateTime),
    #[fhir_serde(rename = "effectivePeriod")]
    Period(Period),
    #[fhir_serde(rename = "effectiveInstant")]
    Instant(Instant),
}

/// Choice of types for the value[x] field in Observation
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "value")]
pub enum ObservationValue {
    #[fhir_serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[fhir_serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[fhir_serde(rename = "valueString")]
    String(FhirString),
    #[fhir_serde(rename = "valueBoolean")]
    Boolean(Boolean),
    #[fhir_serde(rename = "valueInteger")]
    Integer(Integer),
    #[fhir_serde(rename = "valueTime")]
    Time(Time),
    #[fhir_serde(rename = "valueDateTime")]
    DateTime(DateTime),
    #[fhir_serde(rename = "valuePeriod")]
    Period(Period),
}
