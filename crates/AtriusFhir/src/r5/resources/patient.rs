use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{Boolean, Code, Date, DateTime, Id, Integer, Uri};
use crate::r5::{Attachment, HumanName, Identifier, Meta, Reference, Resource};

/// FHIR Patient resource
///
/// Demographics and other administrative information about an individual or
/// animal receiving care or other health-related services.
///
/// ## Type: Resource type
/// Base type: DomainResource
///
/// See: [Patient](http://hl7.org/fhir/StructureDefinition/Patient)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
#[fhir_resource(choice_elements = "deceased,multipleBirth")]
pub struct Patient {
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
    /// An identifier for this patient
    pub identifier: Vec<Identifier>,
    /// Whether this patient's record is in active use
    pub active: Option<Boolean>,
    /// A name associated with the patient
    pub name: Vec<HumanName>,
    /// male | female | other | unknown
    pub gender: Option<Code>,
    /// The date of birth for the individual
    pub birth_date: Option<Date>,
    /// Indicates if the individual is deceased or not
    #[fhir_serde(flatten)]
    pub deceased: Option<PatientDeceased>,
    /// Whether patient is part of a multiple birth
    #[fhir_serde(flatten)]
    pub multiple_birth: Option<PatientMultipleBirth>,
    /// Image of the patient
    pub photo: Vec<Attachment>,
    /// Patient's nominated primary care provider
    pub general_practitioner: Vec<Reference>,
    /// Organization that is the custodian of the patient record
    pub managing_organization: Option<Reference>,
}

/// Choice of types for the deceased[x] field in Patient
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "deceased")]
pub enum PatientDeceased {
    #[fhir_serde(rename = "deceasedBoolean")]
    Boolean(Boolean),
    #[fhir_serde(rename = "deceasedDateTime")]
    DateTime(DateTime),
}

/// Choice of types for the multipleBirth[x] field in Patient
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "multipleBirth")]
pub enum PatientMultipleBirth {
    #[fhir_serde(rename = "multipleBirthBoolean")]
    Boolean(Boolean),
    #[fhir_serde(rename = "multipleBirthInteger")]
    Integer(Integer),
}
