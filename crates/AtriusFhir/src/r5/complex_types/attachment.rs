use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::primitives::{
    Base64Binary, Code, DateTime, Decimal, FhirString, Integer64, PositiveInt, Url,
};

/// FHIR Attachment type
///
/// For referring to data content defined in other formats.
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Attachment](http://hl7.org/fhir/StructureDefinition/Attachment)
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Attachment {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    /// Mime type of the content, with charset etc.
    pub content_type: Option<Code>,
    /// Human language of the content (BCP-47)
    pub language: Option<Code>,
    /// Data inline, base64ed
    pub data: Option<Base64Binary>,
    /// Uri where the data can be found
    pub url: Option<Url>,
    /// Number of bytes of content (if url provided)
    pub size: Option<Integer64>,
    /// Hash of the data (sha-1, base64ed)
    pub hash: Option<Base64Binary>,
    /// Label to display in place of the data
    pub title: Option<FhirString>,
    /// Date attachment was first created
    pub creation: Option<DateTime>,
    pub height: Option<PositiveInt>,
    pub width: Option<PositiveInt>,
    pub frames: Option<PositiveInt>,
    /// Length in seconds (audio / video)
    pub duration: Option<Decimal>,
    pub pages: Option<PositiveInt>,
}
