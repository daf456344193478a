//! # Extensions
//!
//! Every element of every shape may carry a list of [`Extension`]s: a URL that
//! names the meaning, a value of one of many types and, recursively, further
//! extensions. The list keeps input order, so extensions sharing a URL keep
//! their relative order through a round trip.

use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::primitives::{
    Base64Binary, Boolean, Canonical, Code, Date, DateTime, Decimal, FhirString, Id, Instant,
    Integer, Integer64, Markdown, Oid, PositiveInt, Time, UnsignedInt, Uri, Url, Uuid,
};
use crate::r5::{
    Annotation, Attachment, CodeableConcept, Coding, HumanName, Identifier, Period, Quantity,
    Reference,
};

/// FHIR Extension type
///
/// Optional Extension Element - found in all resources.
///
/// ## Type: Complex type
/// Base type: Element
///
/// See: [Extension](http://hl7.org/fhir/StructureDefinition/Extension)
///
/// # Examples
///
/// ```rust
/// use atrius_fhir_lib::{Code, Extension, ExtensionValue};
/// use atrius_fhir_lib::json::to_json_string;
///
/// let reason = Extension::new(
///     "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
///     Some(ExtensionValue::Code(Code::new("unknown".to_string()))),
/// );
/// assert_eq!(
///     to_json_string(&reason).unwrap(),
///     r#"{"url":"http://hl7.org/fhir/StructureDefinition/data-absent-reason","valueCode":"unknown"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
pub struct Extension {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// identifies the meaning of the extension
    pub url: String,
    /// Value of extension
    #[fhir_serde(flatten)]
    pub value: Option<ExtensionValue>,
}

/// Choice of types for the value[x] field in Extension
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
#[fhir_choice_element(base_name = "value")]
pub enum ExtensionValue {
    #[fhir_serde(rename = "valueBase64Binary")]
    Base64Binary(Base64Binary),
    #[fhir_serde(rename = "valueBoolean")]
    Boolean(Boolean),
    #[fhir_serde(rename = "valueCanonical")]
    Canonical(Canonical),
    #[fhir_serde(rename = "valueCode")]
    Code(Code),
    #[fhir_serde(rename = "valueDate")]
    Date(Date),
    #[fhir_serde(rename = "valueDateTime")]
    DateTime(DateTime),
    #[fhir_serde(rename = "valueDecimal")]
    Decimal(Decimal),
    #[fhir_serde(rename = "valueId")]
    Id(Id),
    #[fhir_serde(rename = "valueInstant")]
    Instant(Instant),
    #[fhir_serde(rename = "valueInteger")]
    Integer(Integer),
    #[fhir_serde(rename = "valueInteger64")]
    Integer64(Integer64),
    #[fhir_serde(rename = "valueMarkdown")]
    Markdown(Markdown),
    #[fhir_serde(rename = "valueOid")]
    Oid(Oid),
    #[fhir_serde(rename = "valuePositiveInt")]
    PositiveInt(PositiveInt),
    #[fhir_serde(rename = "valueString")]
    String(FhirString),
    #[fhir_serde(rename = "valueTime")]
    Time(Time),
    #[fhir_serde(rename = "valueUnsignedInt")]
    UnsignedInt(UnsignedInt),
    #[fhir_serde(rename = "valueUri")]
    Uri(Uri),
    #[fhir_serde(rename = "valueUrl")]
    Url(Url),
    #[fhir_serde(rename = "valueUuid")]
    Uuid(Uuid),
    #[fhir_serde(rename = "valueAnnotation")]
    Annotation(Annotation),
    #[fhir_serde(rename = "valueAttachment")]
    Attachment(Attachment),
    #[fhir_serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[fhir_serde(rename = "valueCoding")]
    Coding(Coding),
    #[fhir_serde(rename = "valueHumanName")]
    HumanName(HumanName),
    #[fhir_serde(rename = "valueIdentifier")]
    Identifier(Identifier),
    #[fhir_serde(rename = "valuePeriod")]
    Period(Period),
    #[fhir_serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[fhir_serde(rename = "valueReference")]
    Reference(Reference),
}

impl Extension {
    pub fn new(url: impl Into<String>, value: Option<ExtensionValue>) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            url: url.into(),
            value,
        }
    }

    /// Adds a nested extension.
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }
}

/// The first extension in `extensions` with the given `url`.
pub fn find_extension<'a>(extensions: &'a [Extension], url: &str) -> Option<&'a Extension> {
    extensions.iter().find(|ext| ext.url == url)
}

/// Every extension in `extensions` with the given `url`, in list order.
pub fn extensions_by_url<'a>(extensions: &'a [Extension], url: &str) -> Vec<&'a Extension> {
    extensions.iter().filter(|ext| ext.url == url).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirError;
    use crate::json::{from_json_value, to_json_value};
    use crate::xml::{FhirXml, XmlWriter};
    use atrius_fhirpath_support::{ChoiceElement, FhirNode};
    use serde_json::json;

    const DAR: &str = "http://hl7.org/fhir/StructureDefinition/data-absent-reason";

    #[test]
    fn test_nested_extension_round_trip() {
        let input = json!({
            "url": "http://example.org/outer",
            "extension": [
                {"url": "http://example.org/inner", "valueBoolean": true},
                {"url": "http://example.org/inner", "valueString": "second"}
            ]
        });
        let ext: Extension = from_json_value(input.clone()).unwrap();
        assert_eq!(ext.extension.len(), 2);
        assert!(ext.value.is_none());
        assert_eq!(to_json_value(&ext), json!({
            "extension": [
                {"url": "http://example.org/inner", "valueBoolean": true},
                {"url": "http://example.org/inner", "valueString": "second"}
            ],
            "url": "http://example.org/outer"
        }));

        let inner = extensions_by_url(&ext.extension, "http://example.org/inner");
        assert_eq!(inner.len(), 2);
        assert_eq!(
            inner[1].value.as_ref().map(|v| v.field_name()),
            Some("valueString")
        );
    }

    #[test]
    fn test_missing_url_is_missing_field() {
        let err = from_json_value::<Extension>(json!({"valueCode": "unknown"})).unwrap_err();
        assert!(matches!(err, FhirError::MissingField { ref field, .. } if field == "url"));
    }

    #[test]
    fn test_two_values_conflict() {
        let err = from_json_value::<Extension>(json!({
            "url": DAR,
            "valueCode": "unknown",
            "valueString": "unknown"
        }))
        .unwrap_err();
        match err {
            FhirError::ConflictingVariant { shape, base, first, second } => {
                assert_eq!(shape, "Extension");
                assert_eq!(base, "value");
                assert_eq!(first, "valueCode");
                assert_eq!(second, "valueString");
            }
            other => panic!("expected ConflictingVariant, got {:?}", other),
        }
    }

    #[test]
    fn test_primitive_value_metadata_merges() {
        let ext: Extension = from_json_value(json!({
            "_valueCode": {"id": "c1"},
            "url": DAR,
            "valueCode": "masked"
        }))
        .unwrap();
        match ext.value {
            Some(ExtensionValue::Code(ref code)) => {
                assert_eq!(code.value.as_deref(), Some("masked"));
                assert_eq!(code.id.as_deref(), Some("c1"));
            }
            ref other => panic!("expected a code value, got {:?}", other),
        }
    }

    #[test]
    fn test_find_extension() {
        let list = vec![
            Extension::new("http://example.org/a", None),
            Extension::new(DAR, Some(ExtensionValue::Code(Code::new("asked-unknown".to_string())))),
        ];
        assert_eq!(find_extension(&list, DAR).map(|e| e.url.as_str()), Some(DAR));
        assert!(find_extension(&list, "http://example.org/none").is_none());
    }

    #[test]
    fn test_xml_url_is_attribute() {
        let ext = Extension::new(DAR, Some(ExtensionValue::Code(Code::new("unknown".to_string()))))
            .with_extension(Extension::new("http://example.org/n", None));
        let mut writer = XmlWriter::new(Vec::new());
        ext.write_xml(&mut writer, "extension").unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            xml,
            format!(
                r#"<extension xmlns="http://hl7.org/fhir" url="{}"><extension url="http://example.org/n"/><valueCode value="unknown"/></extension>"#,
                DAR
            )
        );
    }

    #[test]
    fn test_reflection_reports_base_name() {
        let ext = Extension::new(DAR, Some(ExtensionValue::Code(Code::new("unknown".to_string()))));
        let names: Vec<_> = ext.children(None).iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["url", "value"]);
        let value = ext.children(Some(&["value"]))[0].node;
        assert_eq!(value.type_info().name, "code");
        assert_eq!(ExtensionValue::base_name(), "value");
        assert!(ExtensionValue::possible_field_names().contains(&"valueQuantity"));

        let descriptor = ext.type_descriptor();
        let value_element = descriptor.element("value").unwrap();
        assert!(value_element.is_choice);
        assert!(value_element.types.contains(&"Quantity"));
        assert_eq!(descriptor.element("url").unwrap().cardinality(), "1..1");
    }
}
