//! # FHIR Primitive Kinds
//!
//! Every FHIR primitive type is a zero-sized marker implementing
//! [`PrimitiveKind`]. The kind decides how the value part of a primitive slot
//! is read from a JSON literal or from the text of an XML `value` attribute,
//! how it is written back, how it surfaces to FHIRPath and how two values are
//! compared. [`Element<K>`](crate::element::Element) supplies the id and
//! extension halves of the slot and is the same for every kind.
//!
//! Lexical rules follow the regular expressions published with the FHIR
//! specification. Literals are never trimmed or normalized: the text that was
//! read is the text that is written.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::str::FromStr;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::node::normalize_for_equivalence;
use atrius_fhirpath_support::traits::IntoEvaluationResult;
use atrius_fhirpath_support::type_info::TypeDescriptor;
use crate::date_time::{PrecisionDate, PrecisionDateTime, PrecisionInstant, PrecisionTime};
use crate::element::Element;
use crate::precise_decimal::PreciseDecimal;

/// Lexical and semantic rules of one FHIR primitive type.
pub trait PrimitiveKind: Send + Sync + 'static {
    /// Rust representation of a value of this kind.
    type Value: Debug + Clone + PartialEq + Send + Sync + 'static;

    /// FHIR type name, e.g. `dateTime`.
    const FHIR_TYPE: &'static str;

    /// Reads the JSON literal of a value. `None` means the literal is malformed.
    fn from_json(value: &Value) -> Option<Self::Value>;

    fn to_json(value: &Self::Value) -> Value;

    /// Reads the text form used by XML `value` attributes.
    fn parse_literal(text: &str) -> Option<Self::Value>;

    fn to_literal(value: &Self::Value) -> String;

    fn to_evaluation_result(value: &Self::Value) -> EvaluationResult;

    /// FHIRPath `=` on two values; `None` when the answer is unknown.
    fn compare(left: &Self::Value, right: &Self::Value) -> Option<bool> {
        Some(left == right)
    }

    /// FHIRPath `~` on two values.
    fn equivalent(left: &Self::Value, right: &Self::Value) -> bool {
        Self::compare(left, right).unwrap_or(false)
    }

    /// Static descriptor of the primitive type (`id`, `extension`, `value`).
    fn descriptor() -> &'static TypeDescriptor;
}

macro_rules! primitive_descriptor {
    ($fhir:literal, $system:literal) => {{
        use atrius_fhirpath_support::type_info::ElementDescriptor;
        static DESCRIPTOR: TypeDescriptor = TypeDescriptor {
            namespace: "FHIR",
            name: $fhir,
            is_resource: false,
            elements: &[
                ElementDescriptor {
                    name: "id",
                    types: &["string"],
                    min: 0,
                    max: Some(1),
                    is_choice: false,
                },
                ElementDescriptor {
                    name: "extension",
                    types: &["Extension"],
                    min: 0,
                    max: None,
                    is_choice: false,
                },
                ElementDescriptor {
                    name: "value",
                    types: &[$system],
                    min: 0,
                    max: Some(1),
                    is_choice: false,
                },
            ],
        };
        &DESCRIPTOR
    }};
}

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: Lazy<Regex> =
            Lazy::new(|| Regex::new($re).expect(concat!("valid ", stringify!($name), " pattern")));
    };
}

pattern!(STRING, r"^[\s\S]+$");
pattern!(CODE, r"^[^\s]+( [^\s]+)*$");
pattern!(ID, r"^[A-Za-z0-9\-\.]{1,64}$");
pattern!(URI, r"^\S+$");
pattern!(OID, r"^urn:oid:[0-2](\.(0|[1-9][0-9]*))+$");
pattern!(
    UUID,
    r"^urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
);
pattern!(BASE64, r"^(\s*([0-9a-zA-Z\+/=]){4}\s*)+$");
pattern!(INTEGER, r"^(0|[-+]?[1-9][0-9]*)$");
pattern!(
    DECIMAL,
    r"^-?(0|[1-9][0-9]{0,17})(\.[0-9]{1,17})?([eE][+-]?[0-9]{1,9})?$"
);
pattern!(
    DATE,
    r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$"
);
// a time inside a dateTime needs seconds and a zone
pattern!(
    DATE_TIME,
    r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|[+-]((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$"
);
pattern!(
    INSTANT,
    r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|[+-]((0[0-9]|1[0-3]):[0-5][0-9]|14:00))$"
);
pattern!(TIME, r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?$");

/// The text kinds: all carried as `String`, differing only in syntax.
macro_rules! text_kind {
    ($(#[$doc:meta])* $kind:ident, $fhir:literal, $pattern:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $kind;

        impl PrimitiveKind for $kind {
            type Value = String;
            const FHIR_TYPE: &'static str = $fhir;

            fn from_json(value: &Value) -> Option<String> {
                value.as_str().and_then(Self::parse_literal)
            }

            fn to_json(value: &String) -> Value {
                Value::String(value.clone())
            }

            fn parse_literal(text: &str) -> Option<String> {
                $pattern.is_match(text).then(|| text.to_string())
            }

            fn to_literal(value: &String) -> String {
                value.clone()
            }

            fn to_evaluation_result(value: &String) -> EvaluationResult {
                EvaluationResult::fhir_string(value.clone(), $fhir)
            }

            fn equivalent(left: &String, right: &String) -> bool {
                normalize_for_equivalence(left) == normalize_for_equivalence(right)
            }

            fn descriptor() -> &'static TypeDescriptor {
                primitive_descriptor!($fhir, "String")
            }
        }
    };
}

text_kind!(StringKind, "string", STRING);
text_kind!(MarkdownKind, "markdown", STRING);
text_kind!(
    /// A token from a code system: no leading, trailing or doubled spaces.
    CodeKind,
    "code",
    CODE
);
text_kind!(IdKind, "id", ID);
text_kind!(UriKind, "uri", URI);
text_kind!(UrlKind, "url", URI);
text_kind!(CanonicalKind, "canonical", URI);
text_kind!(OidKind, "oid", OID);
text_kind!(UuidKind, "uuid", UUID);
text_kind!(Base64BinaryKind, "base64Binary", BASE64);

/// The 32-bit integer kinds, which only differ in their lower bound.
macro_rules! int_kind {
    ($kind:ident, $fhir:literal, $min:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $kind;

        impl PrimitiveKind for $kind {
            type Value = i32;
            const FHIR_TYPE: &'static str = $fhir;

            fn from_json(value: &Value) -> Option<i32> {
                let n = value.as_i64()?;
                i32::try_from(n).ok().filter(|n| *n >= $min)
            }

            fn to_json(value: &i32) -> Value {
                Value::from(*value)
            }

            fn parse_literal(text: &str) -> Option<i32> {
                if !INTEGER.is_match(text) {
                    return None;
                }
                text.parse::<i32>().ok().filter(|n| *n >= $min)
            }

            fn to_literal(value: &i32) -> String {
                value.to_string()
            }

            fn to_evaluation_result(value: &i32) -> EvaluationResult {
                EvaluationResult::fhir_integer(i64::from(*value), $fhir)
            }

            fn descriptor() -> &'static TypeDescriptor {
                primitive_descriptor!($fhir, "Integer")
            }
        }
    };
}

int_kind!(IntegerKind, "integer", i32::MIN);
int_kind!(PositiveIntKind, "positiveInt", 1);
int_kind!(UnsignedIntKind, "unsignedInt", 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BooleanKind;

impl PrimitiveKind for BooleanKind {
    type Value = bool;
    const FHIR_TYPE: &'static str = "boolean";

    fn from_json(value: &Value) -> Option<bool> {
        value.as_bool()
    }

    fn to_json(value: &bool) -> Value {
        Value::Bool(*value)
    }

    fn parse_literal(text: &str) -> Option<bool> {
        match text {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn to_literal(value: &bool) -> String {
        value.to_string()
    }

    fn to_evaluation_result(value: &bool) -> EvaluationResult {
        EvaluationResult::fhir_boolean(*value)
    }

    fn descriptor() -> &'static TypeDescriptor {
        primitive_descriptor!("boolean", "Boolean")
    }
}

/// 64-bit integers are JSON strings so that they survive JavaScript readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Integer64Kind;

impl PrimitiveKind for Integer64Kind {
    type Value = i64;
    const FHIR_TYPE: &'static str = "integer64";

    fn from_json(value: &Value) -> Option<i64> {
        value.as_str().and_then(Self::parse_literal)
    }

    fn to_json(value: &i64) -> Value {
        Value::String(value.to_string())
    }

    fn parse_literal(text: &str) -> Option<i64> {
        if !INTEGER.is_match(text) {
            return None;
        }
        text.parse().ok()
    }

    fn to_literal(value: &i64) -> String {
        value.to_string()
    }

    fn to_evaluation_result(value: &i64) -> EvaluationResult {
        EvaluationResult::fhir_integer64(*value)
    }

    fn descriptor() -> &'static TypeDescriptor {
        primitive_descriptor!("integer64", "Integer")
    }
}

/// Decimals keep the literal they were read from, so `1.50` is written back
/// as `1.50` and not as `1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecimalKind;

impl PrimitiveKind for DecimalKind {
    type Value = PreciseDecimal;
    const FHIR_TYPE: &'static str = "decimal";

    fn from_json(value: &Value) -> Option<PreciseDecimal> {
        match value {
            Value::Number(n) => Self::parse_literal(&n.to_string()),
            _ => None,
        }
    }

    fn to_json(value: &PreciseDecimal) -> Value {
        match Number::from_str(value.original_string()) {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(value.original_string().to_string()),
        }
    }

    fn parse_literal(text: &str) -> Option<PreciseDecimal> {
        if !DECIMAL.is_match(text) {
            return None;
        }
        PreciseDecimal::parse(text)
    }

    fn to_literal(value: &PreciseDecimal) -> String {
        value.original_string().to_string()
    }

    fn to_evaluation_result(value: &PreciseDecimal) -> EvaluationResult {
        value.to_evaluation_result()
    }

    fn descriptor() -> &'static TypeDescriptor {
        primitive_descriptor!("decimal", "Decimal")
    }
}

/// Temporal kinds: equality between values of different precision is
/// unknown rather than false.
macro_rules! temporal_kind {
    ($kind:ident, $fhir:literal, $system:literal, $value:ty, $pattern:ident, |$l:ident, $r:ident| $cmp:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $kind;

        impl PrimitiveKind for $kind {
            type Value = $value;
            const FHIR_TYPE: &'static str = $fhir;

            fn from_json(value: &Value) -> Option<$value> {
                value.as_str().and_then(Self::parse_literal)
            }

            fn to_json(value: &$value) -> Value {
                Value::String(value.to_string())
            }

            fn parse_literal(text: &str) -> Option<$value> {
                if !$pattern.is_match(text) {
                    return None;
                }
                <$value>::parse(text)
            }

            fn to_literal(value: &$value) -> String {
                value.to_string()
            }

            fn to_evaluation_result(value: &$value) -> EvaluationResult {
                value.to_evaluation_result()
            }

            fn compare($l: &$value, $r: &$value) -> Option<bool> {
                let ordering: Option<Ordering> = $cmp;
                ordering.map(|o| o == Ordering::Equal)
            }

            fn descriptor() -> &'static TypeDescriptor {
                primitive_descriptor!($fhir, $system)
            }
        }
    };
}

temporal_kind!(DateKind, "date", "Date", PrecisionDate, DATE, |l, r| l.compare(r));
temporal_kind!(DateTimeKind, "dateTime", "DateTime", PrecisionDateTime, DATE_TIME, |l, r| l
    .compare(r));
temporal_kind!(InstantKind, "instant", "DateTime", PrecisionInstant, INSTANT, |l, r| l
    .as_datetime()
    .compare(r.as_datetime()));
temporal_kind!(TimeKind, "time", "Time", PrecisionTime, TIME, |l, r| l.compare(r));

pub type Boolean = Element<BooleanKind>;
pub type Integer = Element<IntegerKind>;
pub type PositiveInt = Element<PositiveIntKind>;
pub type UnsignedInt = Element<UnsignedIntKind>;
pub type Integer64 = Element<Integer64Kind>;
pub type Decimal = Element<DecimalKind>;
/// FHIR `string`; named so as not to shadow `std::string::String`.
pub type FhirString = Element<StringKind>;
pub type Markdown = Element<MarkdownKind>;
pub type Code = Element<CodeKind>;
pub type Id = Element<IdKind>;
pub type Uri = Element<UriKind>;
pub type Url = Element<UrlKind>;
pub type Canonical = Element<CanonicalKind>;
pub type Oid = Element<OidKind>;
pub type Uuid = Element<UuidKind>;
pub type Base64Binary = Element<Base64BinaryKind>;
pub type Date = Element<DateKind>;
pub type DateTime = Element<DateTimeKind>;
pub type Instant = Element<InstantKind>;
pub type Time = Element<TimeKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_kinds_reject_empty_and_bad_syntax() {
        assert!(StringKind::parse_literal("").is_none());
        assert_eq!(StringKind::parse_literal(" x ").as_deref(), Some(" x "));
        assert!(CodeKind::parse_literal("final").is_some());
        assert!(CodeKind::parse_literal("two  spaces").is_none());
        assert!(CodeKind::parse_literal(" lead").is_none());
        assert!(IdKind::parse_literal("pat-1.a").is_some());
        assert!(IdKind::parse_literal("has_underscore").is_none());
        assert!(IdKind::parse_literal(&"a".repeat(65)).is_none());
        assert!(UriKind::parse_literal("http://loinc.org").is_some());
        assert!(UriKind::parse_literal("has space").is_none());
        assert!(OidKind::parse_literal("urn:oid:2.16.840.1").is_some());
        assert!(UuidKind::parse_literal("urn:uuid:c757873d-ec9a-4326-a141-556f43239520").is_some());
        assert!(Base64BinaryKind::parse_literal("aGVsbG8=").is_some());
        assert!(Base64BinaryKind::parse_literal("abc").is_none());
    }

    #[test]
    fn test_json_literal_types_are_enforced() {
        assert_eq!(BooleanKind::from_json(&json!(true)), Some(true));
        assert_eq!(BooleanKind::from_json(&json!("true")), None);
        assert_eq!(StringKind::from_json(&json!(12)), None);
        assert_eq!(IntegerKind::from_json(&json!(-3)), Some(-3));
        assert_eq!(IntegerKind::from_json(&json!(1.5)), None);
        assert_eq!(IntegerKind::from_json(&json!(3_000_000_000i64)), None);
        assert_eq!(PositiveIntKind::from_json(&json!(0)), None);
        assert_eq!(UnsignedIntKind::from_json(&json!(0)), Some(0));
        assert_eq!(Integer64Kind::from_json(&json!("9007199254740993")), Some(9007199254740993));
        assert_eq!(Integer64Kind::from_json(&json!(12)), None);
    }

    #[test]
    fn test_xml_literals() {
        assert_eq!(BooleanKind::parse_literal("false"), Some(false));
        assert_eq!(BooleanKind::parse_literal("False"), None);
        assert_eq!(IntegerKind::parse_literal("-12"), Some(-12));
        assert_eq!(IntegerKind::parse_literal("012"), None);
        assert!(DecimalKind::parse_literal("1.50").is_some());
        assert!(DecimalKind::parse_literal("1.").is_none());
        assert!(DecimalKind::parse_literal("abc").is_none());
    }

    #[test]
    fn test_temporal_literals_follow_fhir_syntax() {
        for bad in ["2024-+3", "+202", "202", "2024-3-1", "2024-01-+1", "2024-01-1", "0000"] {
            assert!(DateKind::parse_literal(bad).is_none(), "date {}", bad);
        }
        assert!(DateKind::parse_literal("2024-03").is_some());

        for bad in [
            "2023-03-15T10",
            "2023-03-15T10:30",
            "2023-03-15T10:30:00",
            "2023-03-15T1:2:3Z",
            "2023-03-15T10:30:00+5:00",
            "+2023-03-15",
        ] {
            assert!(DateTimeKind::parse_literal(bad).is_none(), "dateTime {}", bad);
        }
        assert!(DateTimeKind::parse_literal("2023").is_some());
        assert!(DateTimeKind::parse_literal("2023-03-15T10:30:00.123-05:00").is_some());

        for bad in ["10", "10:30", "1:02:03", "10:30:00Z", "+10:30:00"] {
            assert!(TimeKind::parse_literal(bad).is_none(), "time {}", bad);
        }
        assert!(TimeKind::parse_literal("10:30:00.5").is_some());

        assert!(InstantKind::parse_literal("2024-03-01T10:00:00").is_none());
        assert!(InstantKind::parse_literal("2024-03-01T10:00Z").is_none());
    }

    #[test]
    fn test_decimal_json_and_xml_agree() {
        let value: Value = serde_json::from_str("1234567890123456789012").unwrap();
        assert!(DecimalKind::from_json(&value).is_none());
        assert!(DecimalKind::parse_literal("1234567890123456789012").is_none());

        let value: Value = serde_json::from_str("72.50").unwrap();
        let from_json = DecimalKind::from_json(&value).unwrap();
        let from_xml = DecimalKind::parse_literal(&DecimalKind::to_literal(&from_json)).unwrap();
        assert_eq!(from_json, from_xml);
    }

    #[test]
    fn test_decimal_keeps_its_text() {
        let value: Value = serde_json::from_str("1.50").unwrap();
        let decimal = DecimalKind::from_json(&value).unwrap();
        assert_eq!(decimal.original_string(), "1.50");
        assert_eq!(serde_json::to_string(&DecimalKind::to_json(&decimal)).unwrap(), "1.50");
        assert_eq!(DecimalKind::to_literal(&decimal), "1.50");
    }

    #[test]
    fn test_temporal_compare_is_precision_aware() {
        let year = DateKind::parse_literal("2024").unwrap();
        let day = DateKind::parse_literal("2024-03-01").unwrap();
        let same_day = DateKind::parse_literal("2024-03-01").unwrap();
        assert_eq!(DateKind::compare(&year, &day), None);
        assert_eq!(DateKind::compare(&day, &same_day), Some(true));
        assert!(!DateKind::equivalent(&year, &day));
        assert!(DateKind::parse_literal("2024-13-01").is_none());

        let a = InstantKind::parse_literal("2024-03-01T10:00:00Z").unwrap();
        let b = InstantKind::parse_literal("2024-03-01T11:00:00+01:00").unwrap();
        assert_eq!(InstantKind::compare(&a, &b), Some(true));
        assert!(InstantKind::parse_literal("2024-03-01").is_none());
    }

    #[test]
    fn test_string_equivalence_normalizes() {
        assert!(StringKind::equivalent(&"Hello  World".to_string(), &"hello world".to_string()));
        assert_eq!(StringKind::compare(&"A".to_string(), &"a".to_string()), Some(false));
    }

    #[test]
    fn test_descriptor_and_evaluation_result() {
        let descriptor = CodeKind::descriptor();
        assert_eq!(descriptor.name, "code");
        assert_eq!(descriptor.element_names().collect::<Vec<_>>(), ["id", "extension", "value"]);
        let result = CodeKind::to_evaluation_result(&"final".to_string());
        assert_eq!(result.type_info().map(|t| t.name.as_str()), Some("code"));
        let result = PositiveIntKind::to_evaluation_result(&3);
        assert_eq!(result.as_integer(), Some(3));
    }
}
