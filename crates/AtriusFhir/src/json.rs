//! # FHIR JSON Codec
//!
//! Strict, closed-schema decoding and declaration-ordered encoding of FHIR
//! JSON. Generated shape code drives a [`JsonObject`] field by field through
//! the [`JsonField`] container trait; every key the shape does not claim is
//! reported by [`JsonObject::finish`] as [`FhirError::UnknownField`].
//!
//! ```rust
//! use atrius_fhir_lib::json::{from_json_str, to_json_string};
//! use atrius_fhir_lib::r5::BodyStructure;
//!
//! let input = r#"{"resourceType":"BodyStructure","active":true,"_active":{"id":"a1"},"patient":{"reference":"Patient/1"}}"#;
//! let body: BodyStructure = from_json_str(input).unwrap();
//! assert_eq!(body.active.as_ref().and_then(|a| a.id.as_deref()), Some("a1"));
//! assert_eq!(to_json_string(&body).unwrap(), input);
//! ```

use std::io::Write;
use serde_json::{Map, Value};
use tracing::{debug, trace};
use crate::element::IsEmpty;
use crate::error::{FhirError, Result};

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

/// The fields of one JSON object that a shape is being decoded from.
///
/// Fields are removed as they are claimed, so whatever is left at the end is
/// by definition unknown to the shape.
#[derive(Debug)]
pub struct JsonObject {
    shape: &'static str,
    fields: Map<String, Value>,
}

impl JsonObject {
    /// Wraps `value`, which must be a JSON object.
    pub fn from_value(shape: &'static str, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { shape, fields }),
            other => Err(FhirError::unexpected(shape, "(root)", "an object", describe(&other))),
        }
    }

    /// Name of the shape being decoded.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Removes and returns the value stored under `key`.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    /// Claims the `resourceType` discriminator and checks it names this shape.
    pub fn expect_resource_type(&mut self, expected: &str) -> Result<()> {
        match self.take("resourceType") {
            Some(Value::String(found)) if found == expected => Ok(()),
            Some(Value::String(found)) => Err(FhirError::unexpected(
                self.shape,
                "resourceType",
                "the shape's own resource type",
                found,
            )),
            Some(other) => Err(FhirError::unexpected(
                self.shape,
                "resourceType",
                "a string",
                describe(&other),
            )),
            None => Err(FhirError::missing_field(self.shape, "resourceType")),
        }
    }

    /// Fails with `UnknownField` on the first key nobody claimed.
    pub fn finish(self) -> Result<()> {
        match self.fields.keys().next() {
            Some(key) => Err(FhirError::unknown_field(self.shape, key)),
            None => Ok(()),
        }
    }
}

/// A shape that can be read from and written to a JSON object.
///
/// Implemented by `#[derive(FhirSerde)]` for every datatype and resource
/// shape, and for the `Resource` enum through the registry.
pub trait FhirJson: IsEmpty + Sized {
    fn from_json_value(value: Value) -> Result<Self>;

    fn to_json_value(&self) -> Value;
}

impl<T: FhirJson> FhirJson for Box<T> {
    fn from_json_value(value: Value) -> Result<Self> {
        T::from_json_value(value).map(Box::new)
    }

    fn to_json_value(&self) -> Value {
        (**self).to_json_value()
    }
}

/// How one item of a field is stored under a key of its parent object.
///
/// Complex shapes occupy a single key holding an object. Primitive slots
/// split across `name` and `_name`, and their arrays are null-aligned pairs.
pub trait JsonElement: Sized {
    /// Whether the parent holds any key for this item.
    fn json_present(obj: &JsonObject, key: &str) -> bool;

    fn take_one(obj: &mut JsonObject, key: &'static str) -> Result<Option<Self>>;

    fn take_many(obj: &mut JsonObject, key: &'static str) -> Result<Vec<Self>>;

    fn put_one(&self, out: &mut Map<String, Value>, key: &str);

    fn put_many(items: &[Self], out: &mut Map<String, Value>, key: &str);
}

impl<T: FhirJson> JsonElement for T {
    fn json_present(obj: &JsonObject, key: &str) -> bool {
        obj.contains(key)
    }

    fn take_one(obj: &mut JsonObject, key: &'static str) -> Result<Option<Self>> {
        match obj.take(key) {
            None => Ok(None),
            Some(value @ Value::Object(_)) => T::from_json_value(value).map(Some),
            Some(other) => Err(FhirError::unexpected(
                obj.shape(),
                key,
                "an object",
                describe(&other),
            )),
        }
    }

    fn take_many(obj: &mut JsonObject, key: &'static str) -> Result<Vec<Self>> {
        let items = match obj.take(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(FhirError::unexpected(
                    obj.shape(),
                    key,
                    "an array",
                    describe(&other),
                ));
            }
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => T::from_json_value(item),
                other => Err(FhirError::unexpected(
                    obj.shape(),
                    key,
                    "an object",
                    describe(&other),
                )),
            })
            .collect()
    }

    fn put_one(&self, out: &mut Map<String, Value>, key: &str) {
        if !self.is_empty() {
            out.insert(key.to_string(), self.to_json_value());
        }
    }

    fn put_many(items: &[Self], out: &mut Map<String, Value>, key: &str) {
        let values: Vec<Value> = items
            .iter()
            .filter(|item| !item.is_empty())
            .map(FhirJson::to_json_value)
            .collect();
        if !values.is_empty() {
            out.insert(key.to_string(), Value::Array(values));
        }
    }
}

/// A declared field of a shape: its container decides cardinality.
pub trait JsonField: Sized {
    fn take_json(obj: &mut JsonObject, key: &'static str) -> Result<Self>;

    fn put_json(&self, out: &mut Map<String, Value>, key: &'static str);
}

impl<T: JsonElement> JsonField for Option<T> {
    fn take_json(obj: &mut JsonObject, key: &'static str) -> Result<Self> {
        T::take_one(obj, key)
    }

    fn put_json(&self, out: &mut Map<String, Value>, key: &'static str) {
        if let Some(item) = self {
            item.put_one(out, key);
        }
    }
}

impl<T: JsonElement> JsonField for Vec<T> {
    fn take_json(obj: &mut JsonObject, key: &'static str) -> Result<Self> {
        T::take_many(obj, key)
    }

    fn put_json(&self, out: &mut Map<String, Value>, key: &'static str) {
        T::put_many(self, out, key);
    }
}

/// Element ids of complex datatypes are plain strings without metadata.
impl JsonField for Option<String> {
    fn take_json(obj: &mut JsonObject, key: &'static str) -> Result<Self> {
        match obj.take(key) {
            None => Ok(None),
            Some(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
            Some(other) => Err(FhirError::malformed(obj.shape(), key, "string", describe(&other))),
        }
    }

    fn put_json(&self, out: &mut Map<String, Value>, key: &'static str) {
        if let Some(s) = self {
            out.insert(key.to_string(), Value::String(s.clone()));
        }
    }
}

/// A required plain string, such as `Extension.url`.
impl JsonField for String {
    fn take_json(obj: &mut JsonObject, key: &'static str) -> Result<Self> {
        match <Option<String> as JsonField>::take_json(obj, key)? {
            Some(s) => Ok(s),
            None => Err(FhirError::missing_field(obj.shape(), key)),
        }
    }

    fn put_json(&self, out: &mut Map<String, Value>, key: &'static str) {
        out.insert(key.to_string(), Value::String(self.clone()));
    }
}

/// A choice (`[x]`) field: one enum whose variants live under different
/// type-suffixed keys of the parent object.
pub trait JsonChoice: Sized {
    fn take_json_choice(obj: &mut JsonObject) -> Result<Option<Self>>;

    fn put_json_choice(&self, out: &mut Map<String, Value>);
}

/// Records a decoded choice variant, rejecting a second one.
///
/// Called by generated [`JsonChoice`] code once per variant found in the
/// input.
pub fn choose_variant<C>(
    shape: &str,
    base: &str,
    chosen: &mut Option<(C, &'static str)>,
    value: C,
    key: &'static str,
) -> Result<()> {
    if let Some((_, first)) = chosen {
        return Err(FhirError::conflicting(shape, base, first, key));
    }
    trace!(shape, variant = key, "resolved choice variant");
    *chosen = Some((value, key));
    Ok(())
}

/// Decodes a shape from JSON text.
pub fn from_json_str<T: FhirJson>(input: &str) -> Result<T> {
    debug!(len = input.len(), "decoding FHIR JSON");
    let value: Value = serde_json::from_str(input)?;
    T::from_json_value(value)
}

/// Decodes a shape from JSON bytes.
pub fn from_json_slice<T: FhirJson>(input: &[u8]) -> Result<T> {
    debug!(len = input.len(), "decoding FHIR JSON");
    let value: Value = serde_json::from_slice(input)?;
    T::from_json_value(value)
}

/// Decodes a shape from an already parsed JSON value.
pub fn from_json_value<T: FhirJson>(value: Value) -> Result<T> {
    T::from_json_value(value)
}

pub fn to_json_value<T: FhirJson>(value: &T) -> Value {
    value.to_json_value()
}

/// Encodes a shape as compact JSON text.
pub fn to_json_string<T: FhirJson>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(&value.to_json_value())?)
}

pub fn to_json_string_pretty<T: FhirJson>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&value.to_json_value())?)
}

/// Encodes a shape into `writer`. Failures of the sink surface as
/// [`FhirError::Io`].
pub fn to_json_writer<W: Write, T: FhirJson>(writer: W, value: &T) -> Result<()> {
    serde_json::to_writer(writer, &value.to_json_value()).map_err(|e| {
        if e.is_io() {
            FhirError::Io(e.into())
        } else {
            FhirError::Json(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finish_reports_first_leftover() {
        let mut obj = JsonObject::from_value("Coding", json!({"code": "a", "bogus": 1, "other": 2}))
            .unwrap();
        obj.take("code");
        match obj.finish() {
            Err(FhirError::UnknownField { shape, field }) => {
                assert_eq!(shape, "Coding");
                assert_eq!(field, "bogus");
            }
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_is_unexpected_token() {
        let err = JsonObject::from_value("Coding", json!("text")).unwrap_err();
        assert!(matches!(err, FhirError::UnexpectedToken { expected: "an object", .. }));
    }

    #[test]
    fn test_resource_type_checks() {
        let mut obj = JsonObject::from_value("Patient", json!({"resourceType": "Patient"})).unwrap();
        assert!(obj.expect_resource_type("Patient").is_ok());
        assert!(obj.finish().is_ok());

        let mut obj =
            JsonObject::from_value("Patient", json!({"resourceType": "Observation"})).unwrap();
        assert!(obj.expect_resource_type("Patient").is_err());

        let mut obj = JsonObject::from_value("Patient", json!({})).unwrap();
        assert!(matches!(
            obj.expect_resource_type("Patient"),
            Err(FhirError::MissingField { .. })
        ));
    }

    #[test]
    fn test_plain_string_field() {
        let mut obj = JsonObject::from_value("Coding", json!({"id": "c1", "url": 3})).unwrap();
        let id = <Option<String> as JsonField>::take_json(&mut obj, "id").unwrap();
        assert_eq!(id.as_deref(), Some("c1"));
        assert!(<String as JsonField>::take_json(&mut obj, "url").is_err());
        let mut empty = JsonObject::from_value("Extension", json!({})).unwrap();
        assert!(matches!(
            <String as JsonField>::take_json(&mut empty, "url"),
            Err(FhirError::MissingField { .. })
        ));
    }

    #[test]
    fn test_choose_variant_rejects_second() {
        let mut chosen: Option<(u8, &'static str)> = None;
        choose_variant("Citation", "versionAlgorithm", &mut chosen, 1, "versionAlgorithmString")
            .unwrap();
        let err = choose_variant(
            "Citation",
            "versionAlgorithm",
            &mut chosen,
            2,
            "versionAlgorithmCoding",
        )
        .unwrap_err();
        assert!(matches!(err, FhirError::ConflictingVariant { .. }));
    }
}
