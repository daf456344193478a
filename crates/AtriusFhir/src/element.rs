//! # Primitive Slots
//!
//! A FHIR primitive is never just a value: any occurrence may also carry an
//! element id and extensions, and may even omit the value when an extension
//! explains why (the data-absent-reason pattern). [`Element<K>`] models that
//! triple once for every primitive kind `K`.
//!
//! In JSON the triple is split over two sibling keys, `name` for the value and
//! `_name` for `{ "id": .., "extension": [..] }`. Repeated primitives use two
//! parallel arrays padded with `null`:
//!
//! ```json
//! "given": ["Jim", null],
//! "_given": [null, {"id": "g2", "extension": [..]}]
//! ```
//!
//! In XML the triple is one element: `<given id="g2" value="Jim"><extension ../></given>`.

use std::any::Any;
use std::fmt;
use roxmltree::Node;
use serde_json::{Map, Value};
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::node::{
    compare_children, structural_equal, Child, FhirNode, ReflectField,
};
use atrius_fhirpath_support::traits::IntoEvaluationResult;
use atrius_fhirpath_support::type_info::{TypeDescriptor, TypeInfo, TypeInfoResult};
use crate::error::{FhirError, Result};
use crate::extension::Extension;
use crate::json::{describe, JsonElement, JsonField, JsonObject};
use crate::primitives::PrimitiveKind;
use crate::xml::{FhirXml, XmlField, XmlObject, XmlWriter};

/// Whether a value would be omitted on output.
///
/// Empty objects, empty arrays and primitives with neither value nor metadata
/// are never written, so decoding what was written cannot tell them apart
/// from absence.
pub trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl<T: IsEmpty> IsEmpty for Option<T> {
    fn is_empty(&self) -> bool {
        self.as_ref().is_none_or(IsEmpty::is_empty)
    }
}

impl<T: IsEmpty> IsEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        self.iter().all(IsEmpty::is_empty)
    }
}

impl<T: IsEmpty> IsEmpty for Box<T> {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl IsEmpty for String {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

/// A primitive slot: optional value plus element id and extensions.
///
/// # Examples
///
/// ```rust
/// use atrius_fhir_lib::{Code, Extension};
///
/// let status = Code::new("final".to_string()).with_id("s1");
/// assert_eq!(status.value.as_deref(), Some("final"));
///
/// // value absent, reason given by an extension
/// let unknown = Code::default().with_extension(Extension::new(
///     "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
///     None,
/// ));
/// assert!(unknown.value.is_none());
/// assert!(!unknown.is_empty());
/// ```
pub struct Element<K: PrimitiveKind> {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub value: Option<K::Value>,
}

impl<K: PrimitiveKind> Element<K> {
    pub fn new(value: K::Value) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: Some(value),
        }
    }

    /// Parses the literal form of a value, as found in an XML `value`
    /// attribute.
    pub fn parse(text: &str) -> Option<Self> {
        K::parse_literal(text).map(Self::new)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    /// Returns `true` if no value, id, or extensions are present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.id.is_none() && IsEmpty::is_empty(&self.extension)
    }

    fn has_metadata(&self) -> bool {
        self.id.is_some() || !IsEmpty::is_empty(&self.extension)
    }

    /// The `_name` object of this slot.
    fn metadata_json(&self) -> Value {
        let mut out = Map::new();
        self.id.put_json(&mut out, "id");
        self.extension.put_json(&mut out, "extension");
        Value::Object(out)
    }
}

impl<K: PrimitiveKind> Default for Element<K> {
    fn default() -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: None,
        }
    }
}

impl<K: PrimitiveKind> Clone for Element<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            extension: self.extension.clone(),
            value: self.value.clone(),
        }
    }
}

impl<K: PrimitiveKind> PartialEq for Element<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.extension == other.extension && self.value == other.value
    }
}

impl<K: PrimitiveKind> fmt::Debug for Element<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::FHIR_TYPE)
            .field("id", &self.id)
            .field("extension", &self.extension)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: PrimitiveKind> IsEmpty for Element<K> {
    fn is_empty(&self) -> bool {
        Element::is_empty(self)
    }
}

// --- JSON ---

fn metadata_key(key: &str) -> String {
    format!("_{}", key)
}

/// Reads the value half of a slot.
fn read_value<K: PrimitiveKind>(shape: &str, key: &str, value: &Value) -> Result<K::Value> {
    match value {
        Value::Array(_) | Value::Object(_) => Err(FhirError::unexpected(
            shape,
            key,
            "a primitive value",
            describe(value),
        )),
        other => K::from_json(other)
            .ok_or_else(|| FhirError::malformed(shape, key, K::FHIR_TYPE, describe(other))),
    }
}

/// Reads the `_name` half of a slot into `element`.
fn read_metadata<K: PrimitiveKind>(
    shape: &str,
    key: &str,
    meta: Value,
    element: &mut Element<K>,
) -> Result<()> {
    if !meta.is_object() {
        return Err(FhirError::MalformedMetadata {
            shape: shape.to_string(),
            field: key.to_string(),
            found: describe(&meta),
        });
    }
    let mut obj = JsonObject::from_value(K::FHIR_TYPE, meta)?;
    element.id = <Option<String> as JsonField>::take_json(&mut obj, "id")?;
    element.extension = <Vec<Extension> as JsonField>::take_json(&mut obj, "extension")?;
    obj.finish()?;
    // `_name` must carry an id or extensions
    if !element.has_metadata() {
        return Err(FhirError::MalformedMetadata {
            shape: shape.to_string(),
            field: key.to_string(),
            found: "an empty object".to_string(),
        });
    }
    Ok(())
}

/// Takes `key` as an array, tolerating absence.
fn take_array(obj: &mut JsonObject, key: &str) -> Result<Option<Vec<Value>>> {
    match obj.take(key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(FhirError::unexpected(obj.shape(), key, "an array", describe(&other))),
    }
}

impl<K: PrimitiveKind> JsonElement for Element<K> {
    fn json_present(obj: &JsonObject, key: &str) -> bool {
        obj.contains(key) || obj.contains(&metadata_key(key))
    }

    fn take_one(obj: &mut JsonObject, key: &'static str) -> Result<Option<Self>> {
        let value = obj.take(key);
        let meta_key = metadata_key(key);
        let meta = obj.take(&meta_key);
        if value.is_none() && meta.is_none() {
            return Ok(None);
        }

        let mut element = Element::default();
        if let Some(value) = value {
            element.value = Some(read_value::<K>(obj.shape(), key, &value)?);
        }
        if let Some(meta) = meta {
            read_metadata(obj.shape(), &meta_key, meta, &mut element)?;
        }
        Ok(Some(element))
    }

    fn take_many(obj: &mut JsonObject, key: &'static str) -> Result<Vec<Self>> {
        let meta_key = metadata_key(key);
        let values = take_array(obj, key)?;
        let metas = take_array(obj, &meta_key)?;
        if let (Some(values), Some(metas)) = (&values, &metas)
            && values.len() != metas.len()
        {
            return Err(FhirError::unexpected(
                obj.shape(),
                &meta_key,
                "an array as long as its value array",
                format!("{} entries for {} values", metas.len(), values.len()),
            ));
        }

        let len = values
            .as_ref()
            .map_or(0, Vec::len)
            .max(metas.as_ref().map_or(0, Vec::len));
        let mut values = values.unwrap_or_default().into_iter();
        let mut metas = metas.unwrap_or_default().into_iter();
        let mut elements = Vec::with_capacity(len);
        for _ in 0..len {
            let value = values.next().filter(|v| !v.is_null());
            let meta = metas.next().filter(|m| !m.is_null());
            if value.is_none() && meta.is_none() {
                return Err(FhirError::malformed(obj.shape(), key, K::FHIR_TYPE, "null"));
            }
            let mut element = Element::default();
            if let Some(value) = value {
                element.value = Some(read_value::<K>(obj.shape(), key, &value)?);
            }
            if let Some(meta) = meta {
                read_metadata(obj.shape(), &meta_key, meta, &mut element)?;
            }
            elements.push(element);
        }
        Ok(elements)
    }

    fn put_one(&self, out: &mut Map<String, Value>, key: &str) {
        if let Some(value) = &self.value {
            out.insert(key.to_string(), K::to_json(value));
        }
        if self.has_metadata() {
            out.insert(metadata_key(key), self.metadata_json());
        }
    }

    fn put_many(items: &[Self], out: &mut Map<String, Value>, key: &str) {
        let items: Vec<&Self> = items.iter().filter(|item| !item.is_empty()).collect();
        if items.iter().any(|item| item.value.is_some()) {
            let values = items
                .iter()
                .map(|item| item.value.as_ref().map_or(Value::Null, K::to_json))
                .collect();
            out.insert(key.to_string(), Value::Array(values));
        }
        if items.iter().any(|item| item.has_metadata()) {
            let metas = items
                .iter()
                .map(|item| {
                    if item.has_metadata() {
                        item.metadata_json()
                    } else {
                        Value::Null
                    }
                })
                .collect();
            out.insert(metadata_key(key), Value::Array(metas));
        }
    }
}

// --- XML ---

impl<K: PrimitiveKind> FhirXml for Element<K> {
    fn from_xml_node(node: Node<'_, '_>) -> Result<Self> {
        let mut obj = XmlObject::new(K::FHIR_TYPE, node)?;
        let id: Option<String> = XmlField::take_xml(&mut obj, "id")?;
        let value = match obj.take_attribute("value") {
            None => None,
            Some(text) => Some(K::parse_literal(text).ok_or_else(|| {
                FhirError::malformed(K::FHIR_TYPE, obj.name(), K::FHIR_TYPE, format!("\"{}\"", text))
            })?),
        };
        let extension: Vec<Extension> = XmlField::take_xml(&mut obj, "extension")?;
        obj.finish()?;
        let element = Self {
            id,
            extension,
            value,
        };
        if element.is_empty() {
            return Err(FhirError::MalformedMetadata {
                shape: K::FHIR_TYPE.to_string(),
                field: node.tag_name().name().to_string(),
                found: "an empty element".to_string(),
            });
        }
        Ok(element)
    }

    fn write_xml<W: std::io::Write>(&self, writer: &mut XmlWriter<W>, name: &str) -> Result<()> {
        writer.start(name)?;
        self.id.write_xml_attribute(writer, "id");
        if let Some(value) = &self.value {
            writer.attribute("value", &K::to_literal(value));
        }
        self.extension.write_xml_children(writer, "extension")?;
        writer.end(name)
    }
}

// --- Reflection ---

impl<K: PrimitiveKind> TypeInfo for Element<K> {
    const NAMESPACE: &'static str = "FHIR";
    const NAME: &'static str = K::FHIR_TYPE;
}

/// Combines the value and metadata halves of an equality result.
fn both(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

impl<K: PrimitiveKind> FhirNode for Element<K> {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::new("FHIR", K::FHIR_TYPE)
    }

    fn type_descriptor(&self) -> &'static TypeDescriptor {
        K::descriptor()
    }

    fn children(&self, names: Option<&[&str]>) -> Vec<Child<'_>> {
        let mut out = Vec::new();
        if atrius_fhirpath_support::node::wants(names, "id") {
            self.id.collect_children("id", &mut out);
        }
        if atrius_fhirpath_support::node::wants(names, "extension") {
            self.extension.collect_children("extension", &mut out);
        }
        out
    }

    fn primitive_value(&self) -> Option<EvaluationResult> {
        self.value.as_ref().map(K::to_evaluation_result)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equal(&self, other: &dyn FhirNode) -> Option<bool> {
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return structural_equal(self, other);
        };
        let value = match (&self.value, &other.value) {
            (Some(a), Some(b)) => K::compare(a, b),
            (None, None) => Some(true),
            _ => Some(false),
        };
        if value == Some(false) {
            return value;
        }
        let children = compare_children(&self.children(None), &other.children(None), |a, b| {
            a.equal(b)
        });
        both(value, children)
    }

    fn equivalent(&self, other: &dyn FhirNode) -> bool {
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return false;
        };
        let value = match (&self.value, &other.value) {
            (Some(a), Some(b)) => K::equivalent(a, b),
            (None, None) => true,
            _ => false,
        };
        let names: &[&str] = &["extension"];
        value
            && compare_children(&self.children(Some(names)), &other.children(Some(names)), |a, b| {
                Some(a.equivalent(b))
            })
            .unwrap_or(false)
    }
}

impl<K: PrimitiveKind> IntoEvaluationResult for Element<K> {
    fn to_evaluation_result(&self) -> EvaluationResult {
        atrius_fhirpath_support::node::to_evaluation_result(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Boolean, Code, Date, FhirString};
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        JsonObject::from_value("Patient", value).unwrap()
    }

    #[test]
    fn test_value_and_metadata_merge_in_any_order() {
        for input in [
            json!({"active": true, "_active": {"id": "a1"}}),
            json!({"_active": {"id": "a1"}, "active": true}),
        ] {
            let mut obj = object(input);
            let active = Boolean::take_one(&mut obj, "active").unwrap().unwrap();
            assert_eq!(active.value, Some(true));
            assert_eq!(active.id.as_deref(), Some("a1"));
            obj.finish().unwrap();
        }
    }

    #[test]
    fn test_metadata_only_slot() {
        let mut obj = object(json!({"_status": {"extension": [{
            "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
            "valueCode": "unknown"
        }]}}));
        let status = Code::take_one(&mut obj, "status").unwrap().unwrap();
        assert!(status.value.is_none());
        assert_eq!(status.extension.len(), 1);

        let mut out = Map::new();
        status.put_one(&mut out, "status");
        assert!(!out.contains_key("status"));
        assert!(out.contains_key("_status"));
    }

    #[test]
    fn test_malformed_value_and_metadata() {
        let mut obj = object(json!({"active": "yes"}));
        assert!(matches!(
            Boolean::take_one(&mut obj, "active"),
            Err(FhirError::MalformedPrimitive { kind: "boolean", .. })
        ));

        let mut obj = object(json!({"active": null}));
        assert!(matches!(
            Boolean::take_one(&mut obj, "active"),
            Err(FhirError::MalformedPrimitive { .. })
        ));

        let mut obj = object(json!({"active": true, "_active": "a1"}));
        assert!(matches!(
            Boolean::take_one(&mut obj, "active"),
            Err(FhirError::MalformedMetadata { .. })
        ));

        let mut obj = object(json!({"_active": {"value": true}}));
        assert!(matches!(
            Boolean::take_one(&mut obj, "active"),
            Err(FhirError::UnknownField { .. })
        ));

        let mut obj = object(json!({"birthDate": "2023-13-01"}));
        assert!(matches!(
            Date::take_one(&mut obj, "birthDate"),
            Err(FhirError::MalformedPrimitive { kind: "date", .. })
        ));
    }

    #[test]
    fn test_empty_metadata_object_rejected() {
        for input in [
            json!({"_active": {}}),
            json!({"_active": {"extension": []}}),
            json!({"active": true, "_active": {}}),
        ] {
            let mut obj = object(input);
            assert!(matches!(
                Boolean::take_one(&mut obj, "active"),
                Err(FhirError::MalformedMetadata { .. })
            ));
        }

        let mut obj = object(json!({"given": ["a"], "_given": [{}]}));
        assert!(matches!(
            FhirString::take_many(&mut obj, "given"),
            Err(FhirError::MalformedMetadata { .. })
        ));
    }

    #[test]
    fn test_empty_xml_primitive_rejected() {
        let doc = roxmltree::Document::parse(r#"<active xmlns="http://hl7.org/fhir"/>"#).unwrap();
        assert!(matches!(
            Boolean::from_xml_node(doc.root_element()),
            Err(FhirError::MalformedMetadata { .. })
        ));

        let doc =
            roxmltree::Document::parse(r#"<active xmlns="http://hl7.org/fhir" id="a1"/>"#).unwrap();
        let active = Boolean::from_xml_node(doc.root_element()).unwrap();
        assert_eq!(active.id.as_deref(), Some("a1"));
        assert!(active.value.is_none());
    }

    #[test]
    fn test_null_aligned_arrays() {
        let mut obj = object(json!({
            "given": ["Jim", null],
            "_given": [null, {"id": "g2"}]
        }));
        let given = FhirString::take_many(&mut obj, "given").unwrap();
        assert_eq!(given.len(), 2);
        assert_eq!(given[0].value.as_deref(), Some("Jim"));
        assert!(given[0].id.is_none());
        assert!(given[1].value.is_none());
        assert_eq!(given[1].id.as_deref(), Some("g2"));

        let mut out = Map::new();
        FhirString::put_many(&given, &mut out, "given");
        assert_eq!(
            Value::Object(out),
            json!({"given": ["Jim", null], "_given": [null, {"id": "g2"}]})
        );
    }

    #[test]
    fn test_all_null_side_is_omitted() {
        let given = vec![FhirString::new("a".to_string()), FhirString::new("b".to_string())];
        let mut out = Map::new();
        FhirString::put_many(&given, &mut out, "given");
        assert_eq!(Value::Object(out), json!({"given": ["a", "b"]}));
    }

    #[test]
    fn test_misaligned_arrays_rejected() {
        let mut obj = object(json!({"given": ["a", "b"], "_given": [null]}));
        assert!(matches!(
            FhirString::take_many(&mut obj, "given"),
            Err(FhirError::UnexpectedToken { .. })
        ));
        let mut obj = object(json!({"given": [null]}));
        assert!(FhirString::take_many(&mut obj, "given").is_err());
    }

    #[test]
    fn test_equality_is_precision_aware() {
        let year = Date::parse("2024").unwrap();
        let day = Date::parse("2024-01-01").unwrap();
        assert_eq!(year.equal(&day), None);
        assert_eq!(day.equal(&day.clone()), Some(true));

        let a = FhirString::new("Hello".to_string()).with_id("x");
        let b = FhirString::new("hello".to_string()).with_id("y");
        assert_eq!(a.equal(&b), Some(false));
        assert!(a.equivalent(&b));

        // a value on one side only is a definite difference
        let with_value = Boolean::new(true).with_id("a1");
        let without_value = Boolean::default().with_id("a1");
        assert_eq!(with_value.equal(&without_value), Some(false));
        assert_eq!(without_value.equal(&with_value), Some(false));
        assert!(!with_value.equivalent(&without_value));
    }

    #[test]
    fn test_type_info_and_children() {
        let code = Code::new("final".to_string()).with_id("c1");
        assert_eq!(code.type_info(), TypeInfoResult::new("FHIR", "code"));
        let children = code.children(None);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "id");
        assert_eq!(code.to_string_value().unwrap().as_string().map(String::as_str), Some("final"));
        assert_eq!(<Code as TypeInfo>::NAME, "code");
    }
}
