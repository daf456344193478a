//! # Structural Reflection
//!
//! [`FhirNode`] is the single, object-safe entry point through which a query
//! engine walks any FHIR value without knowing its concrete shape: ordered
//! child enumeration, two-valued structural equality, equivalence, static type
//! descriptors and primitive coercions.
//!
//! Shapes get their implementation from `#[derive(FhirPath)]`; primitive
//! slots implement it by hand. The comparison algorithms in this module are
//! shared by both.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use crate::conversion::{convert, SystemType};
use crate::evaluation_error::EvaluationError;
use crate::evaluation_result::EvaluationResult;
use crate::type_info::{TypeDescriptor, TypeInfoResult};

/// One child of a node, tagged with the element name it was found under.
///
/// Choice elements are reported under their base name (`value`, not
/// `valueString`).
#[derive(Clone, Copy)]
pub struct Child<'a> {
    pub name: &'static str,
    pub node: &'a dyn FhirNode,
}

impl Debug for Child<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Child")
            .field("name", &self.name)
            .field("type", &self.node.type_info())
            .finish()
    }
}

/// Reflection façade implemented by every node of the model.
pub trait FhirNode: Debug + Send + Sync {
    /// Runtime type of this node.
    ///
    /// For choice and resource enums this is the type of the populated
    /// variant.
    fn type_info(&self) -> TypeInfoResult;

    /// Static description of the declared elements of this node's type.
    fn type_descriptor(&self) -> &'static TypeDescriptor;

    /// Children in declaration order, restricted to `names` when given.
    ///
    /// Empty slots contribute nothing, repeated fields contribute each item.
    /// The returned vector is built fresh on each call.
    fn children(&self, names: Option<&[&str]>) -> Vec<Child<'_>>;

    /// The primitive value carried by this node, if it is a primitive.
    fn primitive_value(&self) -> Option<EvaluationResult> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    /// Structural equality.
    ///
    /// `Some(true)`/`Some(false)` are definite answers; `None` means the
    /// comparison is not meaningful for these values (for example two dates
    /// of different precision).
    fn equal(&self, other: &dyn FhirNode) -> Option<bool> {
        structural_equal(self, other)
    }

    /// Equality that ignores `id` children at every depth.
    fn equivalent(&self, other: &dyn FhirNode) -> bool {
        structural_equivalent(self, other)
    }

    fn to_string_value(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::String)
    }

    fn to_boolean(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::Boolean)
    }

    fn to_integer(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::Integer)
    }

    fn to_decimal(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::Decimal)
    }

    fn to_date(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::Date)
    }

    fn to_date_time(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::DateTime)
    }

    fn to_time(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::Time)
    }

    fn to_quantity(&self) -> Result<EvaluationResult, EvaluationError> {
        coerce(self, SystemType::Quantity)
    }
}

/// Returns `true` when `name` passes the optional name filter of `children`.
pub fn wants(names: Option<&[&str]>, name: &str) -> bool {
    names.is_none_or(|names| names.contains(&name))
}

fn coerce<N: FhirNode + ?Sized>(
    node: &N,
    target: SystemType,
) -> Result<EvaluationResult, EvaluationError> {
    match node.primitive_value() {
        Some(value) => convert(&value, target, &node.type_info().name),
        None => Err(EvaluationError::NotConvertible {
            from: node.type_info().name,
            to: target.name(),
        }),
    }
}

/// Element-wise comparison of the children of two nodes of the same type.
pub fn structural_equal<N: FhirNode + ?Sized>(left: &N, right: &dyn FhirNode) -> Option<bool> {
    if left.type_info() != right.type_info() {
        return Some(false);
    }
    match (left.primitive_value(), right.primitive_value()) {
        (Some(a), Some(b)) => {
            if a != b {
                return Some(false);
            }
        }
        (None, None) => {}
        _ => return None,
    }
    compare_children(&left.children(None), &right.children(None), |a, b| a.equal(b))
}

/// Walks both child lists pairwise. A name or length mismatch is a definite
/// `false`; an indefinite child makes the whole result indefinite unless a
/// later child is definitely different.
pub fn compare_children<F>(left: &[Child<'_>], right: &[Child<'_>], mut eq: F) -> Option<bool>
where
    F: FnMut(&dyn FhirNode, &dyn FhirNode) -> Option<bool>,
{
    if left.len() != right.len() {
        return Some(false);
    }
    let mut definite = true;
    for (a, b) in left.iter().zip(right) {
        if a.name != b.name {
            return Some(false);
        }
        match eq(a.node, b.node) {
            Some(true) => {}
            Some(false) => return Some(false),
            None => definite = false,
        }
    }
    if definite { Some(true) } else { None }
}

/// Equivalence: like equality, but `id` children are skipped on both sides
/// and primitive leaves use each node's own `equivalent`.
pub fn structural_equivalent<N: FhirNode + ?Sized>(left: &N, right: &dyn FhirNode) -> bool {
    if left.type_info() != right.type_info() {
        return false;
    }
    match (left.primitive_value(), right.primitive_value()) {
        (Some(a), Some(b)) if !primitive_equivalent(&a, &b) => return false,
        (Some(_), None) | (None, Some(_)) => return false,
        _ => {}
    }
    let left_children = without_ids(left.children(None));
    let right_children = without_ids(right.children(None));
    compare_children(&left_children, &right_children, |a, b| Some(a.equivalent(b)))
        .unwrap_or(false)
}

fn without_ids(children: Vec<Child<'_>>) -> Vec<Child<'_>> {
    children.into_iter().filter(|c| c.name != "id").collect()
}

/// FHIRPath equivalence on primitive values: strings ignore case and
/// collapse whitespace, everything else falls back to equality.
pub fn primitive_equivalent(left: &EvaluationResult, right: &EvaluationResult) -> bool {
    match (left, right) {
        (EvaluationResult::String(a, _), EvaluationResult::String(b, _)) => {
            normalize_for_equivalence(a) == normalize_for_equivalence(b)
        }
        _ => left == right,
    }
}

/// Lower-cases and collapses runs of whitespace into a single space.
pub fn normalize_for_equivalence(s: &str) -> String {
    s.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the full `EvaluationResult` tree of a node.
///
/// Primitives without metadata become their value; everything else becomes
/// a typed object keyed by child name, with repeated children collected.
pub fn to_evaluation_result(node: &dyn FhirNode) -> EvaluationResult {
    let children = node.children(None);
    if let Some(value) = node.primitive_value()
        && children.is_empty()
    {
        return value;
    }

    let mut grouped: Vec<(&'static str, Vec<EvaluationResult>)> = Vec::new();
    for child in children {
        let value = to_evaluation_result(child.node);
        match grouped.iter_mut().find(|(name, _)| *name == child.name) {
            Some((_, items)) => items.push(value),
            None => grouped.push((child.name, vec![value])),
        }
    }

    let descriptor = node.type_descriptor();
    let mut map = HashMap::new();
    for (name, mut items) in grouped {
        let repeating = descriptor.element(name).is_some_and(|e| e.is_repeating());
        let value = if items.len() == 1 && !repeating {
            items.remove(0)
        } else {
            EvaluationResult::collection(items)
        };
        map.insert(name.to_string(), value);
    }
    if let Some(value) = node.primitive_value() {
        map.entry("value".to_string()).or_insert(value);
    }
    let info = node.type_info();
    EvaluationResult::typed_object(map, &info.namespace, &info.name)
}

static SYSTEM_STRING: TypeDescriptor = TypeDescriptor {
    namespace: "System",
    name: "String",
    is_resource: false,
    elements: &[],
};

/// Plain strings back element ids and extension urls.
impl FhirNode for String {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::new("System", "String")
    }

    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &SYSTEM_STRING
    }

    fn children(&self, _names: Option<&[&str]>) -> Vec<Child<'_>> {
        Vec::new()
    }

    fn primitive_value(&self) -> Option<EvaluationResult> {
        Some(EvaluationResult::string(self.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: FhirNode + ?Sized> FhirNode for Box<T> {
    fn type_info(&self) -> TypeInfoResult {
        (**self).type_info()
    }

    fn type_descriptor(&self) -> &'static TypeDescriptor {
        (**self).type_descriptor()
    }

    fn children(&self, names: Option<&[&str]>) -> Vec<Child<'_>> {
        (**self).children(names)
    }

    fn primitive_value(&self) -> Option<EvaluationResult> {
        (**self).primitive_value()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn equal(&self, other: &dyn FhirNode) -> Option<bool> {
        (**self).equal(other)
    }

    fn equivalent(&self, other: &dyn FhirNode) -> bool {
        (**self).equivalent(other)
    }
}

/// How a field of a shape contributes children.
///
/// Implemented for the field containers; generated `children` bodies call it
/// once per declared field.
pub trait ReflectField {
    fn collect_children<'a>(&'a self, name: &'static str, out: &mut Vec<Child<'a>>);
}

impl<T: FhirNode> ReflectField for Option<T> {
    fn collect_children<'a>(&'a self, name: &'static str, out: &mut Vec<Child<'a>>) {
        if let Some(value) = self {
            out.push(Child { name, node: value });
        }
    }
}

impl<T: FhirNode> ReflectField for Vec<T> {
    fn collect_children<'a>(&'a self, name: &'static str, out: &mut Vec<Child<'a>>) {
        out.extend(self.iter().map(|node| Child {
            name,
            node: node as &dyn FhirNode,
        }));
    }
}

impl ReflectField for String {
    fn collect_children<'a>(&'a self, name: &'static str, out: &mut Vec<Child<'a>>) {
        out.push(Child { name, node: self });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_info::ElementDescriptor;

    #[derive(Debug)]
    struct Pair {
        id: Option<String>,
        tags: Vec<String>,
    }

    static PAIR: TypeDescriptor = TypeDescriptor {
        namespace: "FHIR",
        name: "Pair",
        is_resource: false,
        elements: &[
            ElementDescriptor {
                name: "id",
                types: &["String"],
                min: 0,
                max: Some(1),
                is_choice: false,
            },
            ElementDescriptor {
                name: "tag",
                types: &["String"],
                min: 0,
                max: None,
                is_choice: false,
            },
        ],
    };

    impl FhirNode for Pair {
        fn type_info(&self) -> TypeInfoResult {
            TypeInfoResult::new("FHIR", "Pair")
        }

        fn type_descriptor(&self) -> &'static TypeDescriptor {
            &PAIR
        }

        fn children(&self, names: Option<&[&str]>) -> Vec<Child<'_>> {
            let mut out = Vec::new();
            if wants(names, "id") {
                self.id.collect_children("id", &mut out);
            }
            if wants(names, "tag") {
                self.tags.collect_children("tag", &mut out);
            }
            out
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn pair(id: Option<&str>, tags: &[&str]) -> Pair {
        Pair {
            id: id.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_children_order_and_filter() {
        let p = pair(Some("p1"), &["a", "b"]);
        let names: Vec<_> = p.children(None).iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["id", "tag", "tag"]);
        let only_tags = p.children(Some(&["tag"]));
        assert_eq!(only_tags.len(), 2);
        assert!(p.children(Some(&["nothing"])).is_empty());
    }

    #[test]
    fn test_equal_and_equivalent_differ_on_id() {
        let a = pair(Some("p1"), &["Alpha"]);
        let b = pair(Some("p2"), &["alpha "]);
        assert_eq!(a.equal(&b), Some(false));
        assert!(a.equivalent(&b));

        let c = pair(None, &["Alpha"]);
        assert_eq!(a.equal(&pair(Some("p1"), &["Alpha"])), Some(true));
        assert!(a.equivalent(&c));
    }

    #[test]
    fn test_compare_children_indefinite() {
        let a = "x".to_string();
        let b = "y".to_string();
        let left = [Child { name: "v", node: &a }];
        let right = [Child { name: "v", node: &b }];
        assert_eq!(compare_children(&left, &right, |_, _| None), None);
        assert_eq!(compare_children(&left, &[], |_, _| None), Some(false));
    }

    #[test]
    fn test_non_primitive_is_not_convertible() {
        let p = pair(None, &[]);
        let err = p.to_integer().unwrap_err();
        assert!(matches!(err, EvaluationError::NotConvertible { to: "Integer", .. }));
        assert!(p.to_string_value().is_err());
    }

    #[test]
    fn test_string_node_converts() {
        let s = "true".to_string();
        assert_eq!(s.to_boolean().unwrap(), EvaluationResult::boolean(true));
        assert_eq!(s.to_string_value().unwrap(), EvaluationResult::string("true".to_string()));
    }

    #[test]
    fn test_to_evaluation_result_groups_repeats() {
        let p = pair(Some("p1"), &["a"]);
        match to_evaluation_result(&p) {
            EvaluationResult::Object { map, type_info } => {
                assert_eq!(type_info.unwrap().name, "Pair");
                assert_eq!(map["id"], EvaluationResult::string("p1".to_string()));
                assert!(map["tag"].is_collection());
            }
            other => panic!("expected object, got {:?}", other),
        }
    }
}
