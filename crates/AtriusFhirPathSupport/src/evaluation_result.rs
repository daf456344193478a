use std::collections::HashMap;
use rust_decimal::Decimal;
pub use crate::evaluation_error::EvaluationError;
use crate::traits::format_unit_for_display;
use crate::type_info::TypeInfoResult;

/// Value produced when a node of the FHIR model is read by a query engine.
///
/// Primitive slots surface as one of the scalar variants, complex shapes as
/// `Object`, repeated fields as `Collection`. Every scalar variant carries the
/// optional type information of the slot it came from, so that a `code` and a
/// `string` holding the same text stay distinguishable for `type()`.
///
/// # Examples
///
/// ```rust
/// use atrius_fhirpath_support::evaluation_result::EvaluationResult;
///
/// let code = EvaluationResult::fhir_string("final".to_string(), "code");
/// let plain = EvaluationResult::string("final".to_string());
/// // equality looks at the value, not at the carried type
/// assert_eq!(code, plain);
/// assert_eq!(code.type_info().map(|t| t.name.as_str()), Some("code"));
/// ```
#[derive(Debug, Clone)]
pub enum EvaluationResult {
    /// No value; FHIRPath's empty collection `{}`.
    Empty,
    Boolean(bool, Option<TypeInfoResult>),
    /// string, code, id, uri, markdown and the other text kinds.
    String(String, Option<TypeInfoResult>),
    Decimal(Decimal, Option<TypeInfoResult>),
    /// integer, positiveInt and unsignedInt.
    Integer(i64, Option<TypeInfoResult>),
    Integer64(i64, Option<TypeInfoResult>),
    /// Date literal exactly as it appeared on the wire (`2024`, `2024-03`, ...).
    Date(String, Option<TypeInfoResult>),
    /// DateTime or instant literal as it appeared on the wire.
    DateTime(String, Option<TypeInfoResult>),
    Time(String, Option<TypeInfoResult>),
    /// Numeric value and unit.
    Quantity(Decimal, String, Option<TypeInfoResult>),
    Collection {
        items: Vec<EvaluationResult>,
        /// Whether the original source order was undefined
        has_undefined_order: bool,
        type_info: Option<TypeInfoResult>,
    },
    /// A complex shape, keyed by field name.
    Object {
        map: HashMap<String, EvaluationResult>,
        type_info: Option<TypeInfoResult>,
    },
}

/// Equality on the carried value; type information is ignored.
///
/// Decimals are normalized first so that `1.0` equals `1.00`.
impl PartialEq for EvaluationResult {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EvaluationResult::Empty, EvaluationResult::Empty) => true,
            (EvaluationResult::Boolean(a, _), EvaluationResult::Boolean(b, _)) => a == b,
            (EvaluationResult::String(a, _), EvaluationResult::String(b, _)) => a == b,
            (EvaluationResult::Decimal(a, _), EvaluationResult::Decimal(b, _)) => {
                a.normalize() == b.normalize()
            }
            (EvaluationResult::Integer(a, _), EvaluationResult::Integer(b, _)) => a == b,
            (EvaluationResult::Integer64(a, _), EvaluationResult::Integer64(b, _)) => a == b,
            (EvaluationResult::Integer(a, _), EvaluationResult::Integer64(b, _))
            | (EvaluationResult::Integer64(a, _), EvaluationResult::Integer(b, _)) => a == b,
            (EvaluationResult::Date(a, _), EvaluationResult::Date(b, _)) => a == b,
            (EvaluationResult::DateTime(a, _), EvaluationResult::DateTime(b, _)) => a == b,
            (EvaluationResult::Time(a, _), EvaluationResult::Time(b, _)) => a == b,
            (
                EvaluationResult::Quantity(val_a, unit_a, _),
                EvaluationResult::Quantity(val_b, unit_b, _),
            ) => val_a.normalize() == val_b.normalize() && unit_a == unit_b,
            (
                EvaluationResult::Collection {
                    items: a_items,
                    has_undefined_order: a_undef,
                    ..
                },
                EvaluationResult::Collection {
                    items: b_items,
                    has_undefined_order: b_undef,
                    ..
                },
            ) => a_undef == b_undef && a_items == b_items,
            (EvaluationResult::Object { map: a, .. }, EvaluationResult::Object { map: b, .. }) => {
                a == b
            }
            _ => false,
        }
    }
}

impl Eq for EvaluationResult {}

impl EvaluationResult {
    // === Constructor Methods ===

    /// Creates a Boolean result with System type.
    pub fn boolean(value: bool) -> Self {
        EvaluationResult::Boolean(value, Some(TypeInfoResult::new("System", "Boolean")))
    }

    /// Creates a Boolean result with FHIR type.
    pub fn fhir_boolean(value: bool) -> Self {
        EvaluationResult::Boolean(value, Some(TypeInfoResult::new("FHIR", "boolean")))
    }

    /// Creates a String result with System type.
    pub fn string(value: String) -> Self {
        EvaluationResult::String(value, Some(TypeInfoResult::new("System", "String")))
    }

    /// Creates a String result carrying the FHIR primitive type it came from.
    pub fn fhir_string(value: String, fhir_type: &str) -> Self {
        EvaluationResult::String(value, Some(TypeInfoResult::new("FHIR", fhir_type)))
    }

    pub fn integer(value: i64) -> Self {
        EvaluationResult::Integer(value, Some(TypeInfoResult::new("System", "Integer")))
    }

    /// Creates an Integer result for integer, positiveInt or unsignedInt.
    pub fn fhir_integer(value: i64, fhir_type: &str) -> Self {
        EvaluationResult::Integer(value, Some(TypeInfoResult::new("FHIR", fhir_type)))
    }

    pub fn fhir_integer64(value: i64) -> Self {
        EvaluationResult::Integer64(value, Some(TypeInfoResult::new("FHIR", "integer64")))
    }

    pub fn decimal(value: Decimal) -> Self {
        EvaluationResult::Decimal(value, Some(TypeInfoResult::new("System", "Decimal")))
    }

    pub fn fhir_decimal(value: Decimal) -> Self {
        EvaluationResult::Decimal(value, Some(TypeInfoResult::new("FHIR", "decimal")))
    }

    pub fn date(value: String) -> Self {
        EvaluationResult::Date(value, Some(TypeInfoResult::new("System", "Date")))
    }

    pub fn datetime(value: String) -> Self {
        EvaluationResult::DateTime(value, Some(TypeInfoResult::new("System", "DateTime")))
    }

    pub fn time(value: String) -> Self {
        EvaluationResult::Time(value, Some(TypeInfoResult::new("System", "Time")))
    }

    pub fn quantity(value: Decimal, unit: String) -> Self {
        EvaluationResult::Quantity(value, unit, Some(TypeInfoResult::new("System", "Quantity")))
    }

    pub fn collection(items: Vec<EvaluationResult>) -> Self {
        EvaluationResult::Collection {
            items,
            has_undefined_order: false,
            type_info: None,
        }
    }

    /// Creates an Object variant with type information.
    pub fn typed_object(
        map: HashMap<String, EvaluationResult>,
        type_namespace: &str,
        type_name: &str,
    ) -> Self {
        EvaluationResult::Object {
            map,
            type_info: Some(TypeInfoResult::new(type_namespace, type_name)),
        }
    }

    // === Value Extraction Methods ===

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            EvaluationResult::Boolean(val, _) => Some(*val),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            EvaluationResult::String(val, _) => Some(val),
            _ => None,
        }
    }

    /// Extracts the integer value of an Integer or Integer64 variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            EvaluationResult::Integer(val, _) | EvaluationResult::Integer64(val, _) => Some(*val),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            EvaluationResult::Decimal(val, _) => Some(*val),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<(Decimal, &String)> {
        match self {
            EvaluationResult::Quantity(val, unit, _) => Some((*val, unit)),
            _ => None,
        }
    }

    /// Returns the type information carried by this result, if any.
    pub fn type_info(&self) -> Option<&TypeInfoResult> {
        match self {
            EvaluationResult::Empty => None,
            EvaluationResult::Boolean(_, t)
            | EvaluationResult::String(_, t)
            | EvaluationResult::Decimal(_, t)
            | EvaluationResult::Integer(_, t)
            | EvaluationResult::Integer64(_, t)
            | EvaluationResult::Date(_, t)
            | EvaluationResult::DateTime(_, t)
            | EvaluationResult::Time(_, t)
            | EvaluationResult::Quantity(_, _, t) => t.as_ref(),
            EvaluationResult::Collection { type_info, .. }
            | EvaluationResult::Object { type_info, .. } => type_info.as_ref(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, EvaluationResult::Collection { .. })
    }

    /// Returns the count of items according to FHIRPath counting rules.
    ///
    /// `Empty` counts 0, a `Collection` its length, anything else 1.
    pub fn count(&self) -> usize {
        match self {
            EvaluationResult::Empty => 0,
            EvaluationResult::Collection { items, .. } => items.len(),
            _ => 1,
        }
    }

    /// Renders the value the way FHIRPath's `toString()` does.
    ///
    /// ```rust
    /// use atrius_fhirpath_support::evaluation_result::EvaluationResult;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(EvaluationResult::Empty.to_string_value(), "");
    /// assert_eq!(EvaluationResult::boolean(true).to_string_value(), "true");
    /// let quantity = EvaluationResult::quantity(Decimal::new(54, 1), "mg".to_string());
    /// assert_eq!(quantity.to_string_value(), "5.4 'mg'");
    /// ```
    pub fn to_string_value(&self) -> String {
        match self {
            EvaluationResult::Empty => String::new(),
            EvaluationResult::Boolean(b, _) => b.to_string(),
            EvaluationResult::String(s, _) => s.clone(),
            EvaluationResult::Decimal(d, _) => d.to_string(),
            EvaluationResult::Integer(i, _) | EvaluationResult::Integer64(i, _) => i.to_string(),
            EvaluationResult::Date(d, _) => d.clone(),
            EvaluationResult::DateTime(dt, _) => dt.clone(),
            EvaluationResult::Time(t, _) => t.clone(),
            EvaluationResult::Quantity(val, unit, _) => {
                format!("{} {}", val, format_unit_for_display(unit))
            }
            EvaluationResult::Collection { items, .. } => {
                if items.len() == 1 {
                    items[0].to_string_value()
                } else {
                    format!(
                        "[{}]",
                        items
                            .iter()
                            .map(|r| r.to_string_value())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                }
            }
            EvaluationResult::Object { .. } => "[object]".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_equality_is_normalized() {
        let a = EvaluationResult::decimal(Decimal::new(100, 2));
        let b = EvaluationResult::fhir_decimal(Decimal::new(1, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_integer_and_integer64_compare_by_value() {
        assert_eq!(EvaluationResult::integer(7), EvaluationResult::fhir_integer64(7));
        assert_ne!(EvaluationResult::integer(7), EvaluationResult::string("7".to_string()));
    }

    #[test]
    fn test_count_and_collection() {
        let collection = EvaluationResult::collection(vec![
            EvaluationResult::integer(1),
            EvaluationResult::integer(2),
        ]);
        assert!(collection.is_collection());
        assert_eq!(collection.count(), 2);
        assert_eq!(collection.to_string_value(), "[1, 2]");
        assert_eq!(EvaluationResult::Empty.count(), 0);
    }

    #[test]
    fn test_type_info_is_carried() {
        let code = EvaluationResult::fhir_string("final".to_string(), "code");
        let info = code.type_info().unwrap();
        assert_eq!(info.namespace, "FHIR");
        assert_eq!(info.name, "code");
        assert!(EvaluationResult::Empty.type_info().is_none());
    }
}
