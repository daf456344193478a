use atrius_fhirpath_support::EvaluationResult;
use atrius_macros::{FhirPath, FhirSerde, TypeInfo};
use crate::extension::Extension;
use crate::precise_decimal::PreciseDecimal;
use crate::primitives::{Code, Decimal, FhirString, Uri};

const UCUM: &str = "http://unitsofmeasure.org";

/// FHIR Quantity type
///
/// A measured amount (or an amount that can potentially be measured).
///
/// ## Type: Complex type
/// Base type: DataType
///
/// See: [Quantity](http://hl7.org/fhir/StructureDefinition/Quantity)
///
/// Unlike other datatypes a quantity has a value of its own for the
/// reflection layer, so it can be compared and converted:
///
/// ```rust
/// use atrius_fhir_lib::r5::Quantity;
/// use atrius_fhirpath_support::{EvaluationResult, FhirNode};
/// use rust_decimal_macros::dec;
///
/// let q = Quantity::ucum("1.5", "mg");
/// assert_eq!(q.to_quantity().unwrap(), EvaluationResult::quantity(dec!(1.5), "mg".to_string()));
/// assert!(q.to_integer().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
#[fhir_path(primitive_value = "quantity_value")]
pub struct Quantity {
    /// Unique id for inter-element referencing
    pub id: Option<String>,
    /// Additional content defined by implementations
    pub extension: Vec<Extension>,
    /// Numerical value (with implicit precision)
    pub value: Option<Decimal>,
    /// < | <= | >= | > | ad - how to understand the value
    pub comparator: Option<Code>,
    /// Unit representation
    pub unit: Option<FhirString>,
    /// System that defines coded unit form
    pub system: Option<Uri>,
    /// Coded form of the unit
    pub code: Option<Code>,
}

impl Quantity {
    /// A UCUM quantity. `value` is kept as written, so `"1.50"` stays `1.50`
    /// on output. Returns a quantity without value if `value` is not a
    /// decimal literal.
    pub fn ucum(value: &str, code: &str) -> Self {
        Self {
            value: PreciseDecimal::parse(value).map(Decimal::new),
            unit: Some(FhirString::new(code.to_string())),
            system: Some(Uri::new(UCUM.to_string())),
            code: Some(Code::new(code.to_string())),
            ..Default::default()
        }
    }

    /// The quantity as a FHIRPath value.
    ///
    /// The unit is the UCUM code when the system is UCUM, otherwise the
    /// human-readable unit, and `'1'` when neither is present.
    pub fn quantity_value(&self) -> Option<EvaluationResult> {
        let value = self.value.as_ref()?.value.as_ref()?.value()?;
        let is_ucum = self
            .system
            .as_ref()
            .and_then(|system| system.value.as_deref())
            == Some(UCUM);
        let code = self.code.as_ref().and_then(|code| code.value.clone());
        let unit = self.unit.as_ref().and_then(|unit| unit.value.clone());
        let unit = if is_ucum {
            code.or(unit)
        } else {
            unit.or(code)
        };
        Some(EvaluationResult::quantity(value, unit.unwrap_or_else(|| "1".to_string())))
    }
}
