use rust_decimal::Decimal;
use crate::evaluation_result::EvaluationResult;

/// Trait for FHIR choice element types.
///
/// Implemented by the enums that model `[x]` fields. Each variant is one
/// admissible type; the wire name of a variant is the base name followed by
/// the type suffix.
///
/// # Example
///
/// ```rust,ignore
/// impl ChoiceElement for CitationVersionAlgorithm {
///     fn base_name() -> &'static str {
///         "versionAlgorithm"
///     }
///
///     fn possible_field_names() -> Vec<&'static str> {
///         vec!["versionAlgorithmString", "versionAlgorithmCoding"]
///     }
/// }
/// ```
pub trait ChoiceElement {
    /// Returns the base name of the choice element without the [x] suffix.
    fn base_name() -> &'static str;

    /// Returns all possible field names that this choice element can manifest as.
    fn possible_field_names() -> Vec<&'static str>;

    /// Returns the wire name of the populated variant.
    fn field_name(&self) -> &'static str;
}

/// Lists the choice elements declared by a resource.
///
/// ```rust,ignore
/// impl FhirResourceMetadata for Observation {
///     fn choice_elements() -> &'static [&'static str] {
///         &["effective", "value"]
///     }
/// }
/// ```
pub trait FhirResourceMetadata {
    /// Base names (without [x]) of the choice element fields.
    fn choice_elements() -> &'static [&'static str];
}

/// Conversion of plain values into FHIRPath evaluation results.
///
/// Primitive value types implement this directly; complex shapes are
/// converted through [`crate::node::to_evaluation_result`], which walks their
/// children.
pub trait IntoEvaluationResult {
    fn to_evaluation_result(&self) -> EvaluationResult;
}

impl IntoEvaluationResult for String {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::string(self.clone())
    }
}

impl IntoEvaluationResult for bool {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::boolean(*self)
    }
}

impl IntoEvaluationResult for i64 {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::integer(*self)
    }
}

impl IntoEvaluationResult for Decimal {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::decimal(*self)
    }
}

impl<T> IntoEvaluationResult for Option<T>
where
    T: IntoEvaluationResult,
{
    fn to_evaluation_result(&self) -> EvaluationResult {
        match self {
            Some(value) => value.to_evaluation_result(),
            None => EvaluationResult::Empty,
        }
    }
}

/// Formats a unit for display in toString() output
pub(crate) fn format_unit_for_display(unit: &str) -> String {
    // Calendar words print bare, UCUM codes print quoted
    const CALENDAR_WORDS: &[&str] = &[
        "year",
        "years",
        "month",
        "months",
        "week",
        "weeks",
        "day",
        "days",
        "hour",
        "hours",
        "minute",
        "minutes",
        "second",
        "seconds",
        "millisecond",
        "milliseconds",
    ];

    if CALENDAR_WORDS.contains(&unit) {
        unit.to_string()
    } else {
        format!("'{}'", unit)
    }
}
