/// Error raised when a FHIR node is coerced through the reflection façade.
///
/// # Examples
///
/// ```rust
/// use atrius_fhirpath_support::evaluation_error::EvaluationError;
///
/// let error = EvaluationError::NotConvertible {
///     from: "CodeableConcept".to_string(),
///     to: "Integer",
/// };
/// assert_eq!(
///     error.to_string(),
///     "Not Convertible: CodeableConcept cannot be converted to Integer"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// A coercion was requested that the source value does not support.
    ///
    /// Raised for every coercion of a non-primitive shape, and for primitive
    /// values whose literal does not convert (e.g. `"abc"` to Integer).
    NotConvertible {
        /// Type name of the source node or value
        from: String,
        /// Target System type (`Boolean`, `Integer`, ...)
        to: &'static str,
    },
}

impl std::error::Error for EvaluationError {}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::NotConvertible { from, to } => {
                write!(f, "Not Convertible: {} cannot be converted to {}", from, to)
            }
        }
    }
}
