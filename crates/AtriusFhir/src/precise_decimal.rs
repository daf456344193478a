use std::fmt;
use std::sync::Arc;
use rust_decimal::Decimal;
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::traits::IntoEvaluationResult;

/// High-precision decimal type that preserves original string representation.
///
/// FHIR requires decimal values to keep their original precision when they are
/// written back out: `12.340` must not become `12.34`. This type stores both the
/// parsed `Decimal` used for comparisons and the exact text it was read from.
///
/// # Examples
///
/// ```rust
/// use atrius_fhir_lib::PreciseDecimal;
/// use rust_decimal::Decimal;
///
/// let precise = PreciseDecimal::from(Decimal::new(12340, 3));
/// assert_eq!(precise.original_string(), "12.340");
///
/// let parsed = PreciseDecimal::parse("1.50").unwrap();
/// assert_eq!(parsed.original_string(), "1.50");
/// assert_eq!(parsed, PreciseDecimal::from(Decimal::new(15, 1)));
/// ```
#[derive(Debug, Clone)]
pub struct PreciseDecimal {
    /// The parsed decimal value, `None` if the text is out of `Decimal` range
    value: Option<Decimal>,
    original_string: Arc<str>,
}

/// Two decimals are equal when their parsed values are equal, whatever their
/// textual form (`10.0 == 10.00`).
impl PartialEq for PreciseDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for PreciseDecimal {}

impl PartialOrd for PreciseDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// `None` (unparseable) sorts before every value.
impl Ord for PreciseDecimal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl PreciseDecimal {
    /// Creates a `PreciseDecimal` from an already parsed value and its text.
    pub fn from_parts(value: Option<Decimal>, original_string: String) -> Self {
        Self {
            value,
            original_string: Arc::from(original_string.as_str()),
        }
    }

    /// Parses a FHIR decimal literal, keeping the text as written.
    ///
    /// Scientific notation (`1.2e3`, `1.2E3`) is accepted. Returns `None` when
    /// the text is not a decimal at all.
    pub fn parse(s: &str) -> Option<Self> {
        let value = Self::parse_decimal_string(s)?;
        Some(Self::from_parts(Some(value), s.to_string()))
    }

    fn parse_decimal_string(s: &str) -> Option<Decimal> {
        let normalized = s.replace('E', "e");
        if normalized.contains('e') {
            Decimal::from_scientific(&normalized).ok()
        } else {
            normalized.parse::<Decimal>().ok()
        }
    }

    /// Returns the parsed decimal value if parsing was successful.
    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    /// Returns the text this value was read from.
    pub fn original_string(&self) -> &str {
        &self.original_string
    }
}

impl From<Decimal> for PreciseDecimal {
    fn from(value: Decimal) -> Self {
        Self {
            value: Some(value),
            original_string: Arc::from(value.to_string()),
        }
    }
}

impl fmt::Display for PreciseDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original_string)
    }
}

impl IntoEvaluationResult for PreciseDecimal {
    fn to_evaluation_result(&self) -> EvaluationResult {
        match self.value {
            Some(d) => EvaluationResult::fhir_decimal(d),
            None => EvaluationResult::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trailing_zeros_preserved() {
        let d = PreciseDecimal::parse("12.340").unwrap();
        assert_eq!(d.value(), Some(dec!(12.34)));
        assert_eq!(d.to_string(), "12.340");
    }

    #[test]
    fn test_scientific_notation() {
        let d = PreciseDecimal::parse("1.5E2").unwrap();
        assert_eq!(d.value(), Some(dec!(150)));
        assert_eq!(d.original_string(), "1.5E2");
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert!(PreciseDecimal::parse("abc").is_none());
        assert!(PreciseDecimal::parse("").is_none());
    }

    #[test]
    fn test_equality_ignores_text() {
        let a = PreciseDecimal::parse("10.0").unwrap();
        let b = PreciseDecimal::parse("10.00").unwrap();
        assert_eq!(a, b);
        assert!(PreciseDecimal::parse("9.99").unwrap() < a);
    }
}
