//! # FHIRPath Conversion Rules
//!
//! The `convert_to_*` family implements the FHIRPath `toX()` conversion table
//! for a single value. Each returns `None` when the value is not convertible;
//! the reflection façade turns that into [`EvaluationError::NotConvertible`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use crate::evaluation_error::EvaluationError;
use crate::evaluation_result::EvaluationResult;

static DATE_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}(-\d{2}(-\d{2})?)?$").expect("valid date pattern")
});

static DATE_TIME_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d{4}(-\d{2}(-\d{2}(T\d{2}(:\d{2}(:\d{2}(\.\d+)?)?)?(Z|[+-]\d{2}:\d{2})?)?)?)?$",
    )
    .expect("valid dateTime pattern")
});

static TIME_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}(:\d{2}(:\d{2}(\.\d+)?)?)?$").expect("valid time pattern")
});

/// `'4.5 'mg''`, `'3 days'`: value, then an optional quoted UCUM code or calendar word.
static QUANTITY_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?\d+(?:\.\d+)?)\s*(?:'([^']+)'|([a-z]+))?$").expect("valid quantity pattern")
});

impl EvaluationResult {
    /// `toString()`: every primitive converts.
    pub fn convert_to_string(&self) -> Option<String> {
        match self {
            EvaluationResult::Empty
            | EvaluationResult::Collection { .. }
            | EvaluationResult::Object { .. } => None,
            other => Some(other.to_string_value()),
        }
    }

    /// `toBoolean()`.
    pub fn convert_to_boolean(&self) -> Option<bool> {
        match self {
            EvaluationResult::Boolean(b, _) => Some(*b),
            EvaluationResult::Integer(i, _) | EvaluationResult::Integer64(i, _) => match i {
                1 => Some(true),
                0 => Some(false),
                _ => None,
            },
            EvaluationResult::Decimal(d, _) => {
                if *d == Decimal::ONE {
                    Some(true)
                } else if d.is_zero() {
                    Some(false)
                } else {
                    None
                }
            }
            EvaluationResult::String(s, _) => match s.to_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" | "1.0" => Some(true),
                "false" | "f" | "no" | "n" | "0" | "0.0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// `toInteger()`. Decimals never convert, per FHIRPath.
    pub fn convert_to_integer(&self) -> Option<i64> {
        match self {
            EvaluationResult::Boolean(b, _) => Some(i64::from(*b)),
            EvaluationResult::Integer(i, _) | EvaluationResult::Integer64(i, _) => Some(*i),
            EvaluationResult::String(s, _) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// `toDecimal()`.
    pub fn convert_to_decimal(&self) -> Option<Decimal> {
        match self {
            EvaluationResult::Boolean(b, _) => {
                Some(if *b { Decimal::ONE } else { Decimal::ZERO })
            }
            EvaluationResult::Integer(i, _) | EvaluationResult::Integer64(i, _) => {
                Some(Decimal::from(*i))
            }
            EvaluationResult::Decimal(d, _) => Some(*d),
            EvaluationResult::String(s, _) => s.trim().parse::<Decimal>().ok(),
            _ => None,
        }
    }

    /// `toDate()`: a dateTime keeps its date part.
    pub fn convert_to_date(&self) -> Option<String> {
        match self {
            EvaluationResult::Date(d, _) => Some(d.clone()),
            EvaluationResult::DateTime(dt, _) => {
                Some(dt.split('T').next().unwrap_or(dt).to_string())
            }
            EvaluationResult::String(s, _) if DATE_LITERAL.is_match(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// `toDateTime()`: a date widens to a partial dateTime.
    pub fn convert_to_date_time(&self) -> Option<String> {
        match self {
            EvaluationResult::Date(d, _) => Some(d.clone()),
            EvaluationResult::DateTime(dt, _) => Some(dt.clone()),
            EvaluationResult::String(s, _) if DATE_TIME_LITERAL.is_match(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// `toTime()`.
    pub fn convert_to_time(&self) -> Option<String> {
        match self {
            EvaluationResult::Time(t, _) => Some(t.clone()),
            EvaluationResult::String(s, _) if TIME_LITERAL.is_match(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// `toQuantity()`: numbers become quantities with unit `'1'`.
    pub fn convert_to_quantity(&self) -> Option<(Decimal, String)> {
        match self {
            EvaluationResult::Quantity(value, unit, _) => Some((*value, unit.clone())),
            EvaluationResult::Integer(i, _) | EvaluationResult::Integer64(i, _) => {
                Some((Decimal::from(*i), "1".to_string()))
            }
            EvaluationResult::Decimal(d, _) => Some((*d, "1".to_string())),
            EvaluationResult::Boolean(b, _) => {
                Some((if *b { Decimal::ONE } else { Decimal::ZERO }, "1".to_string()))
            }
            EvaluationResult::String(s, _) => {
                let captures = QUANTITY_LITERAL.captures(s.trim())?;
                let value = captures.get(1)?.as_str().parse::<Decimal>().ok()?;
                let unit = captures
                    .get(2)
                    .or_else(|| captures.get(3))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "1".to_string());
                Some((value, unit))
            }
            _ => None,
        }
    }
}

/// Target of a coercion requested through the reflection façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    String,
    Boolean,
    Integer,
    Decimal,
    Date,
    DateTime,
    Time,
    Quantity,
}

impl SystemType {
    pub fn name(self) -> &'static str {
        match self {
            SystemType::String => "String",
            SystemType::Boolean => "Boolean",
            SystemType::Integer => "Integer",
            SystemType::Decimal => "Decimal",
            SystemType::Date => "Date",
            SystemType::DateTime => "DateTime",
            SystemType::Time => "Time",
            SystemType::Quantity => "Quantity",
        }
    }
}

/// Converts `value` to the System type `target`.
///
/// `source` names the node being converted and only feeds the error message.
pub fn convert(
    value: &EvaluationResult,
    target: SystemType,
    source: &str,
) -> Result<EvaluationResult, EvaluationError> {
    let converted = match target {
        SystemType::String => value.convert_to_string().map(EvaluationResult::string),
        SystemType::Boolean => value.convert_to_boolean().map(EvaluationResult::boolean),
        SystemType::Integer => value.convert_to_integer().map(EvaluationResult::integer),
        SystemType::Decimal => value.convert_to_decimal().map(EvaluationResult::decimal),
        SystemType::Date => value.convert_to_date().map(EvaluationResult::date),
        SystemType::DateTime => value.convert_to_date_time().map(EvaluationResult::datetime),
        SystemType::Time => value.convert_to_time().map(EvaluationResult::time),
        SystemType::Quantity => value
            .convert_to_quantity()
            .map(|(v, unit)| EvaluationResult::quantity(v, unit)),
    };
    converted.ok_or_else(|| EvaluationError::NotConvertible {
        from: source.to_string(),
        to: target.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_boolean_strings() {
        let yes = EvaluationResult::string("Yes".to_string());
        assert_eq!(yes.convert_to_boolean(), Some(true));
        let zero = EvaluationResult::string("0.0".to_string());
        assert_eq!(zero.convert_to_boolean(), Some(false));
        let other = EvaluationResult::string("maybe".to_string());
        assert_eq!(other.convert_to_boolean(), None);
    }

    #[test]
    fn test_to_integer_rejects_decimal() {
        let d = EvaluationResult::decimal(Decimal::new(15, 1));
        assert_eq!(d.convert_to_integer(), None);
        let s = EvaluationResult::string("42".to_string());
        assert_eq!(s.convert_to_integer(), Some(42));
    }

    #[test]
    fn test_date_time_narrowing_and_widening() {
        let dt = EvaluationResult::datetime("2024-03-01T10:00:00Z".to_string());
        assert_eq!(dt.convert_to_date(), Some("2024-03-01".to_string()));
        let d = EvaluationResult::date("2024-03".to_string());
        assert_eq!(d.convert_to_date_time(), Some("2024-03".to_string()));
        assert_eq!(d.convert_to_time(), None);
    }

    #[test]
    fn test_quantity_from_string() {
        let s = EvaluationResult::string("4.5 'mg'".to_string());
        assert_eq!(s.convert_to_quantity(), Some((Decimal::new(45, 1), "mg".to_string())));
        let days = EvaluationResult::string("3 days".to_string());
        assert_eq!(days.convert_to_quantity(), Some((Decimal::from(3), "days".to_string())));
    }

    #[test]
    fn test_convert_reports_not_convertible() {
        let value = EvaluationResult::string("abc".to_string());
        let err = convert(&value, SystemType::Integer, "string").unwrap_err();
        assert_eq!(
            err,
            EvaluationError::NotConvertible {
                from: "string".to_string(),
                to: "Integer"
            }
        );
        let ok = convert(&value, SystemType::String, "string").unwrap();
        assert_eq!(ok, EvaluationResult::string("abc".to_string()));
    }
}
