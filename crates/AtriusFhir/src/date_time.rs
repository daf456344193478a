use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveTime, Utc};
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::traits::IntoEvaluationResult;
use atrius_fhirpath_support::type_info::TypeInfoResult;

/// Precision levels for FHIR Date values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePrecision {
    /// Year only (YYYY)
    Year,
    /// Year and month (YYYY-MM)
    YearMonth,
    /// Full date (YYYY-MM-DD)
    Full,
}

/// Precision levels for FHIR Time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePrecision {
    /// Hour only (HH)
    Hour,
    /// Hour and minute (HH:MM)
    HourMinute,
    /// Hour, minute, and second (HH:MM:SS)
    HourMinuteSecond,
    /// Full time with sub-second precision (HH:MM:SS.sss)
    Millisecond,
}

/// Precision levels for FHIR DateTime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateTimePrecision {
    Year,
    YearMonth,
    Date,
    DateHour,
    DateHourMinute,
    DateHourMinuteSecond,
    /// Sub-second precision (YYYY-MM-DDTHH:MM:SS.sss)
    Full,
}

/// Precision-aware FHIR Date type.
///
/// Keeps the text it was read from so that `2023-03` is written back as
/// `2023-03`, never widened to a full date.
///
/// # Examples
/// ```rust
/// use atrius_fhir_lib::{DatePrecision, PrecisionDate};
///
/// let year_date = PrecisionDate::from_year(2023);
/// assert_eq!(year_date.precision(), DatePrecision::Year);
/// assert_eq!(year_date.original_string(), "2023");
///
/// let parsed = PrecisionDate::parse("2023-03-15").unwrap();
/// assert_eq!(parsed.precision(), DatePrecision::Full);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionDate {
    year: i32,
    /// 1-12, `None` for year-only precision
    month: Option<u32>,
    /// `None` for year or year-month precision
    day: Option<u32>,
    precision: DatePrecision,
    original_string: Arc<str>,
}

impl PrecisionDate {
    /// Creates a year-only precision date.
    pub fn from_year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            precision: DatePrecision::Year,
            original_string: Arc::from(format!("{:04}", year)),
        }
    }

    /// Creates a full precision date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
            precision: DatePrecision::Full,
            original_string: Arc::from(format!("{:04}-{:02}-{:02}", year, month, day)),
        }
    }

    /// Parses a FHIR date string, preserving precision.
    ///
    /// Calendar validity is checked for full dates (`2023-02-30` is rejected).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts[0].len() != 4 {
            return None;
        }
        let year = parts[0].parse::<i32>().ok()?;
        let (month, day, precision) = match parts.len() {
            1 => (None, None, DatePrecision::Year),
            2 => {
                let month = parts[1].parse::<u32>().ok()?;
                if !(1..=12).contains(&month) {
                    return None;
                }
                (Some(month), None, DatePrecision::YearMonth)
            }
            3 => {
                let month = parts[1].parse::<u32>().ok()?;
                let day = parts[2].parse::<u32>().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)?;
                (Some(month), Some(day), DatePrecision::Full)
            }
            _ => return None,
        };
        Some(Self {
            year,
            month,
            day,
            precision,
            original_string: Arc::from(s),
        })
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Converts to a NaiveDate, using the first month/day for missing components.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    /// Compares two dates considering precision.
    /// Returns None if comparison is indeterminate due to precision differences.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match self.year.cmp(&other.year) {
            Ordering::Equal => match (self.month, other.month) {
                (None, None) => Some(Ordering::Equal),
                (None, Some(_)) | (Some(_), None) => None,
                (Some(m1), Some(m2)) => match m1.cmp(&m2) {
                    Ordering::Equal => match (self.day, other.day) {
                        (None, None) => Some(Ordering::Equal),
                        (None, Some(_)) | (Some(_), None) => None,
                        (Some(d1), Some(d2)) => Some(d1.cmp(&d2)),
                    },
                    other => Some(other),
                },
            },
            other => Some(other),
        }
    }
}

/// Precision-aware FHIR Time type. FHIR times carry no timezone.
///
/// # Examples
/// ```rust
/// use atrius_fhir_lib::{PrecisionTime, TimePrecision};
///
/// let full_time = PrecisionTime::from_hms_milli(14, 30, 45, 123);
/// assert_eq!(full_time.precision(), TimePrecision::Millisecond);
/// assert_eq!(full_time.original_string(), "14:30:45.123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionTime {
    hour: u32,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
    precision: TimePrecision,
    original_string: Arc<str>,
}

impl PrecisionTime {
    pub fn from_hms_milli(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        Self {
            hour,
            minute: Some(minute),
            second: Some(second),
            millisecond: Some(millisecond),
            precision: TimePrecision::Millisecond,
            original_string: Arc::from(format!(
                "{:02}:{:02}:{:02}.{:03}",
                hour, minute, second, millisecond
            )),
        }
    }

    /// Parses a FHIR time string, preserving precision.
    pub fn parse(s: &str) -> Option<Self> {
        if s.contains('+') || s.contains('-') || s.ends_with('Z') {
            return None;
        }

        let parts: Vec<&str> = s.split(':').collect();
        let hour = parts[0].parse::<u32>().ok()?;
        if hour > 23 {
            return None;
        }
        let (minute, second, millisecond, precision) = match parts.len() {
            1 => (None, None, None, TimePrecision::Hour),
            2 => (Some(Self::minute(parts[1])?), None, None, TimePrecision::HourMinute),
            3 => {
                let minute = Self::minute(parts[1])?;
                match parts[2].split_once('.') {
                    Some((sec, fraction)) => {
                        let second = Self::minute(sec)?;
                        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
                            return None;
                        }
                        // sub-millisecond digits are kept in the text only
                        let padded = format!("{:0<3}", &fraction[..fraction.len().min(3)]);
                        let ms = padded.parse::<u32>().ok()?;
                        (Some(minute), Some(second), Some(ms), TimePrecision::Millisecond)
                    }
                    None => (
                        Some(minute),
                        Some(Self::minute(parts[2])?),
                        None,
                        TimePrecision::HourMinuteSecond,
                    ),
                }
            }
            _ => return None,
        };

        Some(Self {
            hour,
            minute,
            second,
            millisecond,
            precision,
            original_string: Arc::from(s),
        })
    }

    /// Parses a minute or second component (0-59).
    fn minute(s: &str) -> Option<u32> {
        let value = s.parse::<u32>().ok()?;
        (value <= 59).then_some(value)
    }

    pub fn precision(&self) -> TimePrecision {
        self.precision
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    /// Converts to a NaiveTime, using zero for missing components.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_milli_opt(
            self.hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.millisecond.unwrap_or(0),
        )
    }

    /// Compares two times considering precision.
    ///
    /// Seconds and milliseconds count as a single precision level.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match self.hour.cmp(&other.hour) {
            Ordering::Equal => match (self.minute, other.minute) {
                (None, None) => Some(Ordering::Equal),
                (None, Some(_)) | (Some(_), None) => None,
                (Some(m1), Some(m2)) => match m1.cmp(&m2) {
                    Ordering::Equal => match (self.second, other.second) {
                        (None, None) => Some(Ordering::Equal),
                        (None, Some(_)) | (Some(_), None) => None,
                        (Some(s1), Some(s2)) => {
                            let total1 = s1 * 1000 + self.millisecond.unwrap_or(0);
                            let total2 = s2 * 1000 + other.millisecond.unwrap_or(0);
                            Some(total1.cmp(&total2))
                        }
                    },
                    other => Some(other),
                },
            },
            other => Some(other),
        }
    }
}

/// Precision-aware FHIR DateTime type, including the timezone when present.
///
/// # Examples
/// ```rust
/// use atrius_fhir_lib::{DateTimePrecision, PrecisionDateTime};
///
/// let date_dt = PrecisionDateTime::from_date(2023, 3, 15);
/// assert_eq!(date_dt.precision(), DateTimePrecision::Date);
///
/// let full_dt = PrecisionDateTime::parse("2023-03-15T14:30:45.123Z").unwrap();
/// assert_eq!(full_dt.precision(), DateTimePrecision::Full);
/// assert_eq!(full_dt.to_string(), "2023-03-15T14:30:45.123Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionDateTime {
    pub date: PrecisionDate,
    time: Option<PrecisionTime>,
    /// Offset in minutes from UTC, `None` when unspecified
    timezone_offset: Option<i32>,
    precision: DateTimePrecision,
    original_string: Arc<str>,
}

impl PrecisionDateTime {
    /// Creates a date-only datetime.
    pub fn from_date(year: i32, month: u32, day: u32) -> Self {
        Self::from_precision_date(PrecisionDate::from_ymd(year, month, day))
    }

    /// Parses a FHIR datetime string, preserving precision and timezone.
    pub fn parse(s: &str) -> Option<Self> {
        let Some((date_part, time_and_tz)) = s.split_once('T') else {
            let mut parsed = Self::from_precision_date(PrecisionDate::parse(s)?);
            parsed.original_string = Arc::from(s);
            return Some(parsed);
        };
        let date = PrecisionDate::parse(date_part)?;
        if date.precision != DatePrecision::Full {
            return None;
        }

        let (time_part, timezone_offset) = if let Some(stripped) = time_and_tz.strip_suffix('Z') {
            (stripped, Some(0))
        } else if let Some(pos) = time_and_tz.rfind(['+', '-']) {
            let offset = Self::parse_timezone_offset(&time_and_tz[pos + 1..])?;
            let sign = if time_and_tz[pos..].starts_with('-') { -1 } else { 1 };
            (&time_and_tz[..pos], Some(sign * offset))
        } else {
            (time_and_tz, None)
        };

        let time = PrecisionTime::parse(time_part)?;
        let precision = match time.precision {
            TimePrecision::Hour => DateTimePrecision::DateHour,
            TimePrecision::HourMinute => DateTimePrecision::DateHourMinute,
            TimePrecision::HourMinuteSecond => DateTimePrecision::DateHourMinuteSecond,
            TimePrecision::Millisecond => DateTimePrecision::Full,
        };

        Some(Self {
            date,
            time: Some(time),
            timezone_offset,
            precision,
            original_string: Arc::from(s),
        })
    }

    /// Parses a timezone offset (`05:30`) into minutes.
    fn parse_timezone_offset(s: &str) -> Option<i32> {
        let (hours, minutes) = s.split_once(':')?;
        let hours = hours.parse::<i32>().ok()?;
        let minutes = minutes.parse::<i32>().ok()?;
        (hours <= 14 && minutes <= 59).then_some(hours * 60 + minutes)
    }

    /// Widens a date to a datetime of the same precision.
    pub fn from_precision_date(date: PrecisionDate) -> Self {
        let precision = match date.precision {
            DatePrecision::Year => DateTimePrecision::Year,
            DatePrecision::YearMonth => DateTimePrecision::YearMonth,
            DatePrecision::Full => DateTimePrecision::Date,
        };
        Self {
            original_string: date.original_string.clone(),
            date,
            time: None,
            timezone_offset: None,
            precision,
        }
    }

    pub fn precision(&self) -> DateTimePrecision {
        self.precision
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    pub fn has_timezone(&self) -> bool {
        self.timezone_offset.is_some()
    }

    /// Converts to UTC, filling missing components with their minimum.
    ///
    /// A datetime without a timezone is read as UTC.
    pub fn to_chrono_datetime(&self) -> Option<ChronoDateTime<Utc>> {
        let naive_time = match &self.time {
            Some(time) => time.to_naive_time()?,
            None => NaiveTime::from_hms_opt(0, 0, 0)?,
        };
        let naive_dt = self.date.to_naive_date()?.and_time(naive_time);
        let offset = chrono::Duration::minutes(i64::from(self.timezone_offset.unwrap_or(0)));
        Some(ChronoDateTime::<Utc>::from_naive_utc_and_offset(naive_dt - offset, Utc))
    }

    /// Compares two datetimes considering precision and timezones.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if self.time.is_none() != other.time.is_none() {
            return None;
        }

        if self.precision >= DateTimePrecision::DateHour
            && other.precision >= DateTimePrecision::DateHour
            && self.timezone_offset.is_some()
            && other.timezone_offset.is_some()
        {
            return Some(self.to_chrono_datetime()?.cmp(&other.to_chrono_datetime()?));
        }

        if self.timezone_offset.is_some() != other.timezone_offset.is_some() {
            return None;
        }
        match self.date.compare(&other.date) {
            Some(Ordering::Equal) => match (&self.time, &other.time) {
                (None, None) => Some(Ordering::Equal),
                (Some(t1), Some(t2)) => t1.compare(t2),
                _ => None,
            },
            other => other,
        }
    }
}

impl fmt::Display for PrecisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original_string)
    }
}

impl fmt::Display for PrecisionDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original_string)
    }
}

impl fmt::Display for PrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original_string)
    }
}

/// A FHIR instant: a dateTime with at least second precision and a timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionInstant {
    inner: PrecisionDateTime,
}

impl PrecisionInstant {
    /// Parses a FHIR instant string.
    pub fn parse(s: &str) -> Option<Self> {
        let dt = PrecisionDateTime::parse(s)?;
        if dt.precision < DateTimePrecision::DateHourMinuteSecond || !dt.has_timezone() {
            return None;
        }
        Some(PrecisionInstant { inner: dt })
    }

    pub fn original_string(&self) -> &str {
        self.inner.original_string()
    }

    pub fn as_datetime(&self) -> &PrecisionDateTime {
        &self.inner
    }

    pub fn to_chrono_datetime(&self) -> Option<ChronoDateTime<Utc>> {
        self.inner.to_chrono_datetime()
    }
}

impl fmt::Display for PrecisionInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl IntoEvaluationResult for PrecisionDate {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::Date(
            self.original_string.to_string(),
            Some(TypeInfoResult::new("FHIR", "date")),
        )
    }
}

impl IntoEvaluationResult for PrecisionTime {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::Time(
            self.original_string.to_string(),
            Some(TypeInfoResult::new("FHIR", "time")),
        )
    }
}

impl IntoEvaluationResult for PrecisionDateTime {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::DateTime(
            self.original_string.to_string(),
            Some(TypeInfoResult::new("FHIR", "dateTime")),
        )
    }
}

impl IntoEvaluationResult for PrecisionInstant {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::DateTime(
            self.inner.original_string.to_string(),
            Some(TypeInfoResult::new("FHIR", "instant")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_dates() {
        let d = PrecisionDate::parse("2023-03").unwrap();
        assert_eq!(d.precision(), DatePrecision::YearMonth);
        assert_eq!(d.month(), Some(3));
        assert_eq!(d.day(), None);
        assert!(PrecisionDate::parse("2023-13").is_none());
        assert!(PrecisionDate::parse("2023-02-30").is_none());
        assert!(PrecisionDate::parse("23").is_none());
    }

    #[test]
    fn test_date_compare_different_precision_is_unknown() {
        let month = PrecisionDate::parse("2023-03").unwrap();
        let day = PrecisionDate::parse("2023-03-15").unwrap();
        assert_eq!(month.compare(&day), None);
        let other_year = PrecisionDate::parse("2024").unwrap();
        assert_eq!(month.compare(&other_year), Some(Ordering::Less));
    }

    #[test]
    fn test_time_parse() {
        let t = PrecisionTime::parse("14:30:45.5").unwrap();
        assert_eq!(t.precision(), TimePrecision::Millisecond);
        assert_eq!(t.original_string(), "14:30:45.5");
        assert_eq!(
            t.compare(&PrecisionTime::from_hms_milli(14, 30, 45, 500)),
            Some(Ordering::Equal)
        );
        assert!(PrecisionTime::parse("24:00").is_none());
        assert!(PrecisionTime::parse("10:00Z").is_none());
    }

    #[test]
    fn test_datetime_timezones() {
        let a = PrecisionDateTime::parse("2023-03-15T10:00:00+02:00").unwrap();
        let b = PrecisionDateTime::parse("2023-03-15T08:00:00Z").unwrap();
        assert_eq!(a.compare(&b), Some(Ordering::Equal));
        let local = PrecisionDateTime::parse("2023-03-15T08:00:00").unwrap();
        assert_eq!(local.compare(&b), None);
        assert!(PrecisionDateTime::parse("2023-03T10:00").is_none());
    }

    #[test]
    fn test_datetime_date_only_keeps_text() {
        let dt = PrecisionDateTime::parse("2023").unwrap();
        assert_eq!(dt.precision(), DateTimePrecision::Year);
        assert_eq!(dt.to_string(), "2023");
    }

    #[test]
    fn test_instant_requires_seconds_and_zone() {
        assert!(PrecisionInstant::parse("2023-03-15T10:00:00Z").is_some());
        assert!(PrecisionInstant::parse("2023-03-15T10:00:00").is_none());
        assert!(PrecisionInstant::parse("2023-03-15").is_none());
        let i = PrecisionInstant::parse("2023-03-15T10:00:00.123-05:00").unwrap();
        assert_eq!(
            i.to_evaluation_result().type_info().map(|t| t.name.as_str()),
            Some("instant")
        );
    }
}
