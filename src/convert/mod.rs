//! Field conversion: applying one action to one cell value.
//!
//! [`convert`] turns the raw string cell into a typed [`FieldValue`], or
//! reports a [`ConvertError`] carrying the offending value. Null values
//! produced by short-row padding never reach this layer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::actions::Action;
use crate::error::{ConvertError, ConvertResult};

// =============================================================================
// FieldValue
// =============================================================================

/// A single record field after materialization and (optional) conversion.
///
/// Serializes to JSON as `null`, string, or number; dates use ISO-8601.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Padding for a missing cell in a short row.
    Null,
    /// An unconverted (or deliberately untyped) cell.
    Text(String),
    /// Result of a `float` action.
    Float(f64),
    /// Result of an `int` action.
    Int(i64),
    /// Result of a `date` action.
    Date(NaiveDateTime),
}

impl FieldValue {
    /// Whether this is the null padding value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The raw text, if this field is still unconverted.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Apply one action to one cell value.
///
/// # Example
/// ```
/// use csv2mongo::{convert, Action, FieldValue};
///
/// let value = convert("30", &Action::Int).unwrap();
/// assert_eq!(value, FieldValue::Int(30));
///
/// assert!(convert("abc", &Action::Float).is_err());
/// ```
pub fn convert(value: &str, action: &Action) -> ConvertResult<FieldValue> {
    match action {
        Action::Float => value
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|source| ConvertError::Float {
                value: value.to_string(),
                source,
            }),

        Action::Int => value
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|source| ConvertError::Int {
                value: value.to_string(),
                source,
            }),

        Action::Date { format } => parse_datetime(value, format)
            .map(FieldValue::Date)
            .map_err(|source| ConvertError::Date {
                value: value.to_string(),
                format: format.clone(),
                source,
            }),
    }
}

/// Parse a datetime, accepting date-only formats at midnight.
///
/// strptime-style tools resolve a date-only format to 00:00:00; chrono
/// splits that into two parse entry points, so try the full datetime
/// first and fall back to a bare date.
fn parse_datetime(value: &str, format: &str) -> Result<NaiveDateTime, chrono::format::ParseError> {
    NaiveDateTime::parse_from_str(value, format).or_else(|err| {
        NaiveDate::parse_from_str(value, format)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_conversion() {
        assert_eq!(convert("3.25", &Action::Float).unwrap(), FieldValue::Float(3.25));
        assert_eq!(convert("-7", &Action::Float).unwrap(), FieldValue::Float(-7.0));
        assert_eq!(convert("1e3", &Action::Float).unwrap(), FieldValue::Float(1000.0));
    }

    #[test]
    fn test_float_failure() {
        let err = convert("abc", &Action::Float).unwrap_err();
        assert!(matches!(err, ConvertError::Float { ref value, .. } if value == "abc"));
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(convert("30", &Action::Int).unwrap(), FieldValue::Int(30));
        assert_eq!(convert("-12", &Action::Int).unwrap(), FieldValue::Int(-12));
    }

    #[test]
    fn test_int_rejects_float_syntax() {
        assert!(convert("3.5", &Action::Int).is_err());
        assert!(convert("", &Action::Int).is_err());
    }

    #[test]
    fn test_date_with_time() {
        let action = Action::Date {
            format: "%Y-%m-%d %H:%M:%S".into(),
        };
        let value = convert("2019-07-01 12:30:00", &action).unwrap();
        let expected = NaiveDate::from_ymd_opt(2019, 7, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(value, FieldValue::Date(expected));
    }

    #[test]
    fn test_date_only_format_parses_to_midnight() {
        let action = Action::Date {
            format: "%d/%m/%Y".into(),
        };
        let value = convert("01/07/2019", &action).unwrap();
        let expected = NaiveDate::from_ymd_opt(2019, 7, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(value, FieldValue::Date(expected));
    }

    #[test]
    fn test_date_failure_keeps_format() {
        let action = Action::Date {
            format: "%Y-%m-%d".into(),
        };
        let err = convert("yesterday", &action).unwrap_err();
        assert!(
            matches!(err, ConvertError::Date { ref value, ref format, .. }
                if value == "yesterday" && format == "%Y-%m-%d")
        );
    }

    #[test]
    fn test_json_serialization() {
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&FieldValue::Text("hi".into())).unwrap(),
            "\"hi\""
        );
        assert_eq!(serde_json::to_string(&FieldValue::Int(30)).unwrap(), "30");
        assert_eq!(
            serde_json::to_string(&FieldValue::Float(2.5)).unwrap(),
            "2.5"
        );
    }
}
