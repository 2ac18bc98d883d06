//! Dynamically typed value used by the parser and the calculator

use super::error::{VariantError, VariantResult};
use super::variant_type::VariantType;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;
use std::fmt;

/// A value of one of eleven kinds; the payload always matches the kind
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Null,
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    TimeSpan(Duration),
    Object(Value),
    Array(Vec<Variant>),
}

impl Variant {
    pub fn from_integer(value: i32) -> Self {
        Variant::Integer(value)
    }

    pub fn from_long(value: i64) -> Self {
        Variant::Long(value)
    }

    pub fn from_float(value: f32) -> Self {
        Variant::Float(value)
    }

    pub fn from_double(value: f64) -> Self {
        Variant::Double(value)
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Variant::String(value.into())
    }

    pub fn from_boolean(value: bool) -> Self {
        Variant::Boolean(value)
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Variant::DateTime(value)
    }

    pub fn from_timespan(value: Duration) -> Self {
        Variant::TimeSpan(value)
    }

    pub fn from_object(value: Value) -> Self {
        Variant::Object(value)
    }

    pub fn from_array(values: Vec<Variant>) -> Self {
        Variant::Array(values)
    }

    pub fn kind(&self) -> VariantType {
        match self {
            Variant::Null => VariantType::Null,
            Variant::Integer(_) => VariantType::Integer,
            Variant::Long(_) => VariantType::Long,
            Variant::Float(_) => VariantType::Float,
            Variant::Double(_) => VariantType::Double,
            Variant::String(_) => VariantType::String,
            Variant::Boolean(_) => VariantType::Boolean,
            Variant::DateTime(_) => VariantType::DateTime,
            Variant::TimeSpan(_) => VariantType::TimeSpan,
            Variant::Object(_) => VariantType::Object,
            Variant::Array(_) => VariantType::Array,
        }
    }

    /// True for the Null kind
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// True when there is no payload: Null, or an Object holding JSON null
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Null | Variant::Object(Value::Null))
    }

    fn wrong_kind(&self, expected: VariantType) -> VariantError {
        VariantError::WrongKind {
            expected,
            actual: self.kind(),
        }
    }

    pub fn as_integer(&self) -> VariantResult<i32> {
        match self {
            Variant::Integer(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::Integer)),
        }
    }

    pub fn as_long(&self) -> VariantResult<i64> {
        match self {
            Variant::Long(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::Long)),
        }
    }

    pub fn as_float(&self) -> VariantResult<f32> {
        match self {
            Variant::Float(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::Float)),
        }
    }

    pub fn as_double(&self) -> VariantResult<f64> {
        match self {
            Variant::Double(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::Double)),
        }
    }

    pub fn as_string(&self) -> VariantResult<&str> {
        match self {
            Variant::String(value) => Ok(value),
            _ => Err(self.wrong_kind(VariantType::String)),
        }
    }

    pub fn as_boolean(&self) -> VariantResult<bool> {
        match self {
            Variant::Boolean(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::Boolean)),
        }
    }

    pub fn as_datetime(&self) -> VariantResult<DateTime<Utc>> {
        match self {
            Variant::DateTime(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::DateTime)),
        }
    }

    pub fn as_timespan(&self) -> VariantResult<Duration> {
        match self {
            Variant::TimeSpan(value) => Ok(*value),
            _ => Err(self.wrong_kind(VariantType::TimeSpan)),
        }
    }

    pub fn as_object(&self) -> VariantResult<&Value> {
        match self {
            Variant::Object(value) => Ok(value),
            _ => Err(self.wrong_kind(VariantType::Object)),
        }
    }

    pub fn as_array(&self) -> VariantResult<&[Variant]> {
        match self {
            Variant::Array(values) => Ok(values),
            _ => Err(self.wrong_kind(VariantType::Array)),
        }
    }

    /// Build a variant from JSON
    ///
    /// Numbers become Integer when they fit, then Long, then Double. JSON
    /// objects stay Objects; JSON arrays become Arrays.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Variant::Null,
            Value::Bool(b) => Variant::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Variant::Integer(small),
                        Err(_) => Variant::Long(i),
                    }
                } else {
                    Variant::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Variant::String(s.clone()),
            Value::Array(items) => Variant::Array(items.iter().map(Variant::from_json).collect()),
            Value::Object(_) => Variant::Object(value.clone()),
        }
    }

    /// JSON form; dates become RFC 3339 strings, time spans milliseconds
    pub fn to_json(&self) -> Value {
        match self {
            Variant::Null => Value::Null,
            Variant::Integer(v) => Value::from(*v),
            Variant::Long(v) => Value::from(*v),
            Variant::Float(v) => serde_json::Number::from_f64(f64::from(*v))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Variant::Double(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Variant::String(s) => Value::String(s.clone()),
            Variant::Boolean(b) => Value::Bool(*b),
            Variant::DateTime(d) => Value::String(format_datetime(d)),
            Variant::TimeSpan(d) => Value::from(d.num_milliseconds()),
            Variant::Object(v) => v.clone(),
            Variant::Array(items) => Value::Array(items.iter().map(Variant::to_json).collect()),
        }
    }
}

pub(crate) fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => f.write_str("null"),
            Variant::Integer(v) => write!(f, "{}", v),
            Variant::Long(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Double(v) => write!(f, "{}", v),
            Variant::String(s) => f.write_str(s),
            Variant::Boolean(b) => write!(f, "{}", b),
            Variant::DateTime(d) => f.write_str(&format_datetime(d)),
            Variant::TimeSpan(d) => write!(f, "{}", d.num_milliseconds()),
            Variant::Object(v) => write!(f, "{}", v),
            Variant::Array(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Integer(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Long(value)
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Variant::Float(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Double(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Boolean(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<DateTime<Utc>> for Variant {
    fn from(value: DateTime<Utc>) -> Self {
        Variant::DateTime(value)
    }
}

impl From<Duration> for Variant {
    fn from(value: Duration) -> Self {
        Variant::TimeSpan(value)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(values: Vec<Variant>) -> Self {
        Variant::Array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_kind_matches_payload() {
        assert_eq!(Variant::from_integer(1).kind(), VariantType::Integer);
        assert_eq!(Variant::from_string("a").kind(), VariantType::String);
        assert_eq!(Variant::default().kind(), VariantType::Null);
    }

    #[test]
    fn test_checked_extraction() {
        let value = Variant::from_long(7);

        assert_eq!(value.as_long(), Ok(7));
        assert_matches!(
            value.as_integer(),
            Err(VariantError::WrongKind {
                expected: VariantType::Integer,
                actual: VariantType::Long
            })
        );
        assert_eq!(Variant::from_string("x").as_string(), Ok("x"));
    }

    #[test]
    fn test_null_and_empty() {
        assert!(Variant::Null.is_null());
        assert!(Variant::Null.is_empty());
        assert!(Variant::Object(Value::Null).is_empty());
        assert!(!Variant::Object(Value::Null).is_null());
        assert!(!Variant::from_string("").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::from_double(4.0).to_string(), "4");
        assert_eq!(Variant::from_double(2.5).to_string(), "2.5");
        assert_eq!(Variant::Null.to_string(), "null");
        assert_eq!(
            Variant::from_array(vec![1.into(), "a".into()]).to_string(),
            "[1,\"a\"]"
        );

        let date = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert_eq!(
            Variant::from_datetime(date).to_string(),
            "2024-02-29T12:00:00.000Z"
        );
        assert_eq!(
            Variant::from_timespan(Duration::seconds(2)).to_string(),
            "2000"
        );
    }

    #[test]
    fn test_from_json_number_widths() {
        assert_eq!(Variant::from_json(&json!(5)), Variant::Integer(5));
        assert_eq!(
            Variant::from_json(&json!(5_000_000_000i64)),
            Variant::Long(5_000_000_000)
        );
        assert_eq!(Variant::from_json(&json!(1.5)), Variant::Double(1.5));
    }

    #[test]
    fn test_json_bridge() {
        let value = json!({"name": "x", "tags": [1, 2]});
        let variant = Variant::from_json(&value);

        assert_eq!(variant.kind(), VariantType::Object);
        assert_eq!(variant.to_json(), value);

        let array = Variant::from_json(&json!([1, "two", null]));
        assert_eq!(
            array,
            Variant::Array(vec![
                Variant::Integer(1),
                Variant::from_string("two"),
                Variant::Null
            ])
        );
        assert_eq!(array.to_json(), json!([1, "two", null]));
    }
}
