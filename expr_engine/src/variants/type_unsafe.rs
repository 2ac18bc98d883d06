use super::error::{VariantError, VariantResult};
use super::operations::VariantOperations;
use super::variant::Variant;
use super::variant_type::VariantType;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Permissive strategy: everything the type-safe strategy allows, plus
/// string parsing and formatting, numeric/boolean and numeric/time
/// conversions in milliseconds, zero values for Null, and JSON objects
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeUnsafeVariantOperations;

impl TypeUnsafeVariantOperations {
    pub fn new() -> Self {
        Self
    }
}

fn unsupported(value: &Variant, to: VariantType) -> VariantError {
    VariantError::UnsupportedConversion {
        from: value.kind(),
        to,
    }
}

fn failed(text: &str, to: VariantType) -> VariantError {
    VariantError::ConversionFailed {
        value: text.to_string(),
        to,
    }
}

fn datetime_from_millis(ms: i64, value: &Variant) -> VariantResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| failed(&value.to_string(), VariantType::DateTime))
}

fn timespan_from_millis(ms: i64, value: &Variant) -> VariantResult<Duration> {
    Duration::try_milliseconds(ms).ok_or_else(|| failed(&value.to_string(), VariantType::TimeSpan))
}

/// RFC 3339 first, then a bare date or a space-separated date and time (UTC)
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&parsed));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| Utc.from_utc_datetime(&parsed))
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "f" | "n" => Some(false),
        _ => None,
    }
}

/// Numeric view used by the integer, float and time targets
fn as_f64(value: &Variant) -> Option<f64> {
    match value {
        Variant::Integer(v) => Some(f64::from(*v)),
        Variant::Long(v) => Some(*v as f64),
        Variant::Float(v) => Some(f64::from(*v)),
        Variant::Double(v) => Some(*v),
        Variant::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
        Variant::DateTime(v) => Some(v.timestamp_millis() as f64),
        Variant::TimeSpan(v) => Some(v.num_milliseconds() as f64),
        _ => None,
    }
}

fn as_i64(value: &Variant) -> Option<i64> {
    match value {
        Variant::Integer(v) => Some(i64::from(*v)),
        Variant::Long(v) => Some(*v),
        Variant::Boolean(v) => Some(i64::from(*v)),
        Variant::DateTime(v) => Some(v.timestamp_millis()),
        Variant::TimeSpan(v) => Some(v.num_milliseconds()),
        Variant::Float(_) | Variant::Double(_) => as_f64(value).map(|f| f.trunc() as i64),
        _ => None,
    }
}

fn parse_i64(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|f| f.trunc() as i64))
}

impl TypeUnsafeVariantOperations {
    fn to_integer(&self, value: &Variant) -> VariantResult<Variant> {
        let wide = match value {
            Variant::Null => Some(0),
            Variant::String(s) => Some(parse_i64(s).ok_or_else(|| failed(s, VariantType::Integer))?),
            other => as_i64(other),
        };
        wide.map(|v| Variant::Integer(v as i32))
            .ok_or_else(|| unsupported(value, VariantType::Integer))
    }

    fn to_long(&self, value: &Variant) -> VariantResult<Variant> {
        let wide = match value {
            Variant::Null => Some(0),
            Variant::String(s) => Some(parse_i64(s).ok_or_else(|| failed(s, VariantType::Long))?),
            other => as_i64(other),
        };
        wide.map(Variant::Long)
            .ok_or_else(|| unsupported(value, VariantType::Long))
    }

    fn to_double(&self, value: &Variant, target: VariantType) -> VariantResult<f64> {
        match value {
            Variant::Null => Ok(0.0),
            Variant::String(s) => s.trim().parse::<f64>().map_err(|_| failed(s, target)),
            other => as_f64(other).ok_or_else(|| unsupported(value, target)),
        }
    }

    fn to_boolean(&self, value: &Variant) -> VariantResult<Variant> {
        let result = match value {
            Variant::Null => false,
            Variant::Integer(v) => *v != 0,
            Variant::Long(v) => *v != 0,
            Variant::Float(v) => *v != 0.0,
            Variant::Double(v) => *v != 0.0,
            Variant::TimeSpan(v) => !v.is_zero(),
            Variant::String(s) => parse_boolean(s).ok_or_else(|| failed(s, VariantType::Boolean))?,
            _ => return Err(unsupported(value, VariantType::Boolean)),
        };
        Ok(Variant::Boolean(result))
    }

    fn to_datetime(&self, value: &Variant) -> VariantResult<Variant> {
        let result = match value {
            Variant::Null => datetime_from_millis(0, value)?,
            Variant::Integer(_) | Variant::Long(_) | Variant::Float(_) | Variant::Double(_) => {
                let ms = as_i64(value).unwrap_or_default();
                datetime_from_millis(ms, value)?
            }
            Variant::String(s) => parse_datetime(s).ok_or_else(|| failed(s, VariantType::DateTime))?,
            _ => return Err(unsupported(value, VariantType::DateTime)),
        };
        Ok(Variant::DateTime(result))
    }

    fn to_timespan(&self, value: &Variant) -> VariantResult<Variant> {
        let result = match value {
            Variant::Null => Duration::zero(),
            Variant::Integer(_) | Variant::Long(_) | Variant::Float(_) | Variant::Double(_) => {
                let ms = as_i64(value).unwrap_or_default();
                timespan_from_millis(ms, value)?
            }
            Variant::String(s) => {
                let ms = parse_i64(s).ok_or_else(|| failed(s, VariantType::TimeSpan))?;
                timespan_from_millis(ms, value)?
            }
            _ => return Err(unsupported(value, VariantType::TimeSpan)),
        };
        Ok(Variant::TimeSpan(result))
    }

    fn to_array(&self, value: &Variant) -> VariantResult<Variant> {
        match value {
            Variant::Null => Ok(Variant::Array(Vec::new())),
            Variant::Object(json) if json.is_array() => Ok(Variant::from_json(json)),
            _ => Err(unsupported(value, VariantType::Array)),
        }
    }
}

impl VariantOperations for TypeUnsafeVariantOperations {
    fn convert(&self, value: &Variant, target: VariantType) -> VariantResult<Variant> {
        if value.kind() == target {
            return Ok(value.clone());
        }

        // A scalar held in a JSON object converts like the scalar itself
        if let Variant::Object(json) = value {
            if !json.is_object() && !json.is_array() && target != VariantType::String {
                return self.convert(&Variant::from_json(json), target);
            }
        }

        match target {
            VariantType::Null => Ok(Variant::Null),
            VariantType::Integer => self.to_integer(value),
            VariantType::Long => self.to_long(value),
            VariantType::Float => self
                .to_double(value, target)
                .map(|v| Variant::Float(v as f32)),
            VariantType::Double => self.to_double(value, target).map(Variant::Double),
            VariantType::String => Ok(Variant::String(value.to_string())),
            VariantType::Boolean => self.to_boolean(value),
            VariantType::DateTime => self.to_datetime(value),
            VariantType::TimeSpan => self.to_timespan(value),
            VariantType::Object => Ok(Variant::Object(value.to_json())),
            VariantType::Array => self.to_array(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn ops() -> TypeUnsafeVariantOperations {
        TypeUnsafeVariantOperations::new()
    }

    fn convert(value: Variant, target: VariantType) -> VariantResult<Variant> {
        ops().convert(&value, target)
    }

    #[test]
    fn test_null_zero_values() {
        assert_eq!(convert(Variant::Null, VariantType::Integer), Ok(Variant::Integer(0)));
        assert_eq!(convert(Variant::Null, VariantType::Boolean), Ok(Variant::Boolean(false)));
        assert_eq!(
            convert(Variant::Null, VariantType::String),
            Ok(Variant::from_string("null"))
        );
        assert_eq!(
            convert(Variant::Null, VariantType::DateTime),
            Ok(Variant::DateTime(Utc.timestamp_millis_opt(0).unwrap()))
        );
        assert_eq!(
            convert(Variant::Null, VariantType::TimeSpan),
            Ok(Variant::TimeSpan(Duration::zero()))
        );
        assert_eq!(convert(Variant::Null, VariantType::Array), Ok(Variant::Array(vec![])));
        assert_eq!(
            convert(Variant::Null, VariantType::Object),
            Ok(Variant::Object(json!(null)))
        );
    }

    #[test]
    fn test_string_parsing() {
        assert_eq!(
            convert(Variant::from_string(" 42 "), VariantType::Integer),
            Ok(Variant::Integer(42))
        );
        assert_eq!(
            convert(Variant::from_string("2.5"), VariantType::Double),
            Ok(Variant::Double(2.5))
        );
        assert_eq!(
            convert(Variant::from_string("Yes"), VariantType::Boolean),
            Ok(Variant::Boolean(true))
        );
        assert_eq!(
            convert(Variant::from_string("2024-01-02"), VariantType::DateTime),
            Ok(Variant::DateTime(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()))
        );
        assert_eq!(
            convert(
                Variant::from_string("2024-01-02T03:04:05+02:00"),
                VariantType::DateTime
            ),
            Ok(Variant::DateTime(Utc.with_ymd_and_hms(2024, 1, 2, 1, 4, 5).unwrap()))
        );
    }

    #[test]
    fn test_unparseable_string() {
        assert_matches!(
            convert(Variant::from_string("abc"), VariantType::Integer),
            Err(VariantError::ConversionFailed { to: VariantType::Integer, .. })
        );
        assert_matches!(
            convert(Variant::from_string("maybe"), VariantType::Boolean),
            Err(VariantError::ConversionFailed { .. })
        );
    }

    #[test]
    fn test_formatting_to_string() {
        assert_eq!(
            convert(Variant::Integer(123), VariantType::String),
            Ok(Variant::from_string("123"))
        );
        assert_eq!(
            convert(Variant::Boolean(true), VariantType::String),
            Ok(Variant::from_string("true"))
        );
        assert_eq!(
            convert(Variant::Object(json!({"a": 1})), VariantType::String),
            Ok(Variant::from_string("{\"a\":1}"))
        );
    }

    #[test]
    fn test_numeric_time_conversions() {
        assert_eq!(
            convert(Variant::Long(1500), VariantType::TimeSpan),
            Ok(Variant::TimeSpan(Duration::milliseconds(1500)))
        );
        assert_eq!(
            convert(Variant::TimeSpan(Duration::seconds(2)), VariantType::Long),
            Ok(Variant::Long(2000))
        );
        assert_eq!(
            convert(Variant::Integer(86_400_000), VariantType::DateTime),
            Ok(Variant::DateTime(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_narrowing_truncates() {
        assert_eq!(convert(Variant::Double(2.9), VariantType::Integer), Ok(Variant::Integer(2)));
        assert_eq!(convert(Variant::Boolean(true), VariantType::Double), Ok(Variant::Double(1.0)));
        assert_eq!(convert(Variant::Integer(0), VariantType::Boolean), Ok(Variant::Boolean(false)));
    }

    #[test]
    fn test_json_scalars_convert_like_scalars() {
        assert_eq!(
            convert(Variant::Object(json!(7)), VariantType::Integer),
            Ok(Variant::Integer(7))
        );
        assert_eq!(
            convert(Variant::Object(json!([1, 2])), VariantType::Array),
            Ok(Variant::Array(vec![Variant::Integer(1), Variant::Integer(2)]))
        );
        assert_eq!(
            convert(Variant::Array(vec![Variant::Integer(1)]), VariantType::Object),
            Ok(Variant::Object(json!([1])))
        );
    }

    #[test]
    fn test_unsupported_targets() {
        assert_matches!(
            convert(Variant::Array(vec![]), VariantType::Integer),
            Err(VariantError::UnsupportedConversion { .. })
        );
        assert_matches!(
            convert(Variant::Boolean(true), VariantType::DateTime),
            Err(VariantError::UnsupportedConversion { .. })
        );
    }
}
