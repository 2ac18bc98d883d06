//! Built-in function library

use super::error::{CalculationError, CalculationResult};
use super::functions::{DelegatedFunction, FunctionCollection};
use crate::variants::{Variant, VariantError, VariantOperations, VariantType};
use chrono::{Datelike, Duration, TimeZone, Utc};

type Body = fn(&[Variant], &dyn VariantOperations) -> CalculationResult<Variant>;

/// Register every built-in function on `collection`
pub fn register_defaults(collection: &mut FunctionCollection) {
    let table: &[(&str, Body)] = &[
        ("Ticks", ticks),
        ("TimeSpan", time_span),
        ("Now", now),
        ("Date", date),
        ("DayOfWeek", day_of_week),
        ("Min", min),
        ("Max", max),
        ("Sum", sum),
        ("If", if_),
        ("Choose", choose),
        ("E", |p, _| constant("E", p, std::f64::consts::E)),
        ("Pi", |p, _| constant("Pi", p, std::f64::consts::PI)),
        ("Rnd", random),
        ("Random", random),
        ("Abs", abs),
        ("Acos", |p, o| math("Acos", p, o, f64::acos)),
        ("Asin", |p, o| math("Asin", p, o, f64::asin)),
        ("Atan", |p, o| math("Atan", p, o, f64::atan)),
        ("Exp", |p, o| math("Exp", p, o, f64::exp)),
        ("Log", |p, o| math("Log", p, o, f64::ln)),
        ("Ln", |p, o| math("Ln", p, o, f64::ln)),
        ("Log10", |p, o| math("Log10", p, o, f64::log10)),
        ("Ceil", |p, o| math("Ceil", p, o, f64::ceil)),
        ("Ceiling", |p, o| math("Ceiling", p, o, f64::ceil)),
        ("Floor", |p, o| math("Floor", p, o, f64::floor)),
        ("Round", |p, o| math("Round", p, o, f64::round)),
        ("Trunc", |p, o| math("Trunc", p, o, f64::trunc)),
        ("Truncate", |p, o| math("Truncate", p, o, f64::trunc)),
        ("Cos", |p, o| math("Cos", p, o, f64::cos)),
        ("Sin", |p, o| math("Sin", p, o, f64::sin)),
        ("Tan", |p, o| math("Tan", p, o, f64::tan)),
        ("Sqr", |p, o| math("Sqr", p, o, f64::sqrt)),
        ("Sqrt", |p, o| math("Sqrt", p, o, f64::sqrt)),
        ("Empty", empty),
        ("Null", null),
        ("Contains", contains),
        ("Array", array),
    ];

    for (name, body) in table {
        collection.add(DelegatedFunction::new(*name, *body));
    }
}

fn expect_count(
    function: &str,
    params: &[Variant],
    expected: &'static str,
    accept: impl Fn(usize) -> bool,
) -> CalculationResult<()> {
    if accept(params.len()) {
        Ok(())
    } else {
        Err(CalculationError::wrong_param_count(function, expected, params.len()))
    }
}

fn to_long(ops: &dyn VariantOperations, value: &Variant) -> CalculationResult<i64> {
    Ok(ops.convert(value, VariantType::Long)?.as_long()?)
}

fn to_integer(ops: &dyn VariantOperations, value: &Variant) -> CalculationResult<i32> {
    Ok(ops.convert(value, VariantType::Integer)?.as_integer()?)
}

fn to_double(ops: &dyn VariantOperations, value: &Variant) -> CalculationResult<f64> {
    Ok(ops.convert(value, VariantType::Double)?.as_double()?)
}

fn out_of_range(value: impl ToString, to: VariantType) -> CalculationError {
    VariantError::ConversionFailed {
        value: value.to_string(),
        to,
    }
    .into()
}

fn ticks(params: &[Variant], _: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Ticks", params, "0", |n| n == 0)?;
    Ok(Variant::Long(Utc::now().timestamp_millis()))
}

/// `TimeSpan(ms)` or `TimeSpan(days, hours, minutes[, seconds[, ms]])`
fn time_span(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("TimeSpan", params, "1, 3, 4 or 5", |n| matches!(n, 1 | 3..=5))?;

    if params.len() == 1 {
        let ms = to_long(ops, &params[0])?;
        return Duration::try_milliseconds(ms)
            .map(Variant::TimeSpan)
            .ok_or_else(|| out_of_range(ms, VariantType::TimeSpan));
    }

    let days = to_long(ops, &params[0])?;
    let hours = to_long(ops, &params[1])?;
    let minutes = to_long(ops, &params[2])?;
    let seconds = params.get(3).map(|p| to_long(ops, p)).transpose()?.unwrap_or(0);
    let ms = params.get(4).map(|p| to_long(ops, p)).transpose()?.unwrap_or(0);

    let total = [
        Duration::try_days(days),
        Duration::try_hours(hours),
        Duration::try_minutes(minutes),
        Duration::try_seconds(seconds),
        Duration::try_milliseconds(ms),
    ]
    .into_iter()
    .try_fold(Duration::zero(), |acc, part| part.and_then(|part| acc.checked_add(&part)));

    total
        .map(Variant::TimeSpan)
        .ok_or_else(|| {
            let parts = format!("{}d {}h {}m {}s {}ms", days, hours, minutes, seconds, ms);
            out_of_range(parts, VariantType::TimeSpan)
        })
}

fn now(params: &[Variant], _: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Now", params, "0", |n| n == 0)?;
    Ok(Variant::DateTime(Utc::now()))
}

/// `Date(ms)` or `Date(year, month[, day[, hour[, minute[, second[, ms]]]]])` in UTC
fn date(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Date", params, "1 to 7", |n| (1..=7).contains(&n))?;

    if params.len() == 1 {
        let ms = to_long(ops, &params[0])?;
        return Utc
            .timestamp_millis_opt(ms)
            .single()
            .map(Variant::DateTime)
            .ok_or_else(|| out_of_range(ms, VariantType::DateTime));
    }

    let mut parts = [0i32; 7];
    parts[2] = 1;
    for (slot, param) in parts.iter_mut().zip(params) {
        *slot = to_integer(ops, param)?;
    }
    let [year, month, day, hour, minute, second, ms] = parts;

    let unsigned = |value: i32| u32::try_from(value).ok();
    let base = (|| {
        Utc.with_ymd_and_hms(
            year,
            unsigned(month)?,
            unsigned(day)?,
            unsigned(hour)?,
            unsigned(minute)?,
            unsigned(second)?,
        )
        .single()
    })();

    base.and_then(|base| base.checked_add_signed(Duration::try_milliseconds(i64::from(ms))?))
        .map(Variant::DateTime)
        .ok_or_else(|| out_of_range(format!("{:?}", parts), VariantType::DateTime))
}

/// 0 for Sunday through 6 for Saturday
fn day_of_week(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("DayOfWeek", params, "1", |n| n == 1)?;
    let date = ops.convert(&params[0], VariantType::DateTime)?.as_datetime()?;
    Ok(Variant::Integer(date.weekday().num_days_from_sunday() as i32))
}

fn extreme(
    function: &str,
    params: &[Variant],
    beats: impl Fn(&Variant, &Variant) -> CalculationResult<Variant>,
) -> CalculationResult<Variant> {
    expect_count(function, params, "at least 2", |n| n >= 2)?;

    let mut result = params[0].clone();
    for candidate in &params[1..] {
        if beats(candidate, &result)? == Variant::Boolean(true) {
            result = candidate.clone();
        }
    }
    Ok(result)
}

fn min(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    extreme("Min", params, |a, b| Ok(ops.less(a, b)?))
}

fn max(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    extreme("Max", params, |a, b| Ok(ops.more(a, b)?))
}

fn sum(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Sum", params, "at least 2", |n| n >= 2)?;

    let mut result = params[0].clone();
    for value in &params[1..] {
        result = ops.add(&result, value)?;
    }
    Ok(result)
}

/// A Null condition selects the else branch
fn if_(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("If", params, "3", |n| n == 3)?;

    let condition = match &params[0] {
        Variant::Null => false,
        value => ops.convert(value, VariantType::Boolean)?.as_boolean()?,
    };
    Ok(if condition { params[1].clone() } else { params[2].clone() })
}

/// 1-based pick among the arguments after the index; Null when out of range
fn choose(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Choose", params, "at least 3", |n| n >= 3)?;

    let index = to_integer(ops, &params[0])?;
    let choice = usize::try_from(index)
        .ok()
        .filter(|i| *i >= 1)
        .and_then(|i| params.get(i));
    Ok(choice.cloned().unwrap_or(Variant::Null))
}

fn constant(function: &str, params: &[Variant], value: f64) -> CalculationResult<Variant> {
    expect_count(function, params, "0", |n| n == 0)?;
    Ok(Variant::Double(value))
}

fn random(params: &[Variant], _: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Rnd", params, "0", |n| n == 0)?;
    Ok(Variant::Double(rand::random::<f64>()))
}

/// Keeps the numeric kind; other kinds go through Double
fn abs(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Abs", params, "1", |n| n == 1)?;

    Ok(match &params[0] {
        Variant::Null => Variant::Null,
        Variant::Integer(v) => Variant::Integer(v.wrapping_abs()),
        Variant::Long(v) => Variant::Long(v.wrapping_abs()),
        Variant::Float(v) => Variant::Float(v.abs()),
        Variant::Double(v) => Variant::Double(v.abs()),
        Variant::TimeSpan(v) => Variant::TimeSpan(v.abs()),
        other => Variant::Double(to_double(ops, other)?.abs()),
    })
}

fn math(
    function: &str,
    params: &[Variant],
    ops: &dyn VariantOperations,
    apply: fn(f64) -> f64,
) -> CalculationResult<Variant> {
    expect_count(function, params, "1", |n| n == 1)?;

    if params[0].is_null() {
        return Ok(Variant::Null);
    }
    Ok(Variant::Double(apply(to_double(ops, &params[0])?)))
}

fn empty(params: &[Variant], _: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Empty", params, "1", |n| n == 1)?;
    Ok(Variant::Boolean(params[0].is_empty()))
}

fn null(params: &[Variant], _: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Null", params, "0", |n| n == 0)?;
    Ok(Variant::Null)
}

/// Substring test on strings, membership on arrays
fn contains(params: &[Variant], ops: &dyn VariantOperations) -> CalculationResult<Variant> {
    expect_count("Contains", params, "2", |n| n == 2)?;

    let (container, item) = (&params[0], &params[1]);
    if container.is_null() || item.is_null() {
        return Ok(Variant::Null);
    }

    match container {
        Variant::Array(_) => Ok(ops.in_(container, item)?),
        _ => {
            let text = ops.convert(container, VariantType::String)?;
            let part = ops.convert(item, VariantType::String)?;
            Ok(Variant::Boolean(text.as_string()?.contains(part.as_string()?)))
        }
    }
}

fn array(params: &[Variant], _: &dyn VariantOperations) -> CalculationResult<Variant> {
    Ok(Variant::Array(params.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::{TypeSafeVariantOperations, TypeUnsafeVariantOperations};
    use assert_matches::assert_matches;
    use futures::executor::block_on;

    fn call(name: &str, params: &[Variant]) -> CalculationResult<Variant> {
        let functions = FunctionCollection::with_default_functions();
        let ops = TypeUnsafeVariantOperations::new();
        let function = functions.find(name).expect("registered");
        block_on(function.calculate(params, &ops))
    }

    fn ints(values: &[i32]) -> Vec<Variant> {
        values.iter().map(|v| Variant::Integer(*v)).collect()
    }

    #[test]
    fn test_min_max_sum() {
        assert_eq!(call("Max", &ints(&[-123, 1])), Ok(Variant::Integer(1)));
        assert_eq!(call("Min", &ints(&[4, -2, 9])), Ok(Variant::Integer(-2)));
        assert_eq!(call("Sum", &ints(&[1, 2, 3])), Ok(Variant::Integer(6)));
        assert_matches!(
            call("Max", &ints(&[1])),
            Err(CalculationError::WrongParamCount { actual: 1, .. })
        );
    }

    #[test]
    fn test_time_span_arities() {
        assert_eq!(
            call("TimeSpan", &ints(&[1500])),
            Ok(Variant::TimeSpan(Duration::milliseconds(1500)))
        );
        assert_eq!(
            call("TimeSpan", &ints(&[1, 2, 3])),
            Ok(Variant::TimeSpan(
                Duration::days(1) + Duration::hours(2) + Duration::minutes(3)
            ))
        );
        assert_eq!(
            call("TimeSpan", &ints(&[0, 0, 0, 4, 5])),
            Ok(Variant::TimeSpan(Duration::seconds(4) + Duration::milliseconds(5)))
        );
        assert_matches!(
            call("TimeSpan", &ints(&[1, 2])),
            Err(CalculationError::WrongParamCount { expected: "1, 3, 4 or 5", .. })
        );
    }

    #[test]
    fn test_date_construction() {
        assert_eq!(
            call("Date", &ints(&[2024, 2])),
            Ok(Variant::DateTime(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(
            call("Date", &ints(&[2024, 2, 29, 13, 30, 15, 250])),
            Ok(Variant::DateTime(
                Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 15).unwrap() + Duration::milliseconds(250)
            ))
        );
        assert_eq!(
            call("Date", &ints(&[0])),
            Ok(Variant::DateTime(Utc.timestamp_millis_opt(0).unwrap()))
        );
        assert_matches!(
            call("Date", &ints(&[2023, 2, 30])),
            Err(CalculationError::Operation(VariantError::ConversionFailed { .. }))
        );
    }

    #[test]
    fn test_day_of_week() {
        let sunday = Variant::DateTime(Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap());
        let saturday = Variant::DateTime(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap());

        assert_eq!(call("DayOfWeek", &[sunday]), Ok(Variant::Integer(0)));
        assert_eq!(call("DayOfWeek", &[saturday]), Ok(Variant::Integer(6)));
    }

    #[test]
    fn test_if_and_choose() {
        let branches = |condition: Variant| vec![condition, "yes".into(), "no".into()];

        assert_eq!(call("If", &branches(true.into())), Ok("yes".into()));
        assert_eq!(call("If", &branches(Variant::Null)), Ok("no".into()));
        assert_eq!(call("If", &branches(0.into())), Ok("no".into()));

        let options: Vec<Variant> = vec![2.into(), "a".into(), "b".into(), "c".into()];
        assert_eq!(call("Choose", &options), Ok("b".into()));

        let options: Vec<Variant> = vec![9.into(), "a".into(), "b".into()];
        assert_eq!(call("Choose", &options), Ok(Variant::Null));
    }

    #[test]
    fn test_math_family() {
        assert_eq!(call("Sqrt", &ints(&[9])), Ok(Variant::Double(3.0)));
        assert_eq!(call("Round", &[Variant::Double(2.5)]), Ok(Variant::Double(3.0)));
        assert_eq!(call("Truncate", &[Variant::Double(-2.7)]), Ok(Variant::Double(-2.0)));
        assert_eq!(call("Log10", &ints(&[1000])), Ok(Variant::Double(3.0)));
        assert_eq!(call("Abs", &ints(&[-4])), Ok(Variant::Integer(4)));
        assert_eq!(call("Pi", &[]), Ok(Variant::Double(std::f64::consts::PI)));
        assert_eq!(call("Cos", &[Variant::Null]), Ok(Variant::Null));
        assert_matches!(
            call("Sin", &ints(&[1, 2])),
            Err(CalculationError::WrongParamCount { .. })
        );
    }

    #[test]
    fn test_random_range() {
        for name in ["Rnd", "Random"] {
            let value = call(name, &[]).unwrap().as_double().unwrap();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_contains_and_array() {
        assert_eq!(
            call("Contains", &[Variant::from_string("abcdef"), Variant::from_string("cde")]),
            Ok(Variant::Boolean(true))
        );
        let items = call("Array", &ints(&[1, 2, 3])).unwrap();
        assert_eq!(items, Variant::Array(ints(&[1, 2, 3])));
        assert_eq!(
            call("Contains", &[items, 4.into()]),
            Ok(Variant::Boolean(false))
        );
        assert_eq!(call("Array", &[]), Ok(Variant::Array(vec![])));
    }

    #[test]
    fn test_empty_and_null() {
        assert_eq!(call("Null", &[]), Ok(Variant::Null));
        assert_eq!(call("Empty", &[Variant::Null]), Ok(Variant::Boolean(true)));
        assert_eq!(call("Empty", &[Variant::from_string("")]), Ok(Variant::Boolean(false)));
    }

    #[test]
    fn test_type_safe_strategy_is_used() {
        let functions = FunctionCollection::with_default_functions();
        let ops = TypeSafeVariantOperations::new();
        let function = functions.find("Sqrt").expect("registered");

        assert_matches!(
            block_on(function.calculate(&[Variant::from_string("9")], &ops)),
            Err(CalculationError::Operation(VariantError::UnsupportedConversion { .. }))
        );
    }
}
