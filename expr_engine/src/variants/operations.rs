//! Operator algebra over [`Variant`] values
//!
//! Every binary operator follows the same dispatch: a Null on either side
//! yields Null, otherwise the right operand is converted to the left
//! operand's kind and a kind-specific branch computes the result. `equal`
//! and `not_equal` are the exceptions and treat Null as a comparable value.
//! Implementations only decide which conversions are legal.

use super::error::{VariantError, VariantResult};
use super::variant::Variant;
use super::variant_type::VariantType;
use std::cmp::Ordering;

fn unsupported(operation: &'static str, value: &Variant) -> VariantError {
    VariantError::UnsupportedOperation {
        operation,
        kind: value.kind(),
    }
}

fn span_overflow(operation: &'static str) -> VariantError {
    VariantError::UnsupportedOperation {
        operation,
        kind: VariantType::TimeSpan,
    }
}

/// Ordering of two values of the same kind, `None` when unordered (NaN)
fn order<O: VariantOperations + ?Sized>(
    ops: &O,
    operation: &'static str,
    a: &Variant,
    b: &Variant,
) -> VariantResult<Option<Ordering>> {
    let b = ops.convert(b, a.kind())?;
    let ordering = match (a, &b) {
        (Variant::Integer(x), Variant::Integer(y)) => x.partial_cmp(y),
        (Variant::Long(x), Variant::Long(y)) => x.partial_cmp(y),
        (Variant::Float(x), Variant::Float(y)) => x.partial_cmp(y),
        (Variant::Double(x), Variant::Double(y)) => x.partial_cmp(y),
        (Variant::String(x), Variant::String(y)) => x.partial_cmp(y),
        (Variant::Boolean(x), Variant::Boolean(y)) if operation == "equal" => x.partial_cmp(y),
        (Variant::DateTime(x), Variant::DateTime(y)) => x.partial_cmp(y),
        (Variant::TimeSpan(x), Variant::TimeSpan(y)) => x.partial_cmp(y),
        _ => return Err(unsupported(operation, a)),
    };
    Ok(ordering)
}

fn compare<O: VariantOperations + ?Sized>(
    ops: &O,
    operation: &'static str,
    a: &Variant,
    b: &Variant,
    accept: impl Fn(Ordering) -> bool,
) -> VariantResult<Variant> {
    if a.is_null() || b.is_null() {
        return Ok(Variant::Null);
    }
    let ordering = order(ops, operation, a, b)?;
    Ok(Variant::Boolean(ordering.map(accept).unwrap_or(false)))
}

fn values_equal<O: VariantOperations + ?Sized>(
    ops: &O,
    a: &Variant,
    b: &Variant,
) -> VariantResult<bool> {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ok(true),
        (true, false) | (false, true) => return Ok(false),
        _ => {}
    }

    match a {
        Variant::Object(x) => {
            let b = ops.convert(b, VariantType::Object)?;
            Ok(matches!(&b, Variant::Object(y) if x == y))
        }
        Variant::Array(xs) => {
            let b = ops.convert(b, VariantType::Array)?;
            let Variant::Array(ys) = &b else {
                return Ok(false);
            };
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys) {
                if !values_equal(ops, x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(order(ops, "equal", a, b)? == Some(Ordering::Equal)),
    }
}

/// Conversion and operator strategy
///
/// Only `convert` is required; every operator is expressed through it.
pub trait VariantOperations: Send + Sync {
    /// Convert `value` to `target`, failing when the strategy forbids it
    fn convert(&self, value: &Variant, target: VariantType) -> VariantResult<Variant>;

    fn add(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        if let (Variant::DateTime(date), Variant::TimeSpan(span)) = (a, b) {
            return date
                .checked_add_signed(*span)
                .map(Variant::DateTime)
                .ok_or_else(|| span_overflow("add"));
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x.wrapping_add(*y))),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_add(*y))),
            (Variant::Float(x), Variant::Float(y)) => Ok(Variant::Float(x + y)),
            (Variant::Double(x), Variant::Double(y)) => Ok(Variant::Double(x + y)),
            (Variant::String(x), Variant::String(y)) => Ok(Variant::String(format!("{}{}", x, y))),
            (Variant::TimeSpan(x), Variant::TimeSpan(y)) => x
                .checked_add(y)
                .map(Variant::TimeSpan)
                .ok_or_else(|| span_overflow("add")),
            _ => Err(unsupported("add", a)),
        }
    }

    fn sub(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        match (a, b) {
            (Variant::DateTime(x), Variant::DateTime(y)) => {
                return Ok(Variant::TimeSpan(x.signed_duration_since(*y)));
            }
            (Variant::DateTime(date), Variant::TimeSpan(span)) => {
                return date
                    .checked_sub_signed(*span)
                    .map(Variant::DateTime)
                    .ok_or_else(|| span_overflow("sub"));
            }
            _ => {}
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x.wrapping_sub(*y))),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_sub(*y))),
            (Variant::Float(x), Variant::Float(y)) => Ok(Variant::Float(x - y)),
            (Variant::Double(x), Variant::Double(y)) => Ok(Variant::Double(x - y)),
            (Variant::TimeSpan(x), Variant::TimeSpan(y)) => x
                .checked_sub(y)
                .map(Variant::TimeSpan)
                .ok_or_else(|| span_overflow("sub")),
            _ => Err(unsupported("sub", a)),
        }
    }

    fn mul(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x.wrapping_mul(*y))),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_mul(*y))),
            (Variant::Float(x), Variant::Float(y)) => Ok(Variant::Float(x * y)),
            (Variant::Double(x), Variant::Double(y)) => Ok(Variant::Double(x * y)),
            _ => Err(unsupported("mul", a)),
        }
    }

    fn div(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(_), Variant::Integer(0)) | (Variant::Long(_), Variant::Long(0)) => {
                Err(VariantError::DivisionByZero)
            }
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x.wrapping_div(*y))),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_div(*y))),
            (Variant::Float(x), Variant::Float(y)) => Ok(Variant::Float(x / y)),
            (Variant::Double(x), Variant::Double(y)) => Ok(Variant::Double(x / y)),
            _ => Err(unsupported("div", a)),
        }
    }

    fn modulo(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(_), Variant::Integer(0)) | (Variant::Long(_), Variant::Long(0)) => {
                Err(VariantError::DivisionByZero)
            }
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x.wrapping_rem(*y))),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_rem(*y))),
            _ => Err(unsupported("mod", a)),
        }
    }

    /// Always computed in Double
    fn pow(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let base = self.convert(a, VariantType::Double)?;
        let exponent = self.convert(b, VariantType::Double)?;
        match (&base, &exponent) {
            (Variant::Double(x), Variant::Double(y)) => Ok(Variant::Double(x.powf(*y))),
            _ => Err(unsupported("pow", a)),
        }
    }

    /// Bitwise on integers, logical on booleans
    fn and(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x & y)),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x & y)),
            (Variant::Boolean(x), Variant::Boolean(y)) => Ok(Variant::Boolean(*x && *y)),
            _ => Err(unsupported("and", a)),
        }
    }

    fn or(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x | y)),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x | y)),
            (Variant::Boolean(x), Variant::Boolean(y)) => Ok(Variant::Boolean(*x || *y)),
            _ => Err(unsupported("or", a)),
        }
    }

    fn xor(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => Ok(Variant::Integer(x ^ y)),
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x ^ y)),
            (Variant::Boolean(x), Variant::Boolean(y)) => Ok(Variant::Boolean(x ^ y)),
            _ => Err(unsupported("xor", a)),
        }
    }

    fn not(&self, a: &Variant) -> VariantResult<Variant> {
        match a {
            Variant::Null => Ok(Variant::Null),
            Variant::Integer(x) => Ok(Variant::Integer(!x)),
            Variant::Long(x) => Ok(Variant::Long(!x)),
            Variant::Boolean(x) => Ok(Variant::Boolean(!x)),
            _ => Err(unsupported("not", a)),
        }
    }

    fn lsh(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => {
                Ok(Variant::Integer(x.wrapping_shl(*y as u32)))
            }
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_shl(*y as u32))),
            _ => Err(unsupported("lsh", a)),
        }
    }

    fn rsh(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        if a.is_null() || b.is_null() {
            return Ok(Variant::Null);
        }

        let b = self.convert(b, a.kind())?;
        match (a, &b) {
            (Variant::Integer(x), Variant::Integer(y)) => {
                Ok(Variant::Integer(x.wrapping_shr(*y as u32)))
            }
            (Variant::Long(x), Variant::Long(y)) => Ok(Variant::Long(x.wrapping_shr(*y as u32))),
            _ => Err(unsupported("rsh", a)),
        }
    }

    fn negative(&self, a: &Variant) -> VariantResult<Variant> {
        match a {
            Variant::Null => Ok(Variant::Null),
            Variant::Integer(x) => Ok(Variant::Integer(x.wrapping_neg())),
            Variant::Long(x) => Ok(Variant::Long(x.wrapping_neg())),
            Variant::Float(x) => Ok(Variant::Float(-x)),
            Variant::Double(x) => Ok(Variant::Double(-x)),
            Variant::TimeSpan(x) => Ok(Variant::TimeSpan(-*x)),
            _ => Err(unsupported("negative", a)),
        }
    }

    /// `Null = Null` is true, `Null = X` is false
    fn equal(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        values_equal(self, a, b).map(Variant::Boolean)
    }

    fn not_equal(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        values_equal(self, a, b).map(|equal| Variant::Boolean(!equal))
    }

    fn more(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        compare(self, "more", a, b, |o| o == Ordering::Greater)
    }

    fn less(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        compare(self, "less", a, b, |o| o == Ordering::Less)
    }

    fn more_equal(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        compare(self, "more_equal", a, b, |o| o != Ordering::Less)
    }

    fn less_equal(&self, a: &Variant, b: &Variant) -> VariantResult<Variant> {
        compare(self, "less_equal", a, b, |o| o != Ordering::Greater)
    }

    /// Membership of `value` in `collection`
    ///
    /// Arrays are scanned with `equal`; elements `value` cannot be converted
    /// to count as non-matching. Any other collection degrades to `equal`.
    fn in_(&self, collection: &Variant, value: &Variant) -> VariantResult<Variant> {
        if collection.is_null() || value.is_null() {
            return Ok(Variant::Null);
        }

        match collection {
            Variant::Array(items) => {
                for item in items {
                    match values_equal(self, item, value) {
                        Ok(true) => return Ok(Variant::Boolean(true)),
                        Ok(false)
                        | Err(VariantError::UnsupportedConversion { .. })
                        | Err(VariantError::ConversionFailed { .. })
                        | Err(VariantError::UnsupportedOperation { .. }) => {}
                        Err(other) => return Err(other),
                    }
                }
                Ok(Variant::Boolean(false))
            }
            _ => self.equal(collection, value),
        }
    }

    /// 0-based element of an Array, or one-character substring of a String
    fn get_element(&self, container: &Variant, index: &Variant) -> VariantResult<Variant> {
        if container.is_null() || index.is_null() {
            return Ok(Variant::Null);
        }

        let index = match self.convert(index, VariantType::Long)? {
            Variant::Long(i) => i,
            other => return Err(unsupported("get_element", &other)),
        };

        match container {
            Variant::Array(items) => usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or(VariantError::IndexOutOfRange {
                    index,
                    length: items.len(),
                }),
            Variant::String(text) => usize::try_from(index)
                .ok()
                .and_then(|i| text.chars().nth(i))
                .map(|ch| Variant::String(ch.to_string()))
                .ok_or_else(|| VariantError::IndexOutOfRange {
                    index,
                    length: text.chars().count(),
                }),
            _ => Err(unsupported("get_element", container)),
        }
    }
}
