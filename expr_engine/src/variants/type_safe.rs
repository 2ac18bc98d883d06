use super::error::{VariantError, VariantResult};
use super::operations::VariantOperations;
use super::variant::Variant;
use super::variant_type::VariantType;

/// Strategy allowing identity and widening numeric conversions only
///
/// Integer widens to Long, Float and Double; Long to Float and Double; Float
/// to Double. `1 + 2.5` therefore fails, while `2.5 + 1` succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSafeVariantOperations;

impl TypeSafeVariantOperations {
    pub fn new() -> Self {
        Self
    }
}

impl VariantOperations for TypeSafeVariantOperations {
    fn convert(&self, value: &Variant, target: VariantType) -> VariantResult<Variant> {
        if value.kind() == target {
            return Ok(value.clone());
        }

        match (value, target) {
            (Variant::Integer(v), VariantType::Long) => Ok(Variant::Long(i64::from(*v))),
            (Variant::Integer(v), VariantType::Float) => Ok(Variant::Float(*v as f32)),
            (Variant::Integer(v), VariantType::Double) => Ok(Variant::Double(f64::from(*v))),
            (Variant::Long(v), VariantType::Float) => Ok(Variant::Float(*v as f32)),
            (Variant::Long(v), VariantType::Double) => Ok(Variant::Double(*v as f64)),
            (Variant::Float(v), VariantType::Double) => Ok(Variant::Double(f64::from(*v))),
            _ => Err(VariantError::UnsupportedConversion {
                from: value.kind(),
                to: target,
            }),
        }
    }
}
