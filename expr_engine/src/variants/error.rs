use super::variant_type::VariantType;
use crate::logging::codes;

/// Failures of value conversion and operator dispatch
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VariantError {
    #[error("Operation '{operation}' is not supported for type {kind}")]
    UnsupportedOperation {
        operation: &'static str,
        kind: VariantType,
    },

    #[error("Variant conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: VariantType, to: VariantType },

    #[error("Value {value:?} cannot be converted to {to}")]
    ConversionFailed { value: String, to: VariantType },

    #[error("Expected a {expected} value but found {actual}")]
    WrongKind {
        expected: VariantType,
        actual: VariantType,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Index {index} is out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },
}

impl VariantError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            VariantError::UnsupportedOperation { .. } => codes::variant::UNSUPPORTED_OPERATION,
            VariantError::UnsupportedConversion { .. } => codes::variant::UNSUPPORTED_CONVERSION,
            VariantError::ConversionFailed { .. } => codes::variant::CONVERSION_FAILED,
            VariantError::WrongKind { .. } => codes::variant::WRONG_KIND,
            VariantError::DivisionByZero => codes::variant::DIVISION_BY_ZERO,
            VariantError::IndexOutOfRange { .. } => codes::variant::INDEX_OUT_OF_RANGE,
        }
    }
}

pub type VariantResult<T> = Result<T, VariantError>;
