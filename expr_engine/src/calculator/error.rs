//! Evaluation errors

use crate::logging::{codes, Code};
use crate::variants::VariantError;

pub type CalculationResult<T> = Result<T, CalculationError>;

/// Failures while running a postfix program or a function
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("Variable '{name}' was not found at {line}:{column}")]
    VariableNotFound {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("Function '{name}' was not found at {line}:{column}")]
    FunctionNotFound {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("Function '{function}' expects {expected} parameters but got {actual}")]
    WrongParamCount {
        function: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("Function '{function}' failed: {message}")]
    FunctionFailed { function: String, message: String },

    #[error("Calculation stack is empty")]
    StackUnderflow,

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Operation(#[from] VariantError),
}

impl CalculationError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn wrong_param_count(function: &str, expected: &'static str, actual: usize) -> Self {
        Self::WrongParamCount {
            function: function.to_string(),
            expected,
            actual,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::VariableNotFound { .. } => codes::evaluation::VAR_NOT_FOUND,
            Self::FunctionNotFound { .. } => codes::evaluation::FUNC_NOT_FOUND,
            Self::WrongParamCount { .. } => codes::evaluation::WRONG_PARAM_COUNT,
            Self::FunctionFailed { .. } => codes::evaluation::FUNCTION_FAILED,
            Self::StackUnderflow => codes::evaluation::STACK_UNDERFLOW,
            Self::Internal { .. } => codes::system::INTERNAL,
            Self::Operation(error) => error.error_code(),
        }
    }

    /// Source position for lookups of unknown names
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::VariableNotFound { line, column, .. }
            | Self::FunctionNotFound { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}
