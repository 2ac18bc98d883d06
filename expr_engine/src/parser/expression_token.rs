use super::token_type::ExpressionTokenType;
use crate::variants::Variant;
use std::fmt;

/// Classified token carrying its literal value and 1-based source position
///
/// Constants hold their value, variables and functions hold their name as a
/// String, operators hold Null.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionToken {
    pub kind: ExpressionTokenType,
    pub value: Variant,
    pub line: usize,
    pub column: usize,
}

impl ExpressionToken {
    pub fn new(kind: ExpressionTokenType, value: Variant, line: usize, column: usize) -> Self {
        Self {
            kind,
            value,
            line,
            column,
        }
    }

    /// Operator token without a value
    pub fn operator(kind: ExpressionTokenType, line: usize, column: usize) -> Self {
        Self::new(kind, Variant::Null, line, column)
    }

    /// Name of a variable or function token
    pub fn name(&self) -> Option<&str> {
        match (&self.kind, &self.value) {
            (ExpressionTokenType::Variable | ExpressionTokenType::Function, Variant::String(s)) => {
                Some(s)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ExpressionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ExpressionTokenType::Constant => write!(f, "Constant({})", self.value),
            ExpressionTokenType::Variable | ExpressionTokenType::Function => {
                write!(f, "{}({})", self.kind, self.value)
            }
            kind => write!(f, "{}", kind),
        }
    }
}
