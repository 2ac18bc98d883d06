use crate::calculator::CalculationError;
use crate::logging::Code;
use crate::parser::SyntaxError;

pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Failure of a parse-then-evaluate round trip
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    #[error("Syntax analysis failed: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Evaluation failed: {0}")]
    Calculation(#[from] CalculationError),
}

impl ExpressionError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Syntax(e) => e.error_code(),
            Self::Calculation(e) => e.error_code(),
        }
    }

    /// Source position (line, column) when the failing stage recorded one
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Syntax(e) => e.position(),
            Self::Calculation(e) => e.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::ExpressionCalculator;
    use crate::logging::codes;
    use futures::executor::block_on;

    fn run(text: &str) -> ExpressionResult<crate::variants::Variant> {
        let calculator = ExpressionCalculator::from_expression(text)?;
        Ok(block_on(calculator.evaluate())?)
    }

    #[test]
    fn test_stage_errors_convert() {
        let syntax = run("1 +").unwrap_err();
        assert!(matches!(syntax, ExpressionError::Syntax(_)));
        assert_eq!(syntax.error_code(), codes::syntax::UNEXPECTED_END);

        let calculation = run("Nope()").unwrap_err();
        assert!(matches!(calculation, ExpressionError::Calculation(_)));
        assert_eq!(calculation.error_code(), codes::evaluation::FUNC_NOT_FOUND);
        assert_eq!(calculation.position(), Some((1, 1)));
        assert!(calculation.to_string().starts_with("Evaluation failed"));
    }
}
