//! Lexical and syntax errors raised while turning text into a postfix program

use crate::config::compile_time::lexical::MAX_EXPRESSION_LENGTH;
use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::{codes, Code};
use crate::tokenizer::TokenizerError;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Parse failures; positional variants carry the 1-based line and column of
/// the offending token
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected end of expression at {line}:{column}")]
    UnexpectedEnd { line: usize, column: usize },

    #[error("Syntax error near '{token}' at {line}:{column}")]
    ErrorNear {
        token: String,
        line: usize,
        column: usize,
    },

    #[error("Syntax error at '{token}' at {line}:{column}")]
    ErrorAt {
        token: String,
        line: usize,
        column: usize,
    },

    #[error("Missing ')' at {line}:{column}")]
    MissedCloseParenthesis { line: usize, column: usize },

    #[error("Missing ']' at {line}:{column}")]
    MissedCloseSquareBracket { line: usize, column: usize },

    #[error("Unknown symbol '{symbol}' at {line}:{column}")]
    UnknownSymbol {
        symbol: String,
        line: usize,
        column: usize,
    },

    #[error("Expression nesting exceeds {MAX_PARSE_DEPTH} levels at {line}:{column}")]
    MaxRecursionDepth { line: usize, column: usize },

    #[error("Expression length {length} exceeds {MAX_EXPRESSION_LENGTH} characters")]
    ExpressionTooLong { length: usize },

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedEnd { .. } => codes::syntax::UNEXPECTED_END,
            Self::ErrorNear { .. } => codes::syntax::ERROR_NEAR,
            Self::ErrorAt { .. } => codes::syntax::ERROR_AT,
            Self::MissedCloseParenthesis { .. } => codes::syntax::MISSED_CLOSE_PARENTHESIS,
            Self::MissedCloseSquareBracket { .. } => codes::syntax::MISSED_CLOSE_SQUARE_BRACKET,
            Self::UnknownSymbol { .. } => codes::lexical::UNKNOWN_SYMBOL,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::ExpressionTooLong { .. } => codes::lexical::EXPRESSION_TOO_LONG,
            Self::Tokenizer(error) => error.error_code(),
        }
    }

    /// Line and column of the failure, `None` for errors about the whole text
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::UnexpectedEnd { line, column }
            | Self::ErrorNear { line, column, .. }
            | Self::ErrorAt { line, column, .. }
            | Self::MissedCloseParenthesis { line, column }
            | Self::MissedCloseSquareBracket { line, column }
            | Self::UnknownSymbol { line, column, .. }
            | Self::MaxRecursionDepth { line, column } => Some((*line, *column)),
            Self::Tokenizer(error) => Some((error.line(), error.column())),
            Self::ExpressionTooLong { .. } => None,
        }
    }

    /// 1-based line, 0 when the error has no position
    pub fn line(&self) -> usize {
        self.position().map(|(line, _)| line).unwrap_or(0)
    }

    /// 1-based column, 0 when the error has no position
    pub fn column(&self) -> usize {
        self.position().map(|(_, column)| column).unwrap_or(0)
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let near = SyntaxError::ErrorNear {
            token: ")".to_string(),
            line: 1,
            column: 5,
        };
        assert_eq!(near.error_code().as_str(), "ERROR_NEAR");
        assert_eq!((near.line(), near.column()), (1, 5));

        let unknown = SyntaxError::UnknownSymbol {
            symbol: "~".to_string(),
            line: 2,
            column: 3,
        };
        assert_eq!(unknown.error_code().as_str(), "UNKNOWN_SYMBOL");

        let long = SyntaxError::ExpressionTooLong { length: 10 };
        assert_eq!(long.position(), None);
        assert_eq!(long.line(), 0);
    }

    #[test]
    fn test_tokenizer_errors_keep_their_code() {
        let error: SyntaxError = TokenizerError::MissingSymbolState { line: 1, column: 7 }.into();

        assert_eq!(error.error_code().as_str(), "MISSING_SYMBOL_STATE");
        assert_eq!(error.position(), Some((1, 7)));
    }

    #[test]
    fn test_messages_name_the_token() {
        let error = SyntaxError::ErrorAt {
            token: "*".to_string(),
            line: 1,
            column: 1,
        };
        assert_eq!(error.to_string(), "Syntax error at '*' at 1:1");
    }
}
