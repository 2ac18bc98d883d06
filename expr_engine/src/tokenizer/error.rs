use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::logging::codes;

/// Tokenizer failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenizerError {
    #[error("Tokenizer state delegated to a symbol state, but none is assigned (line {line}, column {column})")]
    MissingSymbolState { line: usize, column: usize },

    #[error("{state} state cannot start on {found:?} (line {line}, column {column})")]
    IncorrectStateUsage {
        state: &'static str,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, line: usize, column: usize },
}

impl TokenizerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            TokenizerError::MissingSymbolState { .. } => codes::lexical::MISSING_SYMBOL_STATE,
            TokenizerError::IncorrectStateUsage { .. } => codes::lexical::INCORRECT_STATE_USAGE,
            TokenizerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            TokenizerError::MissingSymbolState { line, .. }
            | TokenizerError::IncorrectStateUsage { line, .. }
            | TokenizerError::TooManyTokens { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            TokenizerError::MissingSymbolState { column, .. }
            | TokenizerError::IncorrectStateUsage { column, .. }
            | TokenizerError::TooManyTokens { column, .. } => *column,
        }
    }
}
