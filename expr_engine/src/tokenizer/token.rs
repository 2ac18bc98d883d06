//! Raw tokens produced by tokenizer states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical class of a raw token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Unknown,
    Eof,
    Eol,
    Float,
    Integer,
    HexDecimal,
    Number,
    Symbol,
    Quoted,
    Word,
    Keyword,
    Whitespace,
    Comment,
    Special,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Unknown => "Unknown",
            TokenType::Eof => "Eof",
            TokenType::Eol => "Eol",
            TokenType::Float => "Float",
            TokenType::Integer => "Integer",
            TokenType::HexDecimal => "HexDecimal",
            TokenType::Number => "Number",
            TokenType::Symbol => "Symbol",
            TokenType::Quoted => "Quoted",
            TokenType::Word => "Word",
            TokenType::Keyword => "Keyword",
            TokenType::Whitespace => "Whitespace",
            TokenType::Comment => "Comment",
            TokenType::Special => "Special",
        }
    }

    /// Numeric classes folded by the `unify_numbers` policy
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            TokenType::Float | TokenType::Integer | TokenType::HexDecimal
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable token with its raw text and 1-based start position
///
/// Equality ignores the position.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenType,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenType::Eof
    }

    /// Same token with a different kind
    pub(crate) fn with_kind(mut self, kind: TokenType) -> Self {
        self.kind = kind;
        self
    }

    /// Same token with different text
    pub(crate) fn with_value(mut self, value: String) -> Self {
        self.value = value;
        self
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({:?}) at {}:{}",
            self.kind, self.value, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_position() {
        let a = Token::new(TokenType::Word, "abc", 1, 1);
        let b = Token::new(TokenType::Word, "abc", 3, 7);
        let c = Token::new(TokenType::Keyword, "abc", 1, 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_number_classes() {
        assert!(TokenType::Float.is_number());
        assert!(TokenType::HexDecimal.is_number());
        assert!(!TokenType::Number.is_number());
        assert!(!TokenType::Word.is_number());
    }
}
