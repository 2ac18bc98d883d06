//! Semantic token kinds of the expression grammar

use std::fmt;

/// Kind of a classified expression token
///
/// Braces, comma, `IS` and a bare `NULL` only appear in the infix stream;
/// the postfix program is built from the remaining kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionTokenType {
    Unknown,
    LeftBrace,
    RightBrace,
    LeftSquareBrace,
    RightSquareBrace,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Power,
    Equal,
    NotEqual,
    More,
    Less,
    MoreEqual,
    LessEqual,
    ShiftLeft,
    ShiftRight,
    And,
    Or,
    Xor,
    Is,
    In,
    NotIn,
    Element,
    Null,
    Not,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
    Comma,
    Unary,
    Function,
    Variable,
    Constant,
}

/// Operator and keyword spellings, in lookup order
pub const OPERATORS: &[(&str, ExpressionTokenType)] = &[
    ("(", ExpressionTokenType::LeftBrace),
    (")", ExpressionTokenType::RightBrace),
    ("[", ExpressionTokenType::LeftSquareBrace),
    ("]", ExpressionTokenType::RightSquareBrace),
    ("+", ExpressionTokenType::Plus),
    ("-", ExpressionTokenType::Minus),
    ("*", ExpressionTokenType::Star),
    ("/", ExpressionTokenType::Slash),
    ("%", ExpressionTokenType::Percent),
    ("^", ExpressionTokenType::Power),
    ("=", ExpressionTokenType::Equal),
    ("<>", ExpressionTokenType::NotEqual),
    ("!=", ExpressionTokenType::NotEqual),
    (">", ExpressionTokenType::More),
    ("<", ExpressionTokenType::Less),
    (">=", ExpressionTokenType::MoreEqual),
    ("<=", ExpressionTokenType::LessEqual),
    ("<<", ExpressionTokenType::ShiftLeft),
    (">>", ExpressionTokenType::ShiftRight),
    ("AND", ExpressionTokenType::And),
    ("OR", ExpressionTokenType::Or),
    ("XOR", ExpressionTokenType::Xor),
    ("NOT", ExpressionTokenType::Not),
    ("IS", ExpressionTokenType::Is),
    ("IN", ExpressionTokenType::In),
    ("NULL", ExpressionTokenType::Null),
    ("LIKE", ExpressionTokenType::Like),
    (",", ExpressionTokenType::Comma),
];

impl ExpressionTokenType {
    /// Look up an operator or keyword; keywords match case-insensitively
    pub fn from_operator(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        OPERATORS
            .iter()
            .find(|(spelling, _)| *spelling == upper)
            .map(|(_, kind)| *kind)
    }

    /// Source spelling of an operator kind (the first one for NotEqual)
    pub fn spelling(&self) -> Option<&'static str> {
        OPERATORS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(spelling, _)| *spelling)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::LeftBrace => "LeftBrace",
            Self::RightBrace => "RightBrace",
            Self::LeftSquareBrace => "LeftSquareBrace",
            Self::RightSquareBrace => "RightSquareBrace",
            Self::Plus => "Plus",
            Self::Minus => "Minus",
            Self::Star => "Star",
            Self::Slash => "Slash",
            Self::Percent => "Percent",
            Self::Power => "Power",
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::More => "More",
            Self::Less => "Less",
            Self::MoreEqual => "MoreEqual",
            Self::LessEqual => "LessEqual",
            Self::ShiftLeft => "ShiftLeft",
            Self::ShiftRight => "ShiftRight",
            Self::And => "And",
            Self::Or => "Or",
            Self::Xor => "Xor",
            Self::Is => "Is",
            Self::In => "In",
            Self::NotIn => "NotIn",
            Self::Element => "Element",
            Self::Null => "Null",
            Self::Not => "Not",
            Self::Like => "Like",
            Self::NotLike => "NotLike",
            Self::IsNull => "IsNull",
            Self::IsNotNull => "IsNotNull",
            Self::Comma => "Comma",
            Self::Unary => "Unary",
            Self::Function => "Function",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
        }
    }
}

impl fmt::Display for ExpressionTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
