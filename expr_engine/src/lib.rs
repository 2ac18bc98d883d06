// Internal modules
pub mod calculator;
pub mod config;
pub mod error;
#[macro_use]
pub mod logging;
pub mod parser;
pub mod tokenizer;
pub mod utils;
pub mod variants;

// Re-export key types for library consumers
pub use calculator::{
    DelegatedFunction, ExpressionCalculator, Function, FunctionCollection, Variable,
    VariableCollection,
};
pub use error::{ExpressionError, ExpressionResult};
pub use parser::{ExpressionParser, ParseResult, SyntaxError};
pub use tokenizer::{ExpressionTokenizer, Token, TokenType};
pub use variants::{Variant, VariantOperations, VariantType};
