//! Expression parser: classified tokens in, postfix program out

pub mod error;
pub mod expression_token;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token_type;

pub use error::{SyntaxError, SyntaxResult};
pub use expression_token::ExpressionToken;
pub use parser::{ExpressionParser, ParseResult};
pub use token_type::{ExpressionTokenType, OPERATORS};
