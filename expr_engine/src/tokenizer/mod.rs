//! Generic character-class tokenizer framework and the expression tokenizer
//!
//! A [`Tokenizer`] maps code-point ranges to [`TokenizerState`]s. The state
//! selected by the next character reads one token; the tokenizer then applies
//! its skip and rewrite policies. [`GenericTokenizer`] and
//! [`ExpressionTokenizer`] are ready-made wirings.

pub mod char_map;
pub mod error;
pub mod expression;
pub mod generic;
pub mod scanner;
pub mod states;
pub mod symbols;
pub mod token;
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use char_map::CharIntervalMap;
pub use error::TokenizerError;
pub use expression::ExpressionTokenizer;
pub use generic::GenericTokenizer;
pub use scanner::{Scanner, StringScanner};
pub use states::TokenizerState;
pub use symbols::SymbolTree;
pub use token::{Token, TokenType};
pub use tokenizer::{decode_string, StateRef, TokenIterator, Tokenizer};
