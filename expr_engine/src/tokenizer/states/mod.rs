//! Tokenizer states
//!
//! A state is picked by the first character of a token and consumes the rest
//! of it. States that cannot handle the input they were handed push it back
//! and delegate to the tokenizer's symbol state.

pub mod comment;
pub mod number;
pub mod quote;
pub mod symbol;
pub mod whitespace;
pub mod word;

pub use comment::{CommentState, CppCommentState};
pub use number::{ExpressionNumberState, NumberState};
pub use quote::{ExpressionQuoteState, QuoteState};
pub use symbol::{ExpressionSymbolState, GenericSymbolState, SymbolState};
pub use whitespace::WhitespaceState;
pub use word::{ExpressionWordState, WordState};

use super::error::TokenizerError;
use super::scanner::Scanner;
use super::token::Token;
use super::tokenizer::Tokenizer;

/// Produces one token from the scanner
pub trait TokenizerState: Send + Sync {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError>;
}

/// Hand the input at the scanner position to the tokenizer's symbol state
pub(crate) fn delegate_to_symbol(
    scanner: &mut dyn Scanner,
    tokenizer: &Tokenizer,
) -> Result<Token, TokenizerError> {
    match tokenizer.symbol_state() {
        Some(state) => state.next_token(scanner, tokenizer),
        None => Err(TokenizerError::MissingSymbolState {
            line: scanner.peek_line(),
            column: scanner.peek_column(),
        }),
    }
}

/// Read characters while `accept` holds, appending them to `text`
pub(crate) fn read_while(
    scanner: &mut dyn Scanner,
    text: &mut String,
    accept: impl Fn(char) -> bool,
) -> usize {
    let mut count = 0;
    while let Some(ch) = scanner.peek() {
        if !accept(ch) {
            break;
        }
        scanner.read();
        text.push(ch);
        count += 1;
    }
    count
}
