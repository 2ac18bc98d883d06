use super::TokenizerState;
use crate::tokenizer::error::TokenizerError;
use crate::tokenizer::scanner::Scanner;
use crate::tokenizer::token::{Token, TokenType};
use crate::tokenizer::tokenizer::Tokenizer;

/// Quoted text ending at the next matching quote
///
/// The token keeps both quotes. An unterminated quote runs to end of input.
pub struct QuoteState;

impl QuoteState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for QuoteState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for QuoteState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        _tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut text = String::new();

        let Some(quote) = scanner.read() else {
            return Ok(Token::new(TokenType::Eof, text, line, column));
        };
        text.push(quote);

        while let Some(ch) = scanner.read() {
            text.push(ch);
            if ch == quote {
                break;
            }
        }

        Ok(Token::new(TokenType::Quoted, text, line, column))
    }
}

/// Quoted text where a doubled quote stands for one literal quote
pub struct ExpressionQuoteState;

impl ExpressionQuoteState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExpressionQuoteState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for ExpressionQuoteState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        _tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut text = String::new();

        let Some(quote) = scanner.read() else {
            return Ok(Token::new(TokenType::Eof, text, line, column));
        };
        text.push(quote);

        while let Some(ch) = scanner.read() {
            text.push(ch);
            if ch == quote {
                if scanner.peek() == Some(quote) {
                    scanner.read();
                    text.push(quote);
                } else {
                    break;
                }
            }
        }

        Ok(Token::new(TokenType::Quoted, text, line, column))
    }
}
