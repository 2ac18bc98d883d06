use super::{delegate_to_symbol, read_while, TokenizerState};
use crate::tokenizer::error::TokenizerError;
use crate::tokenizer::scanner::Scanner;
use crate::tokenizer::token::{Token, TokenType};
use crate::tokenizer::tokenizer::Tokenizer;

/// Mantissa shared by both number flavours: digits with an optional fraction
///
/// Returns the number of digits read and whether a fraction was consumed.
/// A `.` with no digit after it is pushed back.
fn scan_mantissa(scanner: &mut dyn Scanner, text: &mut String) -> (usize, bool) {
    let mut digits = read_while(scanner, text, |ch| ch.is_ascii_digit());
    let mut fraction = false;

    if scanner.peek() == Some('.') {
        scanner.read();
        let mut tail = String::from(".");
        let fraction_digits = read_while(scanner, &mut tail, |ch| ch.is_ascii_digit());
        if fraction_digits > 0 {
            text.push_str(&tail);
            digits += fraction_digits;
            fraction = true;
        } else {
            scanner.unread();
        }
    }

    (digits, fraction)
}

/// Integers and decimal fractions with an optional leading minus
pub struct NumberState;

impl NumberState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NumberState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for NumberState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut text = String::new();

        if scanner.peek() == Some('-') {
            scanner.read();
            text.push('-');
        }

        let (digits, fraction) = scan_mantissa(scanner, &mut text);
        if digits == 0 {
            scanner.unread_many(text.chars().count());
            return delegate_to_symbol(scanner, tokenizer);
        }

        let kind = if fraction {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        Ok(Token::new(kind, text, line, column))
    }
}

/// Expression numbers: no sign (minus is an operator), optional exponent
pub struct ExpressionNumberState;

impl ExpressionNumberState {
    pub fn new() -> Self {
        Self
    }

    /// Consume `[eE][+-]?digits`, pushing everything back if no digit follows
    fn scan_exponent(scanner: &mut dyn Scanner, text: &mut String) -> bool {
        if !matches!(scanner.peek(), Some('e') | Some('E')) {
            return false;
        }

        let mut exponent = String::new();
        if let Some(ch) = scanner.read() {
            exponent.push(ch);
        }
        if let Some(sign @ ('+' | '-')) = scanner.peek() {
            scanner.read();
            exponent.push(sign);
        }

        if read_while(scanner, &mut exponent, |ch| ch.is_ascii_digit()) == 0 {
            scanner.unread_many(exponent.chars().count());
            return false;
        }

        text.push_str(&exponent);
        true
    }
}

impl Default for ExpressionNumberState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for ExpressionNumberState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        if scanner.peek() == Some('-') {
            return delegate_to_symbol(scanner, tokenizer);
        }

        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut text = String::new();

        let (digits, fraction) = scan_mantissa(scanner, &mut text);
        if digits == 0 {
            scanner.unread_many(text.chars().count());
            return delegate_to_symbol(scanner, tokenizer);
        }

        let exponent = Self::scan_exponent(scanner, &mut text);
        let kind = if fraction || exponent {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        Ok(Token::new(kind, text, line, column))
    }
}
