use super::{read_while, TokenizerState};
use crate::tokenizer::char_map::CharIntervalMap;
use crate::tokenizer::error::TokenizerError;
use crate::tokenizer::scanner::Scanner;
use crate::tokenizer::token::{Token, TokenType};
use crate::tokenizer::tokenizer::Tokenizer;

/// Consumes a run of whitespace characters
pub struct WhitespaceState {
    chars: CharIntervalMap<bool>,
}

impl WhitespaceState {
    /// Whitespace is every code point from NUL through space
    pub fn new() -> Self {
        let mut state = Self {
            chars: CharIntervalMap::new(),
        };
        state.set_whitespace_chars('\0', ' ', true);
        state
    }

    pub fn set_whitespace_chars(&mut self, from: char, to: char, enabled: bool) {
        self.chars.add_interval(from, to, enabled);
    }

    pub fn clear_whitespace_chars(&mut self) {
        self.chars.clear();
    }

    fn is_whitespace(&self, ch: char) -> bool {
        self.chars.lookup(ch).copied().unwrap_or(false)
    }
}

impl Default for WhitespaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for WhitespaceState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        _tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut text = String::new();

        if let Some(ch) = scanner.read() {
            text.push(ch);
        }
        read_while(scanner, &mut text, |ch| self.is_whitespace(ch));

        Ok(Token::new(TokenType::Whitespace, text, line, column))
    }
}
