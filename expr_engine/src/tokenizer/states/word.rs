use super::{read_while, TokenizerState};
use crate::tokenizer::char_map::CharIntervalMap;
use crate::tokenizer::error::TokenizerError;
use crate::tokenizer::scanner::Scanner;
use crate::tokenizer::token::{Token, TokenType};
use crate::tokenizer::tokenizer::Tokenizer;

/// Reserved words of the expression grammar, matched case-insensitively
pub const KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "XOR", "TRUE", "FALSE", "LIKE", "IS", "IN", "NULL",
];

/// A word starts with whatever character the tokenizer routed here and
/// continues through the configured word characters
pub struct WordState {
    chars: CharIntervalMap<bool>,
}

impl WordState {
    pub fn new() -> Self {
        let mut state = Self {
            chars: CharIntervalMap::new(),
        };
        state.set_word_chars('a', 'z', true);
        state.set_word_chars('A', 'Z', true);
        state.set_word_chars('0', '9', true);
        state.set_word_chars('-', '-', true);
        state.set_word_chars('_', '_', true);
        state.set_word_chars('\u{c0}', '\u{ff}', true);
        state.set_word_chars('\u{100}', char::MAX, true);
        state
    }

    pub fn set_word_chars(&mut self, from: char, to: char, enabled: bool) {
        self.chars.add_interval(from, to, enabled);
    }

    pub fn clear_word_chars(&mut self) {
        self.chars.clear();
    }

    fn is_word_char(&self, ch: char) -> bool {
        self.chars.lookup(ch).copied().unwrap_or(false)
    }

    fn read_word(&self, scanner: &mut dyn Scanner) -> (String, usize, usize) {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut text = String::new();

        if let Some(ch) = scanner.read() {
            text.push(ch);
        }
        read_while(scanner, &mut text, |ch| self.is_word_char(ch));

        (text, line, column)
    }
}

impl Default for WordState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for WordState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        _tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (text, line, column) = self.read_word(scanner);
        Ok(Token::new(TokenType::Word, text, line, column))
    }
}

/// Identifiers and keywords of the expression grammar
///
/// Unlike the generic word state, `-` is not a word character, so `a-b`
/// tokenizes as a subtraction.
pub struct ExpressionWordState(WordState);

impl ExpressionWordState {
    pub fn new() -> Self {
        let mut inner = WordState::new();
        inner.clear_word_chars();
        inner.set_word_chars('0', '9', true);
        inner.set_word_chars('a', 'z', true);
        inner.set_word_chars('A', 'Z', true);
        inner.set_word_chars('_', '_', true);
        inner.set_word_chars('\u{c0}', '\u{ff}', true);
        inner.set_word_chars('\u{100}', char::MAX, true);
        Self(inner)
    }

    pub fn is_keyword(word: &str) -> bool {
        KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(word))
    }
}

impl Default for ExpressionWordState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for ExpressionWordState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        _tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (text, line, column) = self.0.read_word(scanner);
        let kind = if Self::is_keyword(&text) {
            TokenType::Keyword
        } else {
            TokenType::Word
        };
        Ok(Token::new(kind, text, line, column))
    }
}
