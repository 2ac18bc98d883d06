//! General-purpose tokenizer wiring

use super::states::{
    CommentState, GenericSymbolState, NumberState, QuoteState, WhitespaceState, WordState,
};
use super::tokenizer::{StateRef, Tokenizer};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Tokenizer for free-form text: words, signed decimals, quoted strings and
/// `#` comments
pub struct GenericTokenizer(Tokenizer);

impl GenericTokenizer {
    pub fn new() -> Self {
        Self(wire())
    }

    pub fn into_inner(self) -> Tokenizer {
        self.0
    }
}

impl Default for GenericTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for GenericTokenizer {
    type Target = Tokenizer;

    fn deref(&self) -> &Tokenizer {
        &self.0
    }
}

impl DerefMut for GenericTokenizer {
    fn deref_mut(&mut self) -> &mut Tokenizer {
        &mut self.0
    }
}

fn wire() -> Tokenizer {
    let mut tokenizer = Tokenizer::new();

    let symbol: StateRef = Arc::new(GenericSymbolState::new());
    let whitespace: StateRef = Arc::new(WhitespaceState::new());
    let word: StateRef = Arc::new(WordState::new());
    let number: StateRef = Arc::new(NumberState::new());
    let quote: StateRef = Arc::new(QuoteState::new());
    let comment: StateRef = Arc::new(CommentState::new());

    tokenizer.set_character_state('\0', char::MAX, symbol.clone());
    tokenizer.set_character_state('\0', ' ', whitespace.clone());
    tokenizer.set_character_state('a', 'z', word.clone());
    tokenizer.set_character_state('A', 'Z', word.clone());
    tokenizer.set_character_state('\u{c0}', '\u{ff}', word.clone());
    tokenizer.set_character_state('\u{100}', char::MAX, word.clone());
    tokenizer.set_character_state('-', '-', number.clone());
    tokenizer.set_character_state('0', '9', number.clone());
    tokenizer.set_character_state('.', '.', number.clone());
    tokenizer.set_character_state('"', '"', quote.clone());
    tokenizer.set_character_state('\'', '\'', quote.clone());
    tokenizer.set_character_state('#', '#', comment.clone());

    tokenizer.set_symbol_state(Some(symbol));
    tokenizer.set_whitespace_state(Some(whitespace));
    tokenizer.set_word_state(Some(word));
    tokenizer.set_number_state(Some(number));
    tokenizer.set_quote_state(Some(quote));
    tokenizer.set_comment_state(Some(comment));

    tokenizer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::token::{Token, TokenType};

    fn tokenize(text: &str) -> Vec<Token> {
        GenericTokenizer::new().tokenize_buffer(text).unwrap()
    }

    #[test]
    fn test_mixed_input() {
        let tokens = tokenize("abc -1.5 <> 'x'");

        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Word, "abc", 1, 1),
                Token::new(TokenType::Whitespace, " ", 1, 4),
                Token::new(TokenType::Float, "-1.5", 1, 5),
                Token::new(TokenType::Whitespace, " ", 1, 9),
                Token::new(TokenType::Symbol, "<>", 1, 10),
                Token::new(TokenType::Whitespace, " ", 1, 12),
                Token::new(TokenType::Quoted, "'x'", 1, 13),
                Token::new(TokenType::Eof, "", 1, 16),
            ]
        );
    }

    #[test]
    fn test_words_keep_dashes() {
        let tokens = tokenize("well-known_name");
        assert_eq!(tokens[0], Token::new(TokenType::Word, "well-known_name", 1, 1));
    }

    #[test]
    fn test_lone_minus_and_dot_fall_back_to_symbols() {
        let tokens = tokenize("- .");
        assert_eq!(tokens[0], Token::new(TokenType::Symbol, "-", 1, 1));
        assert_eq!(tokens[2], Token::new(TokenType::Symbol, ".", 1, 3));
    }

    #[test]
    fn test_trailing_dot_is_not_a_fraction() {
        let tokens = tokenize("1.");
        assert_eq!(tokens[0], Token::new(TokenType::Integer, "1", 1, 1));
        assert_eq!(tokens[1], Token::new(TokenType::Symbol, ".", 1, 2));
    }

    #[test]
    fn test_hash_comment_stops_at_newline() {
        let tokens = tokenize("a # note\nb");
        assert_eq!(tokens[2], Token::new(TokenType::Comment, "# note", 1, 3));
        assert_eq!(tokens[4], Token::new(TokenType::Word, "b", 2, 1));
    }

    #[test]
    fn test_generic_quote_has_no_escape() {
        let tokens = tokenize("'a''b'");
        assert_eq!(tokens[0].value, "'a'");
        assert_eq!(tokens[1].value, "'b'");
    }

    #[test]
    fn test_unify_numbers() {
        let mut tokenizer = GenericTokenizer::new();
        tokenizer.unify_numbers = true;

        let tokens = tokenizer.tokenize_buffer("1 2.5").unwrap();
        assert_eq!(tokens[0].kind, TokenType::Number);
        assert_eq!(tokens[2].kind, TokenType::Number);
    }
}
