//! Tokenizer wiring for the expression grammar

use super::error::TokenizerError;
use super::states::{
    CppCommentState, ExpressionNumberState, ExpressionQuoteState, ExpressionSymbolState,
    ExpressionWordState, WhitespaceState,
};
use super::token::Token;
use super::tokenizer::{StateRef, Tokenizer};
use crate::logging::codes;
use crate::log_success;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Tokenizer for expression text
///
/// Minus is always a symbol (the parser decides unary vs binary), both quote
/// kinds produce decoded strings, `//` and `/* */` are comments and no Eof
/// token is emitted.
pub struct ExpressionTokenizer(Tokenizer);

impl ExpressionTokenizer {
    pub fn new() -> Self {
        let mut tokenizer = Tokenizer::new();

        let symbol: StateRef = Arc::new(ExpressionSymbolState::new());
        let whitespace: StateRef = Arc::new(WhitespaceState::new());
        let word: StateRef = Arc::new(ExpressionWordState::new());
        let number: StateRef = Arc::new(ExpressionNumberState::new());
        let quote: StateRef = Arc::new(ExpressionQuoteState::new());
        let comment: StateRef = Arc::new(CppCommentState::new());

        tokenizer.set_character_state('\0', char::MAX, symbol.clone());
        tokenizer.set_character_state('\0', ' ', whitespace.clone());
        tokenizer.set_character_state('a', 'z', word.clone());
        tokenizer.set_character_state('A', 'Z', word.clone());
        tokenizer.set_character_state('_', '_', word.clone());
        tokenizer.set_character_state('\u{c0}', '\u{ff}', word.clone());
        tokenizer.set_character_state('\u{100}', char::MAX, word.clone());
        tokenizer.set_character_state('0', '9', number.clone());
        tokenizer.set_character_state('-', '-', number.clone());
        tokenizer.set_character_state('.', '.', number.clone());
        tokenizer.set_character_state('"', '"', quote.clone());
        tokenizer.set_character_state('\'', '\'', quote.clone());
        tokenizer.set_character_state('/', '/', comment.clone());

        tokenizer.set_symbol_state(Some(symbol));
        tokenizer.set_whitespace_state(Some(whitespace));
        tokenizer.set_word_state(Some(word));
        tokenizer.set_number_state(Some(number));
        tokenizer.set_quote_state(Some(quote));
        tokenizer.set_comment_state(Some(comment));

        tokenizer.skip_eof = true;
        tokenizer.decode_strings = true;

        Self(tokenizer)
    }

    /// Tokenize expression text, logging the outcome
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizerError> {
        let tokens = self.0.tokenize_buffer(text)?;
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Expression tokenized",
            "tokens" => tokens.len()
        );
        Ok(tokens)
    }

    pub fn into_inner(self) -> Tokenizer {
        self.0
    }
}

impl Default for ExpressionTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ExpressionTokenizer {
    type Target = Tokenizer;

    fn deref(&self) -> &Tokenizer {
        &self.0
    }
}

impl DerefMut for ExpressionTokenizer {
    fn deref_mut(&mut self) -> &mut Tokenizer {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::token::TokenType;
    use proptest::prelude::*;

    fn tokenize(text: &str) -> Vec<Token> {
        ExpressionTokenizer::new().tokenize(text).unwrap()
    }

    fn significant(text: &str) -> Vec<(TokenType, String)> {
        tokenize(text)
            .into_iter()
            .filter(|t| t.kind != TokenType::Whitespace)
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_arithmetic_expression() {
        assert_eq!(
            significant("A + b / (3 - 1)"),
            vec![
                (TokenType::Word, "A".to_string()),
                (TokenType::Symbol, "+".to_string()),
                (TokenType::Word, "b".to_string()),
                (TokenType::Symbol, "/".to_string()),
                (TokenType::Symbol, "(".to_string()),
                (TokenType::Integer, "3".to_string()),
                (TokenType::Symbol, "-".to_string()),
                (TokenType::Integer, "1".to_string()),
                (TokenType::Symbol, ")".to_string()),
            ]
        );
    }

    #[test]
    fn test_minus_is_always_a_symbol() {
        assert_eq!(
            significant("-123"),
            vec![
                (TokenType::Symbol, "-".to_string()),
                (TokenType::Integer, "123".to_string()),
            ]
        );
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!(significant("1e10")[0], (TokenType::Float, "1e10".to_string()));
        assert_eq!(significant("2.5E-3")[0], (TokenType::Float, "2.5E-3".to_string()));
        assert_eq!(significant(".5")[0], (TokenType::Float, ".5".to_string()));
    }

    #[test]
    fn test_incomplete_exponent_is_unread() {
        assert_eq!(
            significant("1e+x"),
            vec![
                (TokenType::Integer, "1".to_string()),
                (TokenType::Word, "e".to_string()),
                (TokenType::Symbol, "+".to_string()),
                (TokenType::Word, "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_quotes_are_decoded() {
        assert_eq!(
            significant("'it''s' \"x\""),
            vec![
                (TokenType::Quoted, "it's".to_string()),
                (TokenType::Quoted, "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = significant("a and Not b LIKE null");
        let kinds: Vec<TokenType> = tokens.iter().map(|(k, _)| *k).collect();

        assert_eq!(
            kinds,
            vec![
                TokenType::Word,
                TokenType::Keyword,
                TokenType::Keyword,
                TokenType::Word,
                TokenType::Keyword,
                TokenType::Keyword,
            ]
        );
        assert_eq!(tokens[1].1, "and");
    }

    #[test]
    fn test_multi_char_symbols() {
        let values: Vec<String> = significant("<= >= <> != << >> <<<")
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(values, vec!["<=", ">=", "<>", "!=", "<<", ">>", "<<", "<"]);
    }

    #[test]
    fn test_comments_and_division() {
        assert_eq!(
            significant("4 / 2 // half\n/* block */ + 1"),
            vec![
                (TokenType::Integer, "4".to_string()),
                (TokenType::Symbol, "/".to_string()),
                (TokenType::Integer, "2".to_string()),
                (TokenType::Comment, "// half".to_string()),
                (TokenType::Comment, "/* block */".to_string()),
                (TokenType::Symbol, "+".to_string()),
                (TokenType::Integer, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let tokens = significant("1 /* open");
        assert_eq!(tokens[1], (TokenType::Comment, "/* open".to_string()));
    }

    #[test]
    fn test_word_characters() {
        assert_eq!(
            significant("_név2 a-b"),
            vec![
                (TokenType::Word, "_név2".to_string()),
                (TokenType::Word, "a".to_string()),
                (TokenType::Symbol, "-".to_string()),
                (TokenType::Word, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a +\n  12");
        let last = tokens.last().unwrap();
        assert_eq!((last.line, last.column), (2, 3));
    }

    #[test]
    fn test_no_eof_token() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("x").iter().all(|t| !t.is_eof()));
    }

    proptest! {
        #[test]
        fn raw_text_concatenation_reproduces_input(
            text in "[a-zA-Z0-9_ +*/%^=<>!(),.'\"\\[\\]\\-]{0,40}"
        ) {
            let mut tokenizer = ExpressionTokenizer::new();
            tokenizer.decode_strings = false;
            let tokens = tokenizer.tokenize_buffer(&text).unwrap();
            let joined: String = tokens.iter().map(|t| t.value.as_str()).collect();
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn tokenizing_twice_is_deterministic(text in "[a-z0-9 +\\-'/*]{0,30}") {
            let tokenizer = ExpressionTokenizer::new();
            let first = tokenizer.tokenize_buffer(&text).unwrap();
            let second = tokenizer.tokenize_buffer(&text).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
