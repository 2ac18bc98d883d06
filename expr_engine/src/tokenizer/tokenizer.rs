//! Character-class driven tokenizer
//!
//! The tokenizer peeks the next character, looks up the state registered for
//! it, lets the state consume one token, then applies its policies (skip,
//! merge, unify, decode) before handing the token out.

use super::char_map::CharIntervalMap;
use super::error::TokenizerError;
use super::scanner::{Scanner, StringScanner};
use super::states::TokenizerState;
use super::token::{Token, TokenType};
use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::logging::codes;
use crate::{log_debug, log_error};
use std::sync::Arc;

pub type StateRef = Arc<dyn TokenizerState>;

/// Configurable tokenizer
///
/// Wiring lives in `generic` and `expression`; a bare `Tokenizer::new()` maps
/// no characters and yields only Unknown tokens.
#[derive(Default)]
pub struct Tokenizer {
    pub skip_unknown: bool,
    pub skip_whitespaces: bool,
    pub skip_comments: bool,
    pub skip_eof: bool,
    pub merge_whitespaces: bool,
    pub unify_numbers: bool,
    pub decode_strings: bool,

    states: CharIntervalMap<StateRef>,

    comment_state: Option<StateRef>,
    number_state: Option<StateRef>,
    quote_state: Option<StateRef>,
    symbol_state: Option<StateRef>,
    whitespace_state: Option<StateRef>,
    word_state: Option<StateRef>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route every character in `from..=to` to `state`
    pub fn set_character_state(&mut self, from: char, to: char, state: StateRef) {
        self.states.add_interval(from, to, state);
    }

    pub fn clear_character_states(&mut self) {
        self.states.clear();
    }

    /// State registered for a character, if any
    pub fn character_state(&self, ch: char) -> Option<&StateRef> {
        self.states.lookup(ch)
    }

    pub fn comment_state(&self) -> Option<&StateRef> {
        self.comment_state.as_ref()
    }

    pub fn set_comment_state(&mut self, state: Option<StateRef>) {
        self.comment_state = state;
    }

    pub fn number_state(&self) -> Option<&StateRef> {
        self.number_state.as_ref()
    }

    pub fn set_number_state(&mut self, state: Option<StateRef>) {
        self.number_state = state;
    }

    pub fn quote_state(&self) -> Option<&StateRef> {
        self.quote_state.as_ref()
    }

    pub fn set_quote_state(&mut self, state: Option<StateRef>) {
        self.quote_state = state;
    }

    pub fn symbol_state(&self) -> Option<&StateRef> {
        self.symbol_state.as_ref()
    }

    pub fn set_symbol_state(&mut self, state: Option<StateRef>) {
        self.symbol_state = state;
    }

    pub fn whitespace_state(&self) -> Option<&StateRef> {
        self.whitespace_state.as_ref()
    }

    pub fn set_whitespace_state(&mut self, state: Option<StateRef>) {
        self.whitespace_state = state;
    }

    pub fn word_state(&self) -> Option<&StateRef> {
        self.word_state.as_ref()
    }

    pub fn set_word_state(&mut self, state: Option<StateRef>) {
        self.word_state = state;
    }

    /// Lazy token stream over `text`
    ///
    /// Each call starts a fresh scan, so iterating twice yields the same tokens.
    pub fn tokens<'a>(&'a self, text: &str) -> TokenIterator<'a> {
        TokenIterator {
            tokenizer: self,
            scanner: StringScanner::new(text),
            pending: None,
            eof_emitted: false,
            count: 0,
            failed: false,
        }
    }

    /// Tokenize the whole text eagerly
    pub fn tokenize_buffer(&self, text: &str) -> Result<Vec<Token>, TokenizerError> {
        let tokens = self.tokens(text).collect::<Result<Vec<_>, _>>()?;

        log_debug!("Tokenization completed",
            "tokens" => tokens.len(),
            "chars" => text.chars().count()
        );

        Ok(tokens)
    }

    /// Read one raw token and apply the per-token policies
    ///
    /// Returns `None` at end of input.
    fn next_raw(&self, scanner: &mut dyn Scanner) -> Result<Option<Token>, TokenizerError> {
        loop {
            let Some(ch) = scanner.peek() else {
                return Ok(None);
            };

            let token = match self.states.lookup(ch) {
                Some(state) => state.next_token(scanner, self)?,
                None => {
                    let (line, column) = (scanner.peek_line(), scanner.peek_column());
                    scanner.read();
                    Token::new(TokenType::Unknown, ch.to_string(), line, column)
                }
            };

            let skip = match token.kind {
                TokenType::Unknown => self.skip_unknown,
                TokenType::Whitespace => self.skip_whitespaces,
                TokenType::Comment => self.skip_comments,
                _ => false,
            };
            if skip {
                continue;
            }

            return Ok(Some(self.apply_value_policies(token)));
        }
    }

    fn apply_value_policies(&self, token: Token) -> Token {
        if self.unify_numbers && token.kind.is_number() {
            return token.with_kind(TokenType::Number);
        }

        if self.decode_strings && token.kind == TokenType::Quoted {
            if let Some(quote) = token.value.chars().next() {
                let decoded = decode_string(&token.value, quote);
                return token.with_value(decoded);
            }
        }

        token
    }
}

/// Strip surrounding quotes and collapse doubled quotes
///
/// A missing closing quote is tolerated.
pub fn decode_string(value: &str, quote: char) -> String {
    let inner = value.strip_prefix(quote).unwrap_or(value);
    let inner = inner.strip_suffix(quote).unwrap_or(inner);

    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}

/// Lazy token stream returned by [`Tokenizer::tokens`]
///
/// The stream ends after the first error.
pub struct TokenIterator<'a> {
    tokenizer: &'a Tokenizer,
    scanner: StringScanner,
    pending: Option<Token>,
    eof_emitted: bool,
    count: usize,
    failed: bool,
}

impl TokenIterator<'_> {
    /// Rewind to the beginning of the text
    pub fn reset(&mut self) {
        self.scanner.reset();
        self.pending = None;
        self.eof_emitted = false;
        self.count = 0;
        self.failed = false;
    }

    fn next_token(&mut self) -> Result<Option<Token>, TokenizerError> {
        let token = match self.pending.take() {
            Some(token) => Some(token),
            None => self.tokenizer.next_raw(&mut self.scanner)?,
        };

        let Some(token) = token else {
            if self.tokenizer.skip_eof || self.eof_emitted {
                return Ok(None);
            }
            self.eof_emitted = true;
            return Ok(Some(Token::new(
                TokenType::Eof,
                "",
                self.scanner.peek_line(),
                self.scanner.peek_column(),
            )));
        };

        if self.tokenizer.merge_whitespaces && token.kind == TokenType::Whitespace {
            let mut merged = token;
            while let Some(next) = self.tokenizer.next_raw(&mut self.scanner)? {
                if next.kind == TokenType::Whitespace {
                    merged.value.push_str(&next.value);
                } else {
                    self.pending = Some(next);
                    break;
                }
            }
            return Ok(Some(merged));
        }

        Ok(Some(token))
    }
}

impl Iterator for TokenIterator<'_> {
    type Item = Result<Token, TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_token() {
            Ok(Some(token)) => {
                self.count += 1;
                if self.count > MAX_TOKEN_COUNT {
                    self.failed = true;
                    log_error!(codes::lexical::TOO_MANY_TOKENS, "Token limit exceeded",
                        "limit" => MAX_TOKEN_COUNT,
                        "line" => token.line
                    );
                    return Some(Err(TokenizerError::TooManyTokens {
                        count: self.count,
                        line: token.line,
                        column: token.column,
                    }));
                }
                Some(Ok(token))
            }
            Ok(None) => None,
            Err(error) => {
                self.failed = true;
                log_error!(error.error_code(), &error.to_string(),
                    "line" => error.line(),
                    "column" => error.column()
                );
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::states::{SymbolState, WhitespaceState, WordState};
    use assert_matches::assert_matches;

    fn kinds(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_unmapped_characters_are_unknown() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_buffer("ab").unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Unknown, "a", 1, 1),
                Token::new(TokenType::Unknown, "b", 1, 2),
                Token::new(TokenType::Eof, "", 1, 3),
            ]
        );
        assert_eq!(tokens[1].column, 2);
    }

    #[test]
    fn test_skip_policies() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.set_character_state('\0', ' ', Arc::new(WhitespaceState::new()));
        tokenizer.skip_unknown = true;
        tokenizer.skip_whitespaces = true;
        tokenizer.skip_eof = true;

        assert!(tokenizer.tokenize_buffer(" ~ ").unwrap().is_empty());
    }

    #[test]
    fn test_merge_whitespaces_across_states() {
        fn only(ch: char) -> Arc<WhitespaceState> {
            let mut state = WhitespaceState::new();
            state.clear_whitespace_chars();
            state.set_whitespace_chars(ch, ch, true);
            Arc::new(state)
        }

        let mut tokenizer = Tokenizer::new();
        tokenizer.set_character_state(' ', ' ', only(' '));
        tokenizer.set_character_state('\t', '\t', only('\t'));
        tokenizer.set_character_state('a', 'z', Arc::new(WordState::new()));
        tokenizer.skip_eof = true;

        let unmerged = tokenizer.tokenize_buffer("a \t b").unwrap();
        assert_eq!(
            kinds(&unmerged),
            vec![
                TokenType::Word,
                TokenType::Whitespace,
                TokenType::Whitespace,
                TokenType::Whitespace,
                TokenType::Word
            ]
        );

        tokenizer.merge_whitespaces = true;
        let merged = tokenizer.tokenize_buffer("a \t b").unwrap();
        assert_eq!(merged[1].value, " \t ");
    }

    #[test]
    fn test_missing_symbol_state() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.set_character_state('-', '-', Arc::new(crate::tokenizer::states::NumberState));

        let result = tokenizer.tokenize_buffer("-x");
        assert_matches!(
            result,
            Err(TokenizerError::MissingSymbolState { line: 1, column: 1 })
        );
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.set_character_state('-', '-', Arc::new(crate::tokenizer::states::NumberState));

        let mut tokens = tokenizer.tokens("-");
        assert!(matches!(tokens.next(), Some(Err(_))));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_iterator_reset_replays_stream() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.set_symbol_state(Some(Arc::new(SymbolState::with_symbols(&["<="]))));
        tokenizer.set_character_state('<', '=', Arc::new(SymbolState::with_symbols(&["<="])));

        let mut tokens = tokenizer.tokens("<=<");
        let first: Vec<Token> = tokens.by_ref().map(|t| t.unwrap()).collect();
        tokens.reset();
        let second: Vec<Token> = tokens.map(|t| t.unwrap()).collect();

        assert_eq!(first, second);
        assert_eq!(first[0].value, "<=");
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string("'abc'", '\''), "abc");
        assert_eq!(decode_string("'it''s'", '\''), "it's");
        assert_eq!(decode_string("\"say \"\"hi\"\"\"", '"'), "say \"hi\"");
        assert_eq!(decode_string("'open", '\''), "open");
        assert_eq!(decode_string("'", '\''), "");
    }
}
