use super::TokenizerState;
use crate::tokenizer::error::TokenizerError;
use crate::tokenizer::scanner::Scanner;
use crate::tokenizer::symbols::SymbolTree;
use crate::tokenizer::token::{Token, TokenType};
use crate::tokenizer::tokenizer::Tokenizer;

/// Operators and punctuation, matched greedily through a symbol trie
pub struct SymbolState {
    tree: SymbolTree,
}

impl SymbolState {
    pub fn new() -> Self {
        Self {
            tree: SymbolTree::new(),
        }
    }

    /// Register a multi-character symbol; single characters need no registration
    pub fn add(&mut self, symbol: &str, kind: TokenType) {
        self.tree.add(symbol, kind);
    }

    pub fn with_symbols(symbols: &[&str]) -> Self {
        let mut state = Self::new();
        for symbol in symbols {
            state.add(symbol, TokenType::Symbol);
        }
        state
    }
}

impl Default for SymbolState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for SymbolState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        _tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());

        match self.tree.next_symbol(scanner) {
            Some((text, kind)) => Ok(Token::new(kind, text, line, column)),
            None => Err(TokenizerError::IncorrectStateUsage {
                state: "Symbol",
                found: String::new(),
                line,
                column,
            }),
        }
    }
}

/// Symbol state of the general-purpose tokenizer: `<>`, `<=`, `>=`
pub struct GenericSymbolState(SymbolState);

impl GenericSymbolState {
    pub fn new() -> Self {
        Self(SymbolState::with_symbols(&["<>", "<=", ">="]))
    }
}

impl Default for GenericSymbolState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for GenericSymbolState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        self.0.next_token(scanner, tokenizer)
    }
}

/// Symbol state of the expression grammar
pub struct ExpressionSymbolState(SymbolState);

impl ExpressionSymbolState {
    pub fn new() -> Self {
        Self(SymbolState::with_symbols(&[
            "<=", ">=", "<>", "!=", ">>", "<<",
        ]))
    }
}

impl Default for ExpressionSymbolState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for ExpressionSymbolState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        self.0.next_token(scanner, tokenizer)
    }
}
