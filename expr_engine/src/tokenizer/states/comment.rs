use super::{delegate_to_symbol, read_while, TokenizerState};
use crate::tokenizer::error::TokenizerError;
use crate::tokenizer::scanner::Scanner;
use crate::tokenizer::token::{Token, TokenType};
use crate::tokenizer::tokenizer::Tokenizer;

/// Line comment from the trigger character up to (not including) end of line
pub struct CommentState;

impl CommentState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommentState {
    fn default() -> Self {
        Self::new()
    }
}

fn read_line_comment(scanner: &mut dyn Scanner, text: &mut String) {
    read_while(scanner, text, |ch| ch != '\n' && ch != '\r');
}

impl TokenizerState for CommentState {
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
        read_line_comment(scanner, &mut text);

        Ok(Token::new(TokenType::Comment, text, line, column))
    }
}

/// `// line` and `/* block */` comments; a lone `/` is a symbol
pub struct CppCommentState;

impl CppCommentState {
    pub fn new() -> Self {
        Self
    }

    fn read_block_comment(scanner: &mut dyn Scanner, text: &mut String) {
        let mut previous = '\0';
        while let Some(ch) = scanner.read() {
            text.push(ch);
            if previous == '*' && ch == '/' {
                break;
            }
            previous = ch;
        }
    }
}

impl Default for CppCommentState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for CppCommentState {
    fn next_token(
        &self,
        scanner: &mut dyn Scanner,
        tokenizer: &Tokenizer,
    ) -> Result<Token, TokenizerError> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());

        match scanner.read() {
            Some('/') => {}
            other => {
                if other.is_some() {
                    scanner.unread();
                }
                return Err(TokenizerError::IncorrectStateUsage {
                    state: "CppComment",
                    found: other.map(String::from).unwrap_or_default(),
                    line,
                    column,
                });
            }
        }

        let mut text = String::from("/");
        match scanner.peek() {
            Some('/') => {
                read_line_comment(scanner, &mut text);
                Ok(Token::new(TokenType::Comment, text, line, column))
            }
            Some('*') => {
                if let Some(star) = scanner.read() {
                    text.push(star);
                }
                Self::read_block_comment(scanner, &mut text);
                Ok(Token::new(TokenType::Comment, text, line, column))
            }
            _ => {
                scanner.unread();
                delegate_to_symbol(scanner, tokenizer)
            }
        }
    }
}
