//! Two-phase expression parser
//!
//! The lexical phase classifies raw tokens into [`ExpressionToken`]s with
//! literal values. The syntax phase walks them with seven precedence levels
//! and emits a postfix program: operands are emitted by recursion, each
//! operator after both of its operands.

use super::error::{SyntaxError, SyntaxResult};
use super::expression_token::ExpressionToken;
use super::token_type::ExpressionTokenType;
use crate::config::compile_time::lexical::MAX_EXPRESSION_LENGTH;
use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::codes;
use crate::tokenizer::{ExpressionTokenizer, Token, TokenType};
use crate::utils::SourceMap;
use crate::variants::Variant;
use crate::{log_debug, log_error, log_success};

use ExpressionTokenType as Kind;

/// Immutable outcome of a parse
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    expression: String,
    original_tokens: Vec<Token>,
    initial_tokens: Vec<ExpressionToken>,
    result_tokens: Vec<ExpressionToken>,
    variable_names: Vec<String>,
}

impl ParseResult {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Raw tokenizer output
    pub fn original_tokens(&self) -> &[Token] {
        &self.original_tokens
    }

    /// Classified tokens in infix order
    pub fn initial_tokens(&self) -> &[ExpressionToken] {
        &self.initial_tokens
    }

    /// Postfix program
    pub fn result_tokens(&self) -> &[ExpressionToken] {
        &self.result_tokens
    }

    /// Distinct variable names in first-occurrence order
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn is_empty(&self) -> bool {
        self.result_tokens.is_empty()
    }

    /// Result wrapping a hand-built postfix program
    #[cfg(test)]
    pub(crate) fn from_program(program: Vec<ExpressionToken>) -> Self {
        Self {
            result_tokens: program,
            ..Self::default()
        }
    }
}

/// Parser entry points; every call is independent
pub struct ExpressionParser;

impl ExpressionParser {
    /// Tokenize and parse expression text
    pub fn parse(text: &str) -> SyntaxResult<ParseResult> {
        let length = text.chars().count();
        if length > MAX_EXPRESSION_LENGTH {
            let error = SyntaxError::ExpressionTooLong { length };
            log_error!(error.error_code(), "Expression rejected",
                "length" => length,
                "max_length" => MAX_EXPRESSION_LENGTH
            );
            return Err(error);
        }

        log_debug!("Parsing expression", "length" => length);

        let tokens = match ExpressionTokenizer::new().tokenize(text) {
            Ok(tokens) => tokens,
            Err(error) => {
                let error = SyntaxError::from(error);
                Self::report_failure(text, &error);
                return Err(error);
            }
        };
        Self::build(text.to_string(), tokens)
    }

    /// Parse tokens produced by an [`ExpressionTokenizer`]
    ///
    /// The expression text is recomposed from the token values.
    pub fn parse_tokens(tokens: Vec<Token>) -> SyntaxResult<ParseResult> {
        let expression = compose_expression(&tokens);
        Self::build(expression, tokens)
    }

    fn build(expression: String, original_tokens: Vec<Token>) -> SyntaxResult<ParseResult> {
        let outcome = classify(&original_tokens).and_then(|initial| {
            let output = SyntaxBuilder::new(&initial).run()?;
            Ok((initial, output))
        });

        match outcome {
            Ok((initial_tokens, (result_tokens, variable_names))) => {
                log_success!(codes::success::PARSING_COMPLETE, "Expression parsed",
                    "tokens" => result_tokens.len(),
                    "variables" => variable_names.len()
                );
                Ok(ParseResult {
                    expression,
                    original_tokens,
                    initial_tokens,
                    result_tokens,
                    variable_names,
                })
            }
            Err(error) => {
                Self::report_failure(&expression, &error);
                Err(error)
            }
        }
    }

    fn report_failure(expression: &str, error: &SyntaxError) {
        match error.position() {
            Some((line, column)) => {
                let span = SourceMap::new(expression).span_for(line, column, "");
                log_error!(error.error_code(), "Expression parsing failed",
                    span = span,
                    "error" => error
                );
            }
            None => {
                log_error!(error.error_code(), "Expression parsing failed",
                    "error" => error
                );
            }
        }
    }
}

fn compose_expression(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token.kind {
            TokenType::Quoted => format!("'{}'", token.value.replace('\'', "''")),
            _ => token.value.clone(),
        })
        .collect()
}

// ============================================================================
// LEXICAL PHASE
// ============================================================================

fn classify(tokens: &[Token]) -> SyntaxResult<Vec<ExpressionToken>> {
    let mut initial = Vec::with_capacity(tokens.len());

    for token in tokens {
        let constant = |value: Variant| {
            ExpressionToken::new(Kind::Constant, value, token.line, token.column)
        };

        let classified = match token.kind {
            TokenType::Whitespace | TokenType::Comment | TokenType::Eof | TokenType::Eol => {
                continue
            }
            TokenType::Keyword => match token.value.to_uppercase().as_str() {
                "TRUE" => constant(Variant::Boolean(true)),
                "FALSE" => constant(Variant::Boolean(false)),
                _ => classify_operator(token)?,
            },
            TokenType::Word => ExpressionToken::new(
                Kind::Variable,
                Variant::String(token.value.clone()),
                token.line,
                token.column,
            ),
            TokenType::Integer | TokenType::Number => {
                constant(parse_number(&token.value).ok_or_else(|| unknown_symbol(token))?)
            }
            TokenType::Float => constant(Variant::Double(
                token.value.parse().map_err(|_| unknown_symbol(token))?,
            )),
            TokenType::HexDecimal => {
                constant(parse_hex(&token.value).ok_or_else(|| unknown_symbol(token))?)
            }
            TokenType::Quoted => constant(Variant::String(token.value.clone())),
            TokenType::Symbol | TokenType::Unknown | TokenType::Special => {
                classify_operator(token)?
            }
        };
        initial.push(classified);
    }

    Ok(initial)
}

fn classify_operator(token: &Token) -> SyntaxResult<ExpressionToken> {
    ExpressionTokenType::from_operator(&token.value)
        .map(|kind| ExpressionToken::operator(kind, token.line, token.column))
        .ok_or_else(|| unknown_symbol(token))
}

fn unknown_symbol(token: &Token) -> SyntaxError {
    SyntaxError::UnknownSymbol {
        symbol: token.value.clone(),
        line: token.line,
        column: token.column,
    }
}

/// Integer literal, widened to Long and then Double when it does not fit
fn parse_number(text: &str) -> Option<Variant> {
    if let Ok(value) = text.parse::<i32>() {
        return Some(Variant::Integer(value));
    }
    if let Ok(value) = text.parse::<i64>() {
        return Some(Variant::Long(value));
    }
    text.parse::<f64>().ok().map(Variant::Double)
}

fn parse_hex(text: &str) -> Option<Variant> {
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    let value = i64::from_str_radix(digits, 16).ok()?;
    Some(match i32::try_from(value) {
        Ok(small) => Variant::Integer(small),
        Err(_) => Variant::Long(value),
    })
}

// ============================================================================
// SYNTAX PHASE
// ============================================================================

struct SyntaxBuilder<'a> {
    tokens: &'a [ExpressionToken],
    position: usize,
    depth: usize,
    result: Vec<ExpressionToken>,
    variable_names: Vec<String>,
}

type SyntaxOutput = (Vec<ExpressionToken>, Vec<String>);

impl<'a> SyntaxBuilder<'a> {
    fn new(tokens: &'a [ExpressionToken]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            result: Vec::with_capacity(tokens.len()),
            variable_names: Vec::new(),
        }
    }

    fn run(mut self) -> SyntaxResult<SyntaxOutput> {
        if self.tokens.is_empty() {
            return Ok((self.result, self.variable_names));
        }

        self.expression()?;

        if let Some(token) = self.current() {
            return Err(SyntaxError::ErrorNear {
                token: describe(token),
                line: token.line,
                column: token.column,
            });
        }

        Ok((self.result, self.variable_names))
    }

    fn current(&self) -> Option<&'a ExpressionToken> {
        self.tokens.get(self.position)
    }

    fn kind_at(&self, offset: usize) -> Option<Kind> {
        self.tokens.get(self.position + offset).map(|t| t.kind)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Position of the current token, or of the last one at end of input
    fn current_position(&self) -> (usize, usize) {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1))
    }

    fn unexpected_end(&self) -> SyntaxError {
        let (line, column) = self.current_position();
        SyntaxError::UnexpectedEnd { line, column }
    }

    /// Consume the current token when its kind is one of `kinds`
    fn take_operator(&mut self, kinds: &[Kind]) -> Option<ExpressionToken> {
        let token = self.current()?;
        if !kinds.contains(&token.kind) {
            return None;
        }
        self.advance();
        Some(ExpressionToken::operator(token.kind, token.line, token.column))
    }

    /// Consume a fixed run of kinds, producing one operator of kind `produces`
    fn take_sequence(&mut self, kinds: &[Kind], produces: Kind) -> Option<ExpressionToken> {
        let matched = kinds
            .iter()
            .enumerate()
            .all(|(offset, kind)| self.kind_at(offset) == Some(*kind));
        if !matched {
            return None;
        }
        let first = self.current()?;
        self.position += kinds.len();
        Some(ExpressionToken::operator(produces, first.line, first.column))
    }

    /// Consume a closing brace or fail with `missing`
    fn expect(
        &mut self,
        kind: Kind,
        missing: fn(usize, usize) -> SyntaxError,
    ) -> SyntaxResult<()> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.advance();
                Ok(())
            }
            _ => {
                let (line, column) = self.current_position();
                Err(missing(line, column))
            }
        }
    }

    /// Level 0 entry point, guarded against runaway nesting
    fn expression(&mut self) -> SyntaxResult<()> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            let (line, column) = self.current_position();
            return Err(SyntaxError::MaxRecursionDepth { line, column });
        }
        let outcome = self.logical();
        self.depth -= 1;
        outcome
    }

    /// Level 0: AND OR XOR
    fn logical(&mut self) -> SyntaxResult<()> {
        self.negation()?;
        while let Some(operator) = self.take_operator(&[Kind::And, Kind::Or, Kind::Xor]) {
            self.negation()?;
            self.result.push(operator);
        }
        Ok(())
    }

    /// Level 1: prefix NOT
    fn negation(&mut self) -> SyntaxResult<()> {
        match self.take_operator(&[Kind::Not]) {
            Some(operator) => {
                self.comparison()?;
                self.result.push(operator);
                Ok(())
            }
            None => self.comparison(),
        }
    }

    /// Level 2: comparisons
    fn comparison(&mut self) -> SyntaxResult<()> {
        const COMPARISONS: &[Kind] = &[
            Kind::Equal,
            Kind::NotEqual,
            Kind::More,
            Kind::Less,
            Kind::MoreEqual,
            Kind::LessEqual,
        ];

        self.additive()?;
        while let Some(operator) = self.take_operator(COMPARISONS) {
            self.additive()?;
            self.result.push(operator);
        }
        Ok(())
    }

    /// Level 3: + - LIKE and the NOT/IS lookahead forms
    fn additive(&mut self) -> SyntaxResult<()> {
        self.multiplicative()?;
        loop {
            if let Some(operator) = self.take_operator(&[Kind::Plus, Kind::Minus, Kind::Like]) {
                self.multiplicative()?;
                self.result.push(operator);
            } else if let Some(operator) = self.take_sequence(&[Kind::Not, Kind::Like], Kind::NotLike)
            {
                self.multiplicative()?;
                self.result.push(operator);
            } else if let Some(operator) = self.take_sequence(&[Kind::Not, Kind::In], Kind::NotIn) {
                self.multiplicative()?;
                self.result.push(operator);
            } else if let Some(operator) = self.take_sequence(&[Kind::Is, Kind::Null], Kind::IsNull)
            {
                self.result.push(operator);
            } else if let Some(operator) =
                self.take_sequence(&[Kind::Is, Kind::Not, Kind::Null], Kind::IsNotNull)
            {
                self.result.push(operator);
            } else {
                return Ok(());
            }
        }
    }

    /// Level 4: * / %
    fn multiplicative(&mut self) -> SyntaxResult<()> {
        self.power()?;
        while let Some(operator) = self.take_operator(&[Kind::Star, Kind::Slash, Kind::Percent]) {
            self.power()?;
            self.result.push(operator);
        }
        Ok(())
    }

    /// Level 5: ^ IN << >>
    fn power(&mut self) -> SyntaxResult<()> {
        const OPERATORS: &[Kind] = &[Kind::Power, Kind::In, Kind::ShiftLeft, Kind::ShiftRight];

        self.primary()?;
        while let Some(operator) = self.take_operator(OPERATORS) {
            self.primary()?;
            self.result.push(operator);
        }
        Ok(())
    }

    /// Level 6: unary sign, operand, then `[index]` suffixes
    fn primary(&mut self) -> SyntaxResult<()> {
        let unary = match self.take_operator(&[Kind::Minus, Kind::Plus]) {
            Some(sign) if sign.kind == Kind::Minus => {
                Some(ExpressionToken::operator(Kind::Unary, sign.line, sign.column))
            }
            _ => None,
        };

        let token = self.current().ok_or_else(|| self.unexpected_end())?;
        match token.kind {
            Kind::Constant => {
                self.result.push(token.clone());
                self.advance();
            }
            Kind::Variable | Kind::Null if self.kind_at(1) == Some(Kind::LeftBrace) => {
                let name = match &token.value {
                    Variant::String(name) => name.clone(),
                    _ => describe(token),
                };
                self.function_call(name, token)?;
            }
            Kind::Variable => {
                if let Variant::String(name) = &token.value {
                    if !self.variable_names.iter().any(|known| known == name) {
                        self.variable_names.push(name.clone());
                    }
                }
                self.result.push(token.clone());
                self.advance();
            }
            Kind::LeftBrace => {
                self.advance();
                self.expression()?;
                self.expect(Kind::RightBrace, |line, column| {
                    SyntaxError::MissedCloseParenthesis { line, column }
                })?;
            }
            _ => {
                return Err(SyntaxError::ErrorAt {
                    token: describe(token),
                    line: token.line,
                    column: token.column,
                })
            }
        }

        if let Some(unary) = unary {
            self.result.push(unary);
        }

        while let Some(open) = self.take_operator(&[Kind::LeftSquareBrace]) {
            self.expression()?;
            self.expect(Kind::RightSquareBrace, |line, column| {
                SyntaxError::MissedCloseSquareBracket { line, column }
            })?;
            self.result
                .push(ExpressionToken::operator(Kind::Element, open.line, open.column));
        }

        Ok(())
    }

    /// `NAME(args...)`: emits each argument, the argument count, then the call
    fn function_call(&mut self, name: String, at: &ExpressionToken) -> SyntaxResult<()> {
        // name and opening brace
        self.position += 2;

        let mut count: i32 = 0;
        if self.kind_at(0) == Some(Kind::RightBrace) {
            self.advance();
        } else {
            loop {
                self.expression()?;
                count += 1;
                match self.current() {
                    Some(token) if token.kind == Kind::Comma => self.advance(),
                    Some(token) if token.kind == Kind::RightBrace => {
                        self.advance();
                        break;
                    }
                    _ => {
                        let (line, column) = self.current_position();
                        return Err(SyntaxError::MissedCloseParenthesis { line, column });
                    }
                }
            }
        }

        self.result.push(ExpressionToken::new(
            Kind::Constant,
            Variant::Integer(count),
            at.line,
            at.column,
        ));
        self.result.push(ExpressionToken::new(
            Kind::Function,
            Variant::String(name),
            at.line,
            at.column,
        ));
        Ok(())
    }
}

/// Source-like text of a classified token for error messages
fn describe(token: &ExpressionToken) -> String {
    match token.kind {
        Kind::Constant | Kind::Variable | Kind::Function => token.value.to_string(),
        kind => kind
            .spelling()
            .map(str::to_string)
            .unwrap_or_else(|| kind.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn postfix(text: &str) -> Vec<String> {
        ExpressionParser::parse(text)
            .unwrap()
            .result_tokens()
            .iter()
            .map(|t| match t.kind {
                Kind::Constant | Kind::Variable | Kind::Function => t.value.to_string(),
                kind => kind.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("1 + 2 * 3"), vec!["1", "2", "3", "Star", "Plus"]);
        assert_eq!(postfix("(1 + 2) * 3"), vec!["1", "2", "Plus", "3", "Star"]);
        assert_eq!(
            postfix("a = 1 AND b > 2"),
            vec!["a", "1", "Equal", "b", "2", "More", "And"]
        );
    }

    #[test]
    fn test_left_associative_chains() {
        assert_eq!(postfix("2 ^ 3 ^ 2"), vec!["2", "3", "Power", "2", "Power"]);
        assert_eq!(
            postfix("a AND b OR c"),
            vec!["a", "b", "And", "c", "Or"]
        );
        assert_eq!(postfix("8 - 3 - 1"), vec!["8", "3", "Minus", "1", "Minus"]);
    }

    #[test]
    fn test_unary_and_prefix_not() {
        assert_eq!(postfix("-a * 2"), vec!["a", "Unary", "2", "Star"]);
        assert_eq!(postfix("+5"), vec!["5"]);
        assert_eq!(postfix("NOT a = b"), vec!["a", "b", "Equal", "Not"]);
    }

    #[test]
    fn test_function_call_arity() {
        assert_eq!(
            postfix("Max(-123, 1) * 2"),
            vec!["123", "Unary", "1", "2", "Max", "2", "Star"]
        );
        assert_eq!(postfix("Now()"), vec!["0", "Now"]);
        assert_eq!(postfix("NULL()"), vec!["0", "NULL"]);
    }

    #[test]
    fn test_lookahead_forms() {
        assert_eq!(postfix("a IS NULL"), vec!["a", "IsNull"]);
        assert_eq!(postfix("a IS NOT NULL"), vec!["a", "IsNotNull"]);
        assert_eq!(postfix("a NOT LIKE 'x%'"), vec!["a", "x%", "NotLike"]);
        assert_eq!(
            postfix("5 NOT IN ARRAY(1, 2)"),
            vec!["5", "1", "2", "2", "ARRAY", "NotIn"]
        );
    }

    #[test]
    fn test_element_suffixes_chain() {
        assert_eq!(postfix("'abc'[1]"), vec!["abc", "1", "Element"]);
        assert_eq!(
            postfix("a[0][1]"),
            vec!["a", "0", "Element", "1", "Element"]
        );
        assert_eq!(postfix("-a[0]"), vec!["a", "Unary", "0", "Element"]);
    }

    #[test]
    fn test_literals() {
        let result = ExpressionParser::parse("1 + 3000000000 + 1e100 + 2.5 + TRUE + 'it''s'")
            .unwrap();
        let constants: Vec<&Variant> = result
            .result_tokens()
            .iter()
            .filter(|t| t.kind == Kind::Constant)
            .map(|t| &t.value)
            .collect();

        assert_eq!(
            constants,
            vec![
                &Variant::Integer(1),
                &Variant::Long(3_000_000_000),
                &Variant::Double(1e100),
                &Variant::Double(2.5),
                &Variant::Boolean(true),
                &Variant::from_string("it's"),
            ]
        );
    }

    #[test]
    fn test_variable_names_first_occurrence() {
        let result = ExpressionParser::parse("b + A + b + a + Max(A, c)").unwrap();
        assert_eq!(result.variable_names(), &["b", "A", "a", "c"]);
    }

    #[test]
    fn test_streams_are_kept() {
        let result = ExpressionParser::parse("A + 1 // note").unwrap();

        assert_eq!(result.expression(), "A + 1 // note");
        assert_eq!(result.original_tokens().len(), 7);
        assert_eq!(result.initial_tokens().len(), 3);
        assert_eq!(result.result_tokens().len(), 3);
    }

    #[test]
    fn test_empty_expression() {
        let result = ExpressionParser::parse("   ").unwrap();
        assert!(result.is_empty());
        assert!(result.variable_names().is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        assert_matches!(
            ExpressionParser::parse("1 +"),
            Err(SyntaxError::UnexpectedEnd { line: 1, column: 3 })
        );
        assert_matches!(
            ExpressionParser::parse("1 2"),
            Err(SyntaxError::ErrorNear { line: 1, column: 3, .. })
        );
        assert_matches!(
            ExpressionParser::parse("* 2"),
            Err(SyntaxError::ErrorAt { line: 1, column: 1, .. })
        );
        assert_matches!(
            ExpressionParser::parse("(1 + 2"),
            Err(SyntaxError::MissedCloseParenthesis { .. })
        );
        assert_matches!(
            ExpressionParser::parse("Max(1, 2"),
            Err(SyntaxError::MissedCloseParenthesis { .. })
        );
        assert_matches!(
            ExpressionParser::parse("a[1"),
            Err(SyntaxError::MissedCloseSquareBracket { .. })
        );
        assert_matches!(
            ExpressionParser::parse("NULL"),
            Err(SyntaxError::ErrorAt { .. })
        );
    }

    #[test]
    fn test_unknown_symbol_position() {
        let error = ExpressionParser::parse("1 +\n  2 ~ 3").unwrap_err();

        assert_matches!(&error, SyntaxError::UnknownSymbol { symbol, .. } if symbol == "~");
        assert_eq!((error.line(), error.column()), (2, 5));
        assert_eq!(error.error_code(), codes::lexical::UNKNOWN_SYMBOL);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_PARSE_DEPTH + 1), ")".repeat(MAX_PARSE_DEPTH + 1));
        assert_matches!(
            ExpressionParser::parse(&deep),
            Err(SyntaxError::MaxRecursionDepth { .. })
        );
    }

    #[test]
    fn test_expression_length_limit() {
        let long = "1".repeat(MAX_EXPRESSION_LENGTH + 1);
        assert_matches!(
            ExpressionParser::parse(&long),
            Err(SyntaxError::ExpressionTooLong { .. })
        );
    }

    #[test]
    fn test_parse_tokens_matches_parse() {
        let tokens = ExpressionTokenizer::new().tokenize("A + 'x''y'").unwrap();
        let result = ExpressionParser::parse_tokens(tokens).unwrap();

        assert_eq!(result.expression(), "A + 'x''y'");
        assert_eq!(result.variable_names(), &["A"]);
        assert_eq!(result.result_tokens().len(), 3);
    }
}
