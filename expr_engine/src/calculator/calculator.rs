//! Expression calculator: parse once, evaluate against variable and function
//! registries as often as needed

use super::error::{CalculationError, CalculationResult};
use super::functions::FunctionCollection;
use super::stack::CalculationStack;
use super::variables::{Variable, VariableCollection};
use crate::config::EvaluationPreferences;
use crate::logging::codes;
use crate::parser::{ExpressionParser, ExpressionToken, ExpressionTokenType, ParseResult, SyntaxResult};
use crate::tokenizer::Token;
use crate::variants::{
    TypeSafeVariantOperations, TypeUnsafeVariantOperations, Variant, VariantOperations,
    VariantResult, VariantType,
};
use crate::{log_debug, log_error, log_success};
use regex::Regex;

use ExpressionTokenType as Kind;

/// Holds a parsed expression, default registries and the operation strategy
pub struct ExpressionCalculator {
    parse_result: ParseResult,
    auto_variables: bool,
    default_variables: VariableCollection,
    default_functions: FunctionCollection,
    variant_operations: Box<dyn VariantOperations>,
}

impl ExpressionCalculator {
    /// Calculator configured from the environment defaults
    pub fn new() -> Self {
        Self::with_preferences(EvaluationPreferences::default())
    }

    pub fn with_preferences(preferences: EvaluationPreferences) -> Self {
        let variant_operations: Box<dyn VariantOperations> = if preferences.type_safe_operations {
            Box::new(TypeSafeVariantOperations::new())
        } else {
            Box::new(TypeUnsafeVariantOperations::new())
        };

        Self {
            parse_result: ParseResult::default(),
            auto_variables: preferences.auto_variables,
            default_variables: VariableCollection::new(),
            default_functions: FunctionCollection::with_default_functions(),
            variant_operations,
        }
    }

    pub fn from_expression(text: &str) -> SyntaxResult<Self> {
        let mut calculator = Self::new();
        calculator.set_expression(text)?;
        Ok(calculator)
    }

    pub fn expression(&self) -> &str {
        self.parse_result.expression()
    }

    /// Parse `text`; the previous expression is kept when parsing fails
    pub fn set_expression(&mut self, text: &str) -> SyntaxResult<()> {
        let result = ExpressionParser::parse(text)?;
        self.apply(result);
        Ok(())
    }

    pub fn original_tokens(&self) -> &[Token] {
        self.parse_result.original_tokens()
    }

    /// Parse an already tokenized expression
    pub fn set_original_tokens(&mut self, tokens: Vec<Token>) -> SyntaxResult<()> {
        let result = ExpressionParser::parse_tokens(tokens)?;
        self.apply(result);
        Ok(())
    }

    pub fn initial_tokens(&self) -> &[ExpressionToken] {
        self.parse_result.initial_tokens()
    }

    pub fn result_tokens(&self) -> &[ExpressionToken] {
        self.parse_result.result_tokens()
    }

    pub fn variable_names(&self) -> &[String] {
        self.parse_result.variable_names()
    }

    pub fn parse_result(&self) -> &ParseResult {
        &self.parse_result
    }

    fn apply(&mut self, result: ParseResult) {
        self.parse_result = result;
        if self.auto_variables {
            add_missing_variables(self.parse_result.variable_names(), &mut self.default_variables);
        }
    }

    pub fn auto_variables(&self) -> bool {
        self.auto_variables
    }

    pub fn set_auto_variables(&mut self, value: bool) {
        self.auto_variables = value;
    }

    pub fn default_variables(&self) -> &VariableCollection {
        &self.default_variables
    }

    pub fn default_variables_mut(&mut self) -> &mut VariableCollection {
        &mut self.default_variables
    }

    pub fn default_functions(&self) -> &FunctionCollection {
        &self.default_functions
    }

    pub fn default_functions_mut(&mut self) -> &mut FunctionCollection {
        &mut self.default_functions
    }

    pub fn variant_operations(&self) -> &dyn VariantOperations {
        self.variant_operations.as_ref()
    }

    pub fn set_variant_operations(&mut self, operations: impl VariantOperations + 'static) {
        self.variant_operations = Box::new(operations);
    }

    /// Add a Null variable for every discovered name missing from `variables`
    pub fn create_variables(&self, variables: &mut VariableCollection) {
        add_missing_variables(self.parse_result.variable_names(), variables);
    }

    /// Drop the expression and the default variables
    pub fn clear(&mut self) {
        self.parse_result = ParseResult::default();
        self.default_variables.clear();
    }

    /// Evaluate with the default registries
    pub async fn evaluate(&self) -> CalculationResult<Variant> {
        self.evaluate_with(None, None).await
    }

    pub async fn evaluate_with_variables(
        &self,
        variables: &VariableCollection,
    ) -> CalculationResult<Variant> {
        self.evaluate_with(Some(variables), None).await
    }

    /// Evaluate, falling back to the default registries for `None`
    pub async fn evaluate_with(
        &self,
        variables: Option<&VariableCollection>,
        functions: Option<&FunctionCollection>,
    ) -> CalculationResult<Variant> {
        let variables = variables.unwrap_or(&self.default_variables);
        let functions = functions.unwrap_or(&self.default_functions);

        log_debug!("Evaluating expression",
            "program" => self.result_tokens().len(),
            "variables" => variables.len()
        );

        let outcome = self.run(variables, functions).await;
        match &outcome {
            Ok(value) => {
                log_success!(codes::success::EVALUATION_COMPLETE, "Expression evaluated",
                    "kind" => value.kind()
                );
            }
            Err(error) => {
                log_error!(error.error_code(), "Expression evaluation failed",
                    "expression" => self.expression(),
                    "error" => error
                );
            }
        }
        outcome
    }

    async fn run(
        &self,
        variables: &VariableCollection,
        functions: &FunctionCollection,
    ) -> CalculationResult<Variant> {
        let ops = self.variant_operations.as_ref();
        let mut stack = CalculationStack::new();

        for token in self.parse_result.result_tokens() {
            match token.kind {
                Kind::Constant => stack.push(token.value.clone()),
                Kind::Variable => {
                    let name = token_name(token)?;
                    let variable = variables.find(name).ok_or_else(|| {
                        CalculationError::VariableNotFound {
                            name: name.to_string(),
                            line: token.line,
                            column: token.column,
                        }
                    })?;
                    stack.push(variable.value().clone());
                }
                Kind::Function => {
                    let name = token_name(token)?;
                    let function = functions.find(name).ok_or_else(|| {
                        CalculationError::FunctionNotFound {
                            name: name.to_string(),
                            line: token.line,
                            column: token.column,
                        }
                    })?;
                    let count = match stack.pop()? {
                        Variant::Integer(count) => usize::try_from(count).map_err(|_| {
                            CalculationError::internal(format!("Negative argument count {}", count))
                        })?,
                        other => {
                            return Err(CalculationError::internal(format!(
                                "Argument count of '{}' is a {}",
                                name,
                                other.kind()
                            )))
                        }
                    };
                    let params = stack.pop_many(count)?;
                    let result = function.calculate(&params, ops).await?;
                    stack.push(result);
                }
                Kind::Unary => unary(&mut stack, |a| ops.negative(a))?,
                Kind::Not => unary(&mut stack, |a| ops.not(a))?,
                Kind::IsNull => unary(&mut stack, |a| Ok(Variant::Boolean(a.is_null())))?,
                Kind::IsNotNull => unary(&mut stack, |a| Ok(Variant::Boolean(!a.is_null())))?,
                Kind::Plus => binary(&mut stack, |a, b| ops.add(a, b))?,
                Kind::Minus => binary(&mut stack, |a, b| ops.sub(a, b))?,
                Kind::Star => binary(&mut stack, |a, b| ops.mul(a, b))?,
                Kind::Slash => binary(&mut stack, |a, b| ops.div(a, b))?,
                Kind::Percent => binary(&mut stack, |a, b| ops.modulo(a, b))?,
                Kind::Power => binary(&mut stack, |a, b| ops.pow(a, b))?,
                Kind::Equal => binary(&mut stack, |a, b| ops.equal(a, b))?,
                Kind::NotEqual => binary(&mut stack, |a, b| ops.not_equal(a, b))?,
                Kind::More => binary(&mut stack, |a, b| ops.more(a, b))?,
                Kind::Less => binary(&mut stack, |a, b| ops.less(a, b))?,
                Kind::MoreEqual => binary(&mut stack, |a, b| ops.more_equal(a, b))?,
                Kind::LessEqual => binary(&mut stack, |a, b| ops.less_equal(a, b))?,
                Kind::ShiftLeft => binary(&mut stack, |a, b| ops.lsh(a, b))?,
                Kind::ShiftRight => binary(&mut stack, |a, b| ops.rsh(a, b))?,
                Kind::And => binary(&mut stack, |a, b| ops.and(a, b))?,
                Kind::Or => binary(&mut stack, |a, b| ops.or(a, b))?,
                Kind::Xor => binary(&mut stack, |a, b| ops.xor(a, b))?,
                Kind::In => binary(&mut stack, |a, b| ops.in_(b, a))?,
                Kind::NotIn => binary(&mut stack, |a, b| ops.not(&ops.in_(b, a)?))?,
                Kind::Element => binary(&mut stack, |a, b| ops.get_element(a, b))?,
                Kind::Like => {
                    let pattern = stack.pop()?;
                    let value = stack.pop()?;
                    stack.push(like(ops, &value, &pattern)?);
                }
                Kind::NotLike => {
                    let pattern = stack.pop()?;
                    let value = stack.pop()?;
                    let matched = like(ops, &value, &pattern)?;
                    stack.push(ops.not(&matched)?);
                }
                Kind::Unknown
                | Kind::LeftBrace
                | Kind::RightBrace
                | Kind::LeftSquareBrace
                | Kind::RightSquareBrace
                | Kind::Comma
                | Kind::Is
                | Kind::Null => {
                    return Err(CalculationError::internal(format!(
                        "{} token at {}:{} cannot appear in a postfix program",
                        token.kind, token.line, token.column
                    )))
                }
            }
        }

        if stack.len() != 1 {
            return Err(CalculationError::internal(format!(
                "Program left {} values on the stack",
                stack.len()
            )));
        }
        stack.pop()
    }
}

impl Default for ExpressionCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn add_missing_variables(names: &[String], variables: &mut VariableCollection) {
    for name in names {
        if variables.find(name).is_none() {
            variables.add(Variable::new(name.as_str()));
        }
    }
}

fn token_name(token: &ExpressionToken) -> CalculationResult<&str> {
    token.name().ok_or_else(|| {
        CalculationError::internal(format!(
            "{} token at {}:{} carries no name",
            token.kind, token.line, token.column
        ))
    })
}

fn unary(
    stack: &mut CalculationStack,
    operation: impl FnOnce(&Variant) -> VariantResult<Variant>,
) -> CalculationResult<()> {
    let value = stack.pop()?;
    stack.push(operation(&value)?);
    Ok(())
}

/// Pops the right operand first, then applies `operation(left, right)`
fn binary(
    stack: &mut CalculationStack,
    operation: impl FnOnce(&Variant, &Variant) -> VariantResult<Variant>,
) -> CalculationResult<()> {
    let right = stack.pop()?;
    let left = stack.pop()?;
    stack.push(operation(&left, &right)?);
    Ok(())
}

fn like(ops: &dyn VariantOperations, value: &Variant, pattern: &Variant) -> CalculationResult<Variant> {
    if value.is_null() || pattern.is_null() {
        return Ok(Variant::Null);
    }
    let text = ops.convert(value, VariantType::String)?;
    let pattern = ops.convert(pattern, VariantType::String)?;
    Ok(Variant::Boolean(like_matches(text.as_string()?, pattern.as_string()?)?))
}

/// SQL-style match: `%` any run, `_` or `?` one character; anchored and
/// case-sensitive
pub fn like_matches(text: &str, pattern: &str) -> CalculationResult<bool> {
    let mut expression = String::from("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '%' => expression.push_str(".*"),
            '_' | '?' => expression.push('.'),
            other => expression.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expression.push('$');

    let regex = Regex::new(&expression)
        .map_err(|e| CalculationError::internal(format!("Invalid LIKE pattern '{}': {}", pattern, e)))?;
    Ok(regex.is_match(text))
}
