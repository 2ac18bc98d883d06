use clap::Parser;
use expr_engine::calculator::{CalculationError, VariableCollection};
use expr_engine::config::RuntimeConfig;
use expr_engine::parser::SyntaxError;
use expr_engine::utils::SourceMap;
use expr_engine::{logging, ExpressionCalculator, ExpressionError, ExpressionTokenizer, Variant};
use futures::executor::block_on;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "exprcalc", version, about = "Evaluate expressions with the expression engine")]
struct Cli {
    /// Expression to evaluate; each stdin line is evaluated when omitted
    expression: Option<String>,

    /// Variable assignment NAME=VALUE; VALUE is read as JSON, else as text
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    vars: Vec<(String, Variant)>,

    /// Use type-safe operations (no narrowing or string conversions)
    #[arg(long)]
    type_safe: bool,

    /// Print the tokenizer output
    #[arg(long)]
    tokens: bool,

    /// Print the postfix program
    #[arg(long)]
    postfix: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Runtime preferences file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RuntimeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[{}] {}", e.error_code(), e);
                return ExitCode::FAILURE;
            }
        },
        None => RuntimeConfig::default(),
    };

    if let Err(e) = logging::config::init_runtime_preferences(config.logging.clone()) {
        eprintln!("Logging setup failed: {}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = logging::init_global_logging() {
        eprintln!("Logging setup failed: {}", e);
        return ExitCode::FAILURE;
    }

    let mut preferences = config.evaluation;
    preferences.type_safe_operations |= cli.type_safe;

    let mut variables = VariableCollection::new();
    for (name, value) in &cli.vars {
        variables.set(name, value.clone());
    }

    let mut calculator = ExpressionCalculator::with_preferences(preferences);

    let succeeded = match &cli.expression {
        Some(expression) => run(&cli, &mut calculator, &mut variables, expression),
        None => {
            let mut all_ok = true;
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("Failed to read stdin: {}", e);
                        return ExitCode::FAILURE;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                all_ok &= run(&cli, &mut calculator, &mut variables, &line);
            }
            all_ok
        }
    };

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn parse_assignment(text: &str) -> Result<(String, Variant), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", text));
    }

    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => Variant::from_json(&json),
        Err(_) => Variant::from_string(value),
    };
    Ok((name.to_string(), value))
}

/// Evaluate one expression and print the outcome; returns false on failure
fn run(
    cli: &Cli,
    calculator: &mut ExpressionCalculator,
    variables: &mut VariableCollection,
    expression: &str,
) -> bool {
    if cli.tokens {
        match ExpressionTokenizer::new().tokenize(expression) {
            Ok(tokens) => {
                for token in &tokens {
                    println!("{:>4}:{:<4} {}", token.line, token.column, token);
                }
            }
            Err(e) => {
                report(expression, &ExpressionError::Syntax(SyntaxError::from(e)));
                return false;
            }
        }
    }

    let result = evaluate(calculator, variables, expression, cli.postfix);
    match result {
        Ok(value) if cli.json => {
            println!("{}", value.to_json());
            true
        }
        Ok(value) => {
            println!("{}", value);
            true
        }
        Err(e) => {
            report(expression, &e);
            false
        }
    }
}

fn evaluate(
    calculator: &mut ExpressionCalculator,
    variables: &mut VariableCollection,
    expression: &str,
    print_postfix: bool,
) -> Result<Variant, ExpressionError> {
    calculator.set_expression(expression)?;
    calculator.create_variables(variables);

    if print_postfix {
        let program: Vec<String> = calculator
            .result_tokens()
            .iter()
            .map(|token| token.to_string())
            .collect();
        println!("{}", program.join(" "));
    }

    Ok(block_on(calculator.evaluate_with_variables(variables))?)
}

fn report(expression: &str, error: &ExpressionError) {
    let message = format!("[{}] {}", error.error_code(), error);

    match error.position() {
        Some((line, column)) if line > 0 => {
            let map = SourceMap::new(expression);
            let span = map.span_for(line, column, offending_text(error));
            eprint!("{}", map.format_error(&span, &message));
        }
        _ => eprintln!("Error: {}", message),
    }
}

/// Text of the token the error points at, used to size the underline
fn offending_text(error: &ExpressionError) -> &str {
    match error {
        ExpressionError::Syntax(SyntaxError::ErrorNear { token, .. })
        | ExpressionError::Syntax(SyntaxError::ErrorAt { token, .. }) => token.as_str(),
        ExpressionError::Syntax(SyntaxError::UnknownSymbol { symbol, .. }) => symbol.as_str(),
        ExpressionError::Calculation(CalculationError::VariableNotFound { name, .. })
        | ExpressionError::Calculation(CalculationError::FunctionNotFound { name, .. }) => {
            name.as_str()
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("a=12"),
            Ok(("a".to_string(), Variant::Integer(12)))
        );
        assert_eq!(
            parse_assignment("name=xyz"),
            Ok(("name".to_string(), Variant::from_string("xyz")))
        );
        assert_eq!(
            parse_assignment("s=\"1\""),
            Ok(("s".to_string(), Variant::from_string("1")))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=3").is_err());
    }

    #[test]
    fn test_evaluate_creates_missing_variables() {
        let mut calculator = ExpressionCalculator::with_preferences(Default::default());
        let mut variables = VariableCollection::new();
        variables.set("a", 2);

        let value = evaluate(&mut calculator, &mut variables, "If(b IS NULL, a * 3, 0)", false);

        assert_eq!(value.ok(), Some(Variant::Integer(6)));
        assert!(variables.find("b").is_some());
    }

    #[test]
    fn test_offending_text() {
        let mut calculator = ExpressionCalculator::with_preferences(Default::default());
        let mut variables = VariableCollection::new();

        let error = evaluate(&mut calculator, &mut variables, "Missing(1)", false).unwrap_err();
        assert_eq!(offending_text(&error), "Missing");
        assert_eq!(error.position(), Some((1, 1)));
    }
}
