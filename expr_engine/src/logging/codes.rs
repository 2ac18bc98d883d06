//! Consolidated error codes and classification system
//!
//! Single source of truth for every stable error code the engine reports, together
//! with its behavioral metadata. Error codes are the public, stable strings callers
//! match on (`VAR_NOT_FOUND`, `ERROR_NEAR`, ...); success codes are internal `I` numbers.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL: Code = Code::new("INTERNAL");
    pub const INITIALIZATION_FAILURE: Code = Code::new("INITIALIZATION_FAILURE");
    pub const CONFIGURATION_ERROR: Code = Code::new("CONFIGURATION_ERROR");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const UNKNOWN_SYMBOL: Code = Code::new("UNKNOWN_SYMBOL");
    pub const MISSING_SYMBOL_STATE: Code = Code::new("MISSING_SYMBOL_STATE");
    pub const INCORRECT_STATE_USAGE: Code = Code::new("INCORRECT_STATE_USAGE");
    pub const TOO_MANY_TOKENS: Code = Code::new("TOO_MANY_TOKENS");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("EXPRESSION_TOO_LONG");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_END: Code = Code::new("UNEXPECTED_END");
    pub const ERROR_NEAR: Code = Code::new("ERROR_NEAR");
    pub const ERROR_AT: Code = Code::new("ERROR_AT");
    pub const MISSED_CLOSE_PARENTHESIS: Code = Code::new("MISSED_CLOSE_PARENTHESIS");
    pub const MISSED_CLOSE_SQUARE_BRACKET: Code = Code::new("MISSED_CLOSE_SQUARE_BRACKET");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("MAX_RECURSION_DEPTH");
}

/// Variant conversion and operator error codes
pub mod variant {
    use super::Code;

    pub const UNSUPPORTED_OPERATION: Code = Code::new("UNSUPPORTED_OPERATION");
    pub const UNSUPPORTED_CONVERSION: Code = Code::new("UNSUPPORTED_CONVERSION");
    pub const CONVERSION_FAILED: Code = Code::new("CONVERSION_FAILED");
    pub const WRONG_KIND: Code = Code::new("WRONG_KIND");
    pub const DIVISION_BY_ZERO: Code = Code::new("DIVISION_BY_ZERO");
    pub const INDEX_OUT_OF_RANGE: Code = Code::new("INDEX_OUT_OF_RANGE");
}

/// Evaluation error codes
pub mod evaluation {
    use super::Code;

    pub const VAR_NOT_FOUND: Code = Code::new("VAR_NOT_FOUND");
    pub const FUNC_NOT_FOUND: Code = Code::new("FUNC_NOT_FOUND");
    pub const WRONG_PARAM_COUNT: Code = Code::new("WRONG_PARAM_COUNT");
    pub const STACK_UNDERFLOW: Code = Code::new("STACK_UNDERFLOW");
    pub const FUNCTION_FAILED: Code = Code::new("FUNCTION_FAILED");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSING_COMPLETE: Code = Code::new("I040");
    pub const EVALUATION_COMPLETE: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();
        let mut add = |metadata: ErrorMetadata| {
            registry.insert(metadata.code, metadata);
        };

        // System errors
        add(ErrorMetadata::new(
            "INTERNAL",
            "System",
            Severity::Critical,
            false,
            "Internal engine error or malformed postfix program",
            "Report the expression that triggered it; programs built by the parser never fail this way",
        ));
        add(ErrorMetadata::new(
            "INITIALIZATION_FAILURE",
            "System",
            Severity::Critical,
            false,
            "Engine initialization failed",
            "Check logging and configuration setup",
        ));
        add(ErrorMetadata::new(
            "CONFIGURATION_ERROR",
            "System",
            Severity::High,
            true,
            "Runtime configuration could not be loaded",
            "Fix the TOML file or the EXPR_* environment variables",
        ));

        // Lexical errors
        add(ErrorMetadata::new(
            "UNKNOWN_SYMBOL",
            "Lexical",
            Severity::High,
            true,
            "Input contains a symbol the expression grammar does not know",
            "Remove or quote the offending character",
        ));
        add(ErrorMetadata::new(
            "MISSING_SYMBOL_STATE",
            "Lexical",
            Severity::Critical,
            false,
            "Tokenizer delegated to a symbol state that was never assigned",
            "Assign a symbol state when wiring a custom tokenizer",
        ));
        add(ErrorMetadata::new(
            "INCORRECT_STATE_USAGE",
            "Lexical",
            Severity::Critical,
            false,
            "Tokenizer state was registered for characters it cannot start on",
            "Check the character intervals assigned to the state",
        ));
        add(ErrorMetadata::new(
            "TOO_MANY_TOKENS",
            "Lexical",
            Severity::High,
            true,
            "Input produced more tokens than the configured limit",
            "Shorten the input or raise max_token_count in the build profile",
        ));
        add(ErrorMetadata::new(
            "EXPRESSION_TOO_LONG",
            "Lexical",
            Severity::High,
            true,
            "Expression text exceeds the configured length limit",
            "Shorten the expression or raise max_expression_length in the build profile",
        ));

        // Syntax errors
        add(ErrorMetadata::new(
            "UNEXPECTED_END",
            "Syntax",
            Severity::High,
            true,
            "Expression ended where an operand or terminator was required",
            "Complete the expression",
        ));
        add(ErrorMetadata::new(
            "ERROR_NEAR",
            "Syntax",
            Severity::High,
            true,
            "Tokens remain after a complete expression",
            "Remove the trailing tokens or add the missing operator",
        ));
        add(ErrorMetadata::new(
            "ERROR_AT",
            "Syntax",
            Severity::High,
            true,
            "Token cannot start an operand",
            "Insert a constant, variable, function call or parenthesized expression",
        ));
        add(ErrorMetadata::new(
            "MISSED_CLOSE_PARENTHESIS",
            "Syntax",
            Severity::High,
            true,
            "Expected ')' was not found",
            "Balance the parentheses",
        ));
        add(ErrorMetadata::new(
            "MISSED_CLOSE_SQUARE_BRACKET",
            "Syntax",
            Severity::High,
            true,
            "Expected ']' was not found",
            "Close the index expression",
        ));
        add(ErrorMetadata::new(
            "MAX_RECURSION_DEPTH",
            "Syntax",
            Severity::High,
            false,
            "Expression nesting exceeds the configured parse depth",
            "Flatten the expression or raise max_parse_depth in the build profile",
        ));

        // Variant errors
        add(ErrorMetadata::new(
            "UNSUPPORTED_OPERATION",
            "Variant",
            Severity::Medium,
            true,
            "Operator is not defined for the operand type",
            "Convert the operands or use the type-unsafe operations",
        ));
        add(ErrorMetadata::new(
            "UNSUPPORTED_CONVERSION",
            "Variant",
            Severity::Medium,
            true,
            "Value cannot be converted to the requested type",
            "Use compatible operand types or the type-unsafe operations",
        ));
        add(ErrorMetadata::new(
            "CONVERSION_FAILED",
            "Variant",
            Severity::Medium,
            true,
            "Value text could not be parsed as the requested type",
            "Check the formatting of the converted value",
        ));
        add(ErrorMetadata::new(
            "WRONG_KIND",
            "Variant",
            Severity::Medium,
            true,
            "Typed accessor used on a value of another type",
            "Check the value type before extracting it",
        ));
        add(ErrorMetadata::new(
            "DIVISION_BY_ZERO",
            "Variant",
            Severity::Medium,
            true,
            "Integer division or remainder by zero",
            "Guard the divisor or use floating point operands",
        ));
        add(ErrorMetadata::new(
            "INDEX_OUT_OF_RANGE",
            "Variant",
            Severity::Medium,
            true,
            "Index lies outside the array, string or argument list",
            "Check the index against the length",
        ));

        // Evaluation errors
        add(ErrorMetadata::new(
            "VAR_NOT_FOUND",
            "Evaluation",
            Severity::Medium,
            true,
            "Variable is not defined in the active collection",
            "Define the variable or enable automatic variables",
        ));
        add(ErrorMetadata::new(
            "FUNC_NOT_FOUND",
            "Evaluation",
            Severity::Medium,
            true,
            "Function is not defined in the active collection",
            "Register the function or fix its name",
        ));
        add(ErrorMetadata::new(
            "WRONG_PARAM_COUNT",
            "Evaluation",
            Severity::Medium,
            true,
            "Function was called with an unsupported number of arguments",
            "Check the function's arity",
        ));
        add(ErrorMetadata::new(
            "STACK_UNDERFLOW",
            "Evaluation",
            Severity::Critical,
            false,
            "Operand stack was empty when a value was required",
            "Only evaluate programs produced by the expression parser",
        ));
        add(ErrorMetadata::new(
            "FUNCTION_FAILED",
            "Evaluation",
            Severity::Medium,
            true,
            "A registered function reported a failure",
            "Inspect the function's message",
        ));

        // Success codes
        add(ErrorMetadata::new(
            "I001",
            "System",
            Severity::Low,
            true,
            "Operation completed successfully",
            "Continue processing",
        ));
        add(ErrorMetadata::new(
            "I004",
            "System",
            Severity::Low,
            true,
            "System initialization completed",
            "Continue processing",
        ));
        add(ErrorMetadata::new(
            "I020",
            "Lexical",
            Severity::Low,
            true,
            "Tokenization completed",
            "Continue to parsing",
        ));
        add(ErrorMetadata::new(
            "I040",
            "Syntax",
            Severity::Low,
            true,
            "Expression parsed into a postfix program",
            "Continue to evaluation",
        ));
        add(ErrorMetadata::new(
            "I060",
            "Evaluation",
            Severity::Low,
            true,
            "Expression evaluated",
            "Use the result",
        ));

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let all = [
            system::INTERNAL,
            system::INITIALIZATION_FAILURE,
            system::CONFIGURATION_ERROR,
            lexical::UNKNOWN_SYMBOL,
            lexical::MISSING_SYMBOL_STATE,
            lexical::INCORRECT_STATE_USAGE,
            lexical::TOO_MANY_TOKENS,
            lexical::EXPRESSION_TOO_LONG,
            syntax::UNEXPECTED_END,
            syntax::ERROR_NEAR,
            syntax::ERROR_AT,
            syntax::MISSED_CLOSE_PARENTHESIS,
            syntax::MISSED_CLOSE_SQUARE_BRACKET,
            syntax::MAX_RECURSION_DEPTH,
            variant::UNSUPPORTED_OPERATION,
            variant::UNSUPPORTED_CONVERSION,
            variant::CONVERSION_FAILED,
            variant::WRONG_KIND,
            variant::DIVISION_BY_ZERO,
            variant::INDEX_OUT_OF_RANGE,
            evaluation::VAR_NOT_FOUND,
            evaluation::FUNC_NOT_FOUND,
            evaluation::WRONG_PARAM_COUNT,
            evaluation::STACK_UNDERFLOW,
            evaluation::FUNCTION_FAILED,
            success::TOKENIZATION_COMPLETE,
            success::PARSING_COMPLETE,
            success::EVALUATION_COMPLETE,
        ];

        for code in all {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification_fallbacks() {
        assert_eq!(get_description("NOPE"), "Unknown error");
        assert_eq!(get_category("NOPE"), "Unknown");
        assert_eq!(get_severity("NOPE"), Severity::Medium);
        assert!(is_recoverable("NOPE"));
    }

    #[test]
    fn test_internal_is_critical() {
        assert_eq!(get_severity("INTERNAL"), Severity::Critical);
        assert!(!is_recoverable("INTERNAL"));
        assert_eq!(get_category("VAR_NOT_FOUND"), "Evaluation");
    }
}
