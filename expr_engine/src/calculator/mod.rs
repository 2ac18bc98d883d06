//! Postfix program evaluation over Variant values

pub mod builtin;
#[allow(clippy::module_inception)]
pub mod calculator;
pub mod error;
pub mod functions;
pub mod stack;
pub mod variables;

pub use calculator::{like_matches, ExpressionCalculator};
pub use error::{CalculationError, CalculationResult};
pub use functions::{DelegatedFunction, Function, FunctionCollection, FunctionFuture};
pub use stack::CalculationStack;
pub use variables::{Variable, VariableCollection};
