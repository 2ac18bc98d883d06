//! Shared utilities for the tokenizer, parser and calculator

pub mod span;

pub use span::{Position, SourceMap, Span};
