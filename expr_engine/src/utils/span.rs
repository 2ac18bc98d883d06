//! Source location tracking for expression text
//!
//! Tokens carry 1-based line/column pairs. This module turns those back into
//! byte ranges so errors can be shown against the original expression.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self::new(self.offset + 1, self.line + 1, 1),
            _ => Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1),
        }
    }

    /// Advance position by a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Create a single-character span
    pub fn single(pos: Position) -> Self {
        let end = Position::new(pos.offset + 1, pos.line, pos.column + 1);
        Self { start: pos, end }
    }

    /// Get the byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Get the source text for this span from the input
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A source map that tracks line starts for efficient position lookup
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// The original source text
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Get the line and column for a byte offset
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, line + 1, column + 1)
    }

    /// Resolve a 1-based line/column pair back to a position
    ///
    /// Columns past the end of the line clamp to the line end.
    pub fn position_of(&self, line: usize, column: usize) -> Option<Position> {
        let line_idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let text = self.get_line(line)?;

        let skip = column.saturating_sub(1);
        let offset = text
            .char_indices()
            .nth(skip)
            .map(|(i, _)| start + i)
            .unwrap_or(start + text.len());

        Some(Position::new(offset, line, skip.min(text.chars().count()) + 1))
    }

    /// Span covering `text` when it starts at the given line/column
    pub fn span_for(&self, line: usize, column: usize, text: &str) -> Span {
        let start = self
            .position_of(line, column)
            .unwrap_or_else(|| self.position_at(self.source.len()));
        let end = start.advance_str(text);
        let end = if end.offset > self.source.len() {
            self.position_at(self.source.len())
        } else {
            end
        };
        Span::new(start, end)
    }

    /// Get a line of text by line number (1-based)
    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        let line_idx = line_num.checked_sub(1)?;
        if line_idx >= self.line_starts.len() {
            return None;
        }

        let start = self.line_starts[line_idx];
        let end = if line_idx + 1 < self.line_starts.len() {
            self.line_starts[line_idx + 1] - 1
        } else {
            self.source.len()
        };

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Get the text covered by a span
    pub fn span_text(&self, span: &Span) -> &str {
        span.slice(&self.source)
    }

    /// Format an error message with source context
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("Error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = format!("{}", span.start.line);
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("   {} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let mut underline = String::new();
            underline.push_str(&format!("   {} | ", padding));

            for _ in 1..span.start.column {
                underline.push(' ');
            }

            let span_len = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column)
            } else {
                line.chars()
                    .count()
                    .saturating_sub(span.start.column.saturating_sub(1))
            };

            for _ in 0..span_len.max(1) {
                underline.push('^');
            }

            result.push_str(&underline);
            result.push('\n');
        }

        result
    }
}
