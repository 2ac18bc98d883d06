//! Character scanners with unlimited pushback and line/column tracking

/// Character source consumed by tokenizer states
///
/// Positions are 1-based. `line`/`column` describe the last character read,
/// `peek_line`/`peek_column` the next one.
pub trait Scanner {
    /// Consume the next character
    fn read(&mut self) -> Option<char>;

    /// Look at the next character without consuming it
    fn peek(&self) -> Option<char>;

    /// Push the last read character back
    fn unread(&mut self);

    /// Push the last `count` characters back
    fn unread_many(&mut self, count: usize) {
        for _ in 0..count {
            self.unread();
        }
    }

    fn line(&self) -> usize;

    fn column(&self) -> usize;

    fn peek_line(&self) -> usize;

    fn peek_column(&self) -> usize;

    /// Rewind to the beginning of the input
    fn reset(&mut self);
}

/// Scanner over an in-memory string
#[derive(Debug, Clone)]
pub struct StringScanner {
    chars: Vec<char>,
    line_starts: Vec<usize>,
    position: usize,
}

impl StringScanner {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut line_starts = vec![0];
        for (index, ch) in chars.iter().enumerate() {
            if *ch == '\n' {
                line_starts.push(index + 1);
            }
        }

        Self {
            chars,
            line_starts,
            position: 0,
        }
    }

    /// Number of characters consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    fn line_of(&self, index: usize) -> usize {
        match self.line_starts.binary_search(&index) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    fn column_of(&self, index: usize) -> usize {
        let line = self.line_of(index);
        index - self.line_starts[line - 1] + 1
    }
}

impl Scanner for StringScanner {
    fn read(&mut self) -> Option<char> {
        let ch = self.chars.get(self.position).copied()?;
        self.position += 1;
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn unread(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn unread_many(&mut self, count: usize) {
        self.position = self.position.saturating_sub(count);
    }

    fn line(&self) -> usize {
        self.line_of(self.position.saturating_sub(1))
    }

    fn column(&self) -> usize {
        self.column_of(self.position.saturating_sub(1))
    }

    fn peek_line(&self) -> usize {
        self.line_of(self.position)
    }

    fn peek_column(&self) -> usize {
        self.column_of(self.position)
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_unread() {
        let mut scanner = StringScanner::new("ab");

        assert_eq!(scanner.read(), Some('a'));
        assert_eq!(scanner.peek(), Some('b'));
        scanner.unread();
        assert_eq!(scanner.read(), Some('a'));
        assert_eq!(scanner.read(), Some('b'));
        assert_eq!(scanner.read(), None);
        assert_eq!(scanner.read(), None);
    }

    #[test]
    fn test_unread_many_stops_at_start() {
        let mut scanner = StringScanner::new("abc");
        scanner.read();
        scanner.read();
        scanner.unread_many(5);

        assert_eq!(scanner.position(), 0);
        assert_eq!(scanner.peek(), Some('a'));
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut scanner = StringScanner::new("a\nbc");

        assert_eq!((scanner.peek_line(), scanner.peek_column()), (1, 1));
        scanner.read();
        assert_eq!((scanner.line(), scanner.column()), (1, 1));
        scanner.read();
        assert_eq!((scanner.line(), scanner.column()), (1, 2));
        assert_eq!((scanner.peek_line(), scanner.peek_column()), (2, 1));
        scanner.read();
        scanner.read();
        assert_eq!((scanner.line(), scanner.column()), (2, 2));
        assert_eq!((scanner.peek_line(), scanner.peek_column()), (2, 3));
    }

    #[test]
    fn test_reset() {
        let mut scanner = StringScanner::new("xyz");
        while scanner.read().is_some() {}
        scanner.reset();

        assert_eq!(scanner.read(), Some('x'));
    }
}
