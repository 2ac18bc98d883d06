use super::error::{CalculationError, CalculationResult};
use crate::variants::Variant;

/// Operand stack of the postfix evaluator
#[derive(Debug, Clone, Default)]
pub struct CalculationStack {
    values: Vec<Variant>,
}

impl CalculationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: Variant) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> CalculationResult<Variant> {
        self.values.pop().ok_or(CalculationError::StackUnderflow)
    }

    /// Pop the top `count` values, keeping them in push order
    pub fn pop_many(&mut self, count: usize) -> CalculationResult<Vec<Variant>> {
        let start = self
            .values
            .len()
            .checked_sub(count)
            .ok_or(CalculationError::StackUnderflow)?;
        Ok(self.values.split_off(start))
    }

    pub fn peek(&self) -> CalculationResult<&Variant> {
        self.values.last().ok_or(CalculationError::StackUnderflow)
    }

    /// Value at `index` counted from the bottom of the stack
    pub fn peek_at(&self, index: usize) -> CalculationResult<&Variant> {
        self.values.get(index).ok_or(CalculationError::StackUnderflow)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_push_pop_order() {
        let mut stack = CalculationStack::new();
        stack.push(Variant::Integer(1));
        stack.push(Variant::Integer(2));

        assert_eq!(stack.peek(), Ok(&Variant::Integer(2)));
        assert_eq!(stack.peek_at(0), Ok(&Variant::Integer(1)));
        assert_eq!(stack.pop(), Ok(Variant::Integer(2)));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_pop_many_keeps_order() {
        let mut stack = CalculationStack::new();
        for i in 1..=4 {
            stack.push(Variant::Integer(i));
        }

        assert_eq!(
            stack.pop_many(3),
            Ok(vec![Variant::Integer(2), Variant::Integer(3), Variant::Integer(4)])
        );
        assert_eq!(stack.pop_many(0), Ok(vec![]));
        assert_matches!(stack.pop_many(2), Err(CalculationError::StackUnderflow));
    }

    #[test]
    fn test_underflow() {
        let mut stack = CalculationStack::new();

        assert_matches!(stack.pop(), Err(CalculationError::StackUnderflow));
        assert_matches!(stack.peek(), Err(CalculationError::StackUnderflow));
        assert_matches!(stack.peek_at(3), Err(CalculationError::StackUnderflow));

        stack.push(Variant::Null);
        stack.clear();
        assert!(stack.is_empty());
    }
}
