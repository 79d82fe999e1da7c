//! Error types for rule compilation.

use thiserror::Error;

/// A quality rule expression that failed to tokenize or parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ExpressionError {
    /// Byte offset into the expression source
    pub position: usize,
    /// What went wrong
    pub message: String,
}

impl ExpressionError {
    /// Creates a new expression error.
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Creates an "unexpected token" error.
    pub fn unexpected(position: usize, found: impl std::fmt::Display, expected: &str) -> Self {
        Self::new(position, format!("expected {}, found {}", expected, found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ExpressionError::unexpected(7, "')'", "an operand");
        assert_eq!(err.to_string(), "expected an operand, found ')' at position 7");
    }
}
