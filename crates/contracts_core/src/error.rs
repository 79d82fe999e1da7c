//! Error types for data contracts.
//!
//! `ContractError` is the only fatal error in the engine: it is raised while a
//! contract is compiled and means no validator was produced. Per-record problems
//! are reported as verdicts instead (see [`crate::RecordVerdict`]).

use serde::Serialize;
use thiserror::Error;

/// Errors raised when a contract's declared structure is inconsistent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// The same field name is declared twice
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// A field has an empty name
    #[error("Field name cannot be empty")]
    EmptyFieldName,

    /// The same quality rule name is declared twice
    #[error("Duplicate quality rule name: {0}")]
    DuplicateRule(String),

    /// A quality rule has an empty name
    #[error("Quality rule name cannot be empty")]
    EmptyRuleName,

    /// A quality rule expression could not be compiled
    #[error("Invalid expression in quality rule '{rule}': {message}")]
    InvalidRule {
        /// Rule name
        rule: String,
        /// Compiler message, including the offending position
        message: String,
    },
}

impl ContractError {
    /// Creates a new invalid rule error.
    pub fn invalid_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Why a quality rule could not be evaluated against a record.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleErrorCause {
    /// The expression references a field the record does not carry
    #[error("field '{field}' is not present in the record")]
    MissingField { field: String },

    /// A binary operator received operands it cannot combine
    #[error("cannot apply '{operator}' to {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
    },

    /// An operator or function received an operand of the wrong kind
    #[error("'{operator}' expects {expected}, found {found}")]
    UnexpectedOperand {
        operator: String,
        expected: String,
        found: String,
    },

    /// The whole expression did not produce a boolean
    #[error("expression evaluated to {found}, not a boolean")]
    NonBoolean { found: String },

    /// Division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed
    #[error("integer overflow in '{operator}'")]
    Overflow { operator: String },

    /// The expression could not be parsed (one-shot evaluation only)
    #[error("syntax error: {message}")]
    Syntax { message: String },
}

/// A quality rule that could not be evaluated.
///
/// Treated by the orchestrator as a failed rule, never as a crash.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("Quality rule '{rule_name}' could not be evaluated: {cause}")]
pub struct RuleError {
    /// Name of the rule
    pub rule_name: String,
    /// Underlying cause
    pub cause: RuleErrorCause,
}

impl RuleError {
    /// Creates a new rule error.
    pub fn new(rule_name: impl Into<String>, cause: RuleErrorCause) -> Self {
        Self {
            rule_name: rule_name.into(),
            cause,
        }
    }
}
