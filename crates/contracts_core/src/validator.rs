//! Validation traits and verdict types for data contracts.
//!
//! This module defines the trait every record validator implements, the context
//! that tunes a validation run, and the verdicts it produces. Verdicts are plain
//! data: rendering them is left to the caller.

use crate::{DataSet, FieldType, Record, RuleError, ValueKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Core trait for validating records against a compiled contract.
///
/// Implementations hold no mutable state, so one instance can be shared across
/// threads and applied to any number of records.
///
/// # Example
///
/// ```rust
/// use contracts_core::{ContractValidator, Outcome, Record, ValidationContext};
///
/// struct AcceptAll;
///
/// impl ContractValidator for AcceptAll {
///     fn contract_name(&self) -> &str {
///         "anything"
///     }
///
///     fn validate_record(&self, _record: &Record, _context: &ValidationContext) -> Outcome {
///         Outcome::Pass
///     }
/// }
///
/// let outcome = AcceptAll.validate_record(&Record::new(), &ValidationContext::new());
/// assert!(outcome.is_pass());
/// ```
pub trait ContractValidator: Send + Sync {
    /// Name of the contract this validator was compiled from.
    fn contract_name(&self) -> &str;

    /// Runs every validation phase against one record.
    fn validate_record(&self, record: &Record, context: &ValidationContext) -> Outcome;

    /// Validates a dataset and aggregates the per-record verdicts.
    ///
    /// The batch passes iff every validated record passes. Every verdict is kept,
    /// so callers can report all failures from a single run.
    fn validate_dataset(&self, dataset: &DataSet, context: &ValidationContext) -> BatchReport {
        let limit = context.sample_size.unwrap_or(usize::MAX);
        let mut verdicts = Vec::new();

        for (index, record) in dataset.rows().take(limit).enumerate() {
            let outcome = self.validate_record(record, context);
            let failed = !outcome.is_pass();
            verdicts.push(RecordVerdict { index, outcome });
            if failed && context.fail_fast {
                break;
            }
        }

        BatchReport::new(self.contract_name(), verdicts, context)
    }
}

/// Context for validation operations.
#[derive(Debug, Default, Clone)]
pub struct ValidationContext {
    /// Stop after the semantic phase; quality rules are not evaluated
    pub schema_only: bool,

    /// Stop the batch at the first failing record
    pub fail_fast: bool,

    /// Maximum number of records to validate, taken from the front
    pub sample_size: Option<usize>,

    /// Additional metadata echoed into the batch report
    pub metadata: BTreeMap<String, String>,
}

impl ValidationContext {
    /// Creates a new validation context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets schema-only validation mode.
    pub fn with_schema_only(mut self, schema_only: bool) -> Self {
        self.schema_only = schema_only;
        self
    }

    /// Sets fail-fast mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Sets the sample size.
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Adds metadata to the context.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Validation phase in which a record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Structural,
    Semantic,
    QualityRule,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Structural => "structural",
            Phase::Semantic => "semantic",
            Phase::QualityRule => "quality_rule",
        })
    }
}

/// Why a field failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationReason {
    /// A required field is absent
    MissingRequired,
    /// The value's runtime type does not satisfy the declared type
    WrongType {
        expected: FieldType,
        actual: ValueKind,
    },
}

/// A field-level structural violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralViolation {
    pub field: String,
    #[serde(flatten)]
    pub reason: ViolationReason,
}

impl StructuralViolation {
    /// Creates a missing required field violation.
    pub fn missing_required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: ViolationReason::MissingRequired,
        }
    }

    /// Creates a wrong type violation.
    pub fn wrong_type(field: impl Into<String>, expected: FieldType, actual: ValueKind) -> Self {
        Self {
            field: field.into(),
            reason: ViolationReason::WrongType { expected, actual },
        }
    }
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ViolationReason::MissingRequired => {
                write!(f, "Required field '{}' is missing", self.field)
            }
            ViolationReason::WrongType { expected, actual } => write!(
                f,
                "Type mismatch for field '{}': expected {}, found {}",
                self.field, expected, actual
            ),
        }
    }
}

/// A semantic tag demanded a runtime type the value does not have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticViolation {
    pub field: String,
    /// Tag key, e.g. `unit`
    pub tag_key: String,
    /// Tag value, e.g. `cents`
    pub tag: String,
    pub expected_type: ValueKind,
    pub actual_type: ValueKind,
}

impl fmt::Display for SemanticViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field '{}' with {} '{}' must be {}, found {}",
            self.field, self.tag_key, self.tag, self.expected_type, self.actual_type
        )
    }
}

/// Typed detail of a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureDetail {
    Structural(StructuralViolation),
    Semantic(SemanticViolation),
    /// The rule evaluated cleanly to `false`
    RuleFalse { rule: String, expression: String },
    RuleError(RuleError),
}

/// Why a record failed, attributable to one field or rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub phase: Phase,
    /// Offending field or rule name
    pub subject: String,
    pub message: String,
    pub detail: FailureDetail,
    /// Further violations found in the same phase, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<String>,
}

impl Failure {
    /// Builds a structural failure from the violations of one record.
    ///
    /// Returns `None` when there are no violations.
    pub fn structural(mut violations: Vec<StructuralViolation>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        let first = violations.remove(0);
        Some(Self {
            phase: Phase::Structural,
            subject: first.field.clone(),
            message: first.to_string(),
            additional: violations.iter().map(ToString::to_string).collect(),
            detail: FailureDetail::Structural(first),
        })
    }

    /// Builds a semantic failure from the violations of one record.
    pub fn semantic(mut violations: Vec<SemanticViolation>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        let first = violations.remove(0);
        Some(Self {
            phase: Phase::Semantic,
            subject: first.field.clone(),
            message: first.to_string(),
            additional: violations.iter().map(ToString::to_string).collect(),
            detail: FailureDetail::Semantic(first),
        })
    }

    /// A rule that evaluated to `false`.
    pub fn rule_false(rule: impl Into<String>, expression: impl Into<String>) -> Self {
        let rule = rule.into();
        let expression = expression.into();
        Self {
            phase: Phase::QualityRule,
            subject: rule.clone(),
            message: format!("Quality rule '{}' failed: expression '{}' is false", rule, expression),
            detail: FailureDetail::RuleFalse { rule, expression },
            additional: Vec::new(),
        }
    }

    /// A rule that could not be evaluated.
    pub fn rule_error(error: RuleError) -> Self {
        Self {
            phase: Phase::QualityRule,
            subject: error.rule_name.clone(),
            message: error.to_string(),
            detail: FailureDetail::RuleError(error),
            additional: Vec::new(),
        }
    }
}

/// Terminal state of one record's validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail(Failure),
}

impl Outcome {
    /// Returns true if the record passed every phase.
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// Returns the failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail(failure) => Some(failure),
        }
    }
}

/// Verdict for one record in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordVerdict {
    /// Position of the record in the input
    pub index: usize,
    pub outcome: Outcome,
}

impl RecordVerdict {
    /// Returns true if the record passed.
    pub fn passed(&self) -> bool {
        self.outcome.is_pass()
    }
}

/// Aggregated result of validating a batch of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Contract the records were validated against
    pub contract: String,

    /// Whether every validated record passed
    pub passed: bool,

    /// Number of records validated
    pub records_validated: usize,

    /// Number of failing records
    pub records_failed: usize,

    /// One verdict per validated record, in input order
    pub verdicts: Vec<RecordVerdict>,

    /// Caller metadata copied from the context
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl BatchReport {
    /// Aggregates per-record verdicts.
    pub fn new(
        contract: impl Into<String>,
        verdicts: Vec<RecordVerdict>,
        context: &ValidationContext,
    ) -> Self {
        let records_failed = verdicts.iter().filter(|v| !v.passed()).count();
        Self {
            contract: contract.into(),
            passed: records_failed == 0,
            records_validated: verdicts.len(),
            records_failed,
            verdicts,
            metadata: context.metadata.clone(),
        }
    }

    /// Returns the failing verdicts with their failures.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Failure)> {
        self.verdicts
            .iter()
            .filter_map(|v| v.outcome.failure().map(|f| (v.index, f)))
    }
}
