//! Main validation engine.
//!
//! This module provides the `DataValidator` that orchestrates the three
//! validation phases for each record: structural, semantic, then quality rules.

use crate::{QualityValidator, SemanticOverlay, StructuralValidator};
use contracts_core::{
    BatchReport, Contract, ContractError, ContractValidator, DataSet, Failure, Outcome, Record,
    RecordVerdict, ValidationContext,
};
use tracing::{debug, info};

/// A contract compiled for record validation.
///
/// Compilation checks the contract once (field and rule names, rule syntax);
/// validation is then a pure function of the compiled contract and a record.
/// The validator holds no mutable state and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use contracts_core::{ContractBuilder, DataValue, FieldBuilder, Phase, Record};
/// use contracts_validator::DataValidator;
///
/// let contract = ContractBuilder::new("orders")
///     .field(
///         FieldBuilder::new("amount_cents", "integer")
///             .required(true)
///             .tag("unit", "cents")
///             .build(),
///     )
///     .quality_rule("positive_amount", "amount_cents > 0")
///     .build();
///
/// let validator = DataValidator::compile(&contract).unwrap();
///
/// let record = Record::from([("amount_cents".to_string(), DataValue::Integer(-5))]);
/// let outcome = validator.validate(&record);
///
/// let failure = outcome.failure().unwrap();
/// assert_eq!(failure.phase, Phase::QualityRule);
/// assert_eq!(failure.subject, "positive_amount");
/// ```
#[derive(Debug, Clone)]
pub struct DataValidator {
    contract_name: String,
    structural: StructuralValidator,
    semantic: SemanticOverlay,
    quality: QualityValidator,
}

impl DataValidator {
    /// Compiles a contract.
    ///
    /// Fails on duplicate or empty field names, duplicate or empty rule names, and
    /// rule expressions that do not parse. Nothing is partially compiled.
    pub fn compile(contract: &Contract) -> Result<Self, ContractError> {
        let structural = StructuralValidator::compile(contract)?;
        let semantic = SemanticOverlay::compile(contract);
        let quality = QualityValidator::compile(contract)?;

        debug!(
            contract = %contract.name,
            fields = structural.field_count(),
            tagged_fields = semantic.tagged_fields().count(),
            rules = quality.rules().len(),
            "compiled contract"
        );

        Ok(Self {
            contract_name: contract.name.clone(),
            structural,
            semantic,
            quality,
        })
    }

    /// The structural phase of this validator.
    pub fn structural(&self) -> &StructuralValidator {
        &self.structural
    }

    /// The semantic phase of this validator.
    pub fn semantic(&self) -> &SemanticOverlay {
        &self.semantic
    }

    /// The quality rule phase of this validator.
    pub fn quality(&self) -> &QualityValidator {
        &self.quality
    }

    /// Validates one record with default settings.
    pub fn validate(&self, record: &Record) -> Outcome {
        self.validate_record(record, &ValidationContext::default())
    }

    /// Validates a slice of records with default settings.
    ///
    /// Every record is validated and every verdict is kept.
    pub fn validate_batch(&self, records: &[Record]) -> BatchReport {
        let verdicts = records
            .iter()
            .enumerate()
            .map(|(index, record)| RecordVerdict {
                index,
                outcome: self.validate(record),
            })
            .collect();

        let report = BatchReport::new(&self.contract_name, verdicts, &ValidationContext::default());
        log_summary(&report);
        report
    }

    /// Validates a dataset under the given context and logs a summary.
    pub fn validate_with_data(&self, dataset: &DataSet, context: &ValidationContext) -> BatchReport {
        let report = self.validate_dataset(dataset, context);
        log_summary(&report);
        report
    }
}

impl ContractValidator for DataValidator {
    fn contract_name(&self) -> &str {
        &self.contract_name
    }

    fn validate_record(&self, record: &Record, context: &ValidationContext) -> Outcome {
        if let Some(failure) = Failure::structural(self.structural.check(record)) {
            debug!(field = %failure.subject, "structural check failed");
            return Outcome::Fail(failure);
        }

        if let Some(failure) = Failure::semantic(self.semantic.check(record)) {
            debug!(field = %failure.subject, "semantic check failed");
            return Outcome::Fail(failure);
        }

        if context.schema_only {
            return Outcome::Pass;
        }

        match self.quality.first_failure(record) {
            Some(failure) => Outcome::Fail(failure),
            None => Outcome::Pass,
        }
    }
}

fn log_summary(report: &BatchReport) {
    info!(
        contract = %report.contract,
        passed = report.passed,
        records_validated = report.records_validated,
        records_failed = report.records_failed,
        "validated batch"
    );
}

/// Compiles a contract into a reusable validator.
pub fn compile(contract: &Contract) -> Result<DataValidator, ContractError> {
    DataValidator::compile(contract)
}

/// Compiles a contract and validates a single record against it.
pub fn validate(contract: &Contract, record: &Record) -> Result<RecordVerdict, ContractError> {
    let validator = DataValidator::compile(contract)?;
    Ok(RecordVerdict {
        index: 0,
        outcome: validator.validate(record),
    })
}

/// Compiles a contract and validates a batch of records against it.
///
/// The batch passes iff every record passes. Failing verdicts are all retained.
pub fn validate_batch(contract: &Contract, records: &[Record]) -> Result<BatchReport, ContractError> {
    Ok(DataValidator::compile(contract)?.validate_batch(records))
}
