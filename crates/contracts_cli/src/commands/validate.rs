use anyhow::{Context, Result};
use contracts_core::{DataSet, ValidationContext};
use contracts_validator::DataValidator;
use tracing::info;

use super::{describe, load_contract};
use crate::output::{self, OutputFormat};

/// Options mapped onto the validation context.
pub struct ValidateOptions {
    pub schema_only: bool,
    pub fail_fast: bool,
    pub sample_size: Option<usize>,
}

pub fn execute(
    contract_path: &str,
    records_path: &str,
    options: ValidateOptions,
    format: OutputFormat,
) -> Result<bool> {
    info!("Validating {} against contract {}", records_path, contract_path);
    info!("Schema only: {}", options.schema_only);
    if let Some(size) = options.sample_size {
        info!("Sample size: {}", size);
    }

    let contract = load_contract(contract_path)?;
    let validator = DataValidator::compile(&contract)
        .with_context(|| format!("Contract '{}' failed to compile", contract.name))?;

    let raw = std::fs::read_to_string(records_path)
        .with_context(|| format!("Failed to read records file: {}", records_path))?;
    let dataset = DataSet::from_json_str(&raw)
        .with_context(|| format!("Failed to load records from: {}", records_path))?;

    if format == OutputFormat::Text {
        output::print_info(&describe(&contract));
        output::print_info(&format!("Loaded {} record(s)", dataset.len()));
    }

    let context = ValidationContext {
        schema_only: options.schema_only,
        fail_fast: options.fail_fast,
        sample_size: options.sample_size,
        metadata: Default::default(),
    }
    .with_metadata("records", records_path);

    let report = validator.validate_with_data(&dataset, &context);
    output::print_batch_report(&report, format)?;

    Ok(report.passed)
}
