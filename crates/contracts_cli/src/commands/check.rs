use anyhow::{Context, Result};
use contracts_validator::DataValidator;
use tracing::info;

use super::{describe, load_contract};
use crate::output::{self, OutputFormat};

pub fn execute(contract_path: &str, format: OutputFormat) -> Result<bool> {
    info!("Checking contract: {}", contract_path);

    let contract = load_contract(contract_path)?;
    let validator = DataValidator::compile(&contract)
        .with_context(|| format!("Contract '{}' failed to compile", contract.name))?;

    if format == OutputFormat::Text {
        output::print_info(&describe(&contract));
        output::print_success("Contract is valid");
    }
    output::print_contract_summary(&contract, &validator, format)?;

    Ok(true)
}
