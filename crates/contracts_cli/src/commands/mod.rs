pub mod check;
pub mod diff;
pub mod validate;

use anyhow::{Context, Result};
use contracts_core::Contract;
use contracts_parser::parse_file;
use std::path::Path;

/// Loads a contract file in any supported format.
fn load_contract(contract_path: &str) -> Result<Contract> {
    parse_file(Path::new(contract_path))
        .with_context(|| format!("Failed to parse contract file: {}", contract_path))
}

fn describe(contract: &Contract) -> String {
    format!(
        "Contract loaded: {} v{} (owner: {})",
        contract.name,
        contract.version.as_deref().unwrap_or("unversioned"),
        contract.owner.as_deref().unwrap_or("unknown")
    )
}
