use anyhow::Result;
use contracts_core::breaking_changes;
use tracing::info;

use super::load_contract;
use crate::output::{self, OutputFormat};

pub fn execute(old_path: &str, new_path: &str, format: OutputFormat) -> Result<bool> {
    info!("Comparing {} -> {}", old_path, new_path);

    let old = load_contract(old_path)?;
    let new = load_contract(new_path)?;

    let changes = breaking_changes(&old, &new);
    output::print_breaking_changes(&changes, format)?;

    Ok(changes.is_empty())
}
