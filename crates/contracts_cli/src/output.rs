use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use contracts_core::{BatchReport, BreakingChange, Contract};
use contracts_validator::DataValidator;
use serde_json::json;

/// How reports are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_batch_report(report: &BatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            print_text_report(report);
            Ok(())
        }
    }
}

fn print_text_report(report: &BatchReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if report.passed {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if report.records_failed > 0 {
        println!("\n{}", "Failures:".red().bold());
        for (index, failure) in report.failures() {
            println!(
                "  record {} [{}] {}",
                index,
                failure.phase.to_string().yellow(),
                failure.message.red()
            );
            for extra in &failure.additional {
                println!("      also: {}", extra);
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Contract:          {}", report.contract);
    println!("  Records validated: {}", report.records_validated);
    println!("  Records failed:    {}", report.records_failed);
    for (key, value) in &report.metadata {
        println!("  {}: {}", key, value);
    }
    println!("{}", "═".repeat(60));
}

pub fn print_contract_summary(
    contract: &Contract,
    validator: &DataValidator,
    format: OutputFormat,
) -> Result<()> {
    let tagged: Vec<&str> = validator.semantic().tagged_fields().collect();

    if format == OutputFormat::Json {
        let output = json!({
            "name": contract.name,
            "version": contract.version,
            "owner": contract.owner,
            "description": contract.description,
            "fields": validator.structural().field_count(),
            "semantic_fields": tagged,
            "quality_rules": validator.quality().rules().iter().map(|r| r.name()).collect::<Vec<_>>(),
        });
        return print_json(&output);
    }

    println!("\nContract Summary:");
    println!("  Name:          {}", contract.name);
    println!("  Version:       {}", contract.version.as_deref().unwrap_or("N/A"));
    println!("  Owner:         {}", contract.owner.as_deref().unwrap_or("N/A"));
    println!(
        "  Description:   {}",
        contract.description.as_deref().unwrap_or("N/A")
    );
    println!("  Fields:        {}", validator.structural().field_count());
    if !tagged.is_empty() {
        println!("  Semantic:      {}", tagged.join(", "));
    }
    println!("  Quality Rules: {}", validator.quality().rules().len());
    for rule in validator.quality().rules() {
        println!("    - {}: {}", rule.name(), rule.expression().dimmed());
    }

    Ok(())
}

pub fn print_breaking_changes(changes: &[BreakingChange], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let output = json!({
            "breaking": !changes.is_empty(),
            "changes": changes,
        });
        return print_json(&output);
    }

    if changes.is_empty() {
        print_success("No breaking changes");
        return Ok(());
    }

    println!(
        "{} {}",
        "✗".red().bold(),
        format!("{} breaking change(s):", changes.len()).red().bold()
    );
    for change in changes {
        println!("  - {}", change);
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
