//! Parser for Data Contracts (YAML, TOML and JSON formats).
//!
//! This module provides functionality to parse data contracts from contract
//! documents into the strongly-typed `Contract` structure. Parsing only checks
//! the document shape; duplicate names and rule syntax are checked when the
//! contract is compiled.
//!
//! # Example
//!
//! ```rust
//! use contracts_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: orders
//! version: "2.0.0"
//! owner: payments-team
//! fields:
//!   amount_cents:
//!     type: integer
//!     required: true
//!     tags:
//!       unit: cents
//! quality_rules:
//!   - name: positive_amount
//!     expression: "amount_cents > 0"
//! "#;
//!
//! let contract = parse_yaml(yaml).expect("Failed to parse contract");
//! assert_eq!(contract.name, "orders");
//! assert_eq!(contract.quality_rules().len(), 1);
//! ```

use contracts_core::Contract;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during contract parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported contract file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Parse a contract from a YAML string.
///
/// # Example
///
/// ```rust
/// use contracts_parser::parse_yaml;
///
/// let yaml = r#"
/// name: my_dataset
/// fields:
///   id:
///     type: string
///     required: true
/// "#;
///
/// let contract = parse_yaml(yaml).unwrap();
/// assert_eq!(contract.name, "my_dataset");
/// ```
pub fn parse_yaml(content: &str) -> Result<Contract> {
    let contract: Contract = serde_yaml_ng::from_str(content)?;
    Ok(contract)
}

/// Parse a contract from a TOML string.
///
/// # Example
///
/// ```rust
/// use contracts_parser::parse_toml;
///
/// let toml = r#"
/// name = "my_dataset"
///
/// [fields.id]
/// type = "string"
/// required = true
/// "#;
///
/// let contract = parse_toml(toml).unwrap();
/// assert_eq!(contract.name, "my_dataset");
/// ```
pub fn parse_toml(content: &str) -> Result<Contract> {
    let contract: Contract =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(contract)
}

/// Parse a contract from a JSON string.
///
/// Duplicate keys in the `fields` object are kept, so compiling the contract
/// reports them instead of silently keeping the last one.
pub fn parse_json(content: &str) -> Result<Contract> {
    let contract: Contract = serde_json::from_str(content)?;
    Ok(contract)
}

/// Detect the contract format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ContractFormat::Yaml`
/// * `.toml` → `ContractFormat::Toml`
/// * `.json` → `ContractFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ContractFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ContractFormat::Yaml),
        "toml" => Ok(ContractFormat::Toml),
        "json" => Ok(ContractFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a contract from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use contracts_parser::parse_file;
/// use std::path::Path;
///
/// let contract = parse_file(Path::new("contracts/orders.yml")).unwrap();
/// println!("Loaded contract: {}", contract.name);
/// ```
pub fn parse_file(path: &Path) -> Result<Contract> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        ContractFormat::Yaml => parse_yaml(&content),
        ContractFormat::Toml => parse_toml(&content),
        ContractFormat::Json => parse_json(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts_core::FieldType;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let yaml = r#"
name: test_contract
"#;

        let contract = parse_yaml(yaml).expect("Failed to parse valid YAML");

        assert_eq!(contract.name, "test_contract");
        assert_eq!(contract.version, None);
        assert_eq!(contract.owner, None);
        assert!(contract.fields.is_empty());
        assert!(contract.quality_rules.is_empty());
    }

    #[test]
    fn test_parse_valid_yaml_with_fields() {
        let yaml = r#"
name: orders
version: "2.0.0"
owner: payments-team
description: Order events
fields:
  order_id:
    type: string
    required: true
    description: Unique order ID
  amount_cents:
    type: integer
    required: true
    tags:
      unit: cents
  note:
    type: text
"#;

        let contract = parse_yaml(yaml).expect("Failed to parse YAML with fields");

        assert_eq!(contract.version, Some("2.0.0".to_string()));
        assert_eq!(contract.owner, Some("payments-team".to_string()));

        let names: Vec<&str> = contract.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["order_id", "amount_cents", "note"]);

        let order_id = &contract.fields[0];
        assert_eq!(order_id.field_type, FieldType::String);
        assert!(order_id.required);
        assert_eq!(order_id.description, Some("Unique order ID".to_string()));

        let amount = &contract.fields[1];
        assert_eq!(amount.field_type, FieldType::Integer);
        assert_eq!(
            amount.tags,
            BTreeMap::from([("unit".to_string(), "cents".to_string())])
        );

        // unknown types fall back to string
        let note = &contract.fields[2];
        assert_eq!(note.field_type, FieldType::String);
        assert!(!note.required);
    }

    #[test]
    fn test_parse_yaml_with_quality_rules() {
        let yaml = r#"
name: orders
fields:
  amount_cents:
    type: integer
quality_rules:
  - name: positive_amount
    expression: "amount_cents > 0"
    description: Refunds are modelled separately
  - name: bounded
    expression: "amount_cents < 100000000"
"#;

        let contract = parse_yaml(yaml).expect("Failed to parse YAML with quality rules");

        let rules = contract.quality_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "positive_amount");
        assert_eq!(rules[0].expression, "amount_cents > 0");
        assert_eq!(
            rules[0].description,
            Some("Refunds are modelled separately".to_string())
        );
        assert_eq!(rules[1].name, "bounded");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
name: test
fields:
  - this is a list
  - not a mapping
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_missing_name() {
        let yaml = r#"
version: "1.0.0"
"#;

        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml = r#"
name = "orders"
version = "2.0.0"
owner = "payments-team"

[fields.order_id]
type = "string"
required = true

[fields.amount_cents]
type = "integer"
required = true
tags = { unit = "cents" }

[[quality_rules]]
name = "positive_amount"
expression = "amount_cents > 0"
"#;

        let contract = parse_toml(toml).expect("Failed to parse valid TOML");

        assert_eq!(contract.name, "orders");
        assert_eq!(contract.fields.len(), 2);
        assert_eq!(
            contract.field("amount_cents").and_then(|f| f.tag_value("unit")),
            Some("cents")
        );
        assert_eq!(contract.quality_rules().len(), 1);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("name = ");
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_parse_json_keeps_duplicate_fields() {
        let json = r#"{
            "name": "dup",
            "fields": {
                "id": {"type": "string"},
                "id": {"type": "integer"}
            }
        }"#;

        let contract = parse_json(json).expect("Failed to parse JSON");
        assert_eq!(contract.fields.len(), 2);
        assert_eq!(contract.fields[1].field_type, FieldType::Integer);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json("{\"name\": ");
        assert!(matches!(result.unwrap_err(), ParserError::JsonError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("contract.yaml")).unwrap(),
            ContractFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("contract.YML")).unwrap(),
            ContractFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("contract.toml")).unwrap(),
            ContractFormat::Toml
        );
        assert_eq!(
            detect_format(Path::new("contract.json")).unwrap(),
            ContractFormat::Json
        );
        assert!(matches!(
            detect_format(Path::new("contract.xml")),
            Err(ParserError::UnsupportedFormat(ext)) if ext == "xml"
        ));
        assert!(matches!(
            detect_format(Path::new("contract")),
            Err(ParserError::InvalidExtension)
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("/nonexistent/contract.yml"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }
}
