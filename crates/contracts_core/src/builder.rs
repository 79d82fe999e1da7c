//! Builder pattern for creating data contracts.
//!
//! This module provides ergonomic builders for constructing contracts
//! and their fields with a fluent API.

use crate::{Contract, FieldSpec, FieldType, QualityRule};
use std::collections::BTreeMap;

/// Builder for creating a `Contract`.
///
/// # Example
///
/// ```rust
/// use contracts_core::{ContractBuilder, FieldBuilder};
///
/// let contract = ContractBuilder::new("orders")
///     .version("2.0.0")
///     .owner("payments-team")
///     .field(
///         FieldBuilder::new("amount_cents", "integer")
///             .required(true)
///             .tag("unit", "cents")
///             .build(),
///     )
///     .quality_rule("positive_amount", "amount_cents > 0")
///     .build();
///
/// assert_eq!(contract.fields.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ContractBuilder {
    name: String,
    version: Option<String>,
    owner: Option<String>,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    quality_rules: Vec<QualityRule>,
}

impl ContractBuilder {
    /// Creates a new contract builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some("1.0.0".to_string()),
            ..Default::default()
        }
    }

    /// Sets the contract version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the contract owner.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the contract description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a quality rule.
    pub fn quality_rule(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.quality_rules.push(QualityRule::new(name, expression));
        self
    }

    /// Builds the contract.
    ///
    /// No structural checks happen here; duplicate names are reported when the
    /// contract is compiled.
    pub fn build(self) -> Contract {
        Contract {
            name: self.name,
            version: self.version,
            owner: self.owner,
            description: self.description,
            fields: self.fields,
            quality_rules: self.quality_rules,
        }
    }
}

/// Builder for creating a `FieldSpec` from a declared type string.
///
/// # Example
///
/// ```rust
/// use contracts_core::{FieldBuilder, FieldType};
///
/// let field = FieldBuilder::new("amount", "decimal").build();
/// assert_eq!(field.field_type, FieldType::String); // unknown types are lenient
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    required: bool,
    tags: BTreeMap<String, String>,
    description: Option<String>,
}

impl FieldBuilder {
    /// Creates a new field builder.
    ///
    /// # Arguments
    ///
    /// * `name` - Field name
    /// * `field_type` - Declared type (`string`, `number`, `integer`, `boolean`)
    pub fn new(name: impl Into<String>, field_type: &str) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::parse(field_type),
            required: false,
            tags: BTreeMap::new(),
            description: None,
        }
    }

    /// Sets whether the field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Adds a semantic tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the field.
    pub fn build(self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            field_type: self.field_type,
            required: self.required,
            tags: self.tags,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contract_builder_minimal() {
        let contract = ContractBuilder::new("test").build();

        assert_eq!(contract.name, "test");
        assert_eq!(contract.version, Some("1.0.0".to_string())); // Default version
        assert!(contract.owner.is_none());
        assert!(contract.fields.is_empty());
        assert!(contract.quality_rules.is_empty());
    }

    #[test]
    fn test_contract_builder_full() {
        let contract = ContractBuilder::new("orders")
            .version("2.0.0")
            .owner("payments")
            .description("Order events")
            .field(FieldBuilder::new("order_id", "string").required(true).build())
            .field(FieldBuilder::new("amount_cents", "integer").build())
            .field(FieldBuilder::new("paid", "boolean").build())
            .quality_rule("positive_amount", "amount_cents > 0")
            .build();

        assert_eq!(contract.version, Some("2.0.0".to_string()));
        assert_eq!(contract.owner, Some("payments".to_string()));
        assert_eq!(contract.fields.len(), 3);
        assert_eq!(contract.fields[2].name, "paid");
        assert_eq!(contract.quality_rules[0].name, "positive_amount");
    }

    #[test]
    fn test_field_builder_defaults() {
        let field = FieldBuilder::new("user_id", "string").build();

        assert_eq!(field.name, "user_id");
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.required); // Default is optional
        assert!(field.tags.is_empty());
        assert!(field.description.is_none());
    }

    #[test]
    fn test_field_builder_tags() {
        let field = FieldBuilder::new("amount_cents", "INTEGER")
            .required(true)
            .tag("unit", "cents")
            .tag("pii", "false")
            .description("Order total in cents")
            .build();

        assert_eq!(field.field_type, FieldType::Integer);
        assert!(field.required);
        assert_eq!(field.tag_value("unit"), Some("cents"));
        assert_eq!(field.tags.len(), 2);
    }

    #[test]
    fn test_field_builder_unknown_type_is_string() {
        let field = FieldBuilder::new("created_at", "timestamp").build();
        assert_eq!(field.field_type, FieldType::String);
    }
}
