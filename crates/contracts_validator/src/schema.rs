//! Structural validation.
//!
//! Checks field presence and runtime types against the declared fields of a
//! contract. Undeclared fields in a record are ignored.

use contracts_core::{Contract, ContractError, DataValue, FieldType, Record, StructuralViolation};
use std::collections::HashSet;

/// A declared field reduced to what the structural check needs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldCheck {
    name: String,
    expected: FieldType,
    required: bool,
}

/// Validates record structure against a compiled contract schema.
///
/// # Example
///
/// ```rust
/// use contracts_core::{ContractBuilder, DataValue, FieldBuilder, Record};
/// use contracts_validator::StructuralValidator;
///
/// let contract = ContractBuilder::new("users")
///     .field(FieldBuilder::new("id", "string").required(true).build())
///     .build();
/// let validator = StructuralValidator::compile(&contract).unwrap();
///
/// let record = Record::from([("id".to_string(), DataValue::from("u-1"))]);
/// assert!(validator.check(&record).is_empty());
/// assert_eq!(validator.check(&Record::new()).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator {
    fields: Vec<FieldCheck>,
}

impl StructuralValidator {
    /// Compiles the declared fields of a contract.
    ///
    /// Field names must be non-empty and unique.
    pub fn compile(contract: &Contract) -> Result<Self, ContractError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(contract.fields.len());

        for field in contract.fields() {
            if field.name.trim().is_empty() {
                return Err(ContractError::EmptyFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ContractError::DuplicateField(field.name.clone()));
            }
            fields.push(FieldCheck {
                name: field.name.clone(),
                expected: field.field_type,
                required: field.required,
            });
        }

        Ok(Self { fields })
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns every structural violation of a record, in declaration order.
    pub fn check(&self, record: &Record) -> Vec<StructuralViolation> {
        let mut violations = Vec::new();

        for field in &self.fields {
            match record.get(&field.name) {
                None if field.required => {
                    violations.push(StructuralViolation::missing_required(&field.name));
                }
                None => {}
                Some(value) if !satisfies(field.expected, value) => {
                    violations.push(StructuralViolation::wrong_type(
                        &field.name,
                        field.expected,
                        value.kind(),
                    ));
                }
                Some(_) => {}
            }
        }

        violations
    }
}

/// Whether a runtime value satisfies a declared type.
///
/// Integers are accepted where a number is declared, not the reverse. Booleans
/// never satisfy a numeric type.
fn satisfies(expected: FieldType, value: &DataValue) -> bool {
    match expected {
        FieldType::String => matches!(value, DataValue::String(_)),
        FieldType::Number => matches!(value, DataValue::Number(_) | DataValue::Integer(_)),
        FieldType::Integer => matches!(value, DataValue::Integer(_)),
        FieldType::Boolean => matches!(value, DataValue::Boolean(_)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts_core::{ContractBuilder, FieldBuilder, ValueKind, ViolationReason};
    use pretty_assertions::assert_eq;

    fn create_test_contract() -> Contract {
        ContractBuilder::new("test_contract")
            .field(FieldBuilder::new("id", "string").required(true).build())
            .field(FieldBuilder::new("age", "integer").required(true).build())
            .field(FieldBuilder::new("score", "number").build())
            .field(FieldBuilder::new("active", "boolean").build())
            .build()
    }

    fn row(pairs: &[(&str, DataValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_valid_row() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();
        let record = row(&[
            ("id", DataValue::from("123")),
            ("age", DataValue::Integer(25)),
            ("score", DataValue::Number(0.5)),
            ("active", DataValue::Boolean(true)),
        ]);

        let violations = validator.check(&record);
        assert!(violations.is_empty(), "Expected no violations, got: {:?}", violations);
    }

    #[test]
    fn test_missing_required_field() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();
        let record = row(&[("id", DataValue::from("123"))]);

        assert_eq!(
            validator.check(&record),
            vec![StructuralViolation::missing_required("age")]
        );
    }

    #[test]
    fn test_absent_optional_and_undeclared_fields_are_fine() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();
        let record = row(&[
            ("id", DataValue::from("123")),
            ("age", DataValue::Integer(1)),
            ("extra", DataValue::from("ignored")),
        ]);

        assert!(validator.check(&record).is_empty());
    }

    #[test]
    fn test_type_mismatch() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();
        let record = row(&[
            ("id", DataValue::from("123")),
            ("age", DataValue::from("not a number")),
        ]);

        let violations = validator.check(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].reason,
            ViolationReason::WrongType {
                expected: FieldType::Integer,
                actual: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_int_to_number_coercion_is_one_way() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();

        let widened = row(&[
            ("id", DataValue::from("1")),
            ("age", DataValue::Integer(1)),
            ("score", DataValue::Integer(42)),
        ]);
        assert!(validator.check(&widened).is_empty());

        let narrowed = row(&[("id", DataValue::from("1")), ("age", DataValue::Number(1.0))]);
        assert_eq!(validator.check(&narrowed).len(), 1);
    }

    #[test]
    fn test_boolean_is_not_numeric() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();
        let record = row(&[
            ("id", DataValue::from("1")),
            ("age", DataValue::Boolean(true)),
            ("score", DataValue::Boolean(false)),
        ]);

        let fields: Vec<String> = validator.check(&record).into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["age".to_string(), "score".to_string()]);
    }

    #[test]
    fn test_all_violations_in_declaration_order() {
        let validator = StructuralValidator::compile(&create_test_contract()).unwrap();
        let record = row(&[("active", DataValue::from("yes"))]);

        let violations = validator.check(&record);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "age", "active"]);
    }

    #[test]
    fn test_duplicate_and_empty_field_names() {
        let contract = ContractBuilder::new("dup")
            .field(FieldBuilder::new("id", "string").build())
            .field(FieldBuilder::new("id", "integer").build())
            .build();
        assert_eq!(
            StructuralValidator::compile(&contract).unwrap_err(),
            ContractError::DuplicateField("id".to_string())
        );

        let contract = ContractBuilder::new("empty")
            .field(FieldBuilder::new("", "string").build())
            .build();
        assert_eq!(
            StructuralValidator::compile(&contract).unwrap_err(),
            ContractError::EmptyFieldName
        );
    }

    #[test]
    fn test_empty_contract_accepts_anything() {
        let validator = StructuralValidator::compile(&ContractBuilder::new("none").build()).unwrap();
        assert_eq!(validator.field_count(), 0);
        assert!(validator.check(&row(&[("x", DataValue::Integer(1))])).is_empty());
    }
}
