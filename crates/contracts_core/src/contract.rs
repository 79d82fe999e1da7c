//! Data contract types and structures.
//!
//! This module contains the core types for defining data contracts: the declared
//! fields with their types and semantic tags, and the quality rules evaluated
//! against every record.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A data contract describing the expected shape and quality of records.
///
/// A `Contract` is built once (from a file or with [`crate::ContractBuilder`]) and
/// is read-only afterwards.
///
/// # Example
///
/// ```rust
/// use contracts_core::{Contract, FieldSpec, FieldType, QualityRule};
///
/// let contract = Contract {
///     name: "orders".to_string(),
///     version: Some("2.0.0".to_string()),
///     owner: Some("payments-team".to_string()),
///     description: None,
///     fields: vec![FieldSpec::new("amount_cents", FieldType::Integer).required(true)],
///     quality_rules: vec![QualityRule::new("positive_amount", "amount_cents > 0")],
/// };
///
/// assert_eq!(contract.fields().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique name identifying this contract
    pub name: String,

    /// Semantic version of the contract (e.g., "1.0.0")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Team or individual responsible for this contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Human-readable description of the dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared fields, in document order.
    ///
    /// Serialized as a mapping keyed by field name. Duplicate keys are kept so that
    /// compilation can reject them.
    #[serde(
        default,
        serialize_with = "serialize_fields",
        deserialize_with = "deserialize_fields"
    )]
    pub fields: Vec<FieldSpec>,

    /// Business rules evaluated against each record, in declaration order
    #[serde(default)]
    pub quality_rules: Vec<QualityRule>,
}

impl Contract {
    /// Returns the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the quality rules in declaration order.
    pub fn quality_rules(&self) -> &[QualityRule] {
        &self.quality_rules
    }
}

/// Declared type of a contract field.
///
/// The set is closed. Unrecognized type strings fall back to [`FieldType::String`]
/// so a loosely authored contract still compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
}

impl FieldType {
    /// Parses a declared type string, falling back to `String` when unrecognized.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "number" => FieldType::Number,
            "integer" => FieldType::Integer,
            "boolean" => FieldType::Boolean,
            _ => FieldType::String,
        }
    }

    /// Canonical lowercase name used in contracts and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        FieldType::parse(&raw)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

/// A single field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,

    /// Declared type
    pub field_type: FieldType,

    /// Whether the field must be present in every record
    pub required: bool,

    /// Semantic tags, e.g. `unit: cents`
    pub tags: BTreeMap<String, String>,

    /// Optional human-readable description
    pub description: Option<String>,
}

impl FieldSpec {
    /// Creates an optional, untagged field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
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

    /// Returns the value of a semantic tag, if set.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// On-disk body of a field entry; the name is the mapping key.
#[derive(Serialize, Deserialize)]
struct FieldBody {
    #[serde(rename = "type", default)]
    field_type: FieldType,

    #[serde(default)]
    required: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn serialize_fields<S>(fields: &[FieldSpec], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for field in fields {
        let body = FieldBody {
            field_type: field.field_type,
            required: field.required,
            tags: field.tags.clone(),
            description: field.description.clone(),
        };
        map.serialize_entry(&field.name, &body)?;
    }
    map.end()
}

fn deserialize_fields<'de, D>(deserializer: D) -> Result<Vec<FieldSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = Vec<FieldSpec>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a mapping of field name to field definition")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, body)) = access.next_entry::<String, FieldBody>()? {
                fields.push(FieldSpec {
                    name,
                    field_type: body.field_type,
                    required: body.required,
                    tags: body.tags,
                    description: body.description,
                });
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(FieldsVisitor)
}

/// A named boolean predicate over a record's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRule {
    /// Name used in diagnostics
    pub name: String,

    /// Boolean expression referencing field names, e.g. `amount_cents > 0`
    pub expression: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl QualityRule {
    /// Creates a rule without a description.
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_type_parse_is_lenient() {
        assert_eq!(FieldType::parse("integer"), FieldType::Integer);
        assert_eq!(FieldType::parse("  NUMBER "), FieldType::Number);
        assert_eq!(FieldType::parse("Boolean"), FieldType::Boolean);
        assert_eq!(FieldType::parse("string"), FieldType::String);
        assert_eq!(FieldType::parse("timestamp"), FieldType::String);
        assert_eq!(FieldType::parse(""), FieldType::String);
    }

    #[test]
    fn test_deserialize_fields_mapping_preserves_order() {
        let json = r#"{
            "name": "orders",
            "fields": {
                "order_id": {"type": "string", "required": true},
                "amount_cents": {"type": "integer", "tags": {"unit": "cents"}},
                "paid": {"type": "boolean"}
            },
            "quality_rules": [{"name": "positive_amount", "expression": "amount_cents > 0"}]
        }"#;

        let contract: Contract = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = contract.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["order_id", "amount_cents", "paid"]);
        assert!(contract.fields[0].required);
        assert!(!contract.fields[2].required);
        assert_eq!(contract.fields[1].tag_value("unit"), Some("cents"));
        assert_eq!(contract.quality_rules().len(), 1);
        assert!(contract.version.is_none());
    }

    #[test]
    fn test_deserialize_unknown_type_defaults_to_string() {
        let json = r#"{"name": "t", "fields": {"created_at": {"type": "timestamp"}, "note": {}}}"#;
        let contract: Contract = serde_json::from_str(json).unwrap();

        assert_eq!(contract.fields[0].field_type, FieldType::String);
        assert_eq!(contract.fields[1].field_type, FieldType::String);
    }

    #[test]
    fn test_serialize_roundtrip_keeps_mapping_shape() {
        let contract = Contract {
            name: "orders".to_string(),
            version: None,
            owner: None,
            description: None,
            fields: vec![FieldSpec::new("amount", FieldType::Number).tag("unit", "full_unit")],
            quality_rules: vec![],
        };

        let value = serde_json::to_value(&contract).unwrap();
        assert_eq!(value["fields"]["amount"]["type"], "number");
        assert_eq!(value["fields"]["amount"]["tags"]["unit"], "full_unit");

        let back: Contract = serde_json::from_value(value).unwrap();
        assert_eq!(back, contract);
    }

    #[test]
    fn test_field_lookup() {
        let contract = Contract {
            name: "t".to_string(),
            version: None,
            owner: None,
            description: None,
            fields: vec![FieldSpec::new("a", FieldType::Integer)],
            quality_rules: vec![],
        };

        assert!(contract.field("a").is_some());
        assert!(contract.field("b").is_none());
    }
}
