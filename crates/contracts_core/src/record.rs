//! Record representation for validation.
//!
//! A record is a flat mapping from field name to a scalar [`DataValue`]. An absent
//! field is simply an absent key; there is no null variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A scalar value in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Boolean value
    Boolean(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// String value
    String(String),
}

/// Runtime type of a [`DataValue`].
///
/// Kept separate from the contract's declared type so that diagnostics always
/// report the value's own representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Integer,
    Boolean,
}

impl ValueKind {
    /// Lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DataValue {
    /// Returns the runtime type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            DataValue::String(_) => ValueKind::String,
            DataValue::Number(_) => ValueKind::Number,
            DataValue::Integer(_) => ValueKind::Integer,
            DataValue::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Converts a JSON scalar. `null` and nested values yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(DataValue::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(DataValue::Integer(i)),
                None => n.as_f64().map(DataValue::Number),
            },
            Value::String(s) => Some(DataValue::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{:?}", s),
            DataValue::Number(n) => write!(f, "{:?}", n),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Integer(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Number(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Boolean(b)
    }
}

/// A single record.
pub type Record = BTreeMap<String, DataValue>;

/// Errors raised while turning external input into records.
#[derive(Debug, Error)]
pub enum RecordLoadError {
    /// Input is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is not an array of records
    #[error("Expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),

    /// An array element is not an object
    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// A field holds an array or object
    #[error("Record {index}, field '{field}': nested values are not supported")]
    NestedValue { index: usize, field: String },
}

/// An ordered collection of records to validate against a contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    rows: Vec<Record>,
}

impl DataSet {
    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates a new dataset from records.
    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Parses a JSON array of flat objects.
    ///
    /// `null` members are dropped, so they read as absent fields.
    pub fn from_json_str(input: &str) -> Result<Self, RecordLoadError> {
        let value: Value = serde_json::from_str(input)?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(_) => return Err(RecordLoadError::NotAnArray("object")),
            Value::String(_) => return Err(RecordLoadError::NotAnArray("string")),
            Value::Number(_) => return Err(RecordLoadError::NotAnArray("number")),
            Value::Bool(_) => return Err(RecordLoadError::NotAnArray("boolean")),
            Value::Null => return Err(RecordLoadError::NotAnArray("null")),
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let object = item
                .as_object()
                .ok_or(RecordLoadError::NotAnObject { index })?;
            let mut record = Record::new();
            for (field, raw) in object {
                if raw.is_null() {
                    continue;
                }
                let value = DataValue::from_json(raw).ok_or_else(|| RecordLoadError::NestedValue {
                    index,
                    field: field.clone(),
                })?;
                record.insert(field.clone(), value);
            }
            rows.push(record);
        }

        Ok(Self { rows })
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the records.
    pub fn rows(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter()
    }
}

impl FromIterator<Record> for DataSet {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_data_value_kinds() {
        assert_eq!(DataValue::String("test".into()).kind(), ValueKind::String);
        assert_eq!(DataValue::Integer(42).kind(), ValueKind::Integer);
        assert_eq!(DataValue::Number(3.5).kind(), ValueKind::Number);
        assert_eq!(DataValue::Boolean(true).kind().as_str(), "boolean");
        assert_eq!(DataValue::from("hello"), DataValue::String("hello".to_string()));
        assert_eq!(DataValue::from(42_i64), DataValue::Integer(42));
    }

    #[test]
    fn test_from_json_distinguishes_integer_and_number() {
        let rows = DataSet::from_json_str(
            r#"[{"a": 1999, "b": 19.99, "c": 20.0, "d": true, "e": "x", "f": null}]"#,
        )
        .unwrap();

        let row = rows.rows().next().unwrap();
        assert_eq!(row.get("a"), Some(&DataValue::Integer(1999)));
        assert_eq!(row.get("b"), Some(&DataValue::Number(19.99)));
        assert_eq!(row.get("c"), Some(&DataValue::Number(20.0)));
        assert_eq!(row.get("d"), Some(&DataValue::Boolean(true)));
        assert_eq!(row.get("e"), Some(&DataValue::String("x".to_string())));
        assert!(!row.contains_key("f"));
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(
            DataSet::from_json_str(r#"{"a": 1}"#),
            Err(RecordLoadError::NotAnArray("object"))
        ));
        assert!(matches!(
            DataSet::from_json_str(r#"[{"a": 1}, 3]"#),
            Err(RecordLoadError::NotAnObject { index: 1 })
        ));
        assert!(matches!(
            DataSet::from_json_str(r#"[{"a": [1, 2]}]"#),
            Err(RecordLoadError::NestedValue { index: 0, .. })
        ));
        assert!(matches!(
            DataSet::from_json_str("not json"),
            Err(RecordLoadError::Json(_))
        ));
    }

    #[test]
    fn test_dataset_from_iterator() {
        let dataset: DataSet = (0..10)
            .map(|i| Record::from([("id".to_string(), DataValue::Integer(i))]))
            .collect();

        assert_eq!(dataset.len(), 10);
        assert!(!dataset.is_empty());
        assert!(DataSet::empty().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(DataValue::Number(19.99).to_string(), "19.99");
        assert_eq!(DataValue::Number(20.0).to_string(), "20.0");
        assert_eq!(DataValue::String("a".into()).to_string(), "\"a\"");
    }
}
