//! Semantic overlay.
//!
//! Some tags narrow the runtime type a field may carry beyond what its declared
//! type allows. A field declared `number` but tagged `unit: cents` must hold an
//! integer: fractional cents are a unit error, not a valid number.

use contracts_core::{Contract, Record, SemanticViolation, ValueKind};

/// Tags with a mandated runtime type, as `(key, value, type)`.
const TAG_TYPES: &[(&str, &str, ValueKind)] = &[
    ("unit", "cents", ValueKind::Integer),
    ("unit", "full_unit", ValueKind::Number),
];

/// Looks up the runtime type a tag mandates, if the tag is recognized.
pub fn mandated_type(key: &str, value: &str) -> Option<ValueKind> {
    TAG_TYPES
        .iter()
        .find(|(k, v, _)| *k == key && *v == value)
        .map(|(_, _, kind)| *kind)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TaggedField {
    field: String,
    tag_key: String,
    tag: String,
    expected: ValueKind,
}

/// Checks recognized semantic tags against the runtime type of present fields.
///
/// # Example
///
/// ```rust
/// use contracts_core::{ContractBuilder, DataValue, FieldBuilder, Record};
/// use contracts_validator::SemanticOverlay;
///
/// let contract = ContractBuilder::new("orders")
///     .field(FieldBuilder::new("amount_cents", "number").tag("unit", "cents").build())
///     .build();
/// let overlay = SemanticOverlay::compile(&contract);
///
/// let record = Record::from([("amount_cents".to_string(), DataValue::Number(19.99))]);
/// assert_eq!(overlay.check(&record).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SemanticOverlay {
    tagged: Vec<TaggedField>,
}

impl SemanticOverlay {
    /// Selects the fields carrying a recognized tag. Unknown tags are ignored.
    pub fn compile(contract: &Contract) -> Self {
        let tagged = contract
            .fields()
            .flat_map(|field| {
                field.tags.iter().filter_map(move |(key, value)| {
                    mandated_type(key, value).map(|expected| TaggedField {
                        field: field.name.clone(),
                        tag_key: key.clone(),
                        tag: value.clone(),
                        expected,
                    })
                })
            })
            .collect();

        Self { tagged }
    }

    /// Names of the fields the overlay checks, in declaration order.
    pub fn tagged_fields(&self) -> impl Iterator<Item = &str> {
        self.tagged.iter().map(|t| t.field.as_str())
    }

    /// Returns a violation for every present tagged field whose runtime type differs
    /// from the mandated one. Absent fields are skipped.
    pub fn check(&self, record: &Record) -> Vec<SemanticViolation> {
        self.tagged
            .iter()
            .filter_map(|tagged| {
                let actual = record.get(&tagged.field)?.kind();
                (actual != tagged.expected).then(|| SemanticViolation {
                    field: tagged.field.clone(),
                    tag_key: tagged.tag_key.clone(),
                    tag: tagged.tag.clone(),
                    expected_type: tagged.expected,
                    actual_type: actual,
                })
            })
            .collect()
    }
}
