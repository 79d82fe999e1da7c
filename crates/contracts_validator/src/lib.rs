//! # Data Contracts Validator
//!
//! Validation engine for data contracts. A contract is compiled once into a
//! [`DataValidator`], which then checks records in three phases:
//!
//! - Structural validation (field presence, declared types)
//! - Semantic overlay (tags such as `unit: cents` that mandate a runtime type)
//! - Quality rules (named boolean expressions, evaluated by a restricted interpreter)
//!
//! The first failing phase decides a record's verdict.
//!
//! ## Example
//!
//! ```rust
//! use contracts_core::{ContractBuilder, DataValue, FieldBuilder, Record};
//! use contracts_validator::validate_batch;
//!
//! let contract = ContractBuilder::new("orders")
//!     .field(
//!         FieldBuilder::new("amount_cents", "number")
//!             .required(true)
//!             .tag("unit", "cents")
//!             .build(),
//!     )
//!     .quality_rule("positive_amount", "amount_cents > 0")
//!     .build();
//!
//! let records = vec![
//!     Record::from([("amount_cents".to_string(), DataValue::Integer(1999))]),
//!     Record::from([("amount_cents".to_string(), DataValue::Number(19.99))]),
//! ];
//!
//! let report = validate_batch(&contract, &records).unwrap();
//!
//! if report.passed {
//!     println!("Validation passed!");
//! } else {
//!     for (index, failure) in report.failures() {
//!         println!("record {}: {}", index, failure.message);
//!     }
//! }
//! ```

mod engine;
mod error;
mod expression;
mod quality;
mod schema;
mod semantic;

pub use engine::*;
pub use error::*;
pub use expression::*;
pub use quality::*;
pub use schema::*;
pub use semantic::*;
