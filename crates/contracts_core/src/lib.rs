//! # Data Contracts Core
//!
//! Core data structures and types for the Data Contracts Engine.
//!
//! A data contract is a machine-checkable agreement about the records a producer
//! emits: which fields exist, their types, the semantic units they carry, and the
//! business rules every record must satisfy.
//!
//! ## Key Concepts
//!
//! - **Contract**: declared fields plus ordered quality rules
//! - **FieldSpec**: declared type, required flag, semantic tags (e.g. `unit: cents`)
//! - **QualityRule**: a named boolean expression over a record's fields
//! - **Record**: a flat mapping of field name to scalar [`DataValue`]
//! - **Verdicts**: [`RecordVerdict`] per record, [`BatchReport`] per batch
//!
//! ## Example
//!
//! ```rust
//! use contracts_core::{ContractBuilder, FieldBuilder};
//!
//! let contract = ContractBuilder::new("orders")
//!     .owner("payments-team")
//!     .field(
//!         FieldBuilder::new("amount_cents", "integer")
//!             .required(true)
//!             .tag("unit", "cents")
//!             .build(),
//!     )
//!     .quality_rule("positive_amount", "amount_cents > 0")
//!     .build();
//!
//! assert_eq!(contract.quality_rules().len(), 1);
//! ```

pub mod builder;
pub mod compat;
pub mod contract;
pub mod error;
pub mod record;
pub mod validator;

pub use builder::*;
pub use compat::*;
pub use contract::*;
pub use error::*;
pub use record::*;
pub use validator::*;
