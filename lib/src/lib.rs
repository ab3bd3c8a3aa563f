//! Typed description of the Refy backend contract and the OpenAPI document
//! generated from it.

pub mod apidoc;
pub mod lint;
pub mod models;
pub mod operations;

pub use apidoc::{ApiDoc, document, document_json};
pub use lint::{ContractViolation, validate};
