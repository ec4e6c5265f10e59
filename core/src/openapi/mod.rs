//! # Document Generation
//!
//! Turns a resolved descriptor set into an OpenAPI document value: schema
//! construction, operation building, component aggregation and final
//! assembly. Everything here is pure; serialization to YAML is the
//! caller's concern.

pub mod components;
pub mod document;
pub mod operation;
pub mod schema;

pub use document::{generate, generate_with_settings, Document};
