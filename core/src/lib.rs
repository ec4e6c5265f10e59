#![deny(missing_docs)]

//! # svc2oas Core
//!
//! Core library for the descriptor-to-OpenAPI generator.

/// Shared error types.
pub mod error;

/// Read-only descriptor input model.
pub mod descriptor;

/// Typed extension payloads and their resolvers.
pub mod extensions;

/// Enum value catalog.
pub mod enums;

/// OpenAPI document generation.
pub mod openapi;

/// Optional YAML settings fallback.
pub mod settings;

pub use descriptor::DescriptorSet;
pub use error::{GenError, GenResult};
pub use openapi::{generate, generate_with_settings, Document};
pub use settings::Settings;
