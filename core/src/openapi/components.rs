//! # Component Aggregation
//!
//! Collects the named schemas a document's operations reference into the
//! shared components map: message schemas resolved transitively, plus the
//! fixed error schemas gated on which response codes the document uses.
//!
//! Cycle breaking is an explicit already-resolved check: a name is stored
//! before its references are chased and never re-expanded, so mutually
//! referencing messages terminate with one entry each.

use indexmap::IndexMap;

use crate::descriptor::DescriptorSet;
use crate::enums::EnumCatalog;
use crate::error::{GenError, GenResult};
use crate::extensions::ResponseCode;
use crate::openapi::schema::{message_to_schema, InlineSchema, Schema, SchemaType};

/// Name of the shared per-field validation error schema.
pub const FIELD_VALIDATION_ERROR: &str = "FieldValidationError";
/// Name of the shared bad-request error schema.
pub const VALIDATION_ERROR: &str = "ValidationError";
/// Name of the shared catch-all error schema.
pub const DEFAULT_ERROR: &str = "DefaultError";

/// Resolves the requested message names plus everything they transitively
/// reference into a name -> schema map. A name that matches no loaded
/// message is fatal.
pub fn build_components_schemas(
    names: &[String],
    set: &DescriptorSet,
    enums: &EnumCatalog,
) -> GenResult<IndexMap<String, Schema>> {
    let mut schemas = IndexMap::new();
    for name in names {
        resolve_into(name, set, enums, &mut schemas)?;
    }

    Ok(schemas)
}

fn resolve_into(
    name: &str,
    set: &DescriptorSet,
    enums: &EnumCatalog,
    schemas: &mut IndexMap<String, Schema>,
) -> GenResult<()> {
    if schemas.contains_key(name) {
        return Ok(());
    }

    let message = set
        .find_message(name)
        .ok_or_else(|| GenError::UnknownMessage(name.to_string()))?;
    let schema = message_to_schema(message, enums);

    // Stored before recursing so reference cycles hit the entry above and
    // stop.
    let nested = schema.nested_refs();
    schemas.insert(name.to_string(), schema);

    for reference in nested {
        resolve_into(&reference, set, enums, schemas)?;
    }

    Ok(())
}

/// Emits the shared error schemas warranted by the set of response codes
/// the document's operations actually declare. Bad-request pulls in the
/// validation pair; any other non-success code pulls in the catch-all.
pub fn response_error_schemas(codes_used: &[ResponseCode]) -> IndexMap<String, Schema> {
    let bad_request = codes_used.contains(&ResponseCode::BadRequest);
    let other_error = codes_used
        .iter()
        .any(|c| !c.is_success() && *c != ResponseCode::BadRequest);

    let mut schemas = IndexMap::new();
    if bad_request {
        schemas.insert(
            FIELD_VALIDATION_ERROR.to_string(),
            field_validation_error_schema(),
        );
        schemas.insert(VALIDATION_ERROR.to_string(), validation_error_schema());
    }
    if other_error {
        schemas.insert(DEFAULT_ERROR.to_string(), default_error_schema());
    }

    schemas
}

fn string_property() -> Schema {
    Schema::of_type(SchemaType::String)
}

fn array_of(items: Schema) -> Schema {
    Schema::Inline(Box::new(InlineSchema {
        schema_type: Some(SchemaType::Array),
        items: Some(Box::new(items)),
        ..Default::default()
    }))
}

fn field_validation_error_schema() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert("field".to_string(), string_property());
    properties.insert("message".to_string(), string_property());
    properties.insert("location".to_string(), string_property());

    Schema::Inline(Box::new(InlineSchema {
        schema_type: Some(SchemaType::Object),
        properties,
        ..Default::default()
    }))
}

fn validation_error_schema() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert(
        "errors".to_string(),
        array_of(Schema::reference(FIELD_VALIDATION_ERROR)),
    );
    properties.insert("message".to_string(), string_property());

    Schema::Inline(Box::new(InlineSchema {
        schema_type: Some(SchemaType::Object),
        properties,
        ..Default::default()
    }))
}

fn default_error_schema() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert("errors".to_string(), array_of(string_property()));
    properties.insert("message".to_string(), string_property());

    Schema::Inline(Box::new(InlineSchema {
        schema_type: Some(SchemaType::Object),
        properties,
        ..Default::default()
    }))
}
