//! # Schema Building
//!
//! Converts fields and messages into Schema nodes: scalar, wrapper,
//! timestamp, message and enum type mapping, repeated-to-array wrapping,
//! required-set computation and visibility filtering.
//!
//! A node is either a `$ref` or an inline definition, never both; the
//! tagged [`Schema`] variant makes the both-set/both-empty states of a
//! nullable-field representation unrepresentable.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::descriptor::{trim_package_path, FieldDescriptor, FieldKind, MessageDescriptor};
use crate::enums::EnumCatalog;
use crate::extensions::FieldExtensions;

/// Prefix for component schema references.
pub const REF_COMPONENTS_SCHEMAS: &str = "#/components/schemas/";

fn wrapper_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"google\.protobuf\.(.+)Value").expect("wrapper pattern is valid"))
}

fn is_well_known_timestamp(name: &str) -> bool {
    name.contains("google.protobuf.Timestamp")
}

fn is_well_known_value(name: &str) -> bool {
    name.contains("google.protobuf.Value")
}

/// A Schema node: a reference to a named component, or an inline
/// definition. Serialized untagged so a reference emits `$ref` and an
/// inline node emits its own fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
    /// A `$ref` to a named component schema.
    Ref(SchemaRef),
    /// A full inline definition.
    Inline(Box<InlineSchema>),
}

/// The reference half of [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaRef {
    /// The `#/components/schemas/...` reference string.
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// The inline half of [`Schema`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InlineSchema {
    /// Schema type; absent for the untyped "any value" gap.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Format qualifier (`date-time`, `int64`, ...).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Example value.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub example: String,
    /// Item schema for arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum value list for string-typed enum fields.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Sorted names of the required properties. Recomputed from children
    /// whenever an object is built, never hand-maintained.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Object properties.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
}

/// The closed set of inline schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// `object`.
    Object,
    /// `string`.
    String,
    /// `array`.
    Array,
    /// `boolean`.
    Boolean,
    /// `integer`.
    Integer,
    /// `number`.
    Number,
}

impl Schema {
    /// A `$ref` to the named component schema.
    pub fn reference(name: &str) -> Schema {
        Schema::Ref(SchemaRef {
            reference: format!("{}{}", REF_COMPONENTS_SCHEMAS, name),
        })
    }

    /// An inline node carrying only a type.
    pub fn of_type(schema_type: SchemaType) -> Schema {
        Schema::Inline(Box::new(InlineSchema {
            schema_type: Some(schema_type),
            ..Default::default()
        }))
    }

    /// The simple component name a reference points at, if this is one.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            Schema::Ref(r) => r.reference.rsplit('/').next(),
            Schema::Inline(_) => None,
        }
    }

    /// The inline definition, if this is one.
    pub fn inline(&self) -> Option<&InlineSchema> {
        match self {
            Schema::Ref(_) => None,
            Schema::Inline(def) => Some(def),
        }
    }

    /// Component names referenced one level down: direct property refs and
    /// refs inside array-property item schemas.
    pub fn nested_refs(&self) -> Vec<String> {
        let mut names = Vec::new();

        if let Schema::Inline(def) = self {
            for property in def.properties.values() {
                match property {
                    Schema::Ref(_) => {
                        if let Some(name) = property.ref_name() {
                            names.push(name.to_string());
                        }
                    }
                    Schema::Inline(inner) => {
                        if let Some(items) = &inner.items {
                            if let Some(name) = items.ref_name() {
                                names.push(name.to_string());
                            }
                        }
                    }
                }
            }
        }

        names
    }
}

/// The schema built for one named field, with the required flag kept next
/// to it so parents can recompute their required lists.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field name, the property/parameter key.
    pub name: String,
    /// The built schema node.
    pub schema: Schema,
    /// Whether the field joins its parent's required list.
    pub required: bool,
}

/// Intermediate shape produced by the kind-mapping step.
#[derive(Debug, Default)]
struct TypedShape {
    schema_type: Option<SchemaType>,
    format: String,
    ref_name: Option<String>,
}

fn parse_field_type(field: &FieldDescriptor) -> TypedShape {
    let mut shape = TypedShape::default();

    match field.kind {
        FieldKind::String | FieldKind::Enum => shape.schema_type = Some(SchemaType::String),
        FieldKind::Bool => shape.schema_type = Some(SchemaType::Boolean),
        FieldKind::Double | FieldKind::Float => shape.schema_type = Some(SchemaType::Number),
        FieldKind::Message => {
            if let Some(captures) = wrapper_regex().captures(&field.type_name) {
                shape.schema_type = Some(match &captures[1] {
                    "String" => SchemaType::String,
                    "Float" | "Double" => SchemaType::Number,
                    "Bool" => SchemaType::Boolean,
                    _ => SchemaType::Integer,
                });
                return shape;
            }

            if is_well_known_timestamp(&field.type_name) {
                shape.schema_type = Some(SchemaType::String);
                shape.format = "date-time".to_string();
                return shape;
            }

            if is_well_known_value(&field.type_name) {
                // google.protobuf.Value stays untyped. Known gap.
                return shape;
            }

            shape.ref_name = Some(trim_package_path(&field.type_name).to_string());
        }
        // Every remaining numeric kind collapses to integer.
        _ => shape.schema_type = Some(SchemaType::Integer),
    }

    shape
}

/// Builds the schema for one field. Returns `None` when the field's
/// presentation metadata hides it; callers must skip omitted fields when
/// assembling properties or parameter lists.
pub fn field_to_schema(
    field: &FieldDescriptor,
    extensions: &FieldExtensions,
    enums: &EnumCatalog,
) -> Option<FieldSchema> {
    let mut shape = parse_field_type(field);
    let mut items = None;

    if field.repeated {
        // The computed type (or ref) moves into the item schema and the
        // outer node becomes an array with no ref of its own.
        let item = match shape.ref_name.take() {
            Some(name) => Schema::reference(&name),
            None => Schema::Inline(Box::new(InlineSchema {
                schema_type: shape.schema_type,
                ..Default::default()
            })),
        };
        items = Some(Box::new(item));
        shape.schema_type = Some(SchemaType::Array);
    }

    let mut enum_values = Vec::new();
    if field.kind == FieldKind::Enum {
        // An unknown enum type degrades to an empty value list.
        enum_values = enums
            .lookup(trim_package_path(&field.type_name))
            .map(<[String]>::to_vec)
            .unwrap_or_default();
    }

    if extensions.property.hide_from_schema {
        return None;
    }

    if shape.format.is_empty() {
        if let Some(format) = extensions.property.format.as_openapi_format() {
            shape.format = format;
        }
    }

    let schema = match shape.ref_name {
        Some(name) => Schema::reference(&name),
        None => Schema::Inline(Box::new(InlineSchema {
            schema_type: shape.schema_type,
            format: shape.format,
            description: extensions.property.description.clone(),
            example: extensions.property.example.clone(),
            items,
            enum_values,
            ..Default::default()
        })),
    };

    Some(FieldSchema {
        name: field.name.clone(),
        schema,
        required: extensions.property.required,
    })
}

/// Builds the object schema for one message: properties are the
/// non-omitted field schemas, the required list is recomputed from them.
///
/// No cycle protection here. Message-typed fields stay `$ref`s and are
/// resolved exactly once by the component aggregator.
pub fn message_to_schema(message: &MessageDescriptor, enums: &EnumCatalog) -> Schema {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();

    for field in &message.fields {
        let extensions = FieldExtensions::resolve(field);
        if let Some(built) = field_to_schema(field, &extensions, enums) {
            if built.required {
                required.push(built.name.clone());
            }
            properties.insert(built.name, built.schema);
        }
    }

    required.sort();

    Schema::Inline(Box::new(InlineSchema {
        schema_type: Some(SchemaType::Object),
        required,
        properties,
        ..Default::default()
    }))
}
