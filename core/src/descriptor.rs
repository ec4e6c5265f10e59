//! # Descriptor Tree
//!
//! Read-only input model for the generator: files, services, methods,
//! messages, fields and enums, each node optionally carrying the typed
//! option records defined in [`crate::extensions`].
//!
//! The tree is owned by the external descriptor loader; everything here
//! derives `Deserialize` so a JSON-encoded descriptor set is a valid
//! loader. The engine itself only ever reads it.

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::extensions::{FieldOptions, FileOptions, MessageOptions, MethodOptions, ServiceOptions};

/// Every interface description file loaded for one generation run,
/// including transitively imported ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// All loaded files, imports included.
    pub files: Vec<FileDescriptor>,
    /// Name of the file the run should produce a document for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_to_generate: Option<String>,
}

impl DescriptorSet {
    /// Picks the file the document is generated from.
    ///
    /// An explicit `selector` wins over the set's own `file_to_generate`;
    /// with neither present the last loaded file is used, mirroring how a
    /// compiler invocation lists the requested file after its imports.
    pub fn target_file(&self, selector: Option<&str>) -> GenResult<&FileDescriptor> {
        if let Some(name) = selector.or(self.file_to_generate.as_deref()) {
            return self
                .files
                .iter()
                .find(|f| f.name == name)
                .ok_or_else(|| GenError::UnknownFile(name.to_string()));
        }

        self.files
            .last()
            .ok_or_else(|| GenError::UnknownFile(String::new()))
    }

    /// Locates a message by its simple (package-trimmed) name across every
    /// loaded file. First match wins.
    pub fn find_message(&self, simple_name: &str) -> Option<&MessageDescriptor> {
        self.files
            .iter()
            .flat_map(|f| f.messages.iter())
            .find(|m| m.name == simple_name)
    }
}

/// One interface description file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name as loaded (e.g. `user.proto`).
    pub name: String,
    /// Declared package, empty when none.
    #[serde(default)]
    pub package: String,
    /// Top-level message declarations.
    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,
    /// Top-level enum declarations.
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
    /// Service declarations. Exactly one per generated file is assumed.
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
    /// File-scope extension payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FileOptions>,
}

/// A service declaration: the set of RPC methods the document covers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub name: String,
    /// RPC methods in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Service-scope extension payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ServiceOptions>,
}

/// One RPC method with its input and output message type names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name, used as the operation id.
    pub name: String,
    /// Fully-qualified input message type name.
    pub input_type: String,
    /// Fully-qualified output message type name.
    pub output_type: String,
    /// Method-scope extension payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MethodOptions>,
}

/// One message declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDescriptor {
    /// Simple message name.
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Message-scope extension payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MessageOptions>,
}

/// One message field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared.
    pub name: String,
    /// Scalar/enum/message kind.
    pub kind: FieldKind,
    /// Fully-qualified type name for enum and message kinds, empty otherwise.
    #[serde(default)]
    pub type_name: String,
    /// Whether the field is repeated.
    #[serde(default)]
    pub repeated: bool,
    /// Field-scope extension payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
}

/// One enum declaration with its symbolic value names, untrimmed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Simple enum type name.
    pub name: String,
    /// Symbolic value names in declaration order.
    #[serde(default)]
    pub values: Vec<String>,
}

/// The declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// UTF-8 string.
    #[default]
    String,
    /// Boolean.
    Bool,
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// ZigZag-encoded signed 32-bit integer.
    Sint32,
    /// ZigZag-encoded signed 64-bit integer.
    Sint64,
    /// Fixed-width unsigned 32-bit integer.
    Fixed32,
    /// Fixed-width unsigned 64-bit integer.
    Fixed64,
    /// Fixed-width signed 32-bit integer.
    Sfixed32,
    /// Fixed-width signed 64-bit integer.
    Sfixed64,
    /// Raw byte sequence.
    Bytes,
    /// Enum type; `type_name` names the declaration.
    Enum,
    /// Message type; `type_name` names the declaration.
    Message,
}

/// Trims a fully-qualified type name down to its simple name.
pub fn trim_package_path(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
