//! # Document Assembly
//!
//! Drives the whole generation run: resolves the target file and its
//! single service, builds one operation per method, aggregates the
//! referenced component schemas and emits the final document value.
//!
//! Pure composition over the other modules; the only logic of its own is
//! route-identity bookkeeping (two methods binding the same endpoint and
//! verb is a configuration conflict) and metadata fallback from the
//! optional settings file.

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::DescriptorSet;
use crate::enums::EnumCatalog;
use crate::error::{GenError, GenResult};
use crate::extensions::{
    FileExtensions, ResponseCode, SecurityScheme, SecuritySchemeType, ServiceExtensions,
};
use crate::openapi::components::{
    build_components_schemas, response_error_schemas, DEFAULT_ERROR, FIELD_VALIDATION_ERROR,
    VALIDATION_ERROR,
};
use crate::openapi::operation::{Operation, OperationBuilder};
use crate::openapi::schema::Schema;
use crate::settings::Settings;

/// OpenAPI version the emitted documents declare.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// A complete generated document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Declared OpenAPI version.
    pub openapi: String,
    /// Title/version block.
    pub info: Info,
    /// Server list; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Endpoint template -> verb -> operation.
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
    /// Shared schema and security-scheme library.
    pub components: Components,
}

impl Document {
    /// Whether the service declared a security scheme for the document.
    pub fn has_security(&self) -> bool {
        !self.components.security_schemes.is_empty()
    }
}

/// Document title and version.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Info {
    /// Document title.
    pub title: String,
    /// Document version.
    pub version: String,
}

/// One server entry.
#[derive(Debug, Clone, Serialize)]
pub struct Server {
    /// Server URL.
    pub url: String,
    /// Free-form description; omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// The shared component library.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Components {
    /// Named schemas, message components first, error schemas last.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
    /// Security schemes; a single `authorization` entry when the service
    /// declares one.
    #[serde(rename = "securitySchemes", skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, SecuritySchemeObject>,
}

/// A serialized security scheme.
#[derive(Debug, Clone, Serialize)]
pub struct SecuritySchemeObject {
    /// Scheme class (`http` or `apiKey`).
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// HTTP scheme name, HTTP class only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheme: String,
    /// Bearer token format, HTTP class only.
    #[serde(rename = "bearerFormat", skip_serializing_if = "String::is_empty")]
    pub bearer_format: String,
    /// Key parameter name, API-key class only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Key parameter location, API-key class only.
    #[serde(rename = "in", skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl SecuritySchemeObject {
    fn from_scheme(scheme: &SecurityScheme) -> Option<Self> {
        let scheme_type = match scheme.scheme_type {
            SecuritySchemeType::Unspecified => return None,
            SecuritySchemeType::Http => "http",
            SecuritySchemeType::ApiKey => "apiKey",
        };

        Some(SecuritySchemeObject {
            scheme_type: scheme_type.to_string(),
            scheme: scheme.scheme.clone(),
            bearer_format: scheme.bearer_format.clone(),
            name: scheme.name.clone(),
            location: scheme.location.clone(),
            description: scheme.description.clone(),
        })
    }
}

/// Generates the document for a descriptor set with no settings fallback.
pub fn generate(set: &DescriptorSet) -> GenResult<Document> {
    generate_with_settings(set, None, &Settings::default())
}

/// Generates the document for one file of the set. `selector` overrides
/// the set's own target file; `settings` fills metadata the file-level
/// extensions leave empty.
pub fn generate_with_settings(
    set: &DescriptorSet,
    selector: Option<&str>,
    settings: &Settings,
) -> GenResult<Document> {
    let file = set.target_file(selector)?;
    let service = file
        .services
        .first()
        .ok_or_else(|| GenError::MissingService(file.name.clone()))?;

    let file_ext = FileExtensions::resolve(file);
    let service_ext = ServiceExtensions::resolve(service);
    let enums = EnumCatalog::from_set(set);
    let builder = OperationBuilder::new(set, &enums, &service_ext);

    let mut paths: IndexMap<String, IndexMap<String, Operation>> = IndexMap::new();
    for method in &service.methods {
        let bound = builder.build(method)?;
        let verbs = paths.entry(bound.endpoint.clone()).or_default();

        if let Some(existing) = verbs.get(bound.verb.as_str()) {
            return Err(GenError::DuplicateRoute {
                endpoint: bound.endpoint,
                verb: bound.verb.as_str().to_string(),
                first: existing.id.clone(),
                second: bound.operation.id,
            });
        }
        verbs.insert(bound.verb.as_str().to_string(), bound.operation);
    }

    let mut schemas = build_components_schemas(&message_refs(&paths), set, &enums)?;
    schemas.extend(response_error_schemas(&codes_used(&paths)));

    let mut security_schemes = IndexMap::new();
    if let Some(scheme) = &service_ext.security_scheme {
        if let Some(object) = SecuritySchemeObject::from_scheme(scheme) {
            security_schemes.insert("authorization".to_string(), object);
        }
    }

    Ok(Document {
        openapi: OPENAPI_VERSION.to_string(),
        info: build_info(&file_ext, settings),
        servers: build_servers(&file_ext, settings),
        paths,
        components: Components {
            schemas,
            security_schemes,
        },
    })
}

/// Message component names referenced anywhere in the path map, deduped in
/// first-appearance order. The shared error schema names are synthesized
/// separately and excluded here.
fn message_refs(paths: &IndexMap<String, IndexMap<String, Operation>>) -> Vec<String> {
    let mut names = Vec::new();
    for operation in paths.values().flat_map(IndexMap::values) {
        for name in operation.schema_refs() {
            let is_error_schema = matches!(
                name.as_str(),
                VALIDATION_ERROR | FIELD_VALIDATION_ERROR | DEFAULT_ERROR
            );
            if !is_error_schema && !names.contains(&name) {
                names.push(name);
            }
        }
    }

    names
}

/// Response codes declared across every operation, recovered from the
/// status-code keys of the response maps.
fn codes_used(paths: &IndexMap<String, IndexMap<String, Operation>>) -> Vec<ResponseCode> {
    let mut codes = Vec::new();
    for operation in paths.values().flat_map(IndexMap::values) {
        for key in operation.responses.keys() {
            let known = ResponseCode::ALL.into_iter().find(|c| c.http_code() == key);
            if let Some(code) = known {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
    }

    codes
}

fn build_info(file_ext: &FileExtensions, settings: &Settings) -> Info {
    let title = if file_ext.title.is_empty() {
        settings.info.title.clone()
    } else {
        file_ext.title.clone()
    };
    let version = if file_ext.version.is_empty() {
        settings.info.version.clone()
    } else {
        file_ext.version.clone()
    };

    Info { title, version }
}

fn build_servers(file_ext: &FileExtensions, settings: &Settings) -> Vec<Server> {
    let source = if file_ext.servers.is_empty() {
        &settings.servers
    } else {
        &file_ext.servers
    };

    source
        .iter()
        .map(|s| Server {
            url: s.url.clone(),
            description: s.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor, MethodDescriptor,
        ServiceDescriptor,
    };
    use crate::extensions::{
        FileOptions, HttpPattern, HttpRule, MethodOptions, OpenapiMethodOptions, ResponseOption,
        ServerOption, ServiceOptions,
    };
    use pretty_assertions::assert_eq;

    fn get_method(name: &str, endpoint: &str, codes: &[ResponseCode]) -> MethodDescriptor {
        MethodDescriptor {
            name: name.into(),
            input_type: "GetUserRequest".into(),
            output_type: "User".into(),
            options: Some(MethodOptions {
                http_rule: Some(HttpRule {
                    pattern: Some(HttpPattern::Get(endpoint.into())),
                    ..Default::default()
                }),
                openapi: Some(OpenapiMethodOptions {
                    responses: codes
                        .iter()
                        .map(|&code| ResponseOption {
                            code,
                            ..Default::default()
                        })
                        .collect(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        }
    }

    fn user_file(methods: Vec<MethodDescriptor>) -> FileDescriptor {
        FileDescriptor {
            name: "user.proto".into(),
            messages: vec![
                MessageDescriptor {
                    name: "GetUserRequest".into(),
                    fields: vec![FieldDescriptor {
                        name: "id".into(),
                        kind: FieldKind::String,
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                MessageDescriptor {
                    name: "User".into(),
                    fields: vec![FieldDescriptor {
                        name: "name".into(),
                        kind: FieldKind::String,
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
            services: vec![ServiceDescriptor {
                name: "Users".into(),
                methods,
                ..Default::default()
            }],
            options: Some(FileOptions {
                title: "Users API".into(),
                version: "1.0.0".into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_assembles_paths_and_components() {
        let set = DescriptorSet {
            files: vec![user_file(vec![get_method(
                "GetUser",
                "/users/{id}",
                &[ResponseCode::Ok, ResponseCode::NotFound],
            )])],
            ..Default::default()
        };

        let document = generate(&set).unwrap();
        assert_eq!(document.openapi, OPENAPI_VERSION);
        assert_eq!(document.info.title, "Users API");
        assert_eq!(document.info.version, "1.0.0");

        let operation = &document.paths["/users/{id}"]["get"];
        assert_eq!(operation.id, "GetUser");

        // User from the 200 response, DefaultError gated by the 404.
        assert_eq!(
            document.components.schemas.keys().collect::<Vec<_>>(),
            ["User", DEFAULT_ERROR]
        );
        assert!(!document.has_security());
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let set = DescriptorSet {
            files: vec![user_file(vec![
                get_method("GetUser", "/users/{id}", &[ResponseCode::Ok]),
                get_method("FetchUser", "/users/{id}", &[ResponseCode::Ok]),
            ])],
            ..Default::default()
        };

        assert!(matches!(
            generate(&set),
            Err(GenError::DuplicateRoute { endpoint, verb, first, second })
                if endpoint == "/users/{id}" && verb == "get"
                    && first == "GetUser" && second == "FetchUser"
        ));
    }

    #[test]
    fn test_file_without_service_is_an_error() {
        let set = DescriptorSet {
            files: vec![FileDescriptor {
                name: "empty.proto".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(matches!(
            generate(&set),
            Err(GenError::MissingService(name)) if name == "empty.proto"
        ));
    }

    #[test]
    fn test_security_scheme_emitted_when_declared() {
        let mut file = user_file(vec![get_method("GetUser", "/users/{id}", &[ResponseCode::Ok])]);
        file.services[0].options = Some(ServiceOptions {
            security_scheme: Some(SecurityScheme {
                scheme_type: SecuritySchemeType::Http,
                scheme: "bearer".into(),
                bearer_format: "jwt".into(),
                ..Default::default()
            }),
            ..Default::default()
        });
        let set = DescriptorSet {
            files: vec![file],
            ..Default::default()
        };

        let document = generate(&set).unwrap();
        assert!(document.has_security());
        let scheme = &document.components.security_schemes["authorization"];
        assert_eq!(scheme.scheme_type, "http");
        assert_eq!(scheme.scheme, "bearer");
    }

    #[test]
    fn test_settings_fill_missing_metadata_only() {
        let mut file = user_file(vec![get_method("GetUser", "/users/{id}", &[ResponseCode::Ok])]);
        if let Some(opts) = &mut file.options {
            opts.version = String::new();
        }
        let set = DescriptorSet {
            files: vec![file],
            ..Default::default()
        };

        let settings = Settings::from_yaml(
            "info:\n  title: Ignored\n  version: 9.9.9\nservers:\n  - url: https://api.example.com\n",
        )
        .unwrap();

        let document = generate_with_settings(&set, None, &settings).unwrap();
        // File-level title wins, missing version falls back.
        assert_eq!(document.info.title, "Users API");
        assert_eq!(document.info.version, "9.9.9");
        assert_eq!(document.servers.len(), 1);
        assert_eq!(document.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_selector_picks_the_requested_file() {
        let set = DescriptorSet {
            files: vec![
                user_file(vec![get_method("GetUser", "/users/{id}", &[ResponseCode::Ok])]),
                FileDescriptor {
                    name: "other.proto".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let document = generate_with_settings(&set, Some("user.proto"), &Settings::default());
        assert!(document.is_ok());
        assert!(matches!(
            generate_with_settings(&set, Some("missing.proto"), &Settings::default()),
            Err(GenError::UnknownFile(name)) if name == "missing.proto"
        ));
    }

    #[test]
    fn test_validation_schemas_gated_on_bad_request() {
        let set = DescriptorSet {
            files: vec![user_file(vec![get_method(
                "GetUser",
                "/users/{id}",
                &[ResponseCode::Ok, ResponseCode::BadRequest],
            )])],
            ..Default::default()
        };

        let document = generate(&set).unwrap();
        let keys = document.components.schemas.keys().collect::<Vec<_>>();
        assert_eq!(keys, ["User", FIELD_VALIDATION_ERROR, VALIDATION_ERROR]);
    }
}
