//! # Operation Building
//!
//! Per RPC method: HTTP verb and endpoint template, parameter partition
//! (path/query/header/body), request body, declared responses and the
//! security requirement.
//!
//! Parameter-location inference resolves three overlapping signals with a
//! single ordered precedence ladder, kept in [`resolve_location`] so the
//! policy stays auditable in one place.

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::{trim_package_path, DescriptorSet, MethodDescriptor};
use crate::enums::EnumCatalog;
use crate::error::{GenError, GenResult};
use crate::extensions::{
    FieldExtensions, HttpVerb, Location, MessageExtensions, MethodExtensions, ResponseCode,
    ServiceExtensions,
};
use crate::openapi::schema::{field_to_schema, FieldSchema, InlineSchema, Schema};

/// The single media type this generator emits.
pub const APPLICATION_JSON: &str = "application/json";

/// One HTTP operation bound to an endpoint path.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    /// Operation id; the RPC method name.
    #[serde(rename = "operationId")]
    pub id: String,
    /// Short summary.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    /// Longer description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Grouping tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Non-body parameters, in input-field order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body, POST/PUT only.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status-code string -> response.
    pub responses: IndexMap<String, Response>,
    /// Security requirements; one `authorization` entry when the method
    /// carries the HTTP scope annotation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

impl Operation {
    /// Simple component names referenced by the request body and the
    /// responses. Parameters carry inline schemas only and contribute
    /// nothing here.
    pub fn schema_refs(&self) -> Vec<String> {
        let mut names = Vec::new();

        if let Some(body) = &self.request_body {
            for media in body.content.values() {
                if let Some(name) = media.schema.ref_name() {
                    names.push(name.to_string());
                }
            }
        }

        for response in self.responses.values() {
            for media in response.content.values() {
                if let Some(name) = media.schema.ref_name() {
                    names.push(name.to_string());
                }
            }
        }

        names
    }
}

/// One operation parameter. The schema is always inline, never a `$ref`.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Visible parameter name (after header aliasing).
    pub name: String,
    /// Placement location.
    #[serde(rename = "in")]
    pub location: Location,
    /// Required flag; always true for path parameters.
    pub required: bool,
    /// Description from the field's presentation metadata.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Inline schema (type/format/example only).
    pub schema: Schema,
}

/// The request body of a POST/PUT operation.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Required for POST, optional for PUT.
    pub required: bool,
    /// Description from the input message's extension payload.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Media-type map; always a single `application/json` entry.
    pub content: IndexMap<String, Media>,
}

/// One response entry.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Description from the declared response.
    pub description: String,
    /// Media-type map; always a single `application/json` entry.
    pub content: IndexMap<String, Media>,
}

/// A media-type object wrapping a schema.
#[derive(Debug, Clone, Serialize)]
pub struct Media {
    /// The payload schema.
    pub schema: Schema,
}

impl Media {
    fn json_content(schema: Schema) -> IndexMap<String, Media> {
        let mut content = IndexMap::new();
        content.insert(APPLICATION_JSON.to_string(), Media { schema });
        content
    }
}

/// An operation together with the route identity it binds.
#[derive(Debug, Clone)]
pub struct BoundOperation {
    /// Endpoint template of the main binding.
    pub endpoint: String,
    /// HTTP verb of the main binding.
    pub verb: HttpVerb,
    /// The built operation.
    pub operation: Operation,
}

/// Resolves a field's placement from its three possible signals, strongest
/// first:
///
/// 1. an explicit placement annotation;
/// 2. the field's name appearing in the endpoint placeholder set;
/// 3. the body default.
pub fn resolve_location(
    explicit: Option<Location>,
    field_name: &str,
    placeholders: &[String],
) -> Location {
    if let Some(location) = explicit {
        return location;
    }

    if placeholders.iter().any(|p| p == field_name) {
        return Location::Path;
    }

    Location::Body
}

/// Builds operations for one service's methods. Holds the per-run caches
/// so they are passed explicitly rather than ambiently.
pub struct OperationBuilder<'a> {
    set: &'a DescriptorSet,
    enums: &'a EnumCatalog,
    service: &'a ServiceExtensions,
}

impl<'a> OperationBuilder<'a> {
    /// Creates a builder over one descriptor set and its caches.
    pub fn new(
        set: &'a DescriptorSet,
        enums: &'a EnumCatalog,
        service: &'a ServiceExtensions,
    ) -> Self {
        OperationBuilder {
            set,
            enums,
            service,
        }
    }

    /// Builds the operation for one method. A method without a usable HTTP
    /// binding cannot be represented and fails the whole run.
    pub fn build(&self, method: &MethodDescriptor) -> GenResult<BoundOperation> {
        let extensions = MethodExtensions::resolve(method);
        if extensions.rule.is_none() {
            return Err(GenError::MissingHttpRule(method.name.clone()));
        }

        let verb = extensions
            .endpoint
            .verb
            .ok_or_else(|| GenError::UnsupportedHttpRule(method.name.clone()))?;

        let request_body = match verb {
            HttpVerb::Post | HttpVerb::Put => {
                Some(self.build_request_body(method, &extensions, verb)?)
            }
            _ => None,
        };

        let operation = Operation {
            id: method.name.clone(),
            summary: extensions.openapi.summary.clone(),
            description: extensions.openapi.description.clone(),
            tags: extensions.openapi.tags.clone(),
            parameters: self.build_parameters(method, &extensions)?,
            request_body,
            responses: self.build_responses(method, &extensions),
            security: build_security(&extensions),
        };

        Ok(BoundOperation {
            endpoint: extensions.endpoint.endpoint.clone(),
            verb,
            operation,
        })
    }

    /// Partitions the top-level input fields into non-body parameters.
    /// Only top-level fields are placed on the wire; nested messages stay
    /// inside the body schema.
    fn build_parameters(
        &self,
        method: &MethodDescriptor,
        extensions: &MethodExtensions,
    ) -> GenResult<Vec<Parameter>> {
        let message_name = trim_package_path(&method.input_type);
        let message = self
            .set
            .find_message(message_name)
            .ok_or_else(|| GenError::UnknownMessage(message_name.to_string()))?;

        let mut aliases = extensions.merged_header_member_names(self.service);
        let mut parameters = Vec::new();

        for field in &message.fields {
            let field_extensions = FieldExtensions::resolve(field);
            let location = resolve_location(
                field_extensions.explicit_location,
                &field.name,
                &extensions.endpoint.parameters,
            );

            // Body fields ride inside the request body schema.
            if location == Location::Body {
                continue;
            }

            if let Some(built) = field_to_schema(field, &field_extensions, self.enums) {
                // A field living in the endpoint path is always required,
                // whatever its own annotation says.
                let required = location == Location::Path || built.required;

                let mut name = built.name.clone();
                if let Some(alias) = aliases.shift_remove(&name) {
                    name = alias;
                }

                parameters.push(Parameter {
                    name,
                    location,
                    required,
                    description: field_extensions.property.description.clone(),
                    schema: parameter_schema(&built),
                });
            }
        }

        if !aliases.is_empty() {
            let members = aliases.keys().cloned().collect::<Vec<_>>().join(", ");
            return Err(GenError::UnknownHeaderMembers {
                members,
                message: message.name.clone(),
            });
        }

        Ok(parameters)
    }

    fn build_request_body(
        &self,
        method: &MethodDescriptor,
        extensions: &MethodExtensions,
        verb: HttpVerb,
    ) -> GenResult<RequestBody> {
        let input_name = trim_package_path(&method.input_type);

        let ref_name = match verb {
            // POST takes the whole input message.
            HttpVerb::Post => input_name.to_string(),
            HttpVerb::Put => self.put_body_ref_name(method, extensions)?,
            _ => input_name.to_string(),
        };

        let description = self
            .set
            .find_message(input_name)
            .map(MessageExtensions::resolve)
            .map(|m| m.request_body_description)
            .unwrap_or_default();

        Ok(RequestBody {
            required: verb == HttpVerb::Post,
            description,
            content: Media::json_content(Schema::reference(&ref_name)),
        })
    }

    /// PUT bodies follow the binding's body selector: the wildcard keeps
    /// the whole input message, a field name selects that field's own
    /// message type.
    fn put_body_ref_name(
        &self,
        method: &MethodDescriptor,
        extensions: &MethodExtensions,
    ) -> GenResult<String> {
        let input_name = trim_package_path(&method.input_type);
        if extensions.endpoint.body == "*" {
            return Ok(input_name.to_string());
        }

        let message = self
            .set
            .find_message(input_name)
            .ok_or_else(|| GenError::UnknownMessage(input_name.to_string()))?;

        message
            .fields
            .iter()
            .find(|f| f.name == extensions.endpoint.body)
            .map(|f| trim_package_path(&f.type_name).to_string())
            .ok_or_else(|| GenError::UnknownBodyField {
                method: method.name.clone(),
                field: extensions.endpoint.body.clone(),
            })
    }

    /// Emits one entry per declared response code, in the fixed code
    /// order. Success codes carry the output message; bad-request carries
    /// `ValidationError`; every other error carries `DefaultError`.
    fn build_responses(
        &self,
        method: &MethodDescriptor,
        extensions: &MethodExtensions,
    ) -> IndexMap<String, Response> {
        let mut responses = IndexMap::new();

        for code in ResponseCode::ALL {
            let Some(declared) = extensions
                .openapi
                .responses
                .iter()
                .find(|r| r.code == code)
            else {
                continue;
            };

            let schema = if code.is_success() {
                Schema::reference(trim_package_path(&method.output_type))
            } else if code == ResponseCode::BadRequest {
                Schema::reference("ValidationError")
            } else {
                Schema::reference("DefaultError")
            };

            responses.insert(
                code.http_code().to_string(),
                Response {
                    description: declared.description.clone(),
                    content: Media::json_content(schema),
                },
            );
        }

        responses
    }
}

fn build_security(extensions: &MethodExtensions) -> Vec<IndexMap<String, Vec<String>>> {
    if !extensions.has_http_extension() {
        return Vec::new();
    }

    let mut requirement = IndexMap::new();
    requirement.insert("authorization".to_string(), extensions.scopes().to_vec());
    vec![requirement]
}

/// Strips a built field schema down to the inline type/format/example
/// triple parameters carry.
fn parameter_schema(built: &FieldSchema) -> Schema {
    match built.schema.inline() {
        Some(def) => Schema::Inline(Box::new(InlineSchema {
            schema_type: def.schema_type,
            format: def.format.clone(),
            example: def.example.clone(),
            ..Default::default()
        })),
        // Message-typed fields forced onto the wire keep an empty inline
        // schema; parameters never carry a $ref.
        None => Schema::Inline(Box::new(InlineSchema::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor, ServiceDescriptor,
    };
    use crate::extensions::{
        FieldOptions, HeaderMember, HttpFieldOptions, HttpMethodOptions, HttpPattern, HttpRule,
        MethodOptions, OpenapiMethodOptions, PropertyOptions, ResponseOption,
    };
    use pretty_assertions::assert_eq;

    fn field(name: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    fn located_field(name: &str, kind: FieldKind, location: Location) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            kind,
            options: Some(FieldOptions {
                http: Some(HttpFieldOptions { location }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn method(
        name: &str,
        input: &str,
        output: &str,
        pattern: HttpPattern,
        body: &str,
    ) -> MethodDescriptor {
        MethodDescriptor {
            name: name.into(),
            input_type: input.into(),
            output_type: output.into(),
            options: Some(MethodOptions {
                http_rule: Some(HttpRule {
                    pattern: Some(pattern),
                    body: body.into(),
                    ..Default::default()
                }),
                openapi: Some(OpenapiMethodOptions {
                    responses: vec![ResponseOption {
                        code: ResponseCode::Ok,
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
                ..Default::default()
            }),
        }
    }

    fn set_with(messages: Vec<MessageDescriptor>) -> DescriptorSet {
        DescriptorSet {
            files: vec![FileDescriptor {
                name: "api.proto".into(),
                messages,
                services: vec![ServiceDescriptor::default()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn build_in(set: &DescriptorSet, method: &MethodDescriptor) -> GenResult<BoundOperation> {
        let enums = EnumCatalog::default();
        let service = ServiceExtensions::default();
        OperationBuilder::new(set, &enums, &service).build(method)
    }

    #[test]
    fn test_location_precedence_ladder() {
        let placeholders = vec!["id".to_string()];

        // Explicit annotation beats placeholder evidence.
        assert_eq!(
            resolve_location(Some(Location::Query), "id", &placeholders),
            Location::Query
        );
        // Placeholder evidence beats the body default.
        assert_eq!(
            resolve_location(None, "id", &placeholders),
            Location::Path
        );
        // Nothing leaves the field in the body.
        assert_eq!(
            resolve_location(None, "verbose", &placeholders),
            Location::Body
        );
    }

    #[test]
    fn test_get_with_path_placeholder_and_query_field() {
        let set = set_with(vec![MessageDescriptor {
            name: "GetUserRequest".into(),
            fields: vec![
                field("id", FieldKind::String),
                located_field("verbose", FieldKind::Bool, Location::Query),
            ],
            ..Default::default()
        }]);
        let m = method(
            "GetUser",
            "GetUserRequest",
            "User",
            HttpPattern::Get("/users/{id}".into()),
            "",
        );

        let bound = build_in(&set, &m).unwrap();
        assert_eq!(bound.endpoint, "/users/{id}");
        assert_eq!(bound.verb, HttpVerb::Get);
        assert!(bound.operation.request_body.is_none());

        let params = &bound.operation.parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[0].location, Location::Path);
        assert!(params[0].required);
        assert_eq!(params[1].name, "verbose");
        assert_eq!(params[1].location, Location::Query);
        assert!(!params[1].required);
    }

    #[test]
    fn test_path_parameter_required_even_when_annotation_says_otherwise() {
        let set = set_with(vec![MessageDescriptor {
            name: "GetUserRequest".into(),
            fields: vec![FieldDescriptor {
                name: "id".into(),
                kind: FieldKind::String,
                options: Some(FieldOptions {
                    http: Some(HttpFieldOptions {
                        location: Location::Path,
                    }),
                    property: Some(PropertyOptions {
                        required: false,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let m = method(
            "GetUser",
            "GetUserRequest",
            "User",
            HttpPattern::Get("/users/{id}".into()),
            "",
        );

        let bound = build_in(&set, &m).unwrap();
        assert!(bound.operation.parameters[0].required);
    }

    #[test]
    fn test_missing_http_rule_is_fatal() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            ..Default::default()
        }]);
        let m = MethodDescriptor {
            name: "Orphan".into(),
            input_type: "Req".into(),
            output_type: "Res".into(),
            options: None,
        };

        assert!(matches!(
            build_in(&set, &m),
            Err(GenError::MissingHttpRule(name)) if name == "Orphan"
        ));
    }

    #[test]
    fn test_unsupported_rule_shape_is_fatal() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            ..Default::default()
        }]);
        let m = MethodDescriptor {
            name: "Odd".into(),
            input_type: "Req".into(),
            output_type: "Res".into(),
            options: Some(MethodOptions {
                http_rule: Some(HttpRule::default()),
                ..Default::default()
            }),
        };

        assert!(matches!(
            build_in(&set, &m),
            Err(GenError::UnsupportedHttpRule(name)) if name == "Odd"
        ));
    }

    #[test]
    fn test_post_body_references_whole_input_message() {
        let set = set_with(vec![MessageDescriptor {
            name: "User".into(),
            ..Default::default()
        }]);
        let m = method(
            "CreateUser",
            "User",
            "User",
            HttpPattern::Post("/users".into()),
            "",
        );

        let bound = build_in(&set, &m).unwrap();
        let body = bound.operation.request_body.unwrap();
        assert!(body.required);
        let media = body.content.get(APPLICATION_JSON).unwrap();
        assert_eq!(media.schema.ref_name(), Some("User"));
    }

    #[test]
    fn test_put_body_selector_picks_field_message_type() {
        let set = set_with(vec![MessageDescriptor {
            name: "UpdateUserRequest".into(),
            fields: vec![
                field("id", FieldKind::String),
                FieldDescriptor {
                    name: "profile".into(),
                    kind: FieldKind::Message,
                    type_name: ".mypkg.Profile".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }]);
        let m = method(
            "UpdateUser",
            "UpdateUserRequest",
            "User",
            HttpPattern::Put("/users/{id}".into()),
            "profile",
        );

        let bound = build_in(&set, &m).unwrap();
        let body = bound.operation.request_body.unwrap();
        assert!(!body.required);
        let media = body.content.get(APPLICATION_JSON).unwrap();
        assert_eq!(media.schema.ref_name(), Some("Profile"));
    }

    #[test]
    fn test_put_wildcard_selector_keeps_input_message() {
        let set = set_with(vec![MessageDescriptor {
            name: "UpdateUserRequest".into(),
            ..Default::default()
        }]);
        let m = method(
            "UpdateUser",
            "UpdateUserRequest",
            "User",
            HttpPattern::Put("/users".into()),
            "*",
        );

        let bound = build_in(&set, &m).unwrap();
        let media = bound.operation.request_body.unwrap();
        let media = media.content.get(APPLICATION_JSON).unwrap();
        assert_eq!(media.schema.ref_name(), Some("UpdateUserRequest"));
    }

    #[test]
    fn test_put_selector_naming_missing_field_is_fatal() {
        let set = set_with(vec![MessageDescriptor {
            name: "UpdateUserRequest".into(),
            ..Default::default()
        }]);
        let m = method(
            "UpdateUser",
            "UpdateUserRequest",
            "User",
            HttpPattern::Put("/users/{id}".into()),
            "profile",
        );

        assert!(matches!(
            build_in(&set, &m),
            Err(GenError::UnknownBodyField { method, field })
                if method == "UpdateUser" && field == "profile"
        ));
    }

    #[test]
    fn test_header_alias_substitution_and_leftover_error() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            fields: vec![located_field("api_key", FieldKind::String, Location::Header)],
            ..Default::default()
        }]);

        let mut m = method("Call", "Req", "Res", HttpPattern::Get("/call".into()), "");
        if let Some(opts) = &mut m.options {
            opts.http = Some(HttpMethodOptions {
                headers: vec![HeaderMember {
                    member_name: "api_key".into(),
                    name: "X-Api-Key".into(),
                }],
                ..Default::default()
            });
        }

        let bound = build_in(&set, &m).unwrap();
        assert_eq!(bound.operation.parameters[0].name, "X-Api-Key");
        assert_eq!(bound.operation.parameters[0].location, Location::Header);

        // An alias pointing at a field that does not exist is fatal.
        if let Some(opts) = &mut m.options {
            opts.http = Some(HttpMethodOptions {
                headers: vec![HeaderMember {
                    member_name: "missing".into(),
                    name: "X-Missing".into(),
                }],
                ..Default::default()
            });
        }
        assert!(matches!(
            build_in(&set, &m),
            Err(GenError::UnknownHeaderMembers { members, message })
                if members == "missing" && message == "Req"
        ));
    }

    #[test]
    fn test_declared_responses_only() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            ..Default::default()
        }]);
        let mut m = method("Call", "Req", "Res", HttpPattern::Get("/call".into()), "");
        if let Some(opts) = &mut m.options {
            opts.openapi = Some(OpenapiMethodOptions {
                responses: vec![
                    ResponseOption {
                        code: ResponseCode::NotFound,
                        description: "no such user".into(),
                    },
                    ResponseOption {
                        code: ResponseCode::Ok,
                        description: "the user".into(),
                    },
                ],
                ..Default::default()
            });
        }

        let bound = build_in(&set, &m).unwrap();
        let responses = &bound.operation.responses;
        assert_eq!(responses.keys().collect::<Vec<_>>(), ["200", "404"]);
        assert_eq!(
            responses["200"]
                .content
                .get(APPLICATION_JSON)
                .unwrap()
                .schema
                .ref_name(),
            Some("Res")
        );
        assert_eq!(
            responses["404"]
                .content
                .get(APPLICATION_JSON)
                .unwrap()
                .schema
                .ref_name(),
            Some("DefaultError")
        );
    }

    #[test]
    fn test_bad_request_uses_validation_error() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            ..Default::default()
        }]);
        let mut m = method("Call", "Req", "Res", HttpPattern::Get("/call".into()), "");
        if let Some(opts) = &mut m.options {
            opts.openapi = Some(OpenapiMethodOptions {
                responses: vec![ResponseOption {
                    code: ResponseCode::BadRequest,
                    ..Default::default()
                }],
                ..Default::default()
            });
        }

        let bound = build_in(&set, &m).unwrap();
        assert_eq!(
            bound.operation.responses["400"]
                .content
                .get(APPLICATION_JSON)
                .unwrap()
                .schema
                .ref_name(),
            Some("ValidationError")
        );
    }

    #[test]
    fn test_security_requirement_from_scope_annotation() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            ..Default::default()
        }]);
        let mut m = method("Call", "Req", "Res", HttpPattern::Get("/call".into()), "");
        if let Some(opts) = &mut m.options {
            opts.http = Some(HttpMethodOptions {
                scope: vec!["users:read".into()],
                ..Default::default()
            });
        }

        let bound = build_in(&set, &m).unwrap();
        let security = &bound.operation.security;
        assert_eq!(security.len(), 1);
        assert_eq!(security[0]["authorization"], vec!["users:read"]);
    }

    #[test]
    fn test_hidden_field_never_becomes_parameter() {
        let set = set_with(vec![MessageDescriptor {
            name: "Req".into(),
            fields: vec![FieldDescriptor {
                name: "token".into(),
                kind: FieldKind::String,
                options: Some(FieldOptions {
                    http: Some(HttpFieldOptions {
                        location: Location::Query,
                    }),
                    property: Some(PropertyOptions {
                        hide_from_schema: true,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let m = method("Call", "Req", "Res", HttpPattern::Get("/call".into()), "");

        let bound = build_in(&set, &m).unwrap();
        assert!(bound.operation.parameters.is_empty());
    }

    #[test]
    fn test_schema_refs_cover_body_and_responses() {
        let set = set_with(vec![MessageDescriptor {
            name: "User".into(),
            ..Default::default()
        }]);
        let mut m = method(
            "CreateUser",
            "User",
            "User",
            HttpPattern::Post("/users".into()),
            "",
        );
        if let Some(opts) = &mut m.options {
            opts.openapi = Some(OpenapiMethodOptions {
                responses: vec![
                    ResponseOption {
                        code: ResponseCode::Ok,
                        ..Default::default()
                    },
                    ResponseOption {
                        code: ResponseCode::InternalError,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            });
        }

        let bound = build_in(&set, &m).unwrap();
        assert_eq!(
            bound.operation.schema_refs(),
            ["User", "User", "DefaultError"]
        );
    }
}
