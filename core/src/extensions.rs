//! # Extension Resolution
//!
//! Typed metadata attached to file, service, method, message and field
//! descriptors, plus the resolvers that read it.
//!
//! Resolution is pure lookup with no cross-entity logic: every accessor
//! degrades to a documented zero value when a payload is absent. The one
//! default the rest of the pipeline leans on is [`FieldExtensions::location`]
//! returning [`Location::Body`] when no placement was set.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::descriptor::{
    FieldDescriptor, FileDescriptor, MessageDescriptor, MethodDescriptor, ServiceDescriptor,
};

/// Matches `{name}` endpoint placeholders: alphanumerics, underscore, dot.
const PLACEHOLDER_PATTERN: &str = r"\{[A-Za-z_.0-9]*\}";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"))
}

// ---------------------------------------------------------------------------
// Raw option payloads (what descriptor nodes carry on the wire)
// ---------------------------------------------------------------------------

/// File-scope extension payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileOptions {
    /// Application name, used when the document title is absent.
    #[serde(default)]
    pub app_name: String,
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Document version.
    #[serde(default)]
    pub version: String,
    /// Server list for the document.
    #[serde(default)]
    pub servers: Vec<ServerOption>,
}

/// One declared server entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerOption {
    /// Server URL.
    pub url: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: String,
}

/// Service-scope extension payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOptions {
    /// Security scheme the whole service authenticates with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_scheme: Option<SecurityScheme>,
    /// Default header-member aliases, overridable per method.
    #[serde(default)]
    pub headers: Vec<HeaderMember>,
}

/// Security scheme descriptor attached to a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityScheme {
    /// Scheme class.
    #[serde(default)]
    pub scheme_type: SecuritySchemeType,
    /// HTTP scheme name (`basic`, `bearer`, ...), when applicable.
    #[serde(default)]
    pub scheme: String,
    /// Bearer token format (e.g. `jwt`).
    #[serde(default)]
    pub bearer_format: String,
    /// Parameter name for API-key schemes.
    #[serde(default)]
    pub name: String,
    /// Parameter location for API-key schemes.
    #[serde(default)]
    pub location: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Classification of a service security scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecuritySchemeType {
    /// No scheme declared.
    #[default]
    Unspecified,
    /// HTTP authentication.
    Http,
    /// API key in a header/query/cookie.
    ApiKey,
}

/// An alias mapping an input-message member to a visible header name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderMember {
    /// The input-message field the header binds to.
    pub member_name: String,
    /// The header name exposed in the document.
    pub name: String,
}

/// Method-scope extension payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodOptions {
    /// HTTP binding rule (verb, endpoint template, body selector).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_rule: Option<HttpRule>,
    /// Documentation: summary, description, tags, declared responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<OpenapiMethodOptions>,
    /// Auth scope and method-level header aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpMethodOptions>,
}

/// The HTTP binding rule declaring verb, endpoint and body selector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpRule {
    /// Verb plus endpoint template. Absent or unrecognized shapes cannot be
    /// represented and abort the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<HttpPattern>,
    /// Body field selector; `*` selects the whole input message.
    #[serde(default)]
    pub body: String,
    /// Additional bindings whose placeholders join the main template's set.
    #[serde(default)]
    pub additional_bindings: Vec<HttpRule>,
}

/// A verb/endpoint pair, tagged by verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpPattern {
    /// GET binding.
    Get(String),
    /// POST binding.
    Post(String),
    /// PUT binding.
    Put(String),
    /// DELETE binding.
    Delete(String),
    /// PATCH binding.
    Patch(String),
}

impl HttpPattern {
    /// Splits the pattern into its verb and endpoint template.
    pub fn verb_and_endpoint(&self) -> (HttpVerb, &str) {
        match self {
            HttpPattern::Get(e) => (HttpVerb::Get, e),
            HttpPattern::Post(e) => (HttpVerb::Post, e),
            HttpPattern::Put(e) => (HttpVerb::Put, e),
            HttpPattern::Delete(e) => (HttpVerb::Delete, e),
            HttpPattern::Patch(e) => (HttpVerb::Patch, e),
        }
    }
}

/// The supported HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpVerb {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
    /// PATCH.
    Patch,
}

impl HttpVerb {
    /// Lowercase verb as used for path-item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
        }
    }
}

/// Method documentation payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenapiMethodOptions {
    /// Operation summary.
    #[serde(default)]
    pub summary: String,
    /// Operation description.
    #[serde(default)]
    pub description: String,
    /// Operation tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared responses; codes outside this list produce no entry.
    #[serde(default)]
    pub responses: Vec<ResponseOption>,
}

/// One declared response code with its documentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseOption {
    /// The declared code.
    pub code: ResponseCode,
    /// Response description.
    #[serde(default)]
    pub description: String,
}

/// The fixed set of documentable response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCode {
    /// 200.
    #[default]
    Ok,
    /// 201.
    Created,
    /// 400.
    BadRequest,
    /// 401.
    Unauthorized,
    /// 404.
    NotFound,
    /// 412.
    PreconditionFailed,
    /// 500.
    InternalError,
}

impl ResponseCode {
    /// Fixed emission order for the responses map.
    pub const ALL: [ResponseCode; 7] = [
        ResponseCode::Ok,
        ResponseCode::Created,
        ResponseCode::BadRequest,
        ResponseCode::Unauthorized,
        ResponseCode::NotFound,
        ResponseCode::PreconditionFailed,
        ResponseCode::InternalError,
    ];

    /// The HTTP status code string used as the responses-map key.
    pub fn http_code(&self) -> &'static str {
        match self {
            ResponseCode::Ok => "200",
            ResponseCode::Created => "201",
            ResponseCode::BadRequest => "400",
            ResponseCode::Unauthorized => "401",
            ResponseCode::NotFound => "404",
            ResponseCode::PreconditionFailed => "412",
            ResponseCode::InternalError => "500",
        }
    }

    /// Whether the code's response carries the method's output message.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseCode::Ok | ResponseCode::Created)
    }
}

/// Auth scope and header aliases for one method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpMethodOptions {
    /// Scopes attached to the operation's `authorization` requirement.
    #[serde(default)]
    pub scope: Vec<String>,
    /// Method-level header aliases, overriding service-level ones per key.
    #[serde(default)]
    pub headers: Vec<HeaderMember>,
}

/// Message-scope extension payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageOptions {
    /// Request-body description override when this message is a body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyOptions>,
}

/// Request-body documentation payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBodyOptions {
    /// Body description.
    #[serde(default)]
    pub description: String,
}

/// Field-scope extension payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Storage-column metadata. Carried for other targets, unused here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseOptions>,
    /// Presentation metadata for the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyOptions>,
    /// Placement metadata for the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpFieldOptions>,
}

/// Storage-column metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseOptions {
    /// Column name.
    #[serde(default)]
    pub name: String,
}

/// Presentation metadata for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyOptions {
    /// Example value.
    #[serde(default)]
    pub example: String,
    /// Property description.
    #[serde(default)]
    pub description: String,
    /// Symbolic format name.
    #[serde(default)]
    pub format: PropertyFormat,
    /// Whether the property joins the parent's required list.
    #[serde(default)]
    pub required: bool,
    /// When set, the field is omitted from schemas and parameter lists.
    #[serde(default)]
    pub hide_from_schema: bool,
}

/// Symbolic property formats; converted to lowercase hyphenated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFormat {
    /// No format declared.
    #[default]
    Unspecified,
    /// Plain string; emits no format either.
    String,
    /// `date`.
    Date,
    /// `date-time`.
    DateTime,
    /// `byte`.
    Byte,
    /// `binary`.
    Binary,
    /// `password`.
    Password,
    /// `email`.
    Email,
    /// `uuid`.
    Uuid,
    /// `uri`.
    Uri,
    /// `hostname`.
    Hostname,
    /// `ipv4`.
    Ipv4,
    /// `ipv6`.
    Ipv6,
    /// `int32`.
    Int32,
    /// `int64`.
    Int64,
    /// `float`.
    Float,
    /// `double`.
    Double,
}

impl PropertyFormat {
    /// The lowercase hyphenated form, or `None` for the two defaults that
    /// deliberately emit nothing.
    pub fn as_openapi_format(&self) -> Option<String> {
        use heck::ToKebabCase;

        match self {
            PropertyFormat::Unspecified | PropertyFormat::String => None,
            other => Some(format!("{:?}", other).to_kebab_case()),
        }
    }
}

/// Placement location of a field inside an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Request body (the default placement).
    #[default]
    Body,
    /// URL path.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
}

/// Placement metadata for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpFieldOptions {
    /// Declared placement location.
    #[serde(default)]
    pub location: Location,
}

// ---------------------------------------------------------------------------
// Resolved extension records
// ---------------------------------------------------------------------------

/// Resolved file-scope metadata.
#[derive(Debug, Clone, Default)]
pub struct FileExtensions {
    /// Application name.
    pub app_name: String,
    /// Document title.
    pub title: String,
    /// Document version.
    pub version: String,
    /// Declared servers.
    pub servers: Vec<ServerOption>,
}

impl FileExtensions {
    /// Reads the file payload, degrading to zero values when absent.
    pub fn resolve(file: &FileDescriptor) -> Self {
        match &file.options {
            Some(opts) => FileExtensions {
                app_name: opts.app_name.clone(),
                title: opts.title.clone(),
                version: opts.version.clone(),
                servers: opts.servers.clone(),
            },
            None => FileExtensions::default(),
        }
    }
}

/// Resolved service-scope metadata.
#[derive(Debug, Clone, Default)]
pub struct ServiceExtensions {
    /// Security scheme, when declared.
    pub security_scheme: Option<SecurityScheme>,
    headers: Vec<HeaderMember>,
}

impl ServiceExtensions {
    /// Reads the service payload, degrading to zero values when absent.
    pub fn resolve(service: &ServiceDescriptor) -> Self {
        match &service.options {
            Some(opts) => ServiceExtensions {
                security_scheme: opts.security_scheme.clone(),
                headers: opts.headers.clone(),
            },
            None => ServiceExtensions::default(),
        }
    }

    /// Whether the service declares a non-empty security scheme.
    pub fn has_security_scheme(&self) -> bool {
        self.security_scheme
            .as_ref()
            .is_some_and(|s| s.scheme_type != SecuritySchemeType::Unspecified)
    }

    /// Service-level header aliases keyed by member name.
    pub fn header_member_names(&self) -> IndexMap<String, String> {
        self.headers
            .iter()
            .map(|h| (h.member_name.clone(), h.name.clone()))
            .collect()
    }
}

/// Resolved method-scope metadata.
#[derive(Debug, Clone, Default)]
pub struct MethodExtensions {
    /// The HTTP binding rule, when declared.
    pub rule: Option<HttpRule>,
    /// Documentation payload, zero-valued when absent.
    pub openapi: OpenapiMethodOptions,
    /// Auth/header payload, when declared.
    pub http: Option<HttpMethodOptions>,
    /// Derived endpoint details for the main binding.
    pub endpoint: EndpointDetails,
}

impl MethodExtensions {
    /// Reads the method payload and derives [`EndpointDetails`] from its
    /// binding rule.
    pub fn resolve(method: &MethodDescriptor) -> Self {
        let opts = method.options.clone().unwrap_or_default();
        let endpoint = opts
            .http_rule
            .as_ref()
            .map(EndpointDetails::from_rule)
            .unwrap_or_default();

        MethodExtensions {
            rule: opts.http_rule,
            openapi: opts.openapi.unwrap_or_default(),
            http: opts.http,
            endpoint,
        }
    }

    /// Whether the method carries the HTTP scope annotation.
    pub fn has_http_extension(&self) -> bool {
        self.http.is_some()
    }

    /// Scopes for the operation's security requirement.
    pub fn scopes(&self) -> &[String] {
        self.http.as_ref().map(|h| h.scope.as_slice()).unwrap_or(&[])
    }

    /// Header aliases merged with the service-level defaults; method-level
    /// entries win per key.
    pub fn merged_header_member_names(
        &self,
        service: &ServiceExtensions,
    ) -> IndexMap<String, String> {
        let mut names = service.header_member_names();
        if let Some(http) = &self.http {
            for h in &http.headers {
                names.insert(h.member_name.clone(), h.name.clone());
            }
        }

        names
    }
}

/// Resolved message-scope metadata.
#[derive(Debug, Clone, Default)]
pub struct MessageExtensions {
    /// Request-body description for operations taking this message.
    pub request_body_description: String,
}

impl MessageExtensions {
    /// Reads the message payload, degrading to zero values when absent.
    pub fn resolve(message: &MessageDescriptor) -> Self {
        let opts = message.options.clone().unwrap_or_default();

        MessageExtensions {
            request_body_description: opts
                .request_body
                .map(|b| b.description)
                .unwrap_or_default(),
        }
    }
}

/// Detailed information about the HTTP endpoint of a method, derived once
/// from its binding rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDetails {
    /// Verb of the main binding; `None` for unrecognized rule shapes.
    pub verb: Option<HttpVerb>,
    /// The endpoint template of the main binding.
    pub endpoint: String,
    /// Placeholder names from the main template and every additional
    /// binding, unioned in appearance order.
    pub parameters: Vec<String>,
    /// Body field selector; `*` selects the whole input message.
    pub body: String,
}

impl EndpointDetails {
    /// Derives the details for one binding rule.
    pub fn from_rule(rule: &HttpRule) -> Self {
        let (verb, endpoint) = match &rule.pattern {
            Some(p) => {
                let (v, e) = p.verb_and_endpoint();
                (Some(v), e.to_string())
            }
            None => (None, String::new()),
        };

        let mut parameters = extract_placeholders(&endpoint);
        for binding in &rule.additional_bindings {
            if let Some(p) = &binding.pattern {
                let (_, extra) = p.verb_and_endpoint();
                for name in extract_placeholders(extra) {
                    if !parameters.contains(&name) {
                        parameters.push(name);
                    }
                }
            }
        }

        EndpointDetails {
            verb,
            endpoint,
            parameters,
            body: rule.body.clone(),
        }
    }
}

fn extract_placeholders(endpoint: &str) -> Vec<String> {
    placeholder_regex()
        .find_iter(endpoint)
        .map(|m| {
            let token = m.as_str();
            token[1..token.len() - 1].to_string()
        })
        .collect()
}

/// Resolved field-scope metadata.
#[derive(Debug, Clone, Default)]
pub struct FieldExtensions {
    /// Storage-column name; unused by the document pipeline.
    pub database_column: String,
    /// Presentation metadata, zero-valued when absent.
    pub property: PropertyOptions,
    /// Explicit placement, `None` when the field carried no annotation.
    pub explicit_location: Option<Location>,
}

impl FieldExtensions {
    /// Reads the field payload, degrading to zero values when absent.
    pub fn resolve(field: &FieldDescriptor) -> Self {
        let opts = field.options.clone().unwrap_or_default();

        FieldExtensions {
            database_column: opts.database.map(|d| d.name).unwrap_or_default(),
            property: opts.property.unwrap_or_default(),
            explicit_location: opts.http.map(|h| h.location),
        }
    }

    /// The field's placement; BODY when nothing was declared. Everything
    /// downstream relies on this single default.
    pub fn location(&self) -> Location {
        self.explicit_location.unwrap_or_default()
    }
}
