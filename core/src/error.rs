//! # Error Handling
//!
//! Provides the unified `GenError` enum used across the workspace.
//!
//! Every fatal generation condition carries the name of the offending
//! method, message or field so a failed run points straight at the
//! descriptor that caused it. Generation is deterministic: failures are
//! data problems, never transient ones.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate. Only the wrapper variants at the
/// bottom participate in `From` conversions; generation errors are always
/// built explicitly with the offending entity name.
#[derive(Debug, Display, From)]
pub enum GenError {
    /// A method carries no HTTP binding extension at all.
    #[display("cannot handle method '{_0}' without HTTP API definitions")]
    MissingHttpRule(String),

    /// A method's HTTP binding uses a pattern outside GET/POST/PUT/DELETE/PATCH.
    #[display("method '{_0}' uses an unsupported HTTP binding pattern")]
    UnsupportedHttpRule(String),

    /// An input/output message could not be located by simple name.
    #[display("could not find message with name '{_0}'")]
    UnknownMessage(String),

    /// A PUT body selector names a field absent from the input message.
    #[display("could not find member '{field}' for the request body of method '{method}'")]
    UnknownBodyField {
        /// The method whose binding declared the selector.
        method: String,
        /// The selector value that matched no input field.
        field: String,
    },

    /// A header-alias annotation references fields absent from the input message.
    #[display("could not find header members '{members}' in message '{message}'")]
    UnknownHeaderMembers {
        /// Comma-separated list of the unconsumed member names.
        members: String,
        /// The input message that was searched.
        message: String,
    },

    /// Two methods resolve to the same (endpoint, verb) pair.
    #[display("methods '{first}' and '{second}' both bind {verb} {endpoint}")]
    DuplicateRoute {
        /// The shared endpoint template.
        endpoint: String,
        /// The shared HTTP verb.
        verb: String,
        /// The method that claimed the route first.
        first: String,
        /// The method that collided with it.
        second: String,
    },

    /// The processed file declares no service definition.
    #[display("file '{_0}' declares no service definition")]
    MissingService(String),

    /// The requested file is not part of the loaded descriptor set.
    #[display("file '{_0}' is not part of the loaded descriptor set")]
    UnknownFile(String),

    /// Wrapper for standard IO errors (CLI wiring).
    #[display("IO Error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// Wrapper for descriptor-set JSON decoding errors.
    #[display("Descriptor Error: {_0}")]
    #[from]
    Descriptor(serde_json::Error),

    /// Wrapper for YAML encoding/decoding errors.
    #[display("Yaml Error: {_0}")]
    #[from]
    Yaml(serde_yaml::Error),
}

impl std::error::Error for GenError {}

/// Helper type alias for Result using GenError.
pub type GenResult<T> = Result<T, GenError>;
