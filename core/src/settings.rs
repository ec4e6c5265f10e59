//! # Generation Settings
//!
//! Optional YAML-sourced values that fill document metadata the file-level
//! extension payloads leave empty. File-level values always win; settings
//! are fallbacks, not overrides.

use serde::Deserialize;

use crate::error::GenResult;
use crate::extensions::ServerOption;

/// Deserialized settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Fallback document info.
    #[serde(default)]
    pub info: InfoSettings,
    /// Fallback server list.
    #[serde(default)]
    pub servers: Vec<ServerOption>,
}

/// Fallback title/version pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoSettings {
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Document version.
    #[serde(default)]
    pub version: String,
}

impl Settings {
    /// Parses a settings file from its YAML text.
    pub fn from_yaml(text: &str) -> GenResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
