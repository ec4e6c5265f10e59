//! # Enum Catalog
//!
//! Maps every enum type loaded for the run, including ones declared in
//! transitively imported files, to its ordered value names with the shared
//! name prefix stripped. A service message may reference an enum defined
//! outside the file being processed, so the scan covers the whole set.
//!
//! Built once per generation run, immutable afterwards, passed by
//! reference through the component call graph.

use heck::ToShoutySnakeCase;
use indexmap::IndexMap;

use crate::descriptor::{trim_package_path, DescriptorSet, EnumDescriptor};

/// Fully-qualified enum name -> trimmed, ordered value names.
#[derive(Debug, Clone, Default)]
pub struct EnumCatalog {
    entries: IndexMap<String, Vec<String>>,
}

impl EnumCatalog {
    /// Scans every file in the set and catalogs its enums.
    pub fn from_set(set: &DescriptorSet) -> Self {
        let mut entries = IndexMap::new();

        for file in &set.files {
            for decl in &file.enums {
                let key = if file.package.is_empty() {
                    decl.name.clone()
                } else {
                    format!("{}.{}", file.package, decl.name)
                };
                entries.insert(key, trimmed_values(decl));
            }
        }

        EnumCatalog { entries }
    }

    /// Looks an enum up by its simple type name. Returns `None` when the
    /// type was never cataloged; callers degrade to an empty value list.
    pub fn lookup(&self, simple_name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| trim_package_path(key) == simple_name)
            .map(|(_, values)| values.as_slice())
    }

    /// Number of cataloged enum types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strips the shared leading-token prefix from every value name. The prefix
/// is the enum type name in shouty-snake form plus the separating
/// underscore (`Color` strips `COLOR_`).
fn trimmed_values(decl: &EnumDescriptor) -> Vec<String> {
    let prefix = format!("{}_", decl.name.to_shouty_snake_case());

    decl.values
        .iter()
        .map(|v| v.strip_prefix(&prefix).unwrap_or(v).to_string())
        .collect()
}
