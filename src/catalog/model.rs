//! Catalog document model.
//!
//! Types here mirror the on-disk document fields after structural
//! validation; deserialization never sees a document the version-1 schema
//! has not already accepted.

use crate::codec::Format;
use serde::{Deserialize, Serialize};

/// One catalog record describing a configuration file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConfigEntry {
    /// Location of the configuration file: a bare path or a `file:` URI.
    pub uri: String,
    /// Serialization format; inferred from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// URI of a JSON Schema document validating data written to this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `(uri, format, schema)` triple behind a logical path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigMeta {
    pub uri: String,
    pub format: Option<Format>,
    pub schema: Option<String>,
}

impl From<&ConfigEntry> for ConfigMeta {
    fn from(entry: &ConfigEntry) -> Self {
        ConfigMeta {
            uri: entry.uri.clone(),
            format: entry.format,
            schema: entry.schema.clone(),
        }
    }
}
