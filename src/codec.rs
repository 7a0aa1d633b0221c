//! Multi-format configuration codec.
//!
//! This module centralizes how configuration files are parsed and written.
//! Catalog operations resolve a [`FormatChoice`] to a concrete [`Format`]
//! exactly once and delegate here instead of branching on extensions
//! themselves, so a new format lands in one place. INI documents map to a
//! table of sections holding string values; YAML and JSON map to arbitrary
//! JSON data.

use ini::Ini;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Serialization formats the codec understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Json,
    Ini,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Ini => "ini",
        }
    }

    /// Look up a format by its catalog name.
    pub fn from_name(name: &str) -> Option<Format> {
        match name {
            "yaml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "ini" => Some(Format::Ini),
            _ => None,
        }
    }

    /// Infer a format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "ini" => Some(Format::Ini),
            _ => None,
        }
    }
}

/// Either a caller-forced format or inference from the target's extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatChoice {
    #[default]
    Infer,
    Forced(Format),
}

impl FormatChoice {
    /// Resolve to a concrete format for the given target.
    pub fn resolve(self, path: &Path) -> Result<Format, CodecError> {
        match self {
            FormatChoice::Forced(format) => Ok(format),
            FormatChoice::Infer => Format::from_extension(path)
                .ok_or_else(|| CodecError::UnknownFormat(path.display().to_string())),
        }
    }
}

impl From<Option<Format>> for FormatChoice {
    fn from(format: Option<Format>) -> Self {
        match format {
            Some(format) => FormatChoice::Forced(format),
            None => FormatChoice::Infer,
        }
    }
}

/// Codec failures; callers map these onto their own error kinds.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No forced format and the extension identifies none.
    #[error("Unable to identify configuration format for {0}")]
    UnknownFormat(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("Failed to serialize configuration data: {0}")]
    Serialize(String),
}

/// Read and parse a configuration file.
pub fn load(path: &Path, choice: FormatChoice) -> Result<Value, CodecError> {
    let format = choice.resolve(path)?;
    let raw = fs::read_to_string(path).map_err(|source| CodecError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_value(&raw, format).map_err(|detail| CodecError::Parse {
        path: path.display().to_string(),
        detail,
    })
}

/// Serialize data and write it to a configuration file, replacing any
/// previous content.
pub fn dump(data: &Value, path: &Path, format: Format) -> Result<(), CodecError> {
    let text = serialize_value(data, format).map_err(CodecError::Serialize)?;
    fs::write(path, text).map_err(|source| CodecError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn parse_value(input: &str, format: Format) -> Result<Value, String> {
    match format {
        Format::Json => serde_json::from_str(input).map_err(|err| err.to_string()),
        Format::Yaml => serde_yaml::from_str(input).map_err(|err| err.to_string()),
        Format::Ini => parse_ini(input),
    }
}

fn serialize_value(data: &Value, format: Format) -> Result<String, String> {
    match format {
        Format::Json => serde_json::to_string_pretty(data)
            .map(|text| text + "\n")
            .map_err(|err| err.to_string()),
        Format::Yaml => serde_yaml::to_string(data).map_err(|err| err.to_string()),
        Format::Ini => serialize_ini(data),
    }
}

fn parse_ini(input: &str) -> Result<Value, String> {
    let document = Ini::load_from_str(input).map_err(|err| err.to_string())?;
    let mut root = Map::new();
    for (section, properties) in document.iter() {
        let mut table = Map::new();
        for (key, value) in properties.iter() {
            table.insert(key.to_string(), Value::String(value.to_string()));
        }
        match section {
            Some(name) => {
                root.insert(name.to_string(), Value::Object(table));
            }
            // Keys outside any section surface as top-level values.
            None => root.extend(table),
        }
    }
    Ok(Value::Object(root))
}

fn serialize_ini(data: &Value) -> Result<String, String> {
    let Value::Object(root) = data else {
        return Err("ini serialization requires an object at the top level".to_string());
    };
    let mut document = Ini::new();
    for (key, entry) in root {
        match entry {
            Value::Object(section) => {
                for (name, value) in section {
                    document
                        .with_section(Some(key.as_str()))
                        .set(name.as_str(), ini_scalar(value)?);
                }
            }
            other => {
                document
                    .with_section(None::<String>)
                    .set(key.as_str(), ini_scalar(other)?);
            }
        }
    }
    let mut buffer = Vec::new();
    document
        .write_to(&mut buffer)
        .map_err(|err| err.to_string())?;
    String::from_utf8(buffer).map_err(|err| err.to_string())
}

fn ini_scalar(value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!("ini values must be scalar, got {other}")),
    }
}
