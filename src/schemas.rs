//! Fixed JSON Schema documents for catalog validation.
//!
//! Two bundled documents: a generic envelope asserting that any catalog
//! carries a string `version`, and the full version-1 catalog schema applied
//! once the major version is known. Both are fixed at build time; failing to
//! compile them signals a defect in this crate, never bad user input.

use jsonschema::JSONSchema;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// Generic envelope: every catalog document must carry a string `version`.
pub static CATALOG_ENVELOPE: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "version": {"type": "string"}
        },
        "required": ["version"],
        "additionalProperties": true
    })
});

/// Full schema for version-1 catalogs: a `catalog` mapping of entries, each
/// requiring `uri`, with `format` constrained to the supported codecs and no
/// undeclared top-level properties.
pub static CATALOG_V1: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "version": {"type": "string"},
            "catalog": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "properties": {
                        "uri": {"type": "string"},
                        "format": {"enum": ["yaml", "json", "ini"]},
                        "schema": {"type": "string"},
                        "title": {"type": "string"},
                        "description": {"type": "string"}
                    },
                    "required": ["uri"]
                }
            }
        },
        "required": ["version", "catalog"],
        "additionalProperties": false
    })
});

static ENVELOPE_VALIDATOR: LazyLock<JSONSchema> = LazyLock::new(|| compile(&CATALOG_ENVELOPE));
static V1_VALIDATOR: LazyLock<JSONSchema> = LazyLock::new(|| compile(&CATALOG_V1));

fn compile(schema: &'static Value) -> JSONSchema {
    // Bundled documents; a compile failure is a crate defect.
    JSONSchema::compile(schema).expect("bundled catalog schema must compile")
}

/// Validate a catalog document against the generic envelope.
pub fn check_envelope(document: &Value) -> Result<(), String> {
    check(&ENVELOPE_VALIDATOR, document)
}

/// Validate a catalog document against the full version-1 schema.
pub fn check_v1(document: &Value) -> Result<(), String> {
    check(&V1_VALIDATOR, document)
}

fn check(validator: &JSONSchema, document: &Value) -> Result<(), String> {
    if let Err(errors) = validator.validate(document) {
        let details = errors.map(|err| err.to_string()).collect::<Vec<_>>();
        return Err(details.join("; "));
    }
    Ok(())
}
