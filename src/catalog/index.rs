//! Configuration catalog entity.
//!
//! `Whiriho` owns the parsed catalog document and mediates all access to the
//! configuration files it describes. It is intentionally strict about
//! catalog versions and about where an entry may point: every data access
//! resolves the entry's uri, passes it through the path-safety policy, and
//! only then touches the file system through the codec.

use crate::catalog::model::{ConfigEntry, ConfigMeta};
use crate::codec::{self, CodecError, FormatChoice};
use crate::errors::WhirihoError;
use crate::schemas;
use crate::uri;
use crate::version::{self, SUPPORTED_MAJOR};
use jsonschema::JSONSchema;
use semver::Version;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Catalog handle bound to a file location, plus the parsed state after a
/// successful [`load`](Whiriho::load).
#[derive(Debug)]
pub struct Whiriho {
    path: PathBuf,
    format: FormatChoice,
    allow_absolute: bool,
    allow_unsafe: bool,
    version: Option<Version>,
    catalog: Option<BTreeMap<String, ConfigEntry>>,
}

impl Whiriho {
    /// Bind a catalog handle to a file location. Nothing is read until
    /// [`load`](Whiriho::load).
    pub fn new(path: impl Into<PathBuf>, format: FormatChoice) -> Self {
        Whiriho {
            path: path.into(),
            format,
            allow_absolute: false,
            allow_unsafe: false,
            version: None,
            catalog: None,
        }
    }

    /// Permit entries with absolute paths. Absolute access additionally
    /// requires [`with_unsafe_access`](Whiriho::with_unsafe_access).
    pub fn with_absolute_access(mut self, allowed: bool) -> Self {
        self.allow_absolute = allowed;
        self
    }

    /// Skip the containment check on resolved entry paths.
    pub fn with_unsafe_access(mut self, allowed: bool) -> Self {
        self.allow_unsafe = allowed;
        self
    }

    /// Catalog version parsed by the last successful load.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Read, validate, and index the catalog document.
    ///
    /// The document must pass the generic envelope schema, carry a parsable
    /// version with major 1, and pass the full version-1 schema. In-memory
    /// state is replaced wholesale on success and untouched on failure.
    pub fn load(&mut self) -> Result<(), WhirihoError> {
        let data = codec::load(&self.path, self.format).map_err(|err| match err {
            CodecError::Read { source, .. } => WhirihoError::CatalogNotFound(format!(
                "Failed to load configuration catalog {}: {source}",
                self.path.display()
            )),
            other => WhirihoError::CatalogFormat(other.to_string()),
        })?;

        schemas::check_envelope(&data).map_err(WhirihoError::CatalogFormat)?;
        let Some(raw_version) = data.get("version").and_then(Value::as_str) else {
            return Err(WhirihoError::CatalogFormat(
                "version must be a string".to_string(),
            ));
        };
        let parsed = version::parse_version(raw_version)?;
        if parsed.major != SUPPORTED_MAJOR {
            return Err(WhirihoError::CatalogVersion(format!(
                "Whiriho ({}) cannot use catalog version {parsed}",
                crate::VERSION
            )));
        }

        schemas::check_v1(&data).map_err(WhirihoError::CatalogFormat)?;
        let Some(section) = data.get("catalog") else {
            return Err(WhirihoError::CatalogFormat(
                "missing 'catalog' mapping".to_string(),
            ));
        };
        let entries: BTreeMap<String, ConfigEntry> = serde_json::from_value(section.clone())
            .map_err(|err| WhirihoError::CatalogFormat(err.to_string()))?;

        debug!(catalog = %self.path.display(), entries = entries.len(), "catalog loaded");
        self.version = Some(parsed);
        self.catalog = Some(entries);
        Ok(())
    }

    /// Write a fresh empty catalog document to disk.
    ///
    /// Refuses to overwrite an existing catalog unless `force` is set. Does
    /// not touch in-memory state; call [`load`](Whiriho::load) afterwards.
    pub fn initialize(
        &self,
        format: FormatChoice,
        version: &str,
        force: bool,
    ) -> Result<(), WhirihoError> {
        let parsed = version::parse_version(version)?;
        if parsed.major != SUPPORTED_MAJOR {
            return Err(WhirihoError::CatalogVersion(format!(
                "Whiriho ({}) cannot initialize catalog version {parsed}",
                crate::VERSION
            )));
        }
        let resolved = format
            .resolve(&self.path)
            .map_err(|err| WhirihoError::CatalogInitialization(err.to_string()))?;
        if self.path.exists() && !force {
            return Err(WhirihoError::CatalogInitialization(format!(
                "Catalog {} already exists; pass force to overwrite it",
                self.path.display()
            )));
        }
        let document = json!({"version": version, "catalog": {}});
        codec::dump(&document, &self.path, resolved)
            .map_err(|err| WhirihoError::CatalogInitialization(err.to_string()))
    }

    /// Logical paths of the loaded catalog, in sorted order.
    pub fn get_paths(&self) -> Result<Vec<String>, WhirihoError> {
        Ok(self.entries()?.keys().cloned().collect())
    }

    /// The raw entry behind a logical path.
    pub fn get_config_raw(&self, path: &str) -> Result<&ConfigEntry, WhirihoError> {
        self.entries()?
            .get(path)
            .ok_or_else(|| WhirihoError::CatalogPath(path.to_string()))
    }

    /// The `(uri, format, schema)` triple behind a logical path.
    pub fn get_config_meta(&self, path: &str) -> Result<ConfigMeta, WhirihoError> {
        self.get_config_raw(path).map(ConfigMeta::from)
    }

    /// Read and parse the configuration file behind a logical path.
    pub fn get_config_data(&self, path: &str) -> Result<Value, WhirihoError> {
        let meta = self.get_config_meta(path)?;
        let reference = uri::parse_reference(&meta.uri)?;
        reference.require_file()?;
        let target = self.safe_config_path(Path::new(&reference.path))?;
        codec::load(&target, FormatChoice::from(meta.format))
            .map_err(|err| WhirihoError::Configuration(err.to_string()))
    }

    /// The JSON Schema document attached to a logical path, or `None` when
    /// the entry declares no schema.
    ///
    /// The document is read as raw JSON; it is not checked against a
    /// meta-schema here. A schema that does not compile surfaces when data
    /// is validated against it.
    pub fn get_config_schema(&self, path: &str) -> Result<Option<Value>, WhirihoError> {
        let meta = self.get_config_meta(path)?;
        let Some(schema_uri) = meta.schema else {
            return Ok(None);
        };
        let reference = uri::parse_reference(&schema_uri)?;
        reference.require_file()?;
        let target = self.safe_config_path(Path::new(&reference.path))?;
        let raw = fs::read_to_string(&target).map_err(|err| {
            WhirihoError::ConfigurationSchema(format!(
                "Failed to read schema {}: {err}",
                target.display()
            ))
        })?;
        let document = serde_json::from_str(&raw).map_err(|err| {
            WhirihoError::ConfigurationSchema(format!(
                "Failed to parse schema {}: {err}",
                target.display()
            ))
        })?;
        Ok(Some(document))
    }

    /// Serialize `data` into the configuration file behind a logical path.
    ///
    /// With `validate` set and a schema declared, the data must satisfy the
    /// schema before anything is written. Only the target file is touched;
    /// the in-memory catalog is not.
    pub fn set_config_data(
        &self,
        path: &str,
        data: &Value,
        validate: bool,
    ) -> Result<(), WhirihoError> {
        let meta = self.get_config_meta(path)?;
        let reference = uri::parse_reference(&meta.uri)?;
        reference.require_file()?;
        let target = self.safe_config_path(Path::new(&reference.path))?;

        if validate {
            if let Some(schema) = self.get_config_schema(path)? {
                let compiled = JSONSchema::compile(&schema).map_err(|err| {
                    WhirihoError::ConfigurationSchema(format!(
                        "Invalid configuration schema: {err}"
                    ))
                })?;
                if let Err(errors) = compiled.validate(data) {
                    let details = errors.map(|err| err.to_string()).collect::<Vec<_>>();
                    return Err(WhirihoError::ConfigurationSchema(format!(
                        "Configuration data is invalid: {}",
                        details.join("; ")
                    )));
                }
            }
        }

        let format = FormatChoice::from(meta.format)
            .resolve(&target)
            .map_err(|err| WhirihoError::Configuration(err.to_string()))?;
        codec::dump(data, &target, format)
            .map_err(|err| WhirihoError::Configuration(err.to_string()))
    }

    fn entries(&self) -> Result<&BTreeMap<String, ConfigEntry>, WhirihoError> {
        self.catalog
            .as_ref()
            .ok_or_else(|| WhirihoError::CatalogNotFound("Catalog has not been loaded".to_string()))
    }

    /// Path-safety policy: decide whether a target path taken from an entry
    /// uri may be touched, and resolve it for file I/O.
    ///
    /// Absolute targets need both safety flags; relative targets resolve
    /// against the symlink-resolved catalog directory and must stay inside
    /// it unless unsafe access is enabled.
    fn safe_config_path(&self, target: &Path) -> Result<PathBuf, WhirihoError> {
        if target.is_absolute() {
            // Deliberate double gate: allowing absolute paths alone is not
            // enough, the caller must also opt out of safety checks.
            if self.allow_absolute && self.allow_unsafe {
                return Ok(target.to_path_buf());
            }
            return Err(WhirihoError::ConfigurationUri(format!(
                "Not authorized to load absolute file {}",
                target.display()
            )));
        }

        let base = self.catalog_dir()?;
        let candidate = base.join(target);
        if self.allow_unsafe {
            return Ok(candidate);
        }
        // A target being written for the first time does not canonicalize;
        // fall back to lexical normalization against the canonical base.
        let resolved = candidate
            .canonicalize()
            .unwrap_or_else(|_| normalize_lexically(&candidate));
        if !resolved.starts_with(&base) {
            warn!(path = %target.display(), "rejected catalog entry path outside catalog directory");
            return Err(WhirihoError::ConfigurationUri(format!(
                "Unsafe configuration path '{}'",
                target.display()
            )));
        }
        Ok(resolved)
    }

    fn catalog_dir(&self) -> Result<PathBuf, WhirihoError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        parent.canonicalize().map_err(|err| {
            WhirihoError::ConfigurationUri(format!(
                "Cannot resolve catalog directory {}: {err}",
                parent.display()
            ))
        })
    }
}

/// Normalize `.` and `..` components without touching the file system.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn handle(dir: &TempDir) -> Whiriho {
        Whiriho::new(dir.path().join("whiriho.json"), FormatChoice::Infer)
    }

    #[test]
    fn relative_target_resolves_inside_catalog_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.json"), "{}").unwrap();
        let resolved = handle(&dir)
            .safe_config_path(Path::new("app.json"))
            .unwrap();
        assert!(resolved.ends_with("app.json"));
        assert!(resolved.starts_with(dir.path().canonicalize().unwrap()));
    }

    #[test]
    fn unwritten_target_is_still_contained() {
        let dir = TempDir::new().unwrap();
        let resolved = handle(&dir)
            .safe_config_path(Path::new("new/app.json"))
            .unwrap();
        assert!(resolved.starts_with(dir.path().canonicalize().unwrap()));
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = handle(&dir)
            .safe_config_path(Path::new("../outside.json"))
            .unwrap_err();
        assert!(matches!(err, WhirihoError::ConfigurationUri(_)));
        assert!(err.to_string().contains("../outside.json"));
    }

    #[test]
    fn unsafe_access_skips_containment() {
        let dir = TempDir::new().unwrap();
        let resolved = handle(&dir)
            .with_unsafe_access(true)
            .safe_config_path(Path::new("../outside.json"))
            .unwrap();
        assert!(resolved.to_string_lossy().contains("outside.json"));
    }

    #[test]
    fn absolute_target_needs_both_flags() {
        let dir = TempDir::new().unwrap();
        let target = Path::new("/etc/app.json");
        assert!(handle(&dir).safe_config_path(target).is_err());
        // allow_absolute alone is deliberately insufficient.
        assert!(
            handle(&dir)
                .with_absolute_access(true)
                .safe_config_path(target)
                .is_err()
        );
        assert!(
            handle(&dir)
                .with_unsafe_access(true)
                .safe_config_path(target)
                .is_err()
        );
        let resolved = handle(&dir)
            .with_absolute_access(true)
            .with_unsafe_access(true)
            .safe_config_path(target)
            .unwrap();
        assert_eq!(resolved, target);
    }

    #[test]
    fn lexical_normalization_pops_parent_components() {
        assert_eq!(
            normalize_lexically(Path::new("/base/conf/../app.json")),
            PathBuf::from("/base/app.json")
        );
        assert_eq!(
            normalize_lexically(Path::new("/base/./a/b/../../c")),
            PathBuf::from("/base/c")
        );
    }
}
