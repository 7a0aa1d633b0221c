//! Whiriho manages a catalog of configuration files.
//!
//! A single catalog document maps logical paths to configuration files:
//! where each file lives, how it is encoded (yaml, json, or ini), and
//! optionally which JSON Schema its data must satisfy. The [`Whiriho`]
//! entity loads and validates the catalog, then lists, fetches, validates,
//! and writes the configurations it describes — always resolving entry
//! paths relative to the catalog's own directory and refusing anything that
//! escapes it unless the caller explicitly opts out.

pub mod catalog;
pub mod codec;
pub mod errors;
pub mod schemas;
pub mod uri;
pub mod version;

pub use catalog::{ConfigEntry, ConfigMeta, DEFAULT_CATALOG_PATH, Whiriho};
pub use codec::{Format, FormatChoice};
pub use errors::WhirihoError;

/// Crate version, reported in catalog-compatibility errors.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
