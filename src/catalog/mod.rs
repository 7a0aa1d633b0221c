//! Configuration catalog wiring.
//!
//! This module wraps catalog documents on disk (for example `whiriho.json`)
//! so callers can load a validated snapshot and reach the configuration
//! files it describes. Types in `model` mirror the document fields; the
//! `Whiriho` entity in `index` mediates every read and write.

pub mod index;
pub mod model;

pub use index::Whiriho;
pub use model::{ConfigEntry, ConfigMeta};

/// Default catalog file name used by the command-line shell.
pub const DEFAULT_CATALOG_PATH: &str = "whiriho.json";
