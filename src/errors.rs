//! Error kinds for catalog operations.
//!
//! Every public catalog operation either returns its result or fails with
//! exactly one of these kinds. Callers can match the enum exhaustively; the
//! CLI boundary converts it to `anyhow::Error` via `?` and only ever prints
//! the message.

use thiserror::Error;

/// Closed set of catalog failure kinds, each carrying a readable message.
#[derive(Debug, Error)]
pub enum WhirihoError {
    /// Catalog file missing or unreadable, or no catalog loaded yet.
    #[error("{0}")]
    CatalogNotFound(String),

    /// Catalog document failed structural validation.
    #[error("Invalid catalog format: {0}")]
    CatalogFormat(String),

    /// Version string unparsable, or major version unsupported.
    #[error("{0}")]
    CatalogVersion(String),

    /// Unknown logical path requested.
    #[error("Catalog path '{0}' not found")]
    CatalogPath(String),

    /// Initialization refused (catalog exists without force) or write failed.
    #[error("{0}")]
    CatalogInitialization(String),

    /// Unsupported URI scheme, or path-safety violation.
    #[error("{0}")]
    ConfigurationUri(String),

    /// Target configuration file unreadable, unwritable, or of unknown format.
    #[error("{0}")]
    Configuration(String),

    /// Schema file unreadable or malformed, or data failed schema validation.
    #[error("{0}")]
    ConfigurationSchema(String),
}
