//! Semantic-version gate for catalog documents.
//!
//! Only the major component is load-bearing: the rest of the crate accepts
//! exactly [`SUPPORTED_MAJOR`] and rejects everything else rather than risk
//! reading a catalog layout it does not understand.

use crate::errors::WhirihoError;
use semver::Version;

/// Catalog major version this crate understands.
pub const SUPPORTED_MAJOR: u64 = 1;

/// Parse a catalog version string.
pub fn parse_version(version: &str) -> Result<Version, WhirihoError> {
    Version::parse(version).map_err(|err| {
        WhirihoError::CatalogVersion(format!("Invalid catalog version '{version}': {err}"))
    })
}
