//! URI scheme resolution for catalog entries.
//!
//! Entry `uri` and `schema` values are either bare file-system paths or URIs
//! with an explicit scheme. A bare path carries the implicit `file` scheme.
//! Only the `file` scheme grants data access today; other schemes are split
//! out syntactically so the rejection can name them.

use crate::errors::WhirihoError;
use url::Url;

/// The only scheme the access paths currently accept.
pub const FILE_SCHEME: &str = "file";

/// Scheme and path split of a `uri`/`schema` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriReference {
    pub scheme: String,
    pub path: String,
}

impl UriReference {
    /// Fail unless this reference uses the `file` scheme.
    pub fn require_file(&self) -> Result<(), WhirihoError> {
        if self.scheme == FILE_SCHEME {
            Ok(())
        } else {
            Err(WhirihoError::ConfigurationUri(format!(
                "Unsupported uri scheme '{}'",
                self.scheme
            )))
        }
    }
}

/// Split a raw `uri`/`schema` value into scheme and path.
///
/// Strings that do not parse as an absolute URL are bare file paths. A
/// `file:` URL must convert to a local path; file URLs carrying a remote
/// host have no local meaning and are rejected.
pub fn parse_reference(raw: &str) -> Result<UriReference, WhirihoError> {
    match Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == FILE_SCHEME => {
            let path = parsed.to_file_path().map_err(|()| {
                WhirihoError::ConfigurationUri(format!("Cannot resolve file uri '{raw}'"))
            })?;
            Ok(UriReference {
                scheme: FILE_SCHEME.to_string(),
                path: path.to_string_lossy().into_owned(),
            })
        }
        Ok(parsed) => Ok(UriReference {
            scheme: parsed.scheme().to_string(),
            path: parsed.path().to_string(),
        }),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(UriReference {
            scheme: FILE_SCHEME.to_string(),
            path: raw.to_string(),
        }),
        Err(err) => Err(WhirihoError::ConfigurationUri(format!(
            "Invalid uri '{raw}': {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_relative_path_gets_file_scheme() {
        let reference = parse_reference("conf/app.yaml").unwrap();
        assert_eq!(reference.scheme, FILE_SCHEME);
        assert_eq!(reference.path, "conf/app.yaml");
        assert!(reference.require_file().is_ok());
    }

    #[test]
    fn bare_absolute_path_gets_file_scheme() {
        let reference = parse_reference("/etc/app.json").unwrap();
        assert_eq!(reference.scheme, FILE_SCHEME);
        assert_eq!(reference.path, "/etc/app.json");
    }

    #[test]
    fn explicit_file_url_resolves_to_local_path() {
        let reference = parse_reference("file:///etc/app.json").unwrap();
        assert_eq!(reference.scheme, FILE_SCHEME);
        assert_eq!(reference.path, "/etc/app.json");
    }

    #[test]
    fn foreign_scheme_is_split_but_rejected() {
        let reference = parse_reference("http://example.com/schema.json").unwrap();
        assert_eq!(reference.scheme, "http");
        let err = reference.require_file().unwrap_err();
        assert!(matches!(err, WhirihoError::ConfigurationUri(_)));
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn file_url_with_host_is_rejected() {
        assert!(matches!(
            parse_reference("file://host/app.json"),
            Err(WhirihoError::ConfigurationUri(_))
        ));
    }
}
