//! Substation abstraction.
//!
//! # Responsibilities
//! - Represent a single backend substation (name + base URL)
//! - Build the probe and forward URIs for it

use axum::http::uri::{InvalidUri, Uri};
use url::Url;

/// A single substation. Identity is the configured name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substation {
    /// Name reported to callers and used as the load table key.
    pub name: String,
    /// Parsed base URL.
    pub base_url: Url,
}

impl Substation {
    /// Create a new substation from its name and base URL.
    pub fn new(name: impl Into<String>, url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            name: name.into(),
            base_url: Url::parse(url)?,
        })
    }

    /// URI of `path` on this substation, keeping any path prefix of the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Uri, InvalidUri> {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{}{}", base, path).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_path() {
        let s = Substation::new("substation1", "http://substation1:5000").unwrap();
        assert_eq!(
            s.endpoint("/metrics").unwrap().to_string(),
            "http://substation1:5000/metrics"
        );
    }

    #[test]
    fn test_endpoint_keeps_prefix() {
        let s = Substation::new("edge", "http://10.1.2.3:8080/grid/").unwrap();
        assert_eq!(
            s.endpoint("/charge").unwrap().to_string(),
            "http://10.1.2.3:8080/grid/charge"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(Substation::new("bad", "::nope").is_err());
    }
}
