//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::Resource;
use crate::error::{Error, InvalidInputError};

/// Path prefix shared by every backend REST resource.
const API_PREFIX: &str = "/api";

/// A validated backend base URL.
///
/// Must use HTTPS, except for loopback hosts where plain HTTP is accepted
/// for local development. A path prefix is allowed for backends mounted
/// below the site root.
///
/// # Example
///
/// ```
/// use lexdesk_core::{ApiUrl, Resource};
///
/// let api = ApiUrl::new("https://practice.example.com").unwrap();
/// assert_eq!(api.endpoint("/api/token/refresh/"),
///            "https://practice.example.com/api/token/refresh/");
///
/// let cases = Resource::new("case").unwrap();
/// assert_eq!(api.resource_url(&cases, Some("42")).unwrap(),
///            "https://practice.example.com/api/case/42/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the absolute URL for a path relative to the base.
    ///
    /// A missing leading slash is added.
    pub fn endpoint(&self, path: &str) -> String {
        // The URL crate always adds a trailing slash to root paths
        let base = self.0.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Returns the collection URL (`/api/<resource>/`) or, with an id, the
    /// item URL (`/api/<resource>/<id>/`).
    ///
    /// An id must be a single path segment of ASCII letters, digits, `-`,
    /// `_`, `.`, `:` or `~`, and may not be `.` or `..`.
    pub fn resource_url(&self, resource: &Resource, id: Option<&str>) -> Result<String, Error> {
        match id {
            Some(id) => {
                let id = validate_item_id(id)?;
                Ok(self.endpoint(&format!(
                    "{}/{}/{}/",
                    API_PREFIX,
                    resource.as_str(),
                    id
                )))
            }
            None => Ok(self.endpoint(&format!("{}/{}/", API_PREFIX, resource.as_str()))),
        }
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns true if the host is a loopback address.
    pub fn is_local(&self) -> bool {
        is_loopback(&self.0)
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_loopback(url)) {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must not carry a query or fragment".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn validate_item_id(id: &str) -> Result<&str, Error> {
    let trimmed = id.trim_matches('/');
    let invalid = |reason: &str| -> Error {
        InvalidInputError::ItemId {
            value: id.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if trimmed.is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(invalid("cannot be a relative path segment"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '~'))
    {
        return Err(invalid("must be a single path segment"));
    }
    Ok(trimmed)
}

fn is_loopback(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]")
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://practice.example.com").unwrap();
        assert_eq!(api.host(), Some("practice.example.com"));
        assert!(!api.is_local());
    }

    #[test]
    fn valid_localhost_http() {
        let api = ApiUrl::new("http://localhost:8000").unwrap();
        assert_eq!(api.host(), Some("localhost"));
        assert!(api.is_local());

        assert!(ApiUrl::new("http://127.0.0.1:9000").is_ok());
    }

    #[test]
    fn endpoint_construction() {
        let api = ApiUrl::new("https://practice.example.com/").unwrap();
        assert_eq!(
            api.endpoint("/api/token/"),
            "https://practice.example.com/api/token/"
        );
        assert_eq!(
            api.endpoint("api/case/"),
            "https://practice.example.com/api/case/"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let api = ApiUrl::new("https://example.com/backend/").unwrap();
        assert_eq!(
            api.endpoint("/api/token/refresh/"),
            "https://example.com/backend/api/token/refresh/"
        );
    }

    #[test]
    fn resource_urls() {
        let api = ApiUrl::new("http://localhost:8000").unwrap();
        let invoices = Resource::new("invoice").unwrap();
        assert_eq!(
            api.resource_url(&invoices, None).unwrap(),
            "http://localhost:8000/api/invoice/"
        );
        assert_eq!(
            api.resource_url(&invoices, Some("/17/")).unwrap(),
            "http://localhost:8000/api/invoice/17/"
        );
        assert_eq!(
            api.resource_url(&invoices, Some("3f2a-inv_2026.1")).unwrap(),
            "http://localhost:8000/api/invoice/3f2a-inv_2026.1/"
        );
    }

    #[test]
    fn item_id_cannot_leave_its_collection() {
        let api = ApiUrl::new("http://localhost:8000").unwrap();
        let cases = Resource::new("case").unwrap();

        for id in ["../client/5", "5/../../client", "..", ".", "%2e%2e", "5?x=1", "5#top", "a b", ""] {
            let err = api.resource_url(&cases, Some(id)).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput(InvalidInputError::ItemId { .. })),
                "accepted {id:?}"
            );
        }
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ApiUrl::new("http://practice.example.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/api/case/").is_err());
    }

    #[test]
    fn invalid_query() {
        assert!(ApiUrl::new("https://example.com/?tenant=1").is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let api: ApiUrl = serde_json::from_str("\"https://example.com\"").unwrap();
        assert_eq!(api.host(), Some("example.com"));
        assert!(serde_json::from_str::<ApiUrl>("\"ftp://example.com\"").is_err());
    }
}
