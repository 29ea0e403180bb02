//! REST resource name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum length of a resource name.
const MAX_LENGTH: usize = 64;

/// A validated backend collection name such as `case`, `client` or
/// `calendar-event`.
///
/// Resource names become one path segment under `/api/`, so they are limited
/// to lowercase ASCII letters, digits, `-` and `_`.
///
/// # Example
///
/// ```
/// use lexdesk_core::Resource;
///
/// let cases = Resource::new("case").unwrap();
/// assert_eq!(cases.as_str(), "case");
/// assert!(Resource::new("../admin").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resource(String);

impl Resource {
    /// Create a new resource name, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or contains
    /// characters outside `[a-z0-9_-]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the resource name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Resource {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > MAX_LENGTH {
            return Err(InvalidInputError::Resource {
                value: s.to_string(),
                reason: format!("exceeds maximum length of {}", MAX_LENGTH),
            }
            .into());
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(InvalidInputError::Resource {
                value: s.to_string(),
                reason: format!("invalid character '{}'", c),
            }
            .into());
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(InvalidInputError::Resource {
                value: s.to_string(),
                reason: "cannot start or end with a hyphen".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Resource {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Resource> for String {
    fn from(resource: Resource) -> Self {
        resource.0
    }
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_resources() {
        for name in ["case", "client", "advocate", "calendar-event", "task_list", "v2"] {
            assert!(Resource::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn invalid_resources() {
        for name in ["", "Case", "case/1", "../admin", "-case", "case-", "ca se"] {
            assert!(Resource::new(name).is_err(), "{name:?} should be invalid");
        }
        assert!(Resource::new("a".repeat(65)).is_err());
    }

    #[test]
    fn serde_validates() {
        let resource: Resource = serde_json::from_str("\"reminder\"").unwrap();
        assert_eq!(resource.as_str(), "reminder");
        assert!(serde_json::from_str::<Resource>("\"Bad Name\"").is_err());
    }
}
