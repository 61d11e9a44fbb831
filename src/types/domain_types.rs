// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;
use url::Url;

/// Notion integration token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        write!(f, "{}...", first_chars(&self.0, 10))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

/// Base URL of an external backend, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ValidationError::InvalidUrl {
                url: trimmed.to_string(),
                reason: "only http and https are supported".to_string(),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(ValidationError::InvalidUrl {
                url: trimmed.to_string(),
                reason: "base URL cannot carry a query or fragment".to_string(),
            });
        }

        Ok(Self(trimmed.trim_end_matches('/').to_string()))
    }

    /// Appends an endpoint path. Leading slashes on `path` are optional.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Endpoint path on a REST backend, always starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPath(String);

impl EndpointPath {
    pub fn new(path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into().trim().to_string();
        if path.is_empty() {
            return Err(ValidationError::EmptyField("endpoint path"));
        }
        if path.contains("://") || path.contains('?') || path.contains('#') {
            return Err(ValidationError::InvalidPath {
                path,
                reason: "expected a plain path such as /api/notes".to_string(),
            });
        }
        if path.starts_with('/') {
            Ok(Self(path))
        } else {
            Ok(Self(format!("/{}", path)))
        }
    }

    /// For compile-time defaults that are known to be rooted.
    pub(crate) fn from_static(path: &'static str) -> Self {
        Self(path.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The first `max` characters of `text`.
pub fn first_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Shortens `text` to `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", first_chars(text, max))
    } else {
        text.to_string()
    }
}
