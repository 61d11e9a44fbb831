// src/error.rs
//! Application error types with structured error handling.
//!
//! Every failure the portal can report falls into one of a handful of
//! classes. Each class knows the HTTP status it surfaces as and the
//! diagnostic the browser gets to see, so handlers never have to decide.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::types::{truncate_chars, ValidationError};
use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Only used for diagnostics: the portal never branches its behaviour on
/// them, but logging `object_not_found` reads better than a raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    RateLimited,
    ObjectNotFound,
    Unauthorized,
    RestrictedResource,
    InvalidJson,
    ValidationFailed,
    Conflict,
    InternalError,
    ServiceUnavailable,
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Extracts the code from a Notion-style error body, if the body is one.
    pub fn from_error_body(body: &str) -> Option<Self> {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.get("code")
            .and_then(|c| c.as_str())
            .map(Self::from_api_response)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
///
/// The `Display` output of each variant is the user-facing diagnostic.
#[derive(Error, Debug)]
pub enum AppError {
    /// The adapter could not be constructed from the available settings.
    #[error("Service unavailable: {0}")]
    Configuration(String),

    #[error("External API HTTP error: {status} {reason} - {body}")]
    Upstream {
        status: u16,
        reason: String,
        body: String,
        url: String,
        code: Option<NotionErrorCode>,
    },

    #[error("External API request timed out.")]
    Timeout { url: String },

    #[error("Service unavailable: Error connecting to external API ({kind})")]
    Connectivity { url: String, kind: &'static str },

    #[error("Invalid response from external API: {0}")]
    MalformedResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template render error for template {name}: {message}")]
    TemplateRender { name: String, message: String },

    #[error(transparent)]
    InvalidValue(#[from] ValidationError),
}

impl AppError {
    /// Classifies a reqwest failure and logs it with its target.
    pub fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            log::error!("Timeout calling {}: {}", url, err);
            Self::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            log::error!("Connection failure calling {}: {}", url, err);
            Self::Connectivity {
                url: url.to_string(),
                kind: "ConnectionError",
            }
        } else if err.is_decode() {
            log::error!("Undecodable response from {}: {}", url, err);
            Self::MalformedResponse(err.to_string())
        } else {
            log::error!("Request failure calling {}: {}", url, err);
            Self::Connectivity {
                url: url.to_string(),
                kind: "RequestError",
            }
        }
    }

    /// Builds the error for a non-2xx upstream answer and logs it.
    pub fn upstream(url: &str, status: StatusCode, body: &str) -> Self {
        let code = NotionErrorCode::from_error_body(body);
        match &code {
            Some(code) => log::error!("Upstream {} answered {} ({})", url, status, code),
            None => log::error!("Upstream {} answered {}", url, status),
        }

        Self::Upstream {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: truncate_chars(body, ERROR_BODY_PREVIEW_LENGTH),
            url: url.to_string(),
            code,
        }
    }

    /// HTTP status this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) | Self::Connectivity { .. } => 503,
            Self::Upstream { status, .. } => *status,
            Self::Timeout { .. } => 504,
            Self::MalformedResponse(_) | Self::TemplateRender { .. } => 500,
            Self::Validation(_) | Self::InvalidValue(_) => 422,
        }
    }

    /// The diagnostic shown to the caller.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}
